//! Liquid particles
//!
//! Positions use the liquid frame: `x` from the left edge and `y` up from the
//! bottom of the liquid. Motion offsets are screen offsets where negative `y`
//! moves up, so the drawn height is `origin.y - offset.y`.

use flask_animation::{Easing, KeyframeTrack, TimerId, Timestamp};
use rand::Rng;
use slotmap::new_key_type;
use smallvec::SmallVec;

new_key_type! {
    /// Handle for a liquid particle; a rebuilt pool gets fresh handles
    pub struct ParticleId;
}

/// Randomized rise from the liquid surface, as offsets from the origin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeparturePath {
    pub mid: [f32; 2],
    pub end: [f32; 2],
}

impl DeparturePath {
    pub fn random(rng: &mut impl Rng) -> Self {
        let mid = [
            (rng.gen::<f32>() - 0.5) * 50.0,
            -150.0 + rng.gen::<f32>() * 30.0,
        ];
        let end = [
            (rng.gen::<f32>() - 0.5) * 100.0,
            -300.0 - rng.gen::<f32>() * 50.0,
        ];
        Self { mid, end }
    }

    /// Offset track: origin, midpoint halfway through, end at `duration_ms`
    pub fn track(&self, duration_ms: u32) -> KeyframeTrack<[f32; 2]> {
        KeyframeTrack::builder()
            .ease(Easing::EaseOutQuad)
            .at(0, [0.0, 0.0])
            .at(duration_ms / 2, self.mid)
            .at(duration_ms, self.end)
            .build()
    }
}

/// The idle wobble every liquid particle loops through
pub fn float_track(period_ms: u32) -> KeyframeTrack<[f32; 2]> {
    KeyframeTrack::builder()
        .ease(Easing::EaseInOutQuad)
        .at(0, [0.0, 0.0])
        .at(period_ms / 4, [3.0, -2.0])
        .at(period_ms / 2, [-2.0, 2.0])
        .at(period_ms * 3 / 4, [2.0, -3.0])
        .at(period_ms, [0.0, 0.0])
        .loop_infinite()
        .build()
}

/// A departure in progress
#[derive(Clone, Debug)]
pub(crate) struct Departure {
    pub path: DeparturePath,
    pub started_at: Timestamp,
    pub track: KeyframeTrack<[f32; 2]>,
    /// Timer that ends the departure visual
    pub end_timer: TimerId,
}

/// One particle of the liquid pool
#[derive(Clone, Debug)]
pub struct Particle {
    pub id: ParticleId,
    pub origin: [f32; 2],
    /// Departed during the current pass over the pool
    pub departed: bool,
    /// Departures since the particle was created
    pub departures: u32,
    pub float_delay_ms: u32,
    pub(crate) created_at: Timestamp,
    pub(crate) float: KeyframeTrack<[f32; 2]>,
    pub(crate) departure: Option<Departure>,
    /// Vapor spawns still waiting to fire for this particle
    pub(crate) pending_vapors: SmallVec<[TimerId; 2]>,
}

impl Particle {
    pub(crate) fn new(
        id: ParticleId,
        origin: [f32; 2],
        float: &KeyframeTrack<[f32; 2]>,
        float_delay_ms: u32,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            origin,
            departed: false,
            departures: 0,
            float_delay_ms,
            created_at: now,
            float: float.with_delay(float_delay_ms),
            departure: None,
            pending_vapors: SmallVec::new(),
        }
    }

    /// Whether the departure visual is running
    pub fn is_departing(&self) -> bool {
        self.departure.is_some()
    }

    pub fn departure_path(&self) -> Option<&DeparturePath> {
        self.departure.as_ref().map(|d| &d.path)
    }

    /// Delayed callbacks this particle still owns
    pub fn pending_timers(&self) -> usize {
        self.pending_vapors.len() + usize::from(self.departure.is_some())
    }

    /// Drawn position at `now`
    pub fn position(&self, now: Timestamp) -> [f32; 2] {
        let offset = match &self.departure {
            Some(departure) => departure.track.sample(now.millis_since(departure.started_at)),
            None => self.float.sample(now.millis_since(self.created_at)),
        };
        [self.origin[0] + offset[0], self.origin[1] - offset[1]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_departure_path_ranges() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let path = DeparturePath::random(&mut rng);
            assert!((-25.0..=25.0).contains(&path.mid[0]));
            assert!((-150.0..=-120.0).contains(&path.mid[1]));
            assert!((-50.0..=50.0).contains(&path.end[0]));
            assert!((-350.0..=-300.0).contains(&path.end[1]));
        }
    }

    #[test]
    fn test_departure_track_hits_waypoints() {
        let path = DeparturePath {
            mid: [10.0, -140.0],
            end: [-20.0, -320.0],
        };
        let track = path.track(3000);
        assert_eq!(track.sample(0.0), [0.0, 0.0]);
        assert_eq!(track.sample(1500.0), [10.0, -140.0]);
        assert_eq!(track.sample(3000.0), [-20.0, -320.0]);
        assert_eq!(track.sample(9000.0), [-20.0, -320.0]);
    }

    #[test]
    fn test_float_track_loops() {
        let track = float_track(3000);
        assert_eq!(track.sample(750.0), [3.0, -2.0]);
        assert_eq!(track.sample(2250.0), [2.0, -3.0]);
        assert_eq!(track.sample(3750.0), [3.0, -2.0]);
        assert!(track.is_infinite());
    }

    #[test]
    fn test_float_delay_holds_origin() {
        let mut ids = slotmap::SlotMap::<ParticleId, ()>::with_key();
        let particle = Particle::new(
            ids.insert(()),
            [100.0, 40.0],
            &float_track(3000),
            1200,
            Timestamp::zero(),
        );
        assert_eq!(particle.position(Timestamp::from_millis(1000)), [100.0, 40.0]);
        // 750ms into the loop: offset (3, -2) moves up by 2
        assert_eq!(particle.position(Timestamp::from_millis(1950)), [103.0, 42.0]);
    }
}
