//! Visual side effects of the evaporation scheduler

use super::particle::{DeparturePath, ParticleId};
use super::vapor::VaporId;

/// Receives the visual changes the scheduler decides on.
///
/// Implementations only draw; all timing lives in the scheduler.
pub trait ParticleVisuals {
    fn create_particle(&mut self, id: ParticleId, origin: [f32; 2]);
    fn remove_particle(&mut self, id: ParticleId);
    fn begin_departure(&mut self, id: ParticleId, path: &DeparturePath);
    fn end_departure(&mut self, id: ParticleId);
    fn spawn_vapor(&mut self, id: VaporId, position: [f32; 2], opacity: f32);
    fn fade_vapor(&mut self, id: VaporId);
    fn remove_vapor(&mut self, id: VaporId);
    /// Sun and heat waves on or off
    fn set_heat(&mut self, active: bool);
}

#[derive(Clone, Debug, PartialEq)]
pub enum VisualEvent {
    CreateParticle { id: ParticleId, origin: [f32; 2] },
    RemoveParticle { id: ParticleId },
    BeginDeparture { id: ParticleId, path: DeparturePath },
    EndDeparture { id: ParticleId },
    SpawnVapor { id: VaporId, position: [f32; 2], opacity: f32 },
    FadeVapor { id: VaporId },
    RemoveVapor { id: VaporId },
    SetHeat { active: bool },
}

/// Records every visual change in order
#[derive(Debug, Default)]
pub struct VisualLog {
    events: Vec<VisualEvent>,
}

impl VisualLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[VisualEvent] {
        &self.events
    }

    pub fn take(&mut self) -> Vec<VisualEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn count(&self, matches: impl Fn(&VisualEvent) -> bool) -> usize {
        self.events.iter().filter(|e| matches(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl ParticleVisuals for VisualLog {
    fn create_particle(&mut self, id: ParticleId, origin: [f32; 2]) {
        self.events.push(VisualEvent::CreateParticle { id, origin });
    }

    fn remove_particle(&mut self, id: ParticleId) {
        self.events.push(VisualEvent::RemoveParticle { id });
    }

    fn begin_departure(&mut self, id: ParticleId, path: &DeparturePath) {
        self.events.push(VisualEvent::BeginDeparture { id, path: *path });
    }

    fn end_departure(&mut self, id: ParticleId) {
        self.events.push(VisualEvent::EndDeparture { id });
    }

    fn spawn_vapor(&mut self, id: VaporId, position: [f32; 2], opacity: f32) {
        self.events.push(VisualEvent::SpawnVapor {
            id,
            position,
            opacity,
        });
    }

    fn fade_vapor(&mut self, id: VaporId) {
        self.events.push(VisualEvent::FadeVapor { id });
    }

    fn remove_vapor(&mut self, id: VaporId) {
        self.events.push(VisualEvent::RemoveVapor { id });
    }

    fn set_heat(&mut self, active: bool) {
        self.events.push(VisualEvent::SetHeat { active });
    }
}
