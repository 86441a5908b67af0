//! Evaporation demonstration
//!
//! Liquid particles leave the surface one per tick and condense into vapor
//! near the top of the scene.

mod painter;
mod particle;
mod scheduler;
mod vapor;
mod visuals;

pub use painter::{paint_evaporation, vapor_alpha};
pub use particle::{float_track, DeparturePath, Particle, ParticleId};
pub use scheduler::{EvaporationScheduler, EvaporationStats};
pub use vapor::{Vapor, VaporId, VaporKind, VaporPhase, VaporPool};
pub use visuals::{ParticleVisuals, VisualEvent, VisualLog};
