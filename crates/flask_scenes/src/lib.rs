//! Flask Scenes
//!
//! The two physics demonstrations built on `flask_animation`:
//!
//! - [`buoyancy`]: a four-step story blended along an eased timeline, with
//!   next/prev/auto-play navigation
//! - [`evaporation`]: a fixed-tick particle scheduler moving liquid particles
//!   into a vapor cloud
//!
//! A [`DemoSession`] owns the state of both for one mounted page.
//!
//! # Example
//!
//! ```
//! use flask_animation::Timestamp;
//! use flask_scenes::buoyancy::ScenePainter;
//! use flask_scenes::evaporation::VisualLog;
//! use flask_scenes::{DemoSession, SceneConfig};
//!
//! let mut session = DemoSession::new(
//!     &SceneConfig::default(),
//!     7,
//!     ScenePainter::new(),
//!     VisualLog::new(),
//! );
//! session.mount(Timestamp::zero());
//! session.next_step(Timestamp::zero());
//!
//! let mut now = 0;
//! while session.wants_frame() {
//!     session.frame(Timestamp::from_millis(now));
//!     now += 16;
//! }
//! assert_eq!(session.buoyancy().current(), 1);
//! ```

pub mod buoyancy;
pub mod config;
pub mod error;
pub mod evaporation;
mod session;

pub use config::{BuoyancyConfig, EvaporationConfig, SceneConfig, SpawnArea};
pub use error::{ConfigError, Result};
pub use session::DemoSession;
