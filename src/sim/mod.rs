//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (course generation)
//! - Stable iteration order (by index)
//! - No rendering or platform dependencies

pub mod body;
pub mod collider;
pub mod course;
pub mod draw;
pub mod engine;
pub mod input;
pub mod level;
pub mod platform;
pub mod policy;
pub mod scenario;
pub mod state;
pub mod stepper;

pub use body::{Body, PoseSample};
pub use collider::{ColliderCatalog, ColliderId, ColliderKind, ColliderProxy};
pub use course::{Course, CourseAssets};
pub use draw::{DrawInstance, DrawSets, Drawable, MaterialHandle, ShapeHandle, instance_bytes};
pub use engine::Engine;
pub use input::{Control, InputCollector, InputState};
pub use level::{BoostPad, Level};
pub use platform::PlatformQuad;
pub use scenario::Scenario;
pub use state::{GameEvent, GamePhase, GameState, World};
pub use stepper::{StepReport, Steppable, Stepper};
