pub mod constants;
pub mod error;
pub mod math;
pub mod physics_object;

pub use constants::{BALL_STATE_LENGTH, CAR_STATE_LENGTH, SERIALIZED_LENGTH};
pub use error::{Body, Result, TelemetryError};
pub use physics_object::{PhysicsObject, Source};
