// Motor control module for the four-wheel skid-steer base
//
// Provides:
// - Motion table (movement intent -> per-wheel force)
// - Wheel actuators over two binary control lines each
// - Serial line bridge and in-memory lines
// - High-level motion controller API

pub mod bridge;
mod driver;
pub mod kinematics;
pub mod lines;
pub mod wheel;

pub use bridge::{BridgeError, BridgeLine, LineBridge, SharedBridge};
pub use driver::MotionController;
pub use kinematics::{MovementIntent, WheelForce, WheelForces, forces_for, forces_for_code};
pub use lines::{LinePair, LineProbe, SimLine, Wiring, WiringError};
pub use wheel::{WheelActuator, WheelIdentity};
