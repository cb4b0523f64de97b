// Addresses, topics, line bridge configuration

use crate::motor::Wiring;

// HTTP command surface (the robot's access point hands out the address)
pub const HTTP_ADDR: &str = "0.0.0.0:80";

// Zenoh topics
pub const TOPIC_CMD_MOTION: &str = "robot/cmd/motion"; // commands
pub const TOPIC_RT_MOTION: &str = "robot/rt/motion"; // acknowledgments

// Serial port for the line bridge
pub const BRIDGE_PORT: &str = "/dev/ttyUSB0";

/// Everything the runtime needs to start
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub http_addr: String,
    pub bridge_port: String,
    pub baudrate: u32,
    pub wiring: Wiring,
    /// Drive in-memory lines instead of the line bridge
    pub simulate: bool,
    /// Also accept commands on the zenoh command topic
    pub zenoh: bool,
}
