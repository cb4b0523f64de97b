// Payloads exchanged with command sources

use serde::{Deserialize, Serialize};

use crate::motor::MovementIntent;

// Command from teleop/scripts -> runtime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MotionCommand {
    pub action: MovementIntent,
}

// Acknowledgment runtime -> command source, `{"action":"forward"}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MotionAck {
    pub action: String,
}

impl MotionAck {
    /// Ack carrying the command name exactly as the client sent it
    pub fn echo(action: &str) -> Self {
        Self {
            action: action.to_string(),
        }
    }
}

impl From<MovementIntent> for MotionAck {
    fn from(intent: MovementIntent) -> Self {
        Self::echo(intent.name())
    }
}

/// Error body, `{"error":"Not Found"}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorReply {
    pub error: String,
}

impl ErrorReply {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new("Not Found")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ack_payload() {
        let ack = MotionAck::from(MovementIntent::Forward);
        assert_eq!(serde_json::to_string(&ack).unwrap(), r#"{"action":"forward"}"#);

        let ack = MotionAck::from(MovementIntent::DiagBackwardLeft);
        assert_eq!(serde_json::to_string(&ack).unwrap(), r#"{"action":"backward_left"}"#);
    }

    #[test]
    fn test_echo_keeps_legacy_name() {
        assert_eq!(
            serde_json::to_string(&MotionAck::echo("left")).unwrap(),
            r#"{"action":"left"}"#
        );
    }

    #[test]
    fn test_not_found_payload() {
        assert_eq!(
            serde_json::to_string(&ErrorReply::not_found()).unwrap(),
            r#"{"error":"Not Found"}"#
        );
    }

    #[test]
    fn test_command_accepts_legacy_names() {
        let cmd: MotionCommand = serde_json::from_str(r#"{"action":"right"}"#).unwrap();
        assert_eq!(cmd.action, MovementIntent::RotateRight);

        let cmd: MotionCommand = serde_json::from_str(r#"{"action":"strafe_left"}"#).unwrap();
        assert_eq!(cmd.action, MovementIntent::StrafeLeft);
    }

    #[test]
    fn test_command_rejects_unknown_action() {
        assert!(serde_json::from_str::<MotionCommand>(r#"{"action":"jump"}"#).is_err());
    }
}
