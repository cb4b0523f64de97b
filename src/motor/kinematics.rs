// Motion table for the four-wheel skid-steer base
// Maps a symbolic movement intent to one drive direction per wheel.

use serde::{Deserialize, Serialize};

/// Discrete movement intents the base can execute
///
/// Discriminants are the wire codes accepted by `from_code` and index the
/// motion table directly.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementIntent {
    Forward = 0,
    Backward = 1,
    StrafeLeft = 2,
    StrafeRight = 3,
    #[serde(rename = "forward_left")]
    DiagForwardLeft = 4,
    #[serde(rename = "forward_right")]
    DiagForwardRight = 5,
    #[serde(rename = "backward_left")]
    DiagBackwardLeft = 6,
    #[serde(rename = "backward_right")]
    DiagBackwardRight = 7,
    #[serde(alias = "left")]
    RotateLeft = 8,
    #[serde(alias = "right")]
    RotateRight = 9,
    Stop = 10,
}

impl MovementIntent {
    /// All intents in table order
    pub const ALL: [MovementIntent; 11] = [
        MovementIntent::Forward,
        MovementIntent::Backward,
        MovementIntent::StrafeLeft,
        MovementIntent::StrafeRight,
        MovementIntent::DiagForwardLeft,
        MovementIntent::DiagForwardRight,
        MovementIntent::DiagBackwardLeft,
        MovementIntent::DiagBackwardRight,
        MovementIntent::RotateLeft,
        MovementIntent::RotateRight,
        MovementIntent::Stop,
    ];

    /// Decode a raw wire code. Anything outside the table resolves to Stop.
    pub fn from_code(code: u8) -> Self {
        Self::ALL
            .get(code as usize)
            .copied()
            .unwrap_or(MovementIntent::Stop)
    }

    /// Decode an HTTP path segment
    ///
    /// Accepts the canonical names plus `left`/`right`, which the old
    /// two-wheel control page used for in-place turns.
    pub fn from_route(segment: &str) -> Option<Self> {
        match segment {
            "left" => Some(MovementIntent::RotateLeft),
            "right" => Some(MovementIntent::RotateRight),
            _ => Self::ALL.into_iter().find(|intent| intent.name() == segment),
        }
    }

    /// Canonical snake_case name (matches the serde representation)
    pub fn name(self) -> &'static str {
        match self {
            MovementIntent::Forward => "forward",
            MovementIntent::Backward => "backward",
            MovementIntent::StrafeLeft => "strafe_left",
            MovementIntent::StrafeRight => "strafe_right",
            MovementIntent::DiagForwardLeft => "forward_left",
            MovementIntent::DiagForwardRight => "forward_right",
            MovementIntent::DiagBackwardLeft => "backward_left",
            MovementIntent::DiagBackwardRight => "backward_right",
            MovementIntent::RotateLeft => "rotate_left",
            MovementIntent::RotateRight => "rotate_right",
            MovementIntent::Stop => "stop",
        }
    }
}

/// Drive direction commanded to a single wheel (full force or none)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelForce {
    Forward,
    Backward,
    #[default]
    Stopped,
}

impl WheelForce {
    /// +1, -1 or 0
    pub const fn signum(self) -> i8 {
        match self {
            WheelForce::Forward => 1,
            WheelForce::Backward => -1,
            WheelForce::Stopped => 0,
        }
    }
}

impl From<WheelForce> for i8 {
    fn from(force: WheelForce) -> Self {
        force.signum()
    }
}

/// Forces for all four wheels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WheelForces {
    pub front_left: WheelForce,
    pub front_right: WheelForce,
    pub back_left: WheelForce,
    pub back_right: WheelForce,
}

impl WheelForces {
    pub const fn new(
        front_left: WheelForce,
        front_right: WheelForce,
        back_left: WheelForce,
        back_right: WheelForce,
    ) -> Self {
        Self {
            front_left,
            front_right,
            back_left,
            back_right,
        }
    }

    pub const fn stopped() -> Self {
        Self::new(S, S, S, S)
    }

    /// Returns forces as array [front_left, front_right, back_left, back_right]
    pub fn as_array(&self) -> [WheelForce; 4] {
        [
            self.front_left,
            self.front_right,
            self.back_left,
            self.back_right,
        ]
    }
}

const F: WheelForce = WheelForce::Forward;
const B: WheelForce = WheelForce::Backward;
const S: WheelForce = WheelForce::Stopped;

/// Intent -> (FL, FR, BL, BR), indexed by intent discriminant
const MOTION_TABLE: [WheelForces; 11] = [
    WheelForces::new(F, F, F, F), // Forward
    WheelForces::new(B, B, B, B), // Backward
    WheelForces::new(B, F, F, B), // StrafeLeft
    WheelForces::new(F, B, B, F), // StrafeRight
    WheelForces::new(S, F, F, S), // DiagForwardLeft
    WheelForces::new(F, S, S, F), // DiagForwardRight
    WheelForces::new(S, B, B, S), // DiagBackwardLeft
    WheelForces::new(B, S, S, B), // DiagBackwardRight
    WheelForces::new(B, F, B, F), // RotateLeft
    WheelForces::new(F, B, F, B), // RotateRight
    WheelForces::new(S, S, S, S), // Stop
];

/// Look up the wheel forces for an intent
pub fn forces_for(intent: MovementIntent) -> WheelForces {
    MOTION_TABLE[intent as usize]
}

/// Look up the wheel forces for a raw wire code (unknown codes stop the base)
pub fn forces_for_code(code: u8) -> WheelForces {
    forces_for(MovementIntent::from_code(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_indexed_by_discriminant() {
        for (i, intent) in MovementIntent::ALL.iter().enumerate() {
            assert_eq!(*intent as usize, i);
            assert_eq!(MovementIntent::from_code(i as u8), *intent);
        }
    }

    #[test]
    fn test_full_table() {
        let expected = [
            (MovementIntent::Forward, [F, F, F, F]),
            (MovementIntent::Backward, [B, B, B, B]),
            (MovementIntent::StrafeLeft, [B, F, F, B]),
            (MovementIntent::StrafeRight, [F, B, B, F]),
            (MovementIntent::DiagForwardLeft, [S, F, F, S]),
            (MovementIntent::DiagForwardRight, [F, S, S, F]),
            (MovementIntent::DiagBackwardLeft, [S, B, B, S]),
            (MovementIntent::DiagBackwardRight, [B, S, S, B]),
            (MovementIntent::RotateLeft, [B, F, B, F]),
            (MovementIntent::RotateRight, [F, B, F, B]),
            (MovementIntent::Stop, [S, S, S, S]),
        ];

        for (intent, forces) in expected {
            assert_eq!(forces_for(intent).as_array(), forces, "{:?}", intent);
        }
    }

    #[test]
    fn test_unknown_codes_stop() {
        for code in 11..=u8::MAX {
            assert_eq!(MovementIntent::from_code(code), MovementIntent::Stop);
            assert_eq!(forces_for_code(code), WheelForces::stopped());
        }
    }

    #[test]
    fn test_opposite_intents_reverse_every_wheel() {
        let pairs = [
            (MovementIntent::Forward, MovementIntent::Backward),
            (MovementIntent::StrafeLeft, MovementIntent::StrafeRight),
            (MovementIntent::RotateLeft, MovementIntent::RotateRight),
            (MovementIntent::DiagForwardLeft, MovementIntent::DiagBackwardLeft),
            (MovementIntent::DiagForwardRight, MovementIntent::DiagBackwardRight),
        ];

        for (a, b) in pairs {
            let reversed = forces_for(b).as_array().map(|f| -f.signum());
            assert_eq!(forces_for(a).as_array().map(WheelForce::signum), reversed, "{:?}", a);
        }
    }

    #[test]
    fn test_rotation_is_skid_steer() {
        // Left side (FL, BL) opposes right side (FR, BR)
        let [fl, fr, bl, br] = forces_for(MovementIntent::RotateLeft).as_array();
        assert_eq!((fl, bl), (B, B));
        assert_eq!((fr, br), (F, F));
    }

    #[test]
    fn test_diagonals_drive_two_wheels() {
        for intent in [
            MovementIntent::DiagForwardLeft,
            MovementIntent::DiagForwardRight,
            MovementIntent::DiagBackwardLeft,
            MovementIntent::DiagBackwardRight,
        ] {
            let stopped = forces_for(intent)
                .as_array()
                .iter()
                .filter(|f| **f == S)
                .count();
            assert_eq!(stopped, 2, "{:?}", intent);
        }
    }

    #[test]
    fn test_route_names() {
        for intent in MovementIntent::ALL {
            assert_eq!(MovementIntent::from_route(intent.name()), Some(intent));
        }
        assert_eq!(MovementIntent::from_route("left"), Some(MovementIntent::RotateLeft));
        assert_eq!(MovementIntent::from_route("right"), Some(MovementIntent::RotateRight));
        assert_eq!(MovementIntent::from_route("jump"), None);
        assert_eq!(MovementIntent::from_route(""), None);
    }

    #[test]
    fn test_serde_names_match_route_names() {
        for intent in MovementIntent::ALL {
            let json = serde_json::to_string(&intent).unwrap();
            assert_eq!(json, format!("\"{}\"", intent.name()));
        }
        let rotate: MovementIntent = serde_json::from_str("\"left\"").unwrap();
        assert_eq!(rotate, MovementIntent::RotateLeft);
    }

    #[test]
    fn test_signum() {
        assert_eq!(i8::from(WheelForce::Forward), 1);
        assert_eq!(i8::from(WheelForce::Backward), -1);
        assert_eq!(i8::from(WheelForce::Stopped), 0);
        assert_eq!(WheelForce::default(), WheelForce::Stopped);
    }
}
