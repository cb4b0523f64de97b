// One wheel motor driven through two binary control lines (H-bridge inputs)

use embedded_hal::digital::OutputPin;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::kinematics::WheelForce;

/// Wheel positions on the chassis, in actuation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelIdentity {
    FrontLeft,
    FrontRight,
    BackLeft,
    BackRight,
}

impl WheelIdentity {
    pub const ALL: [WheelIdentity; 4] = [
        WheelIdentity::FrontLeft,
        WheelIdentity::FrontRight,
        WheelIdentity::BackLeft,
        WheelIdentity::BackRight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Drives a single wheel motor
///
/// Line A active drives the wheel forward, line B active drives it backward,
/// both inactive lets it stop. Both lines are never active together.
pub struct WheelActuator<P> {
    identity: WheelIdentity,
    line_a: P,
    line_b: P,
    force: WheelForce,
}

impl<P: OutputPin> WheelActuator<P> {
    /// Take ownership of the two lines and drive them both inactive
    pub fn new(identity: WheelIdentity, mut line_a: P, mut line_b: P) -> Result<Self, P::Error> {
        line_a.set_low()?;
        line_b.set_low()?;

        Ok(Self {
            identity,
            line_a,
            line_b,
            force: WheelForce::Stopped,
        })
    }

    /// Set the drive direction for this wheel
    pub fn set_force(&mut self, force: WheelForce) -> Result<(), P::Error> {
        debug!("{:?} -> {:?}", self.identity, force);

        // Release before activate
        match force {
            WheelForce::Forward => {
                self.line_b.set_low()?;
                self.line_a.set_high()?;
            }
            WheelForce::Backward => {
                self.line_a.set_low()?;
                self.line_b.set_high()?;
            }
            WheelForce::Stopped => {
                self.line_a.set_low()?;
                self.line_b.set_low()?;
            }
        }

        self.force = force;
        Ok(())
    }

    /// Last successfully commanded force
    pub fn force(&self) -> WheelForce {
        self.force
    }

    pub fn identity(&self) -> WheelIdentity {
        self.identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motor::lines::{LineProbe, SimLine};
    use std::convert::Infallible;
    use std::sync::{Arc, Mutex};

    fn actuator() -> (WheelActuator<SimLine>, LineProbe, LineProbe) {
        let (a, probe_a) = SimLine::new();
        let (b, probe_b) = SimLine::new();
        let actuator = WheelActuator::new(WheelIdentity::FrontLeft, a, b).unwrap();
        (actuator, probe_a, probe_b)
    }

    #[test]
    fn test_starts_stopped() {
        let (actuator, a, b) = actuator();
        assert_eq!(actuator.force(), WheelForce::Stopped);
        assert!(!a.is_high());
        assert!(!b.is_high());
    }

    #[test]
    fn test_line_levels() {
        let (mut actuator, a, b) = actuator();

        actuator.set_force(WheelForce::Forward).unwrap();
        assert_eq!((a.is_high(), b.is_high()), (true, false));

        actuator.set_force(WheelForce::Backward).unwrap();
        assert_eq!((a.is_high(), b.is_high()), (false, true));

        actuator.set_force(WheelForce::Stopped).unwrap();
        assert_eq!((a.is_high(), b.is_high()), (false, false));
        assert_eq!(actuator.force(), WheelForce::Stopped);
    }

    #[test]
    fn test_idempotent() {
        let (mut actuator, a, b) = actuator();
        actuator.set_force(WheelForce::Backward).unwrap();
        actuator.set_force(WheelForce::Backward).unwrap();
        assert_eq!((a.is_high(), b.is_high()), (false, true));
        assert_eq!(actuator.force(), WheelForce::Backward);
    }

    /// Line sharing one level pair with its partner, flags any moment both are high
    struct PairedLine {
        levels: Arc<Mutex<([bool; 2], bool)>>,
        slot: usize,
    }

    impl embedded_hal::digital::ErrorType for PairedLine {
        type Error = Infallible;
    }

    impl OutputPin for PairedLine {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.levels.lock().unwrap().0[self.slot] = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            let mut guard = self.levels.lock().unwrap();
            guard.0[self.slot] = true;
            if guard.0 == [true, true] {
                guard.1 = true;
            }
            Ok(())
        }
    }

    #[test]
    fn test_never_both_active() {
        let levels = Arc::new(Mutex::new(([false; 2], false)));
        let a = PairedLine {
            levels: levels.clone(),
            slot: 0,
        };
        let b = PairedLine {
            levels: levels.clone(),
            slot: 1,
        };
        let mut actuator = WheelActuator::new(WheelIdentity::BackRight, a, b).unwrap();

        for force in [
            WheelForce::Forward,
            WheelForce::Backward,
            WheelForce::Forward,
            WheelForce::Stopped,
            WheelForce::Backward,
        ] {
            actuator.set_force(force).unwrap();
        }

        assert!(!levels.lock().unwrap().1, "lines A and B were active together");
    }

    #[test]
    fn test_identity_order() {
        for (i, id) in WheelIdentity::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }
}
