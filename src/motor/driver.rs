// Motion controller for the four-wheel base
//
// Combines the motion table and four wheel actuators: every command
// overwrites all four wheel forces.

use embedded_hal::digital::OutputPin;
use tracing::{error, info, warn};

use super::bridge::{BridgeError, BridgeLine, SharedBridge};
use super::kinematics::{MovementIntent, WheelForce, WheelForces, forces_for};
use super::lines::{LineProbe, SimLine, Wiring};
use super::wheel::{WheelActuator, WheelIdentity};

/// High-level motion controller owning one actuator per wheel
pub struct MotionController<P: OutputPin> {
    wheels: [WheelActuator<P>; 4], // [front_left, front_right, back_left, back_right]
}

impl<P: OutputPin> MotionController<P> {
    /// Create from actuators given in FL, FR, BL, BR order
    ///
    /// # Panics
    /// If an actuator's identity does not match its position. Wiring is fixed
    /// at startup, so this is a construction bug rather than a runtime fault.
    pub fn new(wheels: [WheelActuator<P>; 4]) -> Self {
        for (wheel, expected) in wheels.iter().zip(WheelIdentity::ALL) {
            assert_eq!(
                wheel.identity(),
                expected,
                "wheel actuators must be in FL, FR, BL, BR order"
            );
        }
        Self { wheels }
    }

    /// Drive the base according to a movement intent
    ///
    /// Wheels are written in FL, FR, BL, BR order. Returns the applied forces.
    /// If any write fails, every wheel is stopped before the error is returned.
    pub fn apply_motion(&mut self, intent: MovementIntent) -> Result<WheelForces, P::Error> {
        let forces = forces_for(intent);
        info!("{}", intent.name());

        if let Err(e) = self.set_wheel_forces(forces) {
            error!("Failed to apply {}: {:?}, stopping all wheels", intent.name(), e);
            self.stop_all();
            return Err(e);
        }
        Ok(forces)
    }

    /// Drive the base from a raw intent code (unknown codes stop the base)
    pub fn apply_code(&mut self, code: u8) -> Result<WheelForces, P::Error> {
        let intent = MovementIntent::from_code(code);
        if intent == MovementIntent::Stop && code != MovementIntent::Stop as u8 {
            warn!("Unknown intent code {}, stopping", code);
        }
        self.apply_motion(intent)
    }

    /// Stop all wheels
    pub fn stop(&mut self) -> Result<WheelForces, P::Error> {
        self.apply_motion(MovementIntent::Stop)
    }

    fn set_wheel_forces(&mut self, forces: WheelForces) -> Result<(), P::Error> {
        for (wheel, force) in self.wheels.iter_mut().zip(forces.as_array()) {
            wheel.set_force(force)?;
        }
        Ok(())
    }

    /// Stop every wheel, carrying on past failures
    fn stop_all(&mut self) {
        for wheel in &mut self.wheels {
            if let Err(e) = wheel.set_force(WheelForce::Stopped) {
                warn!("Failed to stop {:?}: {:?}", wheel.identity(), e);
            }
        }
    }

    /// Last commanded force of every wheel
    pub fn forces(&self) -> WheelForces {
        let [fl, fr, bl, br] = &self.wheels;
        WheelForces::new(fl.force(), fr.force(), bl.force(), br.force())
    }

    pub fn actuator(&self, wheel: WheelIdentity) -> &WheelActuator<P> {
        &self.wheels[wheel.index()]
    }
}

impl MotionController<SimLine> {
    /// Controller on in-memory lines
    ///
    /// Probes are returned per wheel as [line A, line B] in FL, FR, BL, BR order.
    pub fn simulated() -> (Self, [[LineProbe; 2]; 4]) {
        let mut probes = Vec::with_capacity(4);
        let wheels = WheelIdentity::ALL.map(|identity| {
            let (a, probe_a) = SimLine::new();
            let (b, probe_b) = SimLine::new();
            probes.push([probe_a, probe_b]);
            match WheelActuator::new(identity, a, b) {
                Ok(wheel) => wheel,
                Err(never) => match never {},
            }
        });

        let probes: [[LineProbe; 2]; 4] = match probes.try_into() {
            Ok(probes) => probes,
            Err(_) => unreachable!("one probe pair per wheel"),
        };

        (Self::new(wheels), probes)
    }
}

impl MotionController<BridgeLine> {
    /// Controller on a serial line bridge with the given wiring
    pub fn bridged(bridge: &SharedBridge, wiring: &Wiring) -> Result<Self, BridgeError> {
        info!("Initializing wheels on line bridge: {:?}", wiring);

        let mut wheels = Vec::with_capacity(4);
        for identity in WheelIdentity::ALL {
            let pair = wiring.pair(identity);
            wheels.push(WheelActuator::new(
                identity,
                bridge.line(pair.a),
                bridge.line(pair.b),
            )?);
        }

        let wheels: [WheelActuator<BridgeLine>; 4] = match wheels.try_into() {
            Ok(wheels) => wheels,
            Err(_) => unreachable!("one actuator per wheel"),
        };

        info!("Wheels initialized, all stopped");
        Ok(Self::new(wheels))
    }
}

impl<P: OutputPin> Drop for MotionController<P> {
    fn drop(&mut self) {
        // Try to stop wheels when the controller is dropped
        self.stop_all();
    }
}
