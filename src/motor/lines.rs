// Control line wiring and in-memory lines for simulation

use std::convert::Infallible;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::{ErrorType, OutputPin};

use super::wheel::WheelIdentity;

/// Number of control lines on the line bridge
pub const LINE_COUNT: u8 = 8;

/// The two H-bridge inputs of one wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePair {
    pub a: u8,
    pub b: u8,
}

impl LinePair {
    pub const fn new(a: u8, b: u8) -> Self {
        Self { a, b }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WiringError {
    #[error("Line {line} for {wheel:?} is out of range")]
    OutOfRange { wheel: WheelIdentity, line: u8 },

    #[error("Line {line} is used by both {first:?} and {second:?}")]
    SharedLine {
        line: u8,
        first: WheelIdentity,
        second: WheelIdentity,
    },

    #[error("Expected 8 comma-separated line numbers, got {0:?}")]
    Malformed(String),
}

/// Fixed assignment of control lines to wheels, in FL, FR, BL, BR order
///
/// Every line belongs to exactly one wheel input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wiring {
    pairs: [LinePair; 4],
}

impl Wiring {
    pub fn new(pairs: [LinePair; 4]) -> Result<Self, WiringError> {
        let mut owner: [Option<WheelIdentity>; LINE_COUNT as usize] = [None; LINE_COUNT as usize];

        for (wheel, pair) in WheelIdentity::ALL.into_iter().zip(pairs) {
            for line in [pair.a, pair.b] {
                if line >= LINE_COUNT {
                    return Err(WiringError::OutOfRange { wheel, line });
                }
                if let Some(first) = owner[line as usize] {
                    return Err(WiringError::SharedLine {
                        line,
                        first,
                        second: wheel,
                    });
                }
                owner[line as usize] = Some(wheel);
            }
        }

        Ok(Self { pairs })
    }

    pub fn pair(&self, wheel: WheelIdentity) -> LinePair {
        self.pairs[wheel.index()]
    }
}

/// Parses `a,b,a,b,a,b,a,b` in FL, FR, BL, BR order
impl FromStr for Wiring {
    type Err = WiringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines = s
            .split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| WiringError::Malformed(s.to_string()))?;

        let [a0, b0, a1, b1, a2, b2, a3, b3] = lines[..] else {
            return Err(WiringError::Malformed(s.to_string()));
        };

        Self::new([
            LinePair::new(a0, b0),
            LinePair::new(a1, b1),
            LinePair::new(a2, b2),
            LinePair::new(a3, b3),
        ])
    }
}

impl Default for Wiring {
    fn default() -> Self {
        Self {
            pairs: [
                LinePair::new(0, 1),
                LinePair::new(2, 3),
                LinePair::new(4, 5),
                LinePair::new(6, 7),
            ],
        }
    }
}

/// In-memory output line
pub struct SimLine {
    level: Arc<AtomicBool>,
}

/// Read side of a `SimLine`
#[derive(Debug, Clone)]
pub struct LineProbe {
    level: Arc<AtomicBool>,
}

impl SimLine {
    pub fn new() -> (Self, LineProbe) {
        let level = Arc::new(AtomicBool::new(false));
        (
            Self {
                level: level.clone(),
            },
            LineProbe { level },
        )
    }
}

impl LineProbe {
    pub fn is_high(&self) -> bool {
        self.level.load(Ordering::SeqCst)
    }
}

impl ErrorType for SimLine {
    type Error = Infallible;
}

impl OutputPin for SimLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.level.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level.store(true, Ordering::SeqCst);
        Ok(())
    }
}
