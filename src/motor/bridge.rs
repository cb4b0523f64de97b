// Serial line bridge
//
// A small microcontroller mirrors an 8-bit line mask onto its GPIO pins.
// Frame format: [0xFF, 0xFF, mask, !mask]
// Bit n of mask drives control line n.

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};
use tracing::{debug, info};

use super::lines::LINE_COUNT;

/// Default serial configuration for the bridge
pub const DEFAULT_BAUDRATE: u32 = 115_200;
pub const DEFAULT_TIMEOUT_MS: u64 = 100;

/// Frame header bytes
const HEADER: [u8; 2] = [0xFF, 0xFF];

/// Error types for line bridge communication
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line} does not exist on the bridge")]
    InvalidLine { line: u8 },

    #[error("Line bridge state lock poisoned")]
    Poisoned,
}

impl embedded_hal::digital::Error for BridgeError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Build a frame for a line mask
pub fn frame(mask: u8) -> [u8; 4] {
    [HEADER[0], HEADER[1], mask, !mask]
}

/// Serial connection to the line bridge plus a shadow copy of the line mask
pub struct LineBridge {
    port: Box<dyn Write + Send>,
    mask: u8,
}

impl LineBridge {
    /// Open the bridge on a serial port
    pub fn open(port_name: &str) -> Result<Self> {
        Self::open_with_baudrate(port_name, DEFAULT_BAUDRATE)
    }

    /// Open with custom baudrate
    pub fn open_with_baudrate(port_name: &str, baudrate: u32) -> Result<Self> {
        info!("Opening line bridge on {} @ {} baud", port_name, baudrate);
        let port = serialport::new(port_name, baudrate)
            .timeout(Duration::from_millis(DEFAULT_TIMEOUT_MS))
            .open()?;

        Self::from_writer(port)
    }

    /// Use any byte sink as the bridge link. All lines start inactive.
    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Result<Self> {
        let mut bridge = Self {
            port: Box::new(writer),
            mask: 0,
        };
        bridge.send(0)?;
        Ok(bridge)
    }

    /// Current line mask
    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// Set one line and push the full frame
    ///
    /// The shadow mask only changes once the frame has been written.
    pub fn write_line(&mut self, line: u8, high: bool) -> Result<()> {
        if line >= LINE_COUNT {
            return Err(BridgeError::InvalidLine { line });
        }

        let bit = 1u8 << line;
        let mask = if high { self.mask | bit } else { self.mask & !bit };
        self.send(mask)
    }

    fn send(&mut self, mask: u8) -> Result<()> {
        debug!("Line mask {:08b}", mask);
        self.port.write_all(&frame(mask))?;
        self.port.flush()?;
        self.mask = mask;
        Ok(())
    }

    /// Share the bridge so each control line can be handed out as a pin
    pub fn shared(self) -> SharedBridge {
        SharedBridge(Arc::new(Mutex::new(self)))
    }
}

/// Line bridge shared between all `BridgeLine`s
#[derive(Clone)]
pub struct SharedBridge(Arc<Mutex<LineBridge>>);

impl SharedBridge {
    pub fn line(&self, line: u8) -> BridgeLine {
        BridgeLine {
            bridge: self.clone(),
            line,
        }
    }

    pub fn mask(&self) -> Result<u8> {
        let bridge = self.0.lock().map_err(|_| BridgeError::Poisoned)?;
        Ok(bridge.mask())
    }

    fn write_line(&self, line: u8, high: bool) -> Result<()> {
        let mut bridge = self.0.lock().map_err(|_| BridgeError::Poisoned)?;
        bridge.write_line(line, high)
    }
}

/// One control line on the bridge
pub struct BridgeLine {
    bridge: SharedBridge,
    line: u8,
}

impl ErrorType for BridgeLine {
    type Error = BridgeError;
}

impl OutputPin for BridgeLine {
    fn set_low(&mut self) -> Result<()> {
        self.bridge.write_line(self.line, false)
    }

    fn set_high(&mut self) -> Result<()> {
        self.bridge.write_line(self.line, true)
    }
}
