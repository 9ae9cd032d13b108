//! PMS5003 particulate sensor over a UART
//!
//! ## Frame Format
//!
//! The sensor streams one 32 byte frame roughly every second:
//!
//! ```text
//! ┌──────┬──────┬────────────┬─────────────────────────┬──────────┐
//! │ 0x42 │ 0x4D │ length (28)│ 13 × u16 data words     │ checksum │
//! └──────┴──────┴────────────┴─────────────────────────┴──────────┘
//!    all multi-byte fields big-endian
//! ```
//!
//! | Word | Contents |
//! |------|----------|
//! | 0–2 | PM1.0 / PM2.5 / PM10, standard particle (CF=1), µg/m³ |
//! | 3–5 | PM1.0 / PM2.5 / PM10, atmospheric environment, µg/m³ |
//! | 6–11 | particles >0.3, >0.5, >1.0, >2.5, >5.0, >10 µm per 0.1 L |
//! | 12 | reserved |
//!
//! The checksum is the wrapping 16-bit sum of the 30 bytes before it.
//!
//! ## Failure Classes
//!
//! - No start of frame before the read deadline, or the port times out
//!   mid-frame: `ReadTimeout` (transient)
//! - Checksum disagrees: `ChecksumMismatch` (transient)
//! - A length field other than 28: `BadFrame` (fatal)
//! - Any other I/O error: `Bus` (fatal)
//!
//! Recovering from the transient ones is the sampler's job; [`Pms5003::reset`]
//! pulses the reset line and throws away buffered input so the next read
//! resynchronises on a fresh frame.

use std::io::{self, Read};
use std::thread;
use std::time::{Duration, Instant};

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use shopsense_core::errors::{DeviceKind, SensorError};
use shopsense_core::readings::ParticulateReading;
use shopsense_core::traits::ParticulateSensor;

use crate::errors::{bus_fault, DeviceError};
use crate::gpio::SysfsGpio;

/// Start of frame marker
pub const START_OF_FRAME: [u8; 2] = [0x42, 0x4D];
/// Length field value: 13 data words plus the checksum
pub const DATA_LENGTH: u16 = 28;
/// Whole frame including marker, length and checksum
pub const FRAME_LEN: usize = 32;

/// UART speed
pub const BAUD_RATE: u32 = 9600;
/// Default serial device on a Raspberry Pi
pub const DEFAULT_PORT: &str = "/dev/ttyAMA0";
/// Deadline for finding the start of a frame
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);
/// How long the reset line is held, and the settle time either side
pub const DEFAULT_RESET_HOLD: Duration = Duration::from_millis(100);

/// Per-read timeout on the serial port itself
const PORT_TIMEOUT: Duration = Duration::from_secs(4);

/// Decode one complete frame
pub fn decode_frame(frame: &[u8; FRAME_LEN]) -> Result<ParticulateReading, SensorError> {
    if frame[..2] != START_OF_FRAME {
        return Err(SensorError::BadFrame {
            reason: "missing start of frame",
        });
    }
    if u16::from_be_bytes([frame[2], frame[3]]) != DATA_LENGTH {
        return Err(SensorError::BadFrame {
            reason: "unexpected frame length",
        });
    }

    let computed = checksum(&frame[..FRAME_LEN - 2]);
    let expected = u16::from_be_bytes([frame[FRAME_LEN - 2], frame[FRAME_LEN - 1]]);
    if computed != expected {
        return Err(SensorError::ChecksumMismatch { expected, computed });
    }

    let word = |i: usize| u16::from_be_bytes([frame[4 + 2 * i], frame[5 + 2 * i]]);
    Ok(ParticulateReading {
        standard: [word(0), word(1), word(2)],
        atmospheric: [word(3), word(4), word(5)],
        counts_per_dl: [word(6), word(7), word(8), word(9), word(10), word(11)],
    })
}

/// Wrapping 16-bit byte sum
pub fn checksum(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |sum, &b| sum.wrapping_add(u16::from(b)))
}

/// Byte stream the sensor is attached to
pub trait SerialLine: Read {
    /// Drop anything received but not yet read
    fn discard_input(&mut self) -> io::Result<()>;
}

impl SerialLine for Box<dyn SerialPort> {
    fn discard_input(&mut self) -> io::Result<()> {
        self.clear(ClearBuffer::Input)?;
        Ok(())
    }
}

/// PMS5003 driver
pub struct Pms5003<S> {
    port: S,
    reset_line: Option<SysfsGpio>,
    read_timeout: Duration,
    reset_hold: Duration,
}

impl Pms5003<Box<dyn SerialPort>> {
    /// Open the UART at 9600 8N1, raise the enable and reset lines and reset the sensor
    pub fn open(
        path: &str,
        enable_line: Option<SysfsGpio>,
        reset_line: Option<SysfsGpio>,
    ) -> Result<Self, DeviceError> {
        let port = serialport::new(path, BAUD_RATE)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(PORT_TIMEOUT)
            .open()
            .map_err(|source| DeviceError::Serial {
                path: path.to_owned(),
                source,
            })?;

        if let Some(mut enable) = enable_line {
            enable.set(true).map_err(|source| DeviceError::Gpio {
                pin: enable.pin(),
                source,
            })?;
        }

        let mut sensor = Self::new(port, reset_line);
        if let Some(line) = sensor.reset_line.as_mut() {
            line.set(true).map_err(|source| DeviceError::Gpio {
                pin: line.pin(),
                source,
            })?;
        }
        sensor.reset()?;

        log::info!("PMS5003 opened on {path}");
        Ok(sensor)
    }
}

impl<S: SerialLine> Pms5003<S> {
    /// Wrap an already open line
    pub fn new(port: S, reset_line: Option<SysfsGpio>) -> Self {
        Self {
            port,
            reset_line,
            read_timeout: DEFAULT_READ_TIMEOUT,
            reset_hold: DEFAULT_RESET_HOLD,
        }
    }

    /// Deadline for finding the start of a frame
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Reset pulse width
    pub fn reset_hold(mut self, hold: Duration) -> Self {
        self.reset_hold = hold;
        self
    }

    /// Read the next complete frame from the stream
    pub fn read_frame(&mut self) -> Result<ParticulateReading, SensorError> {
        let deadline = Instant::now() + self.read_timeout;
        self.sync(deadline)?;

        let mut frame = [0u8; FRAME_LEN];
        frame[..2].copy_from_slice(&START_OF_FRAME);
        self.fill(&mut frame[2..4])?;

        let length = u16::from_be_bytes([frame[2], frame[3]]);
        if length != DATA_LENGTH {
            log::error!("PMS5003 frame length {length}, expected {DATA_LENGTH}");
            return Err(SensorError::BadFrame {
                reason: "unexpected frame length",
            });
        }

        self.fill(&mut frame[4..])?;
        decode_frame(&frame)
    }

    /// Consume bytes until the start of frame marker has been seen
    fn sync(&mut self, deadline: Instant) -> Result<(), SensorError> {
        let mut matched = 0;
        let mut byte = [0u8; 1];
        loop {
            if Instant::now() > deadline {
                return Err(SensorError::ReadTimeout);
            }
            self.fill(&mut byte)?;
            if byte[0] == START_OF_FRAME[matched] {
                matched += 1;
                if matched == START_OF_FRAME.len() {
                    return Ok(());
                }
            } else {
                matched = usize::from(byte[0] == START_OF_FRAME[0]);
            }
        }
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<(), SensorError> {
        self.port.read_exact(buf).map_err(|err| match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::UnexpectedEof => {
                SensorError::ReadTimeout
            }
            _ => bus_fault(DeviceKind::Particulate, "serial read failed", err),
        })
    }

    fn drive_reset(&mut self, high: bool) -> Result<(), SensorError> {
        match self.reset_line.as_mut() {
            Some(line) => line
                .set(high)
                .map_err(|err| bus_fault(DeviceKind::Particulate, "reset line write failed", err)),
            None => Ok(()),
        }
    }

    /// Borrow the underlying line
    pub fn port(&self) -> &S {
        &self.port
    }
}

impl<S: SerialLine> ParticulateSensor for Pms5003<S> {
    fn read(&mut self) -> Result<ParticulateReading, SensorError> {
        self.read_frame()
    }

    fn reset(&mut self) -> Result<(), SensorError> {
        thread::sleep(self.reset_hold);
        self.drive_reset(false)?;
        self.port
            .discard_input()
            .map_err(|err| bus_fault(DeviceKind::Particulate, "serial flush failed", err))?;
        thread::sleep(self.reset_hold);
        self.drive_reset(true)
    }
}
