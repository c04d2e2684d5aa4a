use core::fmt;

use embedded_hal::i2c::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// No acknowledge on the probe transaction in `begin`.
    NotPresent,
    /// Transport failure during a command or data phase.
    ///
    /// `I2c::read` either fills the whole buffer or fails, so a short read
    /// also ends up here.
    Bus(ErrorKind),
    /// One of the PROM registers C1..C6 read as zero.
    InvalidCalibration,
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::Bus(kind)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotPresent => f.write_str("device did not acknowledge its address"),
            Error::Bus(kind) => write!(f, "bus error: {}", kind),
            Error::InvalidCalibration => f.write_str("PROM calibration register is zero"),
        }
    }
}
