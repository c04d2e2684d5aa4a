//! Async driver for the MS5611 and MS5607 barometric pressure sensors.
//!
//! The driver reads the factory calibration (PROM) once per session, triggers
//! timed pressure/temperature conversions and applies the datasheet
//! compensation, including the second-order correction below 20 °C.
//!
//! ```ignore
//! let mut ms56xx = Ms56xx::new(i2c, CooperativeWait::default());
//! ms56xx.begin(Config::default()).await?;
//!
//! let mut reading = Reading::default();
//! ms56xx.read(&mut reading, DEFAULT_REFERENCE_TEMPERATURE).await?;
//! ```
#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

// must stay first, the logging macros are used by every other module
mod fmt;

pub mod compensation;
pub mod driver;
pub mod error;
pub mod sensor;

pub use compensation::{Calibration, Variant, DEFAULT_REFERENCE_TEMPERATURE};
pub use driver::ms56xx::{Address, Config, Ms56xx, Oversampling, Reading};
pub use driver::settle::{CooperativeWait, SettleWait, YieldMode};
pub use error::Error;
pub use sensor::Sensor;
