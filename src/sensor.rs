//! Name and error callback of a sensor, handed to the driver by the
//! application. The driver never calls the handler itself; the code that
//! schedules reads decides when a failure is worth reporting.

use crate::error::Error;

pub type ErrorHandler = fn(&str, Error);

#[derive(Clone, Copy)]
pub struct Sensor {
    name: &'static str,
    on_error: Option<ErrorHandler>,
}

impl Sensor {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            on_error: None,
        }
    }

    pub const fn with_error_handler(mut self, handler: ErrorHandler) -> Self {
        self.on_error = Some(handler);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn report(&self, error: Error) {
        if let Some(handler) = self.on_error {
            handler(self.name, error);
        } else {
            debug!("unhandled sensor error");
        }
    }
}

impl Default for Sensor {
    fn default() -> Self {
        Self::new("MS56XX")
    }
}

impl core::fmt::Debug for Sensor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Sensor")
            .field("name", &self.name)
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicUsize, Ordering};

    static REPORTED: AtomicUsize = AtomicUsize::new(0);

    fn count_not_present(name: &str, error: Error) {
        assert_eq!(name, "baro");
        assert_eq!(error, Error::NotPresent);
        REPORTED.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn report_calls_handler_with_name() {
        let sensor = Sensor::new("baro").with_error_handler(count_not_present);
        sensor.report(Error::NotPresent);
        sensor.report(Error::NotPresent);
        assert_eq!(REPORTED.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn report_without_handler_is_silent() {
        let sensor = Sensor::default();
        assert_eq!(sensor.name(), "MS56XX");
        sensor.report(Error::InvalidCalibration);
    }
}
