use embassy_time::{Duration, Instant};
use embedded_hal_async::i2c::{Error as _, ErrorKind, I2c};

use crate::compensation::{altitude, compensate, Calibration, Variant, COEFFICIENT_COUNT};
use crate::driver::settle::SettleWait;
use crate::error::Error;
use crate::sensor::Sensor;

// datasheet page 10
const CMD_READ_ADC: u8 = 0x00;
const CMD_READ_PROM: u8 = 0xA0;
const CMD_RESET: u8 = 0x1E;
const CMD_CONVERT_D1: u8 = 0x40;
const CMD_CONVERT_D2: u8 = 0x50;

const RESET_DELAY: Duration = Duration::from_millis(50);

// conversion times from page 3 of the datasheet, MAX column rounded up
const SETTLE_MICROS: [u64; 5] = [600, 1200, 2300, 4600, 9100];

/// I2C address, selected by the CSB pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Address {
    CsbHigh = 0x76,
    #[default]
    CsbLow = 0x77,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oversampling {
    /// ~2 ms conversion
    Low = 9,
    /// ~3 ms conversion
    Standard = 10,
    /// ~5 ms conversion
    High = 11,
    /// ~10 ms conversion
    #[default]
    UltraHigh = 12,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub address: Address,
    pub variant: Variant,
    oversampling: u8,
}

impl Config {
    pub const fn new(address: Address, variant: Variant, oversampling: Oversampling) -> Self {
        Self {
            address,
            variant,
            oversampling: oversampling as u8,
        }
    }

    /// Takes an unvalidated oversampling rank. Ranks outside 8..=12 are
    /// clamped when a conversion is started.
    pub const fn with_raw_oversampling(mut self, rank: u8) -> Self {
        self.oversampling = rank;
        self
    }

    pub const fn oversampling_rank(&self) -> u8 {
        self.oversampling
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Address::default(), Variant::default(), Oversampling::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// °C
    pub temperature: f32,
    /// Pa
    pub pressure: i32,
    /// m
    pub altitude: f32,
}

/// Index into the settle table and offset of the conversion command.
pub fn settle_index(rank: u8) -> usize {
    (rank.clamp(8, 12) - 8) as usize
}

pub fn settle_time(rank: u8) -> Duration {
    Duration::from_micros(SETTLE_MICROS[settle_index(rank)])
}

pub struct Ms56xx<I2C, W> {
    bus: I2C,
    settle: W,
    sensor: Sensor,
    config: Config,
    calibration: Calibration,
    last_result: Result<(), ErrorKind>,
    last_read: Option<Instant>,
}

impl<I2C: I2c, W: SettleWait> Ms56xx<I2C, W> {
    pub fn new(bus: I2C, settle: W) -> Self {
        Self {
            bus,
            settle,
            sensor: Sensor::default(),
            config: Config::default(),
            calibration: Calibration::empty(),
            last_result: Ok(()),
            last_read: None,
        }
    }

    pub fn with_sensor(mut self, sensor: Sensor) -> Self {
        self.sensor = sensor;
        self
    }

    /// Hands the bus back.
    pub fn release(self) -> I2C {
        self.bus
    }

    /// Probes the address in `config`, stores the configuration and loads
    /// the calibration. Nothing is stored if the device does not answer.
    pub async fn begin(&mut self, config: Config) -> Result<(), Error> {
        let address = config.address as u8;
        if self.bus.write(address, &[]).await.is_err() {
            warn!("{}: no device at {=u8:#x}", self.sensor.name(), address);
            return Err(Error::NotPresent);
        }
        self.config = config;
        self.reset(config.variant).await
    }

    /// Resets the device and reloads the PROM into a fresh table.
    ///
    /// An `Error::InvalidCalibration` still leaves every word of the table
    /// populated; readings from it are meaningless. A bus error leaves an
    /// empty table behind.
    ///
    /// `variant` only selects the scaling of this table, `config().variant`
    /// keeps the value passed to `begin`.
    pub async fn reset(&mut self, variant: Variant) -> Result<(), Error> {
        let result = self.load_calibration(variant).await;
        if let Err(Error::Bus(_)) = result {
            self.calibration = Calibration::empty();
        }
        result
    }

    async fn load_calibration(&mut self, variant: Variant) -> Result<(), Error> {
        self.command(CMD_RESET).await?;
        self.settle.settle(RESET_DELAY).await;

        let mut calibration = Calibration::new(variant);
        let mut valid = true;
        for index in 0..COEFFICIENT_COUNT {
            let raw = self.read_prom(index as u8).await?;
            calibration.apply(index, raw);
            // word 0 is reserved for the manufacturer
            if index > 0 && raw == 0 {
                warn!("{}: PROM word {} is zero", self.sensor.name(), index);
                valid = false;
            }
        }
        self.calibration = calibration;

        if valid {
            debug!("{}: calibration loaded", self.sensor.name());
            Ok(())
        } else {
            Err(Error::InvalidCalibration)
        }
    }

    /// Runs a pressure and a temperature conversion and compensates them.
    /// `data` is only written once both conversions succeeded.
    pub async fn read(
        &mut self,
        data: &mut Reading,
        reference_temperature: f32,
    ) -> Result<(), Error> {
        let rank = self.config.oversampling_rank();

        self.convert(CMD_CONVERT_D1, rank).await?;
        let d1 = self.read_adc().await?;

        self.convert(CMD_CONVERT_D2, rank).await?;
        let d2 = self.read_adc().await?;

        let compensated = compensate(d1, d2, &self.calibration);
        data.temperature = compensated.temperature;
        data.pressure = compensated.pressure;
        data.altitude = altitude(compensated.pressure, reference_temperature);

        self.last_read = Some(Instant::now());
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn sensor(&self) -> &Sensor {
        &self.sensor
    }

    /// Outcome of the most recent bus transaction.
    pub fn last_result(&self) -> Result<(), ErrorKind> {
        self.last_result
    }

    pub fn last_read(&self) -> Option<Instant> {
        self.last_read
    }

    async fn convert(&mut self, command: u8, rank: u8) -> Result<(), Error> {
        let index = settle_index(rank);
        trace!("convert {=u8:#x}, settle index {}", command, index);
        let result = self.command(command + index as u8 * 2).await;
        // the conversion time is waited even if the command was not acknowledged
        self.settle.settle(settle_time(rank)).await;
        result
    }

    async fn read_prom(&mut self, register: u8) -> Result<u16, Error> {
        self.command(CMD_READ_PROM + register * 2).await?;
        let mut buf = [0u8; 2];
        self.receive(&mut buf).await?;
        Ok(u16::from_be_bytes(buf))
    }

    async fn read_adc(&mut self) -> Result<u32, Error> {
        self.command(CMD_READ_ADC).await?;
        let mut buf = [0u8; 3];
        self.receive(&mut buf).await?;
        Ok(u32::from_be_bytes([0, buf[0], buf[1], buf[2]]))
    }

    async fn command(&mut self, command: u8) -> Result<(), Error> {
        let address = self.config.address as u8;
        let result = self.bus.write(address, &[command]).await.map_err(|e| e.kind());
        self.record(result)
    }

    async fn receive(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        let address = self.config.address as u8;
        let result = self.bus.read(address, buf).await.map_err(|e| e.kind());
        self.record(result)
    }

    fn record(&mut self, result: Result<(), ErrorKind>) -> Result<(), Error> {
        self.last_result = result;
        result.map_err(Error::Bus)
    }
}
