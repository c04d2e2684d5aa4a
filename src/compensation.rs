//! Calibration table and compensation math, page 7/20 and 8/20 of the
//! MS5611 datasheet. Variable names follow the datasheet.
#![allow(clippy::excessive_precision)]

/// PROM words 0..=6. Word 0 is reserved for the manufacturer.
pub const COEFFICIENT_COUNT: usize = 7;

/// Outside temperature assumed for the altitude when the caller has none.
pub const DEFAULT_REFERENCE_TEMPERATURE: f32 = 15.0;

/// Fixed point shifts of the MS5611 folded into float factors:
/// C1·2^15, C2·2^16, C3/2^8, C4/2^7, C5·2^8, C6/2^23.
const BASE_SCALING: [f32; COEFFICIENT_COUNT] = [
    1.0,
    32768.0,
    65536.0,
    3.90625E-3,
    7.8125E-3,
    256.0,
    1.1920928955E-7,
];

/// The MS5607 shifts C1..C4 by one more bit.
const MS5607_SCALING: [f32; 4] = [65536.0, 131072.0, 7.8125E-3, 1.5625E-2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    #[default]
    Ms5611,
    Ms5607,
}

impl Variant {
    fn scaling(self) -> [f32; COEFFICIENT_COUNT] {
        let mut scaling = BASE_SCALING;
        if self == Variant::Ms5607 {
            scaling[1..5].copy_from_slice(&MS5607_SCALING);
        }
        scaling
    }
}

/// Factory coefficients multiplied into their scale factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    coefficients: [f32; COEFFICIENT_COUNT],
}

impl Calibration {
    /// A table that has not seen any PROM data yet.
    pub const fn empty() -> Self {
        Self {
            coefficients: [0.0; COEFFICIENT_COUNT],
        }
    }

    /// Scale factors of `variant`, waiting for the PROM words.
    pub fn new(variant: Variant) -> Self {
        Self {
            coefficients: variant.scaling(),
        }
    }

    pub fn from_prom(variant: Variant, prom: &[u16; COEFFICIENT_COUNT]) -> Self {
        let mut calibration = Self::new(variant);
        for (index, raw) in prom.iter().enumerate() {
            calibration.apply(index, *raw);
        }
        calibration
    }

    pub(crate) fn apply(&mut self, index: usize, raw: u16) {
        self.coefficients[index] *= raw as f32;
    }

    /// Scaled coefficient `index`, where 0 is the manufacturer word.
    ///
    /// # Panics
    ///
    /// Panics if `index >= COEFFICIENT_COUNT`.
    pub fn coefficient(&self, index: usize) -> f32 {
        self.coefficients[index]
    }

    pub fn coefficients(&self) -> &[f32; COEFFICIENT_COUNT] {
        &self.coefficients
    }

    /// C1..C6 must be nonzero, word 0 is not checked.
    pub fn is_valid(&self) -> bool {
        self.coefficients[1..].iter().all(|c| *c != 0.0)
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compensated {
    /// °C
    pub temperature: f32,
    /// Pa
    pub pressure: i32,
}

/// Terms subtracted from TEMP, OFF and SENS below 20 °C.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecondOrder {
    pub temperature: f32,
    pub offset: f32,
    pub sensitivity: f32,
}

/// `temperature` is in 0.01 °C. Returns `None` at and above 20.00 °C.
pub fn second_order(temperature: f32, dt: f32) -> Option<SecondOrder> {
    if temperature >= 2000.0 {
        return None;
    }
    let t2 = dt * dt * 4.6566128731E-10;
    let t = (temperature - 2000.0) * (temperature - 2000.0);
    let mut offset2 = 2.5 * t;
    let mut sens2 = 1.25 * t;
    // very low temperature, below -15.00 °C
    if temperature < -1500.0 {
        let t = (temperature + 1500.0) * (temperature + 1500.0);
        offset2 += 7.0 * t;
        sens2 += 5.5 * t;
    }
    Some(SecondOrder {
        temperature: t2,
        offset: offset2,
        sensitivity: sens2,
    })
}

pub fn compensate(d1: u32, d2: u32, calibration: &Calibration) -> Compensated {
    let c = &calibration.coefficients;

    let dt = d2 as f32 - c[5];
    let mut temperature = 2000.0 + dt * c[6];
    let mut offset = c[2] + dt * c[4];
    let mut sens = c[1] + dt * c[3];

    if let Some(correction) = second_order(temperature, dt) {
        temperature -= correction.temperature;
        offset -= correction.offset;
        sens -= correction.sensitivity;
    }

    Compensated {
        temperature: temperature * 0.01,
        pressure: ((d1 as f32 * sens * 4.76837158205E-7 - offset) * 3.051757813E-5) as i32,
    }
}

/// Barometric formula h = (R·T / g·M) · ln(p0 / p), with R/(g·M) = 29.271267.
pub fn altitude(pressure: i32, reference_temperature: f32) -> f32 {
    29.271267 * (273.15 + reference_temperature) * libm::logf(101325.0 / pressure as f32)
}
