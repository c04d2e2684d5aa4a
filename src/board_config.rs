// Adafruit Feather nRF52840 Sense, MS5611 breakout on the STEMMA QT connector
// CSB of the breakout is pulled low -> address 0x77

use embassy_nrf::{
    bind_interrupts,
    gpio::{AnyPin, Level, Output, OutputDrive, Pin},
    peripherals::{self, TWISPI0},
    twim::{self, Twim},
};

bind_interrupts!(struct Irqs {
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

pub struct Board {
    /// onboard red led, lit while the sensor is unusable
    pub led_d13: Output<'static, AnyPin>,
    /// twi interface shared by the onboard i2c sensors and the MS56XX
    pub twim: Twim<'static, TWISPI0>,
}

impl Board {
    pub fn configure(p: embassy_nrf::Peripherals) -> Board {
        // configure gpio
        let led_d13 = Output::new(p.P1_09.degrade(), Level::Low, OutputDrive::Standard);

        // configure twi, 400 kHz is within the MS5611 limits
        let mut twim_config = twim::Config::default();
        twim_config.frequency = twim::Frequency::K400;
        let twim = Twim::new(p.TWISPI0, Irqs, p.P0_12, p.P0_11, twim_config);

        Board { led_d13, twim }
    }
}
