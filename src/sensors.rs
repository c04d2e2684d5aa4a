use crate::message_hub::ReadingSubscriber;
use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_nrf::{gpio::AnyPin, gpio::Output, peripherals::TWISPI0, twim::Twim};
use embassy_sync::pubsub::DynImmediatePublisher;
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex};
use embassy_time::{Duration, Timer};
use ms56xx::{
    Config, CooperativeWait, Error, Ms56xx, Reading, Sensor, DEFAULT_REFERENCE_TEMPERATURE,
};

const SAMPLE_PERIOD: Duration = Duration::from_millis(1000);
const RETRY_BEGIN: Duration = Duration::from_millis(5000);

fn log_sensor_error(name: &str, error: Error) {
    defmt::warn!("{=str}: {}", name, error);
}

#[embassy_executor::task]
pub async fn sample_ms56xx(
    twim_mutex: &'static Mutex<CriticalSectionRawMutex, Twim<'static, TWISPI0>>,
    mut led: Output<'static, AnyPin>,
    reading_pub: DynImmediatePublisher<'static, Reading>,
) {
    let twim_dev = I2cDevice::new(twim_mutex);
    let sensor = Sensor::new("MS5611").with_error_handler(log_sensor_error);
    let mut ms56xx = Ms56xx::new(twim_dev, CooperativeWait::default()).with_sensor(sensor);

    // the calibration is not kept across power cycles, so begin until it loads
    led.set_high();
    while let Err(error) = ms56xx.begin(Config::default()).await {
        ms56xx.sensor().report(error);
        Timer::after(RETRY_BEGIN).await;
    }
    led.set_low();
    defmt::info!("{=str} ready, {}", ms56xx.sensor().name(), ms56xx.config());

    let mut reading = Reading::default();
    loop {
        match ms56xx
            .read(&mut reading, DEFAULT_REFERENCE_TEMPERATURE)
            .await
        {
            Ok(()) => reading_pub.publish_immediate(reading),
            Err(error) => ms56xx.sensor().report(error),
        }
        Timer::after(SAMPLE_PERIOD).await;
    }
}

#[embassy_executor::task]
pub async fn log_readings(mut reading_sub: ReadingSubscriber) {
    loop {
        let reading = reading_sub.next_message_pure().await;
        defmt::info!(
            "T: {=f32}°C P: {=i32}Pa h: {=f32}m",
            reading.temperature,
            reading.pressure,
            reading.altitude
        );
    }
}
