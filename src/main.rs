#![no_std]
#![no_main]

mod board_config;
mod message_hub;
mod sensors;

use message_hub::*;
use sensors::*;

use embassy_executor::Spawner;
use embassy_nrf::{peripherals::TWISPI0, twim::Twim};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex};

use defmt_rtt as _; // global logger
use panic_probe as _;

static SHARED_TWIM: static_cell::StaticCell<Mutex<CriticalSectionRawMutex, Twim<TWISPI0>>> =
    static_cell::StaticCell::new();
static MESSAGE_HUB: static_cell::StaticCell<MessageHub> = static_cell::StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let b = board_config::Board::configure(embassy_nrf::init(Default::default()));
    let shared_twim = SHARED_TWIM.init(Mutex::new(b.twim));
    let message_hub = MESSAGE_HUB.init(MessageHub::new());

    // scan i2c devices
    defmt::info!("Scan I2C Devices on interface TWISPI0");
    let mut buf = [0u8; 1];
    for x in 0..127 {
        let res = shared_twim.lock().await.blocking_read(x, &mut buf);
        if res == Ok(()) {
            defmt::info!("Found device on address {:#x}", x);
        }
    }

    // Spin-up all tasks
    spawner
        .spawn(log_readings(message_hub.subscriber()))
        .unwrap();
    spawner
        .spawn(sample_ms56xx(
            shared_twim,
            b.led_d13,
            message_hub.reading.dyn_immediate_publisher(),
        ))
        .unwrap();
}
