use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    pubsub::{PubSubChannel, Subscriber},
};
use ms56xx::Reading;

const QUEUE_SIZE: usize = 1;
const SUBSCRIBER: usize = 2;
const PUBLISHER: usize = 1;

pub type ReadingSubscriber =
    Subscriber<'static, CriticalSectionRawMutex, Reading, QUEUE_SIZE, SUBSCRIBER, PUBLISHER>;

pub struct MessageHub {
    pub reading: PubSubChannel<CriticalSectionRawMutex, Reading, QUEUE_SIZE, SUBSCRIBER, PUBLISHER>,
}

impl MessageHub {
    pub fn new() -> Self {
        Self {
            reading: PubSubChannel::new(),
        }
    }

    pub fn subscriber(&'static self) -> ReadingSubscriber {
        self.reading.subscriber().unwrap()
    }
}
