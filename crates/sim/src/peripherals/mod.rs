pub mod led_gpio;
pub mod transceiver;

pub use led_gpio::LedGpio;
pub use transceiver::CcsdsTransceiver;
