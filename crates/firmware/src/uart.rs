use core::fmt;

use eury_core::RegisterBus;

// 16550-compatible console UART.
pub const UART_BASE: usize = 0x9000_0000;
const THR: usize = 0x0;
const LSR: usize = 0x5;
const LSR_THRE: u8 = 1 << 5;

/// Polled console output. The bootloader has already programmed the baud
/// rate and line format.
pub struct Uart<B: RegisterBus> {
    bus: B,
}

impl<B: RegisterBus> Uart<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    fn put(&mut self, byte: u8) {
        while self.bus.read_u8(UART_BASE + LSR) & LSR_THRE == 0 {}
        self.bus.write_u8(UART_BASE + THR, byte);
    }
}

impl<B: RegisterBus> fmt::Write for Uart<B> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.put(b'\r');
            }
            self.put(byte);
        }
        Ok(())
    }
}
