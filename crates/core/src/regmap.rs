use core::marker::PhantomData;
use core::ptr::{read_volatile, write_volatile};

use bitflags::bitflags;

use crate::RegisterBus;

// Wishbone slave addresses of the space segment SoC.
pub const LED_BASE: usize = 0x9100_0000;
pub const TRANSCEIVER_BASE: usize = 0xC000_0000;

/// Direction register value that turns every LED line into an output.
pub const LED_DIR_ALL_OUTPUTS: u8 = 0xFF;

bitflags! {
    /// Bit pattern of the 8-bit LED data register, one bit per LED.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LedMask: u8 {
        const LED0 = 1 << 0;
        const LED1 = 1 << 1;
        const LED2 = 1 << 2;
        const LED3 = 1 << 3;
        const LED4 = 1 << 4;
        const LED5 = 1 << 5;
        const LED6 = 1 << 6;
        const LED7 = 1 << 7;
        const ALL = 0xFF;
    }
}

/// Registers of the LED GPIO block. The block has 8-bit registers, so the
/// offset is also the byte offset from [`LED_BASE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum LedReg {
    Data = 0,
    Direction = 1,
}

impl LedReg {
    pub const fn offset(self) -> usize {
        self as usize
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u32 {}
}

/// Access width of a register handle.
pub trait Width: sealed::Sealed + Copy {
    const BYTES: usize;

    fn read<B: RegisterBus + ?Sized>(bus: &mut B, addr: usize) -> Self;
    fn write<B: RegisterBus + ?Sized>(bus: &mut B, addr: usize, value: Self);
}

impl Width for u8 {
    const BYTES: usize = 1;

    fn read<B: RegisterBus + ?Sized>(bus: &mut B, addr: usize) -> Self {
        bus.read_u8(addr)
    }

    fn write<B: RegisterBus + ?Sized>(bus: &mut B, addr: usize, value: Self) {
        bus.write_u8(addr, value)
    }
}

impl Width for u32 {
    const BYTES: usize = 4;

    fn read<B: RegisterBus + ?Sized>(bus: &mut B, addr: usize) -> Self {
        bus.read_u32(addr)
    }

    fn write<B: RegisterBus + ?Sized>(bus: &mut B, addr: usize, value: Self) {
        bus.write_u32(addr, value)
    }
}

/// A fixed hardware address together with its access width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register<W: Width> {
    addr: usize,
    _width: PhantomData<W>,
}

impl<W: Width> Register<W> {
    pub const fn at(addr: usize) -> Self {
        Self {
            addr,
            _width: PhantomData,
        }
    }

    pub const fn addr(&self) -> usize {
        self.addr
    }

    pub const fn width(&self) -> usize {
        W::BYTES
    }

    fn read<B: RegisterBus + ?Sized>(&self, bus: &mut B) -> W {
        W::read(bus, self.addr)
    }

    fn write<B: RegisterBus + ?Sized>(&self, bus: &mut B, value: W) {
        W::write(bus, self.addr, value)
    }
}

pub const LED_DATA: Register<u8> = Register::at(LED_BASE + LedReg::Data.offset());
pub const LED_DIRECTION: Register<u8> = Register::at(LED_BASE + LedReg::Direction.offset());
pub const TRANSCEIVER: Register<u32> = Register::at(TRANSCEIVER_BASE);

/// The two peripherals of the bring-up board behind one bus.
///
/// Built once at startup and lent to the sequencer; the only place in the
/// program where register addresses are resolved.
#[derive(Debug)]
pub struct BoardRegisters<B: RegisterBus> {
    bus: B,
    led_output: bool,
}

impl<B: RegisterBus> BoardRegisters<B> {
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            led_output: false,
        }
    }

    pub fn write_led(&mut self, reg: LedReg, value: u8) {
        let handle = match reg {
            LedReg::Data => LED_DATA,
            LedReg::Direction => LED_DIRECTION,
        };
        handle.write(&mut self.bus, value);
    }

    pub fn set_leds(&mut self, mask: LedMask) {
        self.write_led(LedReg::Data, mask.bits());
    }

    /// Switches every LED line to output. Only the first call touches the
    /// direction register; returns whether this call did.
    pub fn set_led_output_mode(&mut self) -> bool {
        if self.led_output {
            return false;
        }
        self.write_led(LedReg::Direction, LED_DIR_ALL_OUTPUTS);
        self.led_output = true;
        true
    }

    pub fn led_output_mode(&self) -> bool {
        self.led_output
    }

    pub fn read_transceiver(&mut self) -> u32 {
        TRANSCEIVER.read(&mut self.bus)
    }

    pub fn write_transceiver(&mut self, value: u32) {
        TRANSCEIVER.write(&mut self.bus, value);
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn into_bus(self) -> B {
        self.bus
    }
}

/// Volatile access to the physical address space.
#[derive(Debug)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// # Safety
    ///
    /// Every address later passed to the bus must be a valid, mapped device
    /// register, and no other owner may access those registers concurrently.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterBus for Mmio {
    fn read_u8(&mut self, addr: usize) -> u8 {
        // SAFETY: address validity is the contract of `Mmio::new`.
        unsafe { read_volatile(addr as *const u8) }
    }

    fn write_u8(&mut self, addr: usize, value: u8) {
        // SAFETY: see `read_u8`.
        unsafe { write_volatile(addr as *mut u8, value) }
    }

    fn read_u32(&mut self, addr: usize) -> u32 {
        // SAFETY: see `read_u8`.
        unsafe { read_volatile(addr as *const u32) }
    }

    fn write_u32(&mut self, addr: usize, value: u32) {
        // SAFETY: see `read_u8`.
        unsafe { write_volatile(addr as *mut u32, value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_layout() {
        assert_eq!(LED_DATA.addr(), 0x9100_0000);
        assert_eq!(LED_DIRECTION.addr(), 0x9100_0001);
        assert_eq!(LED_DATA.width(), 1);
        assert_eq!(TRANSCEIVER.addr(), 0xC000_0000);
        assert_eq!(TRANSCEIVER.width(), 4);
    }

    #[test]
    fn test_led_mask_all_is_every_bit() {
        assert_eq!(LedMask::ALL.bits(), 0xFF);
        assert_eq!(LedMask::empty().bits(), 0x00);
        assert_eq!((LedMask::LED0 | LedMask::LED7).bits(), 0x81);
    }
}
