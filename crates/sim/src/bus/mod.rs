use eury_core::regmap::{LED_BASE, TRANSCEIVER_BASE};
use eury_core::RegisterBus;

use crate::peripherals::{CcsdsTransceiver, LedGpio};
use crate::{AccessWidth, Peripheral, SimulationError};

pub struct PeripheralEntry {
    pub name: String,
    pub base: u64,
    pub size: u64,
    pub dev: Box<dyn Peripheral>,
}

impl std::fmt::Debug for PeripheralEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeripheralEntry")
            .field("name", &self.name)
            .field("base", &format_args!("{:#x}", self.base))
            .field("size", &self.size)
            .finish()
    }
}

/// The space segment board: LED GPIO and transceiver on one Wishbone bus.
///
/// Register accesses cannot fail from the program's point of view, so bus
/// faults are kept as violations for the bench to report.
#[derive(Debug)]
pub struct SimBoard {
    pub peripherals: Vec<PeripheralEntry>,
    violations: Vec<SimulationError>,
}

impl SimBoard {
    pub fn new(rx_value: u32, trace_depth: usize) -> Self {
        let mut board = Self::empty();
        board.attach("leds", LED_BASE as u64, 0x2, Box::new(LedGpio::new(trace_depth)));
        board.attach(
            "ccsds_rxtx",
            TRANSCEIVER_BASE as u64,
            0x4,
            Box::new(CcsdsTransceiver::new(rx_value, trace_depth)),
        );
        board
    }

    pub fn empty() -> Self {
        Self {
            peripherals: Vec::new(),
            violations: Vec::new(),
        }
    }

    pub fn attach(&mut self, name: &str, base: u64, size: u64, dev: Box<dyn Peripheral>) {
        tracing::debug!("Attaching {} at {:#x} (+{:#x})", name, base, size);
        self.peripherals.push(PeripheralEntry {
            name: name.to_string(),
            base,
            size,
            dev,
        });
    }

    pub fn violations(&self) -> &[SimulationError] {
        &self.violations
    }

    pub fn led(&self) -> Option<&LedGpio> {
        self.device("leds")
    }

    pub fn transceiver(&self) -> Option<&CcsdsTransceiver> {
        self.device("ccsds_rxtx")
    }

    pub fn transceiver_mut(&mut self) -> Option<&mut CcsdsTransceiver> {
        self.peripherals
            .iter_mut()
            .find(|p| p.name == "ccsds_rxtx")
            .and_then(|p| p.dev.as_any_mut().downcast_mut())
    }

    fn device<T: 'static>(&self, name: &str) -> Option<&T> {
        self.peripherals
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.dev.as_any().downcast_ref())
    }

    fn find(&mut self, addr: u64) -> Option<(&mut PeripheralEntry, u64)> {
        self.peripherals
            .iter_mut()
            .find(|p| addr >= p.base && addr < p.base + p.size)
            .map(|p| {
                let offset = addr - p.base;
                (p, offset)
            })
    }

    fn fault(&mut self, err: SimulationError) {
        tracing::warn!("Bus fault: {}", err);
        self.violations.push(err);
    }

    fn read(&mut self, addr: usize, width: AccessWidth) -> u32 {
        let addr = addr as u64;
        let err = match self.find(addr) {
            Some((entry, offset)) => match entry.dev.read(offset, width) {
                Some(value) => return value,
                None => SimulationError::WidthMismatch {
                    peripheral: entry.name.clone(),
                    addr,
                    width: width.bytes(),
                },
            },
            None => SimulationError::Unmapped(addr),
        };
        self.fault(err);
        0
    }

    fn write(&mut self, addr: usize, width: AccessWidth, value: u32) {
        let addr = addr as u64;
        let err = match self.find(addr) {
            Some((entry, offset)) => {
                if entry.dev.write(offset, width, value) {
                    return;
                }
                SimulationError::WidthMismatch {
                    peripheral: entry.name.clone(),
                    addr,
                    width: width.bytes(),
                }
            }
            None => SimulationError::Unmapped(addr),
        };
        self.fault(err);
    }
}

impl RegisterBus for SimBoard {
    fn read_u8(&mut self, addr: usize) -> u8 {
        self.read(addr, AccessWidth::Byte) as u8
    }

    fn write_u8(&mut self, addr: usize, value: u8) {
        self.write(addr, AccessWidth::Byte, value as u32)
    }

    fn read_u32(&mut self, addr: usize) -> u32 {
        self.read(addr, AccessWidth::Word)
    }

    fn write_u32(&mut self, addr: usize, value: u32) {
        self.write(addr, AccessWidth::Word, value)
    }
}
