#![cfg_attr(not(test), no_std)]

pub mod console;
pub mod driver;
pub mod pattern;
pub mod regmap;
pub mod sequences;
pub mod timer;


pub use console::{Reporter, Tag};
pub use driver::{run_campaign, CampaignSummary, StepStatus};
pub use pattern::{Lcg, PatternSource};
pub use regmap::{BoardRegisters, LedMask, LedReg, Mmio, Register};
pub use sequences::{RandomLoop, RxCheck, Sequencer, TxPattern, VisualSequence};
pub use timer::{spin, BusyWait, Spin};

/// Receive value the transceiver presents after reset (`0x4000_0002`).
pub const DEFAULT_RX_VALUE: u32 = 1_073_741_826;

/// Unit of delay for every paced step, in spin iterations.
pub const BASE_SPIN_COUNT: u32 = 20_000_000;

/// Hold time between two LED steps of a visual sequence.
pub const LED_STEP_SPIN_COUNT: u32 = BASE_SPIN_COUNT / 4;

/// Seed of the pattern generator for the randomized transmit loop.
pub const TX_RAND_SEED: u32 = 0;

/// Number of counted iterations of the alternation loop.
pub const ALTERNATION_LIMIT: u32 = 10_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    #[error("unsupported {operation} variant {selector}")]
    UnsupportedVariant {
        operation: &'static str,
        selector: u32,
    },
    #[error("expected {expected} but observed {observed}")]
    ValueMismatch { expected: u32, observed: u32 },
}

pub type SeqResult<T> = Result<T, SequenceError>;

/// Access to the memory-mapped address space.
///
/// Every access is a single bus transaction of the stated width. Implementors
/// must not split a 32-bit access into byte accesses: the transceiver latches
/// the transmit word on the write strobe.
pub trait RegisterBus {
    fn read_u8(&mut self, addr: usize) -> u8;
    fn write_u8(&mut self, addr: usize, value: u8);
    fn read_u32(&mut self, addr: usize) -> u32;
    fn write_u32(&mut self, addr: usize, value: u32);
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    fn read_u8(&mut self, addr: usize) -> u8 {
        (**self).read_u8(addr)
    }

    fn write_u8(&mut self, addr: usize, value: u8) {
        (**self).write_u8(addr, value)
    }

    fn read_u32(&mut self, addr: usize) -> u32 {
        (**self).read_u32(addr)
    }

    fn write_u32(&mut self, addr: usize, value: u32) {
        (**self).write_u32(addr, value)
    }
}
