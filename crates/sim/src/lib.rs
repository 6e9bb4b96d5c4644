pub mod bench;
pub mod bus;
pub mod clock;
pub mod console;
pub mod peripherals;
pub mod snapshot;

use std::any::Any;


pub use bench::{run_bench, BenchOptions, BenchOutcome};
pub use bus::SimBoard;
pub use clock::VirtualClock;
pub use console::CaptureConsole;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("Unmapped access at {0:#x}")]
    Unmapped(u64),
    #[error("{width}-byte access at {addr:#x} not supported by {peripheral}")]
    WidthMismatch {
        peripheral: String,
        addr: u64,
        width: usize,
    },
}

pub type SimResult<T> = Result<T, SimulationError>;

/// Bus transaction size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessWidth {
    Byte,
    Word,
}

impl AccessWidth {
    pub const fn bytes(self) -> usize {
        match self {
            AccessWidth::Byte => 1,
            AccessWidth::Word => 4,
        }
    }
}

/// A memory-mapped device model. Offsets are relative to the device base.
pub trait Peripheral: std::fmt::Debug + Send {
    fn read(&mut self, offset: u64, width: AccessWidth) -> Option<u32>;
    fn write(&mut self, offset: u64, width: AccessWidth, value: u32) -> bool;
    fn snapshot(&self) -> serde_json::Value;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
