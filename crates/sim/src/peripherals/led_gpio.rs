use std::any::Any;
use std::collections::VecDeque;

use serde::Serialize;

use crate::{AccessWidth, Peripheral};

const DATA: u64 = 0x0;
const DIRECTION: u64 = 0x1;

/// 8-bit GPIO block driving the status LEDs.
///
/// A data bit only reaches its LED when the matching direction bit is set,
/// so `lit()` is what an observer on the board would see.
#[derive(Debug, Default, Serialize)]
pub struct LedGpio {
    data: u8,
    direction: u8,
    data_writes: u64,
    direction_writes: u64,
    /// Data writes issued while no line was an output.
    writes_while_input: u64,
    #[serde(skip)]
    depth: usize,
    history: VecDeque<u8>,
}

impl LedGpio {
    pub fn new(trace_depth: usize) -> Self {
        Self {
            depth: trace_depth,
            ..Default::default()
        }
    }

    pub fn data(&self) -> u8 {
        self.data
    }

    pub fn direction(&self) -> u8 {
        self.direction
    }

    pub fn lit(&self) -> u8 {
        self.data & self.direction
    }

    pub fn data_writes(&self) -> u64 {
        self.data_writes
    }

    pub fn direction_writes(&self) -> u64 {
        self.direction_writes
    }

    pub fn writes_while_input(&self) -> u64 {
        self.writes_while_input
    }

    /// Most recent data register values, oldest first.
    pub fn history(&self) -> impl Iterator<Item = u8> + '_ {
        self.history.iter().copied()
    }

    fn record(&mut self, value: u8) {
        if self.depth == 0 {
            return;
        }
        if self.history.len() == self.depth {
            self.history.pop_front();
        }
        self.history.push_back(value);
    }
}

impl Peripheral for LedGpio {
    fn read(&mut self, offset: u64, width: AccessWidth) -> Option<u32> {
        if width != AccessWidth::Byte {
            return None;
        }
        match offset {
            DATA => Some(self.data as u32),
            DIRECTION => Some(self.direction as u32),
            _ => Some(0),
        }
    }

    fn write(&mut self, offset: u64, width: AccessWidth, value: u32) -> bool {
        if width != AccessWidth::Byte {
            return false;
        }
        let value = value as u8;
        match offset {
            DATA => {
                if self.direction == 0 {
                    self.writes_while_input += 1;
                }
                self.data = value;
                self.data_writes += 1;
                self.record(value);
                tracing::debug!("LED data <- {:#04x} (lit {:#04x})", value, self.lit());
            }
            DIRECTION => {
                self.direction = value;
                self.direction_writes += 1;
                tracing::debug!("LED direction <- {:#04x}", value);
            }
            _ => {}
        }
        true
    }

    fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
