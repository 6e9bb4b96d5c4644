use std::any::Any;
use std::collections::VecDeque;

use serde::Serialize;

use crate::{AccessWidth, Peripheral};

/// CCSDS RX/TX block as seen through its single data register.
///
/// Reads return the last received word, writes load the next transmit word.
#[derive(Debug, Default, Serialize)]
pub struct CcsdsTransceiver {
    rx_value: u32,
    last_tx: Option<u32>,
    tx_count: u64,
    rx_reads: u64,
    #[serde(skip)]
    depth: usize,
    tx_history: VecDeque<u32>,
}

impl CcsdsTransceiver {
    pub fn new(rx_value: u32, trace_depth: usize) -> Self {
        Self {
            rx_value,
            depth: trace_depth,
            ..Default::default()
        }
    }

    /// Replaces the word presented on the receive side.
    pub fn set_rx_value(&mut self, value: u32) {
        self.rx_value = value;
    }

    pub fn rx_value(&self) -> u32 {
        self.rx_value
    }

    pub fn last_tx(&self) -> Option<u32> {
        self.last_tx
    }

    pub fn tx_count(&self) -> u64 {
        self.tx_count
    }

    pub fn rx_reads(&self) -> u64 {
        self.rx_reads
    }

    pub fn tx_history(&self) -> impl Iterator<Item = u32> + '_ {
        self.tx_history.iter().copied()
    }
}

impl Peripheral for CcsdsTransceiver {
    fn read(&mut self, offset: u64, width: AccessWidth) -> Option<u32> {
        if width != AccessWidth::Word || offset != 0 {
            return None;
        }
        self.rx_reads += 1;
        tracing::debug!("Transceiver RX read -> {:#010x}", self.rx_value);
        Some(self.rx_value)
    }

    fn write(&mut self, offset: u64, width: AccessWidth, value: u32) -> bool {
        if width != AccessWidth::Word || offset != 0 {
            return false;
        }
        self.last_tx = Some(value);
        self.tx_count += 1;
        if self.depth > 0 {
            if self.tx_history.len() == self.depth {
                self.tx_history.pop_front();
            }
            self.tx_history.push_back(value);
        }
        tracing::trace!("Transceiver TX <- {:#010x}", value);
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
