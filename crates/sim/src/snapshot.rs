use serde::Serialize;
use std::collections::BTreeMap;

use crate::bus::SimBoard;
use crate::clock::VirtualClock;

#[derive(Serialize, Debug)]
pub struct BoardSnapshot {
    pub peripherals: BTreeMap<String, serde_json::Value>,
    pub clock: VirtualClock,
    pub violations: Vec<String>,
}

impl BoardSnapshot {
    pub fn capture(board: &SimBoard, clock: &VirtualClock) -> Self {
        Self {
            peripherals: board
                .peripherals
                .iter()
                .map(|p| (p.name.clone(), p.dev.snapshot()))
                .collect(),
            clock: *clock,
            violations: board.violations().iter().map(|v| v.to_string()).collect(),
        }
    }
}
