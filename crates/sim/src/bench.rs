use eury_core::{run_campaign, BoardRegisters, CampaignSummary, Lcg, RandomLoop, DEFAULT_RX_VALUE};
use serde::Serialize;
use tracing::info;

use crate::bus::SimBoard;
use crate::clock::VirtualClock;
use crate::console::CaptureConsole;
use crate::snapshot::BoardSnapshot;

pub const DEFAULT_RANDOM_TX_WORDS: u64 = 1024;
pub const DEFAULT_TRACE_DEPTH: usize = 64;

#[derive(Debug, Clone)]
pub struct BenchOptions {
    /// Word the transceiver presents on its receive side.
    pub rx_value: u32,
    /// Budget for the randomized transmit loop, which never ends on target.
    pub random_tx_words: u64,
    pub trace_depth: usize,
    pub echo: bool,
}

impl Default for BenchOptions {
    fn default() -> Self {
        Self {
            rx_value: DEFAULT_RX_VALUE,
            random_tx_words: DEFAULT_RANDOM_TX_WORDS,
            trace_depth: DEFAULT_TRACE_DEPTH,
            echo: false,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BenchOutcome {
    pub summary: CampaignSummary,
    pub snapshot: BoardSnapshot,
    pub console: Vec<String>,
    #[serde(skip)]
    pub board: SimBoard,
}

/// Runs the whole campaign against a freshly reset simulated board.
pub fn run_bench(options: &BenchOptions) -> BenchOutcome {
    info!(
        "Running campaign (rx {:#010x}, {} random words)",
        options.rx_value, options.random_tx_words
    );

    let mut regs = BoardRegisters::new(SimBoard::new(options.rx_value, options.trace_depth));
    let mut clock = VirtualClock::new();
    let (summary, console) = run_campaign(
        &mut regs,
        &mut clock,
        Lcg::new(),
        CaptureConsole::new(options.echo),
        RandomLoop::Words(options.random_tx_words),
    );

    let board = regs.into_bus();
    let snapshot = BoardSnapshot::capture(&board, &clock);
    info!(
        "Campaign finished: {} spin calls, {} virtual cycles, {} bus violations",
        clock.spins(),
        clock.cycles(),
        snapshot.violations.len()
    );

    BenchOutcome {
        summary,
        snapshot,
        console: console.into_lines(),
        board,
    }
}
