//! The bring-up campaign: every sequence in its fixed order, one verdict line
//! per step. A failing step is reported and the campaign moves on.

use core::fmt::Write;

use crate::console::SEPARATOR;
use crate::pattern::PatternSource;
use crate::regmap::BoardRegisters;
use crate::sequences::{RandomLoop, RxCheck, Sequencer, TxPattern, VisualSequence};
use crate::timer::Spin;
use crate::{report, RegisterBus, BASE_SPIN_COUNT};

const TITLE_STARTED: &str = "OpenRISC EurySPACE Space Segment test program started";
const TITLE_STOPPED: &str = "OpenRISC EurySPACE Space Segment test program stopped";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StepStatus {
    #[default]
    NotRun,
    Ok,
    Ko,
}

impl StepStatus {
    fn from_result<T, E>(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            StepStatus::Ok
        } else {
            StepStatus::Ko
        }
    }
}

/// Outcome of one campaign run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CampaignSummary {
    pub visual_init: StepStatus,
    pub rx_default: StepStatus,
    pub tx_all_zeros: StepStatus,
    pub tx_all_ones: StepStatus,
    pub alternation_iterations: u32,
    pub random_words: u64,
    pub visual_stop: StepStatus,
}

/// Runs the full campaign.
///
/// With [`RandomLoop::Forever`] the randomized transmit loop never returns,
/// so the stop sequence and closing banner are never reached. That mirrors
/// the deployed program; only bounded host runs get past it.
pub fn run_campaign<B, S, P, W>(
    regs: &mut BoardRegisters<B>,
    spin: S,
    pattern: P,
    console: W,
    random: RandomLoop,
) -> (CampaignSummary, W)
where
    B: RegisterBus,
    S: Spin,
    P: PatternSource,
    W: Write,
{
    regs.set_led_output_mode();

    let mut seq = Sequencer::new(regs, spin, pattern, console);
    let mut summary = CampaignSummary::default();

    banner(&mut seq, TITLE_STARTED);

    report!(seq.console(), Start, "visual control sequence - init sequence");
    let result = seq.visual_control(VisualSequence::Init.selector());
    summary.visual_init = StepStatus::from_result(&result);
    match result {
        Ok(()) => report!(seq.console(), Ok, "visual control sequence - init sequence"),
        Err(_) => report!(
            seq.console(),
            Ko,
            "visual control sequence - error - init sequence"
        ),
    }
    report!(seq.console(), Done, "visual control sequence - init sequence");

    report!(seq.console(), Start, "RX/TX control sequence - default init parameters");
    let result = seq.receive_check(RxCheck::DefaultValue.selector());
    summary.rx_default = StepStatus::from_result(&result);
    match result {
        Ok(()) => report!(seq.console(), Ok, "RX/TX control sequence - default init parameters"),
        Err(_) => report!(
            seq.console(),
            Ko,
            "RX/TX control sequence - error - default init parameters"
        ),
    }
    report!(seq.console(), Done, "RX/TX control sequence - default init parameters");

    report!(seq.console(), Start, "RX/TX control sequence - tx data transmission");
    summary.tx_all_zeros = transmit_and_hold(&mut seq, TxPattern::AllZeros, "0");
    summary.tx_all_ones = transmit_and_hold(&mut seq, TxPattern::AllOnes, "1");

    report!(
        seq.console(),
        Check,
        "RX/TX control sequence - frequency domain analysis - changing TX data alternation - inspect signal spectrum"
    );
    summary.alternation_iterations = seq.transmit_alternation().unwrap_or_default();

    report!(
        seq.console(),
        Check,
        "RX/TX control sequence - frequency domain analysis - changing TX data randomly - inspect signal spectrum"
    );
    summary.random_words = seq.transmit_random(random).unwrap_or_default();

    report!(seq.console(), Start, "visual control sequence - stop sequence");
    let result = seq.visual_control(VisualSequence::Stop.selector());
    summary.visual_stop = StepStatus::from_result(&result);
    report!(seq.console(), Done, "visual control sequence - stop sequence");

    seq.console().plain(SEPARATOR);
    seq.console().blank();
    seq.console().plain(TITLE_STOPPED);

    let (_, _, console) = seq.into_parts();
    (summary, console)
}

fn banner<B, S, P, W>(seq: &mut Sequencer<'_, B, S, P, W>, title: &str)
where
    B: RegisterBus,
    S: Spin,
    P: PatternSource,
    W: Write,
{
    let console = seq.console();
    console.plain(SEPARATOR);
    console.blank();
    console.plain(title);
    console.plain(SEPARATOR);
    console.blank();
}

fn transmit_and_hold<B, S, P, W>(
    seq: &mut Sequencer<'_, B, S, P, W>,
    pattern: TxPattern,
    level: &str,
) -> StepStatus
where
    B: RegisterBus,
    S: Spin,
    P: PatternSource,
    W: Write,
{
    let result = seq.transmit_pattern(pattern.selector());
    match result {
        Ok(_) => {
            report!(
                seq.console(),
                Ok,
                "RX/TX control sequence - time domain analysis - tx data changed to all {}",
                level
            );
            report!(
                seq.console(),
                Check,
                "RX/TX control sequence - time domain analysis - TX data are all {} - inspect signal level",
                level
            );
            seq.hold(BASE_SPIN_COUNT);
        }
        Err(_) => report!(
            seq.console(),
            Ko,
            "RX/TX control sequence - time domain analysis - error - tx data not changed to all {}",
            level
        ),
    }
    StepStatus::from_result(&result)
}
