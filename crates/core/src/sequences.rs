use core::fmt::Write;

use crate::console::Reporter;
use crate::pattern::PatternSource;
use crate::regmap::{BoardRegisters, LedMask};
use crate::timer::Spin;
use crate::{
    report, RegisterBus, SeqResult, SequenceError, ALTERNATION_LIMIT, DEFAULT_RX_VALUE,
    LED_STEP_SPIN_COUNT, TX_RAND_SEED,
};

/// Named LED signalling sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum VisualSequence {
    Init = 0,
    Stop = 1,
}

/// Receive-side checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum RxCheck {
    DefaultValue = 0,
}

/// Transmit test words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum TxPattern {
    AllZeros = 0,
    AllOnes = 1,
    Random = 2,
}

macro_rules! selector_enum {
    ($ty:ident, $operation:literal, [$($variant:ident),+]) => {
        impl $ty {
            pub const fn selector(self) -> u32 {
                self as u32
            }
        }

        impl TryFrom<u32> for $ty {
            type Error = SequenceError;

            fn try_from(selector: u32) -> SeqResult<Self> {
                $(
                    if selector == $ty::$variant as u32 {
                        return Ok($ty::$variant);
                    }
                )+
                Err(SequenceError::UnsupportedVariant {
                    operation: $operation,
                    selector,
                })
            }
        }
    };
}

selector_enum!(VisualSequence, "visual control", [Init, Stop]);
selector_enum!(RxCheck, "receive check", [DefaultValue]);
selector_enum!(TxPattern, "transmit pattern", [AllZeros, AllOnes, Random]);

/// One step of a visual sequence: drive the LEDs, then hold for `hold`
/// spin cycles. A zero hold ends the sequence without waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedStep {
    pub leds: LedMask,
    pub hold: u32,
}

const fn step(on: bool, hold: u32) -> LedStep {
    LedStep {
        leds: if on { LedMask::ALL } else { LedMask::empty() },
        hold,
    }
}

const INIT_STEPS: [LedStep; 5] = [
    step(true, LED_STEP_SPIN_COUNT),
    step(false, LED_STEP_SPIN_COUNT),
    step(true, LED_STEP_SPIN_COUNT),
    step(false, LED_STEP_SPIN_COUNT),
    step(true, 0),
];

const STOP_STEPS: [LedStep; 5] = [
    step(false, LED_STEP_SPIN_COUNT),
    step(true, LED_STEP_SPIN_COUNT),
    step(false, LED_STEP_SPIN_COUNT),
    step(true, LED_STEP_SPIN_COUNT),
    step(false, 0),
];

impl VisualSequence {
    pub const fn steps(self) -> &'static [LedStep] {
        match self {
            VisualSequence::Init => &INIT_STEPS,
            VisualSequence::Stop => &STOP_STEPS,
        }
    }
}

impl TxPattern {
    fn word<P: PatternSource>(self, pattern: &mut P) -> u32 {
        match self {
            TxPattern::AllZeros => 0x0000_0000,
            TxPattern::AllOnes => 0xFFFF_FFFF,
            TxPattern::Random => pattern.next_word(),
        }
    }
}

/// How long the randomized transmit loop runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomLoop {
    /// Until a write fails, which the fixed pattern set never does.
    Forever,
    /// Stop after this many words. Host benches only.
    Words(u64),
}

/// Drives the board peripherals through the diagnostic scenarios.
pub struct Sequencer<'r, B, S, P, W>
where
    B: RegisterBus,
    S: Spin,
    P: PatternSource,
    W: Write,
{
    regs: &'r mut BoardRegisters<B>,
    spin: S,
    pattern: P,
    console: Reporter<W>,
}

impl<'r, B, S, P, W> Sequencer<'r, B, S, P, W>
where
    B: RegisterBus,
    S: Spin,
    P: PatternSource,
    W: Write,
{
    pub fn new(regs: &'r mut BoardRegisters<B>, spin: S, pattern: P, console: W) -> Self {
        Self {
            regs,
            spin,
            pattern,
            console: Reporter::new(console),
        }
    }

    pub fn registers(&mut self) -> &mut BoardRegisters<B> {
        &mut *self.regs
    }

    pub fn console(&mut self) -> &mut Reporter<W> {
        &mut self.console
    }

    pub fn spinner(&self) -> &S {
        &self.spin
    }

    pub fn into_parts(self) -> (S, P, W) {
        (self.spin, self.pattern, self.console.into_sink())
    }

    pub fn hold(&mut self, cycles: u32) {
        if cycles > 0 {
            self.spin.spin(cycles);
        }
    }

    /// Plays a visual sequence on the LEDs. An unknown selector lights every
    /// LED and fails without waiting.
    pub fn visual_control(&mut self, selector: u32) -> SeqResult<()> {
        self.regs.set_led_output_mode();
        let sequence = match VisualSequence::try_from(selector) {
            Ok(sequence) => sequence,
            Err(err) => {
                self.regs.set_leds(LedMask::ALL);
                return Err(err);
            }
        };

        for step in sequence.steps() {
            self.regs.set_leds(step.leds);
            self.hold(step.hold);
        }
        Ok(())
    }

    pub fn receive_check(&mut self, selector: u32) -> SeqResult<()> {
        let check = RxCheck::try_from(selector)?;
        let observed = self.regs.read_transceiver();
        match check {
            RxCheck::DefaultValue => {
                if observed == DEFAULT_RX_VALUE {
                    report!(self.console, Ok, "default value detected");
                    Ok(())
                } else {
                    report!(self.console, Ko, "not default value detected");
                    report!(self.console, Debug, "RX data: {}", observed);
                    Err(SequenceError::ValueMismatch {
                        expected: DEFAULT_RX_VALUE,
                        observed,
                    })
                }
            }
        }
    }

    /// Writes one test word; returns the word that went on the wire.
    pub fn transmit_pattern(&mut self, selector: u32) -> SeqResult<u32> {
        let pattern = TxPattern::try_from(selector)?;
        let word = pattern.word(&mut self.pattern);
        self.regs.write_transceiver(word);
        Ok(word)
    }

    /// Square-wave transmit: all zeros then all ones, repeated.
    ///
    /// The bound is checked after each write pair, so a full run completes
    /// [`ALTERNATION_LIMIT`] counted iterations followed by one more pair.
    pub fn transmit_alternation(&mut self) -> SeqResult<u32> {
        self.alternate(ALTERNATION_LIMIT)
    }

    pub(crate) fn alternate(&mut self, limit: u32) -> SeqResult<u32> {
        let mut iterations: u32 = 0;
        loop {
            self.transmit_pattern(TxPattern::AllZeros.selector())?;
            self.transmit_pattern(TxPattern::AllOnes.selector())?;
            if iterations >= limit {
                return Ok(iterations);
            }
            iterations += 1;
        }
    }

    /// Reseeds the generator and streams random words. With
    /// [`RandomLoop::Forever`] this only returns on a write failure.
    pub fn transmit_random(&mut self, mode: RandomLoop) -> SeqResult<u64> {
        self.pattern.seed(TX_RAND_SEED);
        let mut words: u64 = 0;
        loop {
            if let RandomLoop::Words(budget) = mode {
                if words >= budget {
                    return Ok(words);
                }
            }
            self.transmit_pattern(TxPattern::Random.selector())?;
            words += 1;
        }
    }
}
