use eury_core::Spin;
use serde::Serialize;

/// Spin delay that only counts.
///
/// Keeps the iteration totals the real busy-wait would have burned, so a
/// full campaign runs in host time without changing what was asked for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VirtualClock {
    spins: u64,
    cycles: u64,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of non-trivial spin calls.
    pub fn spins(&self) -> u64 {
        self.spins
    }

    /// Total iterations requested.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Spin for VirtualClock {
    fn spin(&mut self, cycles: u32) {
        if cycles == 0 {
            return;
        }
        self.spins += 1;
        self.cycles += cycles as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_spin_is_not_counted() {
        let mut clock = VirtualClock::new();
        clock.spin(0);
        assert_eq!(clock.spins(), 0);
        clock.spin(5_000_000);
        clock.spin(5_000_000);
        assert_eq!(clock.spins(), 2);
        assert_eq!(clock.cycles(), 10_000_000);
        clock.reset();
        assert_eq!(clock.cycles(), 0);
    }
}
