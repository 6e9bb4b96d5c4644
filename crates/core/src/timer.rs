use core::hint::black_box;

/// Software delay measured in loop iterations.
///
/// Only the iteration count is a contract; how long an iteration takes
/// depends on the core clock and the pipeline.
pub trait Spin {
    fn spin(&mut self, cycles: u32);
}

impl<S: Spin + ?Sized> Spin for &mut S {
    fn spin(&mut self, cycles: u32) {
        (**self).spin(cycles)
    }
}

/// Tight counting loop, no timer peripheral involved.
#[derive(Debug, Default, Clone, Copy)]
pub struct BusyWait;

impl Spin for BusyWait {
    fn spin(&mut self, cycles: u32) {
        spin(cycles);
    }
}

/// Counts from 0 up to `cycles` and returns the final counter value.
#[inline(never)]
pub fn spin(cycles: u32) -> u32 {
    let mut count: u32 = 0;
    while black_box(count) < cycles {
        count += 1;
    }
    count
}
