#![no_std]
#![no_main]

use eury_core::{run_campaign, BoardRegisters, BusyWait, Lcg, Mmio, RandomLoop};
use panic_halt as _;
use riscv_rt::entry;

mod uart;

use uart::Uart;

#[entry]
fn main() -> ! {
    // SAFETY: the register map only resolves the LED, transceiver and UART
    // addresses of this SoC, and this is the only execution context.
    let mut regs = BoardRegisters::new(unsafe { Mmio::new() });
    let console = Uart::new(unsafe { Mmio::new() });

    // The randomized transmit loop is the last diagnostic and does not
    // return on hardware; a reset restarts the campaign.
    let _ = run_campaign(&mut regs, BusyWait, Lcg::new(), console, RandomLoop::Forever);

    loop {
        // SAFETY: wfi has no memory effects.
        unsafe { riscv::asm::wfi() };
    }
}
