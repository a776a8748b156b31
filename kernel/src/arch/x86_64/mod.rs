//! x86_64 Architecture Support

pub mod serial;
pub mod vga;

/// Parks the CPU forever.
pub fn halt_loop() -> ! {
    loop {
        ::x86_64::instructions::hlt();
    }
}
