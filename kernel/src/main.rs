//! UnderTheBoard Freestanding Entrypoint (src/main.rs)
//!
//! Built only with `--features bare-metal` for a bare-metal target. The
//! loader jumps to `_start` with VGA text mode active and the low 1 MiB
//! identity-mapped.

#![no_std]
#![no_main]

use core::fmt::Write;
use core::panic::PanicInfo;

use undertheboard_kernel::arch::x86_64::halt_loop;
use undertheboard_kernel::arch::x86_64::vga::{Color, ColorCode, VgaBuffer, Writer};

#[no_mangle]
pub extern "C" fn _start() -> ! {
    undertheboard_kernel::kernel_main()
}

/// Trap any kernel panic: report on screen and serial, then park.
#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    // the boot writer is unreachable from here; take the screen over
    let mut screen = Writer::new(
        unsafe { VgaBuffer::new() },
        ColorCode::new(Color::White, Color::Red),
    );
    screen.write_string("\n[KERNEL PANIC]\n");
    writeln!(screen, "{}", info).ok();
    undertheboard_kernel::serial_println!("[PANIC] {}", info);
    halt_loop()
}
