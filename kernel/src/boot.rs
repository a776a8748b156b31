//! UnderTheBoard Kernel Entry Sequence
//!
//! `kernel_main` owns the hardware: it brings up COM1 and the logger, wraps
//! VGA memory in a [`Writer`] and hands that writer down by reference.
//! `run` is the part that only needs a screen and an input source.

use crate::arch::x86_64::vga::{Color, TextBuffer, VgaBuffer, Writer};
use crate::arch::x86_64::{halt_loop, serial};
use crate::config::KernelConfig;
use crate::klog;
use crate::security::SecurityContext;
use crate::ui::cli::{Console, Session};
use crate::ui::input::{InputSource, ScriptedInput};

/// What the console got through before the input ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootReport {
    pub commands: usize,
    pub shutdown_requested: bool,
}

/// Root kernel entry, called from `_start`.
pub fn kernel_main() -> ! {
    let config = KernelConfig::DEFAULT;

    if cfg!(feature = "utb-log-serial") {
        serial::init();
    }
    if let Err(e) = klog::init(config.log_level) {
        crate::serial_println!("[BOOT] {}", e);
    }
    log::info!("boot: {} v{} starting", config.os_name, config.version);

    // SAFETY: sole owner of VGA text memory from here on; the panic
    // handler only touches it once this frame is gone for good.
    let mut screen = Writer::initialize(unsafe { VgaBuffer::new() });
    let mut security = SecurityContext::new();
    let report = run(
        &mut screen,
        &mut security,
        &config,
        ScriptedInput::new(config.console_script),
    );

    log::info!(
        "boot: console done ({} commands, shutdown requested: {}), halting",
        report.commands,
        report.shutdown_requested
    );
    halt_loop()
}

/// Banner, security bring-up, status report, then the console.
pub fn run<B: TextBuffer, I: InputSource>(
    screen: &mut Writer<B>,
    security: &mut SecurityContext,
    config: &KernelConfig,
    input: I,
) -> BootReport {
    screen.set_color(config.foreground, config.background);
    screen.clear();

    screen.write_colored(config.os_name, Color::LightCyan, Color::Black);
    screen.write_colored(" v", Color::LightCyan, Color::Black);
    screen.write_colored(config.version, Color::LightCyan, Color::Black);
    screen.put_char(b'\n');
    screen.write_colored(config.architecture, Color::White, Color::Black);
    screen.write_colored(" Operating System\n", Color::White, Color::Black);
    screen.write_string("=======================\n\n");

    security.init(screen);

    screen.write_string("Kernel loaded successfully\n");
    screen.write_string("VGA text mode initialized\n");
    screen.write_string("Memory management: Basic\n");
    screen.write_string("Privilege levels: Core/User modes active\n\n");
    log::info!("boot: display and security up");

    security.print_status(screen);

    screen.write_colored("Starting command console...\n", Color::LightGreen, Color::Black);

    let session = Session { screen, security, config };
    let mut console = Console::new(session, input);
    console.run();

    BootReport {
        commands: console.dispatched(),
        shutdown_requested: console.shutdown_requested(),
    }
}
