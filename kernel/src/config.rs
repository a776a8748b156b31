//! Compile-time kernel configuration
//!
//! Everything the kernel would otherwise read from a command line or a disk
//! is fixed here. Cargo features (`utb-log-serial`, `utb-game`, `bare-metal`)
//! cover the build-time switches.

use crate::arch::x86_64::vga::Color;

#[derive(Debug, Clone, Copy)]
pub struct KernelConfig {
    pub os_name: &'static str,
    pub version: &'static str,
    pub architecture: &'static str,
    pub foreground: Color,
    pub background: Color,
    /// Keystrokes replayed into the console, one entry per command line.
    pub console_script: &'static [&'static str],
    /// Adventure moves; `q` ends the game.
    pub game_moves: &'static str,
    /// Busy-wait iterations after each game move. 0 disables the delay.
    pub move_delay_spins: u32,
    pub log_level: log::LevelFilter,
}

impl KernelConfig {
    pub const DEFAULT: KernelConfig = KernelConfig {
        os_name: "UnderTheBoard OS",
        version: "1.0",
        architecture: "x86_64",
        foreground: Color::LightGray,
        background: Color::Black,
        console_script: &["help\n", "sysinfo\n", "security\n", "game\n", "exit\n"],
        game_moves: "ddddssssaaaaawwwwq",
        move_delay_spins: 1_000_000,
        log_level: log::LevelFilter::Info,
    };

    /// Same as `DEFAULT` with no busy-wait, for hosted runs.
    pub const fn without_delay(self) -> Self {
        KernelConfig { move_delay_spins: 0, ..self }
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_script_ends_with_exit() {
        let cfg = KernelConfig::default();
        assert_eq!(cfg.console_script.last(), Some(&"exit\n"));
        assert!(cfg.console_script.iter().all(|c| c.ends_with('\n')));
        assert!(cfg.game_moves.ends_with('q'));
    }

    #[test]
    fn without_delay_keeps_everything_else() {
        let cfg = KernelConfig::DEFAULT.without_delay();
        assert_eq!(cfg.move_delay_spins, 0);
        assert_eq!(cfg.os_name, KernelConfig::DEFAULT.os_name);
        assert_eq!(cfg.game_moves, KernelConfig::DEFAULT.game_moves);
    }
}
