// ui/cli.rs
//
// UnderTheBoard command console
// - Command registry (name -> handler, help). Linear lookup; the table is tiny.
// - Line editor: fixed 255-byte buffer, echo, backspace. No history.
// - Input comes from any `InputSource`; the stock kernel replays a script.
// - Handlers return `Result`; the dispatcher prints errors, never propagates them.

use core::fmt::Write;
use core::str;

use arrayvec::ArrayVec;

use crate::arch::x86_64::vga::{Color, TextBuffer, Writer, BUFFER_HEIGHT, BUFFER_WIDTH};
use crate::config::KernelConfig;
use crate::security::{PrivilegeLevel, SecurityContext};
use crate::ui::input::InputSource;

pub const MAX_LINE: usize = 255;

const BACKSPACE: u8 = 0x08;

/// Everything a command handler may touch.
pub struct Session<'a, B: TextBuffer> {
    pub screen: &'a mut Writer<B>,
    pub security: &'a mut SecurityContext,
    pub config: &'a KernelConfig,
}

/// What the console does after a command returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// No trailing blank line; the console notes the request.
    Shutdown,
}

type CmdFn<B> = fn(&mut Session<'_, B>) -> Result<Flow, &'static str>;

// —————————————————— registry ——————————————————

struct Command<B: TextBuffer> {
    name: &'static str,
    help: &'static str,
    run: CmdFn<B>,
}

fn registry<B: TextBuffer>() -> [Command<B>; 6] {
    [
        Command { name: "help",     help: "Show this help message",      run: cmd_help },
        Command { name: "sysinfo",  help: "Display system information",  run: cmd_sysinfo },
        Command { name: "security", help: "Show security system status", run: cmd_security },
        Command { name: "game",     help: "Launch the built-in game",    run: cmd_game },
        Command { name: "clear",    help: "Clear the screen",            run: cmd_clear },
        Command { name: "exit",     help: "Shutdown the system",         run: cmd_exit },
    ]
}

fn find<B: TextBuffer>(name: &str) -> Option<Command<B>> {
    registry::<B>().into_iter().find(|c| c.name == name)
}

// —————————————————— console ——————————————————

enum LineStatus {
    Complete,
    Exhausted,
}

pub struct Console<'a, B: TextBuffer, I: InputSource> {
    session: Session<'a, B>,
    input: I,
    line: ArrayVec<u8, MAX_LINE>,
    dispatched: usize,
    shutdown_requested: bool,
}

impl<'a, B: TextBuffer, I: InputSource> Console<'a, B, I> {
    pub fn new(session: Session<'a, B>, input: I) -> Self {
        Self {
            session,
            input,
            line: ArrayVec::new(),
            dispatched: 0,
            shutdown_requested: false,
        }
    }

    pub fn session(&mut self) -> &mut Session<'a, B> {
        &mut self.session
    }

    /// Lines handed to the dispatcher so far.
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }

    /// Prompt, read, dispatch, until the input source runs dry.
    pub fn run(&mut self) {
        let screen = &mut *self.session.screen;
        writeln!(screen, "{} Console", self.session.config.os_name).ok();
        screen.write_string("Type 'help' for available commands\n\n");

        loop {
            self.print_prompt();
            match self.read_line() {
                LineStatus::Complete => {
                    if self.line.is_empty() {
                        continue;
                    }
                    let line = core::mem::take(&mut self.line);
                    match str::from_utf8(&line) {
                        Ok(cmd) => self.execute(cmd),
                        Err(_) => self.session.screen.write_colored("utf8?\n", Color::Red, Color::Black),
                    }
                }
                LineStatus::Exhausted => break,
            }
        }

        self.session
            .screen
            .write_string("\nDemo commands completed. System halted.\n");
        log::info!("cli: input exhausted after {} commands", self.dispatched);
    }

    fn print_prompt(&mut self) {
        match self.session.security.level() {
            PrivilegeLevel::Core => self.session.screen.write_colored("CORE# ", Color::Red, Color::Black),
            PrivilegeLevel::User => self.session.screen.write_colored("USER$ ", Color::Green, Color::Black),
        }
    }

    fn read_line(&mut self) -> LineStatus {
        self.line.clear();
        loop {
            let Some(c) = self.input.next_byte() else {
                return LineStatus::Exhausted;
            };
            match c {
                b'\n' => {
                    self.session.screen.put_char(b'\n');
                    return LineStatus::Complete;
                }
                BACKSPACE => {
                    if self.line.pop().is_some() {
                        self.session.screen.backspace();
                    }
                }
                _ => {
                    // full line: further bytes are dropped
                    if self.line.try_push(c).is_ok() {
                        self.session.screen.put_char(c);
                    }
                }
            }
        }
    }

    /// Runs one command line.
    pub fn execute(&mut self, cmd: &str) {
        self.dispatch(cmd, find::<B>(cmd));
    }

    fn dispatch(&mut self, cmd: &str, entry: Option<Command<B>>) {
        self.dispatched += 1;
        let flow = match entry {
            Some(entry) => {
                log::info!("cli: {}", entry.name);
                match (entry.run)(&mut self.session) {
                    Ok(flow) => flow,
                    Err(e) => {
                        log::warn!("cli: {} failed: {}", entry.name, e);
                        let screen = &mut *self.session.screen;
                        screen.write_colored("Error: ", Color::Red, Color::Black);
                        screen.write_string(e);
                        screen.put_char(b'\n');
                        Flow::Continue
                    }
                }
            }
            None => {
                log::debug!("cli: unknown command {:?}", cmd);
                let screen = &mut *self.session.screen;
                screen.write_colored("Unknown command: ", Color::Red, Color::Black);
                screen.write_string(cmd);
                screen.write_string("\nType 'help' for available commands\n");
                Flow::Continue
            }
        };

        match flow {
            Flow::Continue => self.session.screen.put_char(b'\n'),
            Flow::Shutdown => self.shutdown_requested = true,
        }
    }
}

// —————————————————— commands ——————————————————

fn cmd_help<B: TextBuffer>(s: &mut Session<'_, B>) -> Result<Flow, &'static str> {
    let w = &mut *s.screen;
    w.write_colored("=== AVAILABLE COMMANDS ===\n", Color::Cyan, Color::Black);
    for c in registry::<B>().iter() {
        writeln!(w, "{:<9}- {}", c.name, c.help).ok();
    }
    w.write_colored("===========================\n", Color::Cyan, Color::Black);
    Ok(Flow::Continue)
}

fn cmd_sysinfo<B: TextBuffer>(s: &mut Session<'_, B>) -> Result<Flow, &'static str> {
    let cfg = s.config;
    let w = &mut *s.screen;
    w.write_colored("=== SYSTEM INFORMATION ===\n", Color::LightBlue, Color::Black);
    writeln!(w, "OS Name: {}", cfg.os_name).ok();
    writeln!(w, "Version: {}", cfg.version).ok();
    writeln!(w, "Architecture: {}", cfg.architecture).ok();
    w.write_string("Kernel: Custom microkernel\n");
    w.write_string("Memory: Basic management active\n");
    w.write_string("Security: Multi-layer privilege system\n");
    writeln!(w, "Graphics: VGA text mode ({}x{})", BUFFER_WIDTH, BUFFER_HEIGHT).ok();
    w.write_string("Build: Debug development version\n");
    w.write_colored("===========================\n", Color::LightBlue, Color::Black);
    Ok(Flow::Continue)
}

fn cmd_security<B: TextBuffer>(s: &mut Session<'_, B>) -> Result<Flow, &'static str> {
    s.security.print_status(&mut *s.screen);

    let w = &mut *s.screen;
    w.write_colored("Security Commands:\n", Color::Yellow, Color::Black);
    match s.security.level() {
        PrivilegeLevel::Core => {
            w.write_string("- Core mode: Full system access (current)\n");
            w.write_string("- User mode: Restricted access\n");
        }
        PrivilegeLevel::User => {
            w.write_string("- Core mode: Full system access\n");
            w.write_string("- User mode: Restricted access (current)\n");
        }
    }
    w.write_string("- Memory protection: Active\n");
    w.write_string("- Privilege escalation: Controlled\n");
    Ok(Flow::Continue)
}

cfg_if::cfg_if! {
    if #[cfg(feature = "utb-game")] {
        fn cmd_game<B: TextBuffer>(s: &mut Session<'_, B>) -> Result<Flow, &'static str> {
            crate::games::adventure::launch(&mut *s.screen, s.config);
            Ok(Flow::Continue)
        }
    } else {
        fn cmd_game<B: TextBuffer>(_s: &mut Session<'_, B>) -> Result<Flow, &'static str> {
            Err("game not built into this kernel")
        }
    }
}

fn cmd_clear<B: TextBuffer>(s: &mut Session<'_, B>) -> Result<Flow, &'static str> {
    s.screen.clear();
    Ok(Flow::Continue)
}

fn cmd_exit<B: TextBuffer>(s: &mut Session<'_, B>) -> Result<Flow, &'static str> {
    s.screen.write_colored("Shutting down system...\n", Color::Yellow, Color::Black);
    Ok(Flow::Shutdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::x86_64::vga::{ColorCode, MemoryBuffer};
    use crate::ui::input::ScriptedInput;

    const CFG: KernelConfig = KernelConfig {
        game_moves: "dq",
        ..KernelConfig::DEFAULT.without_delay()
    };

    fn screen() -> Writer<MemoryBuffer> {
        Writer::initialize(MemoryBuffer::new())
    }

    fn text(w: &Writer<MemoryBuffer>, row: usize) -> [u8; BUFFER_WIDTH] {
        let mut out = [0u8; BUFFER_WIDTH];
        for (slot, cell) in out.iter_mut().zip(w.buffer().row(row).unwrap_or_default()) {
            *slot = cell.ascii_character;
        }
        out
    }

    fn row_starts_with(w: &Writer<MemoryBuffer>, row: usize, s: &str) -> bool {
        text(w, row).starts_with(s.as_bytes())
    }

    fn find_row(w: &Writer<MemoryBuffer>, s: &str) -> Option<usize> {
        (0..BUFFER_HEIGHT).find(|&r| row_starts_with(w, r, s))
    }

    fn run_script(script: &'static [&'static str], w: &mut Writer<MemoryBuffer>, sec: &mut SecurityContext) -> usize {
        let session = Session { screen: w, security: sec, config: &CFG };
        let mut console = Console::new(session, ScriptedInput::new(script));
        console.run();
        console.dispatched()
    }

    #[test]
    fn lookup_is_exact() {
        assert!(find::<MemoryBuffer>("help").is_some());
        assert!(find::<MemoryBuffer>("HELP").is_none());
        assert!(find::<MemoryBuffer>("hel").is_none());
    }

    #[test]
    fn banner_prompt_and_halt_message() {
        let mut w = screen();
        let mut sec = SecurityContext::new();
        let n = run_script(&[], &mut w, &mut sec);
        assert_eq!(n, 0);
        assert!(row_starts_with(&w, 0, "UnderTheBoard OS Console"));
        assert!(row_starts_with(&w, 1, "Type 'help' for available commands"));
        assert!(row_starts_with(&w, 3, "CORE# "));
        assert_eq!(w.read_cell(3, 0).unwrap().color_code, ColorCode::new(Color::Red, Color::Black));
        assert!(row_starts_with(&w, 4, "Demo commands completed. System halted."));
    }

    #[test]
    fn user_mode_prompt() {
        let mut w = screen();
        let mut sec = SecurityContext::new();
        sec.switch_to_user_mode();
        run_script(&[], &mut w, &mut sec);
        assert!(row_starts_with(&w, 3, "USER$ "));
        assert_eq!(w.read_cell(3, 0).unwrap().color_code, ColorCode::new(Color::Green, Color::Black));
    }

    #[test]
    fn unknown_command_is_reported() {
        let mut w = screen();
        let mut sec = SecurityContext::new();
        let n = run_script(&["frobnicate\n"], &mut w, &mut sec);
        assert_eq!(n, 1);
        assert!(row_starts_with(&w, 3, "CORE# frobnicate"));
        assert!(row_starts_with(&w, 4, "Unknown command: frobnicate"));
        assert!(row_starts_with(&w, 5, "Type 'help' for available commands"));
        assert_eq!(w.read_cell(4, 0).unwrap().color_code, ColorCode::new(Color::Red, Color::Black));
        // blank line, then the next prompt
        assert!(row_starts_with(&w, 7, "CORE# "));
    }

    #[test]
    fn empty_lines_are_not_dispatched() {
        let mut w = screen();
        let mut sec = SecurityContext::new();
        assert_eq!(run_script(&["\n", "\n"], &mut w, &mut sec), 0);
    }

    #[test]
    fn backspace_edits_the_line() {
        let mut w = screen();
        let mut sec = SecurityContext::new();
        let n = run_script(&["\x08helx\x08p\n"], &mut w, &mut sec);
        assert_eq!(n, 1);
        assert!(row_starts_with(&w, 3, "CORE# help "));
        assert!(row_starts_with(&w, 4, "=== AVAILABLE COMMANDS ==="));
    }

    #[test]
    fn long_lines_are_truncated() {
        const LONG: &str = concat!(
            "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx",
            "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx",
            "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx",
        );
        let mut w = screen();
        let mut sec = SecurityContext::new();
        let session = Session { screen: &mut w, security: &mut sec, config: &CFG };
        let mut console = Console::new(session, ScriptedInput::new(&[LONG]));
        assert!(matches!(console.read_line(), LineStatus::Exhausted));
        assert_eq!(console.line.len(), MAX_LINE);
        // 6-byte prompt was never printed here; echo starts at the origin
        let (row, col) = console.session().screen.cursor();
        assert_eq!(row * BUFFER_WIDTH + col, MAX_LINE);
    }

    #[test]
    fn help_lists_every_command() {
        let mut w = screen();
        let mut sec = SecurityContext::new();
        run_script(&["help\n"], &mut w, &mut sec);
        assert!(row_starts_with(&w, 5, "help     - Show this help message"));
        assert!(row_starts_with(&w, 7, "security - Show security system status"));
        assert!(row_starts_with(&w, 10, "exit     - Shutdown the system"));
        assert!(row_starts_with(&w, 11, "==========================="));
        assert_eq!(w.color(), ColorCode::default());
    }

    #[test]
    fn sysinfo_uses_config() {
        let mut w = screen();
        let mut sec = SecurityContext::new();
        run_script(&["sysinfo\n"], &mut w, &mut sec);
        assert!(find_row(&w, "OS Name: UnderTheBoard OS").is_some());
        assert!(find_row(&w, "Graphics: VGA text mode (80x25)").is_some());
    }

    #[test]
    fn clear_wipes_screen_and_keeps_going() {
        let mut w = screen();
        let mut sec = SecurityContext::new();
        run_script(&["clear\n"], &mut w, &mut sec);
        // cleared, blank line after the command, next prompt, then the halt message
        assert!(row_starts_with(&w, 1, "CORE# "));
        assert!(row_starts_with(&w, 2, "Demo commands completed."));
    }

    #[test]
    fn exit_requests_shutdown_without_blank_line() {
        let mut w = screen();
        let mut sec = SecurityContext::new();
        let session = Session { screen: &mut w, security: &mut sec, config: &CFG };
        let mut console = Console::new(session, ScriptedInput::new(&["exit\n"]));
        console.run();
        assert!(console.shutdown_requested());
        drop(console);
        assert!(row_starts_with(&w, 4, "Shutting down system..."));
        assert!(row_starts_with(&w, 5, "CORE# "));
    }

    fn failing<B: TextBuffer>(_s: &mut Session<'_, B>) -> Result<Flow, &'static str> {
        Err("disk on fire")
    }

    #[test]
    fn handler_error_is_printed_and_console_continues() {
        let mut w = screen();
        let mut sec = SecurityContext::new();
        let session = Session { screen: &mut w, security: &mut sec, config: &CFG };
        let mut console = Console::new(session, ScriptedInput::new(&[]));
        console.dispatch("fail", Some(Command { name: "fail", help: "always fails", run: failing }));
        assert_eq!(console.dispatched(), 1);
        assert!(!console.shutdown_requested());
        console.execute("frobnicate");
        assert_eq!(console.dispatched(), 2);
        drop(console);

        assert!(row_starts_with(&w, 0, "Error: disk on fire"));
        assert_eq!(w.read_cell(0, 0).unwrap().color_code, ColorCode::new(Color::Red, Color::Black));
        assert_eq!(w.read_cell(0, 7).unwrap().color_code, ColorCode::default());
        // trailing blank line, then the next command's output
        assert!(text(&w, 1).iter().all(|&b| b == b' '));
        assert!(row_starts_with(&w, 2, "Unknown command: frobnicate"));
        assert_eq!(w.color(), ColorCode::default());
    }

    #[cfg(not(feature = "utb-game"))]
    #[test]
    fn game_reports_unavailable_without_feature() {
        let mut w = screen();
        let mut sec = SecurityContext::new();
        let n = run_script(&["game\n"], &mut w, &mut sec);
        assert_eq!(n, 1);
        assert!(row_starts_with(&w, 3, "CORE# game"));
        assert!(row_starts_with(&w, 4, "Error: game not built into this kernel"));
        assert_eq!(w.read_cell(4, 0).unwrap().color_code, ColorCode::new(Color::Red, Color::Black));
        assert!(text(&w, 5).iter().all(|&b| b == b' '));
        assert!(row_starts_with(&w, 6, "CORE# "));
        assert!(row_starts_with(&w, 7, "Demo commands completed. System halted."));
    }

    #[cfg(feature = "utb-game")]
    #[test]
    fn game_returns_to_console() {
        let mut w = screen();
        let mut sec = SecurityContext::new();
        let n = run_script(&["game\n", "sysinfo\n"], &mut w, &mut sec);
        assert_eq!(n, 2);
        assert!(find_row(&w, "Returning to console...").is_some());
        assert!(find_row(&w, "Demo commands completed. System halted.").is_some());
    }
}
