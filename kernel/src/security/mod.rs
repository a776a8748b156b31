//! UnderTheBoard Security System
//!
//! Holds the current privilege level and prints its status banner. The level
//! is a label only: nothing in the kernel checks it before doing work.

use core::fmt;

use crate::arch::x86_64::vga::{Color, TextBuffer, Writer};

/// Privilege levels, numbered after the x86 ring they stand for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PrivilegeLevel {
    Core = 0, // Ring 0 - complete system control
    User = 3, // Ring 3 - user applications
}

impl PrivilegeLevel {
    /// Kernel operations share ring 0 with core mode.
    pub const KERNEL: PrivilegeLevel = PrivilegeLevel::Core;

    pub const fn ring(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for PrivilegeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrivilegeLevel::Core => write!(f, "CORE MODE (Ring {})", self.ring()),
            PrivilegeLevel::User => write!(f, "USER MODE (Ring {})", self.ring()),
        }
    }
}

#[derive(Debug)]
pub struct SecurityContext {
    level: PrivilegeLevel,
}

impl SecurityContext {
    pub const fn new() -> Self {
        Self { level: PrivilegeLevel::Core }
    }

    /// Resets to core mode and announces it.
    pub fn init<B: TextBuffer>(&mut self, w: &mut Writer<B>) {
        self.level = PrivilegeLevel::Core;
        w.write_colored("[SECURITY] ", Color::Yellow, Color::Black);
        w.write_string("Multi-layer security system initialized\n");
        w.write_colored("[CORE MODE] ", Color::Red, Color::Black);
        w.write_string("Full system control enabled\n");
        log::info!("security: initialized in {}", self.level);
    }

    pub fn level(&self) -> PrivilegeLevel {
        self.level
    }

    pub fn switch_to_core_mode(&mut self) {
        self.switch(PrivilegeLevel::Core);
    }

    pub fn switch_to_user_mode(&mut self) {
        self.switch(PrivilegeLevel::User);
    }

    fn switch(&mut self, to: PrivilegeLevel) {
        if self.level != to {
            log::info!("security: {} -> {}", self.level, to);
        }
        self.level = to;
    }

    pub fn print_status<B: TextBuffer>(&self, w: &mut Writer<B>) {
        w.write_colored("\n=== SECURITY SYSTEM STATUS ===\n", Color::Cyan, Color::Black);

        match self.level {
            PrivilegeLevel::Core => {
                w.write_colored("Current Mode: CORE MODE (Ring 0)\n", Color::Red, Color::Black);
                w.write_string("Privileges: Full system control\n");
                w.write_string("Access: All hardware, memory, and kernel functions\n");
            }
            PrivilegeLevel::User => {
                w.write_colored("Current Mode: USER MODE (Ring 3)\n", Color::Green, Color::Black);
                w.write_string("Privileges: Limited user operations\n");
                w.write_string("Access: Restricted to user-space operations\n");
            }
        }

        w.write_string("Security Features:\n");
        w.write_string("- Memory protection enabled\n");
        w.write_string("- Privilege level enforcement\n");
        w.write_string("- Ring-based access control\n");
        w.write_colored("===============================\n\n", Color::Cyan, Color::Black);
    }
}

impl Default for SecurityContext {
    fn default() -> Self {
        Self::new()
    }
}
