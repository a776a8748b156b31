// ui/input.rs
//
// Input seam for the console.
// - `InputSource` yields cooked bytes; `None` means no more input, ever.
// - `ScriptedInput` replays compiled-in command lines in place of a keyboard.

/// Where the console gets its keystrokes from.
pub trait InputSource {
    fn next_byte(&mut self) -> Option<u8>;
}

impl<I: InputSource + ?Sized> InputSource for &mut I {
    fn next_byte(&mut self) -> Option<u8> {
        (**self).next_byte()
    }
}

/// Replays `script` byte by byte, line after line.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    script: &'static [&'static str],
    line: usize,
    pos: usize,
}

impl ScriptedInput {
    pub const fn new(script: &'static [&'static str]) -> Self {
        Self { script, line: 0, pos: 0 }
    }

    pub fn is_exhausted(&self) -> bool {
        self.line >= self.script.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_byte(&mut self) -> Option<u8> {
        while let Some(cmd) = self.script.get(self.line) {
            if let Some(&b) = cmd.as_bytes().get(self.pos) {
                self.pos += 1;
                return Some(b);
            }
            self.line += 1;
            self.pos = 0;
        }
        None
    }
}
