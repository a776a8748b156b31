//! UnderTheBoard VGA Text Output
//!
//! Features:
//! - 80x25 grid of character + attribute cells, addressed as `row * WIDTH + col`.
//! - Cursor wrap-around: past the last row output continues on row 0 and
//!   overwrites what was there. There is no scrolling.
//! - Scoped color writes that always restore the previous attribute.
//! - Storage behind [`TextBuffer`]: volatile MMIO at `0xb8000` on hardware,
//!   or an owned [`MemoryBuffer`] when running hosted.

use core::fmt;
use volatile::Volatile;

pub const BUFFER_HEIGHT: usize = 25;
pub const BUFFER_WIDTH: usize = 80;
pub const BUFFER_CELLS: usize = BUFFER_WIDTH * BUFFER_HEIGHT;
pub const VGA_ADDRESS: usize = 0xb8000;

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    Blue = 1,
    Green = 2,
    Cyan = 3,
    Red = 4,
    Magenta = 5,
    Brown = 6,
    LightGray = 7,
    DarkGray = 8,
    LightBlue = 9,
    LightGreen = 10,
    LightCyan = 11,
    LightRed = 12,
    Pink = 13,
    Yellow = 14,
    White = 15,
}

impl Color {
    /// Palette entry for the low four bits of `nibble`.
    pub const fn from_nibble(nibble: u8) -> Self {
        match nibble & 0x0f {
            0 => Color::Black,
            1 => Color::Blue,
            2 => Color::Green,
            3 => Color::Cyan,
            4 => Color::Red,
            5 => Color::Magenta,
            6 => Color::Brown,
            7 => Color::LightGray,
            8 => Color::DarkGray,
            9 => Color::LightBlue,
            10 => Color::LightGreen,
            11 => Color::LightCyan,
            12 => Color::LightRed,
            13 => Color::Pink,
            14 => Color::Yellow,
            _ => Color::White,
        }
    }
}

/// Packed attribute byte: low nibble foreground, high nibble background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct ColorCode(u8);

impl ColorCode {
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self((bg as u8) << 4 | (fg as u8))
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    pub const fn foreground(self) -> Color {
        Color::from_nibble(self.0)
    }

    pub const fn background(self) -> Color {
        Color::from_nibble(self.0 >> 4)
    }
}

impl Default for ColorCode {
    fn default() -> Self {
        ColorCode::new(Color::LightGray, Color::Black)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ScreenChar {
    pub ascii_character: u8,
    pub color_code: ColorCode,
}

impl ScreenChar {
    pub const fn new(ascii_character: u8, color_code: ColorCode) -> Self {
        Self { ascii_character, color_code }
    }

    pub const fn blank(color_code: ColorCode) -> Self {
        Self::new(b' ', color_code)
    }

    /// The 16-bit cell as the hardware sees it (char low, attribute high).
    pub const fn entry(self) -> u16 {
        self.ascii_character as u16 | (self.color_code.0 as u16) << 8
    }
}

#[inline]
pub const fn cell_index(row: usize, col: usize) -> usize {
    row * BUFFER_WIDTH + col
}

/// Backing store for the character grid. `index` is always `< BUFFER_CELLS`.
pub trait TextBuffer {
    fn write_cell(&mut self, index: usize, cell: ScreenChar);
    fn read_cell(&self, index: usize) -> ScreenChar;
}

#[repr(transparent)]
struct HardwareCells {
    cells: [Volatile<ScreenChar>; BUFFER_CELLS],
}

/// The memory-mapped VGA text buffer.
pub struct VgaBuffer {
    mmio: &'static mut HardwareCells,
}

impl VgaBuffer {
    /// # Safety
    /// `0xb8000` must be mapped to VGA text memory and no other live
    /// `VgaBuffer` may point at it.
    pub unsafe fn new() -> Self {
        Self::at(VGA_ADDRESS)
    }

    /// # Safety
    /// `addr` must point at `BUFFER_CELLS` writable, exclusively owned cells.
    pub unsafe fn at(addr: usize) -> Self {
        Self { mmio: &mut *(addr as *mut HardwareCells) }
    }
}

impl TextBuffer for VgaBuffer {
    fn write_cell(&mut self, index: usize, cell: ScreenChar) {
        self.mmio.cells[index].write(cell);
    }

    fn read_cell(&self, index: usize) -> ScreenChar {
        self.mmio.cells[index].read()
    }
}

/// Owned grid with the same layout as VGA memory.
#[derive(Clone)]
pub struct MemoryBuffer {
    cells: [ScreenChar; BUFFER_CELLS],
}

impl MemoryBuffer {
    pub const fn new() -> Self {
        Self {
            cells: [ScreenChar::blank(ColorCode::new(Color::LightGray, Color::Black)); BUFFER_CELLS],
        }
    }

    pub fn cells(&self) -> &[ScreenChar] {
        &self.cells
    }

    pub fn row(&self, row: usize) -> Option<&[ScreenChar]> {
        if row >= BUFFER_HEIGHT {
            return None;
        }
        let start = cell_index(row, 0);
        Some(&self.cells[start..start + BUFFER_WIDTH])
    }
}

impl Default for MemoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer for MemoryBuffer {
    fn write_cell(&mut self, index: usize, cell: ScreenChar) {
        self.cells[index] = cell;
    }

    fn read_cell(&self, index: usize) -> ScreenChar {
        self.cells[index]
    }
}

/// Cursor-tracking writer over a [`TextBuffer`].
///
/// Created once by the kernel entry point and lent by `&mut` to everything
/// that prints.
pub struct Writer<B: TextBuffer = VgaBuffer> {
    row: usize,
    col: usize,
    color_code: ColorCode,
    buffer: B,
}

impl<B: TextBuffer> Writer<B> {
    /// Wraps `buffer` without touching its contents; cursor at origin.
    pub fn new(buffer: B, color_code: ColorCode) -> Self {
        Self { row: 0, col: 0, color_code, buffer }
    }

    /// Light gray on black, screen cleared.
    pub fn initialize(buffer: B) -> Self {
        let mut writer = Self::new(buffer, ColorCode::default());
        writer.clear();
        writer
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn set_cursor(&mut self, row: usize, col: usize) -> Result<(), &'static str> {
        if row >= BUFFER_HEIGHT || col >= BUFFER_WIDTH {
            return Err("cursor out of bounds");
        }
        self.row = row;
        self.col = col;
        Ok(())
    }

    pub fn color(&self) -> ColorCode {
        self.color_code
    }

    pub fn set_color(&mut self, fg: Color, bg: Color) {
        self.color_code = ColorCode::new(fg, bg);
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    pub fn read_cell(&self, row: usize, col: usize) -> Option<ScreenChar> {
        if row >= BUFFER_HEIGHT || col >= BUFFER_WIDTH {
            return None;
        }
        Some(self.buffer.read_cell(cell_index(row, col)))
    }

    pub fn clear(&mut self) {
        let blank = ScreenChar::blank(self.color_code);
        for index in 0..BUFFER_CELLS {
            self.buffer.write_cell(index, blank);
        }
        self.row = 0;
        self.col = 0;
    }

    /// Writes one cell without moving the cursor.
    pub fn put_entry_at(
        &mut self,
        c: u8,
        color_code: ColorCode,
        row: usize,
        col: usize,
    ) -> Result<(), &'static str> {
        if row >= BUFFER_HEIGHT || col >= BUFFER_WIDTH {
            return Err("cell out of bounds");
        }
        self.buffer.write_cell(cell_index(row, col), ScreenChar::new(c, color_code));
        Ok(())
    }

    pub fn put_char(&mut self, c: u8) {
        if c == b'\n' {
            self.new_line();
            return;
        }
        self.buffer
            .write_cell(cell_index(self.row, self.col), ScreenChar::new(c, self.color_code));
        self.col += 1;
        if self.col == BUFFER_WIDTH {
            self.new_line();
        }
    }

    pub fn write_string(&mut self, s: &str) {
        for byte in s.bytes() {
            self.put_char(byte);
        }
    }

    pub fn write_colored(&mut self, s: &str, fg: Color, bg: Color) {
        self.with_color(fg, bg, |w| w.write_string(s));
    }

    /// Runs `f` under `fg`/`bg`, then puts the previous attribute back.
    pub fn with_color<R>(&mut self, fg: Color, bg: Color, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.color_code;
        self.set_color(fg, bg);
        let out = f(self);
        self.color_code = saved;
        out
    }

    /// Steps back one cell and blanks it. Mirrors the forward wrap rules.
    pub fn backspace(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else {
            self.col = BUFFER_WIDTH - 1;
            self.row = if self.row == 0 { BUFFER_HEIGHT - 1 } else { self.row - 1 };
        }
        self.buffer
            .write_cell(cell_index(self.row, self.col), ScreenChar::blank(self.color_code));
    }

    // wrap, don't scroll
    fn new_line(&mut self) {
        self.col = 0;
        self.row = (self.row + 1) % BUFFER_HEIGHT;
    }
}

impl<B: TextBuffer> fmt::Write for Writer<B> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_string(s);
        Ok(())
    }
}
