// kernel/src/arch/x86_64/serial.rs
//! COM1 serial port, the kernel log sink

use core::fmt;
use spin::Mutex;
use ::x86_64::instructions::port::Port;

pub const COM1: u16 = 0x3F8;

pub struct SerialPort {
    data: Port<u8>,
    int_enable: Port<u8>,
    fifo_ctrl: Port<u8>,
    line_ctrl: Port<u8>,
    modem_ctrl: Port<u8>,
    line_status: Port<u8>,
}

impl SerialPort {
    /// # Safety
    /// `base` must be the I/O base of a 16550-compatible UART.
    pub unsafe fn new(base: u16) -> Self {
        SerialPort {
            data: Port::new(base),
            int_enable: Port::new(base + 1),
            fifo_ctrl: Port::new(base + 2),
            line_ctrl: Port::new(base + 3),
            modem_ctrl: Port::new(base + 4),
            line_status: Port::new(base + 5),
        }
    }

    /// 38400 baud, 8N1, FIFO on. Polled: UART interrupts stay off.
    pub fn init(&mut self) {
        unsafe {
            self.int_enable.write(0x00);

            // DLAB on, divisor 3
            self.line_ctrl.write(0x80);
            self.data.write(0x03);
            self.int_enable.write(0x00);

            // 8 bits, no parity, one stop bit
            self.line_ctrl.write(0x03);

            // FIFO enabled and cleared, 14-byte threshold
            self.fifo_ctrl.write(0xC7);

            // RTS/DSR set
            self.modem_ctrl.write(0x0B);
        }
    }

    fn is_transmit_empty(&mut self) -> bool {
        unsafe { self.line_status.read() & 0x20 != 0 }
    }

    pub fn send(&mut self, data: u8) {
        while !self.is_transmit_empty() {
            core::hint::spin_loop();
        }
        unsafe {
            self.data.write(data);
        }
    }

    pub fn send_string(&mut self, s: &str) {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.send(b'\r');
            }
            self.send(byte);
        }
    }
}

impl fmt::Write for SerialPort {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.send_string(s);
        Ok(())
    }
}

// Stays `None` until `init`; output before that is dropped.
static SERIAL1: Mutex<Option<SerialPort>> = Mutex::new(None);

/// Brings up COM1. Only the freestanding entry point calls this.
pub fn init() {
    let mut serial = unsafe { SerialPort::new(COM1) };
    serial.init();
    *SERIAL1.lock() = Some(serial);
}

pub fn is_initialized() -> bool {
    SERIAL1.lock().is_some()
}

#[macro_export]
macro_rules! serial_print {
    ($($arg:tt)*) => {
        $crate::arch::x86_64::serial::_print(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! serial_println {
    () => ($crate::serial_print!("\n"));
    ($($arg:tt)*) => {
        $crate::serial_print!("{}\n", format_args!($($arg)*))
    };
}

#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    use core::fmt::Write;
    if let Some(serial) = SERIAL1.lock().as_mut() {
        let _ = serial.write_fmt(args);
    }
}
