//! Capabilities the controller needs from the board that `embedded-hal`
//! doesn't cover.
//!
//! Digital pins, PWM channels and blocking delays come straight from
//! `embedded-hal` (`OutputPin`, `InputPin`, `SetDutyCycle`, `DelayNs`).

use crate::error::Result;

/// Monotonic time since boot
pub trait Clock {
    fn now_us(&self) -> u64;

    fn now_ms(&self) -> u64 {
        self.now_us() / 1_000
    }
}

/// A character LCD addressed by column and row
pub trait CharDisplay {
    fn clear(&mut self) -> Result<()>;

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<()>;

    fn write_str(&mut self, text: &str) -> Result<()>;

    fn write_char(&mut self, c: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.write_str(c.encode_utf8(&mut buf))
    }

    /// Shows or hides the blinking hardware cursor
    fn set_cursor_visible(&mut self, visible: bool) -> Result<()>;
}

/// One analog channel sampled on a 0-1023 scale
pub trait AnalogInput {
    fn read_sample(&mut self) -> Result<u16>;
}

/// A buzzer that can play a tone
pub trait ToneOutput {
    fn tone(&mut self, frequency_hz: u32) -> Result<()>;

    fn no_tone(&mut self) -> Result<()>;
}
