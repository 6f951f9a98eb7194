use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use heapless::String;
use ufmt::{uWrite, uwrite};

use crate::config::{LCD_COLUMNS, SELECTOR_COLUMN, SELECTOR_GLYPH};
use crate::error::Result;
use crate::hal::CharDisplay;

/// One LCD row worth of text.
/// Anything past the 16th column is dropped, the same as the LCD would
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    text: String<LCD_COLUMNS>,
}

impl LineBuffer {
    pub fn new() -> LineBuffer {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<&str> for LineBuffer {
    fn from(text: &str) -> Self {
        let mut line = LineBuffer::new();
        let _ = line.write_str(text);
        line
    }
}

impl uWrite for LineBuffer {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> core::result::Result<(), Infallible> {
        for c in s.chars() {
            if self.text.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Whether a message clears the screen before and after it is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clearing {
    /// Write over whatever is on screen
    Keep,
    /// Clear, show, pause, clear again
    Around,
}

/// Draws text on the LCD.
///
/// Keeps a generation count bumped by every clear so screens can tell that
/// something else has drawn over them and repaint.
pub struct Renderer<D> {
    display: D,
    generation: u32,
}

impl<D: CharDisplay> Renderer<D> {
    pub fn new(display: D) -> Self {
        Self {
            display,
            generation: 0,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn release(self) -> D {
        self.display
    }

    /// Number of clears so far
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn clear(&mut self) -> Result<()> {
        self.display.clear()?;
        self.generation = self.generation.wrapping_add(1);
        Ok(())
    }

    /// Writes both rows, starting at column 0, over the current contents
    /// param top: First row text
    /// param bottom: Second row text
    pub fn show_lines(&mut self, top: &LineBuffer, bottom: &LineBuffer) -> Result<()> {
        self.display.set_cursor(0, 0)?;
        self.display.write_str(top.as_str())?;
        self.display.set_cursor(0, 1)?;
        self.display.write_str(bottom.as_str())
    }

    /// Shows a two row message and holds it on screen
    /// param top: First row text
    /// param bottom: Second row text
    /// param clearing: If the screen is cleared before and after the message
    /// param pause_ms: How long the message stays up
    /// param delay: Delay instance
    pub fn show_message<W: DelayNs>(
        &mut self,
        top: &str,
        bottom: &str,
        clearing: Clearing,
        pause_ms: u32,
        delay: &mut W,
    ) -> Result<()> {
        if clearing == Clearing::Around {
            self.clear()?;
        }
        self.show_lines(&top.into(), &bottom.into())?;
        delay.delay_ms(pause_ms);
        if clearing == Clearing::Around {
            self.clear()?;
        }
        Ok(())
    }

    /// Rewrites a number in place, first blanking the cells a wider old value may have used
    /// param value: The number
    /// param col: The x-coordinate
    /// param row: The y-coordinate
    /// param blank_cells: How many cells to blank from `col`
    /// param suffix: Text written right after the number
    pub fn overwrite_number(
        &mut self,
        value: i32,
        col: u8,
        row: u8,
        blank_cells: u8,
        suffix: &str,
    ) -> Result<()> {
        self.display.set_cursor(col, row)?;
        for _ in 0..blank_cells {
            self.display.write_char(' ')?;
        }

        let mut text = LineBuffer::new();
        let _ = uwrite!(&mut text, "{}{}", value, suffix);
        self.display.set_cursor(col, row)?;
        self.display.write_str(text.as_str())
    }

    /// Renders the `<` selector at the end of a row, or blanks it
    /// param row: The y-coordinate
    /// param active: whether to add or remove the selector
    pub fn selector(&mut self, row: u8, active: bool) -> Result<()> {
        self.display.set_cursor(SELECTOR_COLUMN, row)?;
        self.display
            .write_char(if active { SELECTOR_GLYPH } else { ' ' })
    }

    pub fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        self.display.set_cursor_visible(visible)
    }
}
