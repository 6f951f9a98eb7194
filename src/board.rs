//! Pico implementations of the controller's board capabilities.

use core::cell::RefCell;

use embedded_hal_0_2::adc::{Channel, OneShot};
use lcd1602_rs::LCD1602;
use plant_stand::hal::{AnalogInput, CharDisplay, Clock};
use plant_stand::{Error, Result};
use rp_pico::hal::adc::Adc;
use rp_pico::hal::gpio::bank0::{Gpio0, Gpio1, Gpio2, Gpio3, Gpio4, Gpio5};
use rp_pico::hal::gpio::{FunctionSio, Pin, PullDown, SioOutput};
use rp_pico::hal::Timer;

type LcdPin<P> = Pin<P, FunctionSio<SioOutput>, PullDown>;

pub type Lcd = LCD1602<
    LcdPin<Gpio1>,
    LcdPin<Gpio0>,
    LcdPin<Gpio2>,
    LcdPin<Gpio3>,
    LcdPin<Gpio4>,
    LcdPin<Gpio5>,
    Timer,
>;

/// The 16x2 LCD in 4-bit mode
pub struct LcdDisplay {
    lcd: Lcd,
}

impl LcdDisplay {
    pub fn new(lcd: Lcd) -> Self {
        Self { lcd }
    }
}

impl CharDisplay for LcdDisplay {
    fn clear(&mut self) -> Result<()> {
        self.lcd.clear().map_err(|_| Error::Display)
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<()> {
        self.lcd.set_position(col, row).map_err(|_| Error::Display)
    }

    fn write_str(&mut self, text: &str) -> Result<()> {
        self.lcd.print(text).map_err(|_| Error::Display)
    }

    // lcd1602-rs exposes no cursor on/off command, so the cursor stays hidden
    fn set_cursor_visible(&mut self, _visible: bool) -> Result<()> {
        Ok(())
    }
}

/// Time from the RP2040's 1 MHz timer
pub struct BoardClock {
    timer: Timer,
}

impl BoardClock {
    pub fn new(timer: Timer) -> Self {
        Self { timer }
    }
}

impl Clock for BoardClock {
    fn now_us(&self) -> u64 {
        self.timer.get_counter().ticks()
    }
}

/// One ADC input on the shared converter.
/// The RP2040 samples 12 bits; readings are scaled down to 0-1023
pub struct AdcChannel<'a, P> {
    adc: &'a RefCell<Adc>,
    pin: P,
}

impl<'a, P: Channel<Adc, ID = u8>> AdcChannel<'a, P> {
    pub fn new(adc: &'a RefCell<Adc>, pin: P) -> Self {
        Self { adc, pin }
    }
}

impl<P: Channel<Adc, ID = u8>> AnalogInput for AdcChannel<'_, P> {
    fn read_sample(&mut self) -> Result<u16> {
        let mut adc = self.adc.borrow_mut();
        let raw: u16 = nb::block!(adc.read(&mut self.pin)).map_err(|_| Error::Analog)?;
        Ok(raw >> 2)
    }
}
