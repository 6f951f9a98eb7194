//! Test doubles for the board capabilities.

use std::cell::Cell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin};
use embedded_hal::pwm::{ErrorType, SetDutyCycle};

use crate::actuators::{Actuators, MotorCommand, Rgb};
use crate::config::LCD_COLUMNS;
use crate::error::{Error, Result};
use crate::hal::{AnalogInput, CharDisplay, Clock};
use crate::input::{ButtonSample, Buttons};
use crate::sensors::{SensorSnapshot, Sensors};

pub struct FixedSample(pub u16);

impl AnalogInput for FixedSample {
    fn read_sample(&mut self) -> Result<u16> {
        Ok(self.0)
    }
}

pub struct FailingInput;

impl AnalogInput for FailingInput {
    fn read_sample(&mut self) -> Result<u16> {
        Err(Error::Analog)
    }
}

pub struct FakePwm {
    pub duty: u16,
    max: u16,
}

impl FakePwm {
    pub fn new(max: u16) -> FakePwm {
        Self { duty: 0, max }
    }
}

impl ErrorType for FakePwm {
    type Error = Infallible;
}

impl SetDutyCycle for FakePwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max
    }

    fn set_duty_cycle(&mut self, duty: u16) -> core::result::Result<(), Self::Error> {
        self.duty = duty;
        Ok(())
    }
}

/// Shared fake time: the clock reads it, the delay advances it
#[derive(Clone, Default)]
pub struct FakeTime {
    nanos: Rc<Cell<u64>>,
}

impl FakeTime {
    pub fn new() -> FakeTime {
        Self::default()
    }

    pub fn set_ms(&self, ms: u64) {
        self.nanos.set(ms * 1_000_000);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.nanos.set(self.nanos.get() + ms * 1_000_000);
    }
}

impl Clock for FakeTime {
    fn now_us(&self) -> u64 {
        self.nanos.get() / 1_000
    }
}

impl DelayNs for FakeTime {
    fn delay_ns(&mut self, ns: u32) {
        self.nanos.set(self.nanos.get() + u64::from(ns));
    }
}

/// Echo line that is high between `rise_us` and `fall_us` on the shared fake
/// time. Every read moves time on by `read_ns`, like a real pin access.
pub struct ScheduledEcho {
    time: FakeTime,
    rise_us: u64,
    fall_us: u64,
    read_ns: u32,
}

impl ScheduledEcho {
    pub fn new(time: FakeTime, rise_us: u64, fall_us: u64, read_ns: u32) -> ScheduledEcho {
        Self {
            time,
            rise_us,
            fall_us,
            read_ns,
        }
    }
}

impl digital::ErrorType for ScheduledEcho {
    type Error = Infallible;
}

impl InputPin for ScheduledEcho {
    fn is_high(&mut self) -> core::result::Result<bool, Infallible> {
        let now_us = self.time.now_us();
        self.time.delay_ns(self.read_ns);
        Ok(now_us >= self.rise_us && now_us < self.fall_us)
    }

    fn is_low(&mut self) -> core::result::Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

/// 16x2 LCD that keeps what is on screen
pub struct FakeDisplay {
    cells: [[char; LCD_COLUMNS]; 2],
    col: usize,
    row: usize,
    pub clears: usize,
    pub cursor_visible: bool,
}

impl FakeDisplay {
    pub fn new() -> FakeDisplay {
        Self {
            cells: [[' '; LCD_COLUMNS]; 2],
            col: 0,
            row: 0,
            clears: 0,
            cursor_visible: false,
        }
    }

    /// Text of a row with trailing blanks removed
    pub fn row(&self, row: usize) -> String {
        let text: String = self.cells[row].iter().collect();
        text.trim_end().into()
    }

    pub fn cell(&self, col: usize, row: usize) -> char {
        self.cells[row][col]
    }
}

impl CharDisplay for FakeDisplay {
    fn clear(&mut self) -> Result<()> {
        self.cells = [[' '; LCD_COLUMNS]; 2];
        self.col = 0;
        self.row = 0;
        self.clears += 1;
        Ok(())
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<()> {
        self.col = col.into();
        self.row = row.into();
        Ok(())
    }

    fn write_str(&mut self, text: &str) -> Result<()> {
        for c in text.chars() {
            if self.col < LCD_COLUMNS && self.row < 2 {
                self.cells[self.row][self.col] = c;
            }
            self.col += 1;
        }
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        self.cursor_visible = visible;
        Ok(())
    }
}

/// Outputs as last set, plus a count of pump starts and every tone played
pub struct FakeActuators {
    pub indicator: Rgb,
    pub buzzer: Option<u32>,
    pub tones: Vec<u32>,
    pub lamp: bool,
    pub motor: MotorCommand,
    pub pump: bool,
    pub pump_starts: usize,
}

impl FakeActuators {
    pub fn new() -> FakeActuators {
        Self {
            indicator: Rgb::OFF,
            buzzer: None,
            tones: Vec::new(),
            lamp: false,
            motor: MotorCommand::Stop,
            pump: false,
            pump_starts: 0,
        }
    }
}

impl Actuators for FakeActuators {
    fn set_indicator(&mut self, color: Rgb) -> Result<()> {
        self.indicator = color;
        Ok(())
    }

    fn set_buzzer(&mut self, tone_hz: Option<u32>) -> Result<()> {
        self.tones.extend(tone_hz);
        self.buzzer = tone_hz;
        Ok(())
    }

    fn set_lamp(&mut self, on: bool) -> Result<()> {
        self.lamp = on;
        Ok(())
    }

    fn drive_motor(&mut self, command: MotorCommand) -> Result<()> {
        self.motor = command;
        Ok(())
    }

    fn set_pump(&mut self, on: bool) -> Result<()> {
        if on && !self.pump {
            self.pump_starts += 1;
        }
        self.pump = on;
        Ok(())
    }
}

/// Sensors returning a snapshot the test can swap out
pub struct FakeSensors {
    pub snapshot: SensorSnapshot,
}

impl Sensors for FakeSensors {
    fn sample(&mut self) -> SensorSnapshot {
        self.snapshot
    }
}

/// Buttons replaying a script, one sample per tick, then all released
pub struct ScriptedButtons {
    script: VecDeque<ButtonSample>,
}

impl ScriptedButtons {
    pub fn new(samples: Vec<ButtonSample>) -> ScriptedButtons {
        Self {
            script: samples.into(),
        }
    }
}

impl Buttons for ScriptedButtons {
    fn sample(&mut self) -> ButtonSample {
        self.script.pop_front().unwrap_or_default()
    }
}
