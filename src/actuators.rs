//! Thin drivers for the stand's outputs.
//!
//! Every driver is stateless apart from the pins it owns: each call sets the
//! output outright, so repeating a call is harmless.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::error::{Error, Result};
use crate::hal::ToneOutput;

/// Colour of the RGB status indicator, 0-255 per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const OFF: Rgb = Rgb::new(0, 0, 0);
    /// Everything in range
    pub const OK: Rgb = Rgb::new(0, 255, 0);
    /// Something needs attention
    pub const ALERT: Rgb = Rgb::new(255, 0, 0);
    /// Watering in progress
    pub const INFO: Rgb = Rgb::new(0, 0, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Rgb {
        Self { red, green, blue }
    }
}

/// What the lift motor should do with the lamp arm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorCommand {
    Raise,
    Lower,
    Stop,
}

/// Every output of the stand
pub trait Actuators {
    fn set_indicator(&mut self, color: Rgb) -> Result<()>;

    /// `Some(hz)` plays a tone, `None` silences the buzzer
    fn set_buzzer(&mut self, tone_hz: Option<u32>) -> Result<()>;

    fn set_lamp(&mut self, on: bool) -> Result<()>;

    fn drive_motor(&mut self, command: MotorCommand) -> Result<()>;

    fn set_pump(&mut self, on: bool) -> Result<()>;
}

/// Anything that can show an [`Rgb`] colour
pub trait StatusIndicator {
    fn show(&mut self, color: Rgb) -> Result<()>;
}

/// Anything that can carry out a [`MotorCommand`]
pub trait Motor {
    fn drive(&mut self, command: MotorCommand) -> Result<()>;
}

/// Common cathode RGB LED on three PWM channels
pub struct Indicator<R, G, B> {
    red: R,
    green: G,
    blue: B,
}

impl<R: SetDutyCycle, G: SetDutyCycle, B: SetDutyCycle> Indicator<R, G, B> {
    pub fn new(red: R, green: G, blue: B) -> Self {
        Self { red, green, blue }
    }

    pub fn release(self) -> (R, G, B) {
        (self.red, self.green, self.blue)
    }
}

impl<R: SetDutyCycle, G: SetDutyCycle, B: SetDutyCycle> StatusIndicator for Indicator<R, G, B> {
    fn show(&mut self, color: Rgb) -> Result<()> {
        self.red
            .set_duty_cycle_fraction(color.red.into(), 255)
            .map_err(|_| Error::Pwm)?;
        self.green
            .set_duty_cycle_fraction(color.green.into(), 255)
            .map_err(|_| Error::Pwm)?;
        self.blue
            .set_duty_cycle_fraction(color.blue.into(), 255)
            .map_err(|_| Error::Pwm)
    }
}

/// Passive buzzer on a PWM channel.
///
/// The slice feeding the channel is set up by the board for one pitch, passed
/// in as `pitch_hz`. A tone is a 50% duty square wave at that pitch; any other
/// frequency is refused with [`Error::Tone`].
pub struct PwmTone<C> {
    channel: C,
    pitch_hz: u32,
}

impl<C: SetDutyCycle> PwmTone<C> {
    pub fn new(channel: C, pitch_hz: u32) -> Self {
        Self { channel, pitch_hz }
    }

    pub fn pitch_hz(&self) -> u32 {
        self.pitch_hz
    }

    pub fn release(self) -> C {
        self.channel
    }
}

impl<C: SetDutyCycle> ToneOutput for PwmTone<C> {
    fn tone(&mut self, frequency_hz: u32) -> Result<()> {
        if frequency_hz != self.pitch_hz {
            return Err(Error::Tone);
        }
        self.channel
            .set_duty_cycle_percent(50)
            .map_err(|_| Error::Pwm)
    }

    fn no_tone(&mut self) -> Result<()> {
        self.channel.set_duty_cycle_fully_off().map_err(|_| Error::Pwm)
    }
}

/// DC lift motor on an H-bridge: two direction inputs and a PWM enable
pub struct LiftMotor<A, B, S> {
    input1: A,
    input2: B,
    speed: S,
    duty: u8,
}

impl<A: OutputPin, B: OutputPin, S: SetDutyCycle> LiftMotor<A, B, S> {
    /// param duty: 0-255 speed used while the motor runs
    pub fn new(input1: A, input2: B, speed: S, duty: u8) -> Self {
        Self {
            input1,
            input2,
            speed,
            duty,
        }
    }

    pub fn release(self) -> (A, B, S) {
        (self.input1, self.input2, self.speed)
    }
}

impl<A: OutputPin, B: OutputPin, S: SetDutyCycle> Motor for LiftMotor<A, B, S> {
    fn drive(&mut self, command: MotorCommand) -> Result<()> {
        let (forward, backward, duty) = match command {
            MotorCommand::Raise => (true, false, self.duty),
            MotorCommand::Lower => (false, true, self.duty),
            MotorCommand::Stop => (false, false, 0),
        };
        self.input1.set_state(forward.into()).map_err(|_| Error::Pin)?;
        self.input2.set_state(backward.into()).map_err(|_| Error::Pin)?;
        self.speed
            .set_duty_cycle_fraction(duty.into(), 255)
            .map_err(|_| Error::Pwm)
    }
}

/// The stand's outputs wired to their drivers
pub struct ActuatorDrivers<I, T, L, M, P> {
    indicator: I,
    buzzer: T,
    lamp: L,
    motor: M,
    pump: P,
}

impl<I, T, L, M, P> ActuatorDrivers<I, T, L, M, P>
where
    I: StatusIndicator,
    T: ToneOutput,
    L: OutputPin,
    M: Motor,
    P: OutputPin,
{
    pub fn new(indicator: I, buzzer: T, lamp: L, motor: M, pump: P) -> Self {
        Self {
            indicator,
            buzzer,
            lamp,
            motor,
            pump,
        }
    }

    pub fn release(self) -> (I, T, L, M, P) {
        (self.indicator, self.buzzer, self.lamp, self.motor, self.pump)
    }
}

impl<I, T, L, M, P> Actuators for ActuatorDrivers<I, T, L, M, P>
where
    I: StatusIndicator,
    T: ToneOutput,
    L: OutputPin,
    M: Motor,
    P: OutputPin,
{
    fn set_indicator(&mut self, color: Rgb) -> Result<()> {
        self.indicator.show(color)
    }

    fn set_buzzer(&mut self, tone_hz: Option<u32>) -> Result<()> {
        match tone_hz {
            Some(hz) => self.buzzer.tone(hz),
            None => self.buzzer.no_tone(),
        }
    }

    fn set_lamp(&mut self, on: bool) -> Result<()> {
        self.lamp.set_state(on.into()).map_err(|_| Error::Pin)
    }

    fn drive_motor(&mut self, command: MotorCommand) -> Result<()> {
        self.motor.drive(command)
    }

    fn set_pump(&mut self, on: bool) -> Result<()> {
        self.pump.set_state(on.into()).map_err(|_| Error::Pin)
    }
}
