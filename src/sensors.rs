use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::{
    ADC_REFERENCE_VOLTS, ADC_STEPS, ECHO_CM_PER_US, ECHO_TIMEOUT_US, LIGHT_SENSOR_MAX_SAMPLE,
    SOIL_SENSOR_MAX_SAMPLE,
};
use crate::error::{Error, Result};
use crate::hal::{AnalogInput, Clock};
use crate::log::warn;

/// Sensor values for one loop pass.
/// distance_cm: Distance between the lamp arm and the plant
/// temperature_c: Air temperature in Celsius
/// light_pct: Ambient light, can go above 100
/// soil_moisture_pct: Soil moisture, can go above 100; 0 means the probe is disconnected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSnapshot {
    pub distance_cm: i32,
    pub temperature_c: i32,
    pub light_pct: i32,
    pub soil_moisture_pct: i32,
}

impl SensorSnapshot {
    /// A dry reading of exactly 0 is what a disconnected probe gives,
    /// so it is treated as a fault rather than bone dry soil
    pub fn soil_sensor_fault(&self) -> bool {
        self.soil_moisture_pct == 0
    }
}

/// Something that can take a full [`SensorSnapshot`]
pub trait Sensors {
    fn sample(&mut self) -> SensorSnapshot;
}

/// Something that can measure a distance in cm
pub trait RangeFinder {
    fn read_distance_cm(&mut self) -> Result<i32>;
}

/// Converts an echo pulse width into cm
/// param pulse_us: echo pulse width in microseconds
pub fn distance_from_echo(pulse_us: u32) -> i32 {
    (ECHO_CM_PER_US * pulse_us as f32) as i32
}

/// Converts a TMP36 sample into Celsius, rounded to the nearest degree
/// param sample: raw 0-1023 sample
pub fn temperature_from_sample(sample: u16) -> i32 {
    let volts = sample as f32 * (ADC_REFERENCE_VOLTS / ADC_STEPS);
    libm::roundf((volts - 0.5) * 100.0) as i32
}

/// Gets the light intensity in percent of the brightest reading seen.
/// Not clamped: samples above the calibration maximum give more than 100
/// param sample: raw 0-1023 sample
pub fn light_from_sample(sample: u16) -> i32 {
    (sample as f32 / LIGHT_SENSOR_MAX_SAMPLE * 100.0) as i32
}

/// Gets the soil moisture in percent of the wettest reading seen.
/// Not clamped: samples above the calibration maximum give more than 100
/// param sample: raw 0-1023 sample
pub fn soil_moisture_from_sample(sample: u16) -> i32 {
    (sample as f32 / SOIL_SENSOR_MAX_SAMPLE * 100.0) as i32
}

/// HC-SR04 style ultrasonic ranger with separate trigger and echo pins.
///
/// Both echo edges are timestamped on the microsecond clock, so the width does
/// not depend on how long each pin read takes. Waiting for either edge is
/// bounded by [`ECHO_TIMEOUT_US`].
pub struct Ultrasonic<TRIG, ECHO, D, C> {
    trigger: TRIG,
    echo: ECHO,
    delay: D,
    clock: C,
}

impl<TRIG, ECHO, D, C> Ultrasonic<TRIG, ECHO, D, C>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    D: DelayNs,
    C: Clock,
{
    pub fn new(trigger: TRIG, echo: ECHO, delay: D, clock: C) -> Self {
        Self {
            trigger,
            echo,
            delay,
            clock,
        }
    }

    pub fn release(self) -> (TRIG, ECHO, D, C) {
        (self.trigger, self.echo, self.delay, self.clock)
    }

    /// Sends a 10 us trigger pulse and times the echo
    /// returns the echo width in microseconds, or 0 when nothing came back in time
    pub fn echo_pulse_us(&mut self) -> Result<u32> {
        self.trigger.set_low().map_err(|_| Error::Pin)?;
        self.delay.delay_us(2);
        self.trigger.set_high().map_err(|_| Error::Pin)?;
        self.delay.delay_us(10);
        self.trigger.set_low().map_err(|_| Error::Pin)?;

        let timeout = u64::from(ECHO_TIMEOUT_US);

        let sent = self.clock.now_us();
        while !self.echo.is_high().map_err(|_| Error::Pin)? {
            if self.clock.now_us().saturating_sub(sent) >= timeout {
                return Ok(0);
            }
        }

        let rise = self.clock.now_us();
        while self.echo.is_high().map_err(|_| Error::Pin)? {
            if self.clock.now_us().saturating_sub(rise) >= timeout {
                return Ok(0);
            }
        }
        let width = self.clock.now_us().saturating_sub(rise);
        Ok(width as u32)
    }
}

impl<TRIG, ECHO, D, C> RangeFinder for Ultrasonic<TRIG, ECHO, D, C>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    D: DelayNs,
    C: Clock,
{
    fn read_distance_cm(&mut self) -> Result<i32> {
        Ok(distance_from_echo(self.echo_pulse_us()?))
    }
}

/// The stand's four sensors
pub struct SensorReaders<R, T, L, S> {
    ranger: R,
    temperature: T,
    light: L,
    soil: S,
}

impl<R, T, L, S> SensorReaders<R, T, L, S>
where
    R: RangeFinder,
    T: AnalogInput,
    L: AnalogInput,
    S: AnalogInput,
{
    pub fn new(ranger: R, temperature: T, light: L, soil: S) -> Self {
        Self {
            ranger,
            temperature,
            light,
            soil,
        }
    }

    pub fn read_distance(&mut self) -> i32 {
        or_zero(self.ranger.read_distance_cm(), "distance")
    }

    pub fn read_temperature(&mut self) -> i32 {
        let sample = or_zero(self.temperature.read_sample(), "temperature");
        temperature_from_sample(sample)
    }

    pub fn read_light_intensity(&mut self) -> i32 {
        light_from_sample(or_zero(self.light.read_sample(), "light"))
    }

    pub fn read_soil_moisture(&mut self) -> i32 {
        soil_moisture_from_sample(or_zero(self.soil.read_sample(), "soil"))
    }
}

impl<R, T, L, S> Sensors for SensorReaders<R, T, L, S>
where
    R: RangeFinder,
    T: AnalogInput,
    L: AnalogInput,
    S: AnalogInput,
{
    fn sample(&mut self) -> SensorSnapshot {
        SensorSnapshot {
            distance_cm: self.read_distance(),
            temperature_c: self.read_temperature(),
            light_pct: self.read_light_intensity(),
            soil_moisture_pct: self.read_soil_moisture(),
        }
    }
}

/// Failed reads fall back to a raw 0, same as an unplugged sensor
fn or_zero<V: Default>(reading: Result<V>, sensor: &str) -> V {
    reading.unwrap_or_else(|e| {
        warn!("{} read failed: {}", sensor, e);
        V::default()
    })
}
