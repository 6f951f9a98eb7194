//! Fixed configuration of the stand.
//!
//! Runtime-adjustable thresholds live in [`crate::settings::Settings`]; everything
//! here is baked into the firmware. Timing constants are in [`crate::timer`].
//!
//! Board wiring (Pico GPIO, see `main.rs`):
//!
//! | Function            | Pin                  |
//! |---------------------|----------------------|
//! | LCD EN, RS, D4..D7  | GP1, GP0, GP2..GP5   |
//! | Buzzer (PWM 3A)     | GP6                  |
//! | Menu / Toggle       | GP7 / GP8            |
//! | Up / Down           | GP10 / GP11          |
//! | RGB red/green/blue  | GP12 / GP13 / GP14   |
//! | Lamp                | GP15                 |
//! | Motor IN1 / IN2     | GP16 / GP17          |
//! | Motor PWM (PWM 1A)  | GP18                 |
//! | Pump                | GP19                 |
//! | Ultrasonic TRIG/ECHO| GP20 / GP21          |
//! | Temperature (TMP36) | ADC0 (GP26)          |
//! | Light / Soil        | ADC1 (GP27) / ADC2 (GP28) |

/// Amount a held up/down button moves a threshold per step
pub const ADJUST_STEP: i32 = 5;

/// Band (+/-) around the configured gap in which the lift motor stays still, in cm
pub const GAP_TOLERANCE_CM: i32 = 10;

/// Frequency of the buzzer alarm
pub const BUZZER_TONE_HZ: u32 = 1000;

/// Duty used when the lift motor runs (0-255)
pub const MOTOR_FULL_SPEED: u8 = 255;

/* Sensor calibration */

/// ADC reference voltage the TMP36 conversion assumes
pub const ADC_REFERENCE_VOLTS: f32 = 5.0;
/// Number of ADC steps on the 10 bit scale the conversions assume
pub const ADC_STEPS: f32 = 1024.0;
/// Highest raw reading seen from the light sensor
pub const LIGHT_SENSOR_MAX_SAMPLE: f32 = 900.0;
/// Highest raw reading seen from the soil moisture sensor
pub const SOIL_SENSOR_MAX_SAMPLE: f32 = 876.0;
/// Sound travels 0.0344 cm/us; halved for the round trip
pub const ECHO_CM_PER_US: f32 = 0.01723;
/// Longest echo we wait for (~5 m); anything longer reads as "no echo"
pub const ECHO_TIMEOUT_US: u32 = 30_000;

/* Display */

/// Columns on the LCD; longer text is cut off
pub const LCD_COLUMNS: usize = 16;
/// Column of the `<` selector on the temperature screen
pub const SELECTOR_COLUMN: u8 = 12;
/// Glyph marking the selected temperature bound
pub const SELECTOR_GLYPH: char = '<';
/// Cells blanked before a threshold value is rewritten in place
pub const VALUE_CELLS: u8 = 3;
