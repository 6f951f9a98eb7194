use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Hardware access failures.
///
/// None of these stop the controller: the main loop logs the error and
/// carries on with the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    #[error("display write failed")]
    Display,
    #[error("digital pin access failed")]
    Pin,
    #[error("pwm duty update failed")]
    Pwm,
    #[error("analog conversion failed")]
    Analog,
    #[error("buzzer cannot play that frequency")]
    Tone,
}
