/// Pause at the end of every loop pass
pub const POLL_DELAY_MS: u32 = 3;
/// Time between repeated steps while up/down stays held
pub const ADJUST_REPEAT_MS: u64 = 150;
/// An edit session ends once up/down have been still for this long
pub const EDIT_QUIET_MS: u64 = 30;
/// How long toggle has to be held to flip the buzzer mute
pub const MUTE_HOLD_MS: u64 = 1000;
/// Time the pump runs per watering
pub const PUMP_PULSE_MS: u32 = 500;
/// Pause after the pump is switched off
pub const WATERING_SETTLE_MS: u32 = 100;
/// Pause after every lift motor command
pub const GAP_SETTLE_MS: u32 = 100;
/// How long an alert message stays up
pub const ALERT_PAUSE_MS: u32 = 100;
/// How long a watering status message stays up
pub const WATERING_STATUS_MS: u32 = 200;
/// How long a lift motor status message stays up
pub const MOTOR_STATUS_MS: u32 = 300;
/// How long the mute confirmation stays up
pub const CONFIRM_PAUSE_MS: u32 = 100;
/// Time between status log lines
pub const STATUS_LOG_INTERVAL_MS: u64 = 2000;

/// Remembers when an action last happened and tells when it is due again.
///
/// Time is the monotonic millisecond counter; a clock running backwards
/// reads as "nothing elapsed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    last_ms: u64,
}

impl IntervalTimer {
    pub const fn new(start_ms: u64) -> IntervalTimer {
        Self { last_ms: start_ms }
    }

    pub fn elapsed(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_ms)
    }

    /// returns if at least `period_ms` has passed since the last mark
    pub fn is_due(&self, now_ms: u64, period_ms: u64) -> bool {
        self.elapsed(now_ms) >= period_ms
    }

    pub fn mark(&mut self, now_ms: u64) {
        self.last_ms = now_ms;
    }

    pub fn last_ms(&self) -> u64 {
        self.last_ms
    }
}
