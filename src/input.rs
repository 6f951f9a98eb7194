//! Button sampling and hold tracking.
//!
//! Buttons are read once per tick into a [`ButtonSample`]. Anything that
//! needs to know about presses over time (edges, hold durations) feeds the
//! samples through a [`HoldTracker`] instead of spinning in a wait loop.

use embedded_hal::digital::InputPin;

use crate::log::warn;

/// Which buttons are down this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonSample {
    pub menu: bool,
    pub toggle: bool,
    pub up: bool,
    pub down: bool,
}

/// Something that can read the four buttons
pub trait Buttons {
    fn sample(&mut self) -> ButtonSample;
}

/// Four pull-down buttons: high means pressed
pub struct ButtonPins<M, T, U, D> {
    menu: M,
    toggle: T,
    up: U,
    down: D,
}

impl<M: InputPin, T: InputPin, U: InputPin, D: InputPin> ButtonPins<M, T, U, D> {
    pub fn new(menu: M, toggle: T, up: U, down: D) -> Self {
        Self {
            menu,
            toggle,
            up,
            down,
        }
    }

    pub fn release(self) -> (M, T, U, D) {
        (self.menu, self.toggle, self.up, self.down)
    }
}

impl<M: InputPin, T: InputPin, U: InputPin, D: InputPin> Buttons for ButtonPins<M, T, U, D> {
    fn sample(&mut self) -> ButtonSample {
        ButtonSample {
            menu: is_pressed(&mut self.menu),
            toggle: is_pressed(&mut self.toggle),
            up: is_pressed(&mut self.up),
            down: is_pressed(&mut self.down),
        }
    }
}

/// A pin that can't be read counts as released
fn is_pressed<P: InputPin>(pin: &mut P) -> bool {
    pin.is_high().unwrap_or_else(|_| {
        warn!("button read failed");
        false
    })
}

/// What happened to a button since the previous sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HoldEvent {
    Idle,
    /// Went down this tick
    Pressed,
    /// Still down, for this many ms
    Holding(u64),
    /// Came up this tick
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoldState {
    Idle,
    Held { since_ms: u64 },
    Released,
}

/// IDLE -> HELD -> RELEASED -> IDLE state machine for one button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldTracker {
    state: HoldState,
}

impl Default for HoldTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl HoldTracker {
    pub const fn new() -> HoldTracker {
        Self {
            state: HoldState::Idle,
        }
    }

    /// Feeds one sample into the tracker
    /// param pressed: If the button is down this tick
    /// param now_ms: Current time
    /// returns what changed
    pub fn update(&mut self, pressed: bool, now_ms: u64) -> HoldEvent {
        match (self.state, pressed) {
            (HoldState::Held { since_ms }, true) => {
                HoldEvent::Holding(now_ms.saturating_sub(since_ms))
            }
            (HoldState::Held { .. }, false) => {
                self.state = HoldState::Released;
                HoldEvent::Released
            }
            (_, true) => {
                self.state = HoldState::Held { since_ms: now_ms };
                HoldEvent::Pressed
            }
            (_, false) => {
                self.state = HoldState::Idle;
                HoldEvent::Idle
            }
        }
    }

    pub fn is_held(&self) -> bool {
        matches!(self.state, HoldState::Held { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    #[test]
    fn pins_read_high_as_pressed() {
        let menu = PinMock::new(&[PinTransaction::get(PinState::High)]);
        let toggle = PinMock::new(&[PinTransaction::get(PinState::Low)]);
        let up = PinMock::new(&[PinTransaction::get(PinState::High)]);
        let down = PinMock::new(&[PinTransaction::get(PinState::Low)]);
        let mut buttons = ButtonPins::new(menu, toggle, up, down);

        assert_eq!(
            buttons.sample(),
            ButtonSample {
                menu: true,
                toggle: false,
                up: true,
                down: false,
            }
        );

        let (mut menu, mut toggle, mut up, mut down) = buttons.release();
        menu.done();
        toggle.done();
        up.done();
        down.done();
    }

    #[test]
    fn tracker_walks_through_a_press() {
        let mut tracker = HoldTracker::new();
        assert_eq!(tracker.update(false, 0), HoldEvent::Idle);
        assert_eq!(tracker.update(true, 10), HoldEvent::Pressed);
        assert!(tracker.is_held());
        assert_eq!(tracker.update(true, 250), HoldEvent::Holding(240));
        assert_eq!(tracker.update(false, 260), HoldEvent::Released);
        assert!(!tracker.is_held());
        assert_eq!(tracker.update(false, 270), HoldEvent::Idle);
    }

    #[test]
    fn press_right_after_release_is_a_new_press() {
        let mut tracker = HoldTracker::new();
        tracker.update(true, 0);
        tracker.update(false, 5);
        assert_eq!(tracker.update(true, 6), HoldEvent::Pressed);
        assert_eq!(tracker.update(true, 16), HoldEvent::Holding(10));
    }
}
