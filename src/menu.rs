//! Button driven menu.
//!
//! Pressing menu cycles Home -> Temperature -> Light -> Distance -> Soil ->
//! Background -> Home. The four middle screens edit thresholds: up/down
//! step the selected value while held, toggle picks min or max on the
//! temperature screen.

use ufmt::uwrite;

use crate::config::{ADJUST_STEP, VALUE_CELLS};
use crate::error::Result;
use crate::hal::CharDisplay;
use crate::input::{ButtonSample, HoldEvent, HoldTracker};
use crate::log::{debug, info};
use crate::rendering::{LineBuffer, Renderer};
use crate::sensors::SensorSnapshot;
use crate::settings::{Field, Settings};
use crate::timer::{ADJUST_REPEAT_MS, EDIT_QUIET_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuOption {
    Home,
    Temperature,
    Light,
    Distance,
    Soil,
    Background,
}

impl MenuOption {
    /// Iterates forwards through the screens, wrapping back to Home
    pub fn next(self) -> MenuOption {
        match self {
            MenuOption::Home => MenuOption::Temperature,
            MenuOption::Temperature => MenuOption::Light,
            MenuOption::Light => MenuOption::Distance,
            MenuOption::Distance => MenuOption::Soil,
            MenuOption::Soil => MenuOption::Background,
            MenuOption::Background => MenuOption::Home,
        }
    }

    fn edit_layout(self) -> Option<&'static EditLayout> {
        match self {
            MenuOption::Temperature => Some(&TEMPERATURE_SCREEN),
            MenuOption::Light => Some(&LIGHT_SCREEN),
            MenuOption::Distance => Some(&DISTANCE_SCREEN),
            MenuOption::Soil => Some(&SOIL_SCREEN),
            MenuOption::Home | MenuOption::Background => None,
        }
    }
}

/// Which of the two temperature bounds toggle has selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TogglePhase {
    /// The lower bound (min temperature)
    Low,
    /// The upper bound (max temperature)
    High,
}

impl TogglePhase {
    fn flip(self) -> TogglePhase {
        match self {
            TogglePhase::Low => TogglePhase::High,
            TogglePhase::High => TogglePhase::Low,
        }
    }

    fn index(self) -> usize {
        match self {
            TogglePhase::Low => 0,
            TogglePhase::High => 1,
        }
    }
}

/// A threshold shown on an edit screen as `<label><value>`
struct FieldSlot {
    field: Field,
    label: &'static str,
    row: u8,
}

impl FieldSlot {
    fn column(&self) -> u8 {
        self.label.len() as u8
    }
}

struct EditLayout {
    title: Option<&'static str>,
    slots: &'static [FieldSlot],
}

const TEMPERATURE_SCREEN: EditLayout = EditLayout {
    title: None,
    slots: &[
        FieldSlot {
            field: Field::MinTemperature,
            label: "Min temp:",
            row: 0,
        },
        FieldSlot {
            field: Field::MaxTemperature,
            label: "Max temp:",
            row: 1,
        },
    ],
};

const LIGHT_SCREEN: EditLayout = EditLayout {
    title: Some("LIGHT INTENSITY"),
    slots: &[FieldSlot {
        field: Field::MaxLight,
        label: "Percent:",
        row: 1,
    }],
};

const DISTANCE_SCREEN: EditLayout = EditLayout {
    title: Some("GAP FROM OBJECT"),
    slots: &[FieldSlot {
        field: Field::DistanceGap,
        label: "Gap IN CM:",
        row: 1,
    }],
};

const SOIL_SCREEN: EditLayout = EditLayout {
    title: Some("SOIL MOISTURE %"),
    slots: &[FieldSlot {
        field: Field::MinSoil,
        label: "Percent:",
        row: 1,
    }],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Up,
    Down,
}

/// Turns up/down holds into value steps.
///
/// A fresh press steps at once, a held button steps again every
/// [`ADJUST_REPEAT_MS`]. The session counts as active while a button is
/// held and for [`EDIT_QUIET_MS`] after the last step or release.
#[derive(Debug, Clone, Copy, Default)]
pub struct Adjuster {
    up: HoldTracker,
    down: HoldTracker,
    last_step_ms: Option<u64>,
    last_movement_ms: Option<u64>,
}

impl Adjuster {
    /// returns the direction to step in this tick, if any
    pub fn poll(&mut self, up: bool, down: bool, now_ms: u64) -> Option<Direction> {
        let up_event = self.up.update(up, now_ms);
        let down_event = self.down.update(down, now_ms);
        // The quiet period runs from the moment both buttons are let go
        if [up_event, down_event].contains(&HoldEvent::Released) {
            self.last_movement_ms = Some(now_ms);
        }

        // Up wins when both are held
        let (direction, event) = if up {
            (Direction::Up, up_event)
        } else if down {
            (Direction::Down, down_event)
        } else {
            self.last_step_ms = None;
            return None;
        };

        let due = match (event, self.last_step_ms) {
            (HoldEvent::Pressed, _) | (_, None) => true,
            (_, Some(last)) => now_ms.saturating_sub(last) >= ADJUST_REPEAT_MS,
        };
        if !due {
            return None;
        }
        self.last_step_ms = Some(now_ms);
        self.last_movement_ms = Some(now_ms);
        Some(direction)
    }

    pub fn is_active(&self, now_ms: u64) -> bool {
        self.up.is_held()
            || self.down.is_held()
            || self
                .last_movement_ms
                .is_some_and(|last| now_ms.saturating_sub(last) < EDIT_QUIET_MS)
    }
}

/// What the menu did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuOutcome {
    /// Menu held or a value being edited: background control sits this tick out
    pub interacting: bool,
    /// Background screen selected: control actions report on the display
    pub background: bool,
}

/// Menu state carried from tick to tick
#[derive(Debug, Clone)]
pub struct Menu {
    current: MenuOption,
    previous: MenuOption,
    toggle_phase: TogglePhase,
    menu_button: HoldTracker,
    toggle_button: HoldTracker,
    adjuster: Adjuster,
    /// Renderer generation the current screen was last painted at
    painted: Option<u32>,
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

impl Menu {
    pub fn new() -> Menu {
        Self {
            current: MenuOption::Home,
            previous: MenuOption::Home,
            toggle_phase: TogglePhase::Low,
            menu_button: HoldTracker::new(),
            toggle_button: HoldTracker::new(),
            adjuster: Adjuster::default(),
            painted: None,
        }
    }

    pub fn current(&self) -> MenuOption {
        self.current
    }

    pub fn toggle_phase(&self) -> TogglePhase {
        self.toggle_phase
    }

    /// Runs the menu for one tick
    /// param buttons: This tick's button sample
    /// param now_ms: Current time
    /// param snapshot: This tick's sensor values, shown on Home
    /// param settings: Thresholds edited by the menu
    /// param renderer: Renderer instance
    pub fn update<D: CharDisplay>(
        &mut self,
        buttons: ButtonSample,
        now_ms: u64,
        snapshot: &SensorSnapshot,
        settings: &mut Settings,
        renderer: &mut Renderer<D>,
    ) -> Result<MenuOutcome> {
        if self.menu_button.update(buttons.menu, now_ms) == HoldEvent::Pressed {
            self.current = self.current.next();
            info!("Next Screen: {}", self.current);
        }

        if self.current != self.previous {
            renderer.set_cursor_visible(false)?;
            renderer.clear()?;
            self.previous = self.current;
            self.adjuster = Adjuster::default();
            self.painted = None;
        }

        let toggle = self.toggle_button.update(buttons.toggle, now_ms);

        match self.current {
            MenuOption::Home => Self::render_home(snapshot, renderer)?,
            MenuOption::Background => {
                if self.needs_paint(renderer) {
                    renderer.show_lines(&"BACKGROUNDS".into(), &"OPERATIONS".into())?;
                    self.painted = Some(renderer.generation());
                }
            }
            option => {
                if let Some(layout) = option.edit_layout() {
                    self.edit(layout, buttons, toggle, now_ms, settings, renderer)?;
                }
            }
        }

        Ok(MenuOutcome {
            interacting: buttons.menu || self.adjuster.is_active(now_ms),
            background: self.current == MenuOption::Background,
        })
    }

    fn needs_paint<D: CharDisplay>(&self, renderer: &Renderer<D>) -> bool {
        self.painted != Some(renderer.generation())
    }

    /// Prints the current sensor values:
    /// DI: distance in cm, TE: temperature, LT: light intensity, SM: soil moisture
    fn render_home<D: CharDisplay>(
        snapshot: &SensorSnapshot,
        renderer: &mut Renderer<D>,
    ) -> Result<()> {
        let mut top = LineBuffer::new();
        let mut bottom = LineBuffer::new();
        let _ = uwrite!(
            &mut top,
            "DI:{}CM,TE:{}  ",
            snapshot.distance_cm,
            snapshot.temperature_c
        );
        let _ = uwrite!(
            &mut bottom,
            "LT:{},SM:{}  ",
            snapshot.light_pct,
            snapshot.soil_moisture_pct
        );
        renderer.show_lines(&top, &bottom)
    }

    fn selected<'a>(&self, layout: &'a EditLayout) -> &'a FieldSlot {
        let index = self.toggle_phase.index().min(layout.slots.len() - 1);
        &layout.slots[index]
    }

    fn edit<D: CharDisplay>(
        &mut self,
        layout: &EditLayout,
        buttons: ButtonSample,
        toggle: HoldEvent,
        now_ms: u64,
        settings: &mut Settings,
        renderer: &mut Renderer<D>,
    ) -> Result<()> {
        if self.needs_paint(renderer) {
            self.paint_edit(layout, settings, renderer)?;
        }

        if layout.slots.len() > 1 && toggle == HoldEvent::Pressed {
            renderer.selector(self.selected(layout).row, false)?;
            self.toggle_phase = self.toggle_phase.flip();
            renderer.selector(self.selected(layout).row, true)?;
            debug!("editing {}", self.selected(layout).field);
        }

        if let Some(direction) = self.adjuster.poll(buttons.up, buttons.down, now_ms) {
            let slot = self.selected(layout);
            let value = match direction {
                Direction::Up => settings.increment(slot.field, ADJUST_STEP),
                Direction::Down => settings.decrement(slot.field, ADJUST_STEP),
            };
            renderer.overwrite_number(value, slot.column(), slot.row, VALUE_CELLS, "")?;
            debug!("{} set to {}", slot.field, value);
        }
        Ok(())
    }

    /// Draws an edit screen from scratch over a blank display
    fn paint_edit<D: CharDisplay>(
        &mut self,
        layout: &EditLayout,
        settings: &Settings,
        renderer: &mut Renderer<D>,
    ) -> Result<()> {
        let mut rows = [LineBuffer::new(), LineBuffer::new()];
        if let Some(title) = layout.title {
            rows[0] = title.into();
        }
        for slot in layout.slots {
            let _ = uwrite!(
                &mut rows[usize::from(slot.row)],
                "{}{}",
                slot.label,
                settings.get(slot.field)
            );
        }
        renderer.show_lines(&rows[0], &rows[1])?;

        if layout.slots.len() > 1 {
            let selected = self.toggle_phase.index();
            for (index, slot) in layout.slots.iter().enumerate() {
                renderer.selector(slot.row, index == selected)?;
            }
        } else {
            // Park the blinking cursor right after the value
            let slot = &layout.slots[0];
            renderer.overwrite_number(settings.get(slot.field), slot.column(), slot.row, 0, "")?;
            renderer.set_cursor_visible(true)?;
        }
        self.painted = Some(renderer.generation());
        Ok(())
    }
}
