//! Background control: watering, gap-keeping, lighting, alerts and the
//! buzzer mute.
//!
//! The decisions are plain functions of the snapshot and settings. The
//! stateful parts ([`PolicyEngine`], [`MuteToggle`]) carry them out against
//! the actuators and the display.

use embedded_hal::delay::DelayNs;

use crate::actuators::{Actuators, MotorCommand, Rgb};
use crate::config::{BUZZER_TONE_HZ, GAP_TOLERANCE_CM};
use crate::error::Result;
use crate::hal::CharDisplay;
use crate::input::{HoldEvent, HoldTracker};
use crate::log::{debug, info};
use crate::menu::MenuOption;
use crate::rendering::{Clearing, Renderer};
use crate::sensors::SensorSnapshot;
use crate::settings::Settings;
use crate::timer::{
    IntervalTimer, ALERT_PAUSE_MS, CONFIRM_PAUSE_MS, GAP_SETTLE_MS, MOTOR_STATUS_MS,
    MUTE_HOLD_MS, PUMP_PULSE_MS, WATERING_SETTLE_MS, WATERING_STATUS_MS,
};

/// Which way to drive the lamp arm to bring it back inside `gap ± tolerance`.
/// Both edges of the band count as inside.
pub fn gap_command(distance_cm: i32, gap_cm: i32, tolerance_cm: i32) -> MotorCommand {
    if distance_cm < gap_cm - tolerance_cm {
        MotorCommand::Raise
    } else if distance_cm > gap_cm + tolerance_cm {
        MotorCommand::Lower
    } else {
        MotorCommand::Stop
    }
}

/// Soil below the threshold and the interval since the last watering used up.
/// A reading of 0 means a faulty sensor, never dry soil.
pub fn should_water(
    snapshot: &SensorSnapshot,
    settings: &Settings,
    last_watering: &IntervalTimer,
    now_ms: u64,
) -> bool {
    let soil = snapshot.soil_moisture_pct;
    soil != 0
        && soil < settings.min_soil_pct()
        && last_watering.is_due(now_ms, settings.watering_interval_ms().into())
}

pub fn lamp_on(snapshot: &SensorSnapshot, settings: &Settings) -> bool {
    snapshot.light_pct > settings.max_light_pct()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alert {
    HighTemperature,
    DrySoil,
    Clear,
}

/// Temperature beats soil: only the most urgent alert is raised
pub fn alert_for(snapshot: &SensorSnapshot, settings: &Settings) -> Alert {
    if snapshot.temperature_c > settings.max_temp_c() {
        Alert::HighTemperature
    } else if snapshot.soil_sensor_fault() {
        Alert::DrySoil
    } else {
        Alert::Clear
    }
}

/// Switches the lamp to match the light reading
pub fn apply_lighting<A: Actuators>(
    snapshot: &SensorSnapshot,
    settings: &Settings,
    actuators: &mut A,
) -> Result<()> {
    actuators.set_lamp(lamp_on(snapshot, settings))
}

/// Watering, alerting and gap-keeping for one tick
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    last_watering: IntervalTimer,
}

impl PolicyEngine {
    pub fn new(now_ms: u64) -> PolicyEngine {
        Self {
            last_watering: IntervalTimer::new(now_ms),
        }
    }

    pub fn last_watering_ms(&self) -> u64 {
        self.last_watering.last_ms()
    }

    /// Runs every background action once
    /// param snapshot: This tick's sensor values
    /// param settings: Current thresholds
    /// param background: If status text should be shown for silent actions
    /// param now_ms: Current time
    /// param actuators: Outputs to drive
    /// param renderer: Renderer instance
    /// param delay: Delay instance
    #[allow(clippy::too_many_arguments)]
    pub fn run<A: Actuators, D: CharDisplay, W: DelayNs>(
        &mut self,
        snapshot: &SensorSnapshot,
        settings: &Settings,
        background: bool,
        now_ms: u64,
        actuators: &mut A,
        renderer: &mut Renderer<D>,
        delay: &mut W,
    ) -> Result<()> {
        if should_water(snapshot, settings, &self.last_watering, now_ms) {
            self.water(background, now_ms, actuators, renderer, delay)?;
        }
        Self::alert(alert_for(snapshot, settings), settings, actuators, renderer, delay)?;
        Self::keep_gap(snapshot, settings, background, actuators, renderer, delay)
    }

    fn water<A: Actuators, D: CharDisplay, W: DelayNs>(
        &mut self,
        background: bool,
        now_ms: u64,
        actuators: &mut A,
        renderer: &mut Renderer<D>,
        delay: &mut W,
    ) -> Result<()> {
        info!("watering");
        actuators.set_pump(true)?;
        actuators.set_indicator(Rgb::INFO)?;
        if background {
            renderer.show_message(
                "DRY SOIL! DC ON",
                "WATERING....",
                Clearing::Around,
                WATERING_STATUS_MS,
                delay,
            )?;
        }
        delay.delay_ms(PUMP_PULSE_MS);
        actuators.set_pump(false)?;
        if background {
            renderer.show_message(
                "WATERING DONE!",
                "DC OFF...",
                Clearing::Around,
                WATERING_STATUS_MS,
                delay,
            )?;
        }
        delay.delay_ms(WATERING_SETTLE_MS);
        self.last_watering.mark(now_ms);
        Ok(())
    }

    fn alert<A: Actuators, D: CharDisplay, W: DelayNs>(
        alert: Alert,
        settings: &Settings,
        actuators: &mut A,
        renderer: &mut Renderer<D>,
        delay: &mut W,
    ) -> Result<()> {
        match alert {
            Alert::HighTemperature => {
                actuators.set_indicator(Rgb::ALERT)?;
                let tone = (!settings.buzzer_muted()).then_some(BUZZER_TONE_HZ);
                actuators.set_buzzer(tone)?;
                renderer.show_message(
                    "WARNING!!",
                    "HIGH TEMPERATURE",
                    Clearing::Around,
                    ALERT_PAUSE_MS,
                    delay,
                )
            }
            Alert::DrySoil => {
                actuators.set_indicator(Rgb::ALERT)?;
                renderer.show_message(
                    "WARNING!!",
                    "DRY SOIL..",
                    Clearing::Around,
                    ALERT_PAUSE_MS,
                    delay,
                )
            }
            Alert::Clear => {
                actuators.set_buzzer(None)?;
                actuators.set_indicator(Rgb::OK)
            }
        }
    }

    fn keep_gap<A: Actuators, D: CharDisplay, W: DelayNs>(
        snapshot: &SensorSnapshot,
        settings: &Settings,
        background: bool,
        actuators: &mut A,
        renderer: &mut Renderer<D>,
        delay: &mut W,
    ) -> Result<()> {
        let command = gap_command(
            snapshot.distance_cm,
            settings.distance_gap_cm(),
            GAP_TOLERANCE_CM,
        );
        debug!("gap {} cm -> {}", snapshot.distance_cm, command);
        actuators.drive_motor(command)?;

        let status = match command {
            MotorCommand::Raise => Some("LIFTING UP DIST"),
            MotorCommand::Lower => Some("SINKING DOWN DIST"),
            MotorCommand::Stop => None,
        };
        if let (true, Some(status)) = (background, status) {
            renderer.show_message(status, "DC ON....", Clearing::Around, MOTOR_STATUS_MS, delay)?;
        }
        delay.delay_ms(GAP_SETTLE_MS);
        Ok(())
    }
}

/// Long press on toggle flips the buzzer mute, once per press
#[derive(Debug, Clone, Copy, Default)]
pub struct MuteToggle {
    button: HoldTracker,
    fired: bool,
}

impl MuteToggle {
    pub fn new() -> MuteToggle {
        Self::default()
    }

    /// Feeds one toggle sample in and flips the mute once the hold is long enough.
    /// Toggle selects min/max on the temperature screen, so nothing happens there
    /// returns if the mute was flipped this tick
    #[allow(clippy::too_many_arguments)]
    pub fn update<A: Actuators, D: CharDisplay, W: DelayNs>(
        &mut self,
        pressed: bool,
        screen: MenuOption,
        now_ms: u64,
        settings: &mut Settings,
        actuators: &mut A,
        renderer: &mut Renderer<D>,
        delay: &mut W,
    ) -> Result<bool> {
        let held_ms = match self.button.update(pressed, now_ms) {
            HoldEvent::Holding(held_ms) => held_ms,
            HoldEvent::Pressed => 0,
            HoldEvent::Idle | HoldEvent::Released => {
                self.fired = false;
                return Ok(false);
            }
        };
        if screen == MenuOption::Temperature || self.fired || held_ms <= MUTE_HOLD_MS {
            return Ok(false);
        }
        self.fired = true;

        if settings.toggle_mute() {
            info!("buzzer muted");
            renderer.show_message("BUZZER OFF...", "", Clearing::Around, CONFIRM_PAUSE_MS, delay)?;
            actuators.set_buzzer(None)?;
        } else {
            info!("buzzer unmuted");
            actuators.set_buzzer(Some(BUZZER_TONE_HZ))?;
            renderer.show_message("BUZZER ON...", "", Clearing::Around, CONFIRM_PAUSE_MS, delay)?;
            actuators.set_buzzer(None)?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::Clock;
    use crate::testing::{FakeActuators, FakeDisplay, FakeTime};

    fn snapshot(distance_cm: i32, temperature_c: i32, light_pct: i32, soil: i32) -> SensorSnapshot {
        SensorSnapshot {
            distance_cm,
            temperature_c,
            light_pct,
            soil_moisture_pct: soil,
        }
    }

    #[test]
    fn gap_band_edges_stop_the_motor() {
        assert_eq!(gap_command(40, 50, 10), MotorCommand::Stop);
        assert_eq!(gap_command(60, 50, 10), MotorCommand::Stop);
        assert_eq!(gap_command(50, 50, 10), MotorCommand::Stop);
        assert_eq!(gap_command(39, 50, 10), MotorCommand::Raise);
        assert_eq!(gap_command(61, 50, 10), MotorCommand::Lower);
    }

    #[test]
    fn watering_needs_dry_soil_and_elapsed_interval() {
        let settings = Settings::default();
        let timer = IntervalTimer::new(0);

        assert!(should_water(&snapshot(50, 25, 40, 30), &settings, &timer, 3000));
        assert!(should_water(&snapshot(50, 25, 40, 1), &settings, &timer, 3000));
        assert!(should_water(&snapshot(50, 25, 40, 49), &settings, &timer, 3000));

        assert!(!should_water(&snapshot(50, 25, 40, 50), &settings, &timer, 3000));
        assert!(!should_water(&snapshot(50, 25, 40, 30), &settings, &timer, 2999));
    }

    #[test]
    fn zero_soil_reading_never_waters() {
        let settings = Settings::default();
        let timer = IntervalTimer::new(0);
        assert!(!should_water(&snapshot(50, 25, 40, 0), &settings, &timer, u64::MAX));
    }

    #[test]
    fn lamp_follows_light_threshold() {
        let settings = Settings::default();
        assert!(lamp_on(&snapshot(50, 25, 51, 60), &settings));
        assert!(!lamp_on(&snapshot(50, 25, 50, 60), &settings));
    }

    #[test]
    fn temperature_alert_wins_over_dry_soil() {
        let settings = Settings::default();
        assert_eq!(alert_for(&snapshot(50, 40, 40, 0), &settings), Alert::HighTemperature);
        assert_eq!(alert_for(&snapshot(50, 35, 40, 0), &settings), Alert::DrySoil);
        assert_eq!(alert_for(&snapshot(50, 35, 40, 60), &settings), Alert::Clear);
    }

    struct Rig {
        engine: PolicyEngine,
        settings: Settings,
        actuators: FakeActuators,
        renderer: Renderer<FakeDisplay>,
        time: FakeTime,
    }

    impl Rig {
        fn new() -> Rig {
            Rig {
                engine: PolicyEngine::new(0),
                settings: Settings::default(),
                actuators: FakeActuators::new(),
                renderer: Renderer::new(FakeDisplay::new()),
                time: FakeTime::new(),
            }
        }

        fn run(&mut self, snapshot: SensorSnapshot, background: bool) {
            let now_ms = self.time.now_ms();
            self.engine
                .run(
                    &snapshot,
                    &self.settings,
                    background,
                    now_ms,
                    &mut self.actuators,
                    &mut self.renderer,
                    &mut self.time,
                )
                .unwrap();
        }
    }

    #[test]
    fn watering_pulses_pump_and_records_time() {
        let mut rig = Rig::new();
        rig.time.set_ms(3000);
        rig.run(snapshot(50, 25, 40, 30), false);

        assert_eq!(rig.actuators.pump_starts, 1);
        assert!(!rig.actuators.pump);
        assert_eq!(rig.engine.last_watering_ms(), 3000);
        // No status text outside background mode
        assert_eq!(rig.renderer.display().clears, 0);

        // Interval not yet used up again
        rig.run(snapshot(50, 25, 40, 30), false);
        assert_eq!(rig.actuators.pump_starts, 1);
    }

    #[test]
    fn background_watering_reports_on_display() {
        let mut rig = Rig::new();
        rig.time.set_ms(5000);
        rig.run(snapshot(50, 25, 40, 30), true);

        assert_eq!(rig.actuators.pump_starts, 1);
        assert_eq!(rig.renderer.display().clears, 4);
    }

    #[test]
    fn high_temperature_sounds_buzzer_unless_muted() {
        let mut rig = Rig::new();
        rig.run(snapshot(50, 40, 40, 60), false);
        assert_eq!(rig.actuators.indicator, Rgb::ALERT);
        assert_eq!(rig.actuators.buzzer, Some(BUZZER_TONE_HZ));
        assert_eq!(rig.renderer.display().clears, 2);

        rig.settings.toggle_mute();
        rig.run(snapshot(50, 40, 40, 60), false);
        assert_eq!(rig.actuators.buzzer, None);
    }

    #[test]
    fn dry_soil_alert_leaves_buzzer_alone() {
        let mut rig = Rig::new();
        rig.actuators.buzzer = Some(BUZZER_TONE_HZ);
        rig.run(snapshot(50, 25, 40, 0), false);
        assert_eq!(rig.actuators.indicator, Rgb::ALERT);
        assert_eq!(rig.actuators.buzzer, Some(BUZZER_TONE_HZ));
        assert_eq!(rig.actuators.pump_starts, 0);
    }

    #[test]
    fn all_clear_turns_indicator_green_and_silences() {
        let mut rig = Rig::new();
        rig.actuators.buzzer = Some(BUZZER_TONE_HZ);
        rig.run(snapshot(50, 25, 40, 60), false);
        assert_eq!(rig.actuators.indicator, Rgb::OK);
        assert_eq!(rig.actuators.buzzer, None);
        assert_eq!(rig.actuators.motor, MotorCommand::Stop);
    }

    #[test]
    fn gap_keeping_drives_motor_and_settles() {
        let mut rig = Rig::new();
        rig.run(snapshot(20, 25, 40, 60), false);
        assert_eq!(rig.actuators.motor, MotorCommand::Raise);
        assert_eq!(rig.time.now_ms(), u64::from(GAP_SETTLE_MS));

        rig.run(snapshot(90, 25, 40, 60), true);
        assert_eq!(rig.actuators.motor, MotorCommand::Lower);
        assert_eq!(rig.renderer.display().clears, 2);
    }

    #[test]
    fn long_toggle_hold_flips_mute_once() {
        let mut rig = Rig::new();
        let mut toggle = MuteToggle::new();
        let mut flips = 0;
        for now_ms in (0..3000).step_by(50) {
            if toggle
                .update(
                    true,
                    MenuOption::Home,
                    now_ms,
                    &mut rig.settings,
                    &mut rig.actuators,
                    &mut rig.renderer,
                    &mut rig.time,
                )
                .unwrap()
            {
                flips += 1;
            }
        }
        assert_eq!(flips, 1);
        assert!(rig.settings.buzzer_muted());
        assert_eq!(rig.actuators.buzzer, None);
        assert!(rig.actuators.tones.is_empty());

        // Release and hold again to unmute
        let mut hold = |pressed, now_ms| {
            toggle
                .update(
                    pressed,
                    MenuOption::Home,
                    now_ms,
                    &mut rig.settings,
                    &mut rig.actuators,
                    &mut rig.renderer,
                    &mut rig.time,
                )
                .unwrap()
        };
        hold(false, 3000);
        hold(true, 3100);
        assert!(!hold(true, 4100));
        assert!(hold(true, 4101));
        assert!(!rig.settings.buzzer_muted());
        // Unmuting chirps once, then falls silent
        assert_eq!(rig.actuators.tones, [BUZZER_TONE_HZ]);
        assert_eq!(rig.actuators.buzzer, None);
    }

    #[test]
    fn short_press_or_temperature_screen_keeps_mute() {
        let mut rig = Rig::new();
        let mut toggle = MuteToggle::new();
        for (pressed, now_ms) in [(true, 0), (true, 900), (false, 950)] {
            toggle
                .update(
                    pressed,
                    MenuOption::Light,
                    now_ms,
                    &mut rig.settings,
                    &mut rig.actuators,
                    &mut rig.renderer,
                    &mut rig.time,
                )
                .unwrap();
        }
        assert!(!rig.settings.buzzer_muted());

        for now_ms in [1000, 2500] {
            toggle
                .update(
                    true,
                    MenuOption::Temperature,
                    now_ms,
                    &mut rig.settings,
                    &mut rig.actuators,
                    &mut rig.renderer,
                    &mut rig.time,
                )
                .unwrap();
        }
        assert!(!rig.settings.buzzer_muted());
    }
}
