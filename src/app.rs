use embedded_hal::delay::DelayNs;

use crate::actuators::Actuators;
use crate::error::Result;
use crate::hal::{CharDisplay, Clock};
use crate::input::Buttons;
use crate::log::{debug, info, warn};
use crate::menu::Menu;
use crate::policy::{self, MuteToggle, PolicyEngine};
use crate::rendering::Renderer;
use crate::sensors::{SensorSnapshot, Sensors};
use crate::settings::Settings;
use crate::timer::{IntervalTimer, POLL_DELAY_MS, STATUS_LOG_INTERVAL_MS};

/// Everything the controller remembers between ticks
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
    pub menu: Menu,
    pub policy: PolicyEngine,
    pub mute: MuteToggle,
    status_log: IntervalTimer,
}

impl AppState {
    pub fn new(now_ms: u64) -> AppState {
        Self {
            settings: Settings::default(),
            menu: Menu::new(),
            policy: PolicyEngine::new(now_ms),
            mute: MuteToggle::new(),
            status_log: IntervalTimer::new(now_ms),
        }
    }
}

/// The whole stand: board capabilities plus [`AppState`], driven one tick at a time
pub struct PlantStand<S, B, A, D, C, W> {
    sensors: S,
    buttons: B,
    actuators: A,
    renderer: Renderer<D>,
    clock: C,
    delay: W,
    state: AppState,
}

impl<S, B, A, D, C, W> PlantStand<S, B, A, D, C, W>
where
    S: Sensors,
    B: Buttons,
    A: Actuators,
    D: CharDisplay,
    C: Clock,
    W: DelayNs,
{
    pub fn new(sensors: S, buttons: B, actuators: A, display: D, clock: C, delay: W) -> Self {
        let state = AppState::new(clock.now_ms());
        Self {
            sensors,
            buttons,
            actuators,
            renderer: Renderer::new(display),
            clock,
            delay,
            state,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn actuators(&self) -> &A {
        &self.actuators
    }

    pub fn renderer(&self) -> &Renderer<D> {
        &self.renderer
    }

    /// One pass of the control loop.
    ///
    /// Sensors are read once up front and the snapshot is shared by everything
    /// after. While the menu is being used the background control (watering,
    /// alerts, gap-keeping) is skipped; lighting and the mute toggle always run.
    pub fn tick(&mut self) -> Result<()> {
        let snapshot = self.sensors.sample();
        let buttons = self.buttons.sample();
        let now_ms = self.clock.now_ms();

        let outcome = self.state.menu.update(
            buttons,
            now_ms,
            &snapshot,
            &mut self.state.settings,
            &mut self.renderer,
        )?;

        if outcome.interacting {
            debug!("menu in use, background control skipped");
        } else {
            self.state.policy.run(
                &snapshot,
                &self.state.settings,
                outcome.background,
                now_ms,
                &mut self.actuators,
                &mut self.renderer,
                &mut self.delay,
            )?;
        }

        policy::apply_lighting(&snapshot, &self.state.settings, &mut self.actuators)?;
        self.state.mute.update(
            buttons.toggle,
            self.state.menu.current(),
            now_ms,
            &mut self.state.settings,
            &mut self.actuators,
            &mut self.renderer,
            &mut self.delay,
        )?;

        self.log_status(&snapshot, now_ms);
        self.delay.delay_ms(POLL_DELAY_MS);
        Ok(())
    }

    fn log_status(&mut self, snapshot: &SensorSnapshot, now_ms: u64) {
        if self.state.status_log.is_due(now_ms, STATUS_LOG_INTERVAL_MS) {
            info!("status: {}", snapshot);
            self.state.status_log.mark(now_ms);
        }
    }

    /// Ticks forever. A failed tick is logged and the next one starts as normal
    pub fn run(&mut self) -> ! {
        info!("plant stand running");
        loop {
            if let Err(e) = self.tick() {
                warn!("tick failed: {}", e);
            }
        }
    }
}
