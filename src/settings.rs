/// Settings defines the user-selected thresholds the stand works against.
/// min_temp_c / max_temp_c: Acceptable temperature range in Celsius
/// distance_gap_cm: Gap to keep between the lamp arm and the plant
/// max_light_pct: Light level above which the lamp is switched on
/// min_soil_pct: Soil moisture below which the plants get watered
/// watering_interval_ms: Shortest time between two waterings
/// buzzer_muted: If the temperature alarm stays silent
///
/// Every threshold stays inside its [`Field::bounds`] no matter how it is adjusted.
/// Nothing is persisted: a restart brings back the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    min_temp_c: i32,
    max_temp_c: i32,
    distance_gap_cm: i32,
    max_light_pct: i32,
    min_soil_pct: i32,
    watering_interval_ms: u32,
    buzzer_muted: bool,
}

/// Shortest and longest watering interval accepted
pub const WATERING_INTERVAL_BOUNDS_MS: (u32, u32) = (500, 3_600_000);

impl Default for Settings {
    fn default() -> Self {
        Settings {
            min_temp_c: 20,              // 20C - 35C
            max_temp_c: 35,
            distance_gap_cm: 50,         // Keep the arm 50cm above the plant
            max_light_pct: 50,
            min_soil_pct: 50,
            watering_interval_ms: 3000,  // At most one watering every 3s
            buzzer_muted: false,
        }
    }
}

/// The thresholds that can be adjusted from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    MinTemperature,
    MaxTemperature,
    DistanceGap,
    MaxLight,
    MinSoil,
}

impl Field {
    /// Inclusive range the field is clamped to
    pub const fn bounds(self) -> (i32, i32) {
        match self {
            Field::MinTemperature | Field::MaxTemperature => (0, 140),
            Field::DistanceGap => (0, 100),
            Field::MaxLight | Field::MinSoil => (0, 100),
        }
    }

    fn clamp(self, value: i32) -> i32 {
        let (min, max) = self.bounds();
        value.clamp(min, max)
    }
}

impl Settings {
    pub fn get(&self, field: Field) -> i32 {
        match field {
            Field::MinTemperature => self.min_temp_c,
            Field::MaxTemperature => self.max_temp_c,
            Field::DistanceGap => self.distance_gap_cm,
            Field::MaxLight => self.max_light_pct,
            Field::MinSoil => self.min_soil_pct,
        }
    }

    /// Sets a field, clamped to its bounds
    /// returns the value actually stored
    pub fn set(&mut self, field: Field, value: i32) -> i32 {
        let value = field.clamp(value);
        let slot = match field {
            Field::MinTemperature => &mut self.min_temp_c,
            Field::MaxTemperature => &mut self.max_temp_c,
            Field::DistanceGap => &mut self.distance_gap_cm,
            Field::MaxLight => &mut self.max_light_pct,
            Field::MinSoil => &mut self.min_soil_pct,
        };
        *slot = value;
        value
    }

    /// Raises a field by `step`, stopping at its upper bound
    /// returns the new value
    pub fn increment(&mut self, field: Field, step: i32) -> i32 {
        self.set(field, self.get(field).saturating_add(step))
    }

    /// Lowers a field by `step`, stopping at its lower bound
    /// returns the new value
    pub fn decrement(&mut self, field: Field, step: i32) -> i32 {
        self.set(field, self.get(field).saturating_sub(step))
    }

    pub fn min_temp_c(&self) -> i32 {
        self.min_temp_c
    }

    pub fn max_temp_c(&self) -> i32 {
        self.max_temp_c
    }

    pub fn distance_gap_cm(&self) -> i32 {
        self.distance_gap_cm
    }

    pub fn max_light_pct(&self) -> i32 {
        self.max_light_pct
    }

    pub fn min_soil_pct(&self) -> i32 {
        self.min_soil_pct
    }

    pub fn watering_interval_ms(&self) -> u32 {
        self.watering_interval_ms
    }

    /// Sets the watering interval, clamped to [`WATERING_INTERVAL_BOUNDS_MS`]
    pub fn set_watering_interval_ms(&mut self, interval_ms: u32) -> u32 {
        let (min, max) = WATERING_INTERVAL_BOUNDS_MS;
        self.watering_interval_ms = interval_ms.clamp(min, max);
        self.watering_interval_ms
    }

    pub fn buzzer_muted(&self) -> bool {
        self.buzzer_muted
    }

    /// Flips the buzzer mute
    /// returns if the buzzer is now muted
    pub fn toggle_mute(&mut self) -> bool {
        self.buzzer_muted = !self.buzzer_muted;
        self.buzzer_muted
    }
}
