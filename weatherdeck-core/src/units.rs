//! Unit-aware readers for paired metric/imperial fields.
//!
//! Every displayed number goes through one of these accessors so that a single
//! [`UnitSystem`] decides which half of each pair is shown.

use crate::model::{CurrentConditions, DaySummary, HourlyRecord, UnitSystem};

/// Which temperature of a record to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureVariant {
    #[default]
    Current,
    Max,
    Min,
}

pub trait TemperatureReadings {
    fn celsius(&self, variant: TemperatureVariant) -> Option<f64>;
    fn fahrenheit(&self, variant: TemperatureVariant) -> Option<f64>;
}

pub trait FeelsLikeReadings {
    fn feels_like_c(&self) -> Option<f64>;
    fn feels_like_f(&self) -> Option<f64>;
}

pub trait WindReadings {
    fn wind_kph(&self) -> f64;
    fn wind_mph(&self) -> f64;
}

pub trait GustReadings {
    fn gust_kph(&self) -> f64;
    fn gust_mph(&self) -> f64;
}

pub trait PrecipitationReadings {
    fn precip_mm(&self) -> f64;
    fn precip_in(&self) -> f64;
}

pub trait VisibilityReadings {
    fn vis_km(&self) -> f64;
    fn vis_miles(&self) -> f64;
}

/// Missing fields read as zero.
pub fn temperature<T: TemperatureReadings + ?Sized>(
    data: &T,
    unit: UnitSystem,
    variant: TemperatureVariant,
) -> f64 {
    unit.pick(data.celsius(variant), data.fahrenheit(variant)).unwrap_or(0.0)
}

/// Missing fields read as zero.
pub fn feels_like<T: FeelsLikeReadings + ?Sized>(data: &T, unit: UnitSystem) -> f64 {
    unit.pick(data.feels_like_c(), data.feels_like_f()).unwrap_or(0.0)
}

pub fn wind_speed<T: WindReadings + ?Sized>(data: &T, unit: UnitSystem) -> f64 {
    unit.pick(data.wind_kph(), data.wind_mph())
}

pub fn gust_speed<T: GustReadings + ?Sized>(data: &T, unit: UnitSystem) -> f64 {
    unit.pick(data.gust_kph(), data.gust_mph())
}

pub fn precipitation<T: PrecipitationReadings + ?Sized>(data: &T, unit: UnitSystem) -> f64 {
    unit.pick(data.precip_mm(), data.precip_in())
}

pub fn visibility<T: VisibilityReadings + ?Sized>(data: &T, unit: UnitSystem) -> f64 {
    unit.pick(data.vis_km(), data.vis_miles())
}

pub fn temperature_symbol(unit: UnitSystem) -> &'static str {
    unit.pick("°C", "°F")
}

pub fn wind_speed_symbol(unit: UnitSystem) -> &'static str {
    unit.pick("km/h", "mph")
}

pub fn precipitation_symbol(unit: UnitSystem) -> &'static str {
    unit.pick("mm", "in")
}

pub fn visibility_symbol(unit: UnitSystem) -> &'static str {
    unit.pick("km", "miles")
}

/// Convert a single temperature into `target`: Celsius input for
/// [`UnitSystem::Imperial`], Fahrenheit input for [`UnitSystem::Metric`].
pub fn convert_temperature(value: f64, target: UnitSystem) -> f64 {
    match target {
        UnitSystem::Imperial => value * 9.0 / 5.0 + 32.0,
        UnitSystem::Metric => (value - 32.0) * 5.0 / 9.0,
    }
}

impl TemperatureReadings for CurrentConditions {
    fn celsius(&self, variant: TemperatureVariant) -> Option<f64> {
        match variant {
            TemperatureVariant::Current => self.temp_c,
            TemperatureVariant::Max | TemperatureVariant::Min => None,
        }
    }

    fn fahrenheit(&self, variant: TemperatureVariant) -> Option<f64> {
        match variant {
            TemperatureVariant::Current => self.temp_f,
            TemperatureVariant::Max | TemperatureVariant::Min => None,
        }
    }
}

impl TemperatureReadings for HourlyRecord {
    fn celsius(&self, variant: TemperatureVariant) -> Option<f64> {
        match variant {
            TemperatureVariant::Current => self.temp_c,
            TemperatureVariant::Max | TemperatureVariant::Min => None,
        }
    }

    fn fahrenheit(&self, variant: TemperatureVariant) -> Option<f64> {
        match variant {
            TemperatureVariant::Current => self.temp_f,
            TemperatureVariant::Max | TemperatureVariant::Min => None,
        }
    }
}

impl TemperatureReadings for DaySummary {
    fn celsius(&self, variant: TemperatureVariant) -> Option<f64> {
        match variant {
            TemperatureVariant::Current => None,
            TemperatureVariant::Max => self.maxtemp_c,
            TemperatureVariant::Min => self.mintemp_c,
        }
    }

    fn fahrenheit(&self, variant: TemperatureVariant) -> Option<f64> {
        match variant {
            TemperatureVariant::Current => None,
            TemperatureVariant::Max => self.maxtemp_f,
            TemperatureVariant::Min => self.mintemp_f,
        }
    }
}

impl FeelsLikeReadings for CurrentConditions {
    fn feels_like_c(&self) -> Option<f64> {
        self.feelslike_c
    }

    fn feels_like_f(&self) -> Option<f64> {
        self.feelslike_f
    }
}

impl FeelsLikeReadings for HourlyRecord {
    fn feels_like_c(&self) -> Option<f64> {
        self.feelslike_c
    }

    fn feels_like_f(&self) -> Option<f64> {
        self.feelslike_f
    }
}

// Field-for-field pairs share one impl shape.
macro_rules! paired_readings {
    ($trait:ident, $ty:ty, $metric:ident => $mfield:ident, $imperial:ident => $ifield:ident) => {
        impl $trait for $ty {
            fn $metric(&self) -> f64 {
                self.$mfield
            }

            fn $imperial(&self) -> f64 {
                self.$ifield
            }
        }
    };
}

paired_readings!(WindReadings, CurrentConditions, wind_kph => wind_kph, wind_mph => wind_mph);
paired_readings!(WindReadings, HourlyRecord, wind_kph => wind_kph, wind_mph => wind_mph);
paired_readings!(WindReadings, DaySummary, wind_kph => maxwind_kph, wind_mph => maxwind_mph);
paired_readings!(GustReadings, CurrentConditions, gust_kph => gust_kph, gust_mph => gust_mph);
paired_readings!(GustReadings, HourlyRecord, gust_kph => gust_kph, gust_mph => gust_mph);
paired_readings!(PrecipitationReadings, CurrentConditions, precip_mm => precip_mm, precip_in => precip_in);
paired_readings!(PrecipitationReadings, HourlyRecord, precip_mm => precip_mm, precip_in => precip_in);
paired_readings!(PrecipitationReadings, DaySummary, precip_mm => totalprecip_mm, precip_in => totalprecip_in);
paired_readings!(VisibilityReadings, CurrentConditions, vis_km => vis_km, vis_miles => vis_miles);
paired_readings!(VisibilityReadings, HourlyRecord, vis_km => vis_km, vis_miles => vis_miles);
