// SPDX-License-Identifier: GPL-3.0-or-later
use std::fmt;

use serde::Deserialize;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TemperatureUnit {
    #[serde(alias = "c")]
    Celsius,

    #[serde(alias = "f")]
    Fahrenheit,
}

impl Default for TemperatureUnit {
    fn default() -> Self {
        Self::Celsius
    }
}

impl TemperatureUnit {
    /// Convert a temperature in Celsius to this unit.
    pub(crate) fn from_celsius(&self, celsius: f32) -> f32 {
        Temperature::Celsius(celsius).in_unit(self)
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(match self {
            TemperatureUnit::Celsius => "C",
            TemperatureUnit::Fahrenheit => "F",
        })
    }
}

/// A temperature tagged with its unit.
///
/// When deserialized, a bare number is treated as Celsius, while a single entry table like
/// `{ fahrenheit = 68 }` picks the unit explicitly.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(from = "DeserializedTemperature")]
pub(crate) enum Temperature {
    Celsius(f32),
    Fahrenheit(f32),
}

impl Temperature {
    pub(crate) fn in_celsius(&self) -> f32 {
        match self {
            Self::Celsius(c) => *c,
            Self::Fahrenheit(f) => (f - 32.0) * 5.0 / 9.0,
        }
    }

    pub(crate) fn in_fahrenheit(&self) -> f32 {
        match self {
            Self::Celsius(c) => c * 9.0 / 5.0 + 32.0,
            Self::Fahrenheit(f) => *f,
        }
    }

    pub(crate) fn in_unit(&self, unit: &TemperatureUnit) -> f32 {
        match unit {
            TemperatureUnit::Celsius => self.in_celsius(),
            TemperatureUnit::Fahrenheit => self.in_fahrenheit(),
        }
    }
}

impl PartialEq for Temperature {
    fn eq(&self, other: &Self) -> bool {
        // Always compare in celsius.
        self.in_celsius() == other.in_celsius()
    }
}

// Accept either a raw number or a map of a unit to a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum DeserializedTemperature {
    Number(f32),
    Tagged(TaggedTemperature),
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum TaggedTemperature {
    #[serde(alias = "c", alias = "C")]
    Celsius(f32),

    #[serde(alias = "f", alias = "F")]
    Fahrenheit(f32),
}

impl From<DeserializedTemperature> for Temperature {
    fn from(value: DeserializedTemperature) -> Self {
        match value {
            DeserializedTemperature::Number(c)
            | DeserializedTemperature::Tagged(TaggedTemperature::Celsius(c)) => Self::Celsius(c),
            DeserializedTemperature::Tagged(TaggedTemperature::Fahrenheit(f)) => {
                Self::Fahrenheit(f)
            }
        }
    }
}
