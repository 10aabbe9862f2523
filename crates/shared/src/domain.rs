use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! line_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

line_newtype!(LineNumber);

/// Length unit used for presentation only. Every stored value is in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DisplayUnit {
    #[default]
    #[serde(rename = "mm")]
    Millimeters,
    #[serde(rename = "cm")]
    Centimeters,
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "in")]
    Inches,
    #[serde(rename = "ft")]
    Feet,
}

impl DisplayUnit {
    pub const ALL: [DisplayUnit; 5] = [
        DisplayUnit::Millimeters,
        DisplayUnit::Centimeters,
        DisplayUnit::Meters,
        DisplayUnit::Inches,
        DisplayUnit::Feet,
    ];

    /// Multiplicative factor from millimeters.
    pub fn factor(self) -> f64 {
        match self {
            DisplayUnit::Millimeters => 1.0,
            DisplayUnit::Centimeters => 0.1,
            DisplayUnit::Meters => 0.001,
            DisplayUnit::Inches => 0.0393701,
            DisplayUnit::Feet => 0.00328084,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DisplayUnit::Millimeters => "mm",
            DisplayUnit::Centimeters => "cm",
            DisplayUnit::Meters => "m",
            DisplayUnit::Inches => "in",
            DisplayUnit::Feet => "ft",
        }
    }
}

impl fmt::Display for DisplayUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown display unit {0:?}; expected one of mm, cm, m, in, ft")]
pub struct UnknownUnit(pub String);

impl FromStr for DisplayUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        DisplayUnit::ALL
            .into_iter()
            .find(|unit| unit.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownUnit(s.to_string()))
    }
}
