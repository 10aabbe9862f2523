//! Millimeter to display-unit conversion.

use shared::domain::DisplayUnit;

pub fn display_value(raw_mm: f64, unit: DisplayUnit) -> f64 {
    raw_mm * unit.factor()
}

pub fn to_millimeters(value: f64, unit: DisplayUnit) -> f64 {
    value / unit.factor()
}

/// Remembers the selected unit; the stored millimeter values never pass
/// through here mutably.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitConverter {
    unit: DisplayUnit,
}

impl UnitConverter {
    pub fn new(unit: DisplayUnit) -> Self {
        Self { unit }
    }

    pub fn unit(&self) -> DisplayUnit {
        self.unit
    }

    /// Returns true when the selection actually changed.
    pub fn select(&mut self, unit: DisplayUnit) -> bool {
        let changed = self.unit != unit;
        self.unit = unit;
        changed
    }
}

#[cfg(test)]
#[path = "tests/units_tests.rs"]
mod tests;
