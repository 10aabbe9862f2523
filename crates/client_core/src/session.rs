//! Mutable state owned by one coordinator.

use std::{fmt, sync::Arc};

use shared::domain::DisplayUnit;

use crate::{
    image_store::{ImageHandle, ImageStore, PlotSlot},
    presenter::MeasuredResult,
    units::UnitConverter,
};

/// Monotonic submission token. A response is only applied when its token is
/// still the latest one issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub struct SessionState {
    generation: Generation,
    last_result: Option<MeasuredResult>,
    units: UnitConverter,
    plot: PlotSlot,
}

impl SessionState {
    pub fn new(images: Arc<dyn ImageStore>, unit: DisplayUnit) -> Self {
        Self {
            generation: Generation::default(),
            last_result: None,
            units: UnitConverter::new(unit),
            plot: PlotSlot::new(images),
        }
    }

    /// Issues a fresh token; everything issued before it becomes stale.
    pub fn advance_generation(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.generation
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation
    }

    pub fn unit(&self) -> DisplayUnit {
        self.units.unit()
    }

    pub fn select_unit(&mut self, unit: DisplayUnit) -> bool {
        self.units.select(unit)
    }

    pub fn last_result(&self) -> Option<&MeasuredResult> {
        self.last_result.as_ref()
    }

    pub fn store_result(&mut self, result: MeasuredResult) {
        self.last_result = Some(result);
    }

    pub fn forget_result(&mut self) {
        self.last_result = None;
    }

    pub fn plot(&self) -> Option<&ImageHandle> {
        self.plot.current()
    }

    pub fn plot_slot_mut(&mut self) -> &mut PlotSlot {
        &mut self.plot
    }
}
