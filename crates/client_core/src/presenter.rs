//! Turns a stored measurement into the text shown in the result panel.

use shared::{
    domain::{DisplayUnit, LineNumber},
    protocol::UploadResponse,
};

use crate::{
    units::display_value,
    view::{Panel, TextSlot, ViewSurface},
};

/// A successful upload together with the line numbers that were asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredResult {
    pub start_line: LineNumber,
    pub end_line: LineNumber,
    pub response: UploadResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub distance: String,
    pub dimensions: Option<String>,
    pub end_of_file: Option<String>,
}

pub fn distance_text(
    start_line: LineNumber,
    end_line: LineNumber,
    distance_mm: f64,
    unit: DisplayUnit,
) -> String {
    format!(
        "Distance between lines {start_line} and {end_line}: {:.4} {unit}",
        display_value(distance_mm, unit)
    )
}

pub fn dimensions_text(length_mm: f64, width_mm: f64, unit: DisplayUnit) -> String {
    format!(
        "Dimensions: {:.3} {unit} x {:.3} {unit} (Length x Height)",
        display_value(length_mm, unit),
        display_value(width_mm, unit)
    )
}

pub fn end_of_file_text(response: &UploadResponse) -> Option<String> {
    response
        .last_valid_line()
        .map(|line| format!("The last valid line in this file is line {line}"))
}

pub struct ResultPresenter;

impl ResultPresenter {
    pub fn render(result: &MeasuredResult, unit: DisplayUnit) -> Presentation {
        let response = &result.response;
        Presentation {
            distance: distance_text(
                result.start_line,
                result.end_line,
                response.distance_mm,
                unit,
            ),
            dimensions: response
                .bounding_box()
                .map(|(length_mm, width_mm)| dimensions_text(length_mm, width_mm, unit)),
            end_of_file: end_of_file_text(response),
        }
    }

    /// Writes every slot, so text left over from an earlier result never
    /// survives, then reveals the result panel.
    pub fn present(
        view: &dyn ViewSurface,
        result: &MeasuredResult,
        unit: DisplayUnit,
    ) -> Presentation {
        let presentation = Self::render(result, unit);
        view.set_text(TextSlot::Distance, &presentation.distance);
        view.set_text(
            TextSlot::Dimensions,
            presentation.dimensions.as_deref().unwrap_or_default(),
        );
        view.set_text(
            TextSlot::EndOfFile,
            presentation.end_of_file.as_deref().unwrap_or_default(),
        );
        view.set_visible(Panel::Result, true);
        presentation
    }
}

#[cfg(test)]
#[path = "tests/presenter_tests.rs"]
mod tests;
