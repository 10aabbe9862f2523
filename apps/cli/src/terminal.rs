//! Terminal rendering of the measurement view.

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use client_core::{FormValues, ImageHandle, Panel, TextSlot, ViewSurface};

#[derive(Default)]
struct TerminalState {
    form: FormValues,
    texts: HashMap<TextSlot, String>,
    visible: HashSet<Panel>,
    image: Option<ImageHandle>,
}

/// Holds the form given on the command line and whatever the workflow
/// wrote, then prints the visible panels on demand.
#[derive(Default)]
pub struct TerminalView {
    state: Mutex<TerminalState>,
}

impl TerminalView {
    pub fn new(form: FormValues) -> Self {
        Self {
            state: Mutex::new(TerminalState {
                form,
                ..TerminalState::default()
            }),
        }
    }

    pub fn render(&self) -> String {
        let Ok(state) = self.state.lock() else {
            return String::new();
        };
        let text = |slot: TextSlot| state.texts.get(&slot).map(String::as_str).unwrap_or_default();

        let mut lines = Vec::new();
        if state.visible.contains(&Panel::Error) {
            lines.push(format!("error: {}", text(TextSlot::Error)));
        }
        if state.visible.contains(&Panel::Result) {
            for slot in [TextSlot::Distance, TextSlot::Dimensions, TextSlot::EndOfFile] {
                if !text(slot).is_empty() {
                    lines.push(text(slot).to_string());
                }
            }
        }
        if state.visible.contains(&Panel::Plot) {
            if let Some(image) = &state.image {
                lines.push(format!("plot: {image}"));
            }
        }

        lines
            .into_iter()
            .map(|line| format!("{line}\n"))
            .collect()
    }
}

impl ViewSurface for TerminalView {
    fn read_form(&self) -> FormValues {
        self.state
            .lock()
            .map(|state| state.form.clone())
            .unwrap_or_default()
    }

    fn clear_form(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.form = FormValues::default();
        }
    }

    fn set_text(&self, slot: TextSlot, text: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.texts.insert(slot, text.to_string());
        }
    }

    fn set_visible(&self, panel: Panel, visible: bool) {
        if let Ok(mut state) = self.state.lock() {
            if visible {
                state.visible.insert(panel);
            } else {
                state.visible.remove(&panel);
            }
        }
    }

    fn set_image_source(&self, source: Option<&ImageHandle>) {
        if let Ok(mut state) = self.state.lock() {
            state.image = source.cloned();
        }
    }
}

#[cfg(test)]
#[path = "tests/terminal_tests.rs"]
mod tests;
