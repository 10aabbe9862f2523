//! Narrow interface to whatever renders the measurement form and results.

use std::fmt;

use crate::image_store::ImageHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextSlot {
    Distance,
    Dimensions,
    EndOfFile,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Result,
    Plot,
    Error,
}

#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("filename", &self.filename)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

/// Raw form contents. Line numbers are whatever text the user typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub file: Option<SelectedFile>,
    pub start_line: String,
    pub end_line: String,
}

impl FormValues {
    pub fn new(file: SelectedFile, start_line: impl ToString, end_line: impl ToString) -> Self {
        Self {
            file: Some(file),
            start_line: start_line.to_string(),
            end_line: end_line.to_string(),
        }
    }
}

pub trait ViewSurface: Send + Sync {
    fn read_form(&self) -> FormValues;
    fn clear_form(&self);
    fn set_text(&self, slot: TextSlot, text: &str);
    fn set_visible(&self, panel: Panel, visible: bool);
    fn set_image_source(&self, source: Option<&ImageHandle>);
}
