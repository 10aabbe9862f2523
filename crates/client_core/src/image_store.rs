//! Displayable image handles and their release discipline.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex},
};

use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// A displayable reference to image bytes, e.g. a `blob:` URL or a file path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageHandle(String);

impl ImageHandle {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("image store is poisoned")]
    Poisoned,
    #[error("failed to persist image {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Decoded plot payload ready to be turned into a handle.
#[derive(Clone, PartialEq, Eq)]
pub struct PlotImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

impl fmt::Debug for PlotImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlotImage")
            .field("size_bytes", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

pub trait ImageStore: Send + Sync {
    fn create(&self, image: PlotImage) -> Result<ImageHandle, ImageStoreError>;
    fn release(&self, handle: &ImageHandle);
}

/// In-memory registry handing out `blob:` URLs, the object-URL equivalent.
#[derive(Default, Clone)]
pub struct BlobImageStore {
    blobs: Arc<Mutex<HashMap<ImageHandle, PlotImage>>>,
}

impl BlobImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_handles(&self) -> usize {
        self.blobs.lock().map(|blobs| blobs.len()).unwrap_or_default()
    }

    pub fn get(&self, handle: &ImageHandle) -> Option<PlotImage> {
        self.blobs.lock().ok()?.get(handle).cloned()
    }
}

impl ImageStore for BlobImageStore {
    fn create(&self, image: PlotImage) -> Result<ImageHandle, ImageStoreError> {
        let handle = ImageHandle::new(format!("blob:pathgauge/{}", Uuid::new_v4()));
        self.blobs
            .lock()
            .map_err(|_| ImageStoreError::Poisoned)?
            .insert(handle.clone(), image);
        debug!(%handle, "image store: blob created");
        Ok(handle)
    }

    fn release(&self, handle: &ImageHandle) {
        match self.blobs.lock() {
            Ok(mut blobs) => {
                if blobs.remove(handle).is_none() {
                    warn!(%handle, "image store: release of unknown blob");
                }
            }
            Err(_) => warn!(%handle, "image store: poisoned, blob not released"),
        }
    }
}

/// Owns the single live plot handle. Replacing or clearing always releases
/// the previous handle first.
pub struct PlotSlot {
    store: Arc<dyn ImageStore>,
    current: Option<ImageHandle>,
}

impl PlotSlot {
    pub fn new(store: Arc<dyn ImageStore>) -> Self {
        Self {
            store,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&ImageHandle> {
        self.current.as_ref()
    }

    pub fn replace(&mut self, image: PlotImage) -> Result<&ImageHandle, ImageStoreError> {
        let handle = self.store.create(image)?;
        self.clear();
        Ok(&*self.current.insert(handle))
    }

    pub fn clear(&mut self) {
        if let Some(previous) = self.current.take() {
            self.store.release(&previous);
        }
    }
}

#[cfg(test)]
#[path = "tests/image_store_tests.rs"]
mod tests;
