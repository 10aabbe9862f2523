//! Image store that keeps each plot as a file on disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use client_core::{ImageHandle, ImageStore, ImageStoreError, PlotImage};
use tracing::{info, warn};
use uuid::Uuid;

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/svg+xml" => "svg",
        _ => "img",
    }
}

pub struct FilePlotStore {
    dir: PathBuf,
}

impl FilePlotStore {
    pub fn new(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create plot directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ImageStore for FilePlotStore {
    fn create(&self, image: PlotImage) -> Result<ImageHandle, ImageStoreError> {
        let path = self.dir.join(format!(
            "plot-{}.{}",
            Uuid::new_v4(),
            extension_for(image.mime_type)
        ));
        fs::write(&path, &image.bytes).map_err(|source| ImageStoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "plot written");
        Ok(ImageHandle::new(path.display().to_string()))
    }

    fn release(&self, handle: &ImageHandle) {
        if let Err(error) = fs::remove_file(handle.as_str()) {
            warn!(%handle, %error, "failed to remove superseded plot file");
        }
    }
}
