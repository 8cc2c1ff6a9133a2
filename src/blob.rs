//! Local-disk blob store for uploaded photos.
//!
//! Files land under `<root>/<namespace>/<random>.<ext>` and the returned key
//! is the namespace-relative path, which is what gets persisted on the
//! record. The `/uploads` route serves the root read-only.

use crate::errors::ApiError;
use crate::validate::Upload;
use base64ct::Encoding;
use rand::RngCore;
use std::fs;
use std::path::{Path, PathBuf};

pub const DESTINATION_PHOTOS: &str = "destination_photo";
pub const REVIEW_PHOTOS: &str = "review_photo";

pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes the upload under the namespace and returns its blob key.
    pub fn store(&self, namespace: &str, upload: &Upload) -> Result<String, ApiError> {
        let dir = self.root.join(namespace);
        fs::create_dir_all(&dir)?;

        let file_name = match Path::new(&upload.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            Some(ext) => format!("{}.{}", random_key(), ext),
            None => random_key(),
        };
        fs::write(dir.join(&file_name), &upload.bytes)?;

        Ok(format!("{namespace}/{file_name}"))
    }
}

fn random_key() -> String {
    let mut bytes = [0u8; 24];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64ct::Base64UrlUnpadded::encode_string(&bytes)
}
