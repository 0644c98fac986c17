//! Product image descriptors and the storage backend that holds the files.
//!
//! Uploading is handled before a product request reaches this service; the
//! service only records `{image_id, url}` descriptors and asks the store to
//! drop files when images are detached or their product is deleted.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// An uploaded image attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Storage-side identifier used for removal.
    pub image_id: String,
    /// Public URL the storefront renders.
    pub url: String,
}

/// Result of applying an image edit to a product's image list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEdit {
    /// The product's new image list.
    pub images: Vec<ProductImage>,
    /// Ids that were attached before the edit and are gone after it.
    pub detached: Vec<String>,
}

/// Drop every image whose id is in `removed`, then append `added`.
///
/// Ids in `removed` that the product does not own are ignored, so a caller
/// cannot use an update to delete another product's files.
pub fn edit_images(
    current: Vec<ProductImage>,
    removed: &[String],
    added: Vec<ProductImage>,
) -> ImageEdit {
    let (detached, mut images): (Vec<ProductImage>, Vec<ProductImage>) = current
        .into_iter()
        .partition(|img| removed.contains(&img.image_id));

    images.extend(added);

    ImageEdit {
        images,
        detached: detached.into_iter().map(|img| img.image_id).collect(),
    }
}

/// Backend that owns the stored image files.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Remove the stored files for every id. Missing files are not an error.
    async fn remove_images(&self, image_ids: &[String]) -> Result<(), CoreError>;
}

/// Image store backed by a directory on the local filesystem.
///
/// Each image lives at `<root>/<image_id>`.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve an id to its file path, rejecting ids that would escape `root`.
    fn path_for(&self, image_id: &str) -> Result<PathBuf, CoreError> {
        let invalid = image_id.is_empty()
            || image_id == "."
            || image_id == ".."
            || image_id.contains(['/', '\\']);
        if invalid {
            return Err(CoreError::invalid_field(
                "image_id",
                format!("Invalid image id '{image_id}'"),
            ));
        }
        Ok(self.root.join(image_id))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn remove_images(&self, image_ids: &[String]) -> Result<(), CoreError> {
        for image_id in image_ids {
            let path = self.path_for(image_id)?;
            match tokio::fs::remove_file(&path).await {
                Ok(()) => tracing::debug!(image_id = %image_id, "Image file removed"),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::warn!(image_id = %image_id, "Image file already absent");
                }
                Err(e) => {
                    return Err(CoreError::Internal(format!(
                        "Failed to remove image {image_id}: {e}"
                    )));
                }
            }
        }
        Ok(())
    }
}
