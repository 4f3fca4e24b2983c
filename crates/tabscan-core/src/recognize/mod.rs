pub mod easyocr;

use crate::error::TabscanError;
use crate::model::RecognizedRegion;
use image::GrayImage;

/// Trait for text recognition backends.
///
/// Implementations are long-lived: construct once, then reuse across pages
/// and documents.
pub trait TextRegionRecognizer: Send + Sync {
    /// Recognize text regions on one prepared page image.
    ///
    /// Regions come back in the backend's emission order. Callers must not
    /// read that order as top-to-bottom, but may rely on it being stable for
    /// a given output, which is what breaks ties between repeated headers.
    fn recognize(&self, image: &GrayImage) -> Result<Vec<RecognizedRegion>, TabscanError>;

    /// Name of this recognition backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
