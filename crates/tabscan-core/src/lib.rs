pub mod error;
pub mod locate;
pub mod model;
pub mod parsing;
pub mod raster;
pub mod recognize;

use error::TabscanError;
use locate::TableLocator;
use model::TableResult;
use raster::PageRasterizer;
use recognize::TextRegionRecognizer;
use std::path::Path;

pub use locate::{LocateOptions, DEFAULT_DPI, HEADER_MARGIN};

/// Main API entry point: find the table labeled `header_phrase` in a
/// document and extract its numbers.
///
/// A missing header is not an error; it yields a result with `page: None`.
pub fn locate_table(
    document: &Path,
    header_phrase: &str,
    dpi: u32,
    rasterizer: &dyn PageRasterizer,
    recognizer: &dyn TextRegionRecognizer,
) -> Result<TableResult, TabscanError> {
    TableLocator::new(rasterizer, recognizer).locate_table(document, header_phrase, dpi)
}
