pub mod pdftoppm;
pub mod prepare;

use crate::error::TabscanError;
use crate::model::PageImage;
use std::path::Path;

/// Trait for document rendering backends.
pub trait PageRasterizer: Send + Sync {
    /// Render every page of `document` at `dpi`, returning one persisted
    /// image per page in page order (numbered from 1).
    fn rasterize(&self, document: &Path, dpi: u32) -> Result<Vec<PageImage>, TabscanError>;

    /// Name of this rendering backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
