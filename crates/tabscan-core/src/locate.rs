use crate::error::TabscanError;
use crate::model::{HeaderMatch, PageImage, RecognizedRegion, TableResult};
use crate::parsing::normalize::normalize;
use crate::parsing::numbers::extract_numbers;
use crate::raster::prepare::{load_for_recognition, MAX_RECOGNITION_WIDTH};
use crate::raster::PageRasterizer;
use crate::recognize::TextRegionRecognizer;
use std::path::Path;
use tracing::{debug, info, trace};

/// Rendering resolution used when the caller has no preference.
pub const DEFAULT_DPI: u32 = 150;

/// Vertical gap (in pixels of the prepared image) a region must clear below
/// the header's top edge to count as table content.
///
/// Tuned for [`DEFAULT_DPI`]; it is not rescaled for other resolutions.
pub const HEADER_MARGIN: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocateOptions {
    /// Pages wider than this are downscaled before recognition.
    pub max_width: u32,
    pub header_margin: f32,
}

impl Default for LocateOptions {
    fn default() -> Self {
        LocateOptions {
            max_width: MAX_RECOGNITION_WIDTH,
            header_margin: HEADER_MARGIN,
        }
    }
}

/// Rows found below a header on one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableContent {
    pub numbers: Vec<String>,
    pub raw_rows: Vec<String>,
}

/// Finds a header-labeled table in a document and pulls out its numbers.
///
/// Pages are rendered up front, but recognized one at a time: the scan stops
/// at the first page whose text contains the header, and later pages are
/// never handed to the recognizer.
pub struct TableLocator<'a> {
    rasterizer: &'a dyn PageRasterizer,
    recognizer: &'a dyn TextRegionRecognizer,
    options: LocateOptions,
}

impl<'a> TableLocator<'a> {
    pub fn new(
        rasterizer: &'a dyn PageRasterizer,
        recognizer: &'a dyn TextRegionRecognizer,
    ) -> Self {
        TableLocator {
            rasterizer,
            recognizer,
            options: LocateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LocateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &LocateOptions {
        &self.options
    }

    /// Locate the table under `header_phrase` and extract its contents.
    ///
    /// Returns `TableResult::not_found()` when no page contains the header.
    /// Rasterizer and recognizer failures are returned as-is.
    pub fn locate_table(
        &self,
        document: &Path,
        header_phrase: &str,
        dpi: u32,
    ) -> Result<TableResult, TabscanError> {
        let header_norm = normalize(header_phrase);
        let pages = self.rasterizer.rasterize(document, dpi)?;
        debug!(
            pages = pages.len(),
            rasterizer = self.rasterizer.backend_name(),
            recognizer = self.recognizer.backend_name(),
            header = %header_norm,
            "scanning document"
        );

        for page in &pages {
            if let Some(content) = self.scan_page(page, &header_norm)? {
                return Ok(TableResult {
                    page: Some(page.identifier()),
                    numbers: content.numbers,
                    raw_rows: content.raw_rows,
                });
            }
        }

        info!(header = %header_norm, "header not found on any page");
        Ok(TableResult::not_found())
    }

    fn scan_page(
        &self,
        page: &PageImage,
        header_norm: &str,
    ) -> Result<Option<TableContent>, TabscanError> {
        let image = load_for_recognition(&page.path, self.options.max_width)?;
        let regions = self.recognizer.recognize(&image)?;
        debug!(
            page = page.page_number,
            regions = regions.len(),
            "recognized page"
        );
        Ok(extract_table(&regions, header_norm, self.options.header_margin))
    }
}

/// Find the first region, in emission order, whose normalized text contains
/// `header_norm`.
///
/// Regions without polygon points cannot anchor a cutoff and are passed over.
pub fn find_header(regions: &[RecognizedRegion], header_norm: &str) -> Option<HeaderMatch> {
    regions.iter().enumerate().find_map(|(region_index, region)| {
        if !normalize(&region.text).contains(header_norm) {
            return None;
        }
        let header_y = region.top_y()?;
        Some(HeaderMatch {
            region_index,
            header_y,
        })
    })
}

/// Collect every region whose top edge lies strictly below
/// `header_y + margin`, keeping emission order.
pub fn collect_table(regions: &[RecognizedRegion], header_y: f32, margin: f32) -> TableContent {
    let cutoff = header_y + margin;
    let mut content = TableContent::default();

    for region in regions {
        let Some(top) = region.top_y() else {
            continue;
        };
        if top > cutoff {
            trace!(top, text = %region.text, "table row");
            content.numbers.extend(extract_numbers(&region.text));
            content.raw_rows.push(region.text.clone());
        }
    }

    content
}

/// Header search plus row collection for one page's regions.
pub fn extract_table(
    regions: &[RecognizedRegion],
    header_norm: &str,
    margin: f32,
) -> Option<TableContent> {
    let header = find_header(regions, header_norm)?;
    let content = collect_table(regions, header.header_y, margin);
    info!(
        header_region = header.region_index,
        header_y = header.header_y,
        rows = content.raw_rows.len(),
        numbers = content.numbers.len(),
        "header matched"
    );
    Some(content)
}
