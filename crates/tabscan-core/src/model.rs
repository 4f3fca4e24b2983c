use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A point in page-image pixel coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Point { x, y }
    }
}

impl From<Point> for [f32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// One unit of text produced by the recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedRegion {
    pub polygon: Vec<Point>,
    pub text: String,
    #[serde(default)]
    pub confidence: f32,
}

impl RecognizedRegion {
    pub fn new(polygon: Vec<Point>, text: impl Into<String>, confidence: f32) -> Self {
        RecognizedRegion {
            polygon,
            text: text.into(),
            confidence,
        }
    }

    /// Topmost y over the bounding polygon. `None` for an empty polygon.
    pub fn top_y(&self) -> Option<f32> {
        self.polygon.iter().map(|p| p.y).reduce(f32::min)
    }
}

/// A rendered page persisted in the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    /// 1-based page number.
    pub page_number: usize,
    pub path: PathBuf,
}

impl PageImage {
    /// Identifier reported in [`TableResult::page`].
    pub fn identifier(&self) -> String {
        self.path.display().to_string()
    }
}

/// The region accepted as the table header on a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderMatch {
    /// Position of the header region in recognizer emission order.
    pub region_index: usize,
    pub header_y: f32,
}

/// Extracted table contents. `page` is `None` when no page matched the header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableResult {
    pub page: Option<String>,
    pub numbers: Vec<String>,
    pub raw_rows: Vec<String>,
}

impl TableResult {
    pub fn not_found() -> Self {
        TableResult::default()
    }

    pub fn is_found(&self) -> bool {
        self.page.is_some()
    }
}

impl fmt::Display for TableResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.page {
            Some(page) => write!(
                f,
                "{page}: {} row(s), {} number(s)",
                self.raw_rows.len(),
                self.numbers.len()
            ),
            None => write!(f, "table not found"),
        }
    }
}
