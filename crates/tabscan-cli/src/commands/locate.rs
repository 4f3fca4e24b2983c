use std::path::PathBuf;
use tabscan_core::error::TabscanError;
use tabscan_core::locate::TableLocator;
use tracing::info;

use crate::output;
use crate::settings::Settings;

pub fn run(
    document: PathBuf,
    header: &str,
    dpi: u32,
    settings: &Settings,
) -> Result<(), TabscanError> {
    let rasterizer = settings.rasterizer();
    let recognizer = settings.recognizer();

    let result =
        TableLocator::new(&rasterizer, &recognizer).locate_table(&document, header, dpi)?;
    info!(document = %document.display(), "{result}");

    output::json::print(&result)
}
