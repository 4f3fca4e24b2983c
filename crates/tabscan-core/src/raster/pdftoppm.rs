use crate::error::TabscanError;
use crate::model::PageImage;
use crate::raster::PageRasterizer;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Output prefix handed to pdftoppm; it appends `-<n>.png` per page.
const RAW_PREFIX: &str = "page";

/// Rendering backend using pdftoppm (from poppler-utils).
///
/// Pages are written into `work_dir` as `page_<n>.png`. Existing files with
/// the same names are overwritten, so concurrent callers need distinct
/// working directories.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    work_dir: PathBuf,
}

impl PdftoppmRasterizer {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        PdftoppmRasterizer {
            work_dir: work_dir.into(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Check if pdftoppm is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftoppm")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    fn rasterize(&self, document: &Path, dpi: u32) -> Result<Vec<PageImage>, TabscanError> {
        if !document.is_file() {
            return Err(TabscanError::Input(format!(
                "{} does not exist or is not a file",
                document.display()
            )));
        }

        fs::create_dir_all(&self.work_dir)?;
        // Each run renders into its own staging directory so that leftovers
        // from an aborted earlier run are never mistaken for pages.
        let staging = tempfile::Builder::new()
            .prefix(".render-")
            .tempdir_in(&self.work_dir)?;
        let prefix = staging.path().join(RAW_PREFIX);

        let output = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg(dpi.to_string())
            .arg(document)
            .arg(&prefix)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TabscanError::PdftoppmNotFound
                } else {
                    TabscanError::Rasterization(format!("pdftoppm failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            // Exit code 1 is poppler's "error opening a PDF file".
            if code == 1 {
                return Err(TabscanError::Input(format!(
                    "{}: {}",
                    document.display(),
                    stderr
                )));
            }
            return Err(TabscanError::PdftoppmFailed { code, stderr });
        }

        let pages = collect_rendered_pages(staging.path(), &self.work_dir)?;
        if pages.is_empty() {
            return Err(TabscanError::Rasterization(format!(
                "pdftoppm produced no pages for {}",
                document.display()
            )));
        }

        debug!(
            pages = pages.len(),
            dpi,
            work_dir = %self.work_dir.display(),
            "rendered document"
        );
        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "pdftoppm"
    }
}

/// Gather pdftoppm's `page-<n>.png` outputs from `staging` in numeric page
/// order and move them to their stable `page_<n>.png` names in `dest`.
///
/// pdftoppm zero-pads `<n>` to the width of the page count, so the same
/// page can appear as `page-2.png` or `page-02.png` depending on the document.
fn collect_rendered_pages(staging: &Path, dest: &Path) -> Result<Vec<PageImage>, TabscanError> {
    let mut rendered: Vec<(usize, PathBuf)> = Vec::new();
    for entry in fs::read_dir(staging)? {
        let entry = entry?;
        let name = entry.file_name();
        if let Some(n) = name.to_str().and_then(parse_raw_page_number) {
            rendered.push((n, entry.path()));
        }
    }
    rendered.sort_by_key(|(n, _)| *n);

    let mut pages = Vec::with_capacity(rendered.len());
    for (page_number, raw_path) in rendered {
        let path = dest.join(format!("page_{}.png", page_number));
        fs::rename(&raw_path, &path)?;
        pages.push(PageImage { page_number, path });
    }
    Ok(pages)
}

fn parse_raw_page_number(file_name: &str) -> Option<usize> {
    file_name
        .strip_prefix(RAW_PREFIX)?
        .strip_prefix('-')?
        .strip_suffix(".png")?
        .parse()
        .ok()
}
