use std::path::PathBuf;
use tabscan_core::raster::pdftoppm::PdftoppmRasterizer;
use tabscan_core::recognize::easyocr::EasyOcrBridge;

/// Runtime settings that are not part of the command line.
///
/// Read from `TABSCAN_*` environment variables, falling back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub work_dir: PathBuf,
    pub python: String,
    pub ocr_script: PathBuf,
    pub ocr_langs: Vec<String>,
    pub ocr_gpu: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            work_dir: PathBuf::from("pages"),
            python: "python3".to_string(),
            ocr_script: PathBuf::from("scripts/easyocr_bridge.py"),
            ocr_langs: vec!["en".to_string()],
            ocr_gpu: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Settings::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get("TABSCAN_WORK_DIR") {
            settings.work_dir = PathBuf::from(dir);
        }
        if let Some(python) = get("TABSCAN_PYTHON") {
            settings.python = python;
        }
        if let Some(script) = get("TABSCAN_OCR_SCRIPT") {
            settings.ocr_script = PathBuf::from(script);
        }
        if let Some(langs) = get("TABSCAN_OCR_LANGS") {
            let langs: Vec<String> = langs
                .split(',')
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect();
            if !langs.is_empty() {
                settings.ocr_langs = langs;
            }
        }
        if let Some(gpu) = get("TABSCAN_OCR_GPU") {
            settings.ocr_gpu = matches!(gpu.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }

        settings
    }

    pub fn rasterizer(&self) -> PdftoppmRasterizer {
        PdftoppmRasterizer::new(&self.work_dir)
    }

    pub fn recognizer(&self) -> EasyOcrBridge {
        EasyOcrBridge::new()
            .with_python(self.python.clone())
            .with_script(&self.ocr_script)
            .with_langs(self.ocr_langs.clone())
            .with_gpu(self.ocr_gpu)
    }
}
