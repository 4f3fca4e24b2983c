use crate::error::TabscanError;
use crate::model::RecognizedRegion;
use crate::recognize::TextRegionRecognizer;
use image::{GrayImage, ImageFormat};
use serde::Deserialize;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::Mutex;
use tracing::{debug, info};

/// Recognition backend driving EasyOCR through a persistent Python helper.
///
/// The helper (`scripts/easyocr_bridge.py`) loads the OCR model once and then
/// answers one JSON request per line on stdin with one JSON line on stdout.
/// The process is started lazily on the first page and kept for the lifetime
/// of the bridge; requests are serialized through a mutex.
pub struct EasyOcrBridge {
    python: String,
    script_path: PathBuf,
    langs: Vec<String>,
    gpu: bool,
    session: Mutex<Option<BridgeSession>>,
}

impl EasyOcrBridge {
    pub fn new() -> Self {
        EasyOcrBridge {
            python: "python3".to_string(),
            script_path: PathBuf::from("scripts/easyocr_bridge.py"),
            langs: vec!["en".to_string()],
            gpu: false,
            session: Mutex::new(None),
        }
    }

    pub fn with_python(mut self, python: impl Into<String>) -> Self {
        self.python = python.into();
        self
    }

    pub fn with_script(mut self, script_path: impl Into<PathBuf>) -> Self {
        self.script_path = script_path.into();
        self
    }

    pub fn with_langs(mut self, langs: Vec<String>) -> Self {
        self.langs = langs;
        self
    }

    pub fn with_gpu(mut self, gpu: bool) -> Self {
        self.gpu = gpu;
        self
    }

    fn spawn(&self) -> Result<BridgeSession, TabscanError> {
        let mut cmd = Command::new(&self.python);
        cmd.arg(&self.script_path)
            .arg("--lang")
            .arg(self.langs.join(","));
        if self.gpu {
            cmd.arg("--gpu");
        }

        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TabscanError::RecognizerUnavailable(format!("{} not found", self.python))
                } else {
                    TabscanError::RecognizerUnavailable(format!(
                        "failed to start OCR bridge: {}",
                        e
                    ))
                }
            })?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take().map(BufReader::new);
        let (Some(stdin), Some(stdout)) = (stdin, stdout) else {
            return Err(TabscanError::RecognizerUnavailable(
                "OCR bridge pipes were not captured".into(),
            ));
        };

        let mut session = BridgeSession {
            child,
            stdin: Some(stdin),
            stdout,
        };

        // The helper announces itself once the model is loaded.
        match parse_response(&session.read_line()?)? {
            BridgeResponse::Ready { ready: true } => {}
            _ => {
                return Err(TabscanError::RecognizerUnavailable(
                    "OCR bridge did not report ready".into(),
                ))
            }
        }

        info!(
            script = %self.script_path.display(),
            langs = %self.langs.join(","),
            gpu = self.gpu,
            "OCR bridge started"
        );
        Ok(session)
    }
}

impl Default for EasyOcrBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRegionRecognizer for EasyOcrBridge {
    fn recognize(&self, image: &GrayImage) -> Result<Vec<RecognizedRegion>, TabscanError> {
        let tmpfile = tempfile::Builder::new()
            .prefix("tabscan-")
            .suffix(".png")
            .tempfile()?;
        image.save_with_format(tmpfile.path(), ImageFormat::Png)?;

        let mut guard = self
            .session
            .lock()
            .map_err(|_| TabscanError::Recognition("OCR bridge lock poisoned".into()))?;
        if guard.is_none() {
            *guard = Some(self.spawn()?);
        }
        let Some(session) = guard.as_mut() else {
            return Err(TabscanError::Recognition("OCR bridge not running".into()));
        };

        let request = serde_json::json!({
            "image": tmpfile.path().to_string_lossy(),
            "detail": 1,
        });
        let result = session
            .send(&request)
            .and_then(|()| session.read_line())
            .and_then(|line| parse_response(&line));

        match result {
            Ok(BridgeResponse::Regions { regions }) => {
                debug!(regions = regions.len(), "page recognized");
                Ok(regions)
            }
            Ok(BridgeResponse::Error { error }) => Err(TabscanError::Recognition(error)),
            Ok(BridgeResponse::Ready { .. }) => Err(TabscanError::Recognition(
                "unexpected ready message from OCR bridge".into(),
            )),
            Err(e) => {
                // The pipe is out of sync or closed; start fresh on the next call.
                *guard = None;
                Err(e)
            }
        }
    }

    fn backend_name(&self) -> &str {
        "easyocr"
    }
}

struct BridgeSession {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
}

impl BridgeSession {
    fn send(&mut self, request: &serde_json::Value) -> Result<(), TabscanError> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| TabscanError::Recognition("OCR bridge stdin closed".into()))?;
        let line = serde_json::to_string(request)?;
        writeln!(stdin, "{line}")
            .and_then(|()| stdin.flush())
            .map_err(|e| TabscanError::Recognition(format!("failed to write to OCR bridge: {e}")))
    }

    fn read_line(&mut self) -> Result<String, TabscanError> {
        let mut line = String::new();
        let n = self
            .stdout
            .read_line(&mut line)
            .map_err(|e| TabscanError::Recognition(format!("failed to read from OCR bridge: {e}")))?;
        if n == 0 {
            return Err(TabscanError::Recognition(
                "OCR bridge exited unexpectedly".into(),
            ));
        }
        Ok(line)
    }
}

impl Drop for BridgeSession {
    fn drop(&mut self) {
        // Closing stdin lets the helper leave its read loop.
        drop(self.stdin.take());
        let _ = self.child.wait();
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BridgeResponse {
    Regions { regions: Vec<RecognizedRegion> },
    Error { error: String },
    Ready { ready: bool },
}

fn parse_response(line: &str) -> Result<BridgeResponse, TabscanError> {
    serde_json::from_str(line.trim()).map_err(|e| {
        TabscanError::Recognition(format!("malformed OCR bridge response: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;

    #[test]
    fn test_parse_regions_response() {
        let line = r#"{"regions": [{"polygon": [[10, 50], [120, 50], [120, 70], [10, 70]], "text": "Sales Report", "confidence": 0.98}]}"#;
        let BridgeResponse::Regions { regions } = parse_response(line).unwrap() else {
            panic!("expected regions");
        };
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].text, "Sales Report");
        assert_eq!(regions[0].polygon[0], Point::new(10.0, 50.0));
        assert_eq!(regions[0].top_y(), Some(50.0));
    }

    #[test]
    fn test_parse_empty_regions() {
        let resp = parse_response("{\"regions\": []}\n").unwrap();
        assert!(matches!(resp, BridgeResponse::Regions { regions } if regions.is_empty()));
    }

    #[test]
    fn test_parse_error_response() {
        let resp = parse_response(r#"{"error": "cannot identify image file"}"#).unwrap();
        assert!(matches!(resp, BridgeResponse::Error { error } if error.contains("identify")));
    }

    #[test]
    fn test_parse_ready() {
        assert!(matches!(
            parse_response(r#"{"ready": true}"#).unwrap(),
            BridgeResponse::Ready { ready: true }
        ));
    }

    #[test]
    fn test_parse_garbage_is_recognition_error() {
        let err = parse_response("Downloading detection model...").unwrap_err();
        assert!(matches!(err, TabscanError::Recognition(_)));
    }

    #[test]
    fn test_missing_interpreter_is_unavailable() {
        let bridge = EasyOcrBridge::new().with_python("tabscan-no-such-python");
        let err = bridge.recognize(&GrayImage::new(4, 4)).unwrap_err();
        assert!(matches!(err, TabscanError::RecognizerUnavailable(_)));
    }
}
