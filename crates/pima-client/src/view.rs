//! Display surface written by the form handler.
//!
//! Regions mirror the prediction page: `api-url`, `result-text`, `prediction`,
//! `confidence`, the `result` container (hidden until revealed) and `metrics`.
//! `notify` is the blocking user notification shown on failure.

use std::io::Write;
use std::sync::Mutex;

pub trait View: Send + Sync {
    fn show_api_url(&self, url: &str);
    fn set_result_text(&self, text: &str);
    fn set_prediction(&self, text: &str);
    fn set_confidence(&self, text: &str);
    fn reveal_result(&self);
    fn set_metrics(&self, text: &str);
    fn notify(&self, message: &str);
}

// ── In-memory ────────────────────────────────────────────────────────────────

/// Current contents of every region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub api_url: String,
    pub result_text: String,
    pub prediction: String,
    pub confidence: String,
    pub result_visible: bool,
    pub metrics: String,
    pub notifications: Vec<String>,
}

/// View that only records region contents; used by embedders and tests.
#[derive(Debug, Default)]
pub struct MemoryView {
    state: Mutex<ViewState>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ViewState {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl View for MemoryView {
    fn show_api_url(&self, url: &str)     { self.lock().api_url = url.to_string(); }
    fn set_result_text(&self, text: &str) { self.lock().result_text = text.to_string(); }
    fn set_prediction(&self, text: &str)  { self.lock().prediction = text.to_string(); }
    fn set_confidence(&self, text: &str)  { self.lock().confidence = text.to_string(); }
    fn reveal_result(&self)               { self.lock().result_visible = true; }
    fn set_metrics(&self, text: &str)     { self.lock().metrics = text.to_string(); }
    fn notify(&self, message: &str)       { self.lock().notifications.push(message.to_string()); }
}

// ── Terminal ─────────────────────────────────────────────────────────────────

/// Renders to a terminal: the result block is printed when revealed, metrics
/// when set, notifications go to the error stream.
pub struct TerminalView {
    out: Mutex<Box<dyn Write + Send>>,
    err: Mutex<Box<dyn Write + Send>>,
    pending: Mutex<ViewState>,
}

impl TerminalView {
    pub fn stdio() -> Self {
        Self::with_writers(Box::new(std::io::stdout()), Box::new(std::io::stderr()))
    }

    pub fn with_writers(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
            err: Mutex::new(err),
            pending: Mutex::new(ViewState::default()),
        }
    }

    fn write_out(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(|p| p.into_inner());
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }

    fn with_pending(&self, f: impl FnOnce(&mut ViewState)) {
        let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
        f(&mut pending);
    }
}

impl View for TerminalView {
    fn show_api_url(&self, url: &str) {
        self.write_out(&format!("API: {url}"));
    }

    fn set_result_text(&self, text: &str) { self.with_pending(|s| s.result_text = text.to_string()); }
    fn set_prediction(&self, text: &str)  { self.with_pending(|s| s.prediction = text.to_string()); }
    fn set_confidence(&self, text: &str)  { self.with_pending(|s| s.confidence = text.to_string()); }

    fn reveal_result(&self) {
        let block = {
            let pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
            format!(
                "Result:     {}\nPrediction: {}\nConfidence: {}",
                pending.result_text, pending.prediction, pending.confidence
            )
        };
        self.write_out(&block);
    }

    fn set_metrics(&self, text: &str) {
        self.write_out(&format!("Metrics:\n{text}"));
    }

    fn notify(&self, message: &str) {
        let mut err = self.err.lock().unwrap_or_else(|p| p.into_inner());
        let _ = writeln!(err, "{message}");
        let _ = err.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Cloneable in-memory writer.
    #[derive(Clone, Default)]
    struct Sink(Arc<Mutex<Vec<u8>>>);

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
    }

    impl Sink {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_memory_view_records_regions() {
        let view = MemoryView::new();
        view.set_result_text("Diabetic");
        view.reveal_result();
        view.notify("Prediction failed: boom");
        let state = view.snapshot();
        assert_eq!(state.result_text, "Diabetic");
        assert!(state.result_visible);
        assert_eq!(state.notifications, vec!["Prediction failed: boom".to_string()]);
    }

    #[test]
    fn test_terminal_view_prints_result_only_when_revealed() {
        let out = Sink::default();
        let err = Sink::default();
        let view = TerminalView::with_writers(Box::new(out.clone()), Box::new(err.clone()));

        view.set_result_text("Not Diabetic");
        view.set_prediction("0");
        view.set_confidence("71.20%");
        assert_eq!(out.text(), "");

        view.reveal_result();
        assert!(out.text().contains("Result:     Not Diabetic"));
        assert!(out.text().contains("Confidence: 71.20%"));

        view.notify("Metrics unavailable: timeout");
        assert_eq!(err.text(), "Metrics unavailable: timeout\n");
    }
}
