use std::sync::Mutex;

use patent_extract::{ExtractError, ExtractionEvent, ExtractionReporter, ExtractionWarning};

/// Reporter that records everything it receives for later assertions
#[derive(Default)]
pub struct RecordingReporter {
    warnings: Mutex<Vec<ExtractionWarning>>,
    events: Mutex<Vec<ExtractionEvent>>,
    fatals: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<ExtractionWarning> {
        self.warnings.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<ExtractionEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn fatals(&self) -> Vec<String> {
        self.fatals.lock().unwrap().clone()
    }

    pub fn has_warning(&self, predicate: impl Fn(&ExtractionWarning) -> bool) -> bool {
        self.warnings.lock().unwrap().iter().any(predicate)
    }

    pub fn completed(&self) -> Option<(usize, usize)> {
        self.events.lock().unwrap().iter().find_map(|event| match event {
            ExtractionEvent::Completed { returned, skipped } => Some((*returned, *skipped)),
            _ => None,
        })
    }
}

impl ExtractionReporter for RecordingReporter {
    fn warning(&self, warning: &ExtractionWarning) {
        self.warnings.lock().unwrap().push(warning.clone());
    }

    fn event(&self, event: &ExtractionEvent) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn fatal(&self, error: &ExtractError) {
        self.fatals.lock().unwrap().push(error.to_string());
    }
}
