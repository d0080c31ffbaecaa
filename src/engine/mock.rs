use super::{Analyzer, EngineError};
use std::sync::Mutex;

/// What the mock answers to every call
#[derive(Debug, Clone)]
pub enum MockReply {
    Result(String),
    Validation(String),
    Crash,
}

/// Scripted engine that records its inputs
#[derive(Debug)]
pub struct MockAnalyzer {
    reply: MockReply,
    calls: Mutex<Vec<(Vec<u8>, String)>>,
}

impl MockAnalyzer {
    pub const fn new(reply: MockReply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(Vec<u8>, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Analyzer for MockAnalyzer {
    fn analyze(&self, text: &[u8], language: &str) -> Result<String, EngineError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_vec(), language.to_string()));

        match &self.reply {
            MockReply::Result(text) => Ok(text.clone()),
            MockReply::Validation(message) => Err(EngineError::Validation(message.clone())),
            MockReply::Crash => Err(EngineError::Failed {
                status: "exit status: 139".to_string(),
                stderr: "Segmentation fault".to_string(),
            }),
        }
    }
}
