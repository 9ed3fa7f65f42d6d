//! Scripted provider for tests: replays canned replies in order and records
//! every prompt it receives.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::LlmProvider;
use crate::types::{ErrorCategory, FinflowError, LlmError, Result};

pub(crate) struct ScriptedProvider {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
    healthy: bool,
}

impl ScriptedProvider {
    /// `Ok` entries are returned as responses, `Err` entries as network failures.
    pub(crate) fn new(replies: Vec<std::result::Result<&str, &str>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            prompts: Mutex::new(Vec::new()),
            healthy: true,
        })
    }

    /// Fails its health check and has nothing to say.
    pub(crate) fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            healthy: false,
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub(crate) fn prompt(&self, index: usize) -> String {
        self.prompts.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => {
                Err(LlmError::with_provider(ErrorCategory::Network, message, "scripted").into())
            }
            None => Err(FinflowError::LlmApi("script exhausted".to_string())),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "test-model"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.healthy)
    }
}
