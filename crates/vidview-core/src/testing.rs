//! In-memory native surface for tests and headless hosts
//!
//! [`RecordingSurface`] keeps every call it receives and can forward each
//! one over a channel, so async tests can wait for license submissions
//! without polling.

use crate::config::NativeConfig;
use crate::error::Result;
use crate::native::{NativeCommand, NativeSurface, SavedMedia};
use crate::types::{ScaleConstants, ViewTag};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// One call received by a [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Config(ViewTag, NativeConfig),
    Command(ViewTag, NativeCommand),
    Save(ViewTag, Value),
    LicenseResult(ViewTag, String),
    LicenseError(ViewTag, String),
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    constants: ScaleConstants,
    calls: Mutex<Vec<Recorded>>,
    tx: Option<mpsc::UnboundedSender<Recorded>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface that also streams every call to the returned receiver
    pub fn with_channel() -> (Self, mpsc::UnboundedReceiver<Recorded>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let surface = Self {
            tx: Some(tx),
            ..Self::default()
        };
        (surface, rx)
    }

    /// Override the exported scale constants
    pub fn with_constants(mut self, constants: ScaleConstants) -> Self {
        self.constants = constants;
        self
    }

    /// Drain the recorded calls
    pub fn take(&self) -> Vec<Recorded> {
        match self.calls.lock() {
            Ok(mut calls) => std::mem::take(&mut *calls),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// Drain the recorded calls, keeping only commands
    pub fn commands(&self) -> Vec<NativeCommand> {
        self.take()
            .into_iter()
            .filter_map(|call| match call {
                Recorded::Command(_, command) => Some(command),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Recorded) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(call.clone());
        }
        match self.calls.lock() {
            Ok(mut calls) => calls.push(call),
            Err(poisoned) => poisoned.into_inner().push(call),
        }
    }
}

#[async_trait]
impl NativeSurface for RecordingSurface {
    fn view_constants(&self) -> ScaleConstants {
        self.constants
    }

    fn apply_config(&self, view: ViewTag, config: &NativeConfig) {
        self.record(Recorded::Config(view, config.clone()));
    }

    fn send_command(&self, view: ViewTag, command: NativeCommand) {
        self.record(Recorded::Command(view, command));
    }

    async fn save(&self, view: ViewTag, options: Value) -> Result<SavedMedia> {
        self.record(Recorded::Save(view, options));
        Ok(SavedMedia {
            uri: format!("file:///tmp/vidview/{view}.mp4"),
        })
    }

    fn set_license_result(&self, view: ViewTag, license: String) {
        self.record(Recorded::LicenseResult(view, license));
    }

    fn set_license_error(&self, view: ViewTag, message: String) {
        self.record(Recorded::LicenseError(view, message));
    }
}
