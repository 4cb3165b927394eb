//! Native player capability
//!
//! Everything that actually plays media lives behind [`NativeSurface`]. The
//! component pushes configuration and commands through it and receives
//! events back as [`NativeEvent`](crate::events::NativeEvent)s.

use crate::config::NativeConfig;
use crate::error::Result;
use crate::types::{ScaleConstants, ViewTag};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Imperative updates pushed to a mounted view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum NativeCommand {
    Seek {
        time: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        tolerance: Option<u32>,
    },
    Fullscreen {
        enabled: bool,
    },
    #[serde(rename = "restoreUserInterfaceForPIPStopCompletionHandler")]
    RestoreUserInterfaceForPipStop {
        restored: bool,
    },
    /// Raw property patch
    SetProps {
        props: Value,
    },
}

/// Result of a native save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedMedia {
    pub uri: String,
}

/// Platform-native playback surface
#[async_trait]
pub trait NativeSurface: Send + Sync {
    /// Scale constants exported by the view manager
    fn view_constants(&self) -> ScaleConstants {
        ScaleConstants::default()
    }

    /// Push the full configuration to a view
    fn apply_config(&self, view: ViewTag, config: &NativeConfig);

    /// Send an imperative command to a view
    fn send_command(&self, view: ViewTag, command: NativeCommand);

    /// Persist a copy of the current item
    async fn save(&self, view: ViewTag, options: Value) -> Result<SavedMedia>;

    /// Complete a pending license request
    fn set_license_result(&self, view: ViewTag, license: String);

    /// Fail a pending license request.
    ///
    /// Not every native module can receive license errors; the default
    /// drops the report.
    fn set_license_error(&self, view: ViewTag, message: String) {
        warn!(%view, %message, "Native surface cannot receive license errors");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_shapes() {
        let seek = serde_json::to_value(NativeCommand::Seek { time: 5.0, tolerance: Some(100) }).unwrap();
        assert_eq!(seek["command"], "seek");
        assert_eq!(seek["tolerance"], 100);

        let bare = serde_json::to_value(NativeCommand::Seek { time: 5.0, tolerance: None }).unwrap();
        assert!(bare.get("tolerance").is_none());

        let restore =
            serde_json::to_value(NativeCommand::RestoreUserInterfaceForPipStop { restored: true })
                .unwrap();
        assert_eq!(restore["command"], "restoreUserInterfaceForPIPStopCompletionHandler");
    }
}
