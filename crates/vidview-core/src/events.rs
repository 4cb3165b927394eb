//! Native event vocabulary and host callbacks
//!
//! The native player emits events under its own names (`onVideoLoad`,
//! `onVideoProgress`, ...). Each maps to one [`EventKind`] and from there
//! to an optional host handler. Handlers receive the event body with the
//! native envelope removed.

use crate::types::ViewTag;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Every event the component can deliver to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    LoadStart,
    PlaybackStateChanged,
    Load,
    AudioTracks,
    TextTracks,
    VideoTracks,
    Error,
    Progress,
    BandwidthUpdate,
    Seek,
    End,
    TimedMetadata,
    FullscreenPlayerWillPresent,
    FullscreenPlayerDidPresent,
    FullscreenPlayerWillDismiss,
    FullscreenPlayerDidDismiss,
    ReadyForDisplay,
    PlaybackStalled,
    PlaybackResume,
    PlaybackRateChange,
    ExternalPlaybackChange,
    AudioBecomingNoisy,
    PictureInPictureStatusChanged,
    RestoreUserInterfaceForPictureInPictureStop,
    AudioFocusChanged,
    Buffer,
    ReceiveAdEvent,
    /// License request; handled by the DRM handshake, not a host handler
    GetLicense,
}

impl EventKind {
    /// All host-facing events, in declaration order
    pub const ALL: &'static [EventKind] = &[
        EventKind::LoadStart,
        EventKind::PlaybackStateChanged,
        EventKind::Load,
        EventKind::AudioTracks,
        EventKind::TextTracks,
        EventKind::VideoTracks,
        EventKind::Error,
        EventKind::Progress,
        EventKind::BandwidthUpdate,
        EventKind::Seek,
        EventKind::End,
        EventKind::TimedMetadata,
        EventKind::FullscreenPlayerWillPresent,
        EventKind::FullscreenPlayerDidPresent,
        EventKind::FullscreenPlayerWillDismiss,
        EventKind::FullscreenPlayerDidDismiss,
        EventKind::ReadyForDisplay,
        EventKind::PlaybackStalled,
        EventKind::PlaybackResume,
        EventKind::PlaybackRateChange,
        EventKind::ExternalPlaybackChange,
        EventKind::AudioBecomingNoisy,
        EventKind::PictureInPictureStatusChanged,
        EventKind::RestoreUserInterfaceForPictureInPictureStop,
        EventKind::AudioFocusChanged,
        EventKind::Buffer,
        EventKind::ReceiveAdEvent,
    ];

    /// Native event names this kind is emitted under
    pub fn native_names(&self) -> &'static [&'static str] {
        match self {
            EventKind::LoadStart => &["onVideoLoadStart"],
            EventKind::PlaybackStateChanged => &["onVideoPlaybackStateChanged"],
            EventKind::Load => &["onVideoLoad"],
            EventKind::AudioTracks => &["onAudioTracks"],
            EventKind::TextTracks => &["onTextTracks"],
            EventKind::VideoTracks => &["onVideoTracks"],
            EventKind::Error => &["onVideoError"],
            EventKind::Progress => &["onVideoProgress"],
            EventKind::BandwidthUpdate => &["onVideoBandwidthUpdate"],
            EventKind::Seek => &["onVideoSeek"],
            EventKind::End => &["onVideoEnd"],
            EventKind::TimedMetadata => &["onTimedMetadata"],
            EventKind::FullscreenPlayerWillPresent => &["onVideoFullscreenPlayerWillPresent"],
            EventKind::FullscreenPlayerDidPresent => &["onVideoFullscreenPlayerDidPresent"],
            EventKind::FullscreenPlayerWillDismiss => &["onVideoFullscreenPlayerWillDismiss"],
            EventKind::FullscreenPlayerDidDismiss => &["onVideoFullscreenPlayerDidDismiss"],
            EventKind::ReadyForDisplay => &["onReadyForDisplay"],
            EventKind::PlaybackStalled => &["onPlaybackStalled"],
            EventKind::PlaybackResume => &["onPlaybackResume"],
            EventKind::PlaybackRateChange => &["onPlaybackRateChange"],
            EventKind::ExternalPlaybackChange => &["onVideoExternalPlaybackChange"],
            EventKind::AudioBecomingNoisy => &["onVideoAudioBecomingNoisy", "onAudioBecomingNoisy"],
            EventKind::PictureInPictureStatusChanged => &["onPictureInPictureStatusChanged"],
            EventKind::RestoreUserInterfaceForPictureInPictureStop => {
                &["onRestoreUserInterfaceForPictureInPictureStop"]
            }
            EventKind::AudioFocusChanged => &["onAudioFocusChanged"],
            EventKind::Buffer => &["onVideoBuffer"],
            EventKind::ReceiveAdEvent => &["onReceiveAdEvent"],
            EventKind::GetLicense => &["onGetLicense"],
        }
    }

    /// Look up the kind for a native event name
    pub fn from_native_name(name: &str) -> Option<EventKind> {
        if name == "onGetLicense" {
            return Some(EventKind::GetLicense);
        }
        EventKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.native_names().contains(&name))
    }

    /// Name of the host handler (`onLoad`, `onProgress`, ...)
    pub fn handler_name(&self) -> String {
        let name = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => format!("on{}{}", first.to_uppercase(), chars.as_str()),
            None => String::new(),
        }
    }

    /// Events whose body is dropped before reaching the host
    pub fn forwards_payload(&self) -> bool {
        !matches!(
            self,
            EventKind::AudioBecomingNoisy | EventKind::RestoreUserInterfaceForPictureInPictureStop
        )
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.handler_name())
    }
}

/// Event as emitted by the native surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeEvent {
    pub target: ViewTag,
    pub name: String,
    #[serde(default)]
    pub body: Value,
}

impl NativeEvent {
    pub fn new(target: ViewTag, name: impl Into<String>, body: Value) -> Self {
        Self {
            target,
            name: name.into(),
            body,
        }
    }
}

/// Body of an `error` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackError {
    pub error_string: String,
    pub error_code: String,
}

impl PlaybackError {
    pub fn new(error_string: impl Into<String>, error_code: impl Into<String>) -> Self {
        Self {
            error_string: error_string.into(),
            error_code: error_code.into(),
        }
    }

    /// Wrap into the `{ "error": { ... } }` event body
    pub fn to_event_body(&self) -> Value {
        serde_json::json!({ "error": self })
    }
}

/// Host event handler
pub type Handler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Host-registered handlers, one optional entry per event
#[derive(Clone, Default)]
pub struct Callbacks {
    handlers: HashMap<EventKind, Handler>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any previous one for the same event
    pub fn on<F>(mut self, kind: EventKind, handler: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.handlers.insert(kind, Arc::new(handler));
        self
    }

    pub fn on_load<F: Fn(&Value) + Send + Sync + 'static>(self, handler: F) -> Self {
        self.on(EventKind::Load, handler)
    }

    pub fn on_error<F: Fn(&Value) + Send + Sync + 'static>(self, handler: F) -> Self {
        self.on(EventKind::Error, handler)
    }

    pub fn on_progress<F: Fn(&Value) + Send + Sync + 'static>(self, handler: F) -> Self {
        self.on(EventKind::Progress, handler)
    }

    pub fn on_ready_for_display<F: Fn(&Value) + Send + Sync + 'static>(self, handler: F) -> Self {
        self.on(EventKind::ReadyForDisplay, handler)
    }

    pub fn get(&self, kind: EventKind) -> Option<&Handler> {
        self.handlers.get(&kind)
    }

    pub fn contains(&self, kind: EventKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Invoke the handler for `kind` if one is registered
    pub fn emit(&self, kind: EventKind, body: &Value) -> bool {
        match self.handlers.get(&kind) {
            Some(handler) => {
                handler(body);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.handlers.keys().map(|k| k.handler_name()).collect();
        kinds.sort();
        f.debug_struct("Callbacks").field("handlers", &kinds).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_native_name_lookup() {
        assert_eq!(EventKind::from_native_name("onVideoLoad"), Some(EventKind::Load));
        assert_eq!(EventKind::from_native_name("onVideoError"), Some(EventKind::Error));
        assert_eq!(
            EventKind::from_native_name("onAudioBecomingNoisy"),
            Some(EventKind::AudioBecomingNoisy)
        );
        assert_eq!(
            EventKind::from_native_name("onVideoAudioBecomingNoisy"),
            Some(EventKind::AudioBecomingNoisy)
        );
        assert_eq!(EventKind::from_native_name("onGetLicense"), Some(EventKind::GetLicense));
        assert_eq!(EventKind::from_native_name("onSomethingElse"), None);
    }

    #[test]
    fn test_every_native_name_maps_back() {
        for kind in EventKind::ALL {
            for name in kind.native_names() {
                assert_eq!(EventKind::from_native_name(name), Some(*kind), "{name}");
            }
        }
    }

    #[test]
    fn test_handler_names() {
        assert_eq!(EventKind::LoadStart.handler_name(), "onLoadStart");
        assert_eq!(EventKind::ReceiveAdEvent.handler_name(), "onReceiveAdEvent");
        assert_eq!(
            EventKind::RestoreUserInterfaceForPictureInPictureStop.to_string(),
            "onRestoreUserInterfaceForPictureInPictureStop"
        );
    }

    #[test]
    fn test_emit_without_handler() {
        let callbacks = Callbacks::new();
        assert!(!callbacks.emit(EventKind::Progress, &Value::Null));
    }

    #[test]
    fn test_emit_with_handler() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let callbacks = Callbacks::new().on_progress(move |body| {
            assert_eq!(body["currentTime"], 1.5);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(callbacks.emit(EventKind::Progress, &serde_json::json!({"currentTime": 1.5})));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(callbacks.len(), 1);
    }

    #[test]
    fn test_error_body_shape() {
        let body = PlaybackError::new("invalid url, player will stop", "INVALID_URL").to_event_body();
        assert_eq!(body["error"]["errorCode"], "INVALID_URL");
        assert_eq!(body["error"]["errorString"], "invalid url, player will stop");
    }
}
