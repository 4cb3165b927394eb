//! Per-platform behavior table
//!
//! Native players differ in which events they emit and which command
//! shapes they accept. The differences are resolved once into a
//! [`PlatformProfile`] when the component is built.

use crate::error::{Error, Result};
use crate::events::EventKind;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Target platform of the native player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    Windows,
    Web,
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ios" | "tvos" => Ok(Platform::Ios),
            "android" => Ok(Platform::Android),
            "windows" => Ok(Platform::Windows),
            "web" => Ok(Platform::Web),
            other => Err(Error::InvalidConfig(format!("unknown platform: {other}"))),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Ios => write!(f, "ios"),
            Platform::Android => write!(f, "android"),
            Platform::Windows => write!(f, "windows"),
            Platform::Web => write!(f, "web"),
        }
    }
}

/// Native name under which the audio-becoming-noisy event is delivered
pub const NOISY_EVENT: &str = "onVideoAudioBecomingNoisy";

/// Legacy alias of [`NOISY_EVENT`]
pub const NOISY_EVENT_LEGACY: &str = "onAudioBecomingNoisy";

/// Capabilities of one platform's native player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformProfile {
    pub platform: Platform,
    /// Event that marks the first frame as ready to show
    pub poster_hide_event: EventKind,
    /// Seek command carries a tolerance
    pub seek_tolerance: bool,
    /// Native name the noisy event arrives under; the other alias is dropped
    pub noisy_event: &'static str,
}

impl PlatformProfile {
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Ios => Self {
                platform,
                poster_hide_event: EventKind::ReadyForDisplay,
                seek_tolerance: true,
                noisy_event: NOISY_EVENT,
            },
            Platform::Android => Self {
                platform,
                poster_hide_event: EventKind::ReadyForDisplay,
                seek_tolerance: false,
                noisy_event: NOISY_EVENT,
            },
            // No ready-for-display on Windows
            Platform::Windows => Self {
                platform,
                poster_hide_event: EventKind::Load,
                seek_tolerance: false,
                noisy_event: NOISY_EVENT,
            },
            Platform::Web => Self {
                platform,
                poster_hide_event: EventKind::ReadyForDisplay,
                seek_tolerance: false,
                noisy_event: NOISY_EVENT,
            },
        }
    }

    /// Whether a native event name should be delivered on this platform
    pub fn accepts(&self, native_name: &str) -> bool {
        match native_name {
            NOISY_EVENT | NOISY_EVENT_LEGACY => native_name == self.noisy_event,
            _ => true,
        }
    }
}

impl From<Platform> for PlatformProfile {
    fn from(platform: Platform) -> Self {
        Self::for_platform(platform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_platform() {
        assert_eq!("iOS".parse::<Platform>().unwrap(), Platform::Ios);
        assert_eq!("android".parse::<Platform>().unwrap(), Platform::Android);
        let err = "symbian".parse::<Platform>().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_windows_hides_poster_on_load() {
        let profile = PlatformProfile::for_platform(Platform::Windows);
        assert_eq!(profile.poster_hide_event, EventKind::Load);
        assert_eq!(
            PlatformProfile::for_platform(Platform::Ios).poster_hide_event,
            EventKind::ReadyForDisplay
        );
    }

    #[test]
    fn test_single_noisy_alias() {
        for platform in [Platform::Ios, Platform::Android, Platform::Windows, Platform::Web] {
            let profile = PlatformProfile::from(platform);
            let accepted = [NOISY_EVENT, NOISY_EVENT_LEGACY]
                .iter()
                .filter(|name| profile.accepts(name))
                .count();
            assert_eq!(accepted, 1, "{platform}");
            assert!(profile.accepts(NOISY_EVENT), "{platform}");
            assert!(profile.accepts("onVideoProgress"));
        }
    }
}
