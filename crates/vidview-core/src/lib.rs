//! vidview Core - native video view binding
//!
//! This crate drives an external, platform-native media player:
//! - Source classification (network / asset / invalid)
//! - Native configuration assembly (scale constants, string-only headers)
//! - Event fan-out from native callbacks to host handlers
//! - Poster overlay visibility
//! - DRM license exchange with a host-supplied provider
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         vidview Core                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐          │
//! │  │    Source    │  │    Config    │  │   Platform   │          │
//! │  │  Classifier  │  │  Assembler   │  │   Profile    │          │
//! │  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘          │
//! │         │                 │                 │                   │
//! │         └─────────────────┼─────────────────┘                   │
//! │                           │                                     │
//! │                    ┌──────┴──────┐                              │
//! │                    │    Video    │                              │
//! │                    │  Component  │                              │
//! │                    └──────┬──────┘                              │
//! │                           │                                     │
//! │  ┌──────────────┐  ┌──────┴──────┐  ┌──────────────┐           │
//! │  │    Poster    │  │    Event    │  │   License    │           │
//! │  │    State     │  │  Callbacks  │  │   Exchange   │           │
//! │  └──────────────┘  └─────────────┘  └──────────────┘           │
//! │                           │                                     │
//! │                  ┌────────┴────────┐                            │
//! │                  │  NativeSurface  │  (injected)                │
//! │                  └─────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod types;
pub mod headers;
pub mod source;
pub mod config;
pub mod events;
pub mod platform;
pub mod poster;
pub mod drm;
pub mod native;
pub mod video;
pub mod testing;

pub use error::{Error, Result};
pub use types::*;
pub use headers::HeaderValue;
pub use source::{AssetRef, AssetResolver, PlaybackSource, SourceDescriptor, SourceKind, UriSource};
pub use config::{NativeConfig, PlaybackOptions, VideoProps};
pub use events::{Callbacks, EventKind, NativeEvent, PlaybackError};
pub use platform::{Platform, PlatformProfile};
pub use poster::{PosterOverlay, PosterState};
pub use drm::{license_fn, DrmConfig, DrmType, LicenseOutcome, LicenseProvider, LicenseRequest};
pub use native::{NativeCommand, NativeSurface, SavedMedia};
pub use video::{Dispatched, Rendered, Video};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() {
    tracing::info!(version = VERSION, "vidview core initialized");
}
