//! Source classification
//!
//! Turns the host's source descriptor into the `src` block the native
//! player consumes. A source is one of:
//! - a network stream (`http:` / `https:`)
//! - a platform asset (photo library, content provider, app package, file)
//! - nothing usable, which is reported through the `error` event

use crate::headers::{strings_only, HeaderValue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// URI schemes handled by the platform asset loaders
pub const ASSET_SCHEMES: &[&str] = &[
    "assets-library",
    "ph",
    "ipod-library",
    "file",
    "content",
    "ms-appx",
    "ms-appdata",
];

/// URI schemes fetched over the network
pub const NETWORK_SCHEMES: &[&str] = &["http", "https"];

/// Error code reported for unusable sources
pub const INVALID_URL_CODE: &str = "INVALID_URL";

/// Error message reported for unusable sources
pub const INVALID_URL_MESSAGE: &str = "invalid url, player will stop";

/// Opaque reference to a media file bundled with the host application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(pub u32);

/// Source descriptor as written by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceDescriptor {
    Asset(AssetRef),
    Uri(String),
    Object(UriSource),
}

impl Default for SourceDescriptor {
    fn default() -> Self {
        SourceDescriptor::Object(UriSource::default())
    }
}

impl From<&str> for SourceDescriptor {
    fn from(uri: &str) -> Self {
        SourceDescriptor::Uri(uri.to_string())
    }
}

impl From<AssetRef> for SourceDescriptor {
    fn from(asset: AssetRef) -> Self {
        SourceDescriptor::Asset(asset)
    }
}

impl From<UriSource> for SourceDescriptor {
    fn from(source: UriSource) -> Self {
        SourceDescriptor::Object(source)
    }
}

/// Object form of a source descriptor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UriSource {
    #[serde(default)]
    pub uri: Option<String>,
    /// Container hint (`m3u8`, `mpd`, ...)
    #[serde(rename = "type", default)]
    pub media_type: Option<String>,
    /// Expansion file versions (Android)
    #[serde(default)]
    pub main_ver: Option<i32>,
    #[serde(default)]
    pub patch_ver: Option<i32>,
    #[serde(default)]
    pub headers: HashMap<String, HeaderValue>,
    /// Start offset in milliseconds
    #[serde(default)]
    pub start_time: Option<i64>,
    /// End offset in milliseconds
    #[serde(default)]
    pub end_time: Option<i64>,
}

impl UriSource {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            ..Default::default()
        }
    }

    /// Add a request header
    pub fn with_header(mut self, name: &str, value: impl Into<HeaderValue>) -> Self {
        self.headers.insert(name.to_string(), value.into());
        self
    }
}

/// A bundled asset after platform resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAsset {
    pub uri: String,
    pub media_type: Option<String>,
    /// Served by the development packager rather than the app bundle
    pub packager_asset: bool,
}

/// Platform asset resolution mechanism
pub trait AssetResolver: Send + Sync {
    fn resolve(&self, asset: AssetRef) -> Option<ResolvedAsset>;
}

/// Resolver for hosts without bundled assets
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAssets;

impl AssetResolver for NoAssets {
    fn resolve(&self, _asset: AssetRef) -> Option<ResolvedAsset> {
        None
    }
}

/// Classification of a resolved URI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Network,
    Asset,
    /// No URI yet; the host may assign one later
    Empty,
    /// Present but unusable
    Invalid,
}

impl SourceKind {
    /// Classify a URI by its scheme, case-insensitively
    pub fn of(uri: &str) -> Self {
        if uri.is_empty() {
            return SourceKind::Empty;
        }

        let scheme = match uri.split_once(':') {
            Some((scheme, _)) => scheme.to_ascii_lowercase(),
            None => return SourceKind::Invalid,
        };

        if NETWORK_SCHEMES.contains(&scheme.as_str()) {
            SourceKind::Network
        } else if ASSET_SCHEMES.contains(&scheme.as_str()) {
            SourceKind::Asset
        } else {
            SourceKind::Invalid
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Network => write!(f, "network"),
            SourceKind::Asset => write!(f, "asset"),
            SourceKind::Empty => write!(f, "empty"),
            SourceKind::Invalid => write!(f, "invalid url"),
        }
    }
}

/// The `src` block handed to the native player
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSource {
    pub uri: String,
    pub is_network: bool,
    pub is_asset: bool,
    pub should_cache: bool,
    #[serde(rename = "type")]
    pub media_type: String,
    pub main_ver: i32,
    pub patch_ver: i32,
    pub request_headers: BTreeMap<String, String>,
    pub start_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(skip)]
    pub kind: SourceKind,
}

impl PlaybackSource {
    /// Resolve and classify a source descriptor
    pub fn classify(descriptor: &SourceDescriptor, assets: &dyn AssetResolver) -> Self {
        let (uri, should_cache, object) = match descriptor {
            SourceDescriptor::Uri(uri) => (uri.clone(), true, None),
            SourceDescriptor::Object(source) => {
                (source.uri.clone().unwrap_or_default(), true, Some(source))
            }
            SourceDescriptor::Asset(asset) => match assets.resolve(*asset) {
                Some(resolved) => {
                    debug!(asset = asset.0, uri = %resolved.uri, "Resolved bundled asset");
                    let source = Self::build(
                        resolved.uri,
                        !resolved.packager_asset,
                        None,
                    );
                    return Self {
                        media_type: resolved.media_type.unwrap_or_default(),
                        ..source
                    };
                }
                None => {
                    warn!(asset = asset.0, "Bundled asset could not be resolved");
                    (String::new(), true, None)
                }
            },
        };

        Self::build(uri, should_cache, object)
    }

    fn build(uri: String, should_cache: bool, object: Option<&UriSource>) -> Self {
        let uri = if uri.starts_with('/') {
            format!("file://{uri}")
        } else {
            uri
        };

        let kind = SourceKind::of(&uri);
        if kind == SourceKind::Empty {
            warn!("Trying to load empty source");
        }

        Self {
            is_network: kind == SourceKind::Network,
            is_asset: kind == SourceKind::Asset,
            should_cache,
            media_type: object
                .and_then(|o| o.media_type.clone())
                .unwrap_or_default(),
            main_ver: object.and_then(|o| o.main_ver).unwrap_or(0),
            patch_ver: object.and_then(|o| o.patch_ver).unwrap_or(0),
            request_headers: object
                .map(|o| strings_only(&o.headers))
                .unwrap_or_default(),
            start_time: object.and_then(|o| o.start_time).unwrap_or(0),
            end_time: object.and_then(|o| o.end_time),
            uri,
            kind,
        }
    }

    /// True when the source is present but cannot be played
    pub fn is_invalid(&self) -> bool {
        self.kind == SourceKind::Invalid
    }
}
