//! Core types for the video view binding

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one native player view.
///
/// Every native call carries the tag of the view it targets, so that
/// asynchronous replies land on the instance that raised the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewTag(pub Uuid);

impl ViewTag {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ViewTag {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ViewTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the video is scaled into its view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMode {
    Stretch,
    Contain,
    Cover,
    #[default]
    #[serde(other)]
    None,
}

impl ResizeMode {
    /// Parse a host value; anything that is not a known mode scales as `None`
    pub fn from_value(value: &serde_json::Value) -> Self {
        match value.as_str() {
            Some("stretch") => ResizeMode::Stretch,
            Some("contain") => ResizeMode::Contain,
            Some("cover") => ResizeMode::Cover,
            _ => ResizeMode::None,
        }
    }

    /// Serde adapter for [`ResizeMode::from_value`]
    pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Native scale-mode constants exported by the platform view manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScaleConstants {
    pub scale_to_fill: i32,
    pub scale_aspect_fit: i32,
    pub scale_aspect_fill: i32,
    pub scale_none: i32,
}

impl Default for ScaleConstants {
    fn default() -> Self {
        // Values exported by the iOS and Android view managers
        Self {
            scale_none: 0,
            scale_to_fill: 1,
            scale_aspect_fit: 2,
            scale_aspect_fill: 3,
        }
    }
}

impl ScaleConstants {
    /// Resolve a resize mode to the native constant
    pub fn resolve(&self, mode: ResizeMode) -> i32 {
        match mode {
            ResizeMode::Stretch => self.scale_to_fill,
            ResizeMode::Contain => self.scale_aspect_fit,
            ResizeMode::Cover => self.scale_aspect_fill,
            ResizeMode::None => self.scale_none,
        }
    }
}

/// Resize mode of the poster overlay image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PosterResizeMode {
    #[default]
    Contain,
    Cover,
    Stretch,
    Repeat,
    Center,
}

/// Video filter applied by the native compositor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "CIColorInvert")]
    Invert,
    #[serde(rename = "CIColorMonochrome")]
    Monochrome,
    #[serde(rename = "CIColorPosterize")]
    Posterize,
    #[serde(rename = "CIFalseColor")]
    False,
    #[serde(rename = "CIMaximumComponent")]
    MaximumComponent,
    #[serde(rename = "CIMinimumComponent")]
    MinimumComponent,
    #[serde(rename = "CIPhotoEffectChrome")]
    Chrome,
    #[serde(rename = "CIPhotoEffectFade")]
    Fade,
    #[serde(rename = "CIPhotoEffectInstant")]
    Instant,
    #[serde(rename = "CIPhotoEffectMono")]
    Mono,
    #[serde(rename = "CIPhotoEffectNoir")]
    Noir,
    #[serde(rename = "CIPhotoEffectProcess")]
    Process,
    #[serde(rename = "CIPhotoEffectTonal")]
    Tonal,
    #[serde(rename = "CIPhotoEffectTransfer")]
    Transfer,
    #[serde(rename = "CISepiaTone")]
    Sepia,
}

/// Side-loaded subtitle format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextTrackType {
    #[serde(rename = "application/x-subrip")]
    Srt,
    #[serde(rename = "application/ttml+xml")]
    Ttml,
    #[serde(rename = "text/vtt")]
    Vtt,
}

/// Side-loaded text track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextTrack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub uri: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub track_type: Option<TextTrackType>,
    pub language: String,
}

/// Track selector value: an index, a language, a title...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackValue {
    Index(i64),
    Text(String),
}

/// Selection of an audio, video or text track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedTrack {
    #[serde(rename = "type")]
    pub selection_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<TrackValue>,
}

/// Buffering hints honored by the native player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_buffer_ms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_buffer_ms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_for_playback_ms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_for_playback_after_rebuffer_ms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_heap_allocation_percent: Option<f64>,
}

/// Subtitle rendering style
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IgnoreSilentSwitch {
    Ignore,
    Obey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FullscreenOrientation {
    All,
    Landscape,
    Portrait,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_mode_resolution() {
        let constants = ScaleConstants::default();
        assert_eq!(constants.resolve(ResizeMode::Stretch), constants.scale_to_fill);
        assert_eq!(constants.resolve(ResizeMode::Contain), constants.scale_aspect_fit);
        assert_eq!(constants.resolve(ResizeMode::Cover), constants.scale_aspect_fill);
        assert_eq!(constants.resolve(ResizeMode::default()), constants.scale_none);
    }

    #[test]
    fn test_unknown_resize_mode_is_none() {
        use serde_json::json;
        assert_eq!(ResizeMode::from_value(&json!("cover")), ResizeMode::Cover);
        assert_eq!(ResizeMode::from_value(&json!("center")), ResizeMode::None);
        assert_eq!(ResizeMode::from_value(&json!(null)), ResizeMode::None);
        assert_eq!(ResizeMode::from_value(&json!(3)), ResizeMode::None);
        assert_eq!(serde_json::from_str::<ResizeMode>(r#""sideways""#).unwrap(), ResizeMode::None);
    }

    #[test]
    fn test_filter_names() {
        let json = serde_json::to_string(&FilterType::Sepia).unwrap();
        assert_eq!(json, "\"CISepiaTone\"");
        let filter: FilterType = serde_json::from_str("\"\"").unwrap();
        assert_eq!(filter, FilterType::None);
    }

    #[test]
    fn test_selected_track_value() {
        let track: SelectedTrack =
            serde_json::from_str(r#"{"type": "index", "value": 2}"#).unwrap();
        assert_eq!(track.value, Some(TrackValue::Index(2)));

        let track: SelectedTrack =
            serde_json::from_str(r#"{"type": "language", "value": "en"}"#).unwrap();
        assert_eq!(track.value, Some(TrackValue::Text("en".to_string())));
    }

    #[test]
    fn test_view_tags_are_unique() {
        assert_ne!(ViewTag::new(), ViewTag::new());
    }
}
