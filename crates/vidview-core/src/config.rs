//! Host configuration and native configuration assembly
//!
//! [`VideoProps`] is what the host writes. [`NativeConfig`] is what the
//! native player receives: the pass-through options unchanged, plus the
//! classified source, the resolved scale constant, the DRM projection and
//! the list of events the surface should emit.

use crate::drm::{DrmConfig, NativeDrm};
use crate::error::Result;
use crate::events::EventKind;
use crate::platform::PlatformProfile;
use crate::source::{PlaybackSource, SourceDescriptor};
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Options forwarded verbatim to the native player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaybackOptions {
    // Tracks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_tracks: Option<Vec<TextTrack>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_audio_track: Option<SelectedTrack>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_video_track: Option<SelectedTrack>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_text_track: Option<SelectedTrack>,

    // Buffering and network
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer_config: Option<BufferConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bit_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_load_retry_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_forward_buffer_duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automatically_waits_to_minimize_stalling: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_buffering: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_bandwidth: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_source_encryption_key_scheme: Option<String>,

    // Playback
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_start_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_update_interval: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_only: Option<bool>,

    // Background and audio session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_in_background: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_when_inactive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_silent_switch: Option<IgnoreSilentSwitch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_focus: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focusable: Option<bool>,

    // Presentation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture_in_picture: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allows_external_playback: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullscreen_orientation: Option<FullscreenOrientation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullscreen_autorotate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle_style: Option<SubtitleStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_texture_view: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_secure_view: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_shutter_view: Option<bool>,

    // Ads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_tag_url: Option<String>,
}

/// Host configuration of a video view
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoProps {
    pub source: SourceDescriptor,
    pub drm: Option<DrmConfig>,
    #[serde(deserialize_with = "ResizeMode::deserialize_lenient")]
    pub resize_mode: ResizeMode,
    pub poster: Option<String>,
    pub poster_resize_mode: PosterResizeMode,
    #[serde(flatten)]
    pub playback: PlaybackOptions,
}

impl VideoProps {
    pub fn new(source: impl Into<SourceDescriptor>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    /// Parse props from their JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn resize_mode(mut self, mode: ResizeMode) -> Self {
        self.resize_mode = mode;
        self
    }

    pub fn poster(mut self, uri: &str) -> Self {
        self.poster = Some(uri.to_string());
        self
    }

    pub fn poster_resize_mode(mut self, mode: PosterResizeMode) -> Self {
        self.poster_resize_mode = mode;
        self
    }

    pub fn drm(mut self, drm: DrmConfig) -> Self {
        self.drm = Some(drm);
        self
    }

    pub fn audio_only(mut self, audio_only: bool) -> Self {
        self.playback.audio_only = Some(audio_only);
        self
    }

    pub fn paused(mut self, paused: bool) -> Self {
        self.playback.paused = Some(paused);
        self
    }

    pub fn playback(mut self, playback: PlaybackOptions) -> Self {
        self.playback = playback;
        self
    }

    /// A poster URI was supplied
    pub fn has_poster(&self) -> bool {
        self.poster.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn is_audio_only(&self) -> bool {
        self.playback.audio_only.unwrap_or(false)
    }

    pub fn has_license_provider(&self) -> bool {
        self.drm.as_ref().is_some_and(DrmConfig::has_license_provider)
    }
}

/// Configuration pushed to the native player
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeConfig {
    pub src: PlaybackSource,
    /// Native scale constant
    pub resize_mode: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drm: Option<NativeDrm>,
    #[serde(flatten)]
    pub playback: PlaybackOptions,
    /// Native event names the surface should emit
    pub events: Vec<&'static str>,
}

impl NativeConfig {
    /// Merge host props with the classified source.
    ///
    /// Pure: no I/O, no failure modes.
    pub fn assemble(
        props: &VideoProps,
        src: PlaybackSource,
        constants: &ScaleConstants,
        profile: &PlatformProfile,
    ) -> Self {
        let mut events: Vec<&'static str> = EventKind::ALL
            .iter()
            .flat_map(|kind| kind.native_names().iter().copied())
            .filter(|name| profile.accepts(name))
            .collect();
        if props.has_license_provider() {
            events.extend_from_slice(EventKind::GetLicense.native_names());
        }

        Self {
            src,
            resize_mode: constants.resolve(props.resize_mode),
            drm: props.drm.as_ref().map(NativeDrm::from),
            playback: props.playback.clone(),
            events,
        }
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drm::license_fn;
    use crate::platform::Platform;
    use crate::source::NoAssets;

    fn assemble(props: &VideoProps) -> NativeConfig {
        let src = PlaybackSource::classify(&props.source, &NoAssets);
        NativeConfig::assemble(
            props,
            src,
            &ScaleConstants::default(),
            &PlatformProfile::for_platform(Platform::Ios),
        )
    }

    #[test]
    fn test_props_from_json() {
        let props = VideoProps::from_json(
            r#"{
                "source": {"uri": "https://cdn.example.com/master.m3u8", "headers": {"X-Id": 7}},
                "resizeMode": "cover",
                "poster": "https://cdn.example.com/poster.jpg",
                "paused": true,
                "rate": 1.25,
                "bufferConfig": {"minBufferMs": 15000, "maxBufferMs": 50000},
                "textTracks": [{"uri": "https://cdn.example.com/en.vtt", "type": "text/vtt", "language": "en"}],
                "ignoreSilentSwitch": "obey",
                "adTagUrl": "https://ads.example.com/vast.xml"
            }"#,
        )
        .unwrap();

        assert_eq!(props.resize_mode, ResizeMode::Cover);
        assert!(props.has_poster());
        assert_eq!(props.playback.paused, Some(true));
        assert_eq!(props.playback.rate, Some(1.25));
        assert_eq!(props.playback.ignore_silent_switch, Some(IgnoreSilentSwitch::Obey));
        assert_eq!(
            props.playback.text_tracks.as_ref().unwrap()[0].track_type,
            Some(TextTrackType::Vtt)
        );
    }

    #[test]
    fn test_unknown_resize_mode_scales_none() {
        for raw in [r#"{"resizeMode": "center"}"#, r#"{"resizeMode": null}"#, r#"{"resizeMode": 7}"#] {
            let props = VideoProps::from_json(raw).unwrap();
            assert_eq!(props.resize_mode, ResizeMode::None, "{raw}");
            assert_eq!(assemble(&props).resize_mode, ScaleConstants::default().scale_none);
        }
    }

    #[test]
    fn test_assembled_config() {
        let props = VideoProps::new("https://cdn.example.com/a.mp4")
            .resize_mode(ResizeMode::Contain)
            .paused(true);
        let config = assemble(&props);

        assert_eq!(config.resize_mode, ScaleConstants::default().scale_aspect_fit);
        assert!(config.src.is_network);
        assert_eq!(config.playback.paused, Some(true));
        assert!(config.drm.is_none());
        assert!(config.events.contains(&"onVideoLoad"));
        assert!(!config.events.contains(&"onGetLicense"));
    }

    #[test]
    fn test_pass_through_is_verbatim() {
        let props = VideoProps::from_json(
            r#"{
                "source": "https://cdn.example.com/a.mp4",
                "minLoadRetryCount": 5,
                "subtitleStyle": {"fontSize": 18, "paddingBottom": 4},
                "selectedTextTrack": {"type": "language", "value": "fr"},
                "useTextureView": false
            }"#,
        )
        .unwrap();
        let json = assemble(&props).to_json().unwrap();

        assert_eq!(json["minLoadRetryCount"], 5);
        assert_eq!(json["subtitleStyle"]["fontSize"], 18.0);
        assert_eq!(json["selectedTextTrack"]["value"], "fr");
        assert_eq!(json["useTextureView"], false);
        assert!(json.get("rate").is_none());
        assert_eq!(json["src"]["isNetwork"], true);
        assert_eq!(json["src"]["type"], "");
    }

    #[test]
    fn test_license_event_only_with_provider() {
        let provider = license_fn(|_| async { Ok(Some("license".to_string())) });
        let props = VideoProps::new("https://cdn.example.com/a.m3u8")
            .drm(DrmConfig::widevine("https://wv.example.com").with_license_provider(provider));
        let config = assemble(&props);

        assert!(config.events.contains(&"onGetLicense"));
        assert!(config.drm.as_ref().unwrap().has_license_provider);

        let json = config.to_json().unwrap();
        assert_eq!(json["drm"]["licenseServer"], "https://wv.example.com");
    }

    #[test]
    fn test_single_noisy_subscription() {
        let config = assemble(&VideoProps::new("https://a/b.mp4"));
        let noisy = config
            .events
            .iter()
            .filter(|name| name.contains("AudioBecomingNoisy"))
            .count();
        assert_eq!(noisy, 1);
    }
}
