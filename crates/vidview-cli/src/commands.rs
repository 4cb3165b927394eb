//! CLI command implementations

use crate::output::{format_rows, format_value, OutputFormat};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tabled::Tabled;
use tracing::{info, warn};
use vidview_core::drm::license_fn;
use vidview_core::source::NoAssets;
use vidview_core::{
    Callbacks, Dispatched, DrmConfig, DrmType, EventKind, NativeCommand, NativeConfig,
    NativeEvent, NativeSurface, Platform, PlaybackSource, Rendered, SavedMedia, SourceDescriptor,
    Video, VideoProps, ViewTag,
};

/// Surface that logs every native call
struct LoggingSurface;

#[async_trait]
impl NativeSurface for LoggingSurface {
    fn apply_config(&self, view: ViewTag, config: &NativeConfig) {
        info!(%view, src = %config.src.uri, events = config.events.len(), "apply config");
    }

    fn send_command(&self, view: ViewTag, command: NativeCommand) {
        info!(%view, ?command, "command");
    }

    async fn save(&self, view: ViewTag, _options: Value) -> vidview_core::Result<SavedMedia> {
        Ok(SavedMedia {
            uri: format!("file:///tmp/vidview/{view}.mp4"),
        })
    }

    fn set_license_result(&self, view: ViewTag, license: String) {
        info!(%view, license_len = license.len(), "license result");
    }

    fn set_license_error(&self, view: ViewTag, message: String) {
        warn!(%view, %message, "license error");
    }
}

fn load_props(path: &Path) -> anyhow::Result<VideoProps> {
    let json = std::fs::read_to_string(path)?;
    Ok(VideoProps::from_json(&json)?)
}

fn render_props(props_path: &Path, platform: Platform) -> anyhow::Result<Rendered> {
    let props = load_props(props_path)?;
    let video = Video::new(props, Arc::new(LoggingSurface), platform);
    Ok(video.render())
}

/// Render props into the native configuration
pub fn render(props_path: &Path, platform: Platform, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render_props(props_path, platform)?;

    match format {
        OutputFormat::Json => println!("{}", format_value(&rendered.config, format)),
        OutputFormat::Table | OutputFormat::Text => {
            let config = &rendered.config;
            println!("Native config ({platform}):");
            println!("  Source: {}", config.src.uri);
            println!("  Kind: {}", config.src.kind);
            println!("  Network: {}  Asset: {}", config.src.is_network, config.src.is_asset);
            println!("  Resize mode: {}", config.resize_mode);
            println!("  Headers: {}", config.src.request_headers.len());
            for (name, value) in &config.src.request_headers {
                println!("    {name}: {value}");
            }
            if let Some(drm) = &config.drm {
                println!("  DRM: {:?} (license provider: {})", drm.drm_type, drm.has_license_provider);
            }
            match &rendered.poster {
                Some(poster) => println!("  Poster: {} ({:?})", poster.uri, poster.resize_mode),
                None => println!("  Poster: none"),
            }
            println!("  Events: {}", config.events.len());
        }
    }

    Ok(())
}

#[derive(Serialize, Tabled)]
struct ClassifyRow {
    uri: String,
    kind: String,
    resolved: String,
}

/// Classify source URIs
pub fn classify(uris: &[String], format: OutputFormat) -> anyhow::Result<()> {
    let rows: Vec<ClassifyRow> = uris
        .iter()
        .map(|uri| {
            let source = PlaybackSource::classify(&SourceDescriptor::from(uri.as_str()), &NoAssets);
            ClassifyRow {
                uri: uri.clone(),
                kind: source.kind.to_string(),
                resolved: source.uri,
            }
        })
        .collect();

    println!("{}", format_rows(&rows, format));
    Ok(())
}

#[derive(Serialize, Tabled)]
struct EventRow {
    handler: String,
    native: String,
    payload: bool,
}

/// List host events and their native names
pub fn events(format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", format_rows(&event_rows(), format));
    Ok(())
}

fn event_rows() -> Vec<EventRow> {
    EventKind::ALL
        .iter()
        .map(|kind| EventRow {
            handler: kind.handler_name(),
            native: kind.native_names().join(", "),
            payload: kind.forwards_payload(),
        })
        .collect()
}

/// One recorded native event
#[derive(Debug, Deserialize)]
struct RecordedEvent {
    name: String,
    #[serde(default)]
    body: Value,
}

#[derive(Serialize, Tabled)]
struct ReplayRow {
    event: String,
    outcome: String,
}

/// Replay a native event stream against a freshly mounted view
pub async fn replay(
    props_path: &Path,
    events_path: &Path,
    platform: Platform,
    license: Option<String>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut props = load_props(props_path)?;
    let recorded: Vec<RecordedEvent> =
        serde_json::from_str(&std::fs::read_to_string(events_path)?)?;

    if let Some(license) = license {
        let provider = license_fn(move |_request| {
            let license = license.clone();
            async move { Ok(Some(license)) }
        });
        let drm = props
            .drm
            .take()
            .unwrap_or_else(|| DrmConfig::new(DrmType::FairPlay))
            .with_license_provider(provider);
        props = props.drm(drm);
    }

    let callbacks = EventKind::ALL.iter().fold(Callbacks::new(), |callbacks, kind| {
        let handler = kind.handler_name();
        callbacks.on(*kind, move |body| info!(handler = %handler, %body, "callback"))
    });

    let video = Video::new(props, Arc::new(LoggingSurface), platform).with_callbacks(callbacks);
    video.render();

    let mut rows = Vec::with_capacity(recorded.len());
    let mut exchanges = Vec::new();
    for event in recorded {
        let outcome = match video.dispatch(NativeEvent::new(video.tag(), &event.name, event.body)) {
            Dispatched::Delivered => "delivered",
            Dispatched::Dropped => "dropped",
            Dispatched::Ignored => "ignored",
            Dispatched::License(handle) => {
                exchanges.push(handle);
                "license"
            }
        };
        rows.push(ReplayRow {
            event: event.name,
            outcome: outcome.to_string(),
        });
    }

    for exchange in exchanges {
        exchange.await?;
    }

    println!("{}", format_rows(&rows, format));
    if format != OutputFormat::Json {
        println!("Poster visible: {}", video.poster_visible());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use vidview_core::ScaleConstants;

    fn write_json(value: &Value) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{value}").unwrap();
        file
    }

    #[test]
    fn test_event_rows_cover_vocabulary() {
        let rows = event_rows();
        assert_eq!(rows.len(), EventKind::ALL.len());
        assert!(rows.iter().any(|r| r.handler == "onLoad" && r.payload));
        assert!(rows
            .iter()
            .any(|r| r.native.contains("onVideoAudioBecomingNoisy") && !r.payload));
    }

    #[test]
    fn test_render_from_file() {
        let props = write_json(&serde_json::json!({
            "source": {"uri": "https://cdn.example.com/a.m3u8"},
            "poster": "https://cdn.example.com/p.jpg"
        }));
        render(props.path(), Platform::Android, OutputFormat::Json).unwrap();
    }

    #[test]
    fn test_render_unknown_resize_mode_scales_none() {
        for mode in [serde_json::json!("sideways"), Value::Null] {
            let props = write_json(&serde_json::json!({
                "source": "https://cdn.example.com/a.mp4",
                "resizeMode": mode
            }));
            let rendered = render_props(props.path(), Platform::Ios).unwrap();
            assert_eq!(rendered.config.resize_mode, ScaleConstants::default().scale_none);
            render(props.path(), Platform::Ios, OutputFormat::Text).unwrap();
        }
    }

    #[test]
    fn test_render_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"source\": ").unwrap();
        assert!(render(file.path(), Platform::Ios, OutputFormat::Text).is_err());
    }

    #[tokio::test]
    async fn test_replay_with_license() {
        let props = write_json(&serde_json::json!({
            "source": {"uri": "https://cdn.example.com/a.m3u8"}
        }));
        let events = write_json(&serde_json::json!([
            {"name": "onVideoLoad", "body": {"duration": 10.0}},
            {"name": "onGetLicense", "body": {"spcBase64": "c3Bj", "contentId": "c1"}},
            {"name": "onVideoEnd"}
        ]));

        replay(
            props.path(),
            events.path(),
            Platform::Ios,
            Some("bGljZW5zZQ==".to_string()),
            OutputFormat::Table,
        )
        .await
        .unwrap();
    }
}
