//! Video component - binds host props and callbacks to one native view
//!
//! Coordinates:
//! - Source classification and invalid-URL reporting
//! - Native configuration assembly and push
//! - Event fan-out to host callbacks
//! - Poster overlay visibility
//! - License exchange with the host provider
//! - Imperative commands (seek, fullscreen, save, PiP restore)

use crate::{
    config::{NativeConfig, VideoProps},
    drm::{exchange_license, LicenseOutcome, LicenseRequest},
    events::{Callbacks, EventKind, NativeEvent, PlaybackError},
    native::{NativeCommand, NativeSurface, SavedMedia},
    platform::{Platform, PlatformProfile},
    poster::{PosterOverlay, PosterState},
    source::{AssetResolver, NoAssets, PlaybackSource, INVALID_URL_CODE, INVALID_URL_MESSAGE},
    types::{ScaleConstants, ViewTag},
    Error, Result,
};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Seek tolerance applied when the host passes none, in milliseconds
pub const DEFAULT_SEEK_TOLERANCE_MS: u32 = 100;

/// Output of one render pass
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub config: NativeConfig,
    /// Poster overlay to draw above the native view, if still visible
    pub poster: Option<PosterOverlay>,
}

/// What happened to a native event
#[derive(Debug)]
pub enum Dispatched {
    /// Forwarded to a host handler
    Delivered,
    /// No handler registered
    Dropped,
    /// Not for this view, unknown, or an alias this platform does not use
    Ignored,
    /// License exchange started
    License(JoinHandle<()>),
}

/// A native video view driven by host props
pub struct Video {
    tag: ViewTag,
    props: VideoProps,
    callbacks: Callbacks,
    native: Arc<dyn NativeSurface>,
    assets: Arc<dyn AssetResolver>,
    constants: ScaleConstants,
    profile: PlatformProfile,
    poster: PosterState,
}

impl Video {
    /// Create a view bound to a native surface
    pub fn new(props: VideoProps, native: Arc<dyn NativeSurface>, platform: Platform) -> Self {
        let constants = native.view_constants();
        let profile = PlatformProfile::for_platform(platform);
        let poster = PosterState::new(props.has_poster());
        let tag = ViewTag::new();

        info!(view = %tag, %platform, poster = poster.is_visible(), "Video view created");

        Self {
            tag,
            props,
            callbacks: Callbacks::default(),
            native,
            assets: Arc::new(NoAssets),
            constants,
            profile,
            poster,
        }
    }

    /// Set the host callbacks
    pub fn with_callbacks(mut self, callbacks: Callbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Set the bundled asset resolver
    pub fn with_assets(mut self, assets: Arc<dyn AssetResolver>) -> Self {
        self.assets = assets;
        self
    }

    pub fn tag(&self) -> ViewTag {
        self.tag
    }

    pub fn props(&self) -> &VideoProps {
        &self.props
    }

    pub fn profile(&self) -> &PlatformProfile {
        &self.profile
    }

    /// Replace the props. The poster state is kept.
    pub fn set_props(&mut self, props: VideoProps) {
        self.props = props;
    }

    pub fn poster_visible(&self) -> bool {
        self.poster.is_visible()
    }

    /// Poster overlay, while visible
    pub fn poster_overlay(&self) -> Option<PosterOverlay> {
        if !self.poster.is_visible() {
            return None;
        }
        self.props.poster.as_ref().map(|uri| PosterOverlay {
            uri: uri.clone(),
            resize_mode: self.props.poster_resize_mode,
        })
    }

    /// Build the native configuration and push it to the surface
    #[instrument(skip(self), fields(view = %self.tag))]
    pub fn render(&self) -> Rendered {
        let src = PlaybackSource::classify(&self.props.source, self.assets.as_ref());

        if src.is_invalid() {
            warn!(uri = %src.uri, "Invalid source url");
            let body = PlaybackError::new(INVALID_URL_MESSAGE, INVALID_URL_CODE).to_event_body();
            self.callbacks.emit(EventKind::Error, &body);
        }

        let config = NativeConfig::assemble(&self.props, src, &self.constants, &self.profile);
        debug!(
            uri = %config.src.uri,
            network = config.src.is_network,
            asset = config.src.is_asset,
            resize_mode = config.resize_mode,
            "Native config assembled"
        );
        self.native.apply_config(self.tag, &config);

        Rendered {
            config,
            poster: self.poster_overlay(),
        }
    }

    /// Route one native event to the host
    pub fn dispatch(&self, event: NativeEvent) -> Dispatched {
        if event.target != self.tag {
            debug!(to = %event.target, name = %event.name, "Event for another view");
            return Dispatched::Ignored;
        }

        let Some(kind) = EventKind::from_native_name(&event.name) else {
            debug!(name = %event.name, "Unknown native event");
            return Dispatched::Ignored;
        };

        if !self.profile.accepts(&event.name) {
            debug!(name = %event.name, "Alias not delivered on this platform");
            return Dispatched::Ignored;
        }

        if kind == EventKind::GetLicense {
            return self.spawn_license_request(LicenseRequest::from_event_body(&event.body));
        }

        if kind == self.profile.poster_hide_event
            && !self.props.is_audio_only()
            && self.poster.hide()
        {
            debug!(view = %self.tag, "Poster hidden");
        }

        let body = if kind.forwards_payload() {
            event.body
        } else {
            Value::Null
        };

        if self.callbacks.emit(kind, &body) {
            debug!(event = %kind, "Event delivered");
            Dispatched::Delivered
        } else {
            Dispatched::Dropped
        }
    }

    /// License exchange for one request, reporting to this view.
    ///
    /// Returns `None` when no license provider is configured. The returned
    /// future owns everything it needs, so it can outlive `self`.
    pub fn request_license(
        &self,
        request: LicenseRequest,
    ) -> Option<impl Future<Output = LicenseOutcome> + Send + 'static> {
        let provider = self.props.drm.as_ref()?.license_provider.clone()?;
        let native = self.native.clone();
        let view = self.tag;

        Some(async move {
            let outcome = exchange_license(provider, request).await;
            match &outcome {
                LicenseOutcome::License(license) => native.set_license_result(view, license.clone()),
                LicenseOutcome::Error(message) => native.set_license_error(view, message.clone()),
            }
            outcome
        })
    }

    fn spawn_license_request(&self, request: LicenseRequest) -> Dispatched {
        let Some(exchange) = self.request_license(request) else {
            debug!("License requested without a license provider");
            return Dispatched::Ignored;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => Dispatched::License(handle.spawn(async move {
                exchange.await;
            })),
            Err(e) => {
                warn!(error = %e, "No async runtime for license exchange");
                self.native
                    .set_license_error(self.tag, "No async runtime for license exchange".to_string());
                Dispatched::Ignored
            }
        }
    }

    /// Seek to `time` seconds.
    ///
    /// Fails before reaching the native layer when `time` is NaN.
    pub fn seek(&self, time: f64, tolerance_ms: Option<u32>) -> Result<()> {
        if time.is_nan() {
            return Err(Error::InvalidSeekTime);
        }

        let tolerance = tolerance_ms.unwrap_or(DEFAULT_SEEK_TOLERANCE_MS);
        debug!(time, tolerance, "Seeking");
        self.native.send_command(
            self.tag,
            NativeCommand::Seek {
                time,
                tolerance: self.profile.seek_tolerance.then_some(tolerance),
            },
        );
        Ok(())
    }

    pub fn present_fullscreen_player(&self) {
        self.native
            .send_command(self.tag, NativeCommand::Fullscreen { enabled: true });
    }

    pub fn dismiss_fullscreen_player(&self) {
        self.native
            .send_command(self.tag, NativeCommand::Fullscreen { enabled: false });
    }

    /// Persist a copy of the current item
    pub async fn save(&self, options: Value) -> Result<SavedMedia> {
        info!(view = %self.tag, "Saving current item");
        self.native.save(self.tag, options).await
    }

    /// Tell the native player whether the UI was restored after PiP stopped
    pub fn restore_user_interface_for_pip_stop_completed(&self, restored: bool) {
        self.native.send_command(
            self.tag,
            NativeCommand::RestoreUserInterfaceForPipStop { restored },
        );
    }

    /// Push a raw property patch to the native view
    pub fn set_native_props(&self, props: Value) {
        self.native
            .send_command(self.tag, NativeCommand::SetProps { props });
    }
}

impl std::fmt::Debug for Video {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Video")
            .field("tag", &self.tag)
            .field("props", &self.props)
            .field("callbacks", &self.callbacks)
            .field("profile", &self.profile)
            .field("poster_visible", &self.poster.is_visible())
            .finish()
    }
}
