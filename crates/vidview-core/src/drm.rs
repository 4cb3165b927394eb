//! DRM configuration and license exchange
//!
//! Supports Widevine, FairPlay, PlayReady and ClearKey. Key systems are
//! negotiated by the native player; this module only carries configuration
//! and, when the host supplies a [`LicenseProvider`], brokers the license
//! exchange:
//!
//! ```text
//!  native player          component              host provider
//!       │  onGetLicense(spc)   │                         │
//!       ├─────────────────────▶│  get_license(spc, ...)  │
//!       │                      ├────────────────────────▶│
//!       │                      │◀──── Ok(Some(license)) ─┤
//!       │◀── set_license_result│                         │
//!       │                      │◀──── Ok(None) / Err ────┤
//!       │◀── set_license_error │                         │
//! ```

use crate::error::Result;
use crate::headers::{strings_only, HeaderValue};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Reported when the native request carries no SPC
pub const NO_SPC_MESSAGE: &str = "No spc received";

/// Reported when the provider resolves without a license
pub const EMPTY_LICENSE_MESSAGE: &str = "Empty license result";

/// DRM system types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrmType {
    Widevine,
    PlayReady,
    ClearKey,
    FairPlay,
}

/// License request raised by the native player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseRequest {
    /// Server playback context, base64 encoded
    #[serde(default, rename = "spcBase64")]
    pub spc: Option<String>,
    #[serde(default)]
    pub content_id: Option<String>,
    #[serde(default)]
    pub license_url: Option<String>,
}

impl LicenseRequest {
    /// Parse the body of an `onGetLicense` event
    pub fn from_event_body(body: &serde_json::Value) -> Self {
        serde_json::from_value(body.clone()).unwrap_or_default()
    }

    /// SPC payload when present and non-empty
    pub fn payload(&self) -> Option<&str> {
        self.spc.as_deref().filter(|spc| !spc.is_empty())
    }

    /// Decoded SPC bytes
    pub fn spc_bytes(&self) -> Result<Vec<u8>> {
        Ok(STANDARD.decode(self.payload().unwrap_or_default())?)
    }
}

/// Host capability answering license requests.
///
/// `Ok(None)` means the host produced nothing and is reported to the native
/// player as a failure, as is `Err`.
#[async_trait]
pub trait LicenseProvider: Send + Sync {
    async fn get_license(
        &self,
        spc: &str,
        content_id: &str,
        license_url: &str,
    ) -> anyhow::Result<Option<String>>;
}

/// Provider backed by a closure returning a future
pub struct FnLicenseProvider<F> {
    f: F,
}

/// Wrap a closure as a [`LicenseProvider`]
///
/// ```
/// use vidview_core::drm::license_fn;
///
/// let provider = license_fn(|request| async move {
///     Ok(request.spc.map(|spc| format!("license-for-{spc}")))
/// });
/// # let _ = provider;
/// ```
pub fn license_fn<F, Fut>(f: F) -> Arc<FnLicenseProvider<F>>
where
    F: Fn(LicenseRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Option<String>>> + Send + 'static,
{
    Arc::new(FnLicenseProvider { f })
}

#[async_trait]
impl<F, Fut> LicenseProvider for FnLicenseProvider<F>
where
    F: Fn(LicenseRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Option<String>>> + Send + 'static,
{
    async fn get_license(
        &self,
        spc: &str,
        content_id: &str,
        license_url: &str,
    ) -> anyhow::Result<Option<String>> {
        (self.f)(LicenseRequest {
            spc: Some(spc.to_string()),
            content_id: Some(content_id.to_string()),
            license_url: Some(license_url.to_string()),
        })
        .await
    }
}

/// DRM configuration for a content item
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrmConfig {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub drm_type: Option<DrmType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_server: Option<String>,
    /// License request headers; any value kind, stringified for the native side
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, HeaderValue>,
    #[serde(default)]
    pub base64_certificate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    /// Host license callback; when absent the native player contacts the
    /// license server itself
    #[serde(skip)]
    pub license_provider: Option<Arc<dyn LicenseProvider>>,
}

impl DrmConfig {
    pub fn new(drm_type: DrmType) -> Self {
        Self {
            drm_type: Some(drm_type),
            ..Default::default()
        }
    }

    /// Create a Widevine configuration
    pub fn widevine(license_server: &str) -> Self {
        Self::new(DrmType::Widevine).with_license_server(license_server)
    }

    /// Create a FairPlay configuration
    pub fn fairplay(license_server: &str, certificate_url: &str) -> Self {
        Self {
            certificate_url: Some(certificate_url.to_string()),
            ..Self::new(DrmType::FairPlay).with_license_server(license_server)
        }
    }

    pub fn with_license_server(mut self, url: &str) -> Self {
        self.license_server = Some(url.to_string());
        self
    }

    /// Add a custom header for license requests
    pub fn with_header(mut self, key: &str, value: impl Into<HeaderValue>) -> Self {
        self.headers.insert(key.to_string(), value.into());
        self
    }

    pub fn with_license_provider(mut self, provider: Arc<dyn LicenseProvider>) -> Self {
        self.license_provider = Some(provider);
        self
    }

    pub fn has_license_provider(&self) -> bool {
        self.license_provider.is_some()
    }
}

impl std::fmt::Debug for DrmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrmConfig")
            .field("drm_type", &self.drm_type)
            .field("license_server", &self.license_server)
            .field("headers", &self.headers)
            .field("base64_certificate", &self.base64_certificate)
            .field("certificate_url", &self.certificate_url)
            .field("content_id", &self.content_id)
            .field("license_provider", &self.license_provider.is_some())
            .finish()
    }
}

/// Native-facing projection of [`DrmConfig`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeDrm {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub drm_type: Option<DrmType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_server: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub base64_certificate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    pub has_license_provider: bool,
}

impl From<&DrmConfig> for NativeDrm {
    fn from(config: &DrmConfig) -> Self {
        Self {
            drm_type: config.drm_type,
            license_server: config.license_server.clone(),
            headers: strings_only(&config.headers),
            base64_certificate: config.base64_certificate,
            certificate_url: config.certificate_url.clone(),
            content_id: config.content_id.clone(),
            has_license_provider: config.has_license_provider(),
        }
    }
}

/// Decision reported back to the native player
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LicenseOutcome {
    License(String),
    Error(String),
}

/// Run one license exchange against the host provider.
///
/// Never fails: every failure mode, a panicking provider included, becomes
/// [`LicenseOutcome::Error`].
#[instrument(skip(provider, request), fields(content_id = request.content_id.as_deref()))]
pub async fn exchange_license(
    provider: Arc<dyn LicenseProvider>,
    request: LicenseRequest,
) -> LicenseOutcome {
    let Some(spc) = request.payload().map(str::to_string) else {
        warn!("License requested without SPC");
        return LicenseOutcome::Error(NO_SPC_MESSAGE.to_string());
    };
    let content_id = request.content_id.unwrap_or_default();
    let license_url = request.license_url.unwrap_or_default();

    let call: BoxFuture<'_, anyhow::Result<Option<String>>> =
        provider.get_license(&spc, &content_id, &license_url);

    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(Ok(Some(license))) => {
            debug!(bytes = license.len(), "License acquired");
            LicenseOutcome::License(license)
        }
        Ok(Ok(None)) => {
            warn!("License provider returned no license");
            LicenseOutcome::Error(EMPTY_LICENSE_MESSAGE.to_string())
        }
        Ok(Err(e)) => {
            warn!(error = %e, "License provider failed");
            LicenseOutcome::Error(e.to_string())
        }
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "license provider panicked".to_string());
            warn!(error = %message, "License provider panicked");
            LicenseOutcome::Error(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn fixed(result: Option<&'static str>) -> Arc<dyn LicenseProvider> {
        license_fn(move |_| async move { Ok(result.map(str::to_string)) })
    }

    fn request(spc: Option<&str>) -> LicenseRequest {
        LicenseRequest {
            spc: spc.map(str::to_string),
            content_id: Some("skd://content-1".to_string()),
            license_url: Some("https://license.example.com".to_string()),
        }
    }

    #[tokio::test]
    async fn test_license_success() {
        let outcome = exchange_license(fixed(Some("LICENSE_BYTES")), request(Some("c3Bj"))).await;
        assert_eq!(outcome, LicenseOutcome::License("LICENSE_BYTES".to_string()));
    }

    #[tokio::test]
    async fn test_empty_license_is_error() {
        let outcome = exchange_license(fixed(None), request(Some("c3Bj"))).await;
        assert_eq!(outcome, LicenseOutcome::Error("Empty license result".to_string()));
    }

    #[tokio::test]
    async fn test_missing_spc_skips_provider() {
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();
        let provider = license_fn(move |_| {
            flag.store(true, Ordering::SeqCst);
            async { Ok(Some("unused".to_string())) }
        });

        let outcome = exchange_license(provider.clone(), request(None)).await;
        assert_eq!(outcome, LicenseOutcome::Error("No spc received".to_string()));

        let outcome = exchange_license(provider, request(Some(""))).await;
        assert_eq!(outcome, LicenseOutcome::Error("No spc received".to_string()));
        assert!(!called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_provider_failure_message() {
        let provider = license_fn(|_| async { Err(anyhow::anyhow!("boom")) });
        let outcome = exchange_license(provider, request(Some("c3Bj"))).await;
        assert_eq!(outcome, LicenseOutcome::Error("boom".to_string()));
    }

    #[tokio::test]
    async fn test_provider_panic_is_contained() {
        let provider = license_fn(|_| async {
            if true {
                panic!("provider exploded");
            }
            Ok(None)
        });
        let outcome = exchange_license(provider, request(Some("c3Bj"))).await;
        assert_eq!(outcome, LicenseOutcome::Error("provider exploded".to_string()));
    }

    #[tokio::test]
    async fn test_provider_receives_request_fields() {
        let provider = license_fn(|req: LicenseRequest| async move {
            assert_eq!(req.content_id.as_deref(), Some("skd://content-1"));
            assert_eq!(req.license_url.as_deref(), Some("https://license.example.com"));
            Ok(req.spc)
        });
        let outcome = exchange_license(provider, request(Some("c3Bj"))).await;
        assert_eq!(outcome, LicenseOutcome::License("c3Bj".to_string()));
    }

    #[test]
    fn test_request_from_event_body() {
        let body = serde_json::json!({
            "spcBase64": "c3Bj",
            "contentId": "skd://content-1",
            "licenseUrl": "https://license.example.com",
        });
        let request = LicenseRequest::from_event_body(&body);
        assert_eq!(request.payload(), Some("c3Bj"));
        assert_eq!(request.spc_bytes().unwrap(), b"spc");

        let empty = LicenseRequest::from_event_body(&serde_json::Value::Null);
        assert_eq!(empty.payload(), None);
    }

    #[test]
    fn test_native_projection() {
        let config = DrmConfig::fairplay("https://license.example.com", "https://cert.example.com")
            .with_header("X-Auth", "token")
            .with_license_provider(fixed(Some("x")));
        let native = NativeDrm::from(&config);
        assert_eq!(native.drm_type, Some(DrmType::FairPlay));
        assert!(native.has_license_provider);

        let json = serde_json::to_value(&native).unwrap();
        assert_eq!(json["type"], "fairplay");
        assert_eq!(json["certificateUrl"], "https://cert.example.com");
        assert_eq!(json["headers"]["X-Auth"], "token");
    }

    #[test]
    fn test_config_deserialization() {
        let config: DrmConfig = serde_json::from_str(
            r#"{"type": "widevine", "licenseServer": "https://wv.example.com", "base64Certificate": true}"#,
        )
        .unwrap();
        assert_eq!(config.drm_type, Some(DrmType::Widevine));
        assert!(config.base64_certificate);
        assert!(!config.has_license_provider());
    }

    #[test]
    fn test_non_string_headers_are_stringified() {
        let config: DrmConfig = serde_json::from_value(serde_json::json!({
            "type": "widevine",
            "headers": {"X-Auth": "token", "X-Retry": 3, "X-Debug": true, "X-Meta": {"k": "v"}}
        }))
        .unwrap();

        let native = NativeDrm::from(&config);
        assert_eq!(native.headers["X-Auth"], "token");
        assert_eq!(native.headers["X-Retry"], "3");
        assert_eq!(native.headers["X-Debug"], "true");
        assert_eq!(native.headers["X-Meta"], r#"{"k":"v"}"#);
    }
}
