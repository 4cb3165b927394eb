//! DRM license exchange example
//!
//! Demonstrates wiring a host license provider into a FairPlay view and
//! answering the native player's license request.
//!
//! Run with: cargo run -p vidview-core --example drm_license

use serde_json::json;
use std::sync::Arc;
use vidview_core::testing::{Recorded, RecordingSurface};
use vidview_core::{
    license_fn, Dispatched, DrmConfig, LicenseRequest, NativeEvent, Platform, Video, VideoProps,
};

#[tokio::main]
async fn main() {
    println!("vidview Core - DRM License Example");
    println!("==================================\n");

    // Host license provider: would normally POST the SPC to a key server
    let provider = license_fn(|request: LicenseRequest| async move {
        let spc = request.spc.unwrap_or_default();
        println!("  Provider called for {:?}", request.content_id);
        Ok(Some(format!("ckc-for-{}-byte-spc", spc.len())))
    });

    let props = VideoProps::new("https://cdn.example.com/fairplay/master.m3u8").drm(
        DrmConfig::fairplay(
            "https://license.example.com/fairplay",
            "https://license.example.com/fairplay/cert",
        )
        .with_license_provider(provider),
    );

    let (surface, mut calls) = RecordingSurface::with_channel();
    let video = Video::new(props, Arc::new(surface), Platform::Ios);

    println!("1. Render");
    println!("---------");
    let rendered = video.render();
    println!("  Source: {}", rendered.config.src.uri);
    println!("  License events subscribed: {}\n", rendered.config.events.contains(&"onGetLicense"));

    println!("2. Native license request");
    println!("-------------------------");
    let event = NativeEvent::new(
        video.tag(),
        "onGetLicense",
        json!({
            "spcBase64": "c2VydmVyLXBsYXliYWNrLWNvbnRleHQ=",
            "contentId": "skd://content-001",
            "licenseUrl": "https://license.example.com/fairplay",
        }),
    );

    if let Dispatched::License(handle) = video.dispatch(event) {
        let _ = handle.await;
    }

    while let Ok(call) = calls.try_recv() {
        match call {
            Recorded::LicenseResult(view, license) => {
                println!("  License submitted to view {view}: {license}")
            }
            Recorded::LicenseError(view, message) => {
                println!("  License error submitted to view {view}: {message}")
            }
            _ => {}
        }
    }
}
