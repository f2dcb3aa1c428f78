//! Implementations of the `PlaybackSession`'s collaborators relying on the JavaScript
//! functions declared in `js_functions`.

use crate::{
    adaptive::BandwidthHint,
    media_element::MediaEngine,
    persistence::KeyValueStore,
    requester::{Fetcher, RequestOptions},
    session::{CatalogResult, Clock, SessionView, ViewSink},
};

use super::{
    formatters::{format_catalog_result_for_js, format_view_for_js},
    js_functions::*,
};

/// The HTMLMediaElement on the page.
pub(crate) struct JsMediaEngine;

impl MediaEngine for JsMediaEngine {
    fn set_source(&mut self, url: &str, quality: &str) {
        jsSetSource(url, quality);
    }

    fn play(&mut self) {
        jsPlay();
    }

    fn pause(&mut self) {
        jsPause();
    }

    fn toggle_play(&mut self) {
        jsTogglePlay();
    }

    fn seek(&mut self, position: f64) {
        jsSeek(position);
    }

    fn set_muted(&mut self, muted: bool) {
        jsSetMuted(muted);
    }

    fn set_volume(&mut self, delta: f64) {
        jsSetVolume(delta);
    }

    fn set_speed(&mut self, multiplier: f64) {
        jsSetPlaybackRate(multiplier);
    }

    fn toggle_fullscreen(&mut self) {
        jsToggleFullscreen();
    }
}

pub(crate) struct JsFetcher;

impl Fetcher for JsFetcher {
    fn fetch(&mut self, url: &str, options: &RequestOptions) -> RequestId {
        jsFetch(url, options.method.as_str(), options.body.clone())
    }
}

/// The page's `localStorage`.
pub(crate) struct JsLocalStorage;

impl KeyValueStore for JsLocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        jsStorageGet(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        jsStorageSet(key, value);
    }

    fn remove(&mut self, key: &str) {
        jsStorageRemove(key);
    }
}

pub(crate) struct JsBandwidthHint;

impl BandwidthHint for JsBandwidthHint {
    fn estimate_mbps(&self) -> Option<f64> {
        jsGetBandwidthHint()
    }
}

pub(crate) struct JsClock;

impl Clock for JsClock {
    fn now(&self) -> f64 {
        jsNow()
    }
}

/// Rendering layer living on the JavaScript-side, to which views and catalog results are
/// communicated as JSON.
pub(crate) struct JsViewSink;

impl ViewSink for JsViewSink {
    fn render(&mut self, view: &SessionView) {
        if let Some(formatted) = format_view_for_js(view) {
            jsRenderView(&formatted);
        }
    }

    fn on_catalog_result(&mut self, result: CatalogResult) {
        match format_catalog_result_for_js(&result) {
            Ok(value) => jsAnnounceCatalogResult(result.kind, result.page, &value),
            Err(message) => jsAnnounceCatalogError(result.kind, result.page, &message),
        }
    }
}
