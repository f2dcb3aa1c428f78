use crate::wasm_bindgen;

/// # js_functions
///
/// This file lists all JavaScript functions that are callable from Rust as well as
/// struct and enumeration used by those functions.
///
/// Only the JS-backed implementations in `bindings::backends` (and the `Logger`) should call
/// them: the `PlaybackSession` only knows about the traits those implementations fulfill.

#[wasm_bindgen]
extern "C" {
    // Log the given text in the JavaScript console, with the log level given.
    pub fn jsLog(log_level: LogLevel, log: &str);

    // Returns the current timestamp in milliseconds, as `Date.now()` would.
    pub fn jsNow() -> f64;

    // Returns the platform-provided estimate of the downlink bandwidth, in Mbps (e.g. through
    // `navigator.connection.downlink`).
    //
    // Returns `None` if the platform does not expose such estimate.
    pub fn jsGetBandwidthHint() -> Option<f64>;

    // Fetch the given `url` from the network and await a response.
    //
    // `method` is the HTTP method to use (e.g. "GET" or "POST") and `body` the optional
    // request body, sent as JSON.
    //
    // If and when it finishes with success, the response's body will be emitted as a string
    // through the `on_request_finished` method of this `Dispatcher`.
    //
    // If and when it fails (network issue, timeout or non-2xx status), the error will be
    // emitted through the `on_request_failed` method of this `Dispatcher`.
    //
    // In both cases, those methods will always be called asynchronously after the `jsFetch`
    // call.
    pub fn jsFetch(url: &str, method: &str, body: Option<String>) -> RequestId;

    // Set the source of the media element to the given URL, announcing at the same time the
    // quality label it corresponds to.
    pub fn jsSetSource(url: &str, quality: &str);

    pub fn jsPlay();
    pub fn jsPause();
    pub fn jsTogglePlay();

    // Call the `HTMLMediaElement.prototype.currentTime` setter, allowing to move the current
    // playback's playhead.
    pub fn jsSeek(position: f64);

    pub fn jsSetMuted(muted: bool);

    // Add `delta` to the media element's volume, clamping it to the [0, 1] range.
    pub fn jsSetVolume(delta: f64);

    // Method called to change the playback rate (speed of playback).
    pub fn jsSetPlaybackRate(playback_rate: f64);

    pub fn jsToggleFullscreen();

    // Read the string stored in the page's local storage under the given key.
    pub fn jsStorageGet(key: &str) -> Option<String>;

    // Store the given string in the page's local storage under the given key.
    pub fn jsStorageSet(key: &str, value: &str);

    // Remove the given key from the page's local storage.
    pub fn jsStorageRemove(key: &str);

    // Communicate the new view-model, serialized as JSON, to the rendering layer.
    pub fn jsRenderView(view: &str);

    // Communicate the result of a catalog request (home page, search, category), serialized
    // as JSON, to the rendering layer.
    pub fn jsAnnounceCatalogResult(kind: CatalogKind, page: u32, result: &str);

    // Communicate to the rendering layer that a catalog request failed.
    pub fn jsAnnounceCatalogError(kind: CatalogKind, page: u32, message: &str);
}

/// Log levels, as communicated to the JavaScript-side through `jsLog`.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    /// Log level reserved for very important errors and highly unexpected events.
    Error = 0,

    /// Log level used for minor problems and unexpected events.
    Warn = 1,

    /// Log level used for important, though expected, events.
    Info = 2,

    /// Log level used for everything else.
    Debug = 3,
}

/// Category of catalog request, used to tag results given back to the rendering layer.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogKind {
    Home = 0,
    Search = 1,
    Category = 2,
}

/// Identify a pending request.
pub type RequestId = u32;
