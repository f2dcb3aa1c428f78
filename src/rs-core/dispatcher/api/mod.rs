use crate::{
    bindings::{
        formatters::format_history_for_js, JsBandwidthHint, JsClock, JsFetcher, JsLocalStorage,
        JsMediaEngine, JsViewSink,
    },
    models::ContentType,
    session::{PlaybackSession, SessionBackends, SessionConfiguration},
    utils::logger::LoggerLevel,
    wasm_bindgen, Logger,
};

use super::Dispatcher;

/// Methods exposed to the JavaScript-side.
///
/// Note that these are not the only methods callable by JavaScript. There's
/// also "event_listeners" which as its name point at, should be called when particular
/// events happen. Such "event_listeners" are defined in its own file.
#[wasm_bindgen]
impl Dispatcher {
    /// Create a new `Dispatcher` driving the media element, storage and rendering layer
    /// reachable through the JavaScript functions it imports.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let backends = SessionBackends {
            media: Box::new(JsMediaEngine),
            fetcher: Box::new(JsFetcher),
            storage: Box::new(JsLocalStorage),
            bandwidth: Box::new(JsBandwidthHint),
            clock: Box::new(JsClock),
            view_sink: Box::new(JsViewSink),
        };
        Dispatcher {
            session: PlaybackSession::new(backends, SessionConfiguration::default()),
        }
    }

    pub fn set_log_level(&mut self, level: LoggerLevel) {
        Logger::set_logger_level(level);
    }

    /// Start loading the movie with the given identifier.
    pub fn load_movie(&mut self, id: String) {
        Logger::info("load_movie called");
        self.session.load_content(&id, ContentType::Movie);
    }

    /// Start loading the series with the given identifier, then its first episode.
    pub fn load_series(&mut self, id: String) {
        Logger::info("load_series called");
        self.session.load_content(&id, ContentType::Series);
    }

    /// Re-issue the last load, after it failed.
    pub fn retry(&mut self) {
        self.session.retry();
    }

    /// Stop the currently loaded content.
    pub fn stop(&mut self) {
        self.session.stop();
    }

    /// Called when one of the quality choices displayed is clicked.
    pub fn select_quality(&mut self, label: String) {
        self.session.change_quality(&label);
    }

    /// Called when one of the episodes displayed is clicked.
    pub fn select_episode(&mut self, episode_id: String) {
        self.session.select_episode(&episode_id);
    }

    /// Called when one of the playback speed choices displayed is clicked.
    pub fn select_speed(&mut self, multiplier: f64) {
        self.session.change_speed(multiplier);
    }

    pub fn next_episode(&mut self) {
        self.session.next_episode();
    }

    pub fn previous_episode(&mut self) {
        self.session.previous_episode();
    }

    pub fn toggle_play(&mut self) {
        self.session.toggle_play();
    }

    pub fn seek_by(&mut self, delta: f64) {
        self.session.seek_by(delta);
    }

    pub fn toggle_mute(&mut self) {
        self.session.toggle_mute();
    }

    pub fn change_volume(&mut self, delta: f64) {
        self.session.change_volume(delta);
    }

    pub fn toggle_fullscreen(&mut self) {
        self.session.toggle_fullscreen();
    }

    /// Request a page of the home catalog, announced through `jsAnnounceCatalogResult`.
    pub fn fetch_home(&mut self, page: u32) {
        self.session.fetch_home(page);
    }

    /// Search the catalog, the result being announced through `jsAnnounceCatalogResult`.
    pub fn search(&mut self, query: String, page: u32) {
        self.session.search(&query, page);
    }

    /// Request a page of a catalog category, announced through `jsAnnounceCatalogResult`.
    pub fn fetch_category(&mut self, name: String, page: u32) {
        self.session.fetch_category(&name, page);
    }

    pub fn clear_cache(&mut self) {
        self.session.clear_cache();
    }

    /// Returns the watch history, newest first, serialized as JSON.
    pub fn history(&self) -> String {
        format_history_for_js(&self.session.history())
    }

    pub fn clear_history(&mut self) {
        self.session.clear_history();
    }

    pub fn set_api_base(&mut self, base: String) {
        self.session.set_api_base(base);
    }

    pub fn set_cache_ttl(&mut self, ttl_ms: f64) {
        self.session.set_cache_ttl(ttl_ms);
    }

    pub fn set_progress_retention(&mut self, retention_ms: f64) {
        self.session.set_progress_retention(retention_ms);
    }

    pub fn set_watched_threshold(&mut self, threshold: f64) {
        self.session.set_watched_threshold(threshold);
    }

    pub fn set_history_limit(&mut self, limit: u32) {
        self.session.set_history_limit(limit as usize);
    }

    pub fn set_seek_step(&mut self, step: f64) {
        self.session.set_seek_step(step);
    }

    pub fn set_volume_step(&mut self, step: f64) {
        self.session.set_volume_step(step);
    }

    pub fn set_default_bandwidth(&mut self, mbps: f64) {
        self.session.set_default_bandwidth(mbps);
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
