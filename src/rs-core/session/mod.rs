use serde::Serialize;
use thiserror::Error;

use crate::{
    adaptive::{AdaptiveQualitySelector, BandwidthHint},
    episode_sequencer::EpisodeSequencer,
    media_element::{MediaElementReference, MediaEngine},
    models::{ContentItem, ContentType, Episode, HistoryEntry, SourceVariant},
    persistence::{KeyValueStore, PersistenceStore},
    quality_resolver::QualityGroups,
    requester::{ContentClient, Fetcher, RequestError},
    Logger,
};

mod configuration;
mod events;
mod keyboard;
mod loading;
mod view;


pub use configuration::SessionConfiguration;
pub use keyboard::KeyCommand;
pub use view::{CatalogResult, SessionView, ViewSink};

/// Source of the current time.
pub trait Clock {
    /// Returns the current unix timestamp, in milliseconds.
    fn now(&self) -> f64;
}

/// Identify the playback-related state the `PlaybackSession` is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No content is currently loaded.
    Idle,

    /// A content's metadata or sources are being fetched.
    Loading,

    /// A source has been given to the media engine, which did not start playing yet.
    Ready,
    Playing,
    Paused,

    /// The media engine reached the end of the content and there is no episode to advance to.
    Ended,

    /// The last load failed. A new load or a retry is needed to leave that state.
    Error,
}

/// Error leading the `PlaybackSession` to its `Error` state.
///
/// Its message is what the user sees in the error panel.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("Could not load the content: {0}")]
    FetchFailure(RequestError),
    #[error("No playable source was found for {content_id}")]
    EmptySourceSet { content_id: String },
}

/// Every collaborator a `PlaybackSession` relies on.
pub struct SessionBackends {
    pub media: Box<dyn MediaEngine>,
    pub fetcher: Box<dyn Fetcher>,
    pub storage: Box<dyn KeyValueStore>,
    pub bandwidth: Box<dyn BandwidthHint>,
    pub clock: Box<dyn Clock>,
    pub view_sink: Box<dyn ViewSink>,
}

/// What was asked to be loaded last, so the same load can be re-issued on retry.
#[derive(Clone, Debug, PartialEq)]
enum LoadTarget {
    /// A movie or series, by its identifier.
    Content {
        id: String,
        content_type: ContentType,
    },

    /// An episode of the series currently loaded.
    Episode { id: String },
}

/// The `PlaybackSession` reconciles user intents, catalog data arriving asynchronously and
/// the persisted viewing state into a single `SessionState`, which it publishes as a
/// `SessionView`.
///
/// Every load is stamped with a generation number. A completion whose generation is not the
/// current one concerns a superseded load and is ignored, which guarantees that the last
/// load requested always wins.
pub struct PlaybackSession {
    state: SessionState,

    config: SessionConfiguration,

    /// Allows to perform actions on the media engine, like setting a source, pausing, seeking
    /// etc.
    media: MediaElementReference,

    /// Abstraction allowing to perform catalog requests, while easily monitoring requests
    /// that are pending.
    client: ContentClient,

    store: PersistenceStore,

    episodes: EpisodeSequencer,

    /// Struct allowing to obtain an estimate of the bandwidth, on which default quality
    /// choices are based.
    adaptive_selector: AdaptiveQualitySelector,

    clock: Box<dyn Clock>,

    view_sink: Box<dyn ViewSink>,

    /// Incremented each time a load starts or is abandoned.
    generation: u64,

    last_target: Option<LoadTarget>,

    /// Movie or series currently loaded. `None` until its metadata has been received.
    content: Option<ContentItem>,

    /// Sources of the current movie or episode.
    qualities: QualityGroups,

    current_quality: Option<String>,

    /// Source given to the media engine. `None` if there's none.
    current_source: Option<SourceVariant>,

    error: Option<SessionError>,

    /// `SessionView` last given to the `ViewSink`.
    last_view: Option<SessionView>,
}

impl PlaybackSession {
    pub fn new(backends: SessionBackends, config: SessionConfiguration) -> Self {
        let mut session = Self {
            state: SessionState::Idle,
            config: SessionConfiguration::default(),
            media: MediaElementReference::new(backends.media),
            client: ContentClient::new(backends.fetcher),
            store: PersistenceStore::new(backends.storage),
            episodes: EpisodeSequencer::new(),
            adaptive_selector: AdaptiveQualitySelector::new(backends.bandwidth),
            clock: backends.clock,
            view_sink: backends.view_sink,
            generation: 0,
            last_target: None,
            content: None,
            qualities: QualityGroups::default(),
            current_quality: None,
            current_source: None,
            error: None,
            last_view: None,
        };
        session.apply_configuration(config);
        session
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn configuration(&self) -> &SessionConfiguration {
        &self.config
    }

    pub fn content(&self) -> Option<&ContentItem> {
        self.content.as_ref()
    }

    pub fn current_quality(&self) -> Option<&str> {
        self.current_quality.as_deref()
    }

    pub fn qualities(&self) -> &QualityGroups {
        &self.qualities
    }

    pub fn current_episode(&self) -> Option<&Episode> {
        self.episodes.current()
    }

    pub fn episodes(&self) -> &[Episode] {
        self.episodes.episodes()
    }

    pub fn is_watched(&self, episode_id: &str) -> bool {
        self.episodes.is_watched(episode_id)
    }

    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    /// Watch history, newest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.store.history()
    }

    pub fn clear_history(&mut self) {
        self.store.clear_history();
    }

    pub fn clear_cache(&mut self) {
        self.client.clear_cache();
    }

    /// Start loading a movie or a series, superseding any load in progress.
    pub fn load_content(&mut self, id: &str, content_type: ContentType) {
        self.start_load(LoadTarget::Content {
            id: id.to_owned(),
            content_type,
        });
    }

    /// Re-issue the last load if it failed.
    ///
    /// The cached responses that load relied on are dropped first, as they may be what led
    /// to the failure.
    pub fn retry(&mut self) {
        if self.state != SessionState::Error {
            Logger::debug("Session: Nothing to retry");
            return;
        }
        if let Some(target) = self.last_target.clone() {
            self.client.invalidate_load(self.generation);
            self.start_load(target);
        }
    }

    /// Go back to the `Idle` state, discarding any pending load.
    pub fn stop(&mut self) {
        Logger::info("Session: Stopping");
        self.generation += 1;
        self.client.abandon_loads_before(self.generation);
        self.state = SessionState::Idle;
        self.last_target = None;
        self.content = None;
        self.episodes.reset();
        self.clear_source();
        self.error = None;
        self.media.pause();
        self.publish();
    }

    /// Switch to the first source of the given quality, keeping the current position and
    /// play/pause state.
    ///
    /// Does nothing if no source is currently playable, if the quality is unknown or if it
    /// is already the current one.
    pub fn change_quality(&mut self, label: &str) {
        if !matches!(
            self.state,
            SessionState::Ready | SessionState::Playing | SessionState::Paused
        ) {
            Logger::debug("Session: Ignoring quality change, no source is loaded");
            return;
        }
        if self.current_quality.as_deref() == Some(label) {
            return;
        }
        let source = match self.qualities.first_source(label) {
            Some(source) => source.clone(),
            None => {
                Logger::debug(&format!("Session: Unknown quality {label}"));
                return;
            }
        };
        Logger::info(&format!("Session: Switching to quality {label}"));
        let position = self.media.last_position();
        self.store.set_preferred_quality(label);
        self.media.set_source(&source.url, label);
        if position > 0. {
            self.media.seek(position);
        }
        if self.state == SessionState::Playing {
            self.media.play();
        }
        self.current_quality = Some(label.to_owned());
        self.current_source = Some(source);
        self.publish();
    }

    pub fn change_speed(&mut self, multiplier: f64) {
        if !multiplier.is_finite() || multiplier <= 0. {
            Logger::warn(&format!("Session: Invalid playback rate {multiplier}"));
            return;
        }
        self.media.update_wanted_speed(multiplier);
    }

    pub fn next_episode(&mut self) {
        if let Some(id) = self.episodes.next().map(|e| e.id.clone()) {
            self.start_load(LoadTarget::Episode { id });
        }
    }

    pub fn previous_episode(&mut self) {
        if let Some(id) = self.episodes.previous().map(|e| e.id.clone()) {
            self.start_load(LoadTarget::Episode { id });
        }
    }

    pub fn select_episode(&mut self, episode_id: &str) {
        if let Some(id) = self.episodes.jump_to(episode_id).map(|e| e.id.clone()) {
            self.start_load(LoadTarget::Episode { id });
        }
    }

    pub fn toggle_play(&mut self) {
        self.media.toggle_play();
    }

    pub fn seek_by(&mut self, delta: f64) {
        if delta.is_finite() {
            self.media.seek_by(delta);
        }
    }

    pub fn toggle_mute(&mut self) {
        self.media.toggle_mute();
    }

    pub fn change_volume(&mut self, delta: f64) {
        if delta.is_finite() {
            self.media.change_volume(delta);
        }
    }

    pub fn toggle_fullscreen(&mut self) {
        self.media.toggle_fullscreen();
    }

    /// Request the given page of the home catalog. The result is given to the `ViewSink`.
    pub fn fetch_home(&mut self, page: u32) {
        let outcome = self.client.get_home(page, self.clock.now());
        self.handle_catalog_outcome(outcome);
    }

    /// Search the catalog. The result is given to the `ViewSink`.
    pub fn search(&mut self, query: &str, page: u32) {
        let outcome = self.client.search(query, page, self.clock.now());
        self.handle_catalog_outcome(outcome);
    }

    /// Request the given page of a catalog category. The result is given to the `ViewSink`.
    pub fn fetch_category(&mut self, name: &str, page: u32) {
        let outcome = self.client.get_category(name, page, self.clock.now());
        self.handle_catalog_outcome(outcome);
    }
}
