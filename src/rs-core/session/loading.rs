use serde_json::Value;

use crate::{
    models::{self, ContentItem, ContentType, HistoryEntry, SeriesDetails},
    quality_resolver::QualityGroups,
    requester::{FetchOutcome, FinishedRequest, LoadStep, RequestError, RequestKind},
    Logger,
};

use super::{CatalogResult, LoadTarget, PlaybackSession, SessionError, SessionState};

/// Internal load logic of the `PlaybackSession`: starting loads and applying their
/// completions.
impl PlaybackSession {
    /// Start a new load, superseding any load in progress.
    pub(super) fn start_load(&mut self, target: LoadTarget) {
        self.generation += 1;
        let generation = self.generation;
        self.client.abandon_loads_before(generation);
        Logger::lazy_info(&|| {
            format!(
                "Session: Starting load #{generation}: {target:?} ({} request(s) pending)",
                self.client.pending_count()
            )
        });
        self.state = SessionState::Loading;
        self.error = None;
        self.clear_source();

        let now = self.clock.now();
        let outcome = match &target {
            LoadTarget::Content { id, content_type } => {
                self.content = None;
                self.episodes.reset();
                match content_type {
                    ContentType::Movie => self.client.get_movie(id, generation, now),
                    ContentType::Series => self.client.get_series(id, generation, now),
                }
            }
            LoadTarget::Episode { id } => self.client.get_sources(id, generation, now),
        };
        self.last_target = Some(target);
        self.handle_outcome(outcome);
    }

    /// Forget about the current sources.
    pub(super) fn clear_source(&mut self) {
        self.qualities = QualityGroups::default();
        self.current_quality = None;
        self.current_source = None;
        self.media.reset();
    }

    pub(super) fn handle_outcome(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Cached(finished) => self.on_finished_request(finished),
            FetchOutcome::Pending(request_id) => {
                Logger::debug(&format!("Session: Awaiting request {request_id}"));
                self.publish();
            }
        }
    }

    /// Catalog browsing requests never affect the view: only their results, once known,
    /// are given to the `ViewSink`.
    pub(super) fn handle_catalog_outcome(&mut self, outcome: FetchOutcome) {
        if let FetchOutcome::Cached(finished) = outcome {
            self.on_finished_request(finished);
        }
    }

    pub(super) fn on_finished_request(&mut self, finished: FinishedRequest) {
        let FinishedRequest {
            kind,
            generation,
            result,
        } = finished;
        let step = match kind {
            RequestKind::Catalog { kind, page } => {
                self.view_sink
                    .on_catalog_result(CatalogResult { kind, page, result });
                return;
            }
            RequestKind::Load(step) => step,
        };
        if generation != self.generation || self.state != SessionState::Loading {
            Logger::debug(&format!(
                "Session: Discarding completion of superseded load #{generation}"
            ));
            return;
        }
        let value = match result {
            Ok(value) => value,
            Err(err) => {
                self.fail(SessionError::FetchFailure(err));
                return;
            }
        };
        match step {
            LoadStep::Movie { id } => self.on_movie_loaded(&id, value),
            LoadStep::Series { id } => self.on_series_loaded(&id, value),
            LoadStep::Sources { content_id } => self.on_sources_loaded(&content_id, value),
        }
    }

    fn on_movie_loaded(&mut self, id: &str, value: Value) {
        let mut item: ContentItem = match serde_json::from_value(value) {
            Ok(item) => item,
            Err(err) => return self.fail(parsing_error(err)),
        };
        item.content_type = ContentType::Movie;
        self.content = Some(item);
        let outcome = self.client.get_sources(id, self.generation, self.clock.now());
        self.handle_outcome(outcome);
    }

    fn on_series_loaded(&mut self, id: &str, value: Value) {
        let details: SeriesDetails = match serde_json::from_value(value) {
            Ok(details) => details,
            Err(err) => return self.fail(parsing_error(err)),
        };
        let mut item = details.item;
        item.content_type = ContentType::Series;
        self.content = Some(item);
        self.episodes.load(details.episodes);

        // A series without episodes is directly playable
        let source_id = match self.episodes.current() {
            Some(episode) => episode.id.clone(),
            None => id.to_owned(),
        };
        let outcome = self
            .client
            .get_sources(&source_id, self.generation, self.clock.now());
        self.handle_outcome(outcome);
    }

    fn on_sources_loaded(&mut self, content_id: &str, value: Value) {
        let sources = match models::parse_source_list(value) {
            Ok(sources) => sources,
            Err(err) => return self.fail(parsing_error(err)),
        };
        let groups = QualityGroups::group(sources);
        let preference = self.store.preferred_quality();
        let bandwidth = self.adaptive_selector.get_estimate();
        let chosen = groups
            .pick_default(preference.as_deref(), bandwidth)
            .and_then(|label| {
                groups
                    .first_source(label)
                    .map(|source| (label.to_owned(), source.clone()))
            });
        let (label, source) = match chosen {
            Some(chosen) => chosen,
            None => {
                return self.fail(SessionError::EmptySourceSet {
                    content_id: content_id.to_owned(),
                })
            }
        };

        Logger::lazy_info(&|| {
            format!("Session: Playing {content_id} in {label} (bandwidth: {bandwidth}Mbps)")
        });
        self.media.set_source(&source.url, &label);
        let now = self.clock.now();
        if let Some(position) = self.store.progress(&source.url, now) {
            Logger::info(&format!("Session: Resuming {content_id} at {position}s"));
            self.media.seek(position);
        }
        self.qualities = groups;
        self.current_quality = Some(label);
        self.current_source = Some(source);
        self.state = SessionState::Ready;
        self.record_history(now);
        self.publish();
    }

    /// Put what is now being played at the front of the watch history.
    fn record_history(&mut self, now: f64) {
        let entry = match (&self.content, self.episodes.current()) {
            (Some(series), Some(episode)) => HistoryEntry {
                id: episode.id.clone(),
                title: format!("{} - {}", series.title, episode.title),
                content_type: ContentType::Series,
                thumbnail: episode
                    .thumbnail
                    .clone()
                    .or_else(|| series.thumbnail.clone()),
                timestamp: now,
            },
            (Some(item), None) => HistoryEntry {
                id: item.id.clone(),
                title: item.title.clone(),
                content_type: item.content_type,
                thumbnail: item.thumbnail.clone(),
                timestamp: now,
            },
            (None, _) => return,
        };
        self.store.push_history(entry);
    }

    pub(super) fn fail(&mut self, err: SessionError) {
        Logger::warn(&format!("Session: Load #{} failed: {err}", self.generation));
        self.state = SessionState::Error;
        self.error = Some(err);
        self.publish();
    }
}

fn parsing_error(err: serde_json::Error) -> SessionError {
    SessionError::FetchFailure(RequestError::Parsing {
        message: err.to_string(),
    })
}
