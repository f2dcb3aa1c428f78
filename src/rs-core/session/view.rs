use serde::Serialize;
use serde_json::Value;

use crate::{
    bindings::CatalogKind,
    models::{ContentItem, Episode},
    requester::RequestError,
};

use super::{PlaybackSession, SessionState};

/// Everything the rendering layer needs to know about the `PlaybackSession`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub state: SessionState,
    pub content: Option<ContentItem>,
    pub current_quality: Option<String>,

    /// Available quality labels, from the highest to the lowest.
    pub qualities: Vec<String>,

    /// Identifier of the current episode, if a series is loaded.
    pub current_episode: Option<String>,
    pub episodes: Vec<Episode>,

    /// Identifiers of the episodes watched.
    pub watched: Vec<String>,

    /// Message to display in the error panel.
    pub error: Option<String>,
}

/// Outcome of a catalog browsing request.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogResult {
    pub kind: CatalogKind,
    pub page: u32,
    pub result: Result<Value, RequestError>,
}

/// The rendering layer, to which the `PlaybackSession` reports what should be displayed.
pub trait ViewSink {
    /// Called each time the `SessionView` changes.
    fn render(&mut self, view: &SessionView);

    fn on_catalog_result(&mut self, result: CatalogResult);
}

impl PlaybackSession {
    pub fn view(&self) -> SessionView {
        SessionView {
            state: self.state,
            content: self.content.clone(),
            current_quality: self.current_quality.clone(),
            qualities: self.qualities.labels().map(str::to_owned).collect(),
            current_episode: self.episodes.current().map(|e| e.id.clone()),
            episodes: self.episodes.episodes().to_vec(),
            watched: self.episodes.watched().map(str::to_owned).collect(),
            error: self.error.as_ref().map(|e| e.to_string()),
        }
    }

    /// Give the current `SessionView` to the `ViewSink`, unless it is the same as the last
    /// one given.
    pub(super) fn publish(&mut self) {
        let view = self.view();
        if self.last_view.as_ref() == Some(&view) {
            return;
        }
        self.view_sink.render(&view);
        self.last_view = Some(view);
    }
}
