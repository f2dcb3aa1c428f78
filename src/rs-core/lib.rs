use wasm_bindgen::prelude::*;

mod adaptive;
mod bindings;
pub mod dispatcher;
mod episode_sequencer;
mod media_element;
pub mod models;
mod persistence;
mod quality_resolver;
mod requester;
pub mod session;
mod utils;

pub use adaptive::{BandwidthHint, FixedBandwidth};
pub use bindings::CatalogKind;
pub use episode_sequencer::EpisodeSequencer;
pub use media_element::MediaEngine;
pub use persistence::{KeyValueStore, MemoryStore, PersistenceStore};
pub use quality_resolver::{QualityGroup, QualityGroups};
pub use requester::{Fetcher, HttpMethod, RequestError, RequestOptions};
pub use utils::logger::{Logger, LoggerLevel};
