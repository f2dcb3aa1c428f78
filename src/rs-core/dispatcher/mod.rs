use crate::{session::PlaybackSession, wasm_bindgen};

mod api;
mod event_listeners;

/// The `Dispatcher` is the player interface exported to the JavaScript-side, providing an API
/// to load contents, browse the catalog and influence various parameters about playback.
///
/// It only converts JavaScript values to Rust ones and forwards them to the
/// `PlaybackSession`, which relies on JavaScript-backed implementations of its collaborators.
#[wasm_bindgen]
pub struct Dispatcher {
    session: PlaybackSession,
}
