use crate::{bindings::RequestId, wasm_bindgen};

use super::Dispatcher;

/// Methods triggered on JavaScript events by the JavaScript code.
#[wasm_bindgen]
impl Dispatcher {
    /// The JS code should call this method each time an HTTP(S) request started with
    /// `jsFetch` finished with success.
    ///
    /// # Arguments
    ///
    /// * `request_id` - The identifier given by `jsFetch` when the request
    ///   was started. This allows the `Dispatcher` to identify which request
    ///   is actually finished
    ///
    /// * `body` - The response's body, as text.
    pub fn on_request_finished(&mut self, request_id: RequestId, body: String) {
        self.session.on_request_succeeded(request_id, &body);
    }

    /// The JS code should call this method each time an HTTP(S) request started with
    /// `jsFetch` finished with an error.
    ///
    /// # Arguments
    ///
    /// * `request_id` - The identifier given by `jsFetch` when the request
    ///   was started. This allows the `Dispatcher` to identify which request
    ///   is actually finished
    ///
    /// * `has_timeouted` - If `true`, the issue was due to the request timeouting.
    ///
    /// * `status` - If set, the issue was due to a non-satisfying HTTP
    ///   status being received.
    pub fn on_request_failed(
        &mut self,
        request_id: RequestId,
        has_timeouted: bool,
        status: Option<u32>,
    ) {
        self.session
            .on_request_failed(request_id, has_timeouted, status);
    }

    /// The JS code should call this method on each "timeupdate" event of the media element.
    pub fn on_time_update(&mut self, current_time: f64, duration: f64) {
        self.session.on_time_update(current_time, duration);
    }

    /// The JS code should call this method on the "ended" event of the media element.
    pub fn on_ended(&mut self) {
        self.session.on_media_ended();
    }

    /// The JS code should call this method on the "play" event of the media element.
    pub fn on_play(&mut self) {
        self.session.on_media_play();
    }

    /// The JS code should call this method on the "pause" event of the media element.
    pub fn on_pause(&mut self) {
        self.session.on_media_pause();
    }

    /// The JS code should call this method when the media element's own interface asks for
    /// another quality.
    pub fn on_quality_requested(&mut self, label: String) {
        self.session.on_quality_requested(&label);
    }

    /// The JS code should call this method on each "keydown" event of the page.
    ///
    /// # Arguments
    ///
    /// * `key` - The `key` property of the `KeyboardEvent`.
    ///
    /// * `text_input_focused` - `true` if a text input currently has the focus, in which
    ///   case no shortcut applies.
    ///
    /// Returns `true` if the key triggered a command, in which case the event's default
    /// behavior should be prevented.
    pub fn on_key_down(&mut self, key: String, text_input_focused: bool) -> bool {
        self.session.on_key_down(&key, text_input_focused)
    }
}
