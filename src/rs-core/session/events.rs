use crate::{bindings::RequestId, Logger};

use super::{keyboard::KeyCommand, LoadTarget, PlaybackSession, SessionState};

/// Reactions of the `PlaybackSession` to events coming from outside: network completions,
/// media engine events and keyboard input.
impl PlaybackSession {
    /// A request started by the `Fetcher` finished with success.
    pub fn on_request_succeeded(&mut self, request_id: RequestId, body: &str) {
        let now = self.clock.now();
        if let Some(finished) = self.client.on_request_succeeded(request_id, body, now) {
            self.on_finished_request(finished);
        }
    }

    /// A request started by the `Fetcher` failed.
    ///
    /// `status` is set if the failure is due to an unsatisfying HTTP status.
    pub fn on_request_failed(
        &mut self,
        request_id: RequestId,
        has_timeouted: bool,
        status: Option<u32>,
    ) {
        if let Some(finished) = self
            .client
            .on_request_failed(request_id, has_timeouted, status)
        {
            self.on_finished_request(finished);
        }
    }

    /// The media engine's position advanced.
    ///
    /// Persists the position reached in the current source and marks the current episode
    /// as watched once the watched threshold is crossed.
    pub fn on_time_update(&mut self, current_time: f64, duration: f64) {
        if !current_time.is_finite() || current_time < 0. {
            return;
        }
        self.media.on_time_update(current_time, duration);
        let url = match &self.current_source {
            Some(source) => source.url.clone(),
            None => return,
        };
        let now = self.clock.now();
        self.store.save_progress(&url, current_time, now);

        if !duration.is_finite() || duration <= 0. {
            return;
        }
        if current_time / duration < self.config.watched_threshold {
            return;
        }
        let episode_id = match self.episodes.current() {
            Some(episode) => episode.id.clone(),
            None => return,
        };
        if self.episodes.mark_watched(&episode_id) {
            Logger::info(&format!("Session: Episode {episode_id} watched"));
            self.publish();
        }
    }

    /// The media engine reached the end of the content.
    ///
    /// Automatically loads the next episode if there's one.
    pub fn on_media_ended(&mut self) {
        if !matches!(self.state, SessionState::Playing | SessionState::Paused) {
            Logger::debug(&format!("Session: Ignoring end while {:?}", self.state));
            return;
        }
        self.state = SessionState::Ended;
        match self.episodes.next().map(|e| e.id.clone()) {
            Some(id) => {
                Logger::info(&format!("Session: Advancing to episode {id}"));
                self.start_load(LoadTarget::Episode { id });
            }
            None => self.publish(),
        }
    }

    /// The media engine started playing.
    pub fn on_media_play(&mut self) {
        match self.state {
            SessionState::Ready | SessionState::Paused | SessionState::Ended => {
                self.state = SessionState::Playing;
                self.publish();
            }
            _ => {}
        }
    }

    /// The media engine paused.
    pub fn on_media_pause(&mut self) {
        match self.state {
            SessionState::Ready | SessionState::Playing => {
                self.state = SessionState::Paused;
                self.publish();
            }
            _ => {}
        }
    }

    /// The media engine's own interface asked for another quality.
    pub fn on_quality_requested(&mut self, label: &str) {
        self.change_quality(label);
    }

    /// A key was pressed.
    ///
    /// Returns `true` if the key triggered a command, in which case its default behavior
    /// should be prevented.
    pub fn on_key_down(&mut self, key: &str, text_input_focused: bool) -> bool {
        if text_input_focused {
            return false;
        }
        let command = match KeyCommand::from_key(key) {
            Some(command) => command,
            None => return false,
        };
        Logger::debug(&format!("Session: Key command {command:?}"));
        match command {
            KeyCommand::TogglePlay => self.toggle_play(),
            KeyCommand::ToggleFullscreen => self.toggle_fullscreen(),
            KeyCommand::ToggleMute => self.toggle_mute(),
            KeyCommand::SeekBackward => self.seek_by(-self.config.seek_step),
            KeyCommand::SeekForward => self.seek_by(self.config.seek_step),
            KeyCommand::VolumeUp => self.change_volume(self.config.volume_step),
            KeyCommand::VolumeDown => self.change_volume(-self.config.volume_step),
            KeyCommand::NextEpisode => self.next_episode(),
            KeyCommand::PreviousEpisode => self.previous_episode(),
        }
        true
    }
}
