use crate::Logger;

/// Playback capabilities of the underlying media engine (e.g. an HTMLMediaElement with its
/// native controls).
///
/// Events coming from that engine (time updates, end of the content, play/pause, quality
/// requests from its UI) are not part of this trait: they are given to the `PlaybackSession`
/// through its `on_*` methods.
pub trait MediaEngine {
    /// Make the engine play the media at `url`, which has the `quality` label.
    fn set_source(&mut self, url: &str, quality: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn toggle_play(&mut self);

    /// Move the playhead to `position`, in seconds.
    fn seek(&mut self, position: f64);
    fn set_muted(&mut self, muted: bool);

    /// Add `delta` to the current volume.
    fn set_volume(&mut self, delta: f64);
    fn set_speed(&mut self, multiplier: f64);
    fn toggle_fullscreen(&mut self);
}

/// Structure linked to the media engine which allows to perform media-related actions on it
/// while keeping track of what it knows of its state:
///   - the last known position and duration
///   - the mute status and the wanted playback rate
pub(crate) struct MediaElementReference {
    engine: Box<dyn MediaEngine>,

    /// Last position reported by the engine, in seconds.
    last_position: f64,

    /// Last duration reported by the engine, in seconds. `None` if unknown.
    duration: Option<f64>,

    is_muted: bool,

    /// The wanted playback rate:
    /// 1. == playback at "normal" speed
    /// 2. == playback at two times the normal speed
    /// and so on
    wanted_speed: f64,
}

impl MediaElementReference {
    pub(crate) fn new(engine: Box<dyn MediaEngine>) -> Self {
        Self {
            engine,
            last_position: 0.,
            duration: None,
            is_muted: false,
            wanted_speed: 1.,
        }
    }

    pub(crate) fn last_position(&self) -> f64 {
        self.last_position
    }

    /// Forget everything about the previous source, without touching the engine.
    pub(crate) fn reset(&mut self) {
        self.last_position = 0.;
        self.duration = None;
    }

    /// Point the engine to a new source.
    ///
    /// The wanted playback rate is re-applied as engines usually reset it on source changes.
    pub(crate) fn set_source(&mut self, url: &str, quality: &str) {
        Logger::info(&format!("Media: Setting source {url} ({quality})"));
        self.reset();
        self.engine.set_source(url, quality);
        if self.wanted_speed != 1. {
            self.engine.set_speed(self.wanted_speed);
        }
    }

    /// Store the position and duration reported by the engine.
    pub(crate) fn on_time_update(&mut self, position: f64, duration: f64) {
        self.last_position = position;
        self.duration = if duration.is_finite() && duration > 0. {
            Some(duration)
        } else {
            None
        };
    }

    pub(crate) fn play(&mut self) {
        self.engine.play();
    }

    pub(crate) fn pause(&mut self) {
        self.engine.pause();
    }

    pub(crate) fn toggle_play(&mut self) {
        self.engine.toggle_play();
    }

    pub(crate) fn seek(&mut self, position: f64) {
        let position = match self.duration {
            Some(duration) => position.clamp(0., duration),
            None => position.max(0.),
        };
        Logger::debug(&format!("Media: Seeking to {position}"));
        self.last_position = position;
        self.engine.seek(position);
    }

    /// Seek `delta` seconds away from the last known position.
    pub(crate) fn seek_by(&mut self, delta: f64) {
        self.seek(self.last_position + delta);
    }

    pub(crate) fn toggle_mute(&mut self) {
        self.is_muted = !self.is_muted;
        self.engine.set_muted(self.is_muted);
    }

    pub(crate) fn change_volume(&mut self, delta: f64) {
        self.engine.set_volume(delta);
    }

    /// Updates the wanted playback rate
    pub(crate) fn update_wanted_speed(&mut self, new_speed: f64) {
        self.wanted_speed = new_speed;
        self.engine.set_speed(new_speed);
    }

    pub(crate) fn toggle_fullscreen(&mut self) {
        self.engine.toggle_fullscreen();
    }
}
