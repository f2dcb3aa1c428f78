use crate::{
    adaptive::DEFAULT_BANDWIDTH_MBPS,
    persistence::{DEFAULT_HISTORY_LIMIT, DEFAULT_PROGRESS_RETENTION_MS},
    requester::{DEFAULT_API_BASE, DEFAULT_CACHE_TTL_MS},
    Logger,
};

use super::PlaybackSession;

/// Tunable parameters of a `PlaybackSession`.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfiguration {
    /// Prefix of every catalog endpoint.
    pub api_base: String,

    /// Amount of time, in milliseconds, during which a catalog response is reused.
    pub cache_ttl_ms: f64,

    /// Amount of time, in milliseconds, after which a persisted position is ignored.
    pub progress_retention_ms: f64,

    /// Ratio of elapsed time on duration from which an episode is considered watched.
    pub watched_threshold: f64,

    /// Maximum number of entries in the watch history.
    pub history_limit: usize,

    /// Seconds skipped by the seek keyboard shortcuts.
    pub seek_step: f64,

    /// Volume added or removed by the volume keyboard shortcuts.
    pub volume_step: f64,

    /// Bandwidth estimate, in Mbps, used when the platform gives none.
    pub default_bandwidth_mbps: f64,
}

impl Default for SessionConfiguration {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
            progress_retention_ms: DEFAULT_PROGRESS_RETENTION_MS,
            watched_threshold: 0.9,
            history_limit: DEFAULT_HISTORY_LIMIT,
            seek_step: 10.,
            volume_step: 0.1,
            default_bandwidth_mbps: DEFAULT_BANDWIDTH_MBPS,
        }
    }
}

/// Setters of the `PlaybackSession`'s configuration.
///
/// Invalid values are ignored: the previous value is kept and a warning is logged.
impl PlaybackSession {
    /// Apply every value of `config`, going through the same validation as individual
    /// setters.
    pub(super) fn apply_configuration(&mut self, config: SessionConfiguration) {
        self.set_api_base(config.api_base);
        self.set_cache_ttl(config.cache_ttl_ms);
        self.set_progress_retention(config.progress_retention_ms);
        self.set_watched_threshold(config.watched_threshold);
        self.set_history_limit(config.history_limit);
        self.set_seek_step(config.seek_step);
        self.set_volume_step(config.volume_step);
        self.set_default_bandwidth(config.default_bandwidth_mbps);
    }

    pub fn set_api_base(&mut self, base: String) {
        let base = base.trim_end_matches('/').to_owned();
        self.client.update_base(base.clone());
        self.config.api_base = base;
    }

    pub fn set_cache_ttl(&mut self, ttl_ms: f64) {
        if !is_valid_duration(ttl_ms) {
            warn_invalid("cache TTL", ttl_ms);
            return;
        }
        self.client.update_cache_ttl(ttl_ms);
        self.config.cache_ttl_ms = ttl_ms;
    }

    pub fn set_progress_retention(&mut self, retention_ms: f64) {
        if !is_valid_duration(retention_ms) {
            warn_invalid("progress retention", retention_ms);
            return;
        }
        self.store.update_progress_retention(retention_ms);
        self.config.progress_retention_ms = retention_ms;
    }

    pub fn set_watched_threshold(&mut self, threshold: f64) {
        if !threshold.is_finite() || threshold <= 0. || threshold > 1. {
            warn_invalid("watched threshold", threshold);
            return;
        }
        self.config.watched_threshold = threshold;
    }

    pub fn set_history_limit(&mut self, limit: usize) {
        if limit == 0 {
            Logger::warn("Session: Ignoring a watch history limit of 0");
            return;
        }
        self.store.update_history_limit(limit);
        self.config.history_limit = limit;
    }

    pub fn set_seek_step(&mut self, step: f64) {
        if !step.is_finite() || step <= 0. {
            warn_invalid("seek step", step);
            return;
        }
        self.config.seek_step = step;
    }

    pub fn set_volume_step(&mut self, step: f64) {
        if !step.is_finite() || step <= 0. || step > 1. {
            warn_invalid("volume step", step);
            return;
        }
        self.config.volume_step = step;
    }

    pub fn set_default_bandwidth(&mut self, mbps: f64) {
        if !mbps.is_finite() || mbps < 0. {
            warn_invalid("default bandwidth", mbps);
            return;
        }
        self.adaptive_selector.update_default_bandwidth(mbps);
        self.config.default_bandwidth_mbps = mbps;
    }
}

fn is_valid_duration(val: f64) -> bool {
    val.is_finite() && val >= 0.
}

fn warn_invalid(name: &str, val: f64) {
    Logger::warn(&format!("Session: Ignoring invalid {name}: {val}"));
}
