use std::collections::BTreeSet;

use crate::{models::Episode, Logger};

/// Keeps track of the episodes of the currently-loaded series and of the one being played.
///
/// The `EpisodeSequencer` never loads anything by itself: it only moves its position and lets
/// the `PlaybackSession` act on it.
#[derive(Default)]
pub struct EpisodeSequencer {
    /// Episodes in the order in which they should be played.
    episodes: Vec<Episode>,

    /// Index in `episodes` of the current episode. `None` if `episodes` is empty.
    current: Option<usize>,

    /// Identifiers of the episodes watched until the end since the series was loaded.
    watched: BTreeSet<String>,
}

impl EpisodeSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the episode list, positioning on its first episode.
    ///
    /// The watched set is emptied as it concerned the previous list.
    pub fn load(&mut self, episodes: Vec<Episode>) {
        Logger::debug(&format!("Episodes: Loading {} episodes", episodes.len()));
        self.current = if episodes.is_empty() { None } else { Some(0) };
        self.episodes = episodes;
        self.watched.clear();
    }

    /// Remove all episodes.
    pub fn reset(&mut self) {
        self.load(vec![]);
    }

    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    pub fn current(&self) -> Option<&Episode> {
        self.current.and_then(|idx| self.episodes.get(idx))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn has_next(&self) -> bool {
        matches!(self.current, Some(idx) if idx + 1 < self.episodes.len())
    }

    pub fn has_previous(&self) -> bool {
        matches!(self.current, Some(idx) if idx > 0)
    }

    /// Move to the next episode and return it.
    ///
    /// Returns `None` without moving if the current episode is the last one.
    pub fn next(&mut self) -> Option<&Episode> {
        if !self.has_next() {
            Logger::debug("Episodes: No next episode");
            return None;
        }
        let idx = self.current.map_or(0, |idx| idx + 1);
        self.current = Some(idx);
        self.episodes.get(idx)
    }

    /// Move to the previous episode and return it.
    ///
    /// Returns `None` without moving if the current episode is the first one.
    pub fn previous(&mut self) -> Option<&Episode> {
        if !self.has_previous() {
            Logger::debug("Episodes: No previous episode");
            return None;
        }
        let idx = self.current.map_or(0, |idx| idx - 1);
        self.current = Some(idx);
        self.episodes.get(idx)
    }

    /// Move to the episode with the given identifier and return it.
    ///
    /// Returns `None` without moving if no episode has that identifier.
    pub fn jump_to(&mut self, episode_id: &str) -> Option<&Episode> {
        match self.episodes.iter().position(|e| e.id == episode_id) {
            Some(idx) => {
                self.current = Some(idx);
                self.episodes.get(idx)
            }
            None => {
                Logger::warn(&format!("Episodes: Unknown episode {episode_id}"));
                None
            }
        }
    }

    /// Mark the given episode as watched.
    ///
    /// Returns `true` if it wasn't already.
    pub fn mark_watched(&mut self, episode_id: &str) -> bool {
        if self.watched.contains(episode_id) {
            return false;
        }
        Logger::debug(&format!("Episodes: {episode_id} watched"));
        self.watched.insert(episode_id.to_owned())
    }

    pub fn is_watched(&self, episode_id: &str) -> bool {
        self.watched.contains(episode_id)
    }

    /// Identifiers of watched episodes, in the order of the episode list.
    pub fn watched(&self) -> impl Iterator<Item = &str> {
        self.episodes
            .iter()
            .filter(|e| self.watched.contains(&e.id))
            .map(|e| e.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episodes(ids: &[&str]) -> Vec<Episode> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| Episode {
                id: (*id).to_owned(),
                title: format!("Episode {}", i + 1),
                episode_number: i as u32 + 1,
                season_number: 1,
                thumbnail: None,
            })
            .collect()
    }

    fn current_id(seq: &EpisodeSequencer) -> Option<&str> {
        seq.current().map(|e| e.id.as_str())
    }

    #[test]
    fn test_next_stops_at_last_episode() {
        let mut seq = EpisodeSequencer::new();
        seq.load(episodes(&["E1", "E2", "E3"]));
        assert_eq!(current_id(&seq), Some("E1"));
        assert_eq!(seq.next().map(|e| e.id.clone()), Some("E2".to_owned()));
        assert_eq!(seq.next().map(|e| e.id.clone()), Some("E3".to_owned()));
        assert!(seq.next().is_none());
        assert_eq!(current_id(&seq), Some("E3"));
        assert_eq!(seq.current_index(), Some(2));
    }

    #[test]
    fn test_previous_stops_at_first_episode() {
        let mut seq = EpisodeSequencer::new();
        seq.load(episodes(&["E1", "E2"]));
        assert!(seq.previous().is_none());
        assert_eq!(seq.current_index(), Some(0));
        seq.next();
        assert_eq!(seq.previous().map(|e| e.id.clone()), Some("E1".to_owned()));
    }

    #[test]
    fn test_navigation_follows_list_order() {
        let mut list = episodes(&["E1", "E2", "E3"]);
        list[0].episode_number = 9;
        list[2].episode_number = 1;
        let mut seq = EpisodeSequencer::new();
        seq.load(list);
        seq.next();
        assert_eq!(current_id(&seq), Some("E2"));
    }

    #[test]
    fn test_jump_to() {
        let mut seq = EpisodeSequencer::new();
        seq.load(episodes(&["E1", "E2", "E3"]));
        assert_eq!(seq.jump_to("E3").map(|e| e.id.clone()), Some("E3".to_owned()));
        assert!(!seq.has_next());
        assert!(seq.jump_to("E42").is_none());
        assert_eq!(current_id(&seq), Some("E3"));
    }

    #[test]
    fn test_empty_sequence() {
        let mut seq = EpisodeSequencer::new();
        seq.load(vec![]);
        assert!(seq.current().is_none());
        assert!(seq.next().is_none());
        assert!(seq.previous().is_none());
        assert!(seq.jump_to("E1").is_none());
        assert!(!seq.has_next());
    }

    #[test]
    fn test_mark_watched_is_idempotent() {
        let mut seq = EpisodeSequencer::new();
        seq.load(episodes(&["E1", "E2"]));
        assert!(seq.mark_watched("E1"));
        assert_eq!(seq.watched().count(), 1);
        assert!(!seq.mark_watched("E1"));
        assert_eq!(seq.watched().count(), 1);
        assert!(seq.is_watched("E1"));
        assert!(!seq.is_watched("E2"));
    }

    #[test]
    fn test_watched_follows_list_order() {
        let mut seq = EpisodeSequencer::new();
        let ids: Vec<String> = (1..=12).map(|i| format!("E{i}")).collect();
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
        seq.load(episodes(&ids));
        seq.mark_watched("E10");
        seq.mark_watched("E2");
        seq.mark_watched("E1");
        assert_eq!(seq.watched().collect::<Vec<_>>(), vec!["E1", "E2", "E10"]);
    }

    #[test]
    fn test_load_clears_watched() {
        let mut seq = EpisodeSequencer::new();
        seq.load(episodes(&["E1"]));
        seq.mark_watched("E1");
        seq.load(episodes(&["F1", "F2"]));
        assert_eq!(seq.watched().count(), 0);
        assert_eq!(current_id(&seq), Some("F1"));
    }
}
