use crate::{models::SourceVariant, Logger};

/// Known quality labels, from the highest quality to the lowest.
pub const QUALITY_ORDER: [&str; 9] = [
    "4K", "2160p", "FHD", "1080p", "HD", "720p", "SD", "480p", "360p",
];

/// Quality label given to sources which do not announce one.
pub const DEFAULT_QUALITY: &str = "SD";

/// Above that bandwidth, in Mbps, the best available quality is chosen by default.
const HIGH_BANDWIDTH_THRESHOLD_MBPS: f64 = 5.;

/// All `SourceVariant` sharing the same quality label.
#[derive(Clone, Debug, PartialEq)]
pub struct QualityGroup {
    label: String,
    sources: Vec<SourceVariant>,
}

impl QualityGroup {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Never empty.
    pub fn sources(&self) -> &[SourceVariant] {
        &self.sources
    }
}

/// Sources of a content grouped by quality label.
///
/// Groups are ordered from the highest quality to the lowest according to `QUALITY_ORDER`.
/// Labels not in that list come after all known ones, in the order in which they were first
/// encountered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QualityGroups {
    groups: Vec<QualityGroup>,
}

impl QualityGroups {
    /// Group the given sources by quality label, sources without one being considered as
    /// `DEFAULT_QUALITY`.
    pub fn group(sources: Vec<SourceVariant>) -> Self {
        let mut groups: Vec<QualityGroup> = vec![];
        for source in sources {
            let label = match source.quality.as_deref().map(str::trim) {
                Some(label) if !label.is_empty() => label.to_owned(),
                _ => DEFAULT_QUALITY.to_owned(),
            };
            match groups.iter_mut().find(|g| g.label == label) {
                Some(group) => group.sources.push(source),
                None => groups.push(QualityGroup {
                    label,
                    sources: vec![source],
                }),
            }
        }

        // `sort_by_key` is stable, unknown labels thus keep their discovery order.
        groups.sort_by_key(|g| rank(&g.label));
        Logger::lazy_debug(&|| {
            format!(
                "Quality: Grouped sources into {} qualities: {:?}",
                groups.len(),
                groups.iter().map(|g| g.label.as_str()).collect::<Vec<_>>()
            )
        });
        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QualityGroup> {
        self.groups.iter()
    }

    /// Available quality labels, from the highest quality to the lowest.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.label.as_str())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.groups.iter().any(|g| g.label == label)
    }

    /// Returns the sources with the given quality label, `None` if there's none.
    pub fn sources(&self, label: &str) -> Option<&[SourceVariant]> {
        self.groups
            .iter()
            .find(|g| g.label == label)
            .map(|g| g.sources.as_slice())
    }

    /// Returns the source which should be played for the given quality label.
    pub fn first_source(&self, label: &str) -> Option<&SourceVariant> {
        self.sources(label).and_then(|s| s.first())
    }

    /// Choose the quality label to play by default:
    ///   1. The `preference` if one is given and available.
    ///   2. Else, if `bandwidth_mbps` is above 5 Mbps, the highest available quality.
    ///   3. Else `DEFAULT_QUALITY` if available, or the lowest available quality.
    ///
    /// Returns `None` only if there's no group.
    pub fn pick_default(&self, preference: Option<&str>, bandwidth_mbps: f64) -> Option<&str> {
        if let Some(wanted) = preference {
            if let Some(group) = self.groups.iter().find(|g| g.label == wanted) {
                return Some(group.label.as_str());
            }
            Logger::debug(&format!(
                "Quality: Preferred quality {wanted} not available"
            ));
        }
        if bandwidth_mbps > HIGH_BANDWIDTH_THRESHOLD_MBPS {
            self.groups.first().map(|g| g.label.as_str())
        } else if self.contains(DEFAULT_QUALITY) {
            Some(DEFAULT_QUALITY)
        } else {
            self.groups.last().map(|g| g.label.as_str())
        }
    }
}

fn rank(label: &str) -> usize {
    QUALITY_ORDER
        .iter()
        .position(|q| *q == label)
        .unwrap_or(QUALITY_ORDER.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(url: &str, quality: Option<&str>) -> SourceVariant {
        SourceVariant {
            url: url.to_owned(),
            quality: quality.map(str::to_owned),
            mime_type: None,
            size: None,
        }
    }

    fn labels(groups: &QualityGroups) -> Vec<&str> {
        groups.labels().collect()
    }

    #[test]
    fn test_group_orders_by_quality() {
        let groups = QualityGroups::group(vec![
            source("a", Some("360p")),
            source("b", Some("1080p")),
            source("c", Some("4K")),
            source("d", Some("HD")),
            source("e", Some("SD")),
        ]);
        assert_eq!(labels(&groups), vec!["4K", "1080p", "HD", "SD", "360p"]);
    }

    #[test]
    fn test_group_keeps_every_source_once() {
        let input = vec![
            source("a", Some("720p")),
            source("b", Some("720p")),
            source("c", None),
            source("d", Some("Ultra")),
            source("e", Some("")),
            source("f", Some("1080p")),
        ];
        let groups = QualityGroups::group(input);
        let mut urls: Vec<&str> = groups
            .iter()
            .flat_map(|g| g.sources().iter().map(|s| s.url.as_str()))
            .collect();
        urls.sort();
        assert_eq!(urls, vec!["a", "b", "c", "d", "e", "f"]);
        assert!(groups.iter().all(|g| !g.sources().is_empty()));
        assert_eq!(groups.sources("720p").unwrap().len(), 2);
        assert_eq!(groups.sources("SD").unwrap().len(), 2);
        assert_eq!(groups.first_source("720p").unwrap().url, "a");
    }

    #[test]
    fn test_group_appends_unknown_labels_in_discovery_order() {
        let groups = QualityGroups::group(vec![
            source("a", Some("Zeta")),
            source("b", Some("480p")),
            source("c", Some("Alpha")),
            source("d", Some("FHD")),
            source("e", Some("Zeta")),
        ]);
        assert_eq!(labels(&groups), vec!["FHD", "480p", "Zeta", "Alpha"]);
        assert_eq!(groups.sources("Zeta").unwrap().len(), 2);
    }

    #[test]
    fn test_group_empty() {
        let groups = QualityGroups::group(vec![]);
        assert!(groups.is_empty());
        assert_eq!(groups.pick_default(Some("SD"), 10.), None);
    }

    #[test]
    fn test_pick_default_high_bandwidth() {
        let groups = QualityGroups::group(vec![
            source("a", Some("720p")),
            source("b", Some("1080p")),
            source("c", Some("SD")),
        ]);
        assert_eq!(groups.pick_default(None, 8.), Some("1080p"));
    }

    #[test]
    fn test_pick_default_low_bandwidth() {
        let groups = QualityGroups::group(vec![
            source("a", Some("720p")),
            source("b", Some("1080p")),
            source("c", Some("SD")),
        ]);
        assert_eq!(groups.pick_default(None, 5.), Some("SD"));
        assert_eq!(groups.pick_default(None, 0.5), Some("SD"));

        let no_sd = QualityGroups::group(vec![
            source("a", Some("720p")),
            source("b", Some("1080p")),
            source("c", Some("360p")),
        ]);
        assert_eq!(no_sd.pick_default(None, 2.), Some("360p"));
    }

    #[test]
    fn test_pick_default_honors_preference() {
        let groups = QualityGroups::group(vec![
            source("a", Some("720p")),
            source("b", Some("1080p")),
            source("c", Some("SD")),
        ]);
        for bw in [0., 1., 5., 8., 100.] {
            assert_eq!(groups.pick_default(Some("720p"), bw), Some("720p"));
        }
        assert_eq!(groups.pick_default(Some("4K"), 8.), Some("1080p"));
        assert_eq!(groups.pick_default(Some("4K"), 1.), Some("SD"));
    }
}
