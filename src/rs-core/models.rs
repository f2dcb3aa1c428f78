//! Data exchanged with the catalog service and persisted in the page's storage.

use serde::{Deserialize, Deserializer, Serialize};

/// Type of a catalog entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Movie,
    Series,
}

/// Reads a catalog `type` tag. The catalog also knows tags like "show" or "anime", which
/// are read as the default type: the endpoint a content comes from decides its real type.
fn lenient_content_type<'de, D>(deserializer: D) -> Result<ContentType, D::Error>
where
    D: Deserializer<'de>,
{
    let tag = Option::<String>::deserialize(deserializer)?;
    Ok(match tag.as_deref() {
        Some("series") => ContentType::Series,
        _ => ContentType::Movie,
    })
}

/// A movie or a series, as described by the catalog.
///
/// Never mutated once fetched: reloading a content replaces it wholesale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "CatalogItemPayload")]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    #[serde(rename = "type")]
    pub content_type: ContentType,
}

/// `ContentItem` as sent by the catalog, which may name its image in several ways at once.
#[derive(Deserialize)]
struct CatalogItemPayload {
    id: String,
    title: String,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    poster: Option<String>,
    #[serde(default)]
    poster_url: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_content_type")]
    content_type: ContentType,
}

impl From<CatalogItemPayload> for ContentItem {
    fn from(payload: CatalogItemPayload) -> Self {
        Self {
            id: payload.id,
            title: payload.title,
            year: payload.year,
            description: payload.description,
            thumbnail: payload
                .poster
                .or(payload.poster_url)
                .or(payload.thumbnail),
            content_type: payload.content_type,
        }
    }
}

/// A single episode of a series.
///
/// The position of an episode in its series' list, not `episode_number`, is what drives
/// navigation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "EpisodePayload")]
pub struct Episode {
    pub id: String,
    pub title: String,
    pub episode_number: u32,
    pub season_number: u32,
    pub thumbnail: Option<String>,
}

#[derive(Deserialize)]
struct EpisodePayload {
    id: String,
    title: String,
    #[serde(default)]
    episode_number: Option<u32>,
    #[serde(default)]
    number: Option<u32>,
    #[serde(default = "default_season_number")]
    season_number: u32,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    thumbnail_url: Option<String>,
}

fn default_season_number() -> u32 {
    1
}

impl From<EpisodePayload> for Episode {
    fn from(payload: EpisodePayload) -> Self {
        Self {
            id: payload.id,
            title: payload.title,
            episode_number: payload.episode_number.or(payload.number).unwrap_or_default(),
            season_number: payload.season_number,
            thumbnail: payload.thumbnail_url.or(payload.thumbnail),
        }
    }
}

/// Response to a series request: the series itself followed by its episodes.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct SeriesDetails {
    #[serde(flatten)]
    pub(crate) item: ContentItem,
    #[serde(default)]
    pub(crate) episodes: Vec<Episode>,
}

/// One playable URL at one quality.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceVariant {
    pub url: String,
    /// Free-form quality label (e.g. "1080p", "SD"). `None` is considered as "SD".
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default, rename = "type")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
}

/// The catalog either directly sends the list of sources or wraps it in an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum SourceListPayload {
    List(Vec<SourceVariant>),
    Wrapped {
        #[serde(alias = "sources")]
        video_sources: Vec<SourceVariant>,
    },
}

/// Parse the JSON response of a source request into the list of `SourceVariant`.
pub(crate) fn parse_source_list(
    value: serde_json::Value,
) -> Result<Vec<SourceVariant>, serde_json::Error> {
    Ok(match serde_json::from_value(value)? {
        SourceListPayload::List(sources) => sources,
        SourceListPayload::Wrapped { video_sources } => video_sources,
    })
}

/// Last known position in a given source, persisted per source URL.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaybackProgress {
    pub url: String,
    /// Elapsed time, in seconds.
    pub time: f64,
    /// Time at which that progress was captured, as a unix timestamp in milliseconds.
    pub timestamp: f64,
}

/// An entry of the watch history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Unix timestamp in milliseconds.
    pub timestamp: f64,
}
