use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::{
    bindings::{CatalogKind, RequestId},
    utils::url::Url,
    Logger,
};

use self::cache::ResponseCache;

mod cache;

pub use cache::DEFAULT_CACHE_TTL_MS;

/// Default prefix of every catalog endpoint.
pub const DEFAULT_API_BASE: &str = "/api";

/// Performs HTTP(S) requests.
///
/// Requests are asynchronous: `fetch` only starts the request and returns an identifier for
/// it. Its outcome is later reported, with that same identifier, to the
/// `on_request_succeeded` or `on_request_failed` method of the `ContentClient`.
pub trait Fetcher {
    fn fetch(&mut self, url: &str, options: &RequestOptions) -> RequestId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// Options of an HTTP request other than its URL.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RequestOptions {
    pub method: HttpMethod,

    /// JSON body of the request, if one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl RequestOptions {
    fn get() -> Self {
        Self {
            method: HttpMethod::Get,
            body: None,
        }
    }
}

/// What a catalog request was made for.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum RequestKind {
    /// Browsing request, whose result is directly given to the rendering layer.
    Catalog { kind: CatalogKind, page: u32 },

    /// Step of a content load.
    Load(LoadStep),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum LoadStep {
    Movie { id: String },
    Series { id: String },
    Sources { content_id: String },
}

/// Metadata associated with a pending catalog request.
struct PendingRequest {
    /// ID identifying the request on the `Fetcher`-side.
    request_id: RequestId,

    /// Key under which the response will be cached.
    signature: String,

    /// Url on which the request is done
    url: Url,

    kind: RequestKind,

    /// Load generation at the time the request was made.
    generation: u64,
}

/// A request which either just finished or was served from the cache.
#[derive(Debug)]
pub(crate) struct FinishedRequest {
    pub(crate) kind: RequestKind,
    pub(crate) generation: u64,
    pub(crate) result: Result<Value, RequestError>,
}

pub(crate) enum FetchOutcome {
    /// A fresh enough response was cached, no request was made.
    Cached(FinishedRequest),

    /// The request has been started.
    Pending(RequestId),
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("The server answered with an HTTP {status} status")]
    Status { status: u32 },
    #[error("The request timed out")]
    Timeout,
    #[error("A network error prevented the request from succeeding")]
    Network,
    #[error("The server's response could not be understood: {message}")]
    Parsing { message: String },
}

/// The `ContentClient` performs requests to the catalog service and caches their responses.
///
/// A response is reused, without any request, while it is younger than the cache TTL.
/// Failed requests are never retried: it is up to the caller to decide what to do.
pub(crate) struct ContentClient {
    fetcher: Box<dyn Fetcher>,

    /// Prefix of every endpoint's URL.
    base: String,

    cache: ResponseCache,

    /// List information on the current requests awaited, by chronological order
    /// (from the time the request was made).
    pending_requests: Vec<PendingRequest>,

    /// Generation of the last load, with the signatures of the requests it relied on, cached
    /// or not.
    load_signatures: (u64, Vec<String>),
}

impl ContentClient {
    pub(crate) fn new(fetcher: Box<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            base: DEFAULT_API_BASE.to_owned(),
            cache: ResponseCache::new(),
            pending_requests: vec![],
            load_signatures: (0, vec![]),
        }
    }

    pub(crate) fn update_base(&mut self, base: String) {
        self.base = base;
    }

    pub(crate) fn update_cache_ttl(&mut self, ttl_ms: f64) {
        self.cache.update_ttl(ttl_ms);
    }

    pub(crate) fn clear_cache(&mut self) {
        Logger::info("Client: Clearing response cache");
        self.cache.clear();
    }

    /// Remove from the cache every response the load of the given generation relied on.
    ///
    /// Responses of other requests, like catalog pages, are kept.
    pub(crate) fn invalidate_load(&mut self, generation: u64) {
        let (last_generation, signatures) = &self.load_signatures;
        if *last_generation != generation {
            return;
        }
        Logger::debug(&format!(
            "Client: Invalidating {} cached response(s) of load #{generation}",
            signatures.len()
        ));
        for signature in signatures {
            self.cache.remove(signature);
        }
    }

    /// Stop awaiting the requests of loads older than `generation`.
    ///
    /// Their completions, if they ever come, are then reported as unknown requests.
    pub(crate) fn abandon_loads_before(&mut self, generation: u64) {
        let before = self.pending_requests.len();
        self.pending_requests.retain(|r| match r.kind {
            RequestKind::Catalog { .. } => true,
            RequestKind::Load(_) => r.generation >= generation,
        });
        let abandoned = before - self.pending_requests.len();
        if abandoned > 0 {
            Logger::debug(&format!("Client: Abandoned {abandoned} superseded request(s)"));
        }
    }

    pub(crate) fn pending_count(&self) -> usize {
        self.pending_requests.len()
    }

    pub(crate) fn get_home(&mut self, page: u32, now: f64) -> FetchOutcome {
        let url =
            Url::from_segments(&self.base, &["home"]).with_query_param("page", &page.to_string());
        let kind = RequestKind::Catalog {
            kind: CatalogKind::Home,
            page,
        };
        self.request(url, RequestOptions::get(), kind, 0, now)
    }

    pub(crate) fn search(&mut self, query: &str, page: u32, now: f64) -> FetchOutcome {
        let url = Url::from_segments(&self.base, &["search"]);
        let body = serde_json::json!({ "query": query, "page": page }).to_string();
        let options = RequestOptions {
            method: HttpMethod::Post,
            body: Some(body),
        };
        let kind = RequestKind::Catalog {
            kind: CatalogKind::Search,
            page,
        };
        self.request(url, options, kind, 0, now)
    }

    pub(crate) fn get_category(&mut self, name: &str, page: u32, now: f64) -> FetchOutcome {
        let url = Url::from_segments(&self.base, &["category", name])
            .with_query_param("page", &page.to_string());
        let kind = RequestKind::Catalog {
            kind: CatalogKind::Category,
            page,
        };
        self.request(url, RequestOptions::get(), kind, 0, now)
    }

    pub(crate) fn get_movie(&mut self, id: &str, generation: u64, now: f64) -> FetchOutcome {
        let url = Url::from_segments(&self.base, &["movie", id]);
        let kind = RequestKind::Load(LoadStep::Movie { id: id.to_owned() });
        self.request(url, RequestOptions::get(), kind, generation, now)
    }

    pub(crate) fn get_series(&mut self, id: &str, generation: u64, now: f64) -> FetchOutcome {
        let url = Url::from_segments(&self.base, &["series", id]);
        let kind = RequestKind::Load(LoadStep::Series { id: id.to_owned() });
        self.request(url, RequestOptions::get(), kind, generation, now)
    }

    pub(crate) fn get_sources(
        &mut self,
        content_id: &str,
        generation: u64,
        now: f64,
    ) -> FetchOutcome {
        let url = Url::from_segments(&self.base, &["watch", content_id]);
        let kind = RequestKind::Load(LoadStep::Sources {
            content_id: content_id.to_owned(),
        });
        self.request(url, RequestOptions::get(), kind, generation, now)
    }

    fn request(
        &mut self,
        url: Url,
        options: RequestOptions,
        kind: RequestKind,
        generation: u64,
        now: f64,
    ) -> FetchOutcome {
        let signature = request_signature(&url, &options);
        if let RequestKind::Load(_) = kind {
            if self.load_signatures.0 != generation {
                self.load_signatures = (generation, vec![]);
            }
            self.load_signatures.1.push(signature.clone());
        }
        if let Some(value) = self.cache.get(&signature, now) {
            Logger::debug(&format!("Client: Serving {url} from cache"));
            return FetchOutcome::Cached(FinishedRequest {
                kind,
                generation,
                result: Ok(value.clone()),
            });
        }
        Logger::debug(&format!("Client: Fetching {url}"));
        let request_id = self.fetcher.fetch(url.get_ref(), &options);
        self.pending_requests.push(PendingRequest {
            request_id,
            signature,
            url,
            kind,
            generation,
        });
        FetchOutcome::Pending(request_id)
    }

    /// Method to call once a request started by the `Fetcher` finished with success, with the
    /// response's body.
    ///
    /// Returns `None` if that request is unknown.
    pub(crate) fn on_request_succeeded(
        &mut self,
        request_id: RequestId,
        body: &str,
        now: f64,
    ) -> Option<FinishedRequest> {
        let request = self.take_pending(request_id)?;
        let result = match serde_json::from_str::<Value>(body) {
            Ok(value) => {
                self.cache.insert(request.signature, value.clone(), now);
                Ok(value)
            }
            Err(err) => {
                Logger::warn(&format!("Client: Invalid JSON received from {}", request.url));
                Err(RequestError::Parsing {
                    message: err.to_string(),
                })
            }
        };
        Some(FinishedRequest {
            kind: request.kind,
            generation: request.generation,
            result,
        })
    }

    /// Method to call once a request started by the `Fetcher` failed.
    ///
    /// Returns `None` if that request is unknown.
    pub(crate) fn on_request_failed(
        &mut self,
        request_id: RequestId,
        has_timeouted: bool,
        status: Option<u32>,
    ) -> Option<FinishedRequest> {
        let request = self.take_pending(request_id)?;
        let error = match status {
            Some(status) => RequestError::Status { status },
            None if has_timeouted => RequestError::Timeout,
            None => RequestError::Network,
        };
        Logger::warn(&format!("Client: Request to {} failed: {error}", request.url));
        Some(FinishedRequest {
            kind: request.kind,
            generation: request.generation,
            result: Err(error),
        })
    }

    fn take_pending(&mut self, request_id: RequestId) -> Option<PendingRequest> {
        match self
            .pending_requests
            .iter()
            .position(|r| r.request_id == request_id)
        {
            Some(idx) => Some(self.pending_requests.remove(idx)),
            None => {
                Logger::debug(&format!("Client: Unknown request {request_id} finished"));
                None
            }
        }
    }
}

/// Key identifying a request in the cache: its URL followed by its serialized options.
fn request_signature(url: &Url, options: &RequestOptions) -> String {
    let options = serde_json::to_string(options).unwrap_or_default();
    format!("{url}|{options}")
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct RecordingFetcher {
        calls: Rc<RefCell<Vec<(String, RequestOptions)>>>,
    }

    impl Fetcher for RecordingFetcher {
        fn fetch(&mut self, url: &str, options: &RequestOptions) -> RequestId {
            let mut calls = self.calls.borrow_mut();
            calls.push((url.to_owned(), options.clone()));
            calls.len() as RequestId
        }
    }

    fn client() -> (ContentClient, Rc<RefCell<Vec<(String, RequestOptions)>>>) {
        let fetcher = RecordingFetcher::default();
        let calls = fetcher.calls.clone();
        (ContentClient::new(Box::new(fetcher)), calls)
    }

    fn pending_id(outcome: FetchOutcome) -> RequestId {
        match outcome {
            FetchOutcome::Pending(id) => id,
            FetchOutcome::Cached(_) => panic!("unexpected cache hit"),
        }
    }

    #[test]
    fn test_endpoints() {
        let (mut client, calls) = client();
        client.get_home(2, 0.);
        client.search("the office", 1, 0.);
        client.get_category("action movies", 3, 0.);
        client.get_movie("m1", 1, 0.);
        client.get_series("s1", 1, 0.);
        client.get_sources("e1", 1, 0.);
        let calls = calls.borrow();
        let urls: Vec<&str> = calls.iter().map(|(u, _)| u.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "/api/home?page=2",
                "/api/search",
                "/api/category/action%20movies?page=3",
                "/api/movie/m1",
                "/api/series/s1",
                "/api/watch/e1",
            ]
        );
        assert_eq!(calls[1].1.method, HttpMethod::Post);
        let body: Value = serde_json::from_str(calls[1].1.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({ "query": "the office", "page": 1 }));
        assert_eq!(client.pending_count(), 6);
    }

    #[test]
    fn test_response_is_cached() {
        let (mut client, calls) = client();
        let id = pending_id(client.get_movie("m1", 1, 0.));
        let finished = client
            .on_request_succeeded(id, r#"{"id":"m1","title":"M"}"#, 1000.)
            .unwrap();
        assert_eq!(
            finished.kind,
            RequestKind::Load(LoadStep::Movie { id: "m1".to_owned() })
        );
        assert_eq!(finished.generation, 1);
        assert_eq!(client.pending_count(), 0);

        match client.get_movie("m1", 2, 1000. + DEFAULT_CACHE_TTL_MS - 1.) {
            FetchOutcome::Cached(f) => {
                assert_eq!(f.generation, 2);
                assert_eq!(f.result.unwrap()["title"], json!("M"));
            }
            FetchOutcome::Pending(_) => panic!("expected a cache hit"),
        }
        assert_eq!(calls.borrow().len(), 1);

        pending_id(client.get_movie("m1", 3, 1000. + DEFAULT_CACHE_TTL_MS));
        assert_eq!(calls.borrow().len(), 2);
    }

    #[test]
    fn test_signature_includes_options() {
        let (mut client, calls) = client();
        let id = pending_id(client.search("a", 1, 0.));
        client.on_request_succeeded(id, "[]", 0.);
        pending_id(client.search("a", 2, 0.));
        pending_id(client.search("b", 1, 0.));
        assert!(matches!(client.search("a", 1, 0.), FetchOutcome::Cached(_)));
        assert_eq!(calls.borrow().len(), 3);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let (mut client, calls) = client();
        let id = pending_id(client.get_sources("e1", 1, 0.));
        let finished = client.on_request_failed(id, false, Some(404)).unwrap();
        assert_eq!(finished.result, Err(RequestError::Status { status: 404 }));

        let id = pending_id(client.get_sources("e1", 1, 0.));
        let finished = client.on_request_succeeded(id, "<html>", 0.).unwrap();
        assert!(matches!(finished.result, Err(RequestError::Parsing { .. })));

        let id = pending_id(client.get_sources("e1", 1, 0.));
        let finished = client.on_request_failed(id, true, None).unwrap();
        assert_eq!(finished.result, Err(RequestError::Timeout));
        assert_eq!(calls.borrow().len(), 3);
    }

    #[test]
    fn test_unknown_request() {
        let (mut client, _) = client();
        assert!(client.on_request_succeeded(42, "{}", 0.).is_none());
        assert!(client.on_request_failed(42, false, None).is_none());
    }

    #[test]
    fn test_invalidate_load_keeps_other_responses() {
        let (mut client, calls) = client();
        let id = pending_id(client.get_home(1, 0.));
        client.on_request_succeeded(id, "{}", 0.);
        let id = pending_id(client.get_movie("m1", 1, 0.));
        client.on_request_succeeded(id, r#"{"id":"m1","title":"M"}"#, 0.);
        let id = pending_id(client.get_sources("m1", 1, 0.));
        client.on_request_succeeded(id, "[]", 0.);
        let id = pending_id(client.get_movie("m2", 2, 0.));
        client.on_request_succeeded(id, r#"{"id":"m2","title":"N"}"#, 0.);

        // Only the last load can be invalidated
        client.invalidate_load(1);
        assert!(matches!(client.get_sources("m1", 3, 0.), FetchOutcome::Cached(_)));

        client.invalidate_load(3);
        assert!(matches!(client.get_home(1, 0.), FetchOutcome::Cached(_)));
        assert!(matches!(client.get_movie("m2", 4, 0.), FetchOutcome::Cached(_)));
        assert!(matches!(client.get_movie("m1", 4, 0.), FetchOutcome::Cached(_)));
        pending_id(client.get_sources("m1", 4, 0.));
        assert_eq!(calls.borrow().len(), 5);
    }

    #[test]
    fn test_abandon_superseded_loads() {
        let (mut client, _) = client();
        let home = pending_id(client.get_home(1, 0.));
        let old = pending_id(client.get_movie("m1", 1, 0.));
        let current = pending_id(client.get_movie("m2", 2, 0.));
        client.abandon_loads_before(2);
        assert_eq!(client.pending_count(), 2);
        assert!(client.on_request_succeeded(old, "{}", 0.).is_none());
        assert!(client.on_request_succeeded(home, "{}", 0.).is_some());
        assert!(client.on_request_succeeded(current, "{}", 0.).is_some());
        assert_eq!(client.pending_count(), 0);
    }

    #[test]
    fn test_clear_cache() {
        let (mut client, calls) = client();
        let id = pending_id(client.get_home(1, 0.));
        client.on_request_succeeded(id, "{}", 0.);
        client.clear_cache();
        pending_id(client.get_home(1, 0.));
        assert_eq!(calls.borrow().len(), 2);
    }
}
