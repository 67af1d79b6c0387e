//! Retrieval coordination: cache, single-flight, and distance filtering.
//!
//! [`RetrievalCoordinator`] orchestrates the whole pipeline for one
//! logical consumer (one visible map or session): cache lookup, bounding
//! box and query construction, request issuance, response normalization,
//! exact distance filtering, and cache population.
//!
//! # Single-flight by supersession
//!
//! At most one request is in flight per coordinator at any time. A new
//! call that misses the cache cancels the previous in-flight request
//! before issuing its own; the superseded request observes its
//! cancellation token, or, if its response arrives anyway, fails the
//! identity check against the current pending request and discards the
//! result. The pending request is an explicit per-coordinator field, so
//! independent coordinators never interfere with each other.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{cache_key, CacheLayer, MemoryStore, Store};
use crate::config::RetrievalConfig;
use crate::geo::{self, Coordinate};
use crate::overpass::{self, OverpassResponse, OverpassTransport, ReqwestTransport, TransportError};
use crate::poi::{Poi, PoiCategory};

/// Cache key prefix for POI result sets.
const POI_KEY_PREFIX: &str = "pois";

/// Errors observed while retrieving POIs.
///
/// These never abort a caller: the coordinator folds them into
/// [`RetrievalOutcome::Failed`] and logs the detail. They exist so the
/// outcome is distinguishable from a legitimately empty result.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Transport-level failure: unreachable service, non-success status,
    /// unreadable body.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body was not valid Overpass JSON.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Outcome of one retrieval call.
///
/// An explicit outcome rather than a bare list, so callers can tell "no
/// POIs exist here" apart from "the retrieval was superseded or failed".
/// Callers that do not care use [`RetrievalOutcome::into_pois`].
#[derive(Debug)]
pub enum RetrievalOutcome {
    /// The retrieval ran to completion; the list may legitimately be
    /// empty. Cache hits and the empty-route short circuit land here.
    Complete(Vec<Poi>),

    /// This call was superseded by a newer one before completing.
    /// Nothing was cached.
    Cancelled,

    /// The retrieval failed; the cause has been logged. Nothing was
    /// cached.
    Failed(RetrievalError),
}

impl RetrievalOutcome {
    /// Collapses the outcome into a POI list, empty on cancellation or
    /// failure. This is the lossy view callers historically relied on.
    pub fn into_pois(self) -> Vec<Poi> {
        match self {
            RetrievalOutcome::Complete(pois) => pois,
            RetrievalOutcome::Cancelled | RetrievalOutcome::Failed(_) => Vec::new(),
        }
    }

    /// True if the retrieval ran to completion.
    pub fn is_complete(&self) -> bool {
        matches!(self, RetrievalOutcome::Complete(_))
    }
}

/// The single outstanding request of a coordinator.
///
/// Superseded instances are cancelled and discarded, never reused.
struct PendingRequest {
    id: u64,
    token: CancellationToken,
    issued_at: Instant,
}

/// Orchestrates POI retrieval for one logical consumer.
pub struct RetrievalCoordinator {
    transport: Arc<dyn OverpassTransport>,
    cache: CacheLayer,
    config: RetrievalConfig,
    pending: Mutex<Option<PendingRequest>>,
    next_request_id: AtomicU64,
}

impl RetrievalCoordinator {
    /// Creates a coordinator over the given transport and store with the
    /// given configuration.
    pub fn with_config(
        transport: Arc<dyn OverpassTransport>,
        store: Arc<dyn Store>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            transport,
            cache: CacheLayer::new(store),
            config,
            pending: Mutex::new(None),
            next_request_id: AtomicU64::new(0),
        }
    }

    /// Creates a coordinator over the given transport and store with
    /// default configuration.
    pub fn new(transport: Arc<dyn OverpassTransport>, store: Arc<dyn Store>) -> Self {
        Self::with_config(transport, store, RetrievalConfig::default())
    }

    /// Creates a coordinator with the real Overpass transport and an
    /// in-memory store.
    pub fn try_new(config: RetrievalConfig) -> Result<Self, TransportError> {
        let transport = Arc::new(ReqwestTransport::new(config.request_timeout)?);
        Ok(Self::with_config(transport, Arc::new(MemoryStore::new()), config))
    }

    /// Access to the underlying cache layer, e.g. for explicit clearing.
    pub fn cache(&self) -> &CacheLayer {
        &self.cache
    }

    /// Fetches all POIs of the requested categories within
    /// `buffer_distance_m` meters of the route.
    ///
    /// The route is an ordered coordinate sequence; consecutive pairs
    /// define the segments distance is measured against. A single
    /// coordinate is a "near me" search measured point-to-point. An empty
    /// route completes immediately with no network or cache access.
    ///
    /// The cache key covers the route and buffer distance only; the
    /// requested categories are assumed fixed per deployment and do not
    /// partition the cache.
    pub async fn fetch_pois_along_route(
        &self,
        route: &[Coordinate],
        buffer_distance_m: f64,
        categories: &[PoiCategory],
    ) -> RetrievalOutcome {
        if route.is_empty() {
            debug!("empty route, nothing to fetch");
            return RetrievalOutcome::Complete(Vec::new());
        }

        let key = cache_key(POI_KEY_PREFIX, &(route, buffer_distance_m));

        if let Some(pois) = self.cache.get::<Vec<Poi>>(&key).await {
            debug!(key, count = pois.len(), "returning cached POIs");
            return RetrievalOutcome::Complete(pois);
        }

        info!(
            points = route.len(),
            buffer_m = buffer_distance_m,
            "fetching POIs from Overpass"
        );

        // Supersede any request still in flight: cancel it and claim the
        // pending slot for this call.
        let (request_id, token) = self.begin_request();

        // Route is non-empty, so a box always exists
        let bbox = match geo::bounding_box(route, buffer_distance_m) {
            Some(bbox) => bbox,
            None => return RetrievalOutcome::Complete(Vec::new()),
        };
        let query = overpass::build_query(categories, &bbox);

        let started = Instant::now();
        let response = tokio::select! {
            _ = token.cancelled() => {
                debug!(request_id, "request superseded while in flight");
                return RetrievalOutcome::Cancelled;
            }
            response = self.transport.post(&self.config.endpoint, query) => response,
        };

        // The response may have raced a supersession: only the request
        // still holding the pending slot may act on its result.
        if !self.is_current(request_id) {
            debug!(request_id, "discarding response of superseded request");
            return RetrievalOutcome::Cancelled;
        }

        let outcome = match response {
            Ok(body) => self
                .process_response(&body, route, buffer_distance_m, categories, &key)
                .await,
            Err(e) => {
                warn!(error = %e, "Overpass request failed");
                RetrievalOutcome::Failed(e.into())
            }
        };

        debug!(
            request_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request finished"
        );
        self.finish_request(request_id);
        outcome
    }

    /// Normalizes, filters and caches a successful response body.
    async fn process_response(
        &self,
        body: &[u8],
        route: &[Coordinate],
        buffer_distance_m: f64,
        categories: &[PoiCategory],
        key: &str,
    ) -> RetrievalOutcome {
        let parsed: OverpassResponse = match serde_json::from_slice(body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Overpass response body unparseable");
                return RetrievalOutcome::Failed(RetrievalError::Malformed(e.to_string()));
            }
        };

        let raw_count = parsed.elements.len();
        let pois = overpass::normalize(parsed.elements, categories);
        let filtered = filter_by_distance(pois, route, buffer_distance_m);

        info!(
            raw = raw_count,
            filtered = filtered.len(),
            "POIs within buffer"
        );

        self.cache.set(key, &filtered, self.config.cache_ttl).await;
        RetrievalOutcome::Complete(filtered)
    }

    /// Cancels the outstanding request, if any, and installs a fresh
    /// pending request. Returns its id and token.
    fn begin_request(&self) -> (u64, CancellationToken) {
        let id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();

        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            debug!(
                superseded = previous.id,
                by = id,
                in_flight_ms = previous.issued_at.elapsed().as_millis() as u64,
                "cancelling previous request"
            );
            previous.token.cancel();
        }
        *pending = Some(PendingRequest {
            id,
            token: token.clone(),
            issued_at: Instant::now(),
        });

        (id, token)
    }

    /// True if the given request still owns the pending slot.
    fn is_current(&self, request_id: u64) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|pending| pending.id == request_id)
    }

    /// Clears the pending slot if this request still owns it.
    fn finish_request(&self, request_id: u64) {
        let mut pending = self.pending.lock();
        if pending.as_ref().is_some_and(|p| p.id == request_id) {
            *pending = None;
        }
    }
}

/// Keeps only POIs within the buffer distance of the route.
///
/// Single-coordinate routes are measured point-to-point; longer routes by
/// the minimum distance to any segment.
fn filter_by_distance(pois: Vec<Poi>, route: &[Coordinate], buffer_distance_m: f64) -> Vec<Poi> {
    pois.into_iter()
        .filter(|poi| {
            let min_distance = if route.len() == 1 {
                geo::distance(poi.coordinate, route[0])
            } else {
                geo::min_distance_to_route(poi.coordinate, route)
            };
            min_distance <= buffer_distance_m
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn poi_at(id: &str, lon: f64, lat: f64) -> Poi {
        Poi {
            id: id.to_string(),
            coordinate: Coordinate::new(lon, lat),
            category: PoiCategory::Fuel,
            name: None,
            tags: BTreeMap::new(),
        }
    }

    #[test]
    fn test_outcome_into_pois_complete() {
        let outcome = RetrievalOutcome::Complete(vec![poi_at("poi-1", 13.0, 52.0)]);
        assert_eq!(outcome.into_pois().len(), 1);
    }

    #[test]
    fn test_outcome_into_pois_cancelled_and_failed_are_empty() {
        assert!(RetrievalOutcome::Cancelled.into_pois().is_empty());
        let failed = RetrievalOutcome::Failed(RetrievalError::Malformed("x".to_string()));
        assert!(failed.into_pois().is_empty());
        assert!(!RetrievalOutcome::Cancelled.is_complete());
    }

    #[test]
    fn test_filter_single_point_route_uses_point_distance() {
        let route = [Coordinate::new(13.0, 52.0)];
        let pois = vec![
            poi_at("near", 13.001, 52.0),  // ~111m away
            poi_at("far", 13.02, 52.0),    // ~2220m away
        ];

        let kept = filter_by_distance(pois, &route, 500.0);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "near");
    }

    #[test]
    fn test_filter_route_uses_segment_distance() {
        let route = [Coordinate::new(13.0, 52.0), Coordinate::new(13.1, 52.0)];
        let pois = vec![
            // Near the middle of the segment, but far from both endpoints
            poi_at("mid", 13.05, 52.001),
            poi_at("off", 13.05, 52.05),
        ];

        let kept = filter_by_distance(pois, &route, 200.0);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "mid");
    }

    #[test]
    fn test_filter_threshold_is_inclusive() {
        let route = [Coordinate::new(13.0, 52.0)];
        // Exactly 111 meters east
        let pois = vec![poi_at("edge", 13.001, 52.0)];
        let distance = geo::distance(pois[0].coordinate, route[0]);

        let kept = filter_by_distance(pois, &route, distance);
        assert_eq!(kept.len(), 1);
    }
}
