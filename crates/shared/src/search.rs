//! City search: the state a search can leave the page in, and the controller
//! that turns a query into one of those states.

use crate::models::{Candidate, Coordinates};

pub const NOT_FOUND_MESSAGE: &str = "City not found. Please enter a valid city name.";
pub const FAILED_MESSAGE: &str = "Error fetching location. Try again later.";

/// Outcome of the most recent completed search.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SearchState {
    /// Nothing searched yet.
    #[default]
    Idle,
    Found(Coordinates),
    NotFound,
    Failed,
}

impl SearchState {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            SearchState::Found(c) => Some(*c),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            SearchState::NotFound => Some(NOT_FOUND_MESSAGE),
            SearchState::Failed => Some(FAILED_MESSAGE),
            SearchState::Idle | SearchState::Found(_) => None,
        }
    }
}

/// Anything that can go wrong between sending the request and holding a
/// usable coordinate pair.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("geocoder returned status {0}")]
    Status(u16),
    #[error("failed to decode geocoder response: {0}")]
    Decode(String),
    #[error("invalid {field}: {value:?}")]
    InvalidCoordinate { field: &'static str, value: String },
}

/// A geocoding provider: free-text query in, candidate list out.
///
/// Implementations should ask for at most one candidate; only the first is
/// ever used.
#[allow(async_fn_in_trait)]
pub trait Geocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<Candidate>, GeocodeError>;
}

/// Trimmed query, or `None` when there is nothing to search for.
pub fn normalize_query(query: &str) -> Option<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_coordinate(field: &'static str, value: &str) -> Result<f64, GeocodeError> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(GeocodeError::InvalidCoordinate {
            field,
            value: value.to_string(),
        }),
    }
}

/// Coordinates of the first candidate, `None` when the list is empty.
pub fn first_coordinates(candidates: &[Candidate]) -> Result<Option<Coordinates>, GeocodeError> {
    let Some(first) = candidates.first() else {
        return Ok(None);
    };
    let lat = parse_coordinate("lat", &first.lat)?;
    let lon = parse_coordinate("lon", &first.lon)?;
    Ok(Some(Coordinates::new(lat, lon)))
}

/// Map a provider response onto the state it leaves the page in.
///
/// Faults are logged here and go no further.
pub fn classify(query: &str, result: Result<Vec<Candidate>, GeocodeError>) -> SearchState {
    match result.and_then(|candidates| first_coordinates(&candidates)) {
        Ok(Some(coords)) => {
            tracing::debug!(query, %coords, "resolved city");
            SearchState::Found(coords)
        }
        Ok(None) => {
            tracing::debug!(query, "no candidates");
            SearchState::NotFound
        }
        Err(err) => {
            tracing::warn!(query, error = %err, "geocoding failed");
            SearchState::Failed
        }
    }
}

pub struct SearchController<G> {
    geocoder: G,
}

impl<G: Geocoder> SearchController<G> {
    pub fn new(geocoder: G) -> Self {
        Self { geocoder }
    }

    /// Run one search. Returns `None` for a blank query, in which case no
    /// request is made and the caller must leave its state alone.
    ///
    /// Overlapping calls are independent: whichever completes last is the one
    /// the caller ends up applying.
    pub async fn submit_search(&self, query: &str) -> Option<SearchState> {
        let query = normalize_query(query)?;
        let result = self.geocoder.geocode(query).await;
        Some(classify(query, result))
    }
}

/// Page-level state: what the user typed and where the last search landed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchSession {
    pub query: String,
    pub state: SearchState,
}

impl SearchSession {
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Replace the state wholesale with a completed search's result.
    pub fn apply(&mut self, outcome: Option<SearchState>) {
        if let Some(state) = outcome {
            self.state = state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use tokio::sync::oneshot;

    fn candidate(lat: &str, lon: &str) -> Candidate {
        Candidate {
            lat: lat.to_string(),
            lon: lon.to_string(),
        }
    }

    /// Answers from a fixed table and counts calls.
    #[derive(Default)]
    struct FakeGeocoder {
        answers: HashMap<String, Vec<Candidate>>,
        calls: Cell<usize>,
    }

    impl FakeGeocoder {
        fn with(mut self, query: &str, candidates: Vec<Candidate>) -> Self {
            self.answers.insert(query.to_string(), candidates);
            self
        }
    }

    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, query: &str) -> Result<Vec<Candidate>, GeocodeError> {
            self.calls.set(self.calls.get() + 1);
            match self.answers.get(query) {
                Some(c) => Ok(c.clone()),
                None => Err(GeocodeError::Transport("connection refused".to_string())),
            }
        }
    }

    /// Each query blocks until the test releases it, so completion order is
    /// controlled independently of submission order.
    struct GatedGeocoder {
        gates: RefCell<HashMap<String, oneshot::Receiver<Vec<Candidate>>>>,
    }

    impl Geocoder for GatedGeocoder {
        async fn geocode(&self, query: &str) -> Result<Vec<Candidate>, GeocodeError> {
            let rx = self
                .gates
                .borrow_mut()
                .remove(query)
                .ok_or_else(|| GeocodeError::Transport("no gate".to_string()))?;
            rx.await.map_err(|e| GeocodeError::Transport(e.to_string()))
        }
    }

    #[tokio::test]
    async fn test_empty_query_is_noop() {
        let controller = SearchController::new(FakeGeocoder::default());
        let mut session = SearchSession {
            query: String::new(),
            state: SearchState::NotFound,
        };
        let before = session.clone();

        session.apply(controller.submit_search(&session.query.clone()).await);

        assert_eq!(session, before);
        assert_eq!(controller.geocoder.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_whitespace_query_is_noop() {
        let controller = SearchController::new(FakeGeocoder::default());
        assert_eq!(controller.submit_search("   \t").await, None);
        assert_eq!(controller.geocoder.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_found_sets_coordinates_and_clears_error() {
        let geocoder = FakeGeocoder::default().with("Paris", vec![candidate("48.8566", "2.3522")]);
        let controller = SearchController::new(geocoder);
        let mut session = SearchSession {
            query: "Paris".to_string(),
            state: SearchState::Failed,
        };

        session.apply(controller.submit_search("Paris").await);

        assert_eq!(session.state, SearchState::Found(Coordinates::new(48.8566, 2.3522)));
        assert_eq!(session.state.error_message(), None);
        assert_eq!(session.query, "Paris");
    }

    #[tokio::test]
    async fn test_query_is_trimmed_before_request() {
        let geocoder = FakeGeocoder::default().with("Paris", vec![candidate("48.8566", "2.3522")]);
        let controller = SearchController::new(geocoder);
        let state = controller.submit_search("  Paris ").await;
        assert!(matches!(state, Some(SearchState::Found(_))));
    }

    #[tokio::test]
    async fn test_empty_result_is_not_found() {
        let controller = SearchController::new(FakeGeocoder::default().with("Atlantis", vec![]));
        let mut session = SearchSession::default();
        session.apply(Some(SearchState::Found(Coordinates::new(1.0, 2.0))));

        session.apply(controller.submit_search("Atlantis").await);

        assert_eq!(session.state, SearchState::NotFound);
        assert_eq!(session.state.coordinates(), None);
        assert_eq!(session.state.error_message(), Some(NOT_FOUND_MESSAGE));
    }

    #[tokio::test]
    async fn test_transport_fault_is_failed() {
        let controller = SearchController::new(FakeGeocoder::default());
        let state = controller.submit_search("X").await;
        assert_eq!(state, Some(SearchState::Failed));
        assert_eq!(SearchState::Failed.error_message(), Some(FAILED_MESSAGE));
        assert_eq!(SearchState::Failed.coordinates(), None);
    }

    /// Always answers with the given HTTP status fault.
    struct StatusGeocoder(u16);

    impl Geocoder for StatusGeocoder {
        async fn geocode(&self, _query: &str) -> Result<Vec<Candidate>, GeocodeError> {
            Err(GeocodeError::Status(self.0))
        }
    }

    #[tokio::test]
    async fn test_status_fault_is_failed() {
        let controller = SearchController::new(StatusGeocoder(503));
        let mut session = SearchSession::default();
        session.apply(Some(SearchState::Found(Coordinates::new(1.0, 2.0))));

        session.apply(controller.submit_search("Paris").await);

        assert_eq!(session.state, SearchState::Failed);
        assert_eq!(session.state.coordinates(), None);
        assert_eq!(session.state.error_message(), Some(FAILED_MESSAGE));
    }

    #[test]
    fn test_classify_status_error() {
        assert_eq!(
            classify("Paris", Err(GeocodeError::Status(429))),
            SearchState::Failed
        );
    }

    #[tokio::test]
    async fn test_non_numeric_coordinate_is_failed() {
        let geocoder = FakeGeocoder::default().with("Nowhere", vec![candidate("north", "2.0")]);
        let controller = SearchController::new(geocoder);
        assert_eq!(controller.submit_search("Nowhere").await, Some(SearchState::Failed));
    }

    #[tokio::test]
    async fn test_repeated_search_is_idempotent() {
        let geocoder = FakeGeocoder::default().with("Paris", vec![candidate("48.8566", "2.3522")]);
        let controller = SearchController::new(geocoder);
        let mut session = SearchSession::default();

        session.apply(controller.submit_search("Paris").await);
        let first = session.state;
        session.apply(controller.submit_search("Paris").await);

        assert_eq!(session.state, first);
        assert_eq!(controller.geocoder.calls.get(), 2);
    }

    #[tokio::test]
    async fn test_last_arrival_wins() {
        let (tx_a, rx_a) = oneshot::channel();
        let (tx_b, rx_b) = oneshot::channel();
        let geocoder = GatedGeocoder {
            gates: RefCell::new(HashMap::from([
                ("Slowtown".to_string(), rx_a),
                ("Fastville".to_string(), rx_b),
            ])),
        };
        let controller = SearchController::new(geocoder);
        let session = RefCell::new(SearchSession::default());

        let search_a = async {
            let outcome = controller.submit_search("Slowtown").await;
            session.borrow_mut().apply(outcome);
        };
        let search_b = async {
            let outcome = controller.submit_search("Fastville").await;
            session.borrow_mut().apply(outcome);
        };
        let network = async {
            tokio::task::yield_now().await;
            // B answers first, then A
            tx_b.send(vec![candidate("10.0", "20.0")]).unwrap();
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;
            tx_a.send(vec![candidate("30.0", "40.0")]).unwrap();
        };

        tokio::join!(search_a, search_b, network);

        assert_eq!(
            session.borrow().state,
            SearchState::Found(Coordinates::new(30.0, 40.0))
        );
    }

    #[test]
    fn test_first_coordinates_uses_first_only() {
        let got = first_coordinates(&[candidate("1.5", "2.5"), candidate("nope", "nope")]).unwrap();
        assert_eq!(got, Some(Coordinates::new(1.5, 2.5)));
    }

    #[test]
    fn test_first_coordinates_rejects_non_finite() {
        let err = first_coordinates(&[candidate("NaN", "2.5")]).unwrap_err();
        assert!(matches!(err, GeocodeError::InvalidCoordinate { field: "lat", .. }));
    }

    #[test]
    fn test_idle_has_neither_field() {
        assert_eq!(SearchState::Idle.coordinates(), None);
        assert_eq!(SearchState::Idle.error_message(), None);
    }
}
