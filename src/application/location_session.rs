// Location session - Keeps the current location and its reading consistent
use crate::application::gateway::AirQualityGateway;
use crate::domain::air_quality::AirQualityReading;
use crate::domain::aqi::AqiLevel;
use crate::domain::location::Coordinate;
use crate::domain::session::SessionState;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinSet;

/// Owns the single `SessionState` and the fetches it triggers.
///
/// Every selection bumps a generation counter; a fetch lands only if its
/// generation is still the latest when it resolves, so results are applied
/// in selection order regardless of response arrival order. Superseded
/// fetches are left to finish and their results dropped.
#[derive(Clone)]
pub struct LocationSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    gateway: AirQualityGateway,
    state: watch::Sender<SessionState>,
    fetches: Mutex<Fetches>,
}

struct Fetches {
    generation: u64,
    tasks: JoinSet<()>,
    closed: bool,
}

impl LocationSession {
    pub fn new(gateway: AirQualityGateway, default_location: Coordinate, default_name: String) -> Self {
        let (state, _) = watch::channel(SessionState::new(default_location, default_name));
        Self {
            inner: Arc::new(SessionInner {
                gateway,
                state,
                fetches: Mutex::new(Fetches {
                    generation: 0,
                    tasks: JoinSet::new(),
                    closed: false,
                }),
            }),
        }
    }

    /// Fetch data for the location the session was created with.
    pub fn start(&self) {
        let location = self.inner.state.borrow().current_location;
        tracing::info!(
            latitude = location.latitude,
            longitude = location.longitude,
            "Starting location session"
        );
        self.select_location(location);
    }

    /// Point the session at a new location. Returns immediately; the reading
    /// arrives through `subscribe`.
    pub fn select_location(&self, coordinate: Coordinate) {
        let mut fetches = self.inner.lock_fetches();
        if fetches.closed {
            tracing::debug!("Session closed, ignoring location select");
            return;
        }

        fetches.generation += 1;
        let generation = fetches.generation;

        self.inner.state.send_modify(|s| {
            s.current_location = coordinate;
            s.is_loading = true;
        });

        // Reap fetches that already finished
        while fetches.tasks.try_join_next().is_some() {}

        tracing::debug!(
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            generation,
            "Fetching location data"
        );

        let inner = Arc::clone(&self.inner);
        fetches.tasks.spawn(async move {
            let (reading, name) = tokio::join!(
                inner.gateway.fetch_current(coordinate),
                inner.gateway.location_name(coordinate)
            );
            inner.complete(generation, reading, name);
        });
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn current_level(&self) -> AqiLevel {
        self.inner.state.borrow().current_level()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Abort outstanding fetches. Later selections are ignored.
    pub fn shutdown(&self) {
        let mut fetches = self.inner.lock_fetches();
        if fetches.closed {
            return;
        }
        fetches.closed = true;
        fetches.tasks.abort_all();
        self.inner.state.send_modify(|s| s.is_loading = false);
        tracing::info!("Location session shut down");
    }
}

impl SessionInner {
    fn lock_fetches(&self) -> MutexGuard<'_, Fetches> {
        self.fetches.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn complete(&self, generation: u64, reading: AirQualityReading, name: String) {
        let fetches = self.lock_fetches();
        if fetches.closed || fetches.generation != generation {
            tracing::debug!(
                generation,
                latest = fetches.generation,
                "Discarding stale location data"
            );
            return;
        }

        self.state.send_modify(|s| {
            s.last_error = reading.failure();
            s.latest_reading = Some(reading);
            s.location_name = name;
            s.is_loading = false;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{FakeAirQuality, FakeGeocoding};
    use crate::domain::air_quality::ErrorKind;
    use std::time::Duration;

    const LONDON: Coordinate = Coordinate::new(51.5074, -0.1278);
    const PARIS: Coordinate = Coordinate::new(48.8566, 2.3522);
    const BERLIN: Coordinate = Coordinate::new(52.52, 13.405);

    fn session(air: FakeAirQuality, geo: FakeGeocoding) -> LocationSession {
        let gateway = AirQualityGateway::new(Arc::new(air), Arc::new(geo), 5);
        LocationSession::new(gateway, LONDON, "London".to_string())
    }

    async fn settle(session: &LocationSession) -> SessionState {
        let mut rx = session.subscribe();
        let state = rx.wait_for(|s| !s.is_loading).await.unwrap().clone();
        state
    }

    #[tokio::test(start_paused = true)]
    async fn test_startup_fetches_default_location() {
        let geo = FakeGeocoding::default().with_name(LONDON, "Westminster, London");
        let s = session(FakeAirQuality::with_aqi(18), geo);

        assert!(!s.snapshot().is_loading);
        assert!(s.snapshot().latest_reading.is_none());

        s.start();
        assert!(s.snapshot().is_loading);

        let state = settle(&s).await;
        let reading = state.latest_reading.unwrap();
        assert_eq!(reading.coordinate, LONDON);
        assert_eq!(state.location_name, "Westminster, London");
        assert_eq!(state.last_error, None);
        assert_eq!(s.current_level(), AqiLevel::Good);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_earlier_fetch_is_discarded() {
        let air = FakeAirQuality::with_aqi(30)
            .with_delay(PARIS, Duration::from_millis(1000))
            .with_delay(BERLIN, Duration::from_millis(10));
        let s = session(air, FakeGeocoding::default());

        s.select_location(PARIS);
        s.select_location(BERLIN);
        assert_eq!(s.snapshot().current_location, BERLIN);

        let state = settle(&s).await;
        assert_eq!(state.latest_reading.unwrap().coordinate, BERLIN);

        // Let the Paris response arrive
        tokio::time::sleep(Duration::from_millis(2000)).await;
        let state = s.snapshot();
        assert_eq!(state.current_location, BERLIN);
        assert_eq!(state.latest_reading.unwrap().coordinate, BERLIN);
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_earlier_fetch_does_not_end_loading() {
        let air = FakeAirQuality::with_aqi(30)
            .with_delay(PARIS, Duration::from_millis(10))
            .with_delay(BERLIN, Duration::from_millis(1000));
        let s = session(air, FakeGeocoding::default());

        s.select_location(PARIS);
        s.select_location(BERLIN);

        tokio::time::sleep(Duration::from_millis(100)).await;
        let state = s.snapshot();
        assert!(state.is_loading);
        assert!(state.latest_reading.is_none());

        let state = settle(&s).await;
        assert_eq!(state.latest_reading.unwrap().coordinate, BERLIN);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_selection_last_issued_wins() {
        let air = FakeAirQuality::with_aqi(10)
            .numbered()
            .with_call_delays(&[Duration::from_millis(1000), Duration::from_millis(10)]);
        let s = session(air, FakeGeocoding::default());

        s.select_location(PARIS);
        s.select_location(PARIS);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        let reading = s.snapshot().latest_reading.unwrap();
        assert_eq!(reading.coordinate, PARIS);
        assert_eq!(reading.european_aqi, Some(11));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_selection_is_idempotent() {
        let once = session(FakeAirQuality::with_aqi(55), FakeGeocoding::default());
        once.select_location(PARIS);
        let once_state = settle(&once).await;

        let air = FakeAirQuality::with_aqi(55);
        let twice = session(air.clone(), FakeGeocoding::default());
        twice.select_location(PARIS);
        settle(&twice).await;
        twice.select_location(PARIS);
        let twice_state = settle(&twice).await;

        assert_eq!(once_state, twice_state);
        assert_eq!(air.current_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_surfaces_fallback() {
        let s = session(FakeAirQuality::failing(), FakeGeocoding::failing());
        s.select_location(PARIS);

        let state = settle(&s).await;
        let reading = state.latest_reading.unwrap();
        assert!(reading.is_fallback());
        assert_eq!(reading.coordinate, PARIS);
        assert_eq!(state.last_error, Some(ErrorKind::NetworkFailure));
        assert_eq!(state.location_name, "Unknown Location");
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_drops_outstanding_fetch() {
        let air = FakeAirQuality::with_aqi(30).with_delay(PARIS, Duration::from_millis(500));
        let s = session(air, FakeGeocoding::default());

        s.select_location(PARIS);
        s.shutdown();
        s.shutdown();

        tokio::time::sleep(Duration::from_millis(1000)).await;
        let state = s.snapshot();
        assert!(state.latest_reading.is_none());
        assert!(!state.is_loading);

        s.select_location(BERLIN);
        assert_eq!(s.snapshot().current_location, PARIS);
    }
}
