// Heatmap cache - Batch readings for the well-known points
use crate::application::gateway::AirQualityGateway;
use crate::domain::heatmap::HeatmapSnapshot;
use crate::domain::location::Coordinate;
use std::sync::Arc;
use tokio::sync::watch;

/// Holds the latest snapshot behind an `Arc`; a refresh swaps in a new one so
/// readers never see a half-built snapshot.
#[derive(Clone)]
pub struct HeatmapCache {
    gateway: AirQualityGateway,
    snapshot: Arc<watch::Sender<Arc<HeatmapSnapshot>>>,
}

impl HeatmapCache {
    pub fn new(gateway: AirQualityGateway) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(HeatmapSnapshot::default()));
        Self {
            gateway,
            snapshot: Arc::new(snapshot),
        }
    }

    pub async fn refresh(&self, points: &[Coordinate]) -> Arc<HeatmapSnapshot> {
        let outcome = self.gateway.fetch_batch(points).await;
        let snapshot = Arc::new(HeatmapSnapshot::new(outcome.data, outcome.failure));

        tracing::info!(
            points = points.len(),
            readings = snapshot.readings.len(),
            degraded = snapshot.failure.is_some(),
            "Heatmap refreshed"
        );

        self.snapshot.send_replace(Arc::clone(&snapshot));
        snapshot
    }

    pub fn snapshot(&self) -> Arc<HeatmapSnapshot> {
        Arc::clone(&self.snapshot.borrow())
    }
}
