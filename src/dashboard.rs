//! Concurrent dashboard loading
//!
//! `DashboardLoader` fans out one request per endpoint, waits for all of them
//! to settle and assembles a fully populated view-model. A failing endpoint
//! only affects its own field, which falls back to the empty default.

use futures::join;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::{ApiClient, Endpoint, FetchError};
use crate::data::{
    BottleneckItem, DashboardData, DataStructures, HourlyPatternsData, LaneVehicleData,
    SpeedByLaneData, SpeedEvolutionData, TotalVolumeData, TrafficEvolutionData, TreeNode,
    VehicleTypeDominanceData,
};

/// Loads the dashboard view-models from the backend
#[derive(Debug, Clone)]
pub struct DashboardLoader {
    api: ApiClient,
}

/// Replace a failed load with the field's empty default
fn settle<T: Default>(endpoint: Endpoint, result: Result<T, FetchError>) -> T {
    match result {
        Ok(data) => data,
        Err(e) => {
            warn!(%endpoint, error = %e, "endpoint failed, using empty default");
            T::default()
        }
    }
}

impl DashboardLoader {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    async fn load<T>(&self, endpoint: Endpoint, force_refresh: bool) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        self.api.endpoint::<T>(endpoint).load(force_refresh).await
    }

    /// Load every dashboard endpoint concurrently
    ///
    /// Waits for all eight requests to finish; none is cancelled when another
    /// fails. Never returns an error: failed sections hold their defaults.
    pub async fn load_all(&self, force_refresh: bool) -> DashboardData {
        debug!(force_refresh, "loading dashboard");

        let (
            total_volume,
            volume_by_lane,
            hourly_patterns,
            avg_speed_by_lane,
            bottlenecks,
            traffic_evolution,
            speed_evolution,
            vehicle_type_dominance,
        ) = join!(
            self.load::<TotalVolumeData>(Endpoint::TotalVolume, force_refresh),
            self.load::<LaneVehicleData>(Endpoint::VolumeByLane, force_refresh),
            self.load::<HourlyPatternsData>(Endpoint::HourlyPatterns, force_refresh),
            self.load::<SpeedByLaneData>(Endpoint::SpeedByLane, force_refresh),
            self.load::<Vec<BottleneckItem>>(Endpoint::Bottlenecks, force_refresh),
            self.load::<TrafficEvolutionData>(Endpoint::TrafficEvolution, force_refresh),
            self.load::<SpeedEvolutionData>(Endpoint::SpeedEvolution, force_refresh),
            self.load::<VehicleTypeDominanceData>(Endpoint::VehicleTypeDominance, force_refresh),
        );

        DashboardData {
            total_volume: settle(Endpoint::TotalVolume, total_volume),
            volume_by_lane: settle(Endpoint::VolumeByLane, volume_by_lane),
            hourly_patterns: settle(Endpoint::HourlyPatterns, hourly_patterns),
            avg_speed_by_lane: settle(Endpoint::SpeedByLane, avg_speed_by_lane),
            bottlenecks: settle(Endpoint::Bottlenecks, bottlenecks),
            traffic_evolution: settle(Endpoint::TrafficEvolution, traffic_evolution),
            speed_evolution: settle(Endpoint::SpeedEvolution, speed_evolution),
            vehicle_type_dominance: settle(Endpoint::VehicleTypeDominance, vehicle_type_dominance),
        }
    }

    /// Load the data-structure snapshot with the same settle-all policy
    pub async fn load_structures(&self, force_refresh: bool) -> DataStructures {
        let (array_data, stack_data, queue_data, tree_data) = join!(
            self.load::<Vec<f64>>(Endpoint::StructureArray, force_refresh),
            self.load::<Vec<serde_json::Value>>(Endpoint::StructureStack, force_refresh),
            self.load::<Vec<serde_json::Value>>(Endpoint::StructureQueue, force_refresh),
            self.load::<TreeNode>(Endpoint::StructureTree, force_refresh),
        );

        DataStructures {
            array_data: settle(Endpoint::StructureArray, array_data),
            stack_data: settle(Endpoint::StructureStack, stack_data),
            queue_data: settle(Endpoint::StructureQueue, queue_data),
            tree_data: settle(Endpoint::StructureTree, tree_data),
        }
    }

    pub async fn total_vehicle_volume(
        &self,
        force_refresh: bool,
    ) -> Result<TotalVolumeData, FetchError> {
        self.load(Endpoint::TotalVolume, force_refresh).await
    }

    pub async fn vehicle_volume_by_lane(
        &self,
        force_refresh: bool,
    ) -> Result<LaneVehicleData, FetchError> {
        self.load(Endpoint::VolumeByLane, force_refresh).await
    }

    pub async fn hourly_patterns(
        &self,
        force_refresh: bool,
    ) -> Result<HourlyPatternsData, FetchError> {
        self.load(Endpoint::HourlyPatterns, force_refresh).await
    }

    pub async fn avg_speed_by_lane(
        &self,
        force_refresh: bool,
    ) -> Result<SpeedByLaneData, FetchError> {
        self.load(Endpoint::SpeedByLane, force_refresh).await
    }

    /// Raw JSON of any endpoint, through the cache
    pub async fn raw(
        &self,
        endpoint: Endpoint,
        force_refresh: bool,
    ) -> Result<serde_json::Value, FetchError> {
        self.load(endpoint, force_refresh).await
    }

    /// Drop every cached response
    pub fn clear_cache(&self) {
        self.api.cache().clear();
    }
}
