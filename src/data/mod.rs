//! Core data models for the traffic dashboard
//!
//! This module contains the payload types returned by each backend endpoint
//! and the composite view-models assembled from them. Every payload field
//! defaults to an empty value, both when absent from a JSON body and when the
//! whole endpoint failed to load.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Vehicle count keyed by vehicle type (e.g. "car", "bus", "truck")
pub type VehicleCounts = BTreeMap<String, u64>;

/// Vehicle counts per lane and vehicle type
pub type LaneVehicleData = BTreeMap<String, VehicleCounts>;

/// Vehicle count per hour of day
pub type HourlyPatternsData = BTreeMap<String, u64>;

/// Average speed in km/h per lane
pub type SpeedByLaneData = BTreeMap<String, f64>;

/// Share of the traffic per vehicle type, in percent
pub type VehicleTypeDominanceData = BTreeMap<String, f64>;

/// Total vehicle volume with hourly and daily breakdowns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TotalVolumeData {
    /// Vehicles counted per hour
    pub hourly: BTreeMap<String, u64>,
    /// Vehicles counted per day category
    pub daily: BTreeMap<String, u64>,
    /// Vehicles counted per vehicle type
    pub total: VehicleCounts,
}

impl TotalVolumeData {
    /// Sum of all per-type totals
    pub fn total_vehicles(&self) -> u64 {
        self.total.values().sum()
    }
}

/// A lane whose average speed marks it as congested
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BottleneckItem {
    pub lane: String,
    /// Average speed in km/h
    pub avg_speed: f64,
    pub total_vehicles: u64,
}

/// Vehicle counts over time as parallel arrays indexed like `timestamps`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficEvolutionData {
    pub timestamps: Vec<String>,
    pub car: Vec<u64>,
    pub bus: Vec<u64>,
    pub truck: Vec<u64>,
}

/// Lane speeds over time as parallel arrays indexed like `timestamps`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedEvolutionData {
    pub timestamps: Vec<String>,
    pub lane_1: Vec<f64>,
    pub lane_2: Vec<f64>,
    pub lane_3: Vec<f64>,
}

/// Composite view-model for one dashboard render
///
/// Every field is always present. A field whose endpoint failed holds its
/// empty default, so consumers tell real data from defaults by checking for
/// entries rather than for absence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardData {
    pub total_volume: TotalVolumeData,
    pub volume_by_lane: LaneVehicleData,
    pub hourly_patterns: HourlyPatternsData,
    pub avg_speed_by_lane: SpeedByLaneData,
    pub bottlenecks: Vec<BottleneckItem>,
    pub traffic_evolution: TrafficEvolutionData,
    pub speed_evolution: SpeedEvolutionData,
    pub vehicle_type_dominance: VehicleTypeDominanceData,
}

impl DashboardData {
    /// Whether any of the headline sections has real data
    ///
    /// Checks the per-type totals, lane volume, hourly patterns and lane
    /// speeds. When this is false the dashboard has nothing to show and the
    /// backend connection should be checked.
    pub fn has_data(&self) -> bool {
        !self.total_volume.total.is_empty()
            || !self.volume_by_lane.is_empty()
            || !self.hourly_patterns.is_empty()
            || !self.avg_speed_by_lane.is_empty()
    }
}

/// Node of the backend's tree snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeNode {
    pub value: serde_json::Value,
    pub children: Vec<TreeNode>,
}

/// Snapshot of the backend's internal data structures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataStructures {
    pub array_data: Vec<f64>,
    pub stack_data: Vec<serde_json::Value>,
    pub queue_data: Vec<serde_json::Value>,
    pub tree_data: TreeNode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_total_volume_missing_fields_default_to_empty() {
        let data: TotalVolumeData =
            serde_json::from_value(json!({"total": {"car": 10}})).expect("Should parse");

        assert_eq!(data.total.get("car"), Some(&10));
        assert!(data.hourly.is_empty());
        assert!(data.daily.is_empty());
        assert_eq!(data.total_vehicles(), 10);
    }

    #[test]
    fn test_bottleneck_uses_camel_case_fields() {
        let item: BottleneckItem = serde_json::from_value(json!({
            "lane": "lane_2",
            "avgSpeed": 12.4,
            "totalVehicles": 87
        }))
        .expect("Should parse");

        assert_eq!(item.lane, "lane_2");
        assert!((item.avg_speed - 12.4).abs() < 0.001);
        assert_eq!(item.total_vehicles, 87);
    }

    #[test]
    fn test_default_dashboard_serializes_every_field() {
        let value = serde_json::to_value(DashboardData::default()).unwrap();

        assert_eq!(
            value,
            json!({
                "totalVolume": {"hourly": {}, "daily": {}, "total": {}},
                "volumeByLane": {},
                "hourlyPatterns": {},
                "avgSpeedByLane": {},
                "bottlenecks": [],
                "trafficEvolution": {"timestamps": [], "car": [], "bus": [], "truck": []},
                "speedEvolution": {"timestamps": [], "lane_1": [], "lane_2": [], "lane_3": []},
                "vehicleTypeDominance": {}
            })
        );
    }

    #[test]
    fn test_has_data_false_for_defaults() {
        assert!(!DashboardData::default().has_data());
    }

    #[test]
    fn test_has_data_ignores_secondary_sections() {
        let data = DashboardData {
            bottlenecks: vec![BottleneckItem::default()],
            vehicle_type_dominance: BTreeMap::from([("car".to_string(), 80.0)]),
            ..Default::default()
        };
        assert!(!data.has_data());
    }

    #[test]
    fn test_has_data_true_with_any_headline_section() {
        let data = DashboardData {
            avg_speed_by_lane: BTreeMap::from([("lane_1".to_string(), 48.0)]),
            ..Default::default()
        };
        assert!(data.has_data());

        let data = DashboardData {
            total_volume: TotalVolumeData {
                total: BTreeMap::from([("bus".to_string(), 3)]),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(data.has_data());
    }

    #[test]
    fn test_default_structures_have_empty_tree() {
        let value = serde_json::to_value(DataStructures::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "arrayData": [],
                "stackData": [],
                "queueData": [],
                "treeData": {"value": null, "children": []}
            })
        );
    }

    #[test]
    fn test_tree_node_parses_nested_children() {
        let tree: TreeNode = serde_json::from_value(json!({
            "value": 5,
            "children": [{"value": 3}, {"value": 8, "children": [{"value": 9}]}]
        }))
        .expect("Should parse");

        assert_eq!(tree.value, json!(5));
        assert_eq!(tree.children.len(), 2);
        assert!(tree.children[0].children.is_empty());
        assert_eq!(tree.children[1].children[0].value, json!(9));
    }
}
