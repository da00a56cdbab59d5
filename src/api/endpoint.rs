//! Backend endpoint catalogue
//!
//! Each variant names one slice of traffic data served by the backend under a
//! fixed path relative to the API base URL.

use std::fmt;

/// A fixed backend path returning one logical slice of traffic data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Vehicle totals plus hourly and daily breakdowns
    TotalVolume,
    /// Vehicle counts per lane and vehicle type
    VolumeByLane,
    /// Vehicle counts per hour of day
    HourlyPatterns,
    /// Average speed per lane
    SpeedByLane,
    /// Lanes whose average speed is low enough to count as a bottleneck
    Bottlenecks,
    /// Per-detection counts of cars, buses and trucks over time
    TrafficEvolution,
    /// Per-detection lane speeds over time
    SpeedEvolution,
    /// Share of each vehicle type, in percent
    VehicleTypeDominance,
    /// Backend summary, only used for diagnostics
    AnalysisSummary,
    StructureArray,
    StructureStack,
    StructureQueue,
    StructureTree,
}

impl Endpoint {
    /// Endpoints combined into the dashboard view
    pub const DASHBOARD: [Endpoint; 8] = [
        Endpoint::TotalVolume,
        Endpoint::VolumeByLane,
        Endpoint::HourlyPatterns,
        Endpoint::SpeedByLane,
        Endpoint::Bottlenecks,
        Endpoint::TrafficEvolution,
        Endpoint::SpeedEvolution,
        Endpoint::VehicleTypeDominance,
    ];

    /// Endpoints combined into the data-structure snapshot
    pub const STRUCTURES: [Endpoint; 4] = [
        Endpoint::StructureArray,
        Endpoint::StructureStack,
        Endpoint::StructureQueue,
        Endpoint::StructureTree,
    ];

    /// Endpoints checked by the diagnostics probe
    pub const PROBED: [Endpoint; 8] = [
        Endpoint::AnalysisSummary,
        Endpoint::TotalVolume,
        Endpoint::VolumeByLane,
        Endpoint::SpeedByLane,
        Endpoint::HourlyPatterns,
        Endpoint::TrafficEvolution,
        Endpoint::SpeedEvolution,
        Endpoint::VehicleTypeDominance,
    ];

    /// Every known endpoint
    pub const ALL: [Endpoint; 13] = [
        Endpoint::TotalVolume,
        Endpoint::VolumeByLane,
        Endpoint::HourlyPatterns,
        Endpoint::SpeedByLane,
        Endpoint::Bottlenecks,
        Endpoint::TrafficEvolution,
        Endpoint::SpeedEvolution,
        Endpoint::VehicleTypeDominance,
        Endpoint::AnalysisSummary,
        Endpoint::StructureArray,
        Endpoint::StructureStack,
        Endpoint::StructureQueue,
        Endpoint::StructureTree,
    ];

    /// Path relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::TotalVolume => "/detections/volume/total",
            Endpoint::VolumeByLane => "/detections/volume/by-lane",
            Endpoint::HourlyPatterns => "/detections/patterns/hourly",
            Endpoint::SpeedByLane => "/detections/lanes/speed",
            Endpoint::Bottlenecks => "/detections/lanes/bottlenecks",
            Endpoint::TrafficEvolution => "/detections/temporal/evolution",
            Endpoint::SpeedEvolution => "/detections/temporal/speed",
            Endpoint::VehicleTypeDominance => "/detections/vehicle-types/dominance",
            Endpoint::AnalysisSummary => "/detections/analysis/summary",
            Endpoint::StructureArray => "/detections/structures/array",
            Endpoint::StructureStack => "/detections/structures/stack",
            Endpoint::StructureQueue => "/detections/structures/queue",
            Endpoint::StructureTree => "/detections/structures/tree",
        }
    }

    /// Short name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::TotalVolume => "volume-total",
            Endpoint::VolumeByLane => "volume-by-lane",
            Endpoint::HourlyPatterns => "hourly-patterns",
            Endpoint::SpeedByLane => "speed-by-lane",
            Endpoint::Bottlenecks => "bottlenecks",
            Endpoint::TrafficEvolution => "traffic-evolution",
            Endpoint::SpeedEvolution => "speed-evolution",
            Endpoint::VehicleTypeDominance => "vehicle-types",
            Endpoint::AnalysisSummary => "summary",
            Endpoint::StructureArray => "structure-array",
            Endpoint::StructureStack => "structure-stack",
            Endpoint::StructureQueue => "structure-queue",
            Endpoint::StructureTree => "structure-tree",
        }
    }

    /// Looks up an endpoint by its command-line name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Endpoint> {
        let name = name.trim().to_lowercase();
        Endpoint::ALL.into_iter().find(|e| e.name() == name)
    }

    /// Key under which responses from this endpoint are cached
    pub fn cache_key(&self) -> String {
        format!("api_{}", self.path())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
