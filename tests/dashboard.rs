//! Integration tests for dashboard loading against a mock backend
//!
//! Each test mounts endpoint responses on a wiremock server and drives the
//! public loader API.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use traffic_dash::data::{DashboardData, TotalVolumeData};
use traffic_dash::probe::{probe_endpoints, OverallStatus};
use traffic_dash::{ApiClient, ClientConfig, DashboardLoader, Endpoint, FetchConfig, ResponseCache};

/// Backend paths are mounted under this prefix
const API_PREFIX: &str = "/api";

fn loader_for(server: &MockServer) -> DashboardLoader {
    let config = ClientConfig {
        base_url: format!("{}{}", server.uri(), API_PREFIX),
        fetch: FetchConfig {
            max_attempts: 2,
            timeout: Duration::from_secs(2),
            retry_delay: Duration::from_millis(20),
        },
        cache_ttl: Duration::from_secs(60),
    };
    let cache = Arc::new(ResponseCache::with_ttl(config.cache_ttl));
    DashboardLoader::new(ApiClient::new(&config, cache))
}

fn api_path(endpoint: Endpoint) -> String {
    format!("{}{}", API_PREFIX, endpoint.path())
}

async fn mount_json(server: &MockServer, endpoint: Endpoint, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(api_path(endpoint)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, endpoint: Endpoint, status: u16) {
    Mock::given(method("GET"))
        .and(path(api_path(endpoint)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_volume_ok_and_lane_volume_500_yields_defaults_without_error() {
    let server = MockServer::start().await;
    mount_json(&server, Endpoint::TotalVolume, json!({"total": {"car": 10}})).await;
    mount_status(&server, Endpoint::VolumeByLane, 500).await;

    let data = loader_for(&server).load_all(false).await;

    let value = serde_json::to_value(&data).unwrap();
    assert_eq!(
        value["totalVolume"],
        json!({"total": {"car": 10}, "hourly": {}, "daily": {}})
    );
    assert_eq!(value["volumeByLane"], json!({}));
    assert!(data.has_data());
}

#[tokio::test]
async fn test_three_of_eight_failing_endpoints_get_defaults() {
    let server = MockServer::start().await;

    // Five healthy endpoints
    mount_json(
        &server,
        Endpoint::TotalVolume,
        json!({"hourly": {"08": 5}, "daily": {"weekday": 12}, "total": {"car": 9, "bus": 3}}),
    )
    .await;
    mount_json(
        &server,
        Endpoint::VolumeByLane,
        json!({"lane_1": {"car": 4}, "lane_2": {"car": 5, "bus": 3}}),
    )
    .await;
    mount_json(&server, Endpoint::HourlyPatterns, json!({"08": 5, "09": 7})).await;
    mount_json(
        &server,
        Endpoint::Bottlenecks,
        json!([{"lane": "lane_2", "avgSpeed": 9.5, "totalVehicles": 8}]),
    )
    .await;
    mount_json(
        &server,
        Endpoint::VehicleTypeDominance,
        json!({"car": 75.0, "bus": 25.0}),
    )
    .await;

    // Three failing endpoints, each failing differently
    mount_status(&server, Endpoint::SpeedByLane, 404).await;
    Mock::given(method("GET"))
        .and(path(api_path(Endpoint::TrafficEvolution)))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    mount_status(&server, Endpoint::SpeedEvolution, 503).await;

    let data = loader_for(&server).load_all(false).await;

    assert_eq!(data.total_volume.total_vehicles(), 12);
    assert_eq!(data.total_volume.daily.get("weekday"), Some(&12));
    assert_eq!(data.volume_by_lane.len(), 2);
    assert_eq!(data.hourly_patterns.get("09"), Some(&7));
    assert_eq!(data.bottlenecks.len(), 1);
    assert_eq!(data.bottlenecks[0].lane, "lane_2");
    assert_eq!(data.vehicle_type_dominance.get("car"), Some(&75.0));

    let defaults = DashboardData::default();
    assert_eq!(data.avg_speed_by_lane, defaults.avg_speed_by_lane);
    assert_eq!(data.traffic_evolution, defaults.traffic_evolution);
    assert_eq!(data.speed_evolution, defaults.speed_evolution);
}

#[tokio::test]
async fn test_slow_endpoint_does_not_hold_back_others() {
    let server = MockServer::start().await;
    mount_json(&server, Endpoint::HourlyPatterns, json!({"10": 1})).await;
    Mock::given(method("GET"))
        .and(path(api_path(Endpoint::TotalVolume)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"total": {"truck": 2}}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let started = std::time::Instant::now();
    let data = loader_for(&server).load_all(false).await;

    // Loads run concurrently, so the total is close to the slowest endpoint
    // rather than the sum of all of them.
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(data.total_volume.total.get("truck"), Some(&2));
    assert_eq!(data.hourly_patterns.get("10"), Some(&1));
}

#[tokio::test]
async fn test_second_load_is_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path(Endpoint::HourlyPatterns)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"07": 11})))
        .expect(1)
        .mount(&server)
        .await;

    let loader = loader_for(&server);
    let first = loader.load_all(false).await;
    let second = loader.load_all(false).await;

    assert_eq!(first.hourly_patterns, second.hourly_patterns);
    assert_eq!(second.hourly_patterns.get("07"), Some(&11));
}

#[tokio::test]
async fn test_forced_refresh_fetches_even_when_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path(Endpoint::TotalVolume)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": {"car": 1}})))
        .expect(2)
        .mount(&server)
        .await;

    let loader = loader_for(&server);
    loader.total_vehicle_volume(false).await.unwrap();
    let refreshed: TotalVolumeData = loader.total_vehicle_volume(true).await.unwrap();

    assert_eq!(refreshed.total.get("car"), Some(&1));
}

#[tokio::test]
async fn test_raw_after_typed_load_returns_body_unchanged() {
    let server = MockServer::start().await;
    let body = json!({"source": "cam-1", "total": {"car": 10}});
    Mock::given(method("GET"))
        .and(path(api_path(Endpoint::TotalVolume)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let loader = loader_for(&server);
    let typed = loader.total_vehicle_volume(false).await.unwrap();
    let raw = loader.raw(Endpoint::TotalVolume, false).await.unwrap();

    assert_eq!(typed.total.get("car"), Some(&10));
    assert_eq!(raw, body);
}

#[tokio::test]
async fn test_clear_cache_forces_next_load_to_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path(Endpoint::SpeedByLane)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"lane_1": 50.5})))
        .expect(2)
        .mount(&server)
        .await;

    let loader = loader_for(&server);
    loader.avg_speed_by_lane(false).await.unwrap();
    loader.clear_cache();
    loader.clear_cache();
    let speeds = loader.avg_speed_by_lane(false).await.unwrap();

    assert_eq!(speeds.get("lane_1"), Some(&50.5));
}

#[tokio::test]
async fn test_single_endpoint_failure_is_returned_to_caller() {
    let server = MockServer::start().await;
    mount_status(&server, Endpoint::VolumeByLane, 500).await;

    let result = loader_for(&server).vehicle_volume_by_lane(false).await;

    assert!(matches!(
        result,
        Err(traffic_dash::FetchError::Http { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_structures_fall_back_per_field() {
    let server = MockServer::start().await;
    mount_json(&server, Endpoint::StructureArray, json!([1, 2, 3])).await;
    mount_json(&server, Endpoint::StructureStack, json!([{"id": 1}])).await;
    mount_status(&server, Endpoint::StructureQueue, 500).await;
    mount_json(
        &server,
        Endpoint::StructureTree,
        json!({"value": 4, "children": [{"value": 2}]}),
    )
    .await;

    let structures = loader_for(&server).load_structures(false).await;

    assert_eq!(structures.array_data, vec![1.0, 2.0, 3.0]);
    assert_eq!(structures.stack_data, vec![json!({"id": 1})]);
    assert!(structures.queue_data.is_empty());
    assert_eq!(structures.tree_data.value, json!(4));
    assert_eq!(structures.tree_data.children.len(), 1);
}

#[tokio::test]
async fn test_probe_reports_degraded_backend() {
    let server = MockServer::start().await;
    mount_json(&server, Endpoint::TotalVolume, json!({"total": {"car": 3}})).await;
    mount_json(&server, Endpoint::HourlyPatterns, json!({})).await;
    mount_status(&server, Endpoint::SpeedByLane, 404).await;

    let loader = loader_for(&server);
    let endpoints = [
        Endpoint::TotalVolume,
        Endpoint::HourlyPatterns,
        Endpoint::SpeedByLane,
    ];
    let report = probe_endpoints(loader.api(), &endpoints, Duration::from_millis(1)).await;

    assert_eq!(report.results.len(), 3);
    assert!(report.results[0].success);
    assert!(report.results[0].has_data);
    assert_eq!(report.results[0].status, Some(200));
    assert_eq!(
        report.results[0].preview.as_deref(),
        Some(r#"{"total":{"car":3}}"#)
    );
    assert!(report.results[1].success);
    assert!(!report.results[1].has_data);
    assert!(!report.results[2].success);
    assert_eq!(report.results[2].status, Some(404));
    assert_eq!(report.results[2].status_text.as_deref(), Some("Not Found"));
    assert!(report.results[2].preview.is_none());
    assert_eq!(report.overall_status(), OverallStatus::Degraded);

    // Probing bypasses the cache
    assert!(loader.api().cache().is_empty());
}
