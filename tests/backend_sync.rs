//! End-to-end synchronization tests against a fake backend serving the
//! same endpoints and JSON shapes as the real detection service.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use incident_dash::models::{
    ClassificationStats, ClickEvent, ClickStats, IncidentRecord, RequestStats,
};
use incident_dash::mutation::MutationCoordinator;
use incident_dash::{Config, Dashboard, Poller, PollerConfig, PostMonitorClient, TransportError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::timeout;

#[derive(Default)]
struct Backend {
    requests: Mutex<Vec<IncidentRecord>>,
    fail: AtomicBool,
}

impl Backend {
    fn seeded(ids: &[u64]) -> Arc<Self> {
        let backend = Self::default();
        *backend.requests.lock().unwrap() =
            ids.iter().map(|&id| sample_record(id, id % 2 == 0)).collect();
        Arc::new(backend)
    }
}

fn sample_record(id: u64, is_bot: bool) -> IncidentRecord {
    IncidentRecord {
        id,
        timestamp: "2025-01-15T10:30:00Z".to_string(),
        target_url: format!("https://host{}.test/exfil", id % 3),
        target_hostname: format!("host{}.test", id % 3),
        source_url: "https://app.test/form".to_string(),
        matched_fields: vec!["password".to_string()],
        matched_values: HashMap::from([("password".to_string(), "hunter2".to_string())]),
        request_method: "POST".to_string(),
        status: "blocked".to_string(),
        is_bot: Some(is_bot),
        click_correlation_id: (!is_bot).then_some(id + 1000),
        click_time_diff_ms: (!is_bot).then_some(250),
        click_coordinates: None,
        has_click_correlation: !is_bot,
    }
}

fn window(records: Vec<IncidentRecord>, params: &HashMap<String, String>) -> Vec<IncidentRecord> {
    let skip = params
        .get("skip")
        .or_else(|| params.get("offset"))
        .and_then(|v| v.parse().ok())
        .unwrap_or(0usize);
    let limit =
        params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(records.len());
    records.into_iter().skip(skip).take(limit).collect()
}

async fn list_requests(
    State(backend): State<Arc<Backend>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<IncidentRecord>>, StatusCode> {
    if backend.fail.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let records = backend.requests.lock().unwrap().clone();
    Ok(Json(window(records, &params)))
}

async fn list_filtered(
    backend: &Backend,
    params: &HashMap<String, String>,
    filter: impl Fn(&IncidentRecord) -> bool,
) -> Json<Vec<IncidentRecord>> {
    let records: Vec<IncidentRecord> =
        backend.requests.lock().unwrap().iter().filter(|r| filter(r)).cloned().collect();
    Json(window(records, params))
}

async fn list_human(
    State(backend): State<Arc<Backend>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<IncidentRecord>> {
    list_filtered(&backend, &params, |r| r.is_bot == Some(false) && r.has_click_correlation).await
}

async fn list_human_background(
    State(backend): State<Arc<Backend>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<IncidentRecord>> {
    list_filtered(&backend, &params, |r| r.is_bot == Some(false) && !r.has_click_correlation).await
}

async fn list_bot(
    State(backend): State<Arc<Backend>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<IncidentRecord>> {
    list_filtered(&backend, &params, |r| r.is_bot == Some(true)).await
}

async fn delete_one(
    State(backend): State<Arc<Backend>>,
    Path(id): Path<u64>,
) -> StatusCode {
    let mut requests = backend.requests.lock().unwrap();
    let before = requests.len();
    requests.retain(|r| r.id != id);
    if requests.len() < before { StatusCode::NO_CONTENT } else { StatusCode::NOT_FOUND }
}

async fn clear_all(State(backend): State<Arc<Backend>>) -> StatusCode {
    backend.requests.lock().unwrap().clear();
    StatusCode::NO_CONTENT
}

async fn request_stats(State(backend): State<Arc<Backend>>) -> Json<RequestStats> {
    let total = backend.requests.lock().unwrap().len() as u64;
    Json(RequestStats {
        total_requests: total,
        today_requests: total,
        blocked_domains: vec![],
        recent_activity: vec![],
    })
}

async fn classification_stats(State(backend): State<Arc<Backend>>) -> Json<ClassificationStats> {
    let requests = backend.requests.lock().unwrap();
    let bots = requests.iter().filter(|r| r.is_bot == Some(true)).count() as u64;
    let total = requests.len() as u64;
    Json(ClassificationStats {
        total_requests: total,
        human_requests: total - bots,
        bot_requests: bots,
        uncorrelated_requests: 0,
        correlation_rate: 100.0,
    })
}

async fn click_stats() -> Json<ClickStats> {
    Json(ClickStats {
        total_clicks: 4,
        suspicious_clicks: 1,
        legitimate_clicks: 3,
        unique_pages: 2,
        total_os_clicks: 4,
    })
}

async fn recent_clicks(Query(params): Query<HashMap<String, String>>) -> Json<Vec<ClickEvent>> {
    let limit = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(50usize);
    let events: Vec<ClickEvent> = (0..3)
        .map(|id| ClickEvent {
            id,
            timestamp: 1736937000000.0 + id as f64,
            x: 100.0,
            y: 200.0,
            is_suspicious: id == 0,
            confidence: Some(0.9),
            reason: None,
            action_type: None,
            action_details: None,
            page_url: Some("https://app.test".to_string()),
            page_title: None,
            target_tag: Some("button".to_string()),
            target_id: None,
            target_class: None,
            is_trusted: Some(true),
            created_at: "2025-01-15T10:30:00Z".to_string(),
        })
        .take(limit)
        .collect();
    Json(events)
}

async fn spawn_backend(backend: Arc<Backend>) -> String {
    let app = Router::new()
        .route("/api/stats", get(request_stats))
        .route("/api/stats/classification", get(classification_stats))
        .route("/api/blocked-requests", get(list_requests).delete(clear_all))
        .route("/api/blocked-requests/human", get(list_human))
        .route("/api/blocked-requests/human/background", get(list_human_background))
        .route("/api/blocked-requests/bot", get(list_bot))
        .route("/api/blocked-requests/{id}", axum::routing::delete(delete_one))
        .route("/api/click-detection/stats", get(click_stats))
        .route("/api/click-detection/recent", get(recent_clicks))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn list_poller(client: &PostMonitorClient, config: PollerConfig) -> Poller<Vec<IncidentRecord>> {
    let client = client.clone();
    Poller::spawn(config, move || {
        let client = client.clone();
        async move { client.list_all(None, None).await }
    })
}

#[tokio::test]
async fn client_lists_windows_and_probes() {
    let backend = Backend::seeded(&[1, 2, 3, 4, 5]);
    let url = spawn_backend(backend.clone()).await;
    let client = PostMonitorClient::new(&Config::with_base_url(&url));

    let all = client.list_all(None, None).await.unwrap();
    assert_eq!(all.len(), 5);

    let page = client.list_all(Some(2), Some(1)).await.unwrap();
    assert_eq!(page.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3]);

    let bots = client.list_bot(100, 0).await.unwrap();
    assert!(bots.iter().all(|r| r.is_bot == Some(true)));

    assert!(client.check_reachable().await);

    backend.fail.store(true, Ordering::SeqCst);
    let err = client.list_all(None, None).await.unwrap_err();
    assert!(matches!(err, TransportError::Status(500)));
}

#[tokio::test]
async fn unreachable_backend_probes_false_without_error() {
    let client = PostMonitorClient::new(&Config::with_base_url("http://127.0.0.1:9"));
    assert!(!client.check_reachable().await);
    assert!(client.list_all(None, None).await.is_err());
}

#[tokio::test]
async fn delete_then_reconcile_removes_the_record() {
    let backend = Backend::seeded(&[1, 2, 3]);
    let url = spawn_backend(backend).await;
    let client = PostMonitorClient::new(&Config::with_base_url(&url));

    let poller = list_poller(&client, PollerConfig::disabled());
    poller.refetch().await;
    assert_eq!(poller.data().unwrap().len(), 3);

    let coordinator = MutationCoordinator::new(client, poller.clone());
    coordinator.delete_request(2).await.unwrap();

    let records = poller.data().unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.id != 2));
}

#[tokio::test]
async fn failed_delete_still_reconciles_and_surfaces_the_error() {
    let backend = Backend::seeded(&[1]);
    let url = spawn_backend(backend).await;
    let client = PostMonitorClient::new(&Config::with_base_url(&url));

    let poller = list_poller(&client, PollerConfig::disabled());
    let coordinator = MutationCoordinator::new(client, poller.clone());

    let err = coordinator.delete_request(99).await.unwrap_err();
    assert!(matches!(err, TransportError::Status(404)));
    // the reconciling refetch ran regardless
    assert_eq!(poller.data().unwrap().len(), 1);
}

#[tokio::test]
async fn clear_all_empties_the_log() {
    let backend = Backend::seeded(&[1, 2, 3]);
    let url = spawn_backend(backend).await;
    let client = PostMonitorClient::new(&Config::with_base_url(&url));

    let poller = list_poller(&client, PollerConfig::disabled());
    let coordinator = MutationCoordinator::new(client, poller.clone());
    coordinator.clear_all().await.unwrap();

    assert_eq!(poller.data().unwrap().len(), 0);
}

#[tokio::test]
async fn poller_degrades_to_offline_and_recovers_with_data_intact() {
    let backend = Backend::seeded(&[1, 2]);
    let url = spawn_backend(backend.clone()).await;
    let client = PostMonitorClient::new(&Config::with_base_url(&url));

    let poller = list_poller(&client, PollerConfig::every(Duration::from_millis(50)));
    let mut rx = poller.subscribe();

    timeout(Duration::from_secs(5), rx.wait_for(|s| s.data.is_some() && s.is_online))
        .await
        .expect("first poll")
        .unwrap();

    backend.fail.store(true, Ordering::SeqCst);
    let offline = timeout(Duration::from_secs(5), rx.wait_for(|s| !s.is_online))
        .await
        .expect("offline transition")
        .unwrap()
        .clone();
    assert_eq!(offline.data.as_ref().map(Vec::len), Some(2), "held data survives the outage");
    assert!(offline.last_error.is_some());

    backend.fail.store(false, Ordering::SeqCst);
    let recovered = timeout(Duration::from_secs(5), rx.wait_for(|s| s.is_online))
        .await
        .expect("recovery")
        .unwrap()
        .clone();
    assert!(recovered.last_error.is_none());
}

#[tokio::test]
async fn dashboard_syncs_all_views_against_one_backend() {
    let backend = Backend::seeded(&[1, 2, 3, 4]);
    let url = spawn_backend(backend).await;

    let dashboard = Dashboard::start(Config::with_base_url(&url));

    let mut requests = dashboard.requests().subscribe();
    timeout(Duration::from_secs(5), requests.wait_for(|s| s.data.is_some()))
        .await
        .expect("request poll")
        .unwrap();
    assert_eq!(dashboard.requests().data().unwrap().len(), 4);

    let mut clicks = dashboard.click_stats().subscribe();
    timeout(Duration::from_secs(5), clicks.wait_for(|s| s.data.is_some()))
        .await
        .expect("click poll")
        .unwrap();
    assert_eq!(dashboard.click_stats().data().unwrap().total_clicks, 4);

    let mut classification = dashboard.classification().subscribe();
    timeout(Duration::from_secs(5), classification.wait_for(|s| s.data.is_some()))
        .await
        .expect("classification poll")
        .unwrap();

    assert_eq!(dashboard.check_backends().await, (true, true));

    let metrics = dashboard.metrics_json();
    assert!(metrics.get("polls").unwrap().as_u64().unwrap() >= 3);
}
