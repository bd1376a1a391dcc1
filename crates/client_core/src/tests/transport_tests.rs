use super::*;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode as AxumStatus,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use shared::domain::Activity;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct MockRosterState {
    catalog: Arc<Mutex<ActivityCatalog>>,
    mutations: Arc<Mutex<Vec<(String, String, String)>>>,
}

#[derive(Deserialize)]
struct EmailQuery {
    email: String,
}

fn activity(max_participants: u32, participants: &[&str]) -> Activity {
    Activity {
        description: "Hands-on experiments and scientific exploration".to_string(),
        schedule: "Fridays, 3:30 PM - 5:00 PM".to_string(),
        max_participants,
        participants: participants.iter().map(|p| p.to_string()).collect(),
    }
}

async fn list_activities(State(state): State<MockRosterState>) -> Json<ActivityCatalog> {
    Json(state.catalog.lock().await.clone())
}

async fn signup(
    State(state): State<MockRosterState>,
    Path(name): Path<String>,
    Query(q): Query<EmailQuery>,
) -> axum::response::Response {
    state
        .mutations
        .lock()
        .await
        .push(("signup".to_string(), name.clone(), q.email.clone()));
    let mut catalog = state.catalog.lock().await;
    let Some(mut entry) = catalog.get(&name).cloned() else {
        return (
            AxumStatus::NOT_FOUND,
            Json(ErrorDetail::new("Activity not found")),
        )
            .into_response();
    };
    if entry.participants.contains(&q.email) {
        return (
            AxumStatus::BAD_REQUEST,
            Json(ErrorDetail::new("Student is already signed up")),
        )
            .into_response();
    }
    entry.participants.push(q.email.clone());
    catalog.insert(name.clone(), entry);
    Json(SignupResponse {
        message: format!("Signed up {} for {name}", q.email),
    })
    .into_response()
}

async fn unregister(
    State(state): State<MockRosterState>,
    Path(name): Path<String>,
    Query(q): Query<EmailQuery>,
) -> axum::response::Response {
    state
        .mutations
        .lock()
        .await
        .push(("unregister".to_string(), name.clone(), q.email.clone()));
    let mut catalog = state.catalog.lock().await;
    match catalog.remove_participant(&name, &q.email) {
        Some(_) => AxumStatus::OK.into_response(),
        None => (AxumStatus::NOT_FOUND, "no such activity").into_response(),
    }
}

async fn spawn_roster_server(catalog: ActivityCatalog) -> (String, MockRosterState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let state = MockRosterState {
        catalog: Arc::new(Mutex::new(catalog)),
        ..MockRosterState::default()
    };
    let app = Router::new()
        .route("/activities", get(list_activities))
        .route("/activities/:name/signup", post(signup))
        .route("/activities/:name/unregister", post(unregister))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), state)
}

async fn spawn_static_server(status: AxumStatus, body: &'static str) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let reply = move || async move { (status, body) };
    let app = Router::new()
        .route("/activities", get(reply))
        .route("/activities/:name/signup", post(reply))
        .route("/activities/:name/unregister", post(reply));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn sample_catalog() -> ActivityCatalog {
    [
        (
            "Chess Club".to_string(),
            activity(12, &["michael@mergington.edu", "daniel@mergington.edu"]),
        ),
        ("Art Studio".to_string(), activity(15, &[])),
    ]
    .into_iter()
    .collect()
}

#[test]
fn action_url_percent_encodes_name_and_email() {
    let api = HttpRosterApi::new("http://roster.test/").expect("api");
    let url = api
        .action_url("Chess & Go/Club", RosterAction::Signup, "a+b@x.edu")
        .expect("url");
    assert_eq!(url.path(), "/activities/Chess%20&%20Go%2FClub/signup");
    assert_eq!(url.query(), Some("email=a%2Bb%40x.edu"));
}

#[test]
fn action_url_keeps_base_path_prefix() {
    let api = HttpRosterApi::new("http://roster.test/school/").expect("api");
    let url = api
        .action_url("Art Studio", RosterAction::Unregister, "e@x.edu")
        .expect("url");
    assert_eq!(url.path(), "/school/activities/Art%20Studio/unregister");
    assert_eq!(
        api.activities_url().expect("url").as_str(),
        "http://roster.test/school/activities"
    );
}

#[test]
fn rejects_non_hierarchical_base_urls() {
    assert!(matches!(
        HttpRosterApi::new("mailto:office@mergington.edu"),
        Err(RosterError::UnsupportedBaseUrl(_))
    ));
    assert!(matches!(
        HttpRosterApi::new("not a url"),
        Err(RosterError::InvalidUrl(_))
    ));
}

#[tokio::test]
async fn fetches_catalog_in_server_order() {
    let (server_url, _state) = spawn_roster_server(sample_catalog()).await;
    let api = HttpRosterApi::new(&server_url).expect("api");

    let catalog = api.fetch_activities().await.expect("catalog");

    assert_eq!(
        catalog.names().collect::<Vec<_>>(),
        vec!["Chess Club", "Art Studio"]
    );
    assert_eq!(catalog.get("Chess Club").map(|a| a.spots_left()), Some(10));
}

#[tokio::test]
async fn signup_round_trips_encoded_values_to_server() {
    let (server_url, state) = spawn_roster_server(sample_catalog()).await;
    let api = HttpRosterApi::new(&server_url).expect("api");

    let response = api
        .signup("Art Studio", "new+student@mergington.edu")
        .await
        .expect("signup");

    assert!(response.message.contains("new+student@mergington.edu"));
    let mutations = state.mutations.lock().await.clone();
    assert_eq!(
        mutations,
        vec![(
            "signup".to_string(),
            "Art Studio".to_string(),
            "new+student@mergington.edu".to_string()
        )]
    );
}

#[tokio::test]
async fn signup_rejection_carries_server_detail() {
    let (server_url, _state) = spawn_roster_server(sample_catalog()).await;
    let api = HttpRosterApi::new(&server_url).expect("api");

    let err = api
        .signup("Chess Club", "michael@mergington.edu")
        .await
        .expect_err("duplicate signup must fail");
    assert!(err.is_rejection());
    assert_eq!(err.detail(), Some("Student is already signed up"));

    let err = api
        .signup("Nonexistent Club", "student@mergington.edu")
        .await
        .expect_err("unknown activity must fail");
    assert!(matches!(err, RosterError::Rejected { status: 404, .. }));
    assert_eq!(err.detail(), Some("Activity not found"));
}

#[tokio::test]
async fn rejection_without_json_detail_has_no_detail() {
    let server_url = spawn_static_server(AxumStatus::INTERNAL_SERVER_ERROR, "boom").await;
    let api = HttpRosterApi::new(&server_url).expect("api");

    let err = api
        .signup("Chess Club", "a@x.edu")
        .await
        .expect_err("must fail");
    assert!(matches!(
        err,
        RosterError::Rejected {
            status: 500,
            detail: None
        }
    ));
}

#[tokio::test]
async fn non_json_success_body_is_malformed() {
    let server_url = spawn_static_server(AxumStatus::OK, "<html>maintenance</html>").await;
    let api = HttpRosterApi::new(&server_url).expect("api");

    let err = api.fetch_activities().await.expect_err("must fail");
    assert!(matches!(err, RosterError::MalformedBody(_)));

    let err = api
        .signup("Chess Club", "a@x.edu")
        .await
        .expect_err("must fail");
    assert!(matches!(err, RosterError::MalformedBody(_)));
}

#[tokio::test]
async fn unregister_accepts_empty_success_body() {
    let (server_url, state) = spawn_roster_server(sample_catalog()).await;
    let api = HttpRosterApi::new(&server_url).expect("api");

    let response = api
        .unregister("Chess Club", "michael@mergington.edu")
        .await
        .expect("unregister");
    assert_eq!(response.message, None);

    let catalog = state.catalog.lock().await.clone();
    assert_eq!(
        catalog.get("Chess Club").map(|a| a.participants.clone()),
        Some(vec!["daniel@mergington.edu".to_string()])
    );
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let api = HttpRosterApi::new(&format!("http://{addr}")).expect("api");

    let err = api.fetch_activities().await.expect_err("must fail");
    assert!(matches!(err, RosterError::Transport(_)));
}
