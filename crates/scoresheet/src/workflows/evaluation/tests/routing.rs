use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::evaluation::router::{scoring_router, SharedSession};
use crate::workflows::evaluation::RecordSink;

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router response");
    let status = response.status();
    (status, response_json(response).await)
}

fn shared<S>(sink: Arc<S>) -> Arc<SharedSession<S>>
where
    S: RecordSink + 'static,
{
    Arc::new(SharedSession::new(sink, rubric()))
}

async fn fill_worked_example(router: &Router) {
    let (status, _) = send(
        router,
        json_request(
            Method::PUT,
            "/api/v1/session/info",
            json!({
                "division": "Marikina City",
                "school": "Marikina High School",
                "name": "Ana Reyes",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    for change in [
        json!({ "field": "academic_rank", "value": "Highest Honors" }),
        json!({ "field": "individual_contest_level", "value": "National" }),
        json!({ "field": "individual_contest_rank", "value": "1ST" }),
    ] {
        let (status, _) = send(
            router,
            json_request(Method::POST, "/api/v1/session/selections", change),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    for criterion in [
        "journalism_principles",
        "leadership_potential",
        "experience_engagement",
        "commitment_growth",
        "communication_skills",
    ] {
        let (status, _) = send(
            router,
            json_request(
                Method::PUT,
                "/api/v1/session/interview",
                json!({ "criterion": criterion, "value": "2" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn rubric_endpoint_lists_tables_and_divisions() {
    let router = scoring_router(shared(Arc::new(MemorySink::default())));

    let (status, body) = send(
        &router,
        Request::builder()
            .uri("/api/v1/rubric")
            .body(Body::empty())
            .expect("request"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rubric"]["academic"]["Highest Honors"], 15);
    assert_eq!(body["divisions"].as_array().map(Vec::len), Some(16));
    assert_eq!(body["divisions"][0], "Caloocan City");
}

#[tokio::test]
async fn selection_updates_points_and_totals() {
    let router = scoring_router(shared(Arc::new(MemorySink::default())));

    let (_, body) = send(
        &router,
        json_request(
            Method::POST,
            "/api/v1/session/selections",
            json!({ "field": "special_award_level", "value": "Division" }),
        ),
    )
    .await;
    assert_eq!(body["state"]["special_awards"]["points"], 0);

    let (status, body) = send(
        &router,
        json_request(
            Method::POST,
            "/api/v1/session/selections",
            json!({ "field": "special_award_rank", "value": "2ND" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["special_awards"]["points"], 6);
    assert_eq!(body["category_total"], 6);
    assert_eq!(body["grand_total"], "6.00");

    let (_, body) = send(
        &router,
        json_request(
            Method::PUT,
            "/api/v1/session/interview",
            json!({ "criterion": "communication_skills", "value": 7.5 }),
        ),
    )
    .await;
    assert_eq!(body["interview_total"], 2.0);
    assert_eq!(body["grand_total"], "8.00");
}

#[tokio::test]
async fn unknown_selection_field_is_rejected() {
    let router = scoring_router(shared(Arc::new(MemorySink::default())));

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/session/selections",
            json!({ "field": "bonus_points", "value": "National" }),
        ))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn submit_with_blank_info_reports_missing_labels() {
    let router = scoring_router(shared(Arc::new(MemorySink::default())));

    let (status, body) = send(
        &router,
        json_request(Method::POST, "/api/v1/session/submit", json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["missing"],
        json!(["Division", "School", "Candidate Name"])
    );
    assert_eq!(body["notices"][0]["title"], "Required Information");
    assert_eq!(body["session"]["submitting"], false);
}

#[tokio::test]
async fn submit_saves_record_and_returns_blank_sheet() {
    let sink = Arc::new(MemorySink::default());
    let router = scoring_router(shared(sink.clone()));
    fill_worked_example(&router).await;

    let (status, body) = send(
        &router,
        json_request(Method::POST, "/api/v1/session/submit", json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["status"], "saved");
    assert_eq!(body["outcome"]["payload"]["grandTotal"], "50.00");
    assert_eq!(body["outcome"]["payload"]["academic"], 15);
    assert_eq!(body["notices"][0]["title"], "Saved!");
    assert_eq!(body["session"]["grand_total"], "0.00");
    assert_eq!(body["session"]["submitted_count"], 1);
    assert_eq!(sink.records().len(), 1);

    fill_worked_example(&router).await;
    let (status, body) = send(
        &router,
        json_request(Method::POST, "/api/v1/session/submit", json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["status"], "duplicate_declined");
    assert_eq!(body["session"]["grand_total"], "50.00");
    assert_eq!(sink.records().len(), 1);

    let (_, body) = send(
        &router,
        json_request(
            Method::POST,
            "/api/v1/session/submit",
            json!({ "confirm_duplicate": true }),
        ),
    )
    .await;
    assert_eq!(body["outcome"]["status"], "saved");
    assert_eq!(sink.records().len(), 2);
}

#[tokio::test]
async fn failed_save_maps_to_bad_gateway() {
    let sink = Arc::new(FlakySink::failing(1));
    let router = scoring_router(shared(sink.clone()));
    fill_worked_example(&router).await;

    let (status, body) = send(
        &router,
        json_request(Method::POST, "/api/v1/session/submit", json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["notices"][0]["title"], "Sync Failed");
    assert_eq!(body["session"]["grand_total"], "50.00");
    assert!(sink.records().is_empty());
}

#[tokio::test]
async fn second_submit_is_refused_while_first_is_outstanding() {
    let sink = Arc::new(GatedSink::default());
    let router = scoring_router(shared(sink.clone()));
    fill_worked_example(&router).await;

    let first = tokio::spawn({
        let router = router.clone();
        async move {
            send(
                &router,
                json_request(Method::POST, "/api/v1/session/submit", json!({})),
            )
            .await
        }
    });
    sink.entered.notified().await;

    let (status, body) = send(
        &router,
        json_request(Method::POST, "/api/v1/session/submit", json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "a submission is already in progress");

    sink.release.notify_one();
    let (status, body) = first.await.expect("first submit task");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["status"], "saved");
    assert_eq!(sink.records().len(), 1);
}

#[tokio::test]
async fn session_stays_available_while_the_record_store_is_slow() {
    let sink = Arc::new(GatedSink::default());
    let router = scoring_router(shared(sink.clone()));
    fill_worked_example(&router).await;

    let first = tokio::spawn({
        let router = router.clone();
        async move {
            send(
                &router,
                json_request(Method::POST, "/api/v1/session/submit", json!({})),
            )
            .await
        }
    });
    sink.entered.notified().await;

    let view = Request::builder()
        .uri("/api/v1/session")
        .body(Body::empty())
        .expect("request");
    let (status, body) = tokio::time::timeout(Duration::from_secs(1), send(&router, view))
        .await
        .expect("session view answers during a save");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["submitting"], true);
    assert_eq!(body["grand_total"], "50.00");

    let edit = json_request(
        Method::POST,
        "/api/v1/session/selections",
        json!({ "field": "training_level", "value": "National" }),
    );
    let (status, body) = tokio::time::timeout(Duration::from_secs(1), send(&router, edit))
        .await
        .expect("selection answers during a save");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grand_total"], "55.00");

    sink.release.notify_one();
    let (status, body) = first.await.expect("first submit task");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["status"], "saved");
    assert_eq!(body["outcome"]["payload"]["grandTotal"], "50.00");
    assert_eq!(body["session"]["grand_total"], "0.00");
    assert_eq!(body["session"]["submitting"], false);
    assert_eq!(sink.records().len(), 1);
}

#[tokio::test]
async fn reset_requires_confirmation() {
    let router = scoring_router(shared(Arc::new(MemorySink::default())));
    fill_worked_example(&router).await;

    let (_, body) = send(
        &router,
        json_request(Method::POST, "/api/v1/session/reset", json!({})),
    )
    .await;
    assert_eq!(body["cleared"], false);
    assert_eq!(body["session"]["grand_total"], "50.00");

    let (_, body) = send(
        &router,
        json_request(
            Method::POST,
            "/api/v1/session/reset",
            json!({ "confirm": true }),
        ),
    )
    .await;
    assert_eq!(body["cleared"], true);
    assert_eq!(body["notices"][0]["title"], "Cleared!");
    assert_eq!(body["session"]["grand_total"], "0.00");
    assert_eq!(body["session"]["state"]["info"]["name"], "");
}
