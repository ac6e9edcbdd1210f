// tests for the http api

use axum::body::Body;
use axum::http::{Request, StatusCode};
use pollvote::{Answer, Db, Server};
use tower::ServiceExt;

async fn setup() -> (axum::Router, i64) {
    let db = Db::connect("sqlite::memory:").await.unwrap();
    let mut answer = Answer::new(&1_i64, "yes");
    let answer_id = answer.store(&db).await.unwrap();
    Answer::new(&1_i64, "no").store(&db).await.unwrap();
    (Server::router(db), answer_id)
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn vote_request(answer_id: i64, voter: serde_json::Value) -> Request<Body> {
    Request::post(format!("/polls/1/answers/{answer_id}/vote"))
        .header("content-type", "application/json")
        .body(Body::from(voter.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let (app, _) = setup().await;
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn test_show_poll() {
    let (app, _) = setup().await;
    let response = app
        .oneshot(Request::get("/polls/1").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["total_voters"], 0);
    assert!(body["text"].as_str().unwrap().ends_with("Nobody voted so far\\."));
}

#[tokio::test]
async fn test_vote_toggles() {
    let (app, answer_id) = setup().await;
    let voter = serde_json::json!({ "id": 42, "first_name": "Eve" });

    let response = app
        .clone()
        .oneshot(vote_request(answer_id, voter.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["change"], "cast");
    assert_eq!(body["poll"]["total_voters"], 1);
    assert!(
        body["poll"]["text"]
            .as_str()
            .unwrap()
            .contains("[Eve](tg://user?id=42)")
    );

    let response = app.oneshot(vote_request(answer_id, voter)).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["change"], "retracted");
    assert_eq!(body["poll"]["total_voters"], 0);
}

#[tokio::test]
async fn test_vote_unknown_answer() {
    let (app, _) = setup().await;
    let voter = serde_json::json!({ "id": 42, "first_name": "Eve" });

    let response = app.oneshot(vote_request(999, voter)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(
        json_body(response).await["error"]
            .as_str()
            .unwrap()
            .contains("999")
    );
}

#[tokio::test]
async fn test_stats() {
    let (app, answer_id) = setup().await;
    let voter = serde_json::json!({ "id": 7, "first_name": "Ann", "username": "ann" });
    app.clone()
        .oneshot(vote_request(answer_id, voter))
        .await
        .unwrap();

    let response = app
        .oneshot(Request::get("/polls/1/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = json_body(response).await;

    assert_eq!(body["answers"][0]["id"], answer_id);
    assert_eq!(body["answers"][0]["voters"]["total"], 1);
    assert_eq!(body["answers"][0]["voters"]["_"][0]["username"], "ann");
    assert_eq!(body["answers"][1]["voters"]["total"], 0);
}
