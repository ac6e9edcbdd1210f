// http server mode - polls over a small json api

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::core::{Poll, PollStats, PollView, VoteChange, Voter};
use crate::{Db, Error};

struct AppState {
    db: Db,
}

#[derive(Serialize)]
struct PollResponse {
    id: i64,
    total_voters: usize,
    text: String,
}

#[derive(Serialize)]
struct VoteResponse {
    change: VoteChange,
    poll: PollResponse,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

type Failure = (StatusCode, Json<ErrorResponse>);

pub struct Server;

impl Server {
    pub async fn run(db: Db, host: &str, port: u16) -> Result<(), Error> {
        let app = Self::router(db);

        let addr = format!("{host}:{port}");
        tracing::info!("server running at http://{addr}");

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        Ok(())
    }

    pub fn router(db: Db) -> Router {
        let state = Arc::new(AppState { db });

        Router::new()
            .route("/health", get(health))
            .route("/polls/{poll_id}", get(show_poll))
            .route("/polls/{poll_id}/stats", get(poll_stats))
            .route("/polls/{poll_id}/answers/{answer_id}/vote", post(vote))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn show_poll(
    State(state): State<Arc<AppState>>,
    Path(poll_id): Path<i64>,
) -> Result<Json<PollResponse>, Failure> {
    let poll = Poll::load(&state.db, poll_id).await.map_err(failure)?;
    Ok(Json(poll_response(&poll)))
}

async fn poll_stats(
    State(state): State<Arc<AppState>>,
    Path(poll_id): Path<i64>,
) -> Result<Json<PollStats>, Failure> {
    let poll = Poll::load(&state.db, poll_id).await.map_err(failure)?;
    Ok(Json(poll.stats()))
}

async fn vote(
    State(state): State<Arc<AppState>>,
    Path((poll_id, answer_id)): Path<(i64, i64)>,
    Json(voter): Json<Voter>,
) -> Result<Json<VoteResponse>, Failure> {
    let mut poll = Poll::load(&state.db, poll_id).await.map_err(failure)?;
    let change = poll
        .toggle_vote(&state.db, answer_id, voter)
        .await
        .map_err(failure)?;

    Ok(Json(VoteResponse {
        change,
        poll: poll_response(&poll),
    }))
}

fn poll_response(poll: &Poll) -> PollResponse {
    PollResponse {
        id: poll.id(),
        total_voters: poll.total_voters(),
        text: poll.to_string(),
    }
}

fn failure(e: Error) -> Failure {
    let status = match e {
        Error::AnswerNotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!(error = %e, "request failed");
    }
    (status, Json(ErrorResponse { error: e.to_string() }))
}
