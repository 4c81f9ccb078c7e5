// src/routes.rs

use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{play, quiz},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Catalog routes (list, create, inspect, join link).
/// * Session routes (join, poll question, answer, score, results).
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    // Players open the join link from arbitrary devices.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let quiz_routes = Router::new()
        .route("/", get(quiz::list_quizzes).post(quiz::create_quiz))
        .route("/{id}", get(quiz::get_quiz))
        .route("/{id}/link", get(quiz::join_link))
        .route("/{id}/players", post(play::join))
        .route("/{id}/players/{player}/score", get(play::score))
        .route("/{id}/question", get(play::current_question))
        .route("/{id}/answers", post(play::submit_answer))
        .route("/{id}/results", get(play::results));

    Router::new()
        .nest("/api/quizzes", quiz_routes)
        // Global Middleware (outermost first)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
