// src/main.rs

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware as axum_middleware,
    middleware::Next,
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::common::error::ApiError;
use crate::config::AppState;

async fn local_guard(
    State(_s): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    request.extensions_mut();
    Ok(next.run(request).await)
}

#[tokio::main]
async fn main() {
    let app_state = AppState::new().await.expect("fail");

    let user_routes: Router<AppState> = Router::new()
        .route("/me", get(|| async { "hi" }))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            local_guard,
        ));

    let app = Router::new()
        .nest("/api/users", user_routes)
        .with_state(app_state.clone());

    let listener = TcpListener::bind(&app_state.config.bind_addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
