use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderName, Method, StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::{
    collect::OUTPUT_PREFIX,
    error::GatewayError,
    gateway::{Gateway, RecognizeRequest},
};

/// Builds the HTTP surface: the recognize endpoint plus the static output tree.
pub fn router(gateway: Arc<Gateway>) -> Router {
    let output = ServeDir::new(&gateway.config().output_root);

    // OPTIONS never reaches the router: the CORS layer answers it with 200.
    let api = Router::new()
        .route("/recognize", post(recognize))
        .layer(DefaultBodyLimit::disable())
        .layer(cors_layer())
        .with_state(gateway);

    api.nest_service(OUTPUT_PREFIX, output)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::POST,
            Method::GET,
            Method::OPTIONS,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::CONTENT_LENGTH,
            header::ACCEPT_ENCODING,
            HeaderName::from_static("x-csrf-token"),
            header::AUTHORIZATION,
        ])
}

async fn recognize(
    State(gateway): State<Arc<Gateway>>,
    body: Bytes,
) -> Result<impl IntoResponse, GatewayError> {
    let request = RecognizeRequest::parse(&body)?;
    log::info!("Got recognize request {:?}", request);

    let urls = gateway.recognize(&request).await?;

    log::info!("Sending recognize response: {:?}", urls);
    Ok((StatusCode::OK, Json(urls)))
}
