//! Thin HTTP surface over the two pipelines.
//!
//! Handlers contain no pipeline logic: they adapt the transport (multipart
//! upload, JSON body) to the pipeline call contract and map `PipelineError`
//! onto the wire envelopes.

use crate::error::{PipelineError, PipelineResult};
use crate::model::{ExtractedItem, IngredientRef};
use crate::pipelines::{ExtractionPipeline, RecommendationPipeline};
use crate::upload::TempImage;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use log::{error, warn};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Shared handles for the two request pipelines.
#[derive(Clone)]
pub struct AppState {
    pub extraction: Arc<ExtractionPipeline>,
    pub recommendation: Arc<RecommendationPipeline>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/parse-ingredients", post(parse_ingredients))
        .route("/api/v1/recommend-recipe", post(recommend_recipe))
        .with_state(state)
}

/// Handler for `POST /api/v1/parse-ingredients`.
async fn parse_ingredients(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let image = match read_image_field(&mut multipart).await {
        Ok(image) => image,
        Err(response) => return response,
    };

    let result = state.extraction.run(image).await;

    // A missing upload gets a flat error body, not the status/data envelope.
    if let Err(PipelineError::InputMissing(message)) = &result {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": message}))).into_response();
    }

    respond(result.map(|items| Value::Array(items.iter().map(ExtractedItem::to_row).collect())))
}

/// Pulls the `image` field out of the multipart form and stages it on disk.
/// An absent field yields `Ok(None)`; the pipeline turns that into
/// `InputMissing` without any upstream call.
async fn read_image_field(multipart: &mut Multipart) -> Result<Option<TempImage>, Response> {
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("image") => {
                let bytes = field.bytes().await.map_err(|err| {
                    warn!("failed to read multipart image field: {err}");
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({"error": "Failed to read multipart data"})),
                    )
                        .into_response()
                })?;

                let image = TempImage::new(&bytes).map_err(|err| {
                    error!("failed to stage uploaded image: {err}");
                    envelope(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({"error": "Internal server error"}),
                    )
                })?;

                return Ok(Some(image));
            }
            Ok(Some(_)) => continue,
            Ok(None) => return Ok(None),
            Err(err) => {
                warn!("failed to read multipart form: {err}");
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": "Failed to read multipart data"})),
                )
                    .into_response());
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RecommendRequest {
    #[serde(default)]
    ingredients: Vec<IngredientRef>,
}

/// Handler for `POST /api/v1/recommend-recipe`.
async fn recommend_recipe(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Response {
    let result = state.recommendation.run(&request.ingredients).await;
    respond(result.map(|recipes| json!(recipes)))
}

/// Maps a pipeline outcome onto the status/data wire envelope.
///
/// Raw parse diagnostics and collaborator faults go to the logs; callers see
/// only the classified kind.
fn respond(result: PipelineResult<Value>) -> Response {
    match result {
        Ok(data) => envelope(StatusCode::OK, data),
        Err(PipelineError::InputMissing(message)) => {
            envelope(StatusCode::BAD_REQUEST, json!({"error": message}))
        }
        Err(PipelineError::Upstream { status, body }) => {
            let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            envelope(code, json!({"error": body}))
        }
        Err(PipelineError::ResponseFormat { detail }) => {
            warn!("model reply failed validation: {detail}");
            envelope(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "Response format error"}),
            )
        }
        Err(err) => {
            error!("request failed: {err}");
            envelope(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "Internal server error"}),
            )
        }
    }
}

fn envelope(code: StatusCode, data: Value) -> Response {
    (code, Json(json!({"status": code.as_u16(), "data": data}))).into_response()
}
