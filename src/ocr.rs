use crate::error::{PipelineError, PipelineResult};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::path::Path;
use tokio::fs;

/// One text fragment recognized by the OCR engine, in engine-reported order.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Corner points of the bounding region, as reported by the engine.
    pub region: Vec<[i64; 2]>,
    pub text: String,
    pub confidence: Option<f64>,
}

/// Narrow contract for the OCR collaborator.
///
/// Fragment ordering (top-to-bottom, left-to-right) is the engine's
/// responsibility; engine faults are fatal to the request.
#[async_trait]
pub trait TextReader: Send + Sync {
    async fn read_text(&self, image_path: &Path, locale: &str) -> PipelineResult<Vec<Detection>>;
}

/// Joins recognized fragments into a single text blob, preserving detection
/// order. No deduplication, case-folding, or confidence filtering happens
/// here: correcting OCR noise is delegated to the language model, steered by
/// the extraction prompt.
pub fn join_detections(detections: &[Detection]) -> String {
    detections
        .iter()
        .map(|d| d.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

pub const DEFAULT_VISION_BASE_URL: &str = "https://vision.googleapis.com";

/// OCR via the Google Cloud Vision text-detection API.
pub struct GoogleVisionReader {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleVisionReader {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_VISION_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        GoogleVisionReader {
            client: Client::new(),
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl TextReader for GoogleVisionReader {
    async fn read_text(&self, image_path: &Path, locale: &str) -> PipelineResult<Vec<Detection>> {
        let image_data = fs::read(image_path).await?;
        let base64_image = STANDARD.encode(&image_data);

        let url = format!("{}/v1/images:annotate?key={}", self.base_url, self.api_key);
        let request_body = json!({
            "requests": [{
                "image": {
                    "content": base64_image
                },
                "features": [{
                    "type": "TEXT_DETECTION"
                }],
                "imageContext": {
                    "languageHints": [locale]
                }
            }]
        });

        debug!("sending OCR request for {}", image_path.display());

        let response = self.client.post(&url).json(&request_body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Ocr(format!(
                "vision API returned {status}: {body}"
            )));
        }

        let response_body: Value = response.json().await?;
        let detections = parse_annotations(&response_body);
        debug!("OCR produced {} fragment(s)", detections.len());

        Ok(detections)
    }
}

/// Maps the engine's annotation list to detections. The first annotation is
/// the full-page blob, so per-fragment entries start at index 1. An image with
/// no recognizable text yields an empty list, not an error.
fn parse_annotations(body: &Value) -> Vec<Detection> {
    let annotations = match body["responses"][0]["textAnnotations"].as_array() {
        Some(list) if list.len() > 1 => &list[1..],
        _ => return Vec::new(),
    };

    annotations
        .iter()
        .filter_map(|annotation| {
            let text = annotation["description"].as_str()?.to_string();
            let region = annotation["boundingPoly"]["vertices"]
                .as_array()
                .map(|vertices| {
                    vertices
                        .iter()
                        // The engine omits zero-valued coordinates.
                        .map(|v| [v["x"].as_i64().unwrap_or(0), v["y"].as_i64().unwrap_or(0)])
                        .collect()
                })
                .unwrap_or_default();
            let confidence = annotation["confidence"].as_f64();

            Some(Detection {
                region,
                text,
                confidence,
            })
        })
        .collect()
}
