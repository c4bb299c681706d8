use async_trait::async_trait;
use pantry_scan::completion::CompletionClient;
use pantry_scan::config::CompletionConfig;
use pantry_scan::error::PipelineResult;
use pantry_scan::ocr::{Detection, TextReader};
use pantry_scan::pipelines::{ExtractionPipeline, RecommendationPipeline};
use pantry_scan::server::{self, AppState};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

struct FakeReader {
    fragments: Vec<&'static str>,
}

#[async_trait]
impl TextReader for FakeReader {
    async fn read_text(&self, _image_path: &Path, _locale: &str) -> PipelineResult<Vec<Detection>> {
        Ok(self
            .fragments
            .iter()
            .map(|text| Detection {
                region: Vec::new(),
                text: text.to_string(),
                confidence: None,
            })
            .collect())
    }
}

fn completion_client(base_url: String) -> CompletionClient {
    CompletionClient::new(&CompletionConfig {
        api_key: Some("fake_api_key".to_string()),
        base_url,
        ..CompletionConfig::default()
    })
    .unwrap()
}

/// Serves the router on an ephemeral port and returns its base URL.
async fn spawn_app(completion_base_url: String, fragments: Vec<&'static str>) -> String {
    let extraction = ExtractionPipeline::new(
        Arc::new(FakeReader { fragments }),
        completion_client(completion_base_url.clone()),
        "ko",
    );
    let recommendation = RecommendationPipeline::new(completion_client(completion_base_url), 10);

    let state = AppState {
        extraction: Arc::new(extraction),
        recommendation: Arc::new(recommendation),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, server::router(state)).await.unwrap();
    });

    format!("http://{addr}")
}

fn completion_body(reply: &str) -> String {
    json!({"choices": [{"message": {"content": reply}}]}).to_string()
}

#[tokio::test]
async fn test_parse_ingredients_end_to_end() {
    let mut upstream = mockito::Server::new_async().await;
    let mock = upstream
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(
            r#"[["바나나", 2, "과일", "2024-01-01 00:00:00"], ["우유", 1, "유제품", "2024-01-01 00:00:00"]]"#,
        ))
        .create_async()
        .await;

    let app = spawn_app(upstream.url(), vec!["바나나", "2개", "우유", "사과"]).await;

    let form = reqwest::multipart::Form::new().part(
        "image",
        reqwest::multipart::Part::bytes(b"fake image bytes".to_vec()).file_name("list.png"),
    );
    let response = reqwest::Client::new()
        .post(format!("{app}/api/v1/parse-ingredients"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], 200);
    assert_eq!(
        body["data"],
        json!([
            ["바나나", 2, "과일", "2024-01-01 00:00:00"],
            ["우유", 1, "유제품", "2024-01-01 00:00:00"]
        ])
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_parse_ingredients_without_image_field() {
    let mut upstream = mockito::Server::new_async().await;
    let mock = upstream
        .mock("POST", "/v1/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let app = spawn_app(upstream.url(), vec![]).await;

    let form = reqwest::multipart::Form::new().text("note", "no image here");
    let response = reqwest::Client::new()
        .post(format!("{app}/api/v1/parse-ingredients"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "No image file provided"}));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_parse_ingredients_upstream_error_passthrough() {
    let mut upstream = mockito::Server::new_async().await;
    let _mock = upstream
        .mock("POST", "/v1/chat/completions")
        .with_status(429)
        .with_body("rate limit exceeded")
        .create_async()
        .await;

    let app = spawn_app(upstream.url(), vec!["우유"]).await;

    let form = reqwest::multipart::Form::new().part(
        "image",
        reqwest::multipart::Part::bytes(b"fake image bytes".to_vec()).file_name("list.png"),
    );
    let response = reqwest::Client::new()
        .post(format!("{app}/api/v1/parse-ingredients"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 429);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], 429);
    assert_eq!(body["data"]["error"], "rate limit exceeded");
}

#[tokio::test]
async fn test_recommend_recipe_end_to_end() {
    let mut upstream = mockito::Server::new_async().await;
    let mock = upstream
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(
            r#"[{"name": "계란찜", "ingredients": ["계란", "물"], "instructions": "계란을 풀어 찐다."}]"#,
        ))
        .create_async()
        .await;

    let app = spawn_app(upstream.url(), vec![]).await;

    let response = reqwest::Client::new()
        .post(format!("{app}/api/v1/recommend-recipe"))
        .json(&json!({"ingredients": [["우유", 1], ["계란", 2]]}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], 200);
    assert_eq!(body["data"][0]["name"], "계란찜");
    assert_eq!(body["data"][0]["ingredients"], json!(["계란", "물"]));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_recommend_recipe_with_empty_list() {
    let mut upstream = mockito::Server::new_async().await;
    let mock = upstream
        .mock("POST", "/v1/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let app = spawn_app(upstream.url(), vec![]).await;

    let response = reqwest::Client::new()
        .post(format!("{app}/api/v1/recommend-recipe"))
        .json(&json!({"ingredients": []}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"status": 400, "data": {"error": "No ingredients provided"}})
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_recommend_recipe_format_error_is_generic() {
    let mut upstream = mockito::Server::new_async().await;
    let _mock = upstream
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body("물론이죠! 계란찜은 어떠세요?"))
        .create_async()
        .await;

    let app = spawn_app(upstream.url(), vec![]).await;

    let response = reqwest::Client::new()
        .post(format!("{app}/api/v1/recommend-recipe"))
        .json(&json!({"ingredients": [["계란", 2]]}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"status": 500, "data": {"error": "Response format error"}})
    );
}
