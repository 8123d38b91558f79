use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chemsure_chemical_database::{ChemicalService, ReferenceIndex};
use chemsure_document_processing::{
    MsdsScanner, PageRasterizer, PdftoppmRasterizer, TesseractRecognizer, TextAcquisition, TextExtractor,
    TextRecognizer,
};
use chemsure_models::ReferenceRecord;
use chemsure_utils::{AppConfig, ChemsureError, ChemsureResult, ReferenceLoader};
use image::{DynamicImage, GrayImage};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::middleware::REQUEST_ID_HEADER;
use crate::routes::create_app;
use crate::AppState;

const SHEET_TEXT: &str = "SECTION 3: Composition/Information on Ingredients\n\
    Acetaldehyde 75-07-0 0.5%\nToluene 108-88-3 12%\nWater 7732-18-5 balance\n\
    SECTION 4: First Aid Measures";

struct FixedText(&'static str);

impl TextExtractor for FixedText {
    fn extract_pages(&self, _data: &[u8]) -> ChemsureResult<Vec<String>> {
        Ok(vec![self.0.to_string()])
    }
}

struct UnreadableText;

impl TextExtractor for UnreadableText {
    fn extract_pages(&self, _data: &[u8]) -> ChemsureResult<Vec<String>> {
        Err(ChemsureError::extraction_failed("broken xref table"))
    }
}

struct BlankPage;

impl PageRasterizer for BlankPage {
    fn rasterize(&self, _data: &[u8], _dpi: u32) -> ChemsureResult<Vec<DynamicImage>> {
        Ok(vec![DynamicImage::ImageLuma8(GrayImage::new(4, 4))])
    }
}

impl TextRecognizer for BlankPage {
    fn recognize(&self, _page: &GrayImage) -> ChemsureResult<String> {
        Ok(String::new())
    }
}

fn scanner(text: &'static str) -> MsdsScanner {
    MsdsScanner::new(TextAcquisition::new(
        Arc::new(FixedText(text)),
        Arc::new(PdftoppmRasterizer::new("/nonexistent/bin/pdftoppm")),
        Arc::new(TesseractRecognizer::new("/nonexistent/bin/tesseract", "eng")),
    ))
}

fn loaded_service() -> ChemicalService {
    ChemicalService::with_index(ReferenceIndex::build(vec![
        ReferenceRecord::new(Some("Acetaldehyde"), Some("75-07-0"))
            .with_classification("D", "FI")
            .with_catalog_ids("1", "100"),
        ReferenceRecord::new(Some("Toluene"), Some("108-88-3")).with_classification("D", "LR"),
    ]))
}

fn app_with(chemicals: ChemicalService, text: &'static str) -> Router {
    create_app(AppState::new(AppConfig::default(), chemicals, scanner(text)).unwrap())
}

fn app() -> Router {
    app_with(loaded_service(), SHEET_TEXT)
}

fn unloaded_app() -> Router {
    app_with(
        ChemicalService::new("/nonexistent/gadsl.xlsx", ReferenceLoader::new()),
        SHEET_TEXT,
    )
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn upload(field: &str, filename: &str, content: &[u8]) -> Request<Body> {
    let boundary = "chemsure-test-boundary";
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: application/pdf\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload_msds_pdf")
        .header("content-type", format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_lookup_by_cas_hit() {
    let (status, body) = send(app(), json_post("/lookup_by_cas_rn", json!({"cas_rn": " 75-07-0 "}))).await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["cas_rn"], "75-07-0");
    assert_eq!(results[0]["gadsl_hash"], "1");
    assert_eq!(results[0]["generic_examples"], "N/A");
    assert_eq!(results[0]["reporting_threshold"], "0.1%");
    assert!(!results[0]["summary"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_lookup_miss_is_empty_results() {
    let (status, body) = send(app(), json_post("/lookup_by_cas_rn", json!({"cas_rn": "9999-99-9"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"results": []}));
}

#[tokio::test]
async fn test_lookup_by_name_ignores_case() {
    let (status, body) = send(
        app(),
        json_post("/lookup_by_substance_name", json!({"substance_name": "  TOLUENE"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["substance_name"], "Toluene");
}

#[tokio::test]
async fn test_lookup_missing_field_is_bad_request() {
    let (status, body) = send(app(), json_post("/lookup_by_cas_rn", json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = send(app(), json_post("/lookup_by_substance_name", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_lookup_before_load_is_unavailable() {
    let (status, body) = send(unloaded_app(), json_post("/lookup_by_cas_rn", json!({"cas_rn": "75-07-0"}))).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "DATA_NOT_LOADED");
}

#[tokio::test]
async fn test_upload_reports_listed_substances() {
    let (status, body) = send(app(), upload("msds_pdf", "Sheet.PDF", b"%PDF-1.4\n%test")).await;

    assert_eq!(status, StatusCode::OK);
    let cas: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["cas_rn"].as_str().unwrap())
        .collect();
    assert_eq!(cas, vec!["108-88-3", "75-07-0"]);
}

#[tokio::test]
async fn test_upload_rejects_non_pdf() {
    let (status, body) = send(app(), upload("msds_pdf", "sheet.docx", b"%PDF-1.4")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MALFORMED_INPUT");

    let (status, _) = send(app(), upload("msds_pdf", "sheet.pdf", b"GIF89a")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let (status, body) = send(app(), upload("attachment", "sheet.pdf", b"%PDF-1.4")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("No PDF file"));
}

#[tokio::test]
async fn test_upload_before_load_is_unavailable() {
    let (status, _) = send(unloaded_app(), upload("msds_pdf", "sheet.pdf", b"%PDF-1.4")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_upload_with_missing_ocr_tools_is_bad_gateway() {
    let app = app_with(loaded_service(), "scan");
    let (status, body) = send(app, upload("msds_pdf", "scan.pdf", b"%PDF-1.4")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "OCR_BACKEND_ERROR");
}

#[tokio::test]
async fn test_upload_unreadable_without_ocr_text_is_unprocessable() {
    let scanner = MsdsScanner::new(TextAcquisition::new(
        Arc::new(UnreadableText),
        Arc::new(BlankPage),
        Arc::new(BlankPage),
    ));
    let app = create_app(AppState::new(AppConfig::default(), loaded_service(), scanner).unwrap());

    let (status, body) = send(app, upload("msds_pdf", "scan.pdf", b"%PDF-1.4")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "EXTRACTION_FAILED");
}

#[tokio::test]
async fn test_validate_cas_endpoint() {
    let request = Request::builder()
        .uri("/api/v1/chemicals/7732-18-5/validate")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["format_valid"], true);
    assert_eq!(body["checksum_valid"], true);
}

#[tokio::test]
async fn test_failed_reload_keeps_serving() {
    let app = app();
    let reload = Request::builder()
        .method("POST")
        .uri("/api/v1/reference/reload")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app.clone(), reload).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "REFERENCE_DATA_ERROR");

    let (status, body) = send(app, json_post("/lookup_by_cas_rn", json!({"cas_rn": "108-88-3"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_detailed_health_reports_degraded_without_data() {
    let request = Request::builder()
        .uri("/api/v1/health/detailed")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(unloaded_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["reference"]["status"], "unhealthy");

    let request = Request::builder()
        .uri("/api/v1/health/detailed")
        .body(Body::empty())
        .unwrap();
    let (_, body) = send(app(), request).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["reference"]["cas_entries"], 2);
}

#[tokio::test]
async fn test_unknown_route_is_json_not_found() {
    let request = Request::builder().uri("/lookup_by_formula").body(Body::empty()).unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["message"].as_str().unwrap().contains("/lookup_by_formula"));
}

#[tokio::test]
async fn test_request_id_round_trip() {
    let request = Request::builder()
        .uri("/health")
        .header(REQUEST_ID_HEADER, "req-42")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-42");

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}

#[tokio::test]
async fn test_metrics_count_lookups() {
    let app = app();
    send(app.clone(), json_post("/lookup_by_cas_rn", json!({"cas_rn": "75-07-0"}))).await;

    let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(text.contains("chemsure_lookups_total{kind=\"cas\",outcome=\"hit\"} 1"));
}
