//! Highlight endpoint
//!
//! POST /highlight with a multipart body:
//! - `file`: the PDF to annotate
//! - `reading_time`: positive integer, minutes

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::highlight::Upload;
use crate::oracle::{CandidateSentence, DurationBudget};
use crate::state::AppState;

const DEFAULT_FILENAME: &str = "document.pdf";

#[derive(Debug, Serialize)]
pub struct HighlightResponse {
    /// Absolute URL of the annotated PDF
    pub file_url: String,
    /// Pages in the uploaded document
    pub pages: usize,
    pub candidates: Vec<CandidateSentence>,
    /// Number of highlight annotations written
    pub highlights: usize,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/highlight", post(highlight_document))
}

/// POST /highlight
async fn highlight_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<HighlightResponse>> {
    let mut upload: Option<Upload> = None;
    let mut reading_time: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Input(format!("Failed to read upload: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field
                    .file_name()
                    .filter(|s| !s.is_empty())
                    .unwrap_or(DEFAULT_FILENAME)
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Input(format!("Failed to read file data: {}", e)))?;

                tracing::debug!("Received file '{}' ({} bytes)", filename, bytes.len());
                upload = Some(Upload {
                    bytes: bytes.to_vec(),
                    filename,
                });
            }
            "reading_time" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Input(format!("Failed to read reading_time: {}", e)))?;
                reading_time = Some(text);
            }
            other => tracing::debug!("Ignoring multipart field '{}'", other),
        }
    }

    let upload = upload.ok_or_else(|| AppError::Input("Missing 'file' field".to_string()))?;
    if upload.bytes.is_empty() {
        return Err(AppError::Input("Uploaded file is empty".to_string()));
    }

    let reading_time =
        reading_time.ok_or_else(|| AppError::Input("Missing 'reading_time' field".to_string()))?;
    let budget = DurationBudget::parse(&reading_time)?;

    let outcome = state.pipeline().run(upload, budget).await?;

    Ok(Json(HighlightResponse {
        file_url: outcome.file_url,
        pages: outcome.pages,
        candidates: outcome.candidates,
        highlights: outcome.regions,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use serde_json::Value;

    use crate::mupdf::SafeDocument;
    use crate::oracle::{MockOracle, OracleError};
    use crate::routes::test_helpers::test_server;
    use crate::test_support::{count_highlights, text_pdf};

    fn pdf_part(bytes: Vec<u8>) -> Part {
        Part::bytes(bytes)
            .file_name("paper.pdf")
            .mime_type("application/pdf")
    }

    fn form(bytes: Vec<u8>, reading_time: &str) -> MultipartForm {
        MultipartForm::new()
            .add_part("file", pdf_part(bytes))
            .add_text("reading_time", reading_time.to_string())
    }

    #[tokio::test]
    async fn test_highlight_returns_resolvable_pdf() {
        let tmp = tempfile::tempdir().unwrap();
        let server = test_server(
            MockOracle::replying(r#"[{"sentence": "Reading is the key skill."}]"#),
            tmp.path(),
        );

        let input = text_pdf(&["Chapter one.\nReading is the key skill.\nThe end."]);
        let response = server.post("/highlight").multipart(form(input, "5")).await;

        response.assert_status_ok();
        let body: Value = response.json();
        let file_url = body["file_url"].as_str().unwrap();
        assert!(file_url.starts_with("http://127.0.0.1:8000/outputs/highlighted_"));
        assert!(file_url.ends_with("_paper.pdf"));
        assert!(body["highlights"].as_u64().unwrap() >= 1);
        assert_eq!(body["pages"], 1);

        let name = file_url.rsplit('/').next().unwrap();
        let download = server.get(&format!("/outputs/{}", name)).await;
        download.assert_status_ok();

        let bytes = download.as_bytes().to_vec();
        assert!(count_highlights(&bytes) >= 1);
        assert!(SafeDocument::from_bytes(bytes).is_ok());
    }

    #[tokio::test]
    async fn test_missing_file_is_bad_request() {
        let tmp = tempfile::tempdir().unwrap();
        let server = test_server(MockOracle::replying("[]"), tmp.path());

        let form = MultipartForm::new().add_text("reading_time", "5");
        let response = server.post("/highlight").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["detail"].as_str().unwrap().contains("file"));
    }

    #[tokio::test]
    async fn test_missing_reading_time_is_bad_request() {
        let tmp = tempfile::tempdir().unwrap();
        let server = test_server(MockOracle::replying("[]"), tmp.path());

        let form = MultipartForm::new().add_part("file", pdf_part(text_pdf(&["Text."])));
        let response = server.post("/highlight").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_reading_time_is_bad_request() {
        let tmp = tempfile::tempdir().unwrap();
        let server = test_server(MockOracle::replying("[]"), tmp.path());

        for bad in ["0", "abc", "-3", "2.5"] {
            let response = server
                .post("/highlight")
                .multipart(form(text_pdf(&["Text."]), bad))
                .await;
            response.assert_status(StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_non_pdf_is_bad_request() {
        let tmp = tempfile::tempdir().unwrap();
        let server = test_server(MockOracle::replying("[]"), tmp.path());

        let response = server
            .post("/highlight")
            .multipart(form(b"plain text, not a pdf".to_vec(), "5"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oracle_failure_is_bad_gateway() {
        let tmp = tempfile::tempdir().unwrap();
        let server = test_server(
            MockOracle::failing(OracleError::Connection("refused".into())),
            tmp.path(),
        );

        let response = server
            .post("/highlight")
            .multipart(form(text_pdf(&["Some text."]), "5"))
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: Value = response.json();
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .starts_with("oracle unavailable"));
    }

    #[tokio::test]
    async fn test_unknown_output_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let server = test_server(MockOracle::replying("[]"), tmp.path());

        let response = server.get("/outputs/highlighted_missing.pdf").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
