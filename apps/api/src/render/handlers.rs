//! Axum route handlers for the PDF download.

use anyhow::Context;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::layout::layout;
use crate::models::resume::ResumeInput;
use crate::preview::normalize;
use crate::preview::validation::validate_contact;
use crate::render::encode_pdf;
use crate::state::AppState;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// POST /api/downloadBrandedPdf
///
/// Normalizes the form, lays it out on the configured page geometry and
/// returns the encoded PDF as an attachment. Layout and encoding are CPU-bound
/// and run on the blocking pool.
pub async fn handle_download_pdf(
    State(state): State<AppState>,
    AppJson(input): AppJson<ResumeInput>,
) -> Result<impl IntoResponse, AppError> {
    let record = normalize(input);
    validate_contact(&record, state.config.contact_policy)?;

    let disposition = content_disposition(&record.name);
    let title = if record.name.is_empty() {
        "Resume".to_string()
    } else {
        format!("Resume - {}", record.name)
    };
    let geometry = state.config.page_geometry;

    let (pages, runs, pdf) = tokio::task::spawn_blocking(move || {
        let document = layout(
            &record,
            geometry.width(),
            geometry.height(),
            geometry.margin(),
        )?;
        let pdf = encode_pdf(&document, &title)?;
        Ok::<_, AppError>((document.pages.len(), document.run_count(), pdf))
    })
    .await
    .context("PDF render task panicked")??;

    info!(pages, runs, bytes = pdf.len(), "Rendered resume PDF");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Bytes::from(pdf),
    ))
}

/// `Jane Doe` → `Jane_Doe.pdf`; falls back to `resume.pdf`.
///
/// Whitespace runs become underscores and anything that could break the quoted
/// header value is dropped, leaving an ASCII-only name.
pub fn attachment_filename(name: &str) -> String {
    let joined = WHITESPACE_RUN.replace_all(name.trim(), "_");
    let stem: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect();
    let stem = stem.trim_matches('.');

    if stem.is_empty() {
        "resume.pdf".to_string()
    } else {
        format!("{stem}.pdf")
    }
}

/// `attachment` header carrying the ASCII fallback name plus, when the name has
/// characters the fallback dropped, an RFC 5987 `filename*` with the full name.
pub fn content_disposition(name: &str) -> String {
    let ascii = attachment_filename(name);
    let joined = WHITESPACE_RUN.replace_all(name.trim(), "_");
    let full: String = joined
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '"' | '/' | '\\'))
        .collect();
    let full = format!("{}.pdf", full.trim_matches('.'));

    if full == ascii || full == ".pdf" {
        format!("attachment; filename=\"{ascii}\"")
    } else {
        format!(
            "attachment; filename=\"{ascii}\"; filename*=UTF-8''{}",
            urlencoding::encode(&full)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::to_bytes;
    use serde_json::json;

    fn state() -> AppState {
        AppState::new(Config::from_lookup(|_| None).unwrap())
    }

    #[test]
    fn test_attachment_filename() {
        assert_eq!(attachment_filename("Jane Doe"), "Jane_Doe.pdf");
        assert_eq!(attachment_filename("  Jane \t  Q.  Doe "), "Jane_Q._Doe.pdf");
        assert_eq!(attachment_filename(""), "resume.pdf");
        assert_eq!(attachment_filename("\"/\\"), "resume.pdf");
        assert_eq!(attachment_filename("José"), "Jos.pdf");
    }

    #[test]
    fn test_content_disposition_ascii_name() {
        assert_eq!(
            content_disposition("Jane Doe"),
            "attachment; filename=\"Jane_Doe.pdf\""
        );
        assert_eq!(content_disposition(""), "attachment; filename=\"resume.pdf\"");
    }

    #[test]
    fn test_content_disposition_keeps_unicode_name() {
        assert_eq!(
            content_disposition("José Núñez"),
            "attachment; filename=\"Jos_Nez.pdf\"; filename*=UTF-8''Jos%C3%A9_N%C3%BA%C3%B1ez.pdf"
        );
        assert_eq!(
            content_disposition("李雷"),
            "attachment; filename=\"resume.pdf\"; filename*=UTF-8''%E6%9D%8E%E9%9B%B7.pdf"
        );
    }

    #[tokio::test]
    async fn test_download_returns_pdf_attachment() {
        let input: ResumeInput = serde_json::from_value(json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "skills": "Rust, Go",
            "experience": "• Built the thing\nLed the team"
        }))
        .unwrap();

        let response = handle_download_pdf(State(state()), AppJson(input))
            .await
            .unwrap()
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Jane_Doe.pdf\""
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_download_with_empty_input_still_renders() {
        let response = handle_download_pdf(State(state()), AppJson(ResumeInput::default()))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume.pdf\""
        );
    }
}
