//! Axum route handlers for the analysis API.

use axum::{
    extract::{
        multipart::{Field, MultipartError},
        Multipart, State,
    },
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::assessment::{assess, Assessment};
use crate::analysis::scoring::{score, skill_breakdown, ScoreResult, ScoringWeights, SkillMatch};
use crate::documents::{decode_document, DocumentInfo};
use crate::errors::AppError;
use crate::extraction::jd::{parse_jd, ParsedJD};
use crate::extraction::resume::{parse_resume, ParsedResume};
use crate::state::AppState;
use crate::taxonomy::{Skill, Taxonomy};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SkillsResponse {
    pub count: usize,
    pub categories: Vec<String>,
    pub skills: Vec<Skill>,
}

#[derive(Debug, Serialize)]
pub struct ParseResumeResponse {
    pub document: DocumentInfo,
    pub resume: ParsedResume,
}

#[derive(Debug, Deserialize)]
pub struct ParseJdRequest {
    pub jd_text: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub resume_text: String,
    pub jd_text: String,
    pub weights: Option<ScoringWeights>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub resume: ParsedResume,
    pub job_description: ParsedJD,
    pub score: ScoreResult,
    pub skill_breakdown: Vec<SkillMatch>,
    pub assessment: Assessment,
}

/// One uploaded file pulled out of a multipart body.
struct Upload {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Extract → score → assess. Synchronous and infallible once text is in hand.
fn run_analysis(
    taxonomy: &Taxonomy,
    resume_text: &str,
    jd_text: &str,
    weights: &ScoringWeights,
) -> AnalyzeResponse {
    let resume = parse_resume(resume_text, taxonomy);
    let job_description = parse_jd(jd_text, taxonomy);
    let score = score(taxonomy, &resume, &job_description, weights);
    let skill_breakdown = skill_breakdown(taxonomy, &resume, &job_description);
    let assessment = assess(taxonomy, &resume, &job_description, &score);

    info!(
        overall = score.overall_score,
        recommendation = assessment.recommendation.label(),
        "Analysis complete"
    );

    AnalyzeResponse {
        resume,
        job_description,
        score,
        skill_breakdown,
        assessment,
    }
}

/// Request weights override the configured ones, after validation.
fn resolve_weights(
    state: &AppState,
    requested: Option<ScoringWeights>,
) -> Result<ScoringWeights, AppError> {
    match requested {
        Some(weights) => {
            weights
                .validate()
                .map_err(|e| AppError::Validation(e.to_string()))?;
            weights.warn_if_unnormalized();
            Ok(weights)
        }
        None => Ok(state.config.scoring_weights),
    }
}

fn require_text(field: &str, text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

async fn read_upload(field: Field<'_>) -> Result<Upload, AppError> {
    Ok(Upload {
        file_name: field.file_name().map(String::from),
        content_type: field.content_type().map(String::from),
        bytes: field.bytes().await.map_err(multipart_error)?,
    })
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart body: {e}"))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/skills
pub async fn handle_list_skills(State(state): State<AppState>) -> Json<SkillsResponse> {
    let taxonomy = &state.taxonomy;
    Json(SkillsResponse {
        count: taxonomy.len(),
        categories: taxonomy.categories().into_iter().map(String::from).collect(),
        skills: taxonomy.skills().to_vec(),
    })
}

/// POST /api/v1/resumes/parse
///
/// Multipart field `resume`: a PDF, DOCX or plain-text file.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ParseResumeResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("resume") {
            upload = Some(read_upload(field).await?);
        }
    }
    let upload =
        upload.ok_or_else(|| AppError::Validation("Missing multipart field 'resume'".to_string()))?;

    let decoded = decode_document(
        upload.file_name.as_deref(),
        upload.content_type.as_deref(),
        upload.bytes,
    )
    .await?;

    Ok(Json(ParseResumeResponse {
        resume: parse_resume(&decoded.text, &state.taxonomy),
        document: decoded.info,
    }))
}

/// POST /api/v1/jobs/parse
pub async fn handle_parse_jd(
    State(state): State<AppState>,
    Json(request): Json<ParseJdRequest>,
) -> Result<Json<ParsedJD>, AppError> {
    require_text("jd_text", &request.jd_text)?;

    Ok(Json(parse_jd(&request.jd_text, &state.taxonomy)))
}

/// POST /api/v1/analyze
///
/// Multipart: `resume` file, and either a `job_description` file or a `jd_text` field.
/// Optional `weights` field holds a JSON `ScoringWeights` object.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut resume_upload = None;
    let mut jd_upload = None;
    let mut jd_text = None;
    let mut weights = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => resume_upload = Some(read_upload(field).await?),
            Some("job_description") => jd_upload = Some(read_upload(field).await?),
            Some("jd_text") => jd_text = Some(field.text().await.map_err(multipart_error)?),
            Some("weights") => {
                let raw = field.text().await.map_err(multipart_error)?;
                let parsed: ScoringWeights = serde_json::from_str(&raw)
                    .map_err(|e| AppError::Validation(format!("Invalid weights JSON: {e}")))?;
                weights = Some(parsed);
            }
            _ => {}
        }
    }

    let resume_upload = resume_upload
        .ok_or_else(|| AppError::Validation("Missing multipart field 'resume'".to_string()))?;
    let weights = resolve_weights(&state, weights)?;

    // Documents are decoded one after the other; either failure aborts the request.
    let resume_text = decode_document(
        resume_upload.file_name.as_deref(),
        resume_upload.content_type.as_deref(),
        resume_upload.bytes,
    )
    .await?
    .text;

    let jd_text = match (jd_upload, jd_text) {
        (Some(upload), _) => {
            decode_document(
                upload.file_name.as_deref(),
                upload.content_type.as_deref(),
                upload.bytes,
            )
            .await?
            .text
        }
        (None, Some(text)) => text,
        (None, None) => {
            return Err(AppError::Validation(
                "Provide either a 'job_description' file or a 'jd_text' field".to_string(),
            ))
        }
    };
    require_text("jd_text", &jd_text)?;

    Ok(Json(run_analysis(&state.taxonomy, &resume_text, &jd_text, &weights)))
}

/// POST /api/v1/analyze/text
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    require_text("resume_text", &request.resume_text)?;
    require_text("jd_text", &request.jd_text)?;
    let weights = resolve_weights(&state, request.weights)?;

    Ok(Json(run_analysis(
        &state.taxonomy,
        &request.resume_text,
        &request.jd_text,
        &weights,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::analysis::assessment::Recommendation;
    use crate::analysis::test_logs::capture_logs;
    use crate::config::Config;
    use crate::routes::build_router;

    const RESUME: &str = "Jane Doe\njane@example.com\n\nExperience\n2018 - 2024 Senior Engineer at Acme, 6 years building Python and Docker services\n\nEducation\nBachelor of Science in Computer Science\n";
    const JD: &str = "Position: Backend Engineer\nRequired Skills: Python, Docker\nPreferred: Kubernetes\nWe value a Computer Science degree.";

    fn test_state() -> AppState {
        AppState {
            config: Config {
                port: 0,
                rust_log: "debug".to_string(),
                skills_taxonomy_path: None,
                max_upload_bytes: 1024 * 1024,
                scoring_weights: ScoringWeights::default(),
            },
            taxonomy: Arc::new(Taxonomy::builtin().unwrap()),
        }
    }

    fn app() -> Router {
        build_router(test_state())
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn json_post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// Parts are `(field name, Some((file name, content type)) for files, contents)`.
    fn multipart_post(uri: &str, parts: &[(&str, Option<(&str, &str)>, &str)]) -> Request<Body> {
        const BOUNDARY: &str = "XTESTBOUNDARY";
        let mut body = String::new();
        for (name, file, contents) in parts {
            body.push_str(&format!("--{BOUNDARY}\r\n"));
            match file {
                Some((file_name, content_type)) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                )),
            }
            body.push_str(contents);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[test]
    fn test_run_analysis_pipeline() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let response = run_analysis(&taxonomy, RESUME, JD, &ScoringWeights::default());

        assert_eq!(response.resume.name.as_deref(), Some("Jane Doe"));
        assert_eq!(response.job_description.title.as_deref(), Some("Backend Engineer"));
        assert!(response.score.missing_required_skills.is_empty());
        assert_eq!(response.score.required_skills_score, 100);
        assert_eq!(response.assessment.score, response.score);
        assert!(response
            .skill_breakdown
            .iter()
            .any(|m| m.skill == "Kubernetes" && !m.found_in_resume));
    }

    #[test]
    fn test_run_analysis_with_unrelated_resume_is_strong_no() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let response = run_analysis(
            &taxonomy,
            "Pat Smith\nPastry chef and baker",
            JD,
            &ScoringWeights::default(),
        );
        assert_eq!(response.score.required_skills_score, 0);
        assert_eq!(response.score.experience_score, 0);
        assert_eq!(response.assessment.recommendation, Recommendation::StrongNo);
    }

    #[test]
    fn test_request_weights_off_unit_sum_are_used_and_logged() {
        let requested = ScoringWeights {
            required_skills_weight: 3.0,
            ..Default::default()
        };
        let (resolved, logs) = capture_logs(|| resolve_weights(&test_state(), Some(requested)));
        assert_eq!(resolved.unwrap(), requested);
        assert!(logs.contains("do not sum to 1.0"), "{logs}");
    }

    #[test]
    fn test_missing_request_weights_use_configured_ones() {
        let (resolved, logs) = capture_logs(|| resolve_weights(&test_state(), None));
        assert_eq!(resolved.unwrap(), ScoringWeights::default());
        assert!(logs.is_empty(), "{logs}");
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_skills() {
        let request = Request::builder()
            .uri("/api/v1/skills")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["count"].as_u64().unwrap() as usize,
            body["skills"].as_array().unwrap().len()
        );
    }

    #[tokio::test]
    async fn test_parse_jd_endpoint() {
        let (status, body) = send(json_post("/api/v1/jobs/parse", json!({ "jd_text": JD }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Backend Engineer");
    }

    #[tokio::test]
    async fn test_parse_jd_rejects_blank_text() {
        let (status, body) =
            send(json_post("/api/v1/jobs/parse", json!({ "jd_text": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_analyze_text_endpoint() {
        let (status, body) = send(json_post(
            "/api/v1/analyze/text",
            json!({ "resume_text": RESUME, "jd_text": JD }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"]["required_skills_score"], 100);
        assert!(body["assessment"]["recommendation"].is_string());
        assert_eq!(body["assessment"]["candidate_name"], "Jane Doe");
    }

    #[tokio::test]
    async fn test_analyze_text_rejects_negative_weights() {
        let (status, _) = send(json_post(
            "/api/v1/analyze/text",
            json!({
                "resume_text": RESUME,
                "jd_text": JD,
                "weights": { "required_skills_weight": -1.0 }
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_parse_resume_upload() {
        let (status, body) = send(multipart_post(
            "/api/v1/resumes/parse",
            &[("resume", Some(("cv.txt", "text/plain")), RESUME)],
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resume"]["email"], "jane@example.com");
        assert_eq!(body["document"]["kind"], "plain_text");
    }

    #[tokio::test]
    async fn test_parse_resume_unsupported_type() {
        let (status, body) = send(multipart_post(
            "/api/v1/resumes/parse",
            &[("resume", Some(("cv.exe", "application/octet-stream")), "MZ")],
        ))
        .await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_DOCUMENT");
    }

    #[tokio::test]
    async fn test_analyze_upload_with_jd_text_field() {
        let (status, body) = send(multipart_post(
            "/api/v1/analyze",
            &[("resume", Some(("cv.txt", "text/plain")), RESUME), ("jd_text", None, JD)],
        ))
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["job_description"]["title"], "Backend Engineer");
    }

    #[tokio::test]
    async fn test_analyze_upload_requires_jd() {
        let (status, body) = send(multipart_post(
            "/api/v1/analyze",
            &[("resume", Some(("cv.txt", "text/plain")), RESUME)],
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
