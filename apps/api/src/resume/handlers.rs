use axum::extract::{Multipart, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::machine;
use crate::models::candidate::{
    CandidateProfile, CandidateRecord, ChatMessage, ChatRole, ResumeMeta,
};
use crate::resume::extract::{self, UNSUPPORTED_MESSAGE};
use crate::resume::profile;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub candidate_id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub file_name: String,
}

/// POST /api/v1/resume
///
/// Accepts a multipart form with a single PDF or DOCX file, extracts text and
/// contact fields, and opens a profile-collection session for the new
/// candidate. Unsupported or unparseable files are rejected before any record
/// is created.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload: Option<(String, Option<String>, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") && field.file_name().is_none() {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
        upload = Some((file_name, content_type, data.to_vec()));
        break;
    }
    let Some((file_name, content_type, data)) = upload else {
        return Err(AppError::Validation("no file in upload".to_string()));
    };
    if data.is_empty() {
        return Err(AppError::Validation("uploaded file is empty".to_string()));
    }

    let Some(kind) = extract::detect_kind(&file_name, content_type.as_deref()) else {
        return Err(AppError::UnsupportedFile(UNSUPPORTED_MESSAGE.to_string()));
    };

    // Parsing is CPU-bound, keep it off the async workers.
    let text = tokio::task::spawn_blocking(move || extract::extract_text(kind, &data))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))??;

    let mut extracted = profile::extract_profile(&text);
    if extracted.name.is_none() {
        extracted.name = profile::derive_name_from_filename(&file_name);
    }
    tracing::info!(
        file_name,
        has_name = extracted.name.is_some(),
        has_email = extracted.email.is_some(),
        has_phone = extracted.phone.is_some(),
        "resume parsed"
    );

    let now = Utc::now();
    let record = CandidateRecord {
        id: Uuid::new_v4(),
        profile: CandidateProfile {
            name: extracted.name.clone().unwrap_or_default(),
            email: extracted.email.clone().unwrap_or_default(),
            phone: extracted.phone.clone().unwrap_or_default(),
            resume_meta: Some(ResumeMeta {
                file_name: file_name.clone(),
                file_type: content_type.unwrap_or_else(|| kind.default_content_type().to_string()),
            }),
        },
        qas: vec![],
        started_at: now,
        completed_at: None,
        final_score: None,
        summary: None,
        chat_history: vec![ChatMessage {
            role: ChatRole::System,
            content: "Resume uploaded and parsed.".to_string(),
            ts: now,
        }],
    };
    let candidate_id = record.id;
    state.store.mutate(|s| machine::begin_profile(s, record));

    Ok(Json(UploadResponse {
        candidate_id,
        name: extracted.name,
        email: extracted.email,
        phone: extracted.phone,
        file_name,
    }))
}
