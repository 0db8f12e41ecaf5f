//! `POST /api/analyze`: multipart upload in, canonical tags out.

use std::time::Instant;

use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use tagforge_core::{AnalysisResult, ImageBlob, UploadRejection};
use tagforge_logging::{AnalysisEvent, AnalysisOutcome, EventLogger};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::server::AppState;

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

pub async fn analyze_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    let provider = state.analyzer.provider_name().to_string();
    let started = Instant::now();

    let outcome = run(&state, multipart, &request_id).await;

    let event_outcome = match &outcome {
        Ok(result) => AnalysisOutcome::Completed {
            tag_count: result.len(),
        },
        Err(ApiError::Rejected(rejection)) => AnalysisOutcome::Rejected {
            code: rejection.code().to_string(),
        },
        Err(ApiError::Failed(err)) => AnalysisOutcome::Failed {
            kind: err.kind().to_string(),
            detail: err.to_string(),
        },
    };
    EventLogger::log_event(&AnalysisEvent::new(
        &request_id,
        provider,
        started.elapsed().as_millis() as u64,
        event_outcome,
    ));

    outcome.map(Json)
}

async fn run(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
    request_id: &str,
) -> Result<AnalysisResult, ApiError> {
    let multipart = multipart.map_err(|rejection| {
        debug!(request_id, error = %rejection, "Request is not multipart");
        UploadRejection::MissingFile
    })?;

    let image = read_image(multipart, state.max_upload_bytes).await?;
    info!(
        request_id,
        filename = image.filename(),
        mime_type = image.mime_type(),
        size_bytes = image.len(),
        "Image received"
    );

    let result = state.analyzer.analyze(&image, Some(&state.shutdown)).await?;
    info!(request_id, tag_count = result.len(), "Image analyzed");
    Ok(result)
}

/// Pull the first `image` part out of the form. Other fields are skipped.
async fn read_image(mut multipart: Multipart, max_bytes: usize) -> Result<ImageBlob, UploadRejection> {
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(IMAGE_FIELD) => {
                return image_from_field(field, max_bytes).await;
            }
            Ok(Some(_)) => continue,
            Ok(None) => return Err(UploadRejection::MissingFile),
            Err(err) => return Err(rejection_for(err, max_bytes)),
        }
    }
}

async fn image_from_field(field: Field<'_>, max_bytes: usize) -> Result<ImageBlob, UploadRejection> {
    let mime_type = field.content_type().unwrap_or_default().to_string();
    if !mime_type.starts_with("image/") {
        return Err(UploadRejection::InvalidType(mime_type));
    }
    let filename = field.file_name().unwrap_or("upload").to_string();

    let bytes = field.bytes().await.map_err(|err| rejection_for(err, max_bytes))?;
    if bytes.len() > max_bytes {
        return Err(UploadRejection::OversizeUpload { limit: max_bytes });
    }

    Ok(ImageBlob::new(bytes, mime_type, filename))
}

fn rejection_for(err: MultipartError, max_bytes: usize) -> UploadRejection {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadRejection::OversizeUpload { limit: max_bytes }
    } else {
        debug!(error = %err, "Malformed multipart body");
        UploadRejection::MissingFile
    }
}
