use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use metrics::counter;
use service_core::error::AppError;
use service_core::payments::Outcome;

use super::{not_found, payment_id};
use crate::{
    dtos::PaymentEnvelope,
    models::{BankTransfer, ScreenshotEvidence},
    services::references::stored_filename,
    startup::AppState,
};

const SCREENSHOT_FIELD: &str = "screenshot";

/// Attach a proof-of-transfer screenshot to a payment.
///
/// The file is written before the payment is looked up; if the payment turns
/// out not to exist the file is deleted again. Status is never changed here.
pub async fn upload_screenshot(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<PaymentEnvelope>, AppError> {
    let id = payment_id(&raw_id)?;

    let Some(filename) = receive_screenshot(&state, &mut multipart).await? else {
        if state.store.get(id).await?.is_none() {
            return Err(not_found());
        }
        return Err(AppError::BadRequest(anyhow::anyhow!("no file uploaded")));
    };

    let evidence = ScreenshotEvidence {
        filename: filename.clone(),
        path: format!("/uploads/{}", filename),
        uploaded_at: Utc::now(),
    };

    let result = state
        .store
        .update(
            id,
            Box::new(move |payment: &mut BankTransfer| {
                payment.details.uploaded_screenshots.push(evidence);
                Ok(Outcome::Applied)
            }),
        )
        .await;

    match result {
        Ok((payment, _)) => {
            counter!("screenshots_uploaded_total").increment(1);
            tracing::info!(
                payment_id = %id,
                filename = %filename,
                screenshots = payment.details.uploaded_screenshots.len(),
                "Screenshot attached"
            );
            Ok(Json(PaymentEnvelope::from(payment)))
        }
        Err(err) => {
            if let Err(cleanup) = state.storage.delete(&filename).await {
                tracing::error!(
                    filename = %filename,
                    error = %cleanup,
                    "Failed to remove rejected upload"
                );
            }
            tracing::warn!(
                payment_id = %id,
                filename = %filename,
                "Screenshot rejected, upload removed"
            );
            Err(err.into())
        }
    }
}

/// Store the first `screenshot` file part, returning its stored name.
async fn receive_screenshot(
    state: &AppState,
    multipart: &mut Multipart,
) -> Result<Option<String>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read multipart field", e))?
    {
        if field.name() != Some(SCREENSHOT_FIELD) {
            continue;
        }
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read file bytes", e))?
            .to_vec();

        let filename = stored_filename(&original_name, Utc::now());
        state.storage.save(&filename, data).await.map_err(|e| {
            tracing::error!(filename = %filename, error = %e, "Failed to store screenshot");
            e
        })?;

        return Ok(Some(filename));
    }

    Ok(None)
}

/// Keep the multipart rejection status, so an upload over the body limit is a 413.
fn multipart_error(context: &str, err: MultipartError) -> AppError {
    let status = err.status();
    let err = anyhow::anyhow!("{}: {}", context, err.body_text());
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(error = %err, "Screenshot exceeds upload limit");
        AppError::PayloadTooLarge(err)
    } else {
        AppError::BadRequest(err)
    }
}
