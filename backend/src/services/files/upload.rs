//! # Spreadsheet Upload Service
//!
//! Backend logic for `POST /api/files/upload`.
//!
//! ## Workflow
//!
//! 1.  **Quota**: Before the body is read, the caller's file count is compared with
//!     `maxFilesPerUser` from the live system settings.
//!
//! 2.  **Form Reading**: `read_form` walks the multipart parts. The `file` part is
//!     buffered chunk by chunk and rejected as soon as it passes `maxFileSize`; an
//!     optional `name` part becomes the display name.
//!
//! 3.  **Format Check**: The format comes from the file name's extension, falling back
//!     to the declared MIME type, and must be listed in `allowedFileTypes`.
//!
//! 4.  **Parsing**: The bytes are parsed into a `ParsedTable` on the blocking pool.
//!     Nothing has been written to disk at this point, so a parse failure leaves no
//!     trace.
//!
//! 5.  **Storage**: The bytes are saved under the upload root and a `FileRecord` is
//!     inserted. If the insert fails the saved bytes are removed again.
//!
//! 6.  **HTTP Response**: `201 Created` with the new record, table included.

use crate::auth::Principal;
use crate::error::{ApiError, ApiResult};
use crate::services::files::parse::{parse, FileFormat};
use crate::state::AppState;
use actix_multipart::{Multipart, MultipartError};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::file::FileRecord;
use common::model::settings::SystemSettings;
use common::responses::ApiResponse;
use futures_util::StreamExt;
use log::{info, warn};

const MAX_NAME_BYTES: usize = 1024;

struct IncomingFile {
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// Actix web handler for `POST /api/files/upload`.
///
/// # Arguments
/// * `principal` - The signed-in caller who will own the file.
/// * `payload` - The multipart form with a `file` part and an optional `name` part.
///
/// # Returns
/// - `201 Created` with the stored `FileRecord`.
/// - `400 Bad Request` for a missing, oversized, unsupported or unparseable file, or
///   when the caller is at their file limit.
pub async fn process(
    principal: Principal,
    state: web::Data<AppState>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let record = upload_file(&principal, &state, payload).await?;
    Ok(HttpResponse::Created()
        .json(ApiResponse::ok(record).with_message("File uploaded successfully")))
}

/// Reads the form, parses the spreadsheet and stores both the bytes and the
/// record. The bytes are removed again if the record cannot be written.
async fn upload_file(
    principal: &Principal,
    state: &AppState,
    payload: Multipart,
) -> ApiResult<FileRecord> {
    let settings = state.settings.snapshot().await;
    let owned = state.store.count_files_for_user(principal.id())?;
    if owned >= u64::from(settings.max_files_per_user) {
        return Err(ApiError::BadRequest(format!(
            "Upload limit reached: at most {} files per user",
            settings.max_files_per_user
        )));
    }

    let (incoming, display_name) = read_form(payload, &settings).await?;
    let incoming =
        incoming.ok_or_else(|| ApiError::BadRequest("Please upload a file".to_string()))?;
    let format = FileFormat::detect(&incoming.file_name, incoming.content_type.as_deref())
        .map_err(|_| unsupported_type(&settings))?;
    if !settings.allows_extension(format.extension()) {
        return Err(unsupported_type(&settings));
    }

    let IncomingFile {
        file_name,
        content_type,
        bytes,
    } = incoming;
    let (data, bytes) =
        web::block(move || parse(&bytes, format).map(|table| (table, bytes))).await??;

    let path = state.uploads.save(&bytes, format.extension())?;
    let original_name = if file_name.is_empty() {
        format!("upload.{}", format.extension())
    } else {
        file_name
    };
    let now = Utc::now();
    let record = FileRecord {
        id: uuid::Uuid::new_v4().to_string(),
        name: display_name.unwrap_or_else(|| original_name.clone()),
        original_name,
        path,
        size: bytes.len() as u64,
        content_type: content_type.unwrap_or_else(|| format.mime_type().to_string()),
        row_count: data.row_count(),
        column_count: data.column_count(),
        data,
        uploaded_by: principal.id().to_string(),
        uploaded_at: now,
        last_modified: now,
    };

    if let Err(e) = state.store.insert_file(&record) {
        if let Err(cleanup) = state.uploads.remove(&record.path) {
            warn!("could not remove orphaned upload {}: {}", record.path, cleanup);
        }
        return Err(e.into());
    }

    info!(
        "user {} uploaded '{}' ({} rows, {} columns)",
        principal.id(),
        record.original_name,
        record.row_count,
        record.column_count
    );
    Ok(record)
}

/// Collects the `file` and `name` parts, enforcing the size limit while streaming.
async fn read_form(
    mut payload: Multipart,
    settings: &SystemSettings,
) -> ApiResult<(Option<IncomingFile>, Option<String>)> {
    let limit = settings.max_file_size_bytes();
    let mut file = None;
    let mut display_name = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(malformed)?;
        let field_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match field_name.as_deref() {
            Some("file") => {
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
                    .unwrap_or_default();
                let content_type = field.content_type().map(|m| m.essence_str().to_string());

                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk.map_err(malformed)?;
                    if (bytes.len() + chunk.len()) as u64 > limit {
                        return Err(ApiError::BadRequest(format!(
                            "File is too large; the limit is {} MB",
                            settings.max_file_size
                        )));
                    }
                    bytes.extend_from_slice(&chunk);
                }
                file = Some(IncomingFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }

            Some("name") => {
                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk.map_err(malformed)?;
                    if bytes.len() + chunk.len() > MAX_NAME_BYTES {
                        return Err(ApiError::BadRequest("File name is too long".to_string()));
                    }
                    bytes.extend_from_slice(&chunk);
                }
                let name = String::from_utf8_lossy(&bytes).trim().to_string();
                if !name.is_empty() {
                    display_name = Some(name);
                }
            }

            _ => {}
        }
    }

    Ok((file, display_name))
}

fn malformed(err: MultipartError) -> ApiError {
    ApiError::BadRequest(format!("Malformed upload: {}", err))
}

fn unsupported_type(settings: &SystemSettings) -> ApiError {
    ApiError::BadRequest(format!(
        "Unsupported file type; allowed types: {}",
        settings.allowed_file_types.join(", ")
    ))
}
