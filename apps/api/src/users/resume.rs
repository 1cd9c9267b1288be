//! Resume upload: validation, object storage and skill extraction.

use std::io::Write;
use std::path::Path;

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::users::skills::{detect_skills, fallback_skills};

pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// Lower-cased extension of an allowed resume file name.
pub fn validate_file_name(file_name: &str) -> Result<String, AppError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(AppError::Validation(
            "Only PDF and DOC files are allowed".to_string(),
        ))
    }
}

pub fn validate_size(len: usize) -> Result<(), AppError> {
    if len == 0 {
        return Err(AppError::Validation("No file uploaded".to_string()));
    }
    if len > MAX_RESUME_BYTES {
        return Err(AppError::Validation(
            "File too large (max 5MB)".to_string(),
        ));
    }
    Ok(())
}

/// Keeps ASCII alphanumerics, dot, dash and underscore; everything else becomes `_`.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("resume");
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn resume_object_key(user_id: Uuid, file_name: &str, uploaded_at_ms: i64) -> String {
    format!(
        "resumes/{user_id}/{uploaded_at_ms}-{}",
        sanitize_file_name(file_name)
    )
}

fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        _ => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    }
}

/// Uploads the resume bytes under `key`.
pub async fn store_resume(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    extension: &str,
    data: Bytes,
) -> Result<(), AppError> {
    s3.put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(data))
        .content_type(content_type_for(extension))
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("resume upload failed: {e}")))?;

    info!("Uploaded resume to s3://{bucket}/{key}");
    Ok(())
}

fn extract_text_via_tempfile(data: &[u8], extension: &str) -> anyhow::Result<String> {
    let mut file = tempfile::Builder::new()
        .suffix(&format!(".{extension}"))
        .tempfile()?;
    file.write_all(data)?;
    file.flush()?;
    pdf_extract::extract_text(file.path()).map_err(|e| anyhow::anyhow!("{e:?}"))
}

/// Detects skills in the uploaded file. Never fails: unreadable files, parser
/// errors and parser panics all yield the fallback list.
pub async fn extract_skills(data: Bytes, extension: String) -> Vec<String> {
    let parsed = tokio::task::spawn_blocking(move || extract_text_via_tempfile(&data, &extension))
        .await;

    match parsed {
        Ok(Ok(text)) => detect_skills(&text),
        Ok(Err(e)) => {
            warn!("Resume text extraction failed: {e}");
            fallback_skills()
        }
        Err(e) => {
            warn!("Resume parser task aborted: {e}");
            fallback_skills()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions() {
        assert_eq!(validate_file_name("cv.PDF").unwrap(), "pdf");
        assert_eq!(validate_file_name("cv.docx").unwrap(), "docx");
        assert!(validate_file_name("cv.txt").is_err());
        assert!(validate_file_name("no_extension").is_err());
    }

    #[test]
    fn test_size_limits() {
        assert!(validate_size(1024).is_ok());
        assert!(validate_size(MAX_RESUME_BYTES).is_ok());
        assert!(validate_size(MAX_RESUME_BYTES + 1).is_err());
        assert!(validate_size(0).is_err());
    }

    #[test]
    fn test_object_key_is_sanitized() {
        let user = Uuid::nil();
        let key = resume_object_key(user, "../../My Resume (final).pdf", 1_700_000_000_000);
        assert_eq!(
            key,
            "resumes/00000000-0000-0000-0000-000000000000/1700000000000-My_Resume__final_.pdf"
        );
    }

    #[tokio::test]
    async fn test_unparseable_file_falls_back() {
        let skills = extract_skills(Bytes::from_static(b"not really a pdf"), "pdf".into()).await;
        assert_eq!(skills, vec!["General"]);
    }
}
