use std::path::Path;
use thiserror::Error;

/// Why an upload was refused. The code prefix in each message is stable;
/// clients match on it rather than on the prose.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("FILE_TOO_LARGE: file of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    #[error("INVALID_FILENAME: {0}")]
    BadFilename(&'static str),

    #[error("HIDDEN_FILE: names starting with '.' are not accepted")]
    HiddenFile,

    #[error("INVALID_MIME_TYPE: '{0}' is not an accepted document type")]
    MimeNotAllowed(String),

    #[error("EMPTY_FILE: uploaded file has no content")]
    Empty,

    #[error("EXECUTABLE_CONTENT: executable files are not accepted")]
    Executable,

    #[error("CONTENT_TYPE_MISMATCH: content identifies as '{0}', which is not accepted")]
    ContentMismatch(String),
}

/// The portal takes scanned claim documents only: PDFs and images.
pub fn is_allowed_mime(essence: &str) -> bool {
    essence == mime::APPLICATION_PDF.essence_str() || essence.starts_with("image/")
}

pub fn check_size(size: usize, limit: usize) -> Result<(), UploadError> {
    if size > limit {
        return Err(UploadError::TooLarge { size, limit });
    }
    Ok(())
}

/// Characters that never survive into a stored filename.
const RESERVED: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|', ';'];

/// Reduces a client-supplied name to a safe basename. Unicode is kept
/// (uploads are routinely named in Hindi); separators, control characters
/// and reserved punctuation become underscores.
pub fn sanitize_filename(raw: &str) -> Result<String, UploadError> {
    if raw.contains("..") || raw.contains('/') || raw.contains('\\') {
        tracing::warn!("Upload name carried path components: {}", raw);
    }

    let base = Path::new(raw)
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or(UploadError::BadFilename("name is empty"))?;

    let mut cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_control() || RESERVED.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    if cleaned.len() > 255 {
        let mut cut = 255;
        while !cleaned.is_char_boundary(cut) {
            cut -= 1;
        }
        cleaned.truncate(cut);
    }

    if cleaned.starts_with('.') {
        return Err(UploadError::HiddenFile);
    }

    Ok(cleaned)
}

/// Normalizes the claimed content type (parameters stripped, lowercased)
/// and checks it against the allow-list.
pub fn check_mime(claimed: &str) -> Result<String, UploadError> {
    let parsed: mime::Mime = claimed
        .trim()
        .parse()
        .map_err(|_| UploadError::MimeNotAllowed(claimed.to_string()))?;

    let essence = parsed.essence_str().to_ascii_lowercase();
    if !is_allowed_mime(&essence) {
        return Err(UploadError::MimeNotAllowed(claimed.to_string()));
    }

    Ok(essence)
}

const ELF_MAGIC: &[u8] = &[0x7F, b'E', b'L', b'F'];
const PE_MAGIC: &[u8] = b"MZ";

/// ELF, PE and shebang markers in the leading bytes.
pub fn looks_executable(header: &[u8]) -> bool {
    header.starts_with(ELF_MAGIC) || header.starts_with(PE_MAGIC) || header.starts_with(b"#!")
}

/// Sniffs the leading bytes against the claimed type. A recognizable
/// signature outside the allow-list is refused; unrecognizable content
/// falls back to the already-validated claim, since not every accepted
/// image format carries magic bytes.
pub fn sniff_content(header: &[u8], claimed: &str) -> Result<(), UploadError> {
    if header.is_empty() {
        return Err(UploadError::Empty);
    }
    if looks_executable(header) {
        return Err(UploadError::Executable);
    }

    match infer::get(header) {
        Some(kind) if !is_allowed_mime(kind.mime_type()) => {
            Err(UploadError::ContentMismatch(kind.mime_type().to_string()))
        }
        Some(_) => Ok(()),
        None => {
            tracing::debug!("No signature match for claimed type '{}'", claimed);
            Ok(())
        }
    }
}

/// The full gate an upload passes before any bytes are staged. Returns the
/// sanitized filename and the normalized MIME essence.
pub fn validate_upload(
    filename: &str,
    content_type: Option<&str>,
    size: usize,
    header: &[u8],
    limit: usize,
) -> Result<(String, String), UploadError> {
    check_size(size, limit)?;
    let name = sanitize_filename(filename)?;
    let essence = check_mime(content_type.unwrap_or("application/octet-stream"))?;
    sniff_content(header, &essence)?;
    Ok((name, essence))
}
