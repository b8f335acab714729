//! Client-side upload validation. Every upload feature declares an
//! `UploadRule` (MIME allow-list + size ceiling) that is checked before a
//! single byte goes over the wire; a rejected file never produces a request.

use crate::api::types::ApiError;

const MB: u64 = 1024 * 1024;

pub const DOKUMEN_MIME: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

pub const MATERI_MIME: &[&str] = &[
    "application/pdf",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

#[derive(Debug, Clone, Copy)]
pub struct UploadRule {
    pub allowed_mime: &'static [&'static str],
    pub max_bytes: u64,
}

impl UploadRule {
    /// Dokumen akademik (proposal, laporan, surat): PDF/DOC/DOCX up to 10MB.
    pub fn dokumen() -> Self {
        Self {
            allowed_mime: DOKUMEN_MIME,
            max_bytes: 10 * MB,
        }
    }

    /// Materi kuliah: adds slide formats, 15MB ceiling.
    pub fn materi() -> Self {
        Self {
            allowed_mime: MATERI_MIME,
            max_bytes: 15 * MB,
        }
    }

    pub fn check(&self, file_name: &str, mime_type: &str, size: u64) -> Result<(), ApiError> {
        if !self.allowed_mime.contains(&mime_type) {
            return Err(ApiError::validation(format!(
                "Tipe berkas {} tidak diizinkan untuk {}",
                if mime_type.is_empty() { "tidak dikenal" } else { mime_type },
                file_name
            )));
        }
        if size > self.max_bytes {
            return Err(ApiError::validation(format!(
                "Ukuran berkas melebihi batas {}MB",
                self.max_bytes / MB
            )));
        }
        Ok(())
    }
}

/// A file already pulled into memory, ready for a multipart request. Kept
/// independent from `web_sys::File` so the API layer is host-testable.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPayload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadPayload {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Validate against `rule`, then read the selected browser file into memory.
#[cfg(target_arch = "wasm32")]
pub async fn read_file(file: &web_sys::File, rule: &UploadRule) -> Result<UploadPayload, ApiError> {
    let name = file.name();
    let mime = file.type_();
    rule.check(&name, &mime, file.size() as u64)?;

    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|_| ApiError::request_failed("gagal membaca berkas"))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(UploadPayload {
        file_name: name,
        mime_type: mime,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mime_outside_allow_list() {
        let rule = UploadRule::dokumen();
        let err = rule
            .check("virus.exe", "application/octet-stream", 1024)
            .unwrap_err();
        assert!(err.message.contains("tidak diizinkan"));
        assert!(rule.check("proposal.pdf", "application/pdf", 1024).is_ok());
    }

    #[test]
    fn rejects_oversize_file() {
        let rule = UploadRule::dokumen();
        let err = rule
            .check("proposal.pdf", "application/pdf", 11 * MB)
            .unwrap_err();
        assert!(err.message.contains("10MB"));
        // Exactly at the ceiling is still allowed.
        assert!(rule
            .check("proposal.pdf", "application/pdf", 10 * MB)
            .is_ok());
    }

    #[test]
    fn materi_rule_accepts_slides_with_higher_ceiling() {
        let rule = UploadRule::materi();
        assert!(rule
            .check(
                "slide.pptx",
                "application/vnd.openxmlformats-officedocument.presentationml.presentation",
                12 * MB
            )
            .is_ok());
        assert!(rule.check("slide.pptx", "image/png", 1024).is_err());
    }
}
