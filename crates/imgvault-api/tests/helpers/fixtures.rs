//! Upload payloads.

use axum_test::multipart::{MultipartForm, Part};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// PNG signature padded with zeros to exactly `len` bytes.
pub fn png_bytes(len: usize) -> Vec<u8> {
    let mut data = PNG_SIGNATURE.to_vec();
    data.resize(len.max(PNG_SIGNATURE.len()), 0);
    data.truncate(len);
    data
}

pub fn file_part(bytes: Vec<u8>, file_name: &str, mime_type: &str) -> Part {
    Part::bytes(bytes).file_name(file_name).mime_type(mime_type)
}

/// Form with a single `file` field and an optional `description`.
pub fn image_form(
    bytes: Vec<u8>,
    file_name: &str,
    mime_type: &str,
    description: Option<&str>,
) -> MultipartForm {
    let mut form = MultipartForm::new().add_part("file", file_part(bytes, file_name, mime_type));
    if let Some(description) = description {
        form = form.add_text("description", description.to_string());
    }
    form
}
