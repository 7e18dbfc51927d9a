//! Request-building fixtures.
//! Note: #[allow(dead_code)] because each test file compiles common/ separately.

/// Boundary used by the multipart helpers.
#[allow(dead_code)]
pub const MULTIPART_BOUNDARY: &str = "silt-test-boundary";

/// Content type for a multipart upload built by [`audio_form_body`].
#[allow(dead_code)]
pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}")
}

/// A multipart form with named file fields.
#[allow(dead_code)]
pub fn form_body(fields: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, data) in fields {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"segment.opus\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: audio/ogg\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

/// A well-formed upload body carrying one `audio` field.
#[allow(dead_code)]
pub fn audio_form_body(data: &[u8]) -> Vec<u8> {
    form_body(&[("audio", data)])
}
