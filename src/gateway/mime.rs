/// Classify a byte blob by leading magic bytes. Defaults to JPEG when
/// nothing matches, per spec.md §4.1.
pub fn detect_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        "image/png"
    } else if bytes.starts_with(b"RIFF") {
        "image/webp"
    } else {
        "image/jpeg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_jpeg() {
        assert_eq!(detect_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
    }

    #[test]
    fn detects_png() {
        assert_eq!(detect_mime(&[0x89, 0x50, 0x4E, 0x47, 0x0D]), "image/png");
    }

    #[test]
    fn detects_webp() {
        let mut bytes = b"RIFF".to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes.extend_from_slice(b"WEBP");
        assert_eq!(detect_mime(&bytes), "image/webp");
    }

    #[test]
    fn defaults_to_jpeg_on_no_match() {
        assert_eq!(detect_mime(&[0x00, 0x01, 0x02]), "image/jpeg");
    }
}
