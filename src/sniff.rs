//! Raster format detection by magic prefix.
//!
//! Only the leading bytes are inspected. Arbitrary binary data that happens to
//! start with `FF D8` is reported as JPEG; the decoder is the one that finds
//! out it is not.

const JPEG_SIG: &[u8] = &[0xFF, 0xD8];
const PNG_SIG: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// Raster formats recognized inside record trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Jpeg,
    Png,
}

/// Identify the raster format a blob starts with, if any.
pub fn sniff(blob: &[u8]) -> Option<RasterFormat> {
    if blob.starts_with(JPEG_SIG) {
        Some(RasterFormat::Jpeg)
    } else if blob.starts_with(PNG_SIG) {
        Some(RasterFormat::Png)
    } else {
        None
    }
}

/// True iff `blob` begins with a JPEG or PNG signature.
pub fn classify(blob: &[u8]) -> bool {
    sniff(blob).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_table() {
        let cases: &[(&[u8], bool)] = &[
            (&[0xFF, 0xD8], true),
            (&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10], true),
            (b"\x89PNG\r\n\x1a\n", true),
            (b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR", true),
            // near misses
            (&[], false),
            (&[0xFF], false),
            (&[0xFF, 0xD9], false),
            (&[0xD8, 0xFF], false),
            (&[0x00, 0xFF, 0xD8], false),
            (b"\x89PNG\r\n\x1a", false),
            (b"\x89PNG\r\n\x1a\x00", false),
            (b"\x88PNG\r\n\x1a\n", false),
            (b"PNG\r\n\x1a\n", false),
            (b"GIF89a", false),
        ];
        for (blob, expected) in cases {
            assert_eq!(classify(blob), *expected, "blob {blob:02X?}");
        }
    }

    #[test]
    fn sniff_reports_format() {
        assert_eq!(sniff(&[0xFF, 0xD8, 0xFF]), Some(RasterFormat::Jpeg));
        assert_eq!(sniff(b"\x89PNG\r\n\x1a\n"), Some(RasterFormat::Png));
        assert_eq!(sniff(b"RIFF"), None);
    }
}
