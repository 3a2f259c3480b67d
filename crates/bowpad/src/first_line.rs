//! Reads the head of a file for content sniffing.
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::Encoding;

/// How many bytes of a file are inspected.
pub const HEAD_BYTES: usize = 64 * 1024;

/// Detects the encoding of a byte prefix: BOM first, then UTF-8, then
/// `chardetng`.
pub fn detect_encoding(bytes: &[u8]) -> (&'static Encoding, usize) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return (encoding, bom_len);
    }
    match std::str::from_utf8(bytes) {
        Ok(_) => return (encoding_rs::UTF_8, 0),
        // a head cut in the middle of a sequence is still UTF-8
        Err(e) if e.error_len().is_none() => return (encoding_rs::UTF_8, 0),
        Err(_) => {}
    }
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, false);
    (detector.guess(None, true), 0)
}

/// First line of the decoded head, without its line terminator.
pub fn first_line(bytes: &[u8]) -> String {
    let (encoding, bom_len) = detect_encoding(bytes);
    let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
    text.lines().next().unwrap_or_default().to_string()
}

/// Reads up to [`HEAD_BYTES`] of `path` and returns its first line.
pub fn read_first_line(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut head = Vec::with_capacity(4096);
    file.take(HEAD_BYTES as u64)
        .read_to_end(&mut head)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(first_line(&head))
}
