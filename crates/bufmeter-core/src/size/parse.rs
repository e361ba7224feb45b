//! Parse HTTP response header lines into the size-relevant fields.

/// Size hints found in a response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeHeaders {
    /// `Content-Length`, if present and numeric.
    pub content_length: Option<u64>,
    /// Complete length from `Content-Range: bytes a-b/total` (absent for `*`).
    pub content_range_total: Option<u64>,
}

impl SizeHeaders {
    /// Total resource size implied by a full (non-ranged) response.
    pub fn full_size(&self) -> Option<u64> {
        self.content_length.filter(|&n| n > 0)
    }

    /// Total resource size implied by a `206 Partial Content` response.
    pub fn ranged_size(&self) -> Option<u64> {
        self.content_range_total.filter(|&n| n > 0)
    }
}

/// Parse collected header lines. With redirects, only the last response counts.
pub(crate) fn parse_headers(lines: &[String]) -> SizeHeaders {
    let mut out = SizeHeaders::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            out = SizeHeaders::default();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    out.content_length = Some(n);
                }
            }
            if name.eq_ignore_ascii_case("content-range") {
                out.content_range_total = parse_content_range_total(value);
            }
        }
    }

    out
}

/// `bytes 0-0/12345` -> `Some(12345)`; `bytes */12345` also yields the total.
fn parse_content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse::<u64>().ok()
}
