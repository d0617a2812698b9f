//! Slug encoding for template file names.
//!
//! Slugs reach the resolver either raw (`foo-😀`) or percent-encoded
//! (`foo-%f0%9f%98%80`). Both forms produce the same candidates: the decoded
//! slug first, then the encoded variant when the two differ.

/// Percent-encode every non-ASCII byte of `slug` as lowercase `%xx`.
///
/// ASCII characters, including `%`, pass through untouched.
///
/// ```
/// use trellis::hierarchy::percent_encode;
///
/// assert_eq!(percent_encode("foo-😀"), "foo-%f0%9f%98%80");
/// assert_eq!(percent_encode("plain"), "plain");
/// ```
pub fn percent_encode(slug: &str) -> String {
    let mut out = String::with_capacity(slug.len());
    for byte in slug.bytes() {
        if byte.is_ascii() {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02x}", byte));
        }
    }
    out
}

/// Decode the non-ASCII `%80`-`%ff` escapes in `slug`.
///
/// ASCII escapes such as `%2f` and malformed escapes are kept literally, so
/// decoding never introduces path separators. If the decoded bytes are not valid
/// UTF-8 the input is returned unchanged.
pub fn percent_decode(slug: &str) -> String {
    let bytes = slug.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi @ 8..), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8(out).unwrap_or_else(|_| slug.to_string())
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// The slug forms to try, most specific first.
///
/// Returns the decoded slug, followed by its percent-encoded form when that
/// differs. An empty slug yields no variants.
pub fn slug_variants(slug: &str) -> Vec<String> {
    if slug.is_empty() {
        return Vec::new();
    }

    let decoded = percent_decode(slug);
    let encoded = percent_encode(&decoded);

    if encoded == decoded {
        vec![decoded]
    } else {
        vec![decoded, encoded]
    }
}
