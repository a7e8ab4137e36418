//! Byte-to-text decoding for HTML input.

use std::borrow::Cow;

/// Decode HTML bytes to a string.
///
/// 1. UTF-8 (a byte order mark selects its encoding)
/// 2. the `<meta charset>` declared in the first 1024 bytes
/// 3. Windows-1252
pub fn decode_html(bytes: &[u8]) -> Cow<'_, str> {
    let (result, encoding, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }

    if let Some(label) = extract_meta_charset(bytes)
        && let Some(encoding) = encoding_rs::Encoding::for_label(label.as_bytes())
    {
        tracing::debug!(encoding = encoding.name(), "decoding with declared charset");
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    tracing::debug!(rejected = encoding.name(), "falling back to windows-1252");
    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Charset named by `<meta charset="...">` or
/// `<meta http-equiv="Content-Type" content="...; charset=...">`.
pub fn extract_meta_charset(bytes: &[u8]) -> Option<&str> {
    let prefix = &bytes[..bytes.len().min(1024)];

    let mut rest = prefix;
    while let Some(pos) = find_ignore_case(rest, b"<meta") {
        let tag = &rest[pos..];
        let end = tag.iter().position(|&b| b == b'>').unwrap_or(tag.len());
        let tag = &tag[..end];

        if let Some(at) = find_ignore_case(tag, b"charset=") {
            let value = &tag[at + b"charset=".len()..];
            if let Some(label) = charset_value(value) {
                return Some(label);
            }
        }
        rest = &rest[pos + 5..];
    }
    None
}

fn charset_value(value: &[u8]) -> Option<&str> {
    let (value, quote) = match value.first()? {
        &q @ (b'"' | b'\'') => (&value[1..], Some(q)),
        _ => (value, None),
    };
    let end = value
        .iter()
        .position(|&b| match quote {
            Some(q) => b == q,
            None => b"\"'; \t\n\r/>".contains(&b),
        })
        .unwrap_or(value.len());
    let label = std::str::from_utf8(&value[..end]).ok()?.trim();
    (!label.is_empty()).then_some(label)
}

fn find_ignore_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_passes_through() {
        let decoded = decode_html("<p>café</p>".as_bytes());
        assert!(matches!(decoded, Cow::Borrowed(_)));
        assert_eq!(decoded, "<p>café</p>");
    }

    #[test]
    fn test_meta_charset() {
        assert_eq!(extract_meta_charset(br#"<meta charset="ISO-8859-2">"#), Some("ISO-8859-2"));
        assert_eq!(extract_meta_charset(b"<META CHARSET=koi8-r>"), Some("koi8-r"));
        assert_eq!(
            extract_meta_charset(
                br#"<meta http-equiv="Content-Type" content="text/html; charset=shift_jis">"#
            ),
            Some("shift_jis")
        );
        assert_eq!(extract_meta_charset(b"<p>charset=utf-8</p>"), None);
    }

    #[test]
    fn test_declared_charset_is_used() {
        // 0xB1 is "ą" in ISO-8859-2 and "±" in Windows-1252.
        let mut bytes = br#"<meta charset="iso-8859-2"><p>"#.to_vec();
        bytes.push(0xB1);
        assert!(decode_html(&bytes).contains('ą'));
    }

    #[test]
    fn test_windows_1252_fallback() {
        let bytes = b"<p>caf\xe9</p>";
        assert_eq!(decode_html(bytes), "<p>café</p>");
    }
}
