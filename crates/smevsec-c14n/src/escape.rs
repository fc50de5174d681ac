#![forbid(unsafe_code)]

//! Entity escaping for C14N output.
//!
//! Per the C14N spec:
//! - Text nodes: `&` → `&amp;`, `<` → `&lt;`, `>` → `&gt;`, `\r` → `&#xD;`
//! - Attribute values: additionally `"` → `&quot;`, `\t` → `&#x9;`, `\n` → `&#xA;`
//! - PI data: `\r` → `&#xD;`

/// Escape text node content per C14N rules into the output buffer.
pub fn push_text(out: &mut Vec<u8>, s: &str) {
    for ch in s.bytes() {
        match ch {
            b'&' => out.extend_from_slice(b"&amp;"),
            b'<' => out.extend_from_slice(b"&lt;"),
            b'>' => out.extend_from_slice(b"&gt;"),
            b'\r' => out.extend_from_slice(b"&#xD;"),
            _ => out.push(ch),
        }
    }
}

/// Escape an attribute value per C14N rules into the output buffer.
pub fn push_attr(out: &mut Vec<u8>, s: &str) {
    for ch in s.bytes() {
        match ch {
            b'&' => out.extend_from_slice(b"&amp;"),
            b'<' => out.extend_from_slice(b"&lt;"),
            b'"' => out.extend_from_slice(b"&quot;"),
            b'\t' => out.extend_from_slice(b"&#x9;"),
            b'\n' => out.extend_from_slice(b"&#xA;"),
            b'\r' => out.extend_from_slice(b"&#xD;"),
            _ => out.push(ch),
        }
    }
}

/// Escape processing instruction data into the output buffer.
pub fn push_pi(out: &mut Vec<u8>, s: &str) {
    for ch in s.bytes() {
        if ch == b'\r' {
            out.extend_from_slice(b"&#xD;");
        } else {
            out.push(ch);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> String {
        let mut out = Vec::new();
        push_text(&mut out, s);
        String::from_utf8(out).unwrap()
    }

    fn attr(s: &str) -> String {
        let mut out = Vec::new();
        push_attr(&mut out, s);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn escapes_text() {
        assert_eq!(text("hello"), "hello");
        assert_eq!(text("a&b<c>d"), "a&amp;b&lt;c&gt;d");
        assert_eq!(text("line\rend"), "line&#xD;end");
    }

    #[test]
    fn escapes_attr() {
        assert_eq!(attr("hello"), "hello");
        assert_eq!(attr("a&b\"c"), "a&amp;b&quot;c");
        assert_eq!(attr("a\tb\nc\rd"), "a&#x9;b&#xA;c&#xD;d");
    }
}
