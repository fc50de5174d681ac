#![forbid(unsafe_code)]

//! Small push-based writer for building XML fragments.

/// Builds an XML fragment (no declaration) with proper escaping.
pub struct FragmentWriter {
    out: String,
}

impl FragmentWriter {
    pub fn new() -> Self {
        Self { out: String::new() }
    }

    /// Start an element with the given qualified name and attributes.
    pub fn start_element(&mut self, qname: &str, attrs: &[(&str, &str)]) {
        self.out.push('<');
        self.out.push_str(qname);
        for (name, value) in attrs {
            self.out.push(' ');
            self.out.push_str(name);
            self.out.push_str("=\"");
            push_attr_escaped(&mut self.out, value);
            self.out.push('"');
        }
        self.out.push('>');
    }

    /// End the named element.
    pub fn end_element(&mut self, qname: &str) {
        self.out.push_str("</");
        self.out.push_str(qname);
        self.out.push('>');
    }

    /// Write escaped text content.
    pub fn text(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '&' => self.out.push_str("&amp;"),
                '<' => self.out.push_str("&lt;"),
                '>' => self.out.push_str("&gt;"),
                _ => self.out.push(c),
            }
        }
    }

    /// Finish writing and return the fragment.
    pub fn into_string(self) -> String {
        self.out
    }
}

impl Default for FragmentWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn push_attr_escaped(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_text_and_attributes() {
        let mut w = FragmentWriter::new();
        w.start_element("e", &[("a", "x\"<&")]);
        w.text("1<2&3");
        w.end_element("e");
        assert_eq!(
            w.into_string(),
            r#"<e a="x&quot;&lt;&amp;">1&lt;2&amp;3</e>"#
        );
    }
}
