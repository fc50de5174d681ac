#![forbid(unsafe_code)]

//! Text-splicing edits over a serialized document.
//!
//! Every function takes a node from a tree parsed out of `text` and
//! returns a new string with the edit applied at the node's byte range.
//! The caller must re-parse before using any further node handles.

use crate::document::element_qname;
use smevsec_core::{Error, Result};

/// Byte offset just past the `>` of the element's start tag, or `None`
/// for a self-closing element.
fn start_tag_end(text: &str, node: roxmltree::Node<'_, '_>) -> Result<Option<usize>> {
    let range = node.range();
    let bytes = text.as_bytes();
    let mut in_quote = 0u8;
    let mut i = range.start;
    while i < range.end {
        let b = bytes[i];
        match in_quote {
            0 => match b {
                b'"' | b'\'' => in_quote = b,
                b'>' => {
                    if bytes[i - 1] == b'/' {
                        return Ok(None);
                    }
                    return Ok(Some(i + 1));
                }
                _ => {}
            },
            q if b == q => in_quote = 0,
            _ => {}
        }
        i += 1;
    }
    Err(Error::XmlStructure(format!(
        "unterminated start tag for {}",
        node.tag_name().name()
    )))
}

/// Insert `fragment` as the first child of `node`.
///
/// A self-closing element is expanded into an open/close pair first.
pub fn insert_first_child(
    text: &str,
    node: roxmltree::Node<'_, '_>,
    fragment: &str,
) -> Result<String> {
    match start_tag_end(text, node)? {
        Some(pos) => {
            let mut out = String::with_capacity(text.len() + fragment.len());
            out.push_str(&text[..pos]);
            out.push_str(fragment);
            out.push_str(&text[pos..]);
            Ok(out)
        }
        None => expand_self_closing(text, node, fragment),
    }
}

/// Rewrite `<q .../>` into `<q ...>fragment</q>`.
fn expand_self_closing(
    text: &str,
    node: roxmltree::Node<'_, '_>,
    fragment: &str,
) -> Result<String> {
    let range = node.range();
    let qname = element_qname(text, node);
    // range.end-2 points at the '/' of "/>"
    let slash = range.end - 2;
    let mut out = String::with_capacity(text.len() + fragment.len() + qname.len() + 3);
    out.push_str(&text[..slash]);
    out.push('>');
    out.push_str(fragment);
    out.push_str("</");
    out.push_str(qname);
    out.push('>');
    out.push_str(&text[range.end..]);
    Ok(out)
}

/// Add an attribute to the element's start tag, right after the tag name.
///
/// The caller is responsible for not duplicating an existing attribute
/// and for escaping `value`.
pub fn set_attribute(
    text: &str,
    node: roxmltree::Node<'_, '_>,
    attr_qname: &str,
    value: &str,
) -> Result<String> {
    let qname = element_qname(text, node);
    let pos = node.range().start + 1 + qname.len();
    let mut out = String::with_capacity(text.len() + attr_qname.len() + value.len() + 4);
    out.push_str(&text[..pos]);
    out.push(' ');
    out.push_str(attr_qname);
    out.push_str("=\"");
    out.push_str(value);
    out.push('"');
    out.push_str(&text[pos..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> roxmltree::Document<'_> {
        roxmltree::Document::parse(text).unwrap()
    }

    #[test]
    fn inserts_first_child_after_start_tag() {
        let text = r#"<a x="1"><b/></a>"#;
        let d = doc(text);
        let out = insert_first_child(text, d.root_element(), "<c/>").unwrap();
        assert_eq!(out, r#"<a x="1"><c/><b/></a>"#);
    }

    #[test]
    fn expands_self_closing_elements() {
        let text = r#"<a><s:b xmlns:s="urn:x" y="2"/></a>"#;
        let d = doc(text);
        let b = d.root_element().first_element_child().unwrap();
        let out = insert_first_child(text, b, "<c/>").unwrap();
        assert_eq!(out, r#"<a><s:b xmlns:s="urn:x" y="2"><c/></s:b></a>"#);
    }

    #[test]
    fn gt_inside_attribute_value_does_not_end_the_start_tag() {
        let text = r#"<a x="1>2"><b/></a>"#;
        let d = doc(text);
        let out = insert_first_child(text, d.root_element(), "<c/>").unwrap();
        assert_eq!(out, r#"<a x="1>2"><c/><b/></a>"#);
    }

    #[test]
    fn sets_attribute_after_tag_name() {
        let text = r#"<s:a xmlns:s="urn:x"><b/></s:a>"#;
        let d = doc(text);
        let out = set_attribute(text, d.root_element(), "wsu:Id", "body-1").unwrap();
        assert_eq!(out, r#"<s:a wsu:Id="body-1" xmlns:s="urn:x"><b/></s:a>"#);
    }
}
