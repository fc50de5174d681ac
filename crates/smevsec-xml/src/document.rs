#![forbid(unsafe_code)]

//! XML document wrapper over roxmltree with ID attribute registration.

use smevsec_core::{Error, Result};
use std::collections::HashMap;

/// An owned XML document.  Stores the text and the ID attribute names
/// registered for reference resolution.
///
/// To work with the parsed tree, call [`XmlDocument::parse_doc`] which
/// returns a temporary `roxmltree::Document` borrowing from the text.
pub struct XmlDocument {
    text: String,
    /// Namespaced ID attributes to register beyond the default
    /// `Id`, `ID`, `id` (e.g. `wsu:Id` as its namespace/local pair).
    extra_id_attrs: Vec<(String, String)>,
}

impl XmlDocument {
    /// Parse and validate XML from a string, taking ownership.
    pub fn parse(text: String) -> Result<Self> {
        let _doc = roxmltree::Document::parse(&text).map_err(|e| Error::XmlParse(e.to_string()))?;
        Ok(Self {
            text,
            extra_id_attrs: Vec::new(),
        })
    }

    /// Get the raw XML text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the stored text after an edit.  The new text is
    /// re-validated so later [`parse_doc`](Self::parse_doc) calls
    /// cannot fail on malformed splices.
    pub fn replace_text(&mut self, text: String) -> Result<()> {
        let _doc = roxmltree::Document::parse(&text).map_err(|e| Error::XmlParse(e.to_string()))?;
        self.text = text;
        Ok(())
    }

    /// Register an additional namespaced ID attribute.
    pub fn add_id_attr(&mut self, ns: &str, local_name: &str) {
        self.extra_id_attrs
            .push((ns.to_owned(), local_name.to_owned()));
    }

    /// Parse the document and return a temporary `roxmltree::Document`.
    ///
    /// This re-parses the XML from the stored text.  For performance,
    /// call this once at the top of a processing pipeline and pass the
    /// resulting document reference down through the call chain.
    pub fn parse_doc(&self) -> Result<roxmltree::Document<'_>> {
        roxmltree::Document::parse(&self.text).map_err(|e| Error::XmlParse(e.to_string()))
    }

    /// Build the ID → NodeId mapping for a parsed document.
    pub fn build_id_map<'a>(
        &self,
        doc: &'a roxmltree::Document<'a>,
    ) -> HashMap<String, roxmltree::NodeId> {
        let default_attrs = ["Id", "ID", "id"];
        let mut map = HashMap::new();
        for node in doc.descendants() {
            if node.is_element() {
                for attr_name in &default_attrs {
                    if let Some(val) = node.attribute(*attr_name) {
                        map.insert(val.to_owned(), node.id());
                    }
                }
                for (ns, local) in &self.extra_id_attrs {
                    if let Some(val) = node.attribute((ns.as_str(), local.as_str())) {
                        map.insert(val.to_owned(), node.id());
                    }
                }
            }
        }
        map
    }

    /// Find an element by its registered ID value in a parsed document.
    pub fn find_by_id<'a>(
        doc: &'a roxmltree::Document<'a>,
        id_map: &HashMap<String, roxmltree::NodeId>,
        id: &str,
    ) -> Option<roxmltree::Node<'a, 'a>> {
        let node_id = id_map.get(id)?;
        doc.get_node(*node_id)
    }
}

/// Find the first descendant element with the given local name and namespace.
pub fn find_element<'a>(
    doc: &'a roxmltree::Document<'a>,
    ns: &str,
    local_name: &str,
) -> Option<roxmltree::Node<'a, 'a>> {
    doc.descendants().find(|n| {
        n.is_element()
            && n.tag_name().name() == local_name
            && n.tag_name().namespace().unwrap_or("") == ns
    })
}

/// Find the first direct child element with the given local name and namespace.
pub fn find_child_element<'a>(
    node: roxmltree::Node<'a, 'a>,
    ns: &str,
    local_name: &str,
) -> Option<roxmltree::Node<'a, 'a>> {
    node.children().find(|n| {
        n.is_element()
            && n.tag_name().name() == local_name
            && n.tag_name().namespace().unwrap_or("") == ns
    })
}

/// Find all direct child elements with the given local name and namespace.
pub fn find_child_elements<'a>(
    node: roxmltree::Node<'a, 'a>,
    ns: &str,
    local_name: &str,
) -> Vec<roxmltree::Node<'a, 'a>> {
    node.children()
        .filter(|n| {
            n.is_element()
                && n.tag_name().name() == local_name
                && n.tag_name().namespace().unwrap_or("") == ns
        })
        .collect()
}

/// Like [`find_child_element`] but turns absence into a hard error.
pub fn require_child_element<'a>(
    node: roxmltree::Node<'a, 'a>,
    ns: &str,
    local_name: &str,
) -> Result<roxmltree::Node<'a, 'a>> {
    find_child_element(node, ns, local_name)
        .ok_or_else(|| Error::MissingElement(format!("{{{ns}}}{local_name}")))
}

/// The element's qualified name as written in the source text
/// (`prefix:local` or just `local`).
///
/// roxmltree does not retain the prefix an element was written with,
/// so it is recovered from the byte range of the start tag.
pub fn element_qname<'a>(text: &'a str, node: roxmltree::Node<'_, '_>) -> &'a str {
    let start = node.range().start + 1;
    let rest = &text[start..];
    let end = rest
        .find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
        .unwrap_or(rest.len());
    &rest[..end]
}

/// The namespace prefix an element was written with, if any.
pub fn element_prefix<'a>(text: &'a str, node: roxmltree::Node<'_, '_>) -> Option<&'a str> {
    let qname = element_qname(text, node);
    qname.split_once(':').map(|(prefix, _)| prefix)
}

/// The trimmed text content of an element, erroring when empty.
pub fn require_text<'a>(node: roxmltree::Node<'a, 'a>) -> Result<&'a str> {
    match node.text().map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t),
        _ => Err(Error::XmlStructure(format!(
            "element {} has no text content",
            node.tag_name().name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WSU: &str =
        "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd";

    #[test]
    fn registers_namespaced_id_attributes() {
        let xml = format!(
            r#"<e xmlns:wsu="{WSU}"><a wsu:Id="body-1"/><b Id="plain"/></e>"#
        );
        let mut xdoc = XmlDocument::parse(xml).unwrap();
        xdoc.add_id_attr(WSU, "Id");
        let doc = xdoc.parse_doc().unwrap();
        let map = xdoc.build_id_map(&doc);
        let a = XmlDocument::find_by_id(&doc, &map, "body-1").unwrap();
        assert_eq!(a.tag_name().name(), "a");
        assert!(map.contains_key("plain"));
    }

    #[test]
    fn recovers_prefix_from_source_text() {
        let xml = r#"<s:e xmlns:s="urn:x"><s:child attr="v"/></s:e>"#.to_owned();
        let xdoc = XmlDocument::parse(xml).unwrap();
        let doc = xdoc.parse_doc().unwrap();
        let child = find_element(&doc, "urn:x", "child").unwrap();
        assert_eq!(element_qname(xdoc.text(), child), "s:child");
        assert_eq!(element_prefix(xdoc.text(), child), Some("s"));
    }

    #[test]
    fn missing_child_is_a_missing_element_error() {
        let xml = "<e><a/></e>".to_owned();
        let xdoc = XmlDocument::parse(xml).unwrap();
        let doc = xdoc.parse_doc().unwrap();
        let root = doc.root_element();
        let err = require_child_element(root, "", "b").unwrap_err();
        assert!(matches!(err, smevsec_core::Error::MissingElement(_)));
    }
}
