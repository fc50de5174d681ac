#![forbid(unsafe_code)]

//! Shared rendering utilities for C14N output.

use crate::escape;
use std::collections::BTreeMap;

/// A namespace declaration to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsDecl {
    /// The prefix ("" for default namespace).
    pub prefix: String,
    /// The namespace URI ("" renders `xmlns=""`).
    pub uri: String,
}

impl NsDecl {
    /// Render this namespace declaration into the output buffer.
    pub fn render(&self, out: &mut Vec<u8>) {
        if self.prefix.is_empty() {
            out.extend_from_slice(b" xmlns=\"");
        } else {
            out.extend_from_slice(b" xmlns:");
            out.extend_from_slice(self.prefix.as_bytes());
            out.extend_from_slice(b"=\"");
        }
        escape::push_attr(out, &self.uri);
        out.push(b'"');
    }
}

impl Ord for NsDecl {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Default namespace (empty prefix) sorts first, then by prefix.
        match (self.prefix.is_empty(), other.prefix.is_empty()) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => self.prefix.cmp(&other.prefix),
        }
    }
}

impl PartialOrd for NsDecl {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// An attribute to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// The namespace URI of the attribute ("" for no namespace).
    pub ns_uri: String,
    /// The local name.
    pub local_name: String,
    /// The qualified name as it must appear in the output.
    pub qualified_name: String,
    /// The attribute value.
    pub value: String,
}

impl Attr {
    /// Render this attribute into the output buffer.
    pub fn render(&self, out: &mut Vec<u8>) {
        out.push(b' ');
        out.extend_from_slice(self.qualified_name.as_bytes());
        out.extend_from_slice(b"=\"");
        escape::push_attr(out, &self.value);
        out.push(b'"');
    }
}

impl Ord for Attr {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Unqualified attributes come first, sorted by local name.
        // Qualified attributes follow, sorted by (ns_uri, local_name).
        match (self.ns_uri.is_empty(), other.ns_uri.is_empty()) {
            (true, true) => self.local_name.cmp(&other.local_name),
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            (false, false) => self
                .ns_uri
                .cmp(&other.ns_uri)
                .then(self.local_name.cmp(&other.local_name)),
        }
    }
}

impl PartialOrd for Attr {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// All namespaces in scope at `node`, prefix → URI.
///
/// roxmltree already merges ancestor declarations into each element's
/// namespace list, so this is a direct projection.  An `xmlns=""`
/// un-declaration appears as an empty-URI binding for the empty prefix.
pub fn inscope_namespaces(node: roxmltree::Node<'_, '_>) -> BTreeMap<String, String> {
    node.namespaces()
        .filter(|ns| ns.name() != Some("xml"))
        .map(|ns| (ns.name().unwrap_or("").to_owned(), ns.uri().to_owned()))
        .collect()
}

/// The qualified name an element was written with, recovered from the
/// source text.
pub fn element_qname<'a>(text: &'a str, node: roxmltree::Node<'_, '_>) -> &'a str {
    smevsec_xml::document::element_qname(text, node)
}

/// The prefix an element was written with ("" when unprefixed).
pub fn element_prefix<'a>(text: &'a str, node: roxmltree::Node<'_, '_>) -> &'a str {
    smevsec_xml::document::element_prefix(text, node).unwrap_or("")
}

/// Collect and sort the attributes of an element for output.
///
/// Qualified names are recovered from the source text, except `xml:*`
/// attributes which are always rendered with the `xml` prefix.
pub fn collect_attrs(text: &str, node: roxmltree::Node<'_, '_>) -> Vec<Attr> {
    let mut attrs: Vec<Attr> = node
        .attributes()
        .map(|attr| {
            let ns_uri = attr.namespace().unwrap_or("");
            let qname = if ns_uri == XML_NS {
                format!("xml:{}", attr.name())
            } else {
                text[attr.range_qname()].to_owned()
            };
            Attr {
                ns_uri: ns_uri.to_owned(),
                local_name: attr.name().to_owned(),
                qualified_name: qname,
                value: attr.value().to_owned(),
            }
        })
        .collect();
    attrs.sort();
    attrs
}

/// The prefix an attribute was written with, or `None` for an
/// unprefixed (and therefore unqualified) attribute.
pub fn attr_prefix<'a>(text: &'a str, attr: &roxmltree::Attribute<'_, '_>) -> Option<&'a str> {
    text[attr.range_qname()]
        .split_once(':')
        .map(|(prefix, _)| prefix)
}

/// `xml:*` attributes inherited from ancestors of the subtree apex,
/// excluding names the apex declares itself.
pub fn inherited_xml_attrs(node: roxmltree::Node<'_, '_>, existing: &[Attr]) -> Vec<Attr> {
    let mut inherited: BTreeMap<String, String> = BTreeMap::new();
    let mut current = node.parent();
    while let Some(ancestor) = current {
        if ancestor.is_element() {
            for attr in ancestor.attributes() {
                if attr.namespace() == Some(XML_NS) && !inherited.contains_key(attr.name()) {
                    inherited.insert(attr.name().to_owned(), attr.value().to_owned());
                }
            }
        }
        current = ancestor.parent();
    }
    inherited
        .into_iter()
        .filter(|(name, _)| {
            !existing
                .iter()
                .any(|a| a.ns_uri == XML_NS && a.local_name == *name)
        })
        .map(|(name, value)| Attr {
            ns_uri: XML_NS.to_owned(),
            local_name: name.clone(),
            qualified_name: format!("xml:{name}"),
            value,
        })
        .collect()
}
