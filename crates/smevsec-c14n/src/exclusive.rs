#![forbid(unsafe_code)]

//! Exclusive Canonical XML 1.0 (exc-C14N).
//!
//! Algorithm URI: `http://www.w3.org/2001/10/xml-exc-c14n#`
//! With comments: `http://www.w3.org/2001/10/xml-exc-c14n#WithComments`
//!
//! The key difference from inclusive C14N: only "visibly utilized"
//! namespace declarations are output.  A namespace is visibly utilized
//! on an element if:
//! 1. Its prefix is used by the element's tag name, OR
//! 2. Its prefix is used by one of the element's attributes, OR
//! 3. The prefix appears in the InclusiveNamespaces PrefixList
//!    (`#default` names the default namespace).

use crate::render::{self, Attr, NsDecl};
use smevsec_core::Result;
use std::collections::{BTreeMap, BTreeSet};

/// Canonicalize the subtree rooted at `root` using Exclusive C14N 1.0.
///
/// Subtrees rooted at a node in `excluded` are omitted entirely.
pub fn canonicalize(
    doc: &roxmltree::Document<'_>,
    root: roxmltree::Node<'_, '_>,
    with_comments: bool,
    inclusive_prefixes: &[String],
    excluded: &[roxmltree::NodeId],
) -> Result<Vec<u8>> {
    let mut prefixes: BTreeSet<String> = BTreeSet::new();
    for p in inclusive_prefixes {
        if p == "#default" {
            prefixes.insert(String::new());
        } else {
            prefixes.insert(p.clone());
        }
    }
    let ctx = ExcC14nContext {
        text: doc.input_text(),
        with_comments,
        inclusive_prefixes: prefixes,
        excluded,
    };
    let mut output = Vec::new();
    ctx.process_element(root, &mut output, &BTreeMap::new())?;
    Ok(output)
}

struct ExcC14nContext<'a> {
    text: &'a str,
    with_comments: bool,
    inclusive_prefixes: BTreeSet<String>,
    excluded: &'a [roxmltree::NodeId],
}

impl ExcC14nContext<'_> {
    fn process_node(
        &self,
        node: roxmltree::Node<'_, '_>,
        output: &mut Vec<u8>,
        rendered_ns: &BTreeMap<String, String>,
    ) -> Result<()> {
        if self.excluded.contains(&node.id()) {
            return Ok(());
        }
        match node.node_type() {
            roxmltree::NodeType::Element => {
                self.process_element(node, output, rendered_ns)?;
            }
            roxmltree::NodeType::Text => {
                crate::escape::push_text(output, node.text().unwrap_or(""));
            }
            roxmltree::NodeType::Comment => {
                if self.with_comments {
                    output.extend_from_slice(b"<!--");
                    output.extend_from_slice(node.text().unwrap_or("").as_bytes());
                    output.extend_from_slice(b"-->");
                }
            }
            roxmltree::NodeType::PI => {
                if let Some(pi) = node.pi() {
                    output.extend_from_slice(b"<?");
                    output.extend_from_slice(pi.target.as_bytes());
                    if let Some(value) = pi.value {
                        if !value.is_empty() {
                            output.push(b' ');
                            crate::escape::push_pi(output, value);
                        }
                    }
                    output.extend_from_slice(b"?>");
                }
            }
            roxmltree::NodeType::Root => {}
        }
        Ok(())
    }

    fn process_element(
        &self,
        node: roxmltree::Node<'_, '_>,
        output: &mut Vec<u8>,
        rendered_ns: &BTreeMap<String, String>,
    ) -> Result<()> {
        let mut utilized: BTreeSet<String> = BTreeSet::new();
        utilized.insert(render::element_prefix(self.text, node).to_owned());
        for attr in node.attributes() {
            if let Some(prefix) = render::attr_prefix(self.text, &attr) {
                utilized.insert(prefix.to_owned());
            }
        }
        utilized.extend(self.inclusive_prefixes.iter().cloned());

        let inscope = render::inscope_namespaces(node);

        let mut ns_decls: Vec<NsDecl> = Vec::new();
        for prefix in &utilized {
            if prefix == "xml" {
                continue;
            }
            match inscope.get(prefix).filter(|uri| !uri.is_empty()) {
                Some(uri) => {
                    if rendered_ns.get(prefix) != Some(uri) {
                        ns_decls.push(NsDecl {
                            prefix: prefix.clone(),
                            uri: uri.clone(),
                        });
                    }
                }
                None => {
                    // Unbound default prefix must undeclare a rendered one.
                    if prefix.is_empty()
                        && rendered_ns.get("").is_some_and(|u| !u.is_empty())
                    {
                        ns_decls.push(NsDecl {
                            prefix: String::new(),
                            uri: String::new(),
                        });
                    }
                }
            }
        }
        ns_decls.sort();

        let attrs: Vec<Attr> = render::collect_attrs(self.text, node);
        let elem_name = render::element_qname(self.text, node);

        output.push(b'<');
        output.extend_from_slice(elem_name.as_bytes());
        for ns_decl in &ns_decls {
            ns_decl.render(output);
        }
        for attr in &attrs {
            attr.render(output);
        }
        output.push(b'>');

        let mut child_rendered = rendered_ns.clone();
        for ns_decl in &ns_decls {
            child_rendered.insert(ns_decl.prefix.clone(), ns_decl.uri.clone());
        }

        for child in node.children() {
            self.process_node(child, output, &child_rendered)?;
        }

        output.extend_from_slice(b"</");
        output.extend_from_slice(elem_name.as_bytes());
        output.push(b'>');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c14n(xml: &str, prefixes: &[&str]) -> String {
        let doc = roxmltree::Document::parse(xml).unwrap();
        let prefixes: Vec<String> = prefixes.iter().map(|p| p.to_string()).collect();
        let out = canonicalize(&doc, doc.root_element(), false, &prefixes, &[]).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn drops_unused_namespace_declarations() {
        let xml = r#"<a:r xmlns:a="http://a" xmlns:b="http://b"><a:c/></a:r>"#;
        assert_eq!(
            c14n(xml, &[]),
            r#"<a:r xmlns:a="http://a"><a:c></a:c></a:r>"#
        );
    }

    #[test]
    fn renders_namespace_where_first_utilized() {
        let xml = r#"<r xmlns:b="http://b"><b:c/></r>"#;
        assert_eq!(c14n(xml, &[]), r#"<r><b:c xmlns:b="http://b"></b:c></r>"#);
    }

    #[test]
    fn prefix_list_forces_declarations() {
        let xml = r#"<a:r xmlns:a="http://a" xmlns:b="http://b"><a:c/></a:r>"#;
        assert_eq!(
            c14n(xml, &["b"]),
            r#"<a:r xmlns:a="http://a" xmlns:b="http://b"><a:c></a:c></a:r>"#
        );
    }

    #[test]
    fn hash_default_forces_default_namespace() {
        let xml = r#"<a:r xmlns:a="http://a" xmlns="http://d"><a:c/></a:r>"#;
        assert_eq!(
            c14n(xml, &["#default"]),
            r#"<a:r xmlns="http://d" xmlns:a="http://a"><a:c></a:c></a:r>"#
        );
    }

    #[test]
    fn attribute_prefixes_are_visibly_utilized() {
        let xml = r#"<r xmlns:q="http://q" q:x="1"/>"#;
        assert_eq!(c14n(xml, &[]), r#"<r xmlns:q="http://q" q:x="1"></r>"#);
    }

    #[test]
    fn repeated_declaration_is_not_rerendered() {
        let xml = r#"<a:r xmlns:a="http://a"><a:c xmlns:a="http://a"/></a:r>"#;
        assert_eq!(
            c14n(xml, &[]),
            r#"<a:r xmlns:a="http://a"><a:c></a:c></a:r>"#
        );
    }
}
