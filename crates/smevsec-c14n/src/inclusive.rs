#![forbid(unsafe_code)]

//! Inclusive Canonical XML 1.0 (C14N 1.0).
//!
//! Algorithm URI: `http://www.w3.org/TR/2001/REC-xml-c14n-20010315`
//! With comments: `http://www.w3.org/TR/2001/REC-xml-c14n-20010315#WithComments`
//!
//! Operates on an element subtree.  The apex element emits every
//! namespace binding in scope and inherits `xml:*` attributes from its
//! ancestors; descendants emit only bindings that differ from what an
//! ancestor already rendered.

use crate::render::{self, Attr, NsDecl};
use smevsec_core::Result;
use std::collections::BTreeMap;

/// Canonicalize the subtree rooted at `root` using Inclusive C14N 1.0.
///
/// Subtrees rooted at a node in `excluded` are omitted entirely.
pub fn canonicalize(
    doc: &roxmltree::Document<'_>,
    root: roxmltree::Node<'_, '_>,
    with_comments: bool,
    excluded: &[roxmltree::NodeId],
) -> Result<Vec<u8>> {
    let ctx = C14nContext {
        text: doc.input_text(),
        with_comments,
        excluded,
    };
    let mut output = Vec::new();
    ctx.process_element(root, &mut output, &BTreeMap::new(), true)?;
    Ok(output)
}

struct C14nContext<'a> {
    text: &'a str,
    with_comments: bool,
    excluded: &'a [roxmltree::NodeId],
}

impl C14nContext<'_> {
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
                self.process_element(node, output, rendered_ns, false)?;
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
        is_apex: bool,
    ) -> Result<()> {
        let inscope = render::inscope_namespaces(node);

        let mut ns_decls: Vec<NsDecl> = Vec::new();
        for (prefix, uri) in &inscope {
            if uri.is_empty() {
                // xmlns="" is only needed to undeclare a rendered default.
                if rendered_ns.get(prefix).is_some_and(|u| !u.is_empty()) {
                    ns_decls.push(NsDecl {
                        prefix: prefix.clone(),
                        uri: String::new(),
                    });
                }
            } else if rendered_ns.get(prefix) != Some(uri) {
                ns_decls.push(NsDecl {
                    prefix: prefix.clone(),
                    uri: uri.clone(),
                });
            }
        }
        ns_decls.sort();

        let mut attrs: Vec<Attr> = render::collect_attrs(self.text, node);
        if is_apex {
            attrs.extend(render::inherited_xml_attrs(node, &attrs));
            attrs.sort();
        }

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
        for (prefix, uri) in &inscope {
            child_rendered.insert(prefix.clone(), uri.clone());
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
