#![forbid(unsafe_code)]

//! Reading transform chains and canonicalization methods out of a
//! signed document.  Verification must honour the algorithms the
//! document actually declares, not the ones signing would have chosen.

use smevsec_c14n::C14nMode;
use smevsec_core::{algorithm, ns, Error, Result};
use smevsec_xml::document::{find_child_element, find_child_elements};

/// The transform chain declared on a `ds:Reference`.
pub struct TransformChain {
    pub c14n: C14nMode,
    pub inclusive_prefixes: Vec<String>,
    pub enveloped: bool,
}

/// Read `ds:Transforms` under a `ds:Reference`.
///
/// The profile allows the enveloped-signature transform followed by one
/// canonicalization transform.  A Reference without a canonicalization
/// transform falls back to inclusive C14N, which is what XMLDSIG
/// prescribes for an octet-stream conversion without an explicit method.
pub fn read_transforms(reference: roxmltree::Node<'_, '_>) -> Result<TransformChain> {
    let mut chain = TransformChain {
        c14n: C14nMode::Inclusive,
        inclusive_prefixes: Vec::new(),
        enveloped: false,
    };
    let transforms = match find_child_element(reference, ns::DSIG, ns::node::TRANSFORMS) {
        Some(t) => t,
        None => return Ok(chain),
    };
    for transform in find_child_elements(transforms, ns::DSIG, ns::node::TRANSFORM) {
        let uri = transform.attribute(ns::attr::ALGORITHM).ok_or_else(|| {
            Error::MissingAttribute(format!(
                "{} on {}",
                ns::attr::ALGORITHM,
                ns::node::TRANSFORM
            ))
        })?;
        if uri == algorithm::ENVELOPED_SIGNATURE {
            chain.enveloped = true;
        } else {
            chain.c14n = C14nMode::from_uri(uri)?;
            chain.inclusive_prefixes = read_inclusive_prefixes(transform);
        }
    }
    Ok(chain)
}

/// Read a `ds:CanonicalizationMethod` element: its mode plus any
/// `InclusiveNamespaces/@PrefixList`.
pub fn read_c14n_method(method: roxmltree::Node<'_, '_>) -> Result<(C14nMode, Vec<String>)> {
    let uri = method.attribute(ns::attr::ALGORITHM).ok_or_else(|| {
        Error::MissingAttribute(format!(
            "{} on {}",
            ns::attr::ALGORITHM,
            ns::node::CANONICALIZATION_METHOD
        ))
    })?;
    Ok((C14nMode::from_uri(uri)?, read_inclusive_prefixes(method)))
}

/// The `InclusiveNamespaces/@PrefixList` of a transform or
/// canonicalization method element.  `#default` names the default
/// namespace and maps to the empty prefix.
fn read_inclusive_prefixes(node: roxmltree::Node<'_, '_>) -> Vec<String> {
    let Some(inclusive) = find_child_element(node, ns::EXC_C14N, ns::node::INCLUSIVE_NAMESPACES)
    else {
        return Vec::new();
    };
    inclusive
        .attribute(ns::attr::PREFIX_LIST)
        .map(|list| {
            list.split_whitespace()
                .map(|p| if p == "#default" { String::new() } else { p.to_owned() })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> roxmltree::Document<'_> {
        roxmltree::Document::parse(xml).unwrap()
    }

    #[test]
    fn reads_enveloped_plus_exclusive_chain() {
        let xml = format!(
            r##"<ds:Reference xmlns:ds="{}" URI="#x">
                 <ds:Transforms>
                   <ds:Transform Algorithm="{}"/>
                   <ds:Transform Algorithm="{}"/>
                 </ds:Transforms>
               </ds:Reference>"##,
            ns::DSIG,
            algorithm::ENVELOPED_SIGNATURE,
            algorithm::EXC_C14N,
        );
        let doc = parse(&xml);
        let chain = read_transforms(doc.root_element()).unwrap();
        assert!(chain.enveloped);
        assert_eq!(chain.c14n, C14nMode::Exclusive);
        assert!(chain.inclusive_prefixes.is_empty());
    }

    #[test]
    fn reads_prefix_list_with_default_mapping() {
        let xml = format!(
            r##"<ds:Reference xmlns:ds="{}" xmlns:ec="{}" URI="#x">
                 <ds:Transforms>
                   <ds:Transform Algorithm="{}">
                     <ec:InclusiveNamespaces PrefixList="soapenv #default wsu"/>
                   </ds:Transform>
                 </ds:Transforms>
               </ds:Reference>"##,
            ns::DSIG,
            ns::EXC_C14N,
            algorithm::EXC_C14N,
        );
        let doc = parse(&xml);
        let chain = read_transforms(doc.root_element()).unwrap();
        assert_eq!(chain.inclusive_prefixes, ["soapenv", "", "wsu"]);
    }

    #[test]
    fn missing_transforms_defaults_to_inclusive() {
        let xml = format!(r##"<ds:Reference xmlns:ds="{}" URI="#x"/>"##, ns::DSIG);
        let doc = parse(&xml);
        let chain = read_transforms(doc.root_element()).unwrap();
        assert!(!chain.enveloped);
        assert_eq!(chain.c14n, C14nMode::Inclusive);
    }

    #[test]
    fn unknown_transform_uri_is_rejected() {
        let xml = format!(
            r##"<ds:Reference xmlns:ds="{}" URI="#x">
                 <ds:Transforms>
                   <ds:Transform Algorithm="urn:example:xslt"/>
                 </ds:Transforms>
               </ds:Reference>"##,
            ns::DSIG,
        );
        let doc = parse(&xml);
        assert!(matches!(
            read_transforms(doc.root_element()),
            Err(Error::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn canonicalization_method_requires_algorithm() {
        let xml = format!(
            r#"<ds:CanonicalizationMethod xmlns:ds="{}"/>"#,
            ns::DSIG
        );
        let doc = parse(&xml);
        assert!(matches!(
            read_c14n_method(doc.root_element()),
            Err(Error::MissingAttribute(_))
        ));
    }
}
