//! Declaration block parser.
//!
//! Splits a block into plain declarations and hoistable nested constructs.
//! Nested selectors and at-rules become children of the container being
//! filled, in key order, and are removed from the block so that the caller is
//! left with the residual plain declarations.

use gesso_primer::CompactString;

use crate::container::{ContainerId, ContainerKind};
use crate::declarations::{classify, DeclarationBlock, DeclarationKind, DeclarationValue};
use crate::root::Root;

/// Hoist nested constructs of `block` into children of `container`.
///
/// The block is mutated in place: hoisted keys are removed.
pub fn parse_declarations_block(root: &mut Root, container: ContainerId, block: &mut DeclarationBlock) {
    let hoisted: Vec<(CompactString, ContainerKind)> = block
        .iter()
        .filter_map(|(key, value)| {
            let kind = match classify(key, value) {
                DeclarationKind::AtRule { identifier, rule } => ContainerKind::AtRule {
                    identifier: CompactString::from(identifier),
                    rule: CompactString::from(rule),
                },
                DeclarationKind::NestedSelector { query } => ContainerKind::Selector {
                    query: CompactString::from(query),
                },
                DeclarationKind::Literal => return None,
            };
            Some((CompactString::from(key), kind))
        })
        .collect();

    for (key, kind) in hoisted {
        let Some(DeclarationValue::Block(nested)) = block.remove(&key) else {
            continue;
        };
        root.create_child(container, kind, nested);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declarations;

    #[test]
    fn test_residual_keeps_plain_declarations() {
        let mut root = Root::new();
        let mut block = declarations! {
            "display" => "flex",
            ".icon" => { "width" => "1rem" },
            "gap" => "0.5rem",
            "@supports (display: grid)" => { "display" => "grid" },
        };
        parse_declarations_block(&mut root, ContainerId::ROOT, &mut block);

        assert_eq!(block.keys().collect::<Vec<_>>(), vec!["display", "gap"]);
        let children = root.children();
        assert_eq!(children.len(), 2);
        assert_eq!(
            root.container(children[0]).kind,
            ContainerKind::Selector {
                query: ".icon".into()
            }
        );
        assert_eq!(
            root.container(children[1]).kind,
            ContainerKind::AtRule {
                identifier: "supports".into(),
                rule: "(display: grid)".into()
            }
        );
    }

    #[test]
    fn test_hoisting_is_recursive() {
        let mut root = Root::new();
        let mut block = declarations! {
            "&:hover" => {
                "color" => "red",
                "@media print" => { "color" => "black" },
            },
        };
        parse_declarations_block(&mut root, ContainerId::ROOT, &mut block);

        assert!(block.is_empty());
        let hover = root.children()[0];
        let hover_container = root.container(hover);
        assert_eq!(hover_container.declarations.len(), 1);
        assert_eq!(hover_container.children.len(), 1);
        assert_eq!(root.container(hover_container.children[0]).parent, Some(hover));
    }

    #[test]
    fn test_literal_values_stay() {
        let mut root = Root::new();
        let mut block = declarations! {
            "@import" => "url(reset.css)",
            "&" => "not-a-block",
        };
        parse_declarations_block(&mut root, ContainerId::ROOT, &mut block);
        assert_eq!(block.len(), 2);
        assert!(root.children().is_empty());
    }
}
