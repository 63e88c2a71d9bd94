//! Graph nodes.
//!
//! Containers live in the [`Root`](crate::Root) arena and are addressed by
//! [`ContainerId`]. The root itself is container `0`.

use gesso_primer::CompactString;

use crate::declarations::DeclarationBlock;
use crate::value::TokenValue;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline(always)]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            #[inline(always)]
            pub const fn as_u32(self) -> u32 {
                self.0
            }

            #[inline(always)]
            pub(crate) const fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_id!(
    /// Container identifier
    ContainerId
);
define_id!(
    /// Variable identifier
    VariableId
);
define_id!(
    /// Utility factory identifier
    UtilityId
);
define_id!(
    /// Modifier factory identifier
    ModifierId
);
define_id!(
    /// Recipe identifier
    RecipeId
);

impl ContainerId {
    /// The graph root.
    pub const ROOT: Self = Self(0);
}

/// A named value slot owned by exactly one container.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: CompactString,
    pub value: TokenValue,
}

/// What a container is.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerKind {
    Root,
    Selector {
        query: CompactString,
    },
    AtRule {
        identifier: CompactString,
        rule: CompactString,
    },
    Theme {
        name: CompactString,
    },
    /// A materialised utility value, optionally wrapped by modifiers.
    Utility {
        name: CompactString,
        value: CompactString,
        modifiers: Vec<CompactString>,
    },
}

/// A node of the token graph.
#[derive(Debug, Clone)]
pub struct Container {
    pub kind: ContainerKind,
    pub parent: Option<ContainerId>,
    pub variables: Vec<VariableId>,
    pub declarations: DeclarationBlock,
    /// Insertion order is output order.
    pub children: Vec<ContainerId>,
}

impl Container {
    pub(crate) fn new(kind: ContainerKind, parent: Option<ContainerId>) -> Self {
        Self {
            kind,
            parent,
            variables: Vec::new(),
            declarations: DeclarationBlock::new(),
            children: Vec::new(),
        }
    }

    /// Key this container folds back to inside its parent's block.
    ///
    /// Roots, themes and utility instances are not nested constructs and
    /// have no key.
    pub fn nesting_key(&self) -> Option<String> {
        match &self.kind {
            ContainerKind::Selector { query } => Some(query.to_string()),
            ContainerKind::AtRule { identifier, rule } if rule.is_empty() => {
                Some(format!("@{}", identifier))
            }
            ContainerKind::AtRule { identifier, rule } => Some(format!("@{} {}", identifier, rule)),
            _ => None,
        }
    }

    #[inline]
    pub fn is_utility(&self) -> bool {
        matches!(self.kind, ContainerKind::Utility { .. })
    }
}
