//! Modifier factories.
//!
//! A modifier wraps the declarations of a utility instance, typically in a
//! pseudo-class selector or a media query. It is known under one or more
//! interchangeable aliases (`sm`, `small`).

use std::fmt;
use std::sync::Arc;

use gesso_primer::CompactString;

use crate::container::{ContainerId, ModifierId};
use crate::declarations::{DeclarationBlock, DeclarationValue};
use crate::root::{Root, Scope};

/// Transform applied to the declarations of a utility instance.
pub type ModifierFn = Arc<dyn Fn(ModifierContext<'_>) -> DeclarationBlock + Send + Sync>;

/// Input of a modifier transform.
#[derive(Debug, Clone)]
pub struct ModifierContext<'a> {
    /// Declarations accumulated so far, in nested form.
    pub declarations: DeclarationBlock,
    /// Alias the modifier was selected by.
    pub alias: &'a str,
    /// Name of the utility being modified.
    pub utility: &'a str,
    /// Value key of the utility being modified.
    pub key: &'a str,
}

impl<'a> ModifierContext<'a> {
    /// Nest the declarations under a single key.
    ///
    /// ```
    /// use gesso_canvas::{declarations, DeclarationBlock, ModifierContext};
    ///
    /// let ctx = ModifierContext {
    ///     declarations: declarations! { "color" => "red" },
    ///     alias: "hover",
    ///     utility: "color",
    ///     key: "red",
    /// };
    /// let wrapped = ctx.wrap("&:hover");
    /// assert!(wrapped.get("&:hover").and_then(|v| v.as_block()).is_some());
    /// ```
    pub fn wrap(self, key: impl Into<CompactString>) -> DeclarationBlock {
        let mut block = DeclarationBlock::new();
        block.insert(key, DeclarationValue::Block(self.declarations));
        block
    }
}

#[derive(Clone)]
pub struct ModifierFactory {
    /// Aliases. The first one is the canonical name.
    pub key: Vec<CompactString>,
    pub(crate) transform: ModifierFn,
}

impl fmt::Debug for ModifierFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModifierFactory")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl ModifierFactory {
    #[inline]
    pub fn transform(&self, context: ModifierContext<'_>) -> DeclarationBlock {
        (self.transform)(context)
    }

    #[inline]
    pub fn has_alias(&self, alias: &str) -> bool {
        self.key.iter().any(|k| k == alias)
    }
}

impl<'a> Scope<'a> {
    /// Register a modifier under one or more aliases.
    pub fn modifier<I, S, F>(&mut self, aliases: I, transform: F) -> ModifierId
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
        F: Fn(ModifierContext<'_>) -> DeclarationBlock + Send + Sync + 'static,
    {
        let key: Vec<CompactString> = aliases.into_iter().map(Into::into).collect();
        if key.is_empty() {
            tracing::warn!("modifier registered without aliases can never match");
        }
        let id = ModifierId::new(self.root.modifiers.len() as u32);
        self.root.modifiers.push(ModifierFactory {
            key,
            transform: Arc::new(transform),
        });
        id
    }
}

impl Root {
    pub fn modifier<I, S, F>(&mut self, aliases: I, transform: F) -> ModifierId
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
        F: Fn(ModifierContext<'_>) -> DeclarationBlock + Send + Sync + 'static,
    {
        self.scope(ContainerId::ROOT).modifier(aliases, transform)
    }
}
