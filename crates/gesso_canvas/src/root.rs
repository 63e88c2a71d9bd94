//! The token graph root and its authoring scopes.
//!
//! [`Root`] is the single owner of everything a graph holds: the container
//! arena, the variable arena, and the global utility, modifier, recipe and
//! theme collections. Authoring happens through a [`Scope`], a mutable
//! borrow of the root bound to one container.

use gesso_primer::CompactString;

use crate::container::{
    Container, ContainerId, ContainerKind, ModifierId, RecipeId, UtilityId, Variable, VariableId,
};
use crate::declarations::{DeclarationBlock, DeclarationValue};
use crate::modifier::ModifierFactory;
use crate::parse::parse_declarations_block;
use crate::recipe::Recipe;
use crate::utility::UtilityFactory;

/// The token graph.
#[derive(Debug, Clone)]
pub struct Root {
    pub(crate) containers: Vec<Container>,
    pub(crate) variables: Vec<Variable>,
    pub(crate) utilities: Vec<UtilityFactory>,
    pub(crate) modifiers: Vec<ModifierFactory>,
    pub(crate) recipes: Vec<Recipe>,
    pub(crate) themes: Vec<ContainerId>,
}

impl Default for Root {
    fn default() -> Self {
        Self::new()
    }
}

impl Root {
    pub fn new() -> Self {
        Self {
            containers: vec![Container::new(ContainerKind::Root, None)],
            variables: Vec::new(),
            utilities: Vec::new(),
            modifiers: Vec::new(),
            recipes: Vec::new(),
            themes: Vec::new(),
        }
    }

    /// Authoring scope bound to a container.
    #[inline]
    pub fn scope(&mut self, container: ContainerId) -> Scope<'_> {
        Scope {
            root: self,
            container,
        }
    }

    // =========================================================================
    // Read access
    // =========================================================================

    #[inline]
    pub fn container(&self, id: ContainerId) -> &Container {
        &self.containers[id.index()]
    }

    #[inline]
    pub fn try_container(&self, id: ContainerId) -> Option<&Container> {
        self.containers.get(id.index())
    }

    #[inline]
    pub fn get_variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.index()]
    }

    #[inline]
    pub fn utilities(&self) -> &[UtilityFactory] {
        &self.utilities
    }

    #[inline]
    pub fn get_utility(&self, id: UtilityId) -> &UtilityFactory {
        &self.utilities[id.index()]
    }

    #[inline]
    pub fn modifiers(&self) -> &[ModifierFactory] {
        &self.modifiers
    }

    #[inline]
    pub fn get_modifier(&self, id: ModifierId) -> &ModifierFactory {
        &self.modifiers[id.index()]
    }

    #[inline]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    #[inline]
    pub fn get_recipe(&self, id: RecipeId) -> &Recipe {
        &self.recipes[id.index()]
    }

    #[inline]
    pub fn themes(&self) -> &[ContainerId] {
        &self.themes
    }

    /// Children of the root container, in output order.
    #[inline]
    pub fn children(&self) -> &[ContainerId] {
        &self.containers[ContainerId::ROOT.index()].children
    }

    pub fn find_utility(&self, name: &str) -> Option<UtilityId> {
        self.utilities
            .iter()
            .position(|u| u.name == name)
            .map(|i| UtilityId::new(i as u32))
    }

    /// Find the modifier registered under an alias.
    pub fn find_modifier(&self, alias: &str) -> Option<ModifierId> {
        self.modifiers
            .iter()
            .position(|m| m.key.iter().any(|k| k == alias))
            .map(|i| ModifierId::new(i as u32))
    }

    pub fn find_theme(&self, name: &str) -> Option<ContainerId> {
        self.themes.iter().copied().find(|id| {
            matches!(&self.container(*id).kind, ContainerKind::Theme { name: n } if n == name)
        })
    }

    pub fn find_recipe(&self, name: &str) -> Option<RecipeId> {
        self.recipes
            .iter()
            .position(|r| r.name == name)
            .map(|i| RecipeId::new(i as u32))
    }

    /// Variable declared directly on a container.
    pub fn own_variable(&self, container: ContainerId, name: &str) -> Option<VariableId> {
        self.container(container)
            .variables
            .iter()
            .copied()
            .find(|id| self.get_variable(*id).name == name)
    }

    /// Resolve a variable by name from a container outwards.
    pub fn find_variable(&self, container: ContainerId, name: &str) -> Option<VariableId> {
        let mut current = Some(container);
        while let Some(id) = current {
            if let Some(variable) = self.own_variable(id, name) {
                return Some(variable);
            }
            current = self.container(id).parent;
        }
        None
    }

    /// Fold a container back into a nested declaration block.
    ///
    /// Hoisted selectors and at-rules return under their original keys.
    /// Children without a nesting key (themes, utility instances) are left
    /// out. Two children folding to the same key are merged.
    pub fn fold(&self, id: ContainerId) -> DeclarationBlock {
        let container = self.container(id);
        let mut block = container.declarations.clone();
        for child_id in &container.children {
            let child = self.container(*child_id);
            let Some(key) = child.nesting_key() else {
                continue;
            };
            let folded = self.fold(*child_id);
            match block.get_mut(&key) {
                Some(DeclarationValue::Block(existing)) => existing.merge(folded),
                _ => block.insert(key, folded),
            }
        }
        block
    }

    // =========================================================================
    // Arena
    // =========================================================================

    pub(crate) fn alloc_container(
        &mut self,
        kind: ContainerKind,
        parent: Option<ContainerId>,
    ) -> ContainerId {
        let id = ContainerId::new(self.containers.len() as u32);
        self.containers.push(Container::new(kind, parent));
        id
    }

    pub(crate) fn alloc_variable(&mut self, variable: Variable) -> VariableId {
        let id = VariableId::new(self.variables.len() as u32);
        self.variables.push(variable);
        id
    }

    #[inline]
    pub(crate) fn container_mut(&mut self, id: ContainerId) -> &mut Container {
        &mut self.containers[id.index()]
    }

    #[inline]
    pub(crate) fn variable_mut(&mut self, id: VariableId) -> &mut Variable {
        &mut self.variables[id.index()]
    }

    /// Create a child container, append it to its parent and fill it.
    pub(crate) fn create_child(
        &mut self,
        parent: ContainerId,
        kind: ContainerKind,
        declarations: DeclarationBlock,
    ) -> ContainerId {
        let id = self.alloc_container(kind, Some(parent));
        self.container_mut(parent).children.push(id);
        self.apply_declarations(id, declarations);
        id
    }

    /// Parse a block into a container: nested constructs become children,
    /// the residual merges into the container's declarations.
    pub(crate) fn apply_declarations(&mut self, id: ContainerId, mut block: DeclarationBlock) {
        parse_declarations_block(self, id, &mut block);
        self.container_mut(id).declarations.merge(block);
    }

    /// Unlink a container from its parent. The slot stays in the arena,
    /// unreachable from the root.
    pub(crate) fn detach(&mut self, id: ContainerId) {
        if let Some(parent) = self.container(id).parent {
            self.container_mut(parent).children.retain(|child| *child != id);
        }
    }

    /// Empty a container so it can be filled again.
    ///
    /// Former children keep their arena slots but are no longer reachable;
    /// ids are never reused, so handles to them stay valid for reading.
    pub(crate) fn reset_container(&mut self, id: ContainerId) {
        let container = self.container_mut(id);
        container.variables.clear();
        container.declarations = DeclarationBlock::new();
        container.children.clear();
    }

    // =========================================================================
    // Root-level authoring
    // =========================================================================

    /// Declare or update a variable on the root.
    pub fn variable(
        &mut self,
        target: impl Into<crate::variable::VariableTarget>,
        value: impl Into<crate::value::TokenValue>,
    ) -> VariableId {
        self.scope(ContainerId::ROOT).variable(target, value)
    }

    /// Declare a variable on the root unless it already exists.
    pub fn variable_default(
        &mut self,
        target: impl Into<crate::variable::VariableTarget>,
        value: impl Into<crate::value::TokenValue>,
    ) -> VariableId {
        self.scope(ContainerId::ROOT).variable_default(target, value)
    }

    pub fn selector(&mut self, query: &str, declarations: DeclarationBlock) -> ContainerId {
        self.scope(ContainerId::ROOT).selector(query, declarations)
    }

    pub fn selector_with<F>(&mut self, query: &str, build: F) -> ContainerId
    where
        F: FnOnce(&mut Scope<'_>) -> DeclarationBlock,
    {
        self.scope(ContainerId::ROOT).selector_with(query, build)
    }

    pub fn at_rule(
        &mut self,
        identifier: &str,
        rule: &str,
        declarations: DeclarationBlock,
    ) -> ContainerId {
        self.scope(ContainerId::ROOT)
            .at_rule(identifier, rule, declarations)
    }

    pub fn media(&mut self, query: &str, declarations: DeclarationBlock) -> ContainerId {
        self.scope(ContainerId::ROOT).media(query, declarations)
    }

    pub fn keyframes(&mut self, name: &str, frames: DeclarationBlock) -> ContainerId {
        self.scope(ContainerId::ROOT).keyframes(name, frames)
    }

    /// Get or create a theme and author into it.
    ///
    /// Themes are unique per name: calling this again with the same name
    /// adds to the existing theme.
    pub fn theme<F>(&mut self, name: &str, build: F) -> ContainerId
    where
        F: FnOnce(&mut Scope<'_>) -> DeclarationBlock,
    {
        let id = match self.find_theme(name) {
            Some(id) => id,
            None => {
                let id = self.alloc_container(
                    ContainerKind::Theme {
                        name: CompactString::from(name),
                    },
                    Some(ContainerId::ROOT),
                );
                self.themes.push(id);
                id
            }
        };
        let mut scope = self.scope(id);
        let block = build(&mut scope);
        self.apply_declarations(id, block);
        id
    }
}

/// Authoring handle bound to one container.
pub struct Scope<'a> {
    pub(crate) root: &'a mut Root,
    pub(crate) container: ContainerId,
}

impl<'a> Scope<'a> {
    /// The container this scope writes into.
    #[inline]
    pub fn id(&self) -> ContainerId {
        self.container
    }

    #[inline]
    pub fn root(&mut self) -> &mut Root {
        self.root
    }

    /// Merge declarations into the current container.
    pub fn declarations(&mut self, declarations: DeclarationBlock) {
        self.root.apply_declarations(self.container, declarations);
    }

    pub fn selector(&mut self, query: &str, declarations: DeclarationBlock) -> ContainerId {
        self.root.create_child(
            self.container,
            ContainerKind::Selector {
                query: CompactString::from(query),
            },
            declarations,
        )
    }

    /// Create a selector authored by a callback.
    ///
    /// The callback receives a scope bound to the new selector; the block it
    /// returns is merged into the selector's declarations.
    pub fn selector_with<F>(&mut self, query: &str, build: F) -> ContainerId
    where
        F: FnOnce(&mut Scope<'_>) -> DeclarationBlock,
    {
        let id = self.selector(query, DeclarationBlock::new());
        self.build_into(id, build);
        id
    }

    pub fn at_rule(
        &mut self,
        identifier: &str,
        rule: &str,
        declarations: DeclarationBlock,
    ) -> ContainerId {
        self.root.create_child(
            self.container,
            ContainerKind::AtRule {
                identifier: CompactString::from(identifier),
                rule: CompactString::from(rule),
            },
            declarations,
        )
    }

    pub fn at_rule_with<F>(&mut self, identifier: &str, rule: &str, build: F) -> ContainerId
    where
        F: FnOnce(&mut Scope<'_>) -> DeclarationBlock,
    {
        let id = self.at_rule(identifier, rule, DeclarationBlock::new());
        self.build_into(id, build);
        id
    }

    #[inline]
    pub fn media(&mut self, query: &str, declarations: DeclarationBlock) -> ContainerId {
        self.at_rule("media", query, declarations)
    }

    pub fn media_with<F>(&mut self, query: &str, build: F) -> ContainerId
    where
        F: FnOnce(&mut Scope<'_>) -> DeclarationBlock,
    {
        self.at_rule_with("media", query, build)
    }

    /// Declare a keyframes at-rule. Frame selectors (`0%`, `to`) stay as
    /// nested blocks of the at-rule.
    #[inline]
    pub fn keyframes(&mut self, name: &str, frames: DeclarationBlock) -> ContainerId {
        self.at_rule("keyframes", name, frames)
    }

    fn build_into<F>(&mut self, id: ContainerId, build: F)
    where
        F: FnOnce(&mut Scope<'_>) -> DeclarationBlock,
    {
        let mut scope = Scope {
            root: &mut *self.root,
            container: id,
        };
        let block = build(&mut scope);
        self.root.apply_declarations(id, block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declarations;
    use crate::value::{reference, TokenValue};

    #[test]
    fn test_selector_hoists_nested_blocks() {
        let mut root = Root::new();
        let button = root.selector(
            ".button",
            declarations! {
                "padding" => reference("spacing.md"),
                "&:hover" => {
                    "color" => "red",
                },
                "@media (min-width: 640px)" => {
                    "padding" => reference("spacing.lg"),
                },
            },
        );

        let container = root.container(button);
        assert_eq!(container.declarations.keys().collect::<Vec<_>>(), vec!["padding"]);
        assert_eq!(container.children.len(), 2);
        assert_eq!(
            root.container(container.children[0]).kind,
            ContainerKind::Selector {
                query: "&:hover".into()
            }
        );
        assert_eq!(
            root.container(container.children[1]).kind,
            ContainerKind::AtRule {
                identifier: "media".into(),
                rule: "(min-width: 640px)".into()
            }
        );
        assert_eq!(root.children(), &[button]);
    }

    #[test]
    fn test_selector_with_callback() {
        let mut root = Root::new();
        let card = root.selector_with(".card", |scope| {
            scope.variable("card.padding", "1rem");
            scope.selector(".card__title", declarations! { "font-weight" => 700 });
            declarations! { "padding" => reference("card.padding") }
        });

        let container = root.container(card);
        assert_eq!(container.variables.len(), 1);
        assert_eq!(container.children.len(), 1);
        assert!(container.declarations.contains_key("padding"));
    }

    #[test]
    fn test_theme_accumulates_by_name() {
        let mut root = Root::new();
        let first = root.theme("dark", |scope| {
            scope.variable("color.background", "#000");
            DeclarationBlock::new()
        });
        let second = root.theme("dark", |scope| {
            scope.variable("color.text", "#fff");
            DeclarationBlock::new()
        });

        assert_eq!(first, second);
        assert_eq!(root.themes().len(), 1);
        assert_eq!(root.container(first).variables.len(), 2);
        assert!(root.children().is_empty());
    }

    #[test]
    fn test_find_variable_walks_ancestors() {
        let mut root = Root::new();
        let spacing = root.variable("spacing", "1rem");
        let child = root.selector_with(".a", |scope| {
            scope.selector(".b", DeclarationBlock::new());
            DeclarationBlock::new()
        });
        let grandchild = root.container(child).children[0];

        assert_eq!(root.find_variable(grandchild, "spacing"), Some(spacing));
        assert_eq!(root.find_variable(grandchild, "missing"), None);
        assert_eq!(root.get_variable(spacing).value, TokenValue::from("1rem"));
    }

    #[test]
    fn test_fold_restores_nested_form() {
        let mut root = Root::new();
        let block = declarations! {
            "color" => "red",
            "&:focus" => {
                "outline" => "none",
            },
        };
        let id = root.selector(".link", block.clone());
        assert_eq!(root.fold(id), block);
    }

    #[test]
    fn test_reset_container_drops_old_children() {
        let mut root = Root::new();
        let id = root.selector(".link", declarations! { "&:focus" => { "outline" => "none" } });
        let focus = root.container(id).children[0];

        root.reset_container(id);
        root.apply_declarations(id, declarations! { "&:hover" => { "color" => "red" } });

        assert_eq!(root.container(id).children.len(), 1);
        assert!(!root.container(id).children.contains(&focus));
        assert_eq!(root.container(focus).parent, Some(id));
        assert_eq!(root.fold(id), declarations! { "&:hover" => { "color" => "red" } });
    }

    #[test]
    fn test_detach_unlinks_from_parent() {
        let mut root = Root::new();
        let first = root.selector(".a", declarations! { "color" => "red" });
        let second = root.selector(".b", declarations! { "color" => "blue" });

        root.detach(first);
        assert_eq!(root.children(), &[second]);
        assert_eq!(root.container(first).parent, Some(ContainerId::ROOT));
    }

    #[test]
    fn test_keyframes() {
        let mut root = Root::new();
        let id = root.keyframes(
            "fade",
            declarations! {
                "from" => { "opacity" => 0 },
                "to" => { "opacity" => 1 },
            },
        );
        let container = root.container(id);
        assert_eq!(
            container.kind,
            ContainerKind::AtRule {
                identifier: "keyframes".into(),
                rule: "fade".into()
            }
        );
        assert_eq!(container.declarations.len(), 2);
        assert!(container.children.is_empty());
    }
}
