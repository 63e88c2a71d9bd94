//! Recipes.
//!
//! A recipe is a multi-variant component style: a base block, groups of
//! variant options, default options and compound overrides. Every block
//! maps utility names to values; nested blocks keyed by a modifier alias
//! apply that modifier. Registering a recipe lowers every block into utility
//! values and records the class names each part produces, so a selection
//! can later be turned into class names without touching the graph.

use gesso_primer::grammar::{arbitrary_key, build_class_name};
use gesso_primer::{CompactString, FxIndexMap};

use crate::container::{ContainerId, ModifierId, RecipeId};
use crate::declarations::{DeclarationBlock, DeclarationValue};
use crate::root::{Root, Scope};
use crate::utility::{UtilityCreator, UtilityFactory};
use crate::value::TokenValue;

/// A compound variant: applies when every listed group has the listed option.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundVariant {
    pub matches: FxIndexMap<CompactString, CompactString>,
    pub css: DeclarationBlock,
}

/// Authored form of a recipe.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecipeDefinition {
    pub base: Option<DeclarationBlock>,
    pub variants: FxIndexMap<CompactString, FxIndexMap<CompactString, DeclarationBlock>>,
    pub default_variants: FxIndexMap<CompactString, CompactString>,
    pub compound_variants: Vec<CompoundVariant>,
}

impl RecipeDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base(mut self, block: DeclarationBlock) -> Self {
        self.base = Some(block);
        self
    }

    pub fn variant(
        mut self,
        group: impl Into<CompactString>,
        option: impl Into<CompactString>,
        block: DeclarationBlock,
    ) -> Self {
        self.variants
            .entry(group.into())
            .or_default()
            .insert(option.into(), block);
        self
    }

    pub fn default_variant(
        mut self,
        group: impl Into<CompactString>,
        option: impl Into<CompactString>,
    ) -> Self {
        self.default_variants.insert(group.into(), option.into());
        self
    }

    pub fn compound<I, G, O>(mut self, matches: I, css: DeclarationBlock) -> Self
    where
        I: IntoIterator<Item = (G, O)>,
        G: Into<CompactString>,
        O: Into<CompactString>,
    {
        self.compound_variants.push(CompoundVariant {
            matches: matches
                .into_iter()
                .map(|(g, o)| (g.into(), o.into()))
                .collect(),
            css,
        });
        self
    }

    /// Read a recipe from JSON.
    ///
    /// Accepts `base`, `variants`, `defaultVariants` and `compoundVariants`
    /// (each `{ "match": {...}, "css": {...} }`). Unknown keys are ignored;
    /// a non-object yields `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut definition = Self::new();

        if let Some(base) = object.get("base") {
            definition.base = Some(DeclarationBlock::from_json(base)?);
        }
        if let Some(variants) = object.get("variants").and_then(|v| v.as_object()) {
            for (group, options) in variants {
                let options = options.as_object()?;
                let entry = definition
                    .variants
                    .entry(CompactString::from(group.as_str()))
                    .or_default();
                for (option, block) in options {
                    entry.insert(
                        CompactString::from(option.as_str()),
                        DeclarationBlock::from_json(block)?,
                    );
                }
            }
        }
        if let Some(defaults) = object.get("defaultVariants").and_then(|v| v.as_object()) {
            for (group, option) in defaults {
                if let Some(option) = json_option(option) {
                    definition
                        .default_variants
                        .insert(CompactString::from(group.as_str()), option);
                }
            }
        }
        if let Some(compounds) = object.get("compoundVariants").and_then(|v| v.as_array()) {
            for compound in compounds {
                let matches = compound
                    .get("match")
                    .and_then(|m| m.as_object())
                    .map(|m| {
                        m.iter()
                            .filter_map(|(g, o)| Some((CompactString::from(g.as_str()), json_option(o)?)))
                            .collect()
                    })
                    .unwrap_or_default();
                let css = match compound.get("css") {
                    Some(css) => DeclarationBlock::from_json(css)?,
                    None => DeclarationBlock::new(),
                };
                definition.compound_variants.push(CompoundVariant { matches, css });
            }
        }
        Some(definition)
    }
}

/// Variant options may be written as strings, booleans or numbers.
fn json_option(value: &serde_json::Value) -> Option<CompactString> {
    match value {
        serde_json::Value::String(s) => Some(CompactString::from(s.as_str())),
        serde_json::Value::Bool(b) => Some(CompactString::from(if *b { "true" } else { "false" })),
        serde_json::Value::Number(n) => Some(CompactString::from(n.to_string())),
        _ => None,
    }
}

/// Class names produced by each part of a recipe.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecipeClasses {
    pub base: Vec<String>,
    pub variants: FxIndexMap<CompactString, FxIndexMap<CompactString, Vec<String>>>,
    pub compounds: Vec<Vec<String>>,
}

/// A registered recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub name: CompactString,
    pub definition: RecipeDefinition,
    pub classes: RecipeClasses,
}

impl Recipe {
    /// Class names for a variant selection.
    ///
    /// Groups missing from `selection` fall back to the default variants.
    /// Every compound variant whose conditions all hold contributes its
    /// classes. Duplicates are removed, first occurrence wins.
    pub fn class_names<'s, I>(&self, selection: I) -> Vec<String>
    where
        I: IntoIterator<Item = (&'s str, &'s str)>,
    {
        let mut selected: FxIndexMap<&str, &str> = self
            .definition
            .default_variants
            .iter()
            .map(|(g, o)| (g.as_str(), o.as_str()))
            .collect();
        for (group, option) in selection {
            selected.insert(group, option);
        }

        let mut names: Vec<String> = self.classes.base.clone();
        for (group, options) in &self.classes.variants {
            let Some(option) = selected.get(group.as_str()) else {
                continue;
            };
            if let Some(classes) = options.get(*option) {
                names.extend(classes.iter().cloned());
            }
        }
        for (compound, classes) in self.definition.compound_variants.iter().zip(&self.classes.compounds) {
            let applies = compound
                .matches
                .iter()
                .all(|(group, option)| selected.get(group.as_str()) == Some(&option.as_str()));
            if applies {
                names.extend(classes.iter().cloned());
            }
        }

        let mut seen = gesso_primer::FxHashSet::default();
        names.retain(|name| seen.insert(name.clone()));
        names
    }
}

/// Key a recipe value is recorded under.
///
/// A value already recorded keeps its key. A string naming a recorded key,
/// or a key the resolver knows, selects that key. Anything else is recorded
/// under an arbitrary `[value]` key.
fn synthesize_key(factory: &UtilityFactory, value: &TokenValue) -> (CompactString, TokenValue) {
    if let Some(entry) = factory.values.iter().find(|entry| entry.value == *value) {
        return (entry.key.clone(), entry.value.clone());
    }
    if let Some(text) = value.as_str() {
        if let Some(existing) = factory.value_for(text) {
            return (CompactString::from(text), existing.clone());
        }
        if let Some(resolved) = factory.resolve(text) {
            return (CompactString::from(text), resolved);
        }
    }
    (CompactString::from(arbitrary_key(&value.to_string())), value.clone())
}

impl Root {
    pub fn recipe(&mut self, name: &str, definition: RecipeDefinition) -> RecipeId {
        self.scope(ContainerId::ROOT).recipe(name, definition)
    }

    /// Lower one recipe block into utility values, collecting class names.
    fn lower_recipe_block(
        &mut self,
        recipe: &str,
        block: &DeclarationBlock,
        modifiers: &mut Vec<ModifierId>,
        aliases: &mut Vec<CompactString>,
        out: &mut Vec<String>,
    ) {
        for (property, value) in block.iter() {
            match value {
                DeclarationValue::Literal(token) => {
                    let Some(utility) = self.find_utility(property) else {
                        tracing::warn!(recipe, utility = %property, "unknown utility in recipe, skipping");
                        continue;
                    };
                    let (key, token) = synthesize_key(self.get_utility(utility), token);
                    UtilityCreator::new(utility).create(self, [(key.clone(), token)], modifiers.as_slice());
                    out.push(build_class_name(property, &key, aliases.as_slice()));
                }
                DeclarationValue::Block(nested) => {
                    let Some(modifier) = self.find_modifier(property) else {
                        tracing::warn!(recipe, modifier = %property, "unknown modifier in recipe, skipping");
                        continue;
                    };
                    modifiers.push(modifier);
                    aliases.push(CompactString::from(property));
                    self.lower_recipe_block(recipe, nested, modifiers, aliases, out);
                    aliases.pop();
                    modifiers.pop();
                }
            }
        }
    }

    fn lower_block(&mut self, recipe: &str, block: &DeclarationBlock) -> Vec<String> {
        let mut out = Vec::new();
        self.lower_recipe_block(recipe, block, &mut Vec::new(), &mut Vec::new(), &mut out);
        out
    }
}

impl<'a> Scope<'a> {
    /// Register a recipe, materialising the utility values it uses.
    ///
    /// Registering an existing name replaces that recipe.
    pub fn recipe(&mut self, name: &str, definition: RecipeDefinition) -> RecipeId {
        let root = &mut *self.root;
        let mut classes = RecipeClasses::default();

        if let Some(base) = &definition.base {
            classes.base = root.lower_block(name, base);
        }
        for (group, options) in &definition.variants {
            let mut lowered = FxIndexMap::default();
            for (option, block) in options {
                lowered.insert(option.clone(), root.lower_block(name, block));
            }
            classes.variants.insert(group.clone(), lowered);
        }
        for compound in &definition.compound_variants {
            classes.compounds.push(root.lower_block(name, &compound.css));
        }

        let recipe = Recipe {
            name: CompactString::from(name),
            definition,
            classes,
        };
        match root.find_recipe(name) {
            Some(id) => {
                root.recipes[id.index()] = recipe;
                id
            }
            None => {
                let id = RecipeId::new(root.recipes.len() as u32);
                root.recipes.push(recipe);
                id
            }
        }
    }
}
