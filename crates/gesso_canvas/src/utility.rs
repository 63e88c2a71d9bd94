//! Utility factories and their materialisation.
//!
//! A utility is a named generator `value -> declarations`. Registering one
//! stores the generator on the root; values are recorded later through a
//! [`UtilityCreator`], either while authoring or when the scanner reports a
//! class the sources actually use. Each recorded value owns one concrete
//! instance container, a child of the container the utility was registered
//! in.

use std::fmt;
use std::sync::Arc;

use gesso_primer::CompactString;

use crate::combine::combine_keys;
use crate::container::{ContainerId, ContainerKind, ModifierId, UtilityId, Variable};
use crate::declarations::DeclarationBlock;
use crate::modifier::ModifierContext;
use crate::root::{Root, Scope};
use crate::value::TokenValue;

/// Generator turning one value into declarations.
pub type UtilityFn = Arc<dyn Fn(&TokenValue) -> DeclarationBlock + Send + Sync>;

/// Maps a scanned utility key (`md` in `_padding:md`) to a token value.
pub type ValueResolver = Arc<dyn Fn(&str) -> Option<TokenValue> + Send + Sync>;

/// One recorded value of a utility.
///
/// Entries are identified by their key together with their modifier set.
#[derive(Debug, Clone, PartialEq)]
pub struct UtilityValue {
    pub key: CompactString,
    pub value: TokenValue,
    /// Sorted modifier aliases.
    pub modifiers: Vec<CompactString>,
    pub instance: ContainerId,
}

impl UtilityValue {
    /// Whether this entry has exactly the given modifier set.
    pub fn has_modifiers<S: AsRef<str>>(&self, modifiers: &[S]) -> bool {
        same_set(&self.modifiers, modifiers)
    }
}

#[derive(Clone)]
pub struct UtilityFactory {
    pub name: CompactString,
    pub values: Vec<UtilityValue>,
    /// Container the utility was registered in. Instances are its children.
    pub container: ContainerId,
    pub(crate) factory: UtilityFn,
    pub(crate) resolver: Option<ValueResolver>,
}

impl fmt::Debug for UtilityFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UtilityFactory")
            .field("name", &self.name)
            .field("values", &self.values)
            .field("container", &self.container)
            .field("resolver", &self.resolver.is_some())
            .finish_non_exhaustive()
    }
}

impl UtilityFactory {
    /// Run the generator for a value.
    #[inline]
    pub fn apply(&self, value: &TokenValue) -> DeclarationBlock {
        (self.factory)(value)
    }

    /// Whether an entry with this key and exactly this modifier set exists.
    pub fn has_value<S: AsRef<str>>(&self, key: &str, modifiers: &[S]) -> bool {
        self.values
            .iter()
            .any(|entry| entry.key == key && entry.has_modifiers(modifiers))
    }

    /// Value recorded for a key, preferring the unmodified entry.
    pub fn value_for(&self, key: &str) -> Option<&TokenValue> {
        self.values
            .iter()
            .filter(|entry| entry.key == key)
            .min_by_key(|entry| entry.modifiers.len())
            .map(|entry| &entry.value)
    }

    /// Ask the resolver, if any, for the value of a key.
    pub fn resolve(&self, key: &str) -> Option<TokenValue> {
        self.resolver.as_ref().and_then(|resolve| resolve(key))
    }

    fn position(&self, key: &str, modifiers: &[CompactString]) -> Option<usize> {
        self.values
            .iter()
            .position(|entry| entry.key == key && entry.has_modifiers(modifiers))
    }
}

/// Registration options.
#[derive(Clone, Default)]
pub struct UtilityOptions {
    pub resolver: Option<ValueResolver>,
}

impl UtilityOptions {
    pub fn resolver<F>(mut self, resolve: F) -> Self
    where
        F: Fn(&str) -> Option<TokenValue> + Send + Sync + 'static,
    {
        self.resolver = Some(Arc::new(resolve));
        self
    }
}

/// Handle returned by utility registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtilityCreator {
    id: UtilityId,
}

impl UtilityCreator {
    #[inline]
    pub fn new(id: UtilityId) -> Self {
        Self { id }
    }

    #[inline]
    pub fn id(&self) -> UtilityId {
        self.id
    }

    /// Record values and materialise their instances.
    ///
    /// Every entry produces a base instance. With modifiers, every
    /// combination of their aliases additionally produces a modified sibling
    /// instance. A modifier passed twice is used once.
    pub fn create<I, K, V>(&self, root: &mut Root, entries: I, modifiers: &[ModifierId])
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<CompactString>,
        V: Into<TokenValue>,
    {
        let mut unique: Vec<ModifierId> = Vec::with_capacity(modifiers.len());
        for id in modifiers {
            if !unique.contains(id) {
                unique.push(*id);
            }
        }
        let groups: Vec<Vec<CompactString>> = unique
            .iter()
            .map(|id| root.get_modifier(*id).key.clone())
            .collect();
        let combinations = combine_keys(&groups);

        for (key, value) in entries {
            let key = key.into();
            let value = value.into();
            root.materialize_value(self.id, &key, &value, &[]);
            for combination in &combinations {
                root.materialize_value(self.id, &key, &value, combination);
            }
        }
    }
}

impl<'a> Scope<'a> {
    /// Register a utility in the current container.
    ///
    /// Registering a name that already exists replaces its generator and
    /// keeps the recorded values.
    pub fn utility<F>(&mut self, name: &str, factory: F) -> UtilityCreator
    where
        F: Fn(&TokenValue) -> DeclarationBlock + Send + Sync + 'static,
    {
        self.utility_with(name, UtilityOptions::default(), factory)
    }

    pub fn utility_with<F>(&mut self, name: &str, options: UtilityOptions, factory: F) -> UtilityCreator
    where
        F: Fn(&TokenValue) -> DeclarationBlock + Send + Sync + 'static,
    {
        let factory: UtilityFn = Arc::new(factory);
        if let Some(id) = self.root.find_utility(name) {
            let existing = &mut self.root.utilities[id.index()];
            existing.factory = factory;
            if options.resolver.is_some() {
                existing.resolver = options.resolver;
            }
            return UtilityCreator::new(id);
        }

        let id = UtilityId::new(self.root.utilities.len() as u32);
        self.root.utilities.push(UtilityFactory {
            name: CompactString::from(name),
            values: Vec::new(),
            container: self.container,
            factory,
            resolver: options.resolver,
        });
        UtilityCreator::new(id)
    }
}

impl Root {
    pub fn utility<F>(&mut self, name: &str, factory: F) -> UtilityCreator
    where
        F: Fn(&TokenValue) -> DeclarationBlock + Send + Sync + 'static,
    {
        self.scope(ContainerId::ROOT).utility(name, factory)
    }

    pub fn utility_with<F>(&mut self, name: &str, options: UtilityOptions, factory: F) -> UtilityCreator
    where
        F: Fn(&TokenValue) -> DeclarationBlock + Send + Sync + 'static,
    {
        self.scope(ContainerId::ROOT).utility_with(name, options, factory)
    }

    /// Record one `(key, modifiers)` entry and (re)build its instance.
    ///
    /// An entry with the same identity and an equal value is left alone. A
    /// changed value refills the existing instance in place; for a base entry
    /// the modified siblings of the same key are rebuilt from it as well.
    pub(crate) fn materialize_value(
        &mut self,
        utility: UtilityId,
        key: &CompactString,
        value: &TokenValue,
        modifiers: &[CompactString],
    ) -> ContainerId {
        // The base goes first: refreshing it may already rebuild this entry.
        let base = (!modifiers.is_empty()).then(|| self.materialize_value(utility, key, value, &[]));

        let factory = &self.utilities[utility.index()];
        let existing = factory.position(key, modifiers);
        if let Some(index) = existing {
            let entry = &factory.values[index];
            if entry.value == *value {
                return entry.instance;
            }
        }

        let name = factory.name.clone();
        let registered_in = factory.container;
        let instance = match existing {
            Some(index) => {
                let instance = factory.values[index].instance;
                self.reset_container(instance);
                instance
            }
            None => {
                let id = self.alloc_container(
                    ContainerKind::Utility {
                        name: name.clone(),
                        value: key.clone(),
                        modifiers: modifiers.to_vec(),
                    },
                    Some(registered_in),
                );
                self.container_mut(registered_in).children.push(id);
                id
            }
        };

        match base {
            None => {
                let generate = self.utilities[utility.index()].factory.clone();
                self.apply_declarations(instance, generate(value));
            }
            Some(base) => {
                let block = self.apply_modifiers(base, instance, &name, key, modifiers);
                self.apply_declarations(instance, block);
            }
        }

        let entries = &mut self.utilities[utility.index()].values;
        match existing {
            Some(index) => entries[index].value = value.clone(),
            None => entries.push(UtilityValue {
                key: key.clone(),
                value: value.clone(),
                modifiers: modifiers.to_vec(),
                instance,
            }),
        }
        tracing::debug!(utility = %name, key = %key, modifiers = ?modifiers, "materialized utility value");

        if base.is_none() && existing.is_some() {
            let stale: Vec<Vec<CompactString>> = self.utilities[utility.index()]
                .values
                .iter()
                .filter(|entry| entry.key == *key && !entry.modifiers.is_empty() && entry.value != *value)
                .map(|entry| entry.modifiers.clone())
                .collect();
            for modifiers in stale {
                self.materialize_value(utility, key, value, &modifiers);
            }
        }
        instance
    }

    /// Build the declarations of a modified instance from its base.
    ///
    /// The base is folded back into nested form and its variables are copied
    /// onto `target`; the base itself is not touched. Each alias's transform
    /// runs in order on the output of the previous one.
    fn apply_modifiers(
        &mut self,
        base: ContainerId,
        target: ContainerId,
        utility: &str,
        key: &str,
        aliases: &[CompactString],
    ) -> DeclarationBlock {
        let variables: Vec<Variable> = self
            .container(base)
            .variables
            .iter()
            .map(|id| self.get_variable(*id).clone())
            .collect();
        for variable in variables {
            let id = self.alloc_variable(variable);
            self.container_mut(target).variables.push(id);
        }

        let mut block = self.fold(base);
        for alias in aliases {
            let Some(modifier) = self.find_modifier(alias) else {
                tracing::warn!(modifier = %alias, utility, "unknown modifier, skipping");
                continue;
            };
            let transform = self.get_modifier(modifier).transform.clone();
            block = transform(ModifierContext {
                declarations: block,
                alias,
                utility,
                key,
            });
        }
        block
    }
}

/// Set equality; order and repeats are ignored.
fn same_set<A: AsRef<str>, B: AsRef<str>>(left: &[A], right: &[B]) -> bool {
    contains_all(left, right) && contains_all(right, left)
}

fn contains_all<A: AsRef<str>, B: AsRef<str>>(set: &[A], items: &[B]) -> bool {
    items
        .iter()
        .all(|item| set.iter().any(|s| s.as_ref() == item.as_ref()))
}
