//! Cross-graph merge.
//!
//! Merging folds an independently authored graph into another one:
//!
//! - root and same-name themes are merged: variables by name (later wins),
//!   declarations shallow (later wins per key), children appended
//! - every other container is copied over with fresh ids
//! - a utility already known by name takes the later generator and
//!   resolver; its values merge by `(key, modifiers)` identity
//! - modifiers and recipes are appended

use crate::container::{Container, ContainerId, ContainerKind, Variable};
use crate::root::Root;
use crate::utility::UtilityValue;

/// Merge graphs left to right into a fresh root.
pub fn merge<I>(graphs: I) -> Root
where
    I: IntoIterator<Item = Root>,
{
    graphs.into_iter().fold(Root::new(), |mut acc, graph| {
        acc.merge(graph);
        acc
    })
}

impl Root {
    /// Merge another graph into this one.
    pub fn merge(&mut self, other: Root) {
        let Root {
            containers,
            variables,
            utilities,
            modifiers,
            recipes,
            themes: _,
        } = other;

        // Parents always precede their children in the arena, so a single
        // forward pass can map every parent before it is needed.
        let mut map: Vec<ContainerId> = Vec::with_capacity(containers.len());
        let mut merged_into: Vec<bool> = Vec::with_capacity(containers.len());
        for (index, container) in containers.iter().enumerate() {
            let (target, merged) = match &container.kind {
                _ if index == ContainerId::ROOT.index() => (ContainerId::ROOT, true),
                ContainerKind::Theme { name } => match self.find_theme(name) {
                    Some(existing) => (existing, true),
                    None => {
                        let id = self.alloc_container(container.kind.clone(), Some(ContainerId::ROOT));
                        self.themes.push(id);
                        (id, false)
                    }
                },
                kind => {
                    let parent = container.parent.map(|p| map[p.index()]);
                    (self.alloc_container(kind.clone(), parent), false)
                }
            };
            map.push(target);
            merged_into.push(merged);
        }

        for (index, container) in containers.into_iter().enumerate() {
            let Container {
                variables: own_variables,
                declarations,
                children,
                ..
            } = container;
            let target = map[index];

            for variable_id in own_variables {
                let Variable { name, value } = variables[variable_id.index()].clone();
                let existing = if merged_into[index] {
                    self.own_variable(target, &name)
                } else {
                    None
                };
                match existing {
                    Some(id) => self.variable_mut(id).value = value,
                    None => {
                        let id = self.alloc_variable(Variable { name, value });
                        self.container_mut(target).variables.push(id);
                    }
                }
            }

            let target_container = self.container_mut(target);
            target_container.declarations.merge(declarations);
            target_container
                .children
                .extend(children.into_iter().map(|child| map[child.index()]));
        }

        for mut utility in utilities {
            utility.container = map[utility.container.index()];
            for entry in &mut utility.values {
                entry.instance = map[entry.instance.index()];
            }

            let Some(id) = self.find_utility(&utility.name) else {
                self.utilities.push(utility);
                continue;
            };
            let existing = &mut self.utilities[id.index()];
            existing.factory = utility.factory;
            if utility.resolver.is_some() {
                existing.resolver = utility.resolver;
            }
            let replaced = merge_values(&mut existing.values, utility.values);
            tracing::debug!(utility = %existing.name, id = id.as_u32(), replaced = replaced.len(), "merged utility");
            for instance in replaced {
                self.detach(instance);
            }
        }

        self.modifiers.extend(modifiers);
        self.recipes.extend(recipes);
    }
}

/// Merge entries by identity, later wins. Returns the instances of the
/// replaced entries.
fn merge_values(target: &mut Vec<UtilityValue>, incoming: Vec<UtilityValue>) -> Vec<ContainerId> {
    let mut replaced = Vec::new();
    for entry in incoming {
        match target
            .iter_mut()
            .find(|existing| existing.key == entry.key && existing.has_modifiers(&entry.modifiers))
        {
            Some(existing) => {
                if existing.instance != entry.instance {
                    replaced.push(existing.instance);
                }
                *existing = entry;
            }
            None => target.push(entry),
        }
    }
    replaced
}
