//! Matching parsed classes against the token graph.

use gesso_canvas::{ModifierId, Root, UtilityId};
use gesso_primer::{CompactString, FxHashMap};

use crate::class_name::ParsedUtilityClass;

/// A parsed class together with what the graph knows about it.
#[derive(Debug, Clone, PartialEq)]
pub struct UtilityMatch {
    pub parsed: ParsedUtilityClass,
    /// Utility registered under the class name.
    pub factory: Option<UtilityId>,
    /// Modifiers of the resolvable aliases, in the order written. A repeated
    /// alias counts once.
    pub modifier_factories: Vec<ModifierId>,
    /// The aliases that resolved, in the order written.
    pub resolved_aliases: Vec<CompactString>,
    /// The utility already has this value with exactly these modifiers.
    pub exists: bool,
}

impl UtilityMatch {
    /// Aliases that no modifier is registered under.
    pub fn unresolved_aliases(&self) -> impl Iterator<Item = &CompactString> {
        self.parsed
            .modifiers
            .iter()
            .filter(|alias| !self.resolved_aliases.contains(alias))
    }
}

/// Name and alias lookup tables over a graph.
struct Index<'r> {
    utilities: FxHashMap<&'r str, UtilityId>,
    aliases: FxHashMap<&'r str, ModifierId>,
}

impl<'r> Index<'r> {
    fn new(root: &'r Root) -> Self {
        let utilities = root
            .utilities()
            .iter()
            .enumerate()
            .map(|(i, utility)| (utility.name.as_str(), UtilityId::new(i as u32)))
            .collect();

        let mut aliases = FxHashMap::default();
        for (i, modifier) in root.modifiers().iter().enumerate() {
            for alias in &modifier.key {
                aliases
                    .entry(alias.as_str())
                    .or_insert_with(|| ModifierId::new(i as u32));
            }
        }

        Self { utilities, aliases }
    }
}

/// Match parsed classes against the graph, one match per class in input
/// order. Unknown modifier aliases are dropped, repeated ones collapse.
pub fn match_utilities(parsed: &[ParsedUtilityClass], root: &Root) -> Vec<UtilityMatch> {
    let index = Index::new(root);

    parsed
        .iter()
        .map(|class| {
            let factory = index.utilities.get(class.name.as_str()).copied();

            let mut modifier_factories = Vec::with_capacity(class.modifiers.len());
            let mut resolved_aliases = Vec::with_capacity(class.modifiers.len());
            for alias in &class.modifiers {
                if resolved_aliases.contains(alias) {
                    continue;
                }
                if let Some(modifier) = index.aliases.get(alias.as_str()) {
                    modifier_factories.push(*modifier);
                    resolved_aliases.push(alias.clone());
                }
            }

            let exists = factory.is_some_and(|id| {
                root.get_utility(id)
                    .has_value(&class.value, &resolved_aliases)
            });

            UtilityMatch {
                parsed: class.clone(),
                factory,
                modifier_factories,
                resolved_aliases,
                exists,
            }
        })
        .collect()
}
