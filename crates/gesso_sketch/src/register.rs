//! Registering scanned classes back into the token graph.

use gesso_canvas::{Root, TokenValue, UtilityCreator, UtilityFactory};
use serde::Serialize;

use crate::matcher::UtilityMatch;

/// What a registration pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReport {
    /// Values newly recorded on their utility.
    pub registered: usize,
    /// Classes whose value was already present.
    pub existing: usize,
    /// Classes naming an unknown utility or modifier.
    pub skipped: usize,
}

impl RegistrationReport {
    #[inline]
    pub fn changed(&self) -> bool {
        self.registered > 0
    }
}

/// Token value a scanned key stands for.
///
/// Arbitrary values are taken literally. Otherwise the utility's resolver
/// decides, then a value already recorded under the key, then the key text.
fn value_for(factory: &UtilityFactory, matched: &UtilityMatch) -> TokenValue {
    let parsed = &matched.parsed;
    if let Some(arbitrary) = &parsed.arbitrary_value {
        return TokenValue::from(arbitrary.clone());
    }
    factory
        .resolve(&parsed.value)
        .or_else(|| factory.value_for(&parsed.value).cloned())
        .unwrap_or_else(|| TokenValue::from(parsed.value.clone()))
}

/// Record every matched class that the graph does not hold yet.
///
/// Classes naming an unregistered utility or modifier alias are skipped with
/// a warning. Repeated classes are recorded once.
pub fn register_matches(root: &mut Root, matches: &[UtilityMatch]) -> RegistrationReport {
    let mut report = RegistrationReport::default();

    for matched in matches {
        let parsed = &matched.parsed;
        if matched.exists {
            report.existing += 1;
            continue;
        }

        let Some(utility) = matched.factory else {
            tracing::warn!(class = %parsed.raw, utility = %parsed.name, "no utility registered under this name");
            report.skipped += 1;
            continue;
        };

        let unresolved: Vec<&str> = matched.unresolved_aliases().map(|alias| alias.as_str()).collect();
        if !unresolved.is_empty() {
            tracing::warn!(class = %parsed.raw, aliases = ?unresolved, "no modifier registered for alias");
            report.skipped += 1;
            continue;
        }

        let factory = root.get_utility(utility);
        if factory.has_value(&parsed.value, &matched.resolved_aliases) {
            report.existing += 1;
            continue;
        }

        let value = value_for(factory, matched);
        tracing::debug!(class = %parsed.raw, "registering utility value");
        UtilityCreator::new(utility).create(
            root,
            [(parsed.value.clone(), value)],
            &matched.modifier_factories,
        );
        report.registered += 1;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_name::parse_utility_class;
    use crate::matcher::match_utilities;
    use gesso_canvas::{declarations, UtilityOptions};

    fn graph() -> Root {
        let mut root = Root::new();
        root.modifier(["hover"], |ctx| ctx.wrap("&:hover"));
        let spacing = ["sm", "md", "lg"];
        root.utility_with(
            "padding",
            UtilityOptions::default().resolver(move |key| {
                spacing
                    .iter()
                    .position(|s| *s == key)
                    .map(|i| TokenValue::from(format!("{}px", (i + 1) * 4)))
            }),
            |v| declarations! { "padding" => v.clone() },
        );
        let margin = root.utility("margin", |v| declarations! { "margin" => v.clone() });
        margin.create(&mut root, [("md", "8px")], &[]);
        root
    }

    fn register(root: &mut Root, classes: &[&str]) -> RegistrationReport {
        let parsed: Vec<_> = classes
            .iter()
            .map(|c| parse_utility_class(c).unwrap())
            .collect();
        let matches = match_utilities(&parsed, root);
        register_matches(root, &matches)
    }

    fn values(root: &Root, name: &str) -> Vec<(String, Option<String>, Vec<String>)> {
        let id = root.find_utility(name).unwrap();
        root.get_utility(id)
            .values
            .iter()
            .map(|v| {
                (
                    v.key.to_string(),
                    v.value.as_str().map(str::to_string),
                    v.modifiers.iter().map(|m| m.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_registers_missing_values() {
        let mut root = graph();
        let report = register(&mut root, &["_margin:md", "_margin:sm", "_hover:padding:lg"]);

        assert_eq!(
            report,
            RegistrationReport {
                registered: 2,
                existing: 1,
                skipped: 0
            }
        );
        assert!(values(&root, "margin").contains(&("sm".into(), Some("sm".into()), vec![])));
        let padding = values(&root, "padding");
        assert!(padding.contains(&("lg".into(), Some("12px".into()), vec![])));
        assert!(padding.contains(&("lg".into(), Some("12px".into()), vec!["hover".into()])));
    }

    #[test]
    fn test_arbitrary_value_is_literal() {
        let mut root = graph();
        register(&mut root, &["_padding:[calc(100%-2px)]"]);
        let padding = values(&root, "padding");
        assert_eq!(padding.len(), 1);
        assert_eq!(padding[0].0, "[calc(100%-2px)]");
        assert_eq!(padding[0].1.as_deref(), Some("calc(100%-2px)"));
    }

    #[test]
    fn test_unknown_names_are_skipped() {
        let mut root = graph();
        let report = register(&mut root, &["_gap:md", "_focus:margin:lg"]);
        assert_eq!(report.skipped, 2);
        assert!(!report.changed());
        assert_eq!(values(&root, "margin").len(), 1);
    }

    #[test]
    fn test_second_pass_is_idempotent() {
        let mut root = graph();
        let first = register(&mut root, &["_margin:lg", "_margin:lg"]);
        assert_eq!(first.registered, 1);
        assert_eq!(first.existing, 1);

        let instances = |root: &Root| root.container(gesso_canvas::ContainerId::ROOT).children.len();
        let before = instances(&root);
        let second = register(&mut root, &["_margin:lg"]);
        assert_eq!(second.existing, 1);
        assert_eq!(instances(&root), before);
    }

    #[test]
    fn test_repeated_modifier_registers_once() {
        let mut root = graph();
        let first = register(&mut root, &["_hover:hover:padding:md"]);
        assert_eq!(first.registered, 1);
        assert_eq!(
            values(&root, "padding"),
            vec![
                ("md".into(), Some("8px".into()), vec![]),
                ("md".into(), Some("8px".into()), vec!["hover".into()]),
            ]
        );

        let second = register(&mut root, &["_hover:hover:padding:md", "_hover:padding:md"]);
        assert_eq!(second.existing, 2);
        assert_eq!(second.registered, 0);
    }
}
