//! Modifier combination generator.
//!
//! Every modifier factory contributes one group of interchangeable aliases.
//! A combination picks at most one alias per group and at least one alias
//! overall, so `sm` and `md` from the same breakpoint group never appear
//! together while `hover` and `focus` from separate groups do.

use gesso_primer::{CompactString, FxHashSet};

/// Enumerate all modifier combinations for the given alias groups.
///
/// Each combination is sorted; the result is ordered by combination length,
/// then by the comma-joined aliases.
pub fn combine_keys<S: AsRef<str>>(groups: &[Vec<S>]) -> Vec<Vec<CompactString>> {
    let mut combinations: Vec<Vec<CompactString>> = vec![Vec::new()];

    for group in groups {
        let mut next = Vec::with_capacity(combinations.len() * (group.len() + 1));
        for combination in &combinations {
            next.push(combination.clone());
            for alias in group {
                let alias = alias.as_ref();
                if combination.iter().any(|existing| existing == alias) {
                    continue;
                }
                let mut extended = combination.clone();
                extended.push(CompactString::from(alias));
                next.push(extended);
            }
        }
        combinations = next;
    }

    let mut seen = FxHashSet::default();
    let mut result: Vec<Vec<CompactString>> = combinations
        .into_iter()
        .filter(|combination| !combination.is_empty())
        .map(|mut combination| {
            combination.sort();
            combination
        })
        .filter(|combination| seen.insert(combination.join(",")))
        .collect();

    result.sort_by(|a, b| {
        a.len()
            .cmp(&b.len())
            .then_with(|| a.join(",").cmp(&b.join(",")))
    });
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(combinations: &[Vec<CompactString>]) -> Vec<String> {
        combinations.iter().map(|c| c.join(",")).collect()
    }

    #[test]
    fn test_independent_groups_combine() {
        let result = combine_keys(&[vec!["hover"], vec!["focus"]]);
        assert_eq!(render(&result), vec!["focus", "hover", "focus,hover"]);
    }

    #[test]
    fn test_aliases_within_a_group_are_exclusive() {
        let result = combine_keys(&[vec!["sm", "small"], vec!["hover"]]);
        assert_eq!(
            render(&result),
            vec!["hover", "small", "sm", "hover,small", "hover,sm"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(combine_keys::<&str>(&[]).is_empty());
        assert!(combine_keys::<&str>(&[vec![]]).is_empty());
    }

    #[test]
    fn test_three_groups() {
        let result = combine_keys(&[vec!["dark"], vec!["hover"], vec!["md"]]);
        assert_eq!(
            render(&result),
            vec![
                "dark",
                "hover",
                "md",
                "dark,hover",
                "dark,md",
                "hover,md",
                "dark,hover,md"
            ]
        );
    }

    #[test]
    fn test_shared_alias_is_not_repeated() {
        let result = combine_keys(&[vec!["hover"], vec!["hover"]]);
        assert_eq!(render(&result), vec!["hover"]);
    }
}
