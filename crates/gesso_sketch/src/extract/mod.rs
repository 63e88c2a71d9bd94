//! Utility class extraction.
//!
//! Each dialect embeds classes differently, so extraction runs the set of
//! extractors that fits the file:
//!
//! | Dialect | Extractors |
//! |---------|------------|
//! | html    | markup, directives, strings |
//! | vue     | markup, bound attributes, strings |
//! | svelte  | markup, braced expressions, directives, strings |
//! | jsx     | markup, braced expressions, strings |
//! | astro   | markup, braced expressions, strings |
//! | script  | strings |
//! | unknown | all |
//!
//! Results are deduplicated and keep first-seen order.

mod dialect;
mod directive;
mod markup;
mod strings;
mod template;
mod tokens;

pub use dialect::Dialect;
pub use directive::{extract_angular_bindings, extract_svelte_directives};
pub use markup::extract_markup;
pub use strings::extract_string_literals;
pub use template::{extract_bound_attributes, extract_braced_expressions, matching_brace};
pub use tokens::{attribute_candidates, candidates, collect_attribute_utilities, collect_utilities, looks_like_utility};

use gesso_primer::{CompactString, FxIndexSet};

/// Extract the utility classes used in `content`.
pub fn extract_classes(content: &str, dialect: Dialect) -> FxIndexSet<CompactString> {
    let mut out = FxIndexSet::default();

    if dialect.has_markup() {
        extract_markup(content, &mut out);
    }
    match dialect {
        Dialect::Html => {
            extract_angular_bindings(content, &mut out);
        }
        Dialect::Vue => {
            extract_bound_attributes(content, &mut out);
        }
        Dialect::Svelte => {
            extract_braced_expressions(content, &mut out);
            extract_svelte_directives(content, &mut out);
        }
        Dialect::Jsx | Dialect::Astro => {
            extract_braced_expressions(content, &mut out);
        }
        Dialect::Script => {}
        Dialect::Unknown => {
            extract_bound_attributes(content, &mut out);
            extract_braced_expressions(content, &mut out);
            extract_svelte_directives(content, &mut out);
            extract_angular_bindings(content, &mut out);
        }
    }
    extract_string_literals(content, &mut out);

    out
}
