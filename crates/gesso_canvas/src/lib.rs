//! Canvas - The token graph of Gesso.
//!
//! The canvas is where design tokens are laid down before anything is
//! rendered. It holds variables, selectors, at-rules and themes, plus the
//! parametrised pieces the content scanner materialises on demand:
//! utilities, modifiers and recipes.
//!
//! # Modules
//!
//! - **value**: Token values, references and CSS sequences
//! - **declarations**: Declaration blocks and their classification
//! - **root**: The graph root and authoring scopes
//! - **variable**: Variable declaration
//! - **parse**: Hoisting nested selectors and at-rules out of blocks
//! - **utility** / **modifier** / **combine**: Utility materialisation
//! - **recipe**: Multi-variant component styles
//! - **merge**: Combining independently authored graphs
//!
//! # Example
//!
//! ```
//! use gesso_canvas::{declarations, reference, Root};
//!
//! let mut root = Root::new();
//! root.variable("spacing.sm", "0.25rem");
//! let hover = root.modifier(["hover"], |ctx| ctx.wrap("&:hover"));
//! let margin = root.utility("margin", |value| declarations! { "margin" => value.clone() });
//! margin.create(&mut root, [("sm", reference("spacing.sm"))], &[hover]);
//!
//! let factory = root.get_utility(margin.id());
//! assert!(factory.has_value("sm", &["hover"]));
//! assert_eq!(root.children().len(), 2);
//! ```

pub mod combine;
pub mod container;
pub mod declarations;
pub mod merge;
pub mod modifier;
pub mod parse;
pub mod recipe;
pub mod root;
pub mod utility;
pub mod value;
pub mod variable;

pub use combine::combine_keys;
pub use container::{
    Container, ContainerId, ContainerKind, ModifierId, RecipeId, UtilityId, Variable, VariableId,
};
pub use declarations::{classify, DeclarationBlock, DeclarationKind, DeclarationValue};
pub use merge::merge;
pub use modifier::{ModifierContext, ModifierFactory, ModifierFn};
pub use parse::parse_declarations_block;
pub use recipe::{CompoundVariant, Recipe, RecipeClasses, RecipeDefinition};
pub use root::{Root, Scope};
pub use utility::{UtilityCreator, UtilityFactory, UtilityFn, UtilityOptions, UtilityValue, ValueResolver};
pub use value::{css, custom_property_name, reference, reference_or, Css, Reference, TokenValue};
pub use variable::{VariableOptions, VariableTarget};
