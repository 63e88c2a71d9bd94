//! Variable store.
//!
//! Variables are looked up by name in the container they are declared on.
//! Redeclaring a name updates the existing slot in place, so every
//! [`VariableId`] handed out earlier keeps observing the current value.

use gesso_primer::CompactString;

use crate::container::{Variable, VariableId};
use crate::root::Scope;
use crate::value::{Reference, TokenValue};

/// Name of the variable to declare.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableTarget {
    Name(CompactString),
    /// Redeclare by handle: the handle's name is used.
    Variable(VariableId),
}

impl From<&str> for VariableTarget {
    fn from(value: &str) -> Self {
        Self::Name(CompactString::from(value))
    }
}

impl From<String> for VariableTarget {
    fn from(value: String) -> Self {
        Self::Name(CompactString::from(value))
    }
}

impl From<CompactString> for VariableTarget {
    fn from(value: CompactString) -> Self {
        Self::Name(value)
    }
}

impl From<VariableId> for VariableTarget {
    fn from(value: VariableId) -> Self {
        Self::Variable(value)
    }
}

/// Options for [`Scope::variable_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariableOptions {
    /// Keep an existing value instead of overwriting it.
    pub default: bool,
}

impl<'a> Scope<'a> {
    /// Declare a variable, overwriting the value of an existing one.
    #[inline]
    pub fn variable(
        &mut self,
        target: impl Into<VariableTarget>,
        value: impl Into<TokenValue>,
    ) -> VariableId {
        self.variable_with(target, value, VariableOptions::default())
    }

    /// Declare a variable unless one with the same name already exists.
    #[inline]
    pub fn variable_default(
        &mut self,
        target: impl Into<VariableTarget>,
        value: impl Into<TokenValue>,
    ) -> VariableId {
        self.variable_with(target, value, VariableOptions { default: true })
    }

    pub fn variable_with(
        &mut self,
        target: impl Into<VariableTarget>,
        value: impl Into<TokenValue>,
        options: VariableOptions,
    ) -> VariableId {
        let name = match target.into() {
            VariableTarget::Name(name) => name,
            VariableTarget::Variable(id) => self.root.get_variable(id).name.clone(),
        };

        if let Some(existing) = self.root.own_variable(self.container, &name) {
            if !options.default {
                self.root.variable_mut(existing).value = value.into();
            }
            return existing;
        }

        let id = self.root.alloc_variable(Variable {
            name,
            value: value.into(),
        });
        self.root.container_mut(self.container).variables.push(id);
        id
    }

    /// Reference to a variable declared through this graph.
    pub fn reference(&self, id: VariableId) -> TokenValue {
        TokenValue::Reference(Reference::new(self.root.get_variable(id).name.clone()))
    }
}
