//! Fault types

use crate::error::LoadError;
use crate::load::required_name;
use crate::names::Named;
use crate::schema::{attr, element};
use arb_tree::Element;
use serde::{Deserialize, Serialize};

/// Named course fault (e.g. "Refusal")
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    name: String,
}

impl Fault {
    /// Create fault
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Load from a `FaultType` element
    ///
    /// # Errors
    /// Wrong element or missing/reserved name.
    pub fn load(tree: &Element) -> Result<Self, LoadError> {
        tree.expect_name(element::FAULT_TYPE)?;
        Ok(Self::new(required_name(tree, attr::NAME, "fault")?))
    }

    /// Append as a `FaultType` child
    pub fn save(&self, parent: &mut Element) {
        parent
            .add_child(element::FAULT_TYPE)
            .add_attr(attr::NAME, &self.name);
    }
}

impl Named for Fault {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_and_save() {
        let mut parent = Element::new("Configuration");
        Fault::new("Refusal").save(&mut parent);
        let tree = parent.first_named(element::FAULT_TYPE).unwrap();
        assert_eq!(Fault::load(tree).unwrap(), Fault::new("Refusal"));
    }

    #[test]
    fn wildcard_name_rejected() {
        let mut tree = Element::new(element::FAULT_TYPE);
        tree.add_attr(attr::NAME, "*");
        assert!(Fault::load(&tree).is_err());
    }
}
