//! Name-keyed ordered collections
//!
//! Provides [`NamedList`], the lookup primitive behind every configuration
//! list. Order is append order and is visible in reports; identity is the
//! exact name string.

use serde::{Deserialize, Serialize};

/// Entity identified by a name string
pub trait Named {
    /// Identity name
    fn name(&self) -> &str;

    /// Replace the identity name
    fn set_name(&mut self, name: String);
}

/// Ordered collection with unique names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamedList<T> {
    items: Vec<T>,
}

impl<T> Default for NamedList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Named> NamedList<T> {
    /// Create empty list
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if list is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate entries in order
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Iterate entries mutably in order
    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Entry names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(Named::name)
    }

    /// Find entry by exact name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&T> {
        self.items.iter().find(|i| i.name() == name)
    }

    /// Find entry mutably by exact name
    pub fn find_mut(&mut self, name: &str) -> Option<&mut T> {
        self.items.iter_mut().find(|i| i.name() == name)
    }

    /// Check if name is present
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Index of the named entry
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|i| i.name() == name)
    }

    /// Append an entry
    ///
    /// # Errors
    /// Fails if the name is empty or already present.
    pub fn add(&mut self, item: T) -> Result<&mut T, ListError> {
        if item.name().is_empty() {
            return Err(ListError::EmptyName);
        }
        if self.contains(item.name()) {
            return Err(ListError::Duplicate(item.name().to_string()));
        }
        let index = self.items.len();
        self.items.push(item);
        Ok(&mut self.items[index])
    }

    /// Append a default entry with the given name
    ///
    /// # Errors
    /// Fails if the name is empty or already present.
    pub fn add_new(&mut self, name: &str) -> Result<&mut T, ListError>
    where
        T: Default,
    {
        let mut item = T::default();
        item.set_name(name.to_string());
        self.add(item)
    }

    /// Remove the named entry, keeping the order of the rest
    pub fn delete(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Rename in place
    ///
    /// # Errors
    /// Fails if `old` is missing, or `new` is empty or already taken.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), ListError> {
        if new.is_empty() {
            return Err(ListError::EmptyName);
        }
        if old != new && self.contains(new) {
            return Err(ListError::Duplicate(new.to_string()));
        }
        let item = self
            .find_mut(old)
            .ok_or_else(|| ListError::NotFound(old.to_string()))?;
        item.set_name(new.to_string());
        Ok(())
    }

    /// Keep only entries matching the predicate
    pub fn retain(&mut self, f: impl FnMut(&T) -> bool) {
        self.items.retain(f);
    }

    /// Reorder to follow `reference`; entries it lacks keep their relative
    /// order after the matched ones
    pub fn reorder_by(&mut self, reference: &Self) {
        let mut remaining = std::mem::take(&mut self.items);
        let mut ordered = Vec::with_capacity(remaining.len());
        for name in reference.names() {
            if let Some(index) = remaining.iter().position(|i| i.name() == name) {
                ordered.push(remaining.remove(index));
            }
        }
        ordered.append(&mut remaining);
        self.items = ordered;
    }

    /// Check whether both lists hold the same names in the same order
    #[must_use]
    pub fn same_order(&self, other: &Self) -> bool {
        self.names().eq(other.names())
    }
}

impl<'a, T> IntoIterator for &'a NamedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut NamedList<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter_mut()
    }
}

/// Lookup primitive errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    /// Empty names are never valid
    #[error("name is empty")]
    EmptyName,

    /// Name already in the list
    #[error("'{0}' already exists")]
    Duplicate(String),

    /// Name not in the list
    #[error("'{0}' not found")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Item {
        name: String,
        value: u32,
    }

    impl Named for Item {
        fn name(&self) -> &str {
            &self.name
        }

        fn set_name(&mut self, name: String) {
            self.name = name;
        }
    }

    fn list(names: &[&str]) -> NamedList<Item> {
        let mut l = NamedList::new();
        for n in names {
            l.add_new(n).unwrap();
        }
        l
    }

    #[test]
    fn add_rejects_empty_and_duplicates() {
        let mut l = list(&["Open"]);
        assert_eq!(l.add_new("").unwrap_err(), ListError::EmptyName);
        assert_eq!(
            l.add_new("Open").unwrap_err(),
            ListError::Duplicate("Open".into())
        );
        assert_eq!(l.len(), 1);
    }

    #[test]
    fn find_is_exact() {
        let l = list(&["Open", "Novice"]);
        assert!(l.find("Open").is_some());
        assert!(l.find("open").is_none());
        assert_eq!(l.position("Novice"), Some(1));
    }

    #[test]
    fn delete_keeps_order() {
        let mut l = list(&["a", "b", "c"]);
        assert!(l.delete("b"));
        assert!(!l.delete("b"));
        assert_eq!(l.names().collect::<Vec<_>>(), ["a", "c"]);
    }

    #[test]
    fn rename_refuses_collision() {
        let mut l = list(&["a", "b"]);
        assert_eq!(l.rename("a", "b"), Err(ListError::Duplicate("b".into())));
        assert_eq!(l.rename("x", "y"), Err(ListError::NotFound("x".into())));
        l.rename("a", "z").unwrap();
        assert_eq!(l.names().collect::<Vec<_>>(), ["z", "b"]);
    }

    #[test]
    fn add_returns_inserted_entry() {
        let mut l = list(&[]);
        l.add_new("a").unwrap().value = 7;
        assert_eq!(l.find("a").unwrap().value, 7);
    }

    #[test]
    fn reorder_follows_reference_and_keeps_extras() {
        let mut l = list(&["local", "b", "a"]);
        let reference = list(&["a", "b", "new"]);
        l.reorder_by(&reference);
        assert_eq!(l.names().collect::<Vec<_>>(), ["a", "b", "local"]);
        assert!(!l.same_order(&reference));
    }
}
