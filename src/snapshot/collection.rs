//! Name-keyed, order-preserving collections.
//!
//! Snapshot documents are authored independently of each other and only
//! agree on names, so every collection is addressed by name. Names are unique
//! within a collection; a document repeating a name fails to parse.

use std::collections::HashSet;
use std::slice;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Anything stored in a [`NamedCollection`].
pub trait Named {
    /// The join key of the item within its collection.
    fn name(&self) -> &str;
}

/// A name was used twice in the same collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Duplicate name '{0}' in collection")]
pub struct DuplicateNameError(pub String);

/// Ordered collection of uniquely named items.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedCollection<T> {
    items: Vec<T>,
}

impl<T> Default for NamedCollection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Named> NamedCollection<T> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from items, rejecting duplicate names.
    ///
    /// # Errors
    /// Returns [`DuplicateNameError`] naming the first repeated name.
    pub fn from_vec(items: Vec<T>) -> Result<Self, DuplicateNameError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.name()) {
                return Err(DuplicateNameError(item.name().to_string()));
            }
        }
        Ok(Self { items })
    }

    /// Appends an item at the end of the collection.
    ///
    /// # Errors
    /// Returns [`DuplicateNameError`] if an item with the same name exists.
    pub fn push(&mut self, item: T) -> Result<(), DuplicateNameError> {
        if self.contains(item.name()) {
            return Err(DuplicateNameError(item.name().to_string()));
        }
        self.items.push(item);
        Ok(())
    }

    /// Returns the item with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.items.iter().find(|item| item.name() == name)
    }

    /// Returns true if an item with the given name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Replaces the item carrying the same name as `item`, in place.
    ///
    /// Returns the replaced item, or gives `item` back untouched when no
    /// entry of that name exists.
    ///
    /// # Errors
    /// Returns `item` when there is nothing to replace.
    pub fn replace(&mut self, item: T) -> Result<T, T> {
        match self.items.iter().position(|existing| existing.name() == item.name()) {
            Some(index) => Ok(std::mem::replace(&mut self.items[index], item)),
            None => Err(item),
        }
    }

    /// Iterates over the names, in collection order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.name())
    }
}

impl<T> NamedCollection<T> {
    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the collection holds no item.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the items, in collection order.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Returns the items as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T> IntoIterator for &'a NamedCollection<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for NamedCollection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T: Serialize> Serialize for NamedCollection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, T: Named + Deserialize<'de>> Deserialize<'de> for NamedCollection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<T>::deserialize(deserializer)?;
        Self::from_vec(items).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        name: String,
        value: u32,
    }

    impl Named for Item {
        fn name(&self) -> &str {
            &self.name
        }
    }

    fn item(name: &str, value: u32) -> Item {
        Item {
            name: name.to_string(),
            value,
        }
    }

    #[test]
    fn test_from_vec_rejects_duplicates() {
        let err = NamedCollection::from_vec(vec![item("a", 1), item("b", 2), item("a", 3)])
            .unwrap_err();
        assert_eq!(err, DuplicateNameError("a".to_string()));
    }

    #[test]
    fn test_push_rejects_duplicates() {
        let mut collection = NamedCollection::new();
        collection.push(item("a", 1)).unwrap();
        assert!(collection.push(item("a", 2)).is_err());
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut collection =
            NamedCollection::from_vec(vec![item("a", 1), item("b", 2), item("c", 3)]).unwrap();

        let old = collection.replace(item("b", 20)).unwrap();
        assert_eq!(old.value, 2);
        assert_eq!(collection.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(collection.get("b").unwrap().value, 20);
    }

    #[test]
    fn test_replace_missing_gives_item_back() {
        let mut collection = NamedCollection::from_vec(vec![item("a", 1)]).unwrap();
        let rejected = collection.replace(item("z", 9)).unwrap_err();
        assert_eq!(rejected.name, "z");
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let json = r#"[{"name":"x","value":1},{"name":"x","value":2}]"#;
        let err = serde_json::from_str::<NamedCollection<Item>>(json).unwrap_err();
        assert!(err.to_string().contains("Duplicate name 'x'"));
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let collection = NamedCollection::from_vec(vec![item("a", 1)]).unwrap();
        let json = serde_json::to_string(&collection).unwrap();
        assert_eq!(json, r#"[{"name":"a","value":1}]"#);
    }
}
