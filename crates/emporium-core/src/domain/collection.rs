//! Collection wrapper shared by every list-returning operation.

use serde::{Deserialize, Serialize};

/// Ordered entities for a parent key, or for the whole table.
///
/// Serialized as `{ "data": [...] }`, which is also the cached form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Collection<T> {
    pub data: Vec<T>,
}

impl<T> Collection<T> {
    /// Wraps a list of entities.
    #[must_use]
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<T> {
        self.data
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let collection = Collection::new(vec![1, 2, 3]);
        assert_eq!(serde_json::to_string(&collection).unwrap(), r#"{"data":[1,2,3]}"#);
    }

    #[test]
    fn test_empty_collection() {
        let collection: Collection<u8> = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert!(collection.is_empty());
        assert_eq!(collection.len(), 0);
    }
}
