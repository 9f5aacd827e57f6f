//! State shared between the examples of one evaluation scope
//!
//! A namespace maps names to values of any type. Evaluators read what earlier
//! examples left behind and add their own entries, so a value defined by one block
//! is visible to the next. The driver decides the scope (per document, per run) and
//! passes the same namespace to every example within it.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

#[derive(Default)]
pub struct Namespace {
    values: HashMap<String, Box<dyn Any>>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, returning whatever was bound before.
    pub fn insert<T: Any>(&mut self, name: impl Into<String>, value: T) -> Option<Box<dyn Any>> {
        self.values.insert(name.into(), Box::new(value))
    }

    /// Typed lookup. Returns `None` when the name is unbound or holds another type.
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.values.get(name)?.downcast_ref()
    }

    pub fn get_mut<T: Any>(&mut self, name: &str) -> Option<&mut T> {
        self.values.get_mut(name)?.downcast_mut()
    }

    /// Get a value, binding it with `default` first if the name is unbound.
    ///
    /// Returns `None` when the name is bound to a value of another type.
    pub fn get_or_insert_with<T: Any>(
        &mut self,
        name: &str,
        default: impl FnOnce() -> T,
    ) -> Option<&mut T> {
        self.values
            .entry(name.to_string())
            .or_insert_with(|| Box::new(default()) as Box<dyn Any>)
            .downcast_mut()
    }

    pub fn remove(&mut self, name: &str) -> Option<Box<dyn Any>> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Bound names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Entries whose value is a `String`, sorted by name
    pub fn strings(&self) -> Vec<(&str, &str)> {
        let mut strings: Vec<_> = self
            .values
            .iter()
            .filter_map(|(name, value)| {
                value
                    .downcast_ref::<String>()
                    .map(|value| (name.as_str(), value.as_str()))
            })
            .collect();
        strings.sort_unstable();
        strings
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_roundtrip() {
        let mut namespace = Namespace::new();
        namespace.insert("answer", 42_i32);

        assert_eq!(namespace.get::<i32>("answer"), Some(&42));
        assert_eq!(namespace.get::<String>("answer"), None);
        assert_eq!(namespace.get::<i32>("missing"), None);
    }

    #[test]
    fn test_insert_returns_previous() {
        let mut namespace = Namespace::new();
        assert!(namespace.insert("x", 1_u8).is_none());

        let previous = namespace.insert("x", "two".to_string()).unwrap();
        assert_eq!(previous.downcast_ref::<u8>(), Some(&1));
        assert_eq!(namespace.get::<String>("x").map(String::as_str), Some("two"));
    }

    #[test]
    fn test_get_or_insert_with() {
        let mut namespace = Namespace::new();
        namespace
            .get_or_insert_with("seen", Vec::<usize>::new)
            .unwrap()
            .push(3);
        namespace
            .get_or_insert_with("seen", Vec::<usize>::new)
            .unwrap()
            .push(5);

        assert_eq!(namespace.get::<Vec<usize>>("seen"), Some(&vec![3, 5]));
        assert!(namespace.get_or_insert_with("seen", || 0_i64).is_none());
    }

    #[test]
    fn test_strings_and_names() {
        let mut namespace = Namespace::new();
        namespace.insert("b", "beta".to_string());
        namespace.insert("a", "alpha".to_string());
        namespace.insert("n", 7_u32);

        assert_eq!(namespace.names(), vec!["a", "b", "n"]);
        assert_eq!(namespace.strings(), vec![("a", "alpha"), ("b", "beta")]);
        assert_eq!(format!("{:?}", namespace), r#"{"a", "b", "n"}"#);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut namespace = Namespace::new();
        namespace.insert("a", 1_i32);
        namespace.insert("b", 2_i32);

        assert!(namespace.remove("a").is_some());
        assert!(!namespace.contains("a"));
        assert_eq!(namespace.len(), 1);

        namespace.clear();
        assert!(namespace.is_empty());
    }
}
