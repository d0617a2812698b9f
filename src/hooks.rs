//! Ordered hook lists.
//!
//! A [`HookList`] holds named callbacks (or any values) ordered by priority.
//! Lower priorities run first; entries with equal priority keep their
//! registration order. Both the hierarchy checkpoints and the output
//! enhancement pipeline are built on top of it.

/// Priority used when a caller has no ordering preference.
pub const DEFAULT_PRIORITY: i32 = 10;

/// Identifier returned when registering a hook, usable for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

#[derive(Debug, Clone)]
struct Entry<T> {
    id: HookId,
    name: String,
    priority: i32,
    value: T,
}

/// A list of named values kept in (priority, registration) order.
#[derive(Debug, Clone)]
pub struct HookList<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T> HookList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a value under `name` at `priority`.
    pub fn add(&mut self, name: impl Into<String>, priority: i32, value: T) -> HookId {
        let id = HookId(self.next_id);
        self.next_id += 1;

        // Insert after every entry with priority <= ours, so ties stay in
        // registration order.
        let at = self.entries.partition_point(|e| e.priority <= priority);
        self.entries.insert(
            at,
            Entry {
                id,
                name: name.into(),
                priority,
                value,
            },
        );
        id
    }

    /// Remove the entry with the given id.
    pub fn remove(&mut self, id: HookId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Remove every entry registered under `name`. Returns how many were removed.
    pub fn remove_named(&mut self, name: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.name != name);
        before - self.entries.len()
    }

    /// Check whether any entry is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Iterate over values in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.value)
    }

    /// Iterate over `(name, value)` pairs in execution order.
    pub fn named(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|e| (e.name.as_str(), &e.value))
    }

    /// Names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Clone> HookList<T> {
    /// Clone the values out in execution order.
    ///
    /// Callers snapshot before invoking callbacks so a callback may register
    /// further hooks without aliasing the list being walked.
    pub fn snapshot(&self) -> Vec<(String, T)> {
        self.entries
            .iter()
            .map(|e| (e.name.clone(), e.value.clone()))
            .collect()
    }
}

impl<T> Default for HookList<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_list_is_empty() {
        let list: HookList<u8> = HookList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn lower_priority_runs_first() {
        let mut list = HookList::new();
        list.add("late", 20, 'c');
        list.add("early", 0, 'a');
        list.add("middle", DEFAULT_PRIORITY, 'b');

        let order: Vec<char> = list.iter().copied().collect();
        assert_eq!(order, vec!['a', 'b', 'c']);
    }

    #[test]
    fn equal_priority_keeps_registration_order() {
        let mut list = HookList::new();
        for (i, name) in ["first", "second", "third"].iter().enumerate() {
            list.add(*name, DEFAULT_PRIORITY, i);
        }
        list.add("zero", 5, 99);

        assert_eq!(list.names(), vec!["zero", "first", "second", "third"]);
    }

    #[test]
    fn remove_by_id() {
        let mut list = HookList::new();
        let a = list.add("a", DEFAULT_PRIORITY, 1);
        list.add("b", DEFAULT_PRIORITY, 2);

        assert!(list.remove(a));
        assert!(!list.remove(a));
        assert_eq!(list.names(), vec!["b"]);
    }

    #[test]
    fn remove_named_removes_all_matches() {
        let mut list = HookList::new();
        list.add("dup", 1, 1);
        list.add("other", 1, 2);
        list.add("dup", 30, 3);

        assert_eq!(list.remove_named("dup"), 2);
        assert!(!list.contains("dup"));
        assert!(list.contains("other"));
    }

    #[test]
    fn snapshot_preserves_order() {
        let mut list = HookList::new();
        list.add("b", 2, "two");
        list.add("a", 1, "one");

        let snap = list.snapshot();
        assert_eq!(snap[0], ("a".to_string(), "one"));
        assert_eq!(snap[1], ("b".to_string(), "two"));
    }
}
