//! Attribute flattening: nested groups to dotted keys.

use grovelog_domain::{Attr, Value};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Separator between group path segments and keys.
pub const KEY_SEPARATOR: char = '.';

/// Deepest group nesting that is rendered, counting handler groups.
///
/// Attributes below this depth are dropped, like empty keys.
pub const MAX_GROUP_DEPTH: usize = 64;

/// Ordered flat mapping with last-write-wins on key collision.
///
/// A key keeps the position of its first insertion; a later insertion only
/// replaces the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatFields {
    entries: Vec<(String, Value)>,
    positions: HashMap<String, usize>,
}

impl FlatFields {
    /// Empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite.
    pub fn insert(&mut self, key: String, value: Value) {
        if let Some(&position) = self.positions.get(&key) {
            if let Some(entry) = self.entries.get_mut(position) {
                entry.1 = value;
            }
            return;
        }
        self.positions.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
    }

    /// Look up a value by its flattened key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.positions
            .get(key)
            .and_then(|&position| self.entries.get(position))
            .map(|(_, value)| value)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FlatFields {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Flatten `attrs` under `group_path` into one ordered mapping.
///
/// Group-valued attributes contribute their members under their own key;
/// empty keys are dropped at every depth. Later attributes overwrite earlier
/// ones that flatten to the same key.
pub fn flatten<'a, S>(group_path: &[S], attrs: impl IntoIterator<Item = &'a Attr>) -> FlatFields
where
    S: AsRef<str>,
{
    let mut fields = FlatFields::new();
    flatten_into(&mut fields, group_path, attrs);
    fields
}

/// Like [`flatten`], appending to an existing mapping.
pub fn flatten_into<'a, S>(
    fields: &mut FlatFields,
    group_path: &[S],
    attrs: impl IntoIterator<Item = &'a Attr>,
) where
    S: AsRef<str>,
{
    let depth = group_path.len();
    if depth > MAX_GROUP_DEPTH {
        return;
    }
    let prefix = join_path(group_path);
    for attr in attrs {
        push_attr(fields, &prefix, depth, attr);
    }
}

fn push_attr(fields: &mut FlatFields, prefix: &str, depth: usize, attr: &Attr) {
    if attr.has_empty_key() {
        return;
    }
    let key = qualify(prefix, &attr.key);
    let members = match &attr.value {
        Value::Group(members) => members,
        value => {
            fields.insert(key, value.clone());
            return;
        },
    };
    if depth >= MAX_GROUP_DEPTH {
        return;
    }

    // Explicit work stack: (prefix, depth, remaining members).
    let mut stack = vec![(key, depth + 1, members.iter())];
    loop {
        let Some((group_prefix, group_depth, remaining)) = stack.last_mut() else {
            break;
        };
        let Some(member) = remaining.next() else {
            stack.pop();
            continue;
        };
        if member.has_empty_key() {
            continue;
        }
        let key = qualify(group_prefix, &member.key);
        let depth = *group_depth;
        match &member.value {
            Value::Group(nested) if depth < MAX_GROUP_DEPTH => {
                stack.push((key, depth + 1, nested.iter()));
            },
            Value::Group(_) => {},
            value => fields.insert(key, value.clone()),
        }
    }
}

fn join_path<S: AsRef<str>>(group_path: &[S]) -> String {
    let mut joined = String::new();
    for segment in group_path {
        if !joined.is_empty() {
            joined.push(KEY_SEPARATOR);
        }
        joined.push_str(segment.as_ref());
    }
    joined
}

fn qualify(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        return key.to_string();
    }
    let mut qualified = String::with_capacity(prefix.len() + 1 + key.len());
    qualified.push_str(prefix);
    qualified.push(KEY_SEPARATOR);
    qualified.push_str(key);
    qualified
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const NO_GROUPS: [&str; 0] = [];

    fn keys(fields: &FlatFields) -> Vec<&str> {
        fields.keys().collect()
    }

    #[test]
    fn flat_attributes_keep_order() {
        let attrs = [Attr::new("a", 1), Attr::new("b", 2)];
        let fields = flatten(&NO_GROUPS, &attrs);
        assert_eq!(keys(&fields), ["a", "b"]);
    }

    #[test]
    fn group_path_prefixes_every_key() {
        let attrs = [Attr::new("c", 1)];
        let fields = flatten(&["a", "b"], &attrs);
        assert_eq!(keys(&fields), ["a.b.c"]);
    }

    #[test]
    fn nested_groups_flatten_recursively() {
        let attrs = [Attr::group(
            "http",
            [
                Attr::new("method", "GET"),
                Attr::group("response", [Attr::new("status", 200)]),
            ],
        )];
        let fields = flatten(&["req"], &attrs);
        assert_eq!(
            keys(&fields),
            ["req.http.method", "req.http.response.status"]
        );
        assert_eq!(fields.get("req.http.response.status"), Some(&Value::I64(200)));
    }

    #[test]
    fn later_entries_win_and_keep_first_position() {
        let attrs = [Attr::new("k", 1), Attr::new("other", 0), Attr::new("k", 2)];
        let fields = flatten(&NO_GROUPS, &attrs);
        assert_eq!(keys(&fields), ["k", "other"]);
        assert_eq!(fields.get("k"), Some(&Value::I64(2)));
    }

    #[test]
    fn empty_keys_are_dropped_at_any_depth() {
        let attrs = [
            Attr::new("", 1),
            Attr::group("g", [Attr::new("", 2), Attr::new("kept", 3)]),
            Attr::group("", [Attr::new("hidden", 4)]),
        ];
        let fields = flatten(&NO_GROUPS, &attrs);
        assert_eq!(keys(&fields), ["g.kept"]);
    }

    #[test]
    fn empty_group_contributes_nothing() {
        let attrs = [Attr::group("empty", [])];
        assert!(flatten(&NO_GROUPS, &attrs).is_empty());
    }

    #[test]
    fn nesting_beyond_the_bound_is_dropped() {
        let mut attr = Attr::new("leaf", true);
        for depth in 0..(MAX_GROUP_DEPTH + 10) {
            attr = Attr::group(format!("g{depth}"), [attr]);
        }
        let fields = flatten(&NO_GROUPS, [&attr]);
        assert!(fields.is_empty());

        let mut shallow = Attr::new("leaf", true);
        for depth in 0..(MAX_GROUP_DEPTH - 1) {
            shallow = Attr::group(format!("g{depth}"), [shallow]);
        }
        let fields = flatten(&NO_GROUPS, [&shallow]);
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn very_deep_nesting_does_not_overflow_the_stack() {
        let mut attr = Attr::new("leaf", 1);
        for _ in 0..100_000 {
            attr = Attr::group("g", [attr]);
        }
        assert!(flatten(&NO_GROUPS, [&attr]).is_empty());
        // Dropping the tree is itself recursive.
        std::mem::forget(attr);
    }

    #[test]
    fn serializes_as_ordered_object() -> Result<(), serde_json::Error> {
        let attrs = [Attr::new("z", 1), Attr::new("a", "x")];
        let fields = flatten(&NO_GROUPS, &attrs);
        assert_eq!(serde_json::to_string(&fields)?, r#"{"z":1,"a":"x"}"#);
        Ok(())
    }

    fn arb_attr() -> impl Strategy<Value = Attr> {
        let leaf = ("[a-c]{0,2}", any::<i64>()).prop_map(|(key, value)| Attr::new(key, value));
        leaf.prop_recursive(4, 32, 4, |inner| {
            ("[a-c]{0,2}", prop::collection::vec(inner, 0..4))
                .prop_map(|(key, members)| Attr::group(key, members))
        })
    }

    proptest! {
        #[test]
        fn flattening_is_deterministic(
            path in prop::collection::vec("[a-z]{1,3}", 0..3),
            attrs in prop::collection::vec(arb_attr(), 0..8),
        ) {
            let first = flatten(&path, &attrs);
            let second = flatten(&path, &attrs);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn no_flattened_key_has_an_empty_segment(
            path in prop::collection::vec("[a-z]{1,3}", 0..3),
            attrs in prop::collection::vec(arb_attr(), 0..8),
        ) {
            let fields = flatten(&path, &attrs);
            for key in fields.keys() {
                prop_assert!(key.split(KEY_SEPARATOR).all(|segment| !segment.is_empty()));
            }
        }
    }
}
