//! # Tagged properties
//!
//! The normalized, encoding-independent form of a file's tags.

use std::borrow::Cow;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::schema;

/// Drops characters XML 1.0 cannot carry, even as character references.
///
/// Tab, line feed and carriage return are kept.
///
/// # Examples
/// ```
/// use tagmkv_core::tags::property::xml_safe;
///
/// assert_eq!(xml_safe("line one\u{0c}line two"), "line oneline two");
/// assert_eq!(xml_safe("a\r\nb"), "a\r\nb");
/// ```
pub fn xml_safe(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|c| is_xml_char(*c)).collect())
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{d7ff}' | '\u{e000}'..='\u{fffd}' | '\u{10000}'..='\u{10ffff}')
}

/// A nested name/value pair. Only one level of nesting exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChildProperty {
    pub name: String,
    pub value: String,
}

/// A single tag. Equality and hashing consider `name` and `value` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedProperty {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<ChildProperty>,
}

impl TaggedProperty {
    /// Create a property; the name is upper-cased and the value made
    /// [`xml_safe`].
    pub fn new(name: impl AsRef<str>, value: impl Into<String>) -> Self {
        Self {
            name: name.as_ref().trim().to_uppercase(),
            value: into_xml_safe(value.into()),
            child: None,
        }
    }

    /// Attach a child property, replacing any existing one.
    pub fn with_child(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.child = Some(ChildProperty {
            name: name.as_ref().trim().to_uppercase(),
            value: into_xml_safe(value.into()),
        });
        self
    }

    /// An `ACTOR` property with an optional `CHARACTER` child.
    pub fn actor(actor: impl Into<String>, character: Option<&str>) -> Self {
        let prop = Self::new(schema::ACTOR, actor);
        match character {
            Some(character) if !character.trim().is_empty() => {
                prop.with_child(schema::CHARACTER, character)
            }
            _ => prop,
        }
    }
}

pub(crate) fn into_xml_safe(value: String) -> String {
    match xml_safe(&value) {
        Cow::Borrowed(_) => value,
        Cow::Owned(cleaned) => cleaned,
    }
}

impl PartialEq for TaggedProperty {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value
    }
}

impl Eq for TaggedProperty {}

impl Hash for TaggedProperty {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.value.hash(state);
    }
}

/// Ordered collection of properties with unique/repeatable insert policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertySet {
    entries: Vec<TaggedProperty>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The single write path for tag mutation.
    ///
    /// An equal `(name, value)` property already present makes this a no-op.
    /// A unique tag replaces the first entry of the same name in place.
    /// Anything else is appended.
    ///
    /// # Examples
    /// ```
    /// use tagmkv_core::tags::{PropertySet, TaggedProperty};
    ///
    /// let mut set = PropertySet::new();
    /// set.set(TaggedProperty::new("TITLE", "Draft"));
    /// set.set(TaggedProperty::new("TITLE", "Final"));
    /// assert_eq!(set.len(), 1);
    /// assert_eq!(set.value("TITLE"), Some("Final"));
    /// ```
    pub fn set(&mut self, property: TaggedProperty) {
        if self.contains(&property) {
            return;
        }
        if schema::is_unique(&property.name) {
            if let Some(existing) = self.entries.iter_mut().find(|p| p.name == property.name) {
                existing.value = property.value;
                existing.child = property.child;
                return;
            }
        }
        self.entries.push(property);
    }

    /// Returns `true` if an equal `(name, value)` property is present.
    pub fn contains(&self, property: &TaggedProperty) -> bool {
        self.entries.contains(property)
    }

    /// Removes every property with the given name, returning how many went.
    pub fn remove(&mut self, name: &str) -> usize {
        let name = name.trim().to_uppercase();
        let before = self.entries.len();
        self.entries.retain(|p| p.name != name);
        before - self.entries.len()
    }

    /// First property with the given name.
    pub fn get(&self, name: &str) -> Option<&TaggedProperty> {
        self.entries
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Value of the first property with the given name.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|p| p.value.as_str())
    }

    /// All properties with the given name, in insertion order.
    pub fn all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a TaggedProperty> + 'a {
        self.entries
            .iter()
            .filter(move |p| p.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaggedProperty> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts every property of `other` through [`PropertySet::set`].
    pub fn merge(&mut self, other: PropertySet) {
        for property in other {
            self.set(property);
        }
    }
}

impl IntoIterator for PropertySet {
    type Item = TaggedProperty;
    type IntoIter = std::vec::IntoIter<TaggedProperty>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a PropertySet {
    type Item = &'a TaggedProperty;
    type IntoIter = std::slice::Iter<'a, TaggedProperty>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<TaggedProperty> for PropertySet {
    fn from_iter<I: IntoIterator<Item = TaggedProperty>>(iter: I) -> Self {
        let mut set = PropertySet::new();
        for property in iter {
            set.set(property);
        }
        set
    }
}
