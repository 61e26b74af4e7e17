//! Form payload construction
//!
//! Endpoints that mutate a batch of remote resources take their ids as
//! indexed form keys, e.g. `ids[10]=true&ids[20]=true`. The key is indexed by
//! the identifier itself, never by position, so repeating an id overwrites its
//! entry instead of adding a second one.

use std::collections::BTreeMap;
use std::fmt;

/// Opaque key naming a remote resource
///
/// Identifiers are never parsed or validated; they are rendered verbatim into
/// the form key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identifier {
    Text(String),
    Number(u64),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Text(id) => f.write_str(id),
            Identifier::Number(id) => write!(f, "{}", id),
        }
    }
}

impl From<&str> for Identifier {
    fn from(id: &str) -> Self {
        Identifier::Text(id.to_string())
    }
}

impl From<String> for Identifier {
    fn from(id: String) -> Self {
        Identifier::Text(id)
    }
}

impl From<&String> for Identifier {
    fn from(id: &String) -> Self {
        Identifier::Text(id.clone())
    }
}

impl From<u64> for Identifier {
    fn from(id: u64) -> Self {
        Identifier::Number(id)
    }
}

impl From<u32> for Identifier {
    fn from(id: u32) -> Self {
        Identifier::Number(u64::from(id))
    }
}

impl From<usize> for Identifier {
    fn from(id: usize) -> Self {
        Identifier::Number(id as u64)
    }
}

impl From<i32> for Identifier {
    fn from(id: i32) -> Self {
        Identifier::from(i64::from(id))
    }
}

impl From<i64> for Identifier {
    fn from(id: i64) -> Self {
        // Rendered as given; a negative id is still just an opaque key.
        match u64::try_from(id) {
            Ok(id) => Identifier::Number(id),
            Err(_) => Identifier::Text(id.to_string()),
        }
    }
}

/// One identifier or an ordered list of them
///
/// Public operations take `impl Into<Identifiers>` so a caller can pass a
/// scalar without wrapping it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifiers {
    Single(Identifier),
    Many(Vec<Identifier>),
}

impl Identifiers {
    pub fn len(&self) -> usize {
        match self {
            Identifiers::Single(_) => 1,
            Identifiers::Many(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalize both shapes into one sequence
    pub fn into_vec(self) -> Vec<Identifier> {
        match self {
            Identifiers::Single(id) => vec![id],
            Identifiers::Many(ids) => ids,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Identifier> {
        match self {
            Identifiers::Single(id) => std::slice::from_ref(id).iter(),
            Identifiers::Many(ids) => ids.iter(),
        }
    }
}

macro_rules! impl_single_identifiers {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Identifiers {
                fn from(id: $ty) -> Self {
                    Identifiers::Single(Identifier::from(id))
                }
            }
        )*
    };
}

impl_single_identifiers!(&str, String, &String, u64, u32, usize, i32, i64);

impl From<Identifier> for Identifiers {
    fn from(id: Identifier) -> Self {
        Identifiers::Single(id)
    }
}

impl<T: Into<Identifier>> From<Vec<T>> for Identifiers {
    fn from(ids: Vec<T>) -> Self {
        Identifiers::Many(ids.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Identifier> + Clone> From<&[T]> for Identifiers {
    fn from(ids: &[T]) -> Self {
        Identifiers::Many(ids.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Identifier>, const N: usize> From<[T; N]> for Identifiers {
    fn from(ids: [T; N]) -> Self {
        Identifiers::Many(ids.into_iter().map(Into::into).collect())
    }
}

/// Value assigned to a form key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl fmt::Display for FormValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormValue::Bool(value) => write!(f, "{}", value),
            FormValue::Int(value) => write!(f, "{}", value),
            FormValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<bool> for FormValue {
    fn from(value: bool) -> Self {
        FormValue::Bool(value)
    }
}

impl From<i64> for FormValue {
    fn from(value: i64) -> Self {
        FormValue::Int(value)
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        FormValue::Text(value)
    }
}

/// Flat key/value mapping ready for `application/x-www-form-urlencoded`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    fields: BTreeMap<String, FormValue>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any previous value under the same key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FormValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FormValue> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copy every field of `other` that is not already present
    pub fn merge_missing(&mut self, other: &FormPayload) {
        for (key, value) in &other.fields {
            self.fields
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }

    /// Rendered pairs, as handed to the form encoder
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

/// Key for one element of a list-style parameter: `name[id]`
pub fn indexed_key(name: &str, id: &Identifier) -> String {
    format!("{}[{}]", name, id)
}

/// Build `name[id] = value` for every identifier
///
/// Pure and value-agnostic; an empty identifier list yields an empty payload
/// and rejecting it is left to the calling operation.
pub fn build_indexed_form<'a, I>(name: &str, ids: I, value: impl Into<FormValue>) -> FormPayload
where
    I: IntoIterator<Item = &'a Identifier>,
{
    let value = value.into();
    let mut form = FormPayload::new();
    for id in ids {
        form.insert(indexed_key(name, id), value.clone());
    }
    form
}
