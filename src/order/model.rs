use indexmap::IndexMap;
use std::collections::HashMap;

/// A line item of a submitted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderArticle {
    pub name: String,
    /// Free-form quantity, e.g. "5" or "2 Kartons"
    pub amount: String,
    pub id: Option<String>,
    pub size: Option<String>,
}

impl OrderArticle {
    pub fn new(name: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            id: None,
            size: None,
        }
    }
}

/// Order lines grouped by supplier identifier, in first-seen order.
pub type Order = IndexMap<String, Vec<OrderArticle>>;

/// Submitted form fields in the order they were sent.
///
/// Lookups return the first value of a repeated name and take constant time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    fields: Vec<(String, String)>,
    /// Position of the first field with each name.
    first: HashMap<String, usize>,
}

impl FormFields {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        let mut first = HashMap::with_capacity(fields.len());
        for (position, (name, _)) in fields.iter().enumerate() {
            first.entry(name.clone()).or_insert(position);
        }
        Self { fields, first }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.first
            .get(name)
            .map(|&position| self.fields[position].1.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
