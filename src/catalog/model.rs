use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_yaml::Value;
use std::fmt;

/// Name of a YAML value's type as used in error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Accept only YAML strings; `123` or `true` are not silently turned into text.
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        other => Err(de::Error::custom(format!(
            "expected a string, found {}",
            value_kind(&other)
        ))),
    }
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    text(deserializer).map(Some)
}

/// A YAML scalar that may be written either as text or as a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Numeric zero and the empty string carry no value to display.
    pub fn is_blank(&self) -> bool {
        match self {
            Scalar::Integer(n) => *n == 0,
            Scalar::Float(n) => *n == 0.0,
            Scalar::Text(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(n) => write!(f, "{}", n),
            Scalar::Float(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{:.1}", n),
            Scalar::Float(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// A catalog item one supplier can provide.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Article {
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(default)]
    pub id: Option<Scalar>,
    #[serde(default)]
    pub size: Option<Scalar>,
}

/// One catalog row: the same logical item as offered by several suppliers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArticleChoice {
    #[serde(default, deserialize_with = "optional_text")]
    pub hint: Option<String>,
    #[serde(flatten)]
    pub offers: IndexMap<String, Article>,
}

/// One YAML document of the article catalog.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct Section(pub Vec<ArticleChoice>);

impl Section {
    pub fn choices(&self) -> &[ArticleChoice] {
        &self.0
    }
}

/// Billing and contact identity used to address an order document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SupplierInfo {
    #[serde(deserialize_with = "text")]
    pub name: String,
    pub customer_id: Scalar,
    #[serde(deserialize_with = "text")]
    pub tax_id: String,
    #[serde(deserialize_with = "text")]
    pub from_address: String,
    #[serde(deserialize_with = "text")]
    pub from_name: String,
    #[serde(deserialize_with = "text")]
    pub from_phone: String,
}

/// One YAML document of the supplier directory, keyed by supplier identifier.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct SupplierDirectory(pub IndexMap<String, SupplierInfo>);

impl SupplierDirectory {
    pub fn get(&self, supplier: &str) -> Option<&SupplierInfo> {
        self.0.get(supplier)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Fold directory documents into one directory.
///
/// Documents are applied in file order, so a supplier listed in several
/// documents resolves to its last occurrence.
pub fn merge_suppliers<'a, I>(documents: I) -> SupplierDirectory
where
    I: IntoIterator<Item = &'a SupplierDirectory>,
{
    let mut merged = IndexMap::new();
    for document in documents {
        for (supplier, info) in &document.0 {
            if merged.insert(supplier.clone(), info.clone()).is_some() {
                log::warn!(
                    "Supplier '{}' is defined more than once, using the last definition",
                    supplier
                );
            }
        }
    }
    SupplierDirectory(merged)
}
