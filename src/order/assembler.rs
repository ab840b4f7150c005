//! Reshapes flat order form fields into per-supplier order lines.
//!
//! Every catalog row `i` of the order form submits `i_amount`, the chosen
//! supplier as `i_supplier`, and the article of that supplier as
//! `i_<supplier>_name` plus optional `i_<supplier>_id` and `i_<supplier>_size`.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use super::model::{FormFields, Order, OrderArticle};

lazy_static! {
    static ref AMOUNT_FIELD: Regex = Regex::new(r"^(\d+)_amount$").expect("valid regex");
}

/// Amount a row submits when nothing is ordered.
const ZERO_AMOUNT: &str = "0";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssembleError {
    #[error("missing field {0}")]
    MissingField(String),
}

fn required<'a>(fields: &'a FormFields, name: String) -> Result<&'a str, AssembleError> {
    fields.get(&name).ok_or(AssembleError::MissingField(name))
}

/// Collect the order lines of every row with a non-zero amount.
///
/// Rows keep the order in which their amount fields were submitted; row
/// labels are never compared numerically.
pub fn assemble(fields: &FormFields) -> Result<Order, AssembleError> {
    let mut order = Order::new();

    for (key, amount) in fields.iter() {
        let Some(captures) = AMOUNT_FIELD.captures(key) else {
            continue;
        };
        if amount.is_empty() || amount == ZERO_AMOUNT {
            continue;
        }
        let row = &captures[1];

        let supplier = required(fields, format!("{}_supplier", row))?;
        let name = required(fields, format!("{}_{}_name", row, supplier))?;

        let mut article = OrderArticle::new(name, amount);
        article.id = fields
            .get(&format!("{}_{}_id", row, supplier))
            .map(str::to_string);
        article.size = fields
            .get(&format!("{}_{}_size", row, supplier))
            .map(str::to_string);

        log::debug!("Row {} orders {} x '{}' from {}", row, amount, name, supplier);
        order.entry(supplier.to_string()).or_default().push(article);
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormFields {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_single_row() {
        let order = assemble(&form(&[
            ("1_supplier", "acme"),
            ("1_amount", "5"),
            ("1_acme_name", "Widget"),
        ]))
        .unwrap();
        assert_eq!(order.len(), 1);
        assert_eq!(order["acme"], vec![OrderArticle::new("Widget", "5")]);
    }

    #[test]
    fn test_optional_id_and_size() {
        let order = assemble(&form(&[
            ("3_supplier", "acme"),
            ("3_acme_name", "Widget"),
            ("3_acme_id", "W-1"),
            ("3_acme_size", "2x3.5"),
            ("3_globex_name", "Gizmo"),
            ("3_amount", "1"),
        ]))
        .unwrap();
        let article = &order["acme"][0];
        assert_eq!(article.id.as_deref(), Some("W-1"));
        assert_eq!(article.size.as_deref(), Some("2x3.5"));
        assert!(!order.contains_key("globex"));
    }

    #[test]
    fn test_zero_and_empty_amounts_are_skipped() {
        let order = assemble(&form(&[
            ("1_amount", "0"),
            ("1_supplier", "acme"),
            ("1_acme_name", "Widget"),
            ("2_amount", ""),
            ("2_supplier", "acme"),
            ("2_acme_name", "Bolt"),
            // no companion fields: skipped before they are looked up
            ("3_amount", "0"),
        ]))
        .unwrap();
        assert!(order.is_empty());
    }

    #[test]
    fn test_rows_keep_submission_order() {
        let order = assemble(&form(&[
            ("10_amount", "1"),
            ("10_supplier", "acme"),
            ("10_acme_name", "Ten"),
            ("2_amount", "2"),
            ("2_supplier", "acme"),
            ("2_acme_name", "Two"),
            ("7_amount", "3"),
            ("7_supplier", "globex"),
            ("7_globex_name", "Seven"),
        ]))
        .unwrap();
        let names: Vec<&str> = order["acme"].iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Ten", "Two"]);
        let suppliers: Vec<&str> = order.keys().map(String::as_str).collect();
        assert_eq!(suppliers, vec!["acme", "globex"]);
    }

    #[test]
    fn test_missing_supplier_field() {
        let err = assemble(&form(&[("4_amount", "1"), ("4_acme_name", "Widget")])).unwrap_err();
        assert_eq!(err, AssembleError::MissingField("4_supplier".to_string()));
        assert_eq!(err.to_string(), "missing field 4_supplier");
    }

    #[test]
    fn test_missing_name_field() {
        let err = assemble(&form(&[
            ("4_amount", "1"),
            ("4_supplier", "acme"),
            ("4_globex_name", "Gizmo"),
        ]))
        .unwrap_err();
        assert_eq!(err, AssembleError::MissingField("4_acme_name".to_string()));
    }

    #[test]
    fn test_unrelated_fields_are_ignored() {
        let order = assemble(&form(&[
            ("supplier", "acme"),
            ("date", "2024-05-01"),
            ("x_amount", "4"),
            ("1_amount_extra", "4"),
        ]))
        .unwrap();
        assert!(order.is_empty());
    }

    #[test]
    fn test_large_form() {
        let rows = 20_000;
        let mut pairs = Vec::with_capacity(rows * 3 + 1);
        for i in 0..rows {
            pairs.push((format!("{}_amount", i), "1".to_string()));
            pairs.push((format!("{}_supplier", i), "acme".to_string()));
            pairs.push((format!("{}_acme_name", i), format!("Article {}", i)));
        }
        // a repeated name keeps its first value
        pairs.push(("0_acme_name".to_string(), "Replaced".to_string()));
        let fields = FormFields::new(pairs);

        let started = std::time::Instant::now();
        let order = assemble(&fields).unwrap();
        assert!(started.elapsed() < std::time::Duration::from_secs(5));

        assert_eq!(order["acme"].len(), rows);
        assert_eq!(order["acme"][0].name, "Article 0");
        assert_eq!(order["acme"][rows - 1].name, format!("Article {}", rows - 1));
    }
}
