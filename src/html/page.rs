//! Catalog page rendering.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use handlebars::Handlebars;
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::path::Path;

use super::PageError;
use crate::catalog::{Article, Section};
use crate::document::format_size;

pub const TEMPLATE_FILE: &str = "index.xhtml.hbs";
const TEMPLATE_NAME: &str = "index";
const TITLE: &str = "aquaorder";

/// Background colours assigned to suppliers in name order.
const SUPPLIER_COLORS: [&str; 3] = ["#ffdfdf", "#dfdfff", "#dfffdf"];

/// Orders placed at or after this hour cannot be delivered the next day.
const ORDER_CUTOFF_HOUR: u32 = 14;

/// Colour every supplier that offers at least one article.
pub fn supplier_colors(sections: &[Section]) -> IndexMap<String, &'static str> {
    let mut suppliers: Vec<&str> = sections
        .iter()
        .flat_map(|section| section.choices())
        .flat_map(|choice| choice.offers.keys())
        .map(String::as_str)
        .collect();
    suppliers.sort_unstable();
    suppliers.dedup();

    suppliers
        .into_iter()
        .zip(SUPPLIER_COLORS.iter().cycle())
        .map(|(supplier, color)| (supplier.to_string(), *color))
        .collect()
}

/// First delivery date that can still be ordered at `now`.
pub fn default_delivery_date(now: NaiveDateTime) -> NaiveDate {
    let days = if now.hour() >= ORDER_CUTOFF_HOUR { 2 } else { 1 };
    now.date() + Duration::days(days)
}

#[derive(Serialize)]
struct SupplierView<'a> {
    name: &'a str,
    color: &'static str,
}

#[derive(Serialize)]
struct OfferView<'a> {
    supplier: &'a str,
    color: &'static str,
    name: &'a str,
    id: Option<String>,
    size: Option<String>,
    size_display: String,
    checked: bool,
}

#[derive(Serialize)]
struct RowView<'a> {
    index: usize,
    hint: Option<&'a str>,
    offers: Vec<OfferView<'a>>,
}

#[derive(Serialize)]
struct SectionView<'a> {
    rows: Vec<RowView<'a>>,
}

#[derive(Serialize)]
struct CatalogView<'a> {
    title: &'static str,
    delivery_date: String,
    suppliers: Vec<SupplierView<'a>>,
    sections: Vec<SectionView<'a>>,
}

fn offer_view<'a>(
    supplier: &'a str,
    article: &'a Article,
    color: &'static str,
    checked: bool,
) -> OfferView<'a> {
    let size = article
        .size
        .as_ref()
        .filter(|size| !size.is_blank())
        .map(|size| size.to_string());
    OfferView {
        supplier,
        color,
        name: &article.name,
        id: article.id.as_ref().map(|id| id.to_string()),
        size_display: format_size(size.as_deref()),
        size,
        checked,
    }
}

fn catalog_view<'a>(
    sections: &'a [Section],
    colors: &'a IndexMap<String, &'static str>,
    now: NaiveDateTime,
) -> CatalogView<'a> {
    let mut index = 0;
    let sections = sections
        .iter()
        .map(|section| SectionView {
            rows: section
                .choices()
                .iter()
                .map(|choice| {
                    index += 1;
                    RowView {
                        index,
                        hint: choice.hint.as_deref(),
                        offers: choice
                            .offers
                            .iter()
                            .enumerate()
                            .map(|(i, (supplier, article))| {
                                let color = colors.get(supplier).copied().unwrap_or_default();
                                offer_view(supplier, article, color, i == 0)
                            })
                            .collect(),
                    }
                })
                .collect(),
        })
        .collect();

    CatalogView {
        title: TITLE,
        delivery_date: default_delivery_date(now).format("%Y-%m-%d").to_string(),
        suppliers: colors
            .iter()
            .map(|(name, color)| SupplierView {
                name,
                color: *color,
            })
            .collect(),
        sections,
    }
}

/// The order form listing the whole catalog.
pub struct CatalogPage {
    registry: Handlebars<'static>,
}

impl CatalogPage {
    /// Load the page template from `static_dir`.
    pub fn new(static_dir: &Path) -> Result<Self, PageError> {
        let path = static_dir.join(TEMPLATE_FILE);
        let source = fs::read_to_string(&path).map_err(|source| PageError::TemplateIo {
            path: path.clone(),
            source,
        })?;
        Self::from_source(&source)
    }

    pub fn from_source(source: &str) -> Result<Self, PageError> {
        let mut registry = Handlebars::new();
        registry
            .register_template_string(TEMPLATE_NAME, source)
            .map_err(|e| PageError::Template(Box::new(e)))?;
        Ok(Self { registry })
    }

    pub fn render(&self, sections: &[Section], now: NaiveDateTime) -> Result<String, PageError> {
        let colors = supplier_colors(sections);
        let view = catalog_view(sections, &colors, now);
        self.registry
            .render(TEMPLATE_NAME, &view)
            .map_err(|e| PageError::Render(Box::new(e)))
    }
}
