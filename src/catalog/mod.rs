// src/catalog/mod.rs
use std::collections::HashMap;
use tracing::{debug, trace, warn};

use crate::error::{CatalogError, Result};
use crate::normalize::{normalize, split_segments};
use crate::source::{category_label, CategoryRecord, FoodRecord};

/// Canonical food name plus its distinct modifiers, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Food {
    pub name: String,
    pub modifiers: Vec<String>,
}

impl Food {
    fn add_modifier(&mut self, modifier: String) {
        if !self.modifiers.contains(&modifier) {
            self.modifiers.push(modifier);
        }
    }
}

/// All foods of one category code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub code: String,
    /// Line of the food record that introduced this category.
    pub first_line: usize,
    foods: Vec<Food>,
    index: HashMap<String, usize>,
}

impl Category {
    fn new(code: &str, first_line: usize) -> Self {
        Self {
            code: code.to_string(),
            first_line,
            foods: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn food_mut(&mut self, name: &str) -> &mut Food {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                self.foods.push(Food {
                    name: name.to_string(),
                    modifiers: Vec::new(),
                });
                self.index.insert(name.to_string(), self.foods.len() - 1);
                self.foods.len() - 1
            }
        };
        &mut self.foods[idx]
    }

    pub fn foods(&self) -> &[Food] {
        &self.foods
    }

    pub fn get(&self, name: &str) -> Option<&Food> {
        self.index.get(name).map(|&i| &self.foods[i])
    }

    pub fn modifier_count(&self) -> usize {
        self.foods.iter().map(|f| f.modifiers.len()).sum()
    }
}

/// Category code → canonical food name → modifiers.
///
/// Categories and foods keep the order in which they were first inserted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one already-normalized description under `category`.
    pub fn insert(&mut self, category: &str, line: usize, normalized: &str) {
        let (name, modifiers) = split_segments(normalized);
        let idx = match self.index.get(category) {
            Some(&idx) => idx,
            None => {
                self.categories.push(Category::new(category, line));
                self.index
                    .insert(category.to_string(), self.categories.len() - 1);
                self.categories.len() - 1
            }
        };
        let food = self.categories[idx].food_mut(&name);
        for modifier in modifiers {
            food.add_modifier(modifier);
        }
        trace!(category, name = %name, "catalogued");
    }

    /// Normalize and add one raw food record.
    pub fn insert_record(&mut self, record: &FoodRecord) {
        let normalized = normalize(&record.description);
        self.insert(&record.category, record.line, &normalized);
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, code: &str) -> Option<&Category> {
        self.index.get(code).map(|&i| &self.categories[i])
    }

    pub fn food_count(&self) -> usize {
        self.categories.iter().map(|c| c.foods.len()).sum()
    }

    pub fn modifier_count(&self) -> usize {
        self.categories.iter().map(Category::modifier_count).sum()
    }
}

/// Build the catalog from parsed food records.
pub fn build_catalog(records: &[FoodRecord]) -> Catalog {
    let mut catalog = Catalog::new();
    for record in records {
        catalog.insert_record(record);
    }
    debug!(
        categories = catalog.categories.len(),
        foods = catalog.food_count(),
        "built catalog"
    );
    catalog
}

/// Category code → output label.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    labels: HashMap<String, String>,
}

impl CategoryTable {
    /// Later records for the same code replace earlier ones.
    pub fn from_records(records: &[CategoryRecord]) -> Self {
        let mut labels = HashMap::with_capacity(records.len());
        for rec in records {
            let label = category_label(&rec.raw_label);
            if let Some(prev) = labels.insert(rec.code.clone(), label) {
                warn!(code = %rec.code, line = rec.line, previous = %prev, "category code redefined");
            }
        }
        Self { labels }
    }

    pub fn insert(&mut self, code: impl Into<String>, label: impl Into<String>) {
        self.labels.insert(code.into(), label.into());
    }

    pub fn label(&self, code: &str) -> Option<&str> {
        self.labels.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label for every category in `catalog`, in catalog order.
    ///
    /// Fails on the first category with no label, or with a label that has
    /// no letters, so nothing is written for a partially labelled catalog.
    /// Unused categories are never checked.
    pub fn resolve<'a>(&'a self, catalog: &'a Catalog) -> Result<Vec<(&'a Category, &'a str)>> {
        catalog
            .categories()
            .iter()
            .map(|cat| match self.label(&cat.code) {
                None => Err(CatalogError::MissingCategoryLabel {
                    code: cat.code.clone(),
                    line: cat.first_line,
                }),
                Some("") => Err(CatalogError::EmptyCategoryLabel {
                    code: cat.code.clone(),
                    line: cat.first_line,
                }),
                Some(label) => Ok((cat, label)),
            })
            .collect()
    }
}
