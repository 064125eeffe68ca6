//! Bundled substitute data for catalog reads
//!
//! When the backend cannot be reached, catalog screens keep rendering from a
//! dataset compiled into the binary. The datasets are parsed once on first
//! use and never change afterwards; updates made while offline are not
//! applied to them.

pub mod local;

pub use local::LocalQuery;

use include_dir::{Dir, include_dir};
use log::error;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::models::Record;
use super::query::ResultPage;

static DATASET_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/fallback");

static DATASETS: Lazy<HashMap<FallbackCategory, Vec<Record>>> = Lazy::new(|| {
    FallbackCategory::ALL
        .iter()
        .map(|category| (*category, load_dataset(*category)))
        .collect()
});

/// Catalog resources that have a bundled dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackCategory {
    Products,
    Categories,
}

impl FallbackCategory {
    pub const ALL: [FallbackCategory; 2] = [Self::Products, Self::Categories];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Categories => "categories",
        }
    }

    fn file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }

    /// Category served for a collection name, if it is a catalog resource
    pub fn from_collection(collection: &str) -> Option<Self> {
        collection.trim_matches('/').parse().ok()
    }
}

impl fmt::Display for FallbackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FallbackCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "products" | "product" => Ok(Self::Products),
            "categories" | "category" => Ok(Self::Categories),
            other => Err(format!("no bundled dataset for '{}'", other)),
        }
    }
}

fn load_dataset(category: FallbackCategory) -> Vec<Record> {
    let Some(file) = DATASET_DIR.get_file(category.file_name()) else {
        error!("Bundled dataset {} is missing", category.file_name());
        return Vec::new();
    };

    match serde_json::from_slice::<Vec<Record>>(file.contents()) {
        Ok(records) => records,
        Err(e) => {
            error!("Bundled dataset {} is invalid: {}", category.file_name(), e);
            Vec::new()
        }
    }
}

/// Supplies the bundled dataset for a catalog category
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackResolver;

impl FallbackResolver {
    pub fn new() -> Self {
        Self
    }

    /// The raw dataset, in bundled order
    pub fn records(&self, category: FallbackCategory) -> &'static [Record] {
        DATASETS
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The whole dataset as one unpaginated page
    pub fn resolve(&self, category: FallbackCategory) -> ResultPage {
        ResultPage::single(self.records(category).to_vec())
    }
}
