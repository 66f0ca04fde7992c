//! Product catalog and the search filter over it.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shared::error::CartError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: u64,
    #[serde(default)]
    pub description: String,
}

impl Product {
    pub fn new(name: impl Into<String>, price: u64, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            description: description.into(),
        }
    }

    /// `needle` must already be lower-cased.
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Search outcome. Non-matching products stay listed in `dimmed` so the
/// page layout does not jump while typing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult<'a> {
    pub matches: Vec<&'a Product>,
    pub dimmed: Vec<&'a Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("invalid catalog toml")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog '{}'", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("in catalog '{}'", path.display()))
    }

    pub fn find(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.name == name)
    }

    pub fn search(&self, term: &str) -> SearchResult<'_> {
        let needle = term.to_lowercase();
        let (matches, dimmed): (Vec<&Product>, Vec<&Product>) = self
            .products
            .iter()
            .partition(|product| product.matches(&needle));
        SearchResult { matches, dimmed }
    }
}

/// Parses a price as written on a product listing.
pub fn parse_price(raw: &str) -> Result<u64, CartError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| CartError::validation(format!("invalid product price '{raw}'")))
}
