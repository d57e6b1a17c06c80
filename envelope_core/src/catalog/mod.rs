//! # Layer Material Catalog
//!
//! Static reference data describing every purchasable layer material, plus
//! the queries that narrow it for the cascading substance → maker → product
//! selection.
//!
//! ## Ordering
//!
//! Option lists are de-duplicated and returned in the order each value first
//! appears in the catalog. They are never sorted.
//!
//! ## Context restriction
//!
//! Concrete walls insulated from the outside only accept the external
//! thermal insulation system products listed in
//! [`CONCRETE_OUTSIDE_ISOLATION_IDS`]. Every query that takes an
//! [`ElementContext`] applies that allow-list before filtering.
//!
//! ## Example
//!
//! ```rust
//! use envelope_core::catalog::Catalog;
//! use envelope_core::element::{BuildMethod, BuildMethodIsolation, ElementContext};
//!
//! let catalog = Catalog::builtin();
//! let open = ElementContext::unrestricted();
//! assert_eq!(
//!     catalog.available_makers("expanded polystyrene", &open),
//!     vec!["Kalkar", "Thermokir"]
//! );
//!
//! let etics = ElementContext::new(
//!     Some(BuildMethod::Concrete),
//!     Some(BuildMethodIsolation::OutsideIsolation),
//! );
//! assert_eq!(catalog.available_makers("expanded polystyrene", &etics), vec!["Thermokir"]);
//! ```

mod builtin;

use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::element::{BuildMethod, BuildMethodIsolation, ElementContext};
use crate::errors::{EnvelopeError, EnvelopeResult};

/// Catalog ids offered for concrete walls with outside isolation.
// TODO: replace with a compatibility attribute on the entries once the catalog carries one
pub const CONCRETE_OUTSIDE_ISOLATION_IDS: [&str; 5] = ["27", "28", "29", "30", "31"];

/// One catalog record.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "27",
///   "substance": "expanded polystyrene",
///   "maker": "Thermokir",
///   "product": "EPS F-15",
///   "thermalConductivity": 0.04,
///   "mass": 12.0,
///   "minThickness": 3.0,
///   "maxThickness": 6.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerCatalogEntry {
    pub id: String,
    pub substance: String,
    pub maker: String,
    pub product: String,
    /// λ in W/(m·K)
    pub thermal_conductivity: f64,
    /// kg/m³
    pub mass: f64,
    /// cm
    pub min_thickness: f64,
    /// cm
    pub max_thickness: f64,
}

impl LayerCatalogEntry {
    /// Whether this entry is the given substance/maker/product
    pub fn matches(&self, substance: &str, maker: &str, product: &str) -> bool {
        self.substance == substance && self.maker == maker && self.product == product
    }

    /// Inclusive thickness range check
    pub fn accepts_thickness(&self, thickness: f64) -> bool {
        self.min_thickness <= thickness && thickness <= self.max_thickness
    }

    fn validate(&self) -> EnvelopeResult<()> {
        for (field, value) in [
            ("id", &self.id),
            ("substance", &self.substance),
            ("maker", &self.maker),
            ("product", &self.product),
        ] {
            if value.trim().is_empty() {
                return Err(EnvelopeError::invalid_catalog(format!(
                    "entry '{}' has an empty {}",
                    self.id, field
                )));
            }
        }
        let range_ok = self.min_thickness >= 0.0 && self.min_thickness <= self.max_thickness;
        if !range_ok {
            return Err(EnvelopeError::invalid_catalog(format!(
                "entry '{}' has thickness range [{}, {}]",
                self.id, self.min_thickness, self.max_thickness
            )));
        }
        if self.thermal_conductivity.is_nan() || self.thermal_conductivity <= 0.0 {
            return Err(EnvelopeError::invalid_catalog(format!(
                "entry '{}' has thermal conductivity {}",
                self.id, self.thermal_conductivity
            )));
        }
        Ok(())
    }
}

/// Allow-list a context imposes on the catalog, if any.
pub fn context_allow_list(context: &ElementContext) -> Option<&'static [&'static str]> {
    match (context.build_method, context.build_method_isolation) {
        (Some(BuildMethod::Concrete), Some(BuildMethodIsolation::OutsideIsolation)) => {
            Some(&CONCRETE_OUTSIDE_ISOLATION_IDS)
        }
        _ => None,
    }
}

/// De-duplicate while keeping first-occurrence order.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut out: Vec<&'a str> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    let entries = builtin::ROWS
        .iter()
        .map(|&(id, substance, maker, product, lambda, mass, min, max)| LayerCatalogEntry {
            id: id.to_string(),
            substance: substance.to_string(),
            maker: maker.to_string(),
            product: product.to_string(),
            thermal_conductivity: lambda,
            mass,
            min_thickness: min,
            max_thickness: max,
        })
        .collect();
    Catalog { entries }
});

/// Read-only list of catalog entries.
///
/// Serializes as a plain array. Deserializing goes through [`Catalog::from_entries`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LayerCatalogEntry>", into = "Vec<LayerCatalogEntry>")]
pub struct Catalog {
    entries: Vec<LayerCatalogEntry>,
}

impl TryFrom<Vec<LayerCatalogEntry>> for Catalog {
    type Error = EnvelopeError;

    fn try_from(entries: Vec<LayerCatalogEntry>) -> EnvelopeResult<Self> {
        Catalog::from_entries(entries)
    }
}

impl From<Catalog> for Vec<LayerCatalogEntry> {
    fn from(catalog: Catalog) -> Self {
        catalog.entries
    }
}

impl Catalog {
    /// The catalog compiled into the library, built on first use.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Build a catalog from entries, rejecting inconsistent data.
    ///
    /// Ids and substance/maker/product triples must be unique, keys
    /// non-empty, `0 <= min <= max` and λ positive.
    pub fn from_entries(entries: Vec<LayerCatalogEntry>) -> EnvelopeResult<Self> {
        Self::check_unique(&entries)?;
        Ok(Catalog { entries })
    }

    fn check_unique(entries: &[LayerCatalogEntry]) -> EnvelopeResult<()> {
        let mut ids = HashSet::new();
        let mut triples = HashSet::new();
        for entry in entries {
            entry.validate()?;
            if !ids.insert(entry.id.as_str()) {
                return Err(EnvelopeError::invalid_catalog(format!("duplicate id '{}'", entry.id)));
            }
            if !triples.insert((entry.substance.as_str(), entry.maker.as_str(), entry.product.as_str())) {
                return Err(EnvelopeError::invalid_catalog(format!(
                    "duplicate product {} / {} / {}",
                    entry.substance, entry.maker, entry.product
                )));
            }
        }
        Ok(())
    }

    /// Parse a JSON array of entries.
    pub fn from_json(json: &str) -> EnvelopeResult<Self> {
        let entries: Vec<LayerCatalogEntry> = serde_json::from_str(json).map_err(EnvelopeError::serialization)?;
        Catalog::from_entries(entries)
    }

    /// Load a JSON catalog file.
    pub fn load(path: &Path) -> EnvelopeResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| EnvelopeError::file_error("read catalog", path.display().to_string(), e.to_string()))?;
        let catalog = Catalog::from_json(&json)?;
        debug!(path = %path.display(), entries = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    pub fn entries(&self) -> &[LayerCatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry by id
    pub fn get(&self, id: &str) -> Option<&LayerCatalogEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Entries a context may choose from, in catalog order.
    pub fn entries_for<'a>(&'a self, context: &ElementContext) -> impl Iterator<Item = &'a LayerCatalogEntry> + 'a {
        let allow_list = context_allow_list(context);
        self.entries
            .iter()
            .filter(move |entry| allow_list.map_or(true, |ids| ids.contains(&entry.id.as_str())))
    }

    /// Distinct substances on offer for a context.
    pub fn available_substances(&self, context: &ElementContext) -> Vec<&str> {
        distinct(self.entries_for(context).map(|entry| entry.substance.as_str()))
    }

    /// Distinct makers of a substance. Empty when no substance is chosen.
    pub fn available_makers(&self, substance: &str, context: &ElementContext) -> Vec<&str> {
        if substance.is_empty() {
            return Vec::new();
        }
        distinct(
            self.entries_for(context)
                .filter(|entry| entry.substance == substance)
                .map(|entry| entry.maker.as_str()),
        )
    }

    /// Distinct products of a substance and maker. Empty when either is unset.
    pub fn available_products(&self, substance: &str, maker: &str, context: &ElementContext) -> Vec<&str> {
        if substance.is_empty() || maker.is_empty() {
            return Vec::new();
        }
        distinct(
            self.entries_for(context)
                .filter(|entry| entry.substance == substance && entry.maker == maker)
                .map(|entry| entry.product.as_str()),
        )
    }

    /// Exact lookup of a full selection.
    pub fn resolve_entry(&self, substance: &str, maker: &str, product: &str) -> Option<&LayerCatalogEntry> {
        self.entries.iter().find(|entry| entry.matches(substance, maker, product))
    }
}
