//! # Thermal Compliance Check
//!
//! Computes the thermal transmittance of an element from its layers and
//! compares it with the maximum the project settings allow for that kind of
//! element.
//!
//! ## Method
//!
//! ```text
//! R_layer = (thickness_cm / 100) / λ
//! R_total = Rsi + Σ R_layer + Rse
//! U       = 1 / R_total
//! ```
//!
//! Surface resistances follow the usual heat-flow directions:
//!
//! | Element          | Heat flow  | Rsi  | Rse  |
//! |------------------|------------|------|------|
//! | Wall, bridge     | horizontal | 0.13 | 0.04 |
//! | Ceiling          | upward     | 0.10 | 0.04 |
//! | Floor            | downward   | 0.17 | 0.04 |
//!
//! ## Example
//!
//! ```rust
//! use envelope_core::compliance::{check_element, ComplianceLimits, ComplianceStatus};
//! use envelope_core::element::{Element, ElementConfiguration, ElementType, Layer};
//!
//! let mut roof = Element::new("Roof", ElementConfiguration::new(ElementType::Ceiling));
//! let mut slab = Layer::placeholder(1);
//! slab.thickness = 20.0;
//! slab.thermal_conductivity = 1.75;
//! roof.layers.push(slab);
//!
//! let report = check_element(&roof, &ComplianceLimits::default());
//! assert_eq!(report.status, ComplianceStatus::Fail);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::element::{Element, ElementType, IsolationCoverage, SubType};
use crate::project::{ElementLocation, Project};
use crate::units::{Centimeters, Conductivity, ThermalResistance, UValue};

/// Outer surface resistance, m²·K/W
pub const RSE: f64 = 0.04;

/// Inner surface resistance for an element type, m²·K/W.
pub fn inner_surface_resistance(element_type: ElementType) -> ThermalResistance {
    match element_type {
        ElementType::Wall | ElementType::ThermalBridge => ThermalResistance(0.13),
        ElementType::Ceiling => ThermalResistance(0.10),
        ElementType::Floor => ThermalResistance(0.17),
    }
}

/// Maximum U-values in W/(m²·K) per element class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceLimits {
    /// Outside walls with a bright (or unspecified) finish
    pub wall_bright: f64,
    /// Outside walls with a dark finish
    pub wall_dark: f64,
    /// Ceilings under a roof or forming one
    pub roof: f64,
    /// Ceilings towards an open space
    pub ceiling_open_space: f64,
    /// Floors above an open space
    pub floor_open_space: f64,
    pub thermal_bridge: f64,
}

impl Default for ComplianceLimits {
    fn default() -> Self {
        ComplianceLimits {
            wall_bright: 1.1,
            wall_dark: 0.9,
            roof: 0.6,
            ceiling_open_space: 0.9,
            floor_open_space: 1.2,
            thermal_bridge: 2.0,
        }
    }
}

impl ComplianceLimits {
    /// The limit that applies to an element, if it faces the outside.
    pub fn limit_for(&self, element: &Element) -> Option<f64> {
        let config = &element.configuration;
        match (config.element_type(), config.sub_type()) {
            (ElementType::ThermalBridge, _) => Some(self.thermal_bridge),
            (_, Some(SubType::IsolationWall)) | (_, Some(SubType::UpperCloseRoom)) => None,
            (ElementType::Wall, _) => match config.isolation_coverage() {
                Some(IsolationCoverage::DarkColor) => Some(self.wall_dark),
                _ => Some(self.wall_bright),
            },
            (ElementType::Ceiling, Some(SubType::UpperRoof)) | (ElementType::Ceiling, Some(SubType::UnderRoof)) => {
                Some(self.roof)
            }
            (ElementType::Ceiling, _) => Some(self.ceiling_open_space),
            (ElementType::Floor, _) => Some(self.floor_open_space),
        }
    }
}

/// Outcome of a compliance check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceStatus {
    Pass,
    Fail,
    /// Interior element, no limit applies
    NotApplicable,
    /// Missing layers or layer data
    Incomplete,
}

impl ComplianceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ComplianceStatus::Pass => "PASS",
            ComplianceStatus::Fail => "FAIL",
            ComplianceStatus::NotApplicable => "N/A",
            ComplianceStatus::Incomplete => "INCOMPLETE",
        }
    }
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of checking one element.
///
/// ## JSON Example
///
/// ```json
/// {
///   "r_total": 1.6142857142857143,
///   "u_value": 0.6194690265486726,
///   "limit": 0.9,
///   "status": "Pass"
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Total resistance including surface resistances, m²·K/W
    pub r_total: ThermalResistance,
    /// W/(m²·K)
    pub u_value: UValue,
    /// Applicable maximum U-value, if any
    pub limit: Option<f64>,
    pub status: ComplianceStatus,
}

impl ComplianceReport {
    /// Utilization ratio U / limit (> 1.0 fails)
    pub fn utilization(&self) -> Option<f64> {
        self.limit.map(|limit| self.u_value.0 / limit)
    }
}

fn layer_resistance(thickness_cm: f64, lambda: f64) -> Option<ThermalResistance> {
    if thickness_cm <= 0.0 || lambda <= 0.0 || !thickness_cm.is_finite() || !lambda.is_finite() {
        return None;
    }
    Some(Conductivity(lambda).resistance_of(Centimeters(thickness_cm)))
}

/// Check one element against the limits.
pub fn check_element(element: &Element, limits: &ComplianceLimits) -> ComplianceReport {
    let element_type = element.configuration.element_type();
    let surfaces = inner_surface_resistance(element_type) + ThermalResistance(RSE);
    let limit = limits.limit_for(element);

    let layers: Option<Vec<ThermalResistance>> = element
        .layers
        .iter()
        .map(|layer| layer_resistance(layer.thickness, layer.thermal_conductivity))
        .collect();

    let (r_total, complete) = match layers {
        Some(resistances) if !resistances.is_empty() => (surfaces + resistances.into_iter().sum(), true),
        _ => (surfaces, false),
    };
    let u_value = UValue::from(r_total);

    let status = match (complete, limit) {
        (false, _) => ComplianceStatus::Incomplete,
        (true, None) => ComplianceStatus::NotApplicable,
        (true, Some(max)) if u_value.0 <= max => ComplianceStatus::Pass,
        (true, Some(_)) => ComplianceStatus::Fail,
    };

    ComplianceReport {
        r_total,
        u_value,
        limit,
        status,
    }
}

/// Check every element of a project, in document order.
#[instrument(skip_all, fields(project = %project.id))]
pub fn check_project(project: &Project) -> Vec<(ElementLocation, ComplianceReport)> {
    let limits = &project.settings.limits;
    let reports: Vec<_> = project
        .element_locations()
        .filter_map(|location| {
            let element = project.element(&location)?;
            Some((location, check_element(element, limits)))
        })
        .collect();
    debug!(
        elements = reports.len(),
        failing = reports.iter().filter(|(_, r)| r.status == ComplianceStatus::Fail).count(),
        "compliance check finished"
    );
    reports
}
