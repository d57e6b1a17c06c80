//! # Unit Types
//!
//! Newtype wrappers for the handful of physical quantities the thermal
//! calculations touch. They serialize as bare numbers.
//!
//! - Layer thickness: centimeters (cm), as entered by users and stored in the
//!   catalog
//! - Thermal conductivity λ: W/(m·K)
//! - Thermal resistance R: m²·K/W
//! - Thermal transmittance U: W/(m²·K)
//!
//! ## Example
//!
//! ```rust
//! use envelope_core::units::{Centimeters, Conductivity, Meters};
//!
//! let thickness = Centimeters(5.0);
//! let meters: Meters = thickness.into();
//! assert_eq!(meters.0, 0.05);
//!
//! let r = Conductivity(0.04).resistance_of(thickness);
//! assert!((r.0 - 1.25).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Add;

// ============================================================================
// Length Units
// ============================================================================

/// Length in centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Centimeters> for Meters {
    fn from(cm: Centimeters) -> Self {
        Meters(cm.0 / 100.0)
    }
}

impl From<Meters> for Centimeters {
    fn from(m: Meters) -> Self {
        Centimeters(m.0 * 100.0)
    }
}

// ============================================================================
// Thermal Units
// ============================================================================

/// Thermal conductivity λ in W/(m·K)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conductivity(pub f64);

impl Conductivity {
    /// Resistance of a homogeneous course of the given thickness.
    ///
    /// Returns zero resistance for a non-positive conductivity.
    pub fn resistance_of(self, thickness: impl Into<Meters>) -> ThermalResistance {
        if self.0 <= 0.0 {
            return ThermalResistance(0.0);
        }
        ThermalResistance(thickness.into().0 / self.0)
    }
}

/// Thermal resistance R in m²·K/W
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThermalResistance(pub f64);

impl Add for ThermalResistance {
    type Output = ThermalResistance;

    fn add(self, rhs: ThermalResistance) -> ThermalResistance {
        ThermalResistance(self.0 + rhs.0)
    }
}

impl std::iter::Sum for ThermalResistance {
    fn sum<I: Iterator<Item = ThermalResistance>>(iter: I) -> Self {
        iter.fold(ThermalResistance(0.0), Add::add)
    }
}

/// Thermal transmittance U in W/(m²·K)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UValue(pub f64);

impl From<ThermalResistance> for UValue {
    fn from(r: ThermalResistance) -> Self {
        if r.0 <= 0.0 {
            UValue(f64::INFINITY)
        } else {
            UValue(1.0 / r.0)
        }
    }
}
