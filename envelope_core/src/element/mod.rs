//! # Building Elements
//!
//! An [`Element`] is one building component (wall, ceiling, floor, thermal
//! bridge). Its [`ElementConfiguration`] classifies the construction and is
//! narrowed step by step through the decision tables in [`rules`]; its
//! `layers` describe the physical build-up from inside to outside.
//!
//! ## Configuration flow
//!
//! ```text
//! type ─► subType ─► (Outside Wall only) outsideCover ─► buildMethod
//!                                              ─► buildMethodIsolation ─► isolationCoverage
//! ```
//!
//! Changing a field clears or re-derives everything downstream of it.
//!
//! ## Example
//!
//! ```rust
//! use envelope_core::element::{
//!     BuildMethod, BuildMethodIsolation, ElementConfiguration, ElementType, OutsideCover,
//! };
//!
//! let mut config = ElementConfiguration::new(ElementType::Wall);
//! config.set_outside_cover(OutsideCover::Plaster)?;
//! config.set_build_method(BuildMethod::AmirWall)?;
//!
//! // Amir walls only come with outside isolation, so it is picked for us
//! assert_eq!(config.build_method_isolation(), Some(BuildMethodIsolation::OutsideIsolation));
//! # Ok::<(), envelope_core::errors::EnvelopeError>(())
//! ```

pub mod rules;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::{EnvelopeError, EnvelopeResult};

pub use rules::Cascade;

/// Parse a user-supplied label against the wire labels of an enum.
///
/// Case, spaces, dashes and underscores are ignored, so `"outside-wall"`,
/// `"OutsideWall"` and `"Outside Wall"` all match.
fn parse_label<T: Copy + std::fmt::Display>(field: &str, input: &str, all: &[T]) -> EnvelopeResult<T> {
    fn normalize(s: &str) -> String {
        s.chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect()
    }

    let wanted = normalize(input);
    all.iter()
        .copied()
        .find(|candidate| normalize(&candidate.to_string()) == wanted)
        .ok_or_else(|| EnvelopeError::invalid_selection(field, input, all))
}

// ============================================================================
// Classifiers
// ============================================================================

/// Kind of building element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Wall,
    Ceiling,
    Floor,
    #[serde(rename = "Thermal Bridge")]
    ThermalBridge,
}

impl ElementType {
    /// All element types for selection lists
    pub const ALL: [ElementType; 4] = [
        ElementType::Wall,
        ElementType::Ceiling,
        ElementType::Floor,
        ElementType::ThermalBridge,
    ];

    /// Wire/display label
    pub fn label(&self) -> &'static str {
        match self {
            ElementType::Wall => "Wall",
            ElementType::Ceiling => "Ceiling",
            ElementType::Floor => "Floor",
            ElementType::ThermalBridge => "Thermal Bridge",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> EnvelopeResult<Self> {
        parse_label("type", s, &Self::ALL)
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Position of the element relative to the outside and neighbouring rooms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubType {
    #[serde(rename = "Outside Wall")]
    OutsideWall,
    #[serde(rename = "Isolation Wall")]
    IsolationWall,
    #[serde(rename = "Upper Open Space")]
    UpperOpenSpace,
    #[serde(rename = "Upper Close Room")]
    UpperCloseRoom,
    #[serde(rename = "Upper Roof")]
    UpperRoof,
    #[serde(rename = "Under Roof")]
    UnderRoof,
}

impl SubType {
    pub const ALL: [SubType; 6] = [
        SubType::OutsideWall,
        SubType::IsolationWall,
        SubType::UpperOpenSpace,
        SubType::UpperCloseRoom,
        SubType::UpperRoof,
        SubType::UnderRoof,
    ];

    /// Wire/display label
    pub fn label(&self) -> &'static str {
        match self {
            SubType::OutsideWall => "Outside Wall",
            SubType::IsolationWall => "Isolation Wall",
            SubType::UpperOpenSpace => "Upper Open Space",
            SubType::UpperCloseRoom => "Upper Close Room",
            SubType::UpperRoof => "Upper Roof",
            SubType::UnderRoof => "Under Roof",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> EnvelopeResult<Self> {
        parse_label("subType", s, &Self::ALL)
    }
}

impl std::fmt::Display for SubType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Exterior finish of an outside wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutsideCover {
    #[serde(rename = "dry hang")]
    DryHang,
    #[serde(rename = "plaster")]
    Plaster,
    #[serde(rename = "glued stone")]
    GluedStone,
}

impl OutsideCover {
    pub const ALL: [OutsideCover; 3] = [
        OutsideCover::DryHang,
        OutsideCover::Plaster,
        OutsideCover::GluedStone,
    ];

    /// Wire/display label
    pub fn label(&self) -> &'static str {
        match self {
            OutsideCover::DryHang => "dry hang",
            OutsideCover::Plaster => "plaster",
            OutsideCover::GluedStone => "glued stone",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> EnvelopeResult<Self> {
        parse_label("outsideCover", s, &Self::ALL)
    }
}

impl std::fmt::Display for OutsideCover {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Load-bearing construction technique of an outside wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuildMethod {
    Blocks,
    Concrete,
    AmirWall,
    Baranovich,
    LightBuild,
}

impl BuildMethod {
    pub const ALL: [BuildMethod; 5] = [
        BuildMethod::Blocks,
        BuildMethod::Concrete,
        BuildMethod::AmirWall,
        BuildMethod::Baranovich,
        BuildMethod::LightBuild,
    ];

    /// Wire/display label
    pub fn label(&self) -> &'static str {
        match self {
            BuildMethod::Blocks => "blocks",
            BuildMethod::Concrete => "concrete",
            BuildMethod::AmirWall => "amirWall",
            BuildMethod::Baranovich => "baranovich",
            BuildMethod::LightBuild => "lightBuild",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> EnvelopeResult<Self> {
        parse_label("buildMethod", s, &Self::ALL)
    }
}

impl std::fmt::Display for BuildMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Where the thermal insulation sits relative to the load-bearing layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildMethodIsolation {
    #[serde(rename = "no extra cover")]
    NoExtraCover,
    #[serde(rename = "extra cover")]
    ExtraCover,
    #[serde(rename = "inside isolation")]
    InsideIsolation,
    #[serde(rename = "outside isolation")]
    OutsideIsolation,
}

impl BuildMethodIsolation {
    pub const ALL: [BuildMethodIsolation; 4] = [
        BuildMethodIsolation::NoExtraCover,
        BuildMethodIsolation::ExtraCover,
        BuildMethodIsolation::InsideIsolation,
        BuildMethodIsolation::OutsideIsolation,
    ];

    /// Wire/display label
    pub fn label(&self) -> &'static str {
        match self {
            BuildMethodIsolation::NoExtraCover => "no extra cover",
            BuildMethodIsolation::ExtraCover => "extra cover",
            BuildMethodIsolation::InsideIsolation => "inside isolation",
            BuildMethodIsolation::OutsideIsolation => "outside isolation",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> EnvelopeResult<Self> {
        parse_label("buildMethodIsolation", s, &Self::ALL)
    }
}

impl std::fmt::Display for BuildMethodIsolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Exterior color class of the wall surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IsolationCoverage {
    #[serde(rename = "dark color")]
    DarkColor,
    #[serde(rename = "bright color")]
    BrightColor,
}

impl IsolationCoverage {
    pub const ALL: [IsolationCoverage; 2] = [IsolationCoverage::DarkColor, IsolationCoverage::BrightColor];

    /// Wire/display label
    pub fn label(&self) -> &'static str {
        match self {
            IsolationCoverage::DarkColor => "dark color",
            IsolationCoverage::BrightColor => "bright color",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> EnvelopeResult<Self> {
        parse_label("isolationCoverage", s, &Self::ALL)
    }
}

impl std::fmt::Display for IsolationCoverage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The configuration fields, in the order they are asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConfigField {
    SubType,
    OutsideCover,
    BuildMethod,
    BuildMethodIsolation,
    IsolationCoverage,
}

impl ConfigField {
    /// Field name as used in element documents
    pub fn name(&self) -> &'static str {
        match self {
            ConfigField::SubType => "subType",
            ConfigField::OutsideCover => "outsideCover",
            ConfigField::BuildMethod => "buildMethod",
            ConfigField::BuildMethodIsolation => "buildMethodIsolation",
            ConfigField::IsolationCoverage => "isolationCoverage",
        }
    }
}

impl std::fmt::Display for ConfigField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// The part of an element that decides which catalog entries apply to it.
///
/// Catalog queries only look at the build method and its isolation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementContext {
    pub build_method: Option<BuildMethod>,
    pub build_method_isolation: Option<BuildMethodIsolation>,
}

impl ElementContext {
    pub fn new(build_method: Option<BuildMethod>, build_method_isolation: Option<BuildMethodIsolation>) -> Self {
        ElementContext {
            build_method,
            build_method_isolation,
        }
    }

    /// A context that places no restriction on the catalog
    pub fn unrestricted() -> Self {
        ElementContext::default()
    }
}

/// Classification of an element.
///
/// Fields are only reachable through setters that consult the decision
/// tables, so a configuration built in code is always consistent. Documents
/// read from storage should be checked with [`ElementConfiguration::validate`].
///
/// ## JSON Example
///
/// ```json
/// {
///   "type": "Wall",
///   "subType": "Outside Wall",
///   "outsideCover": "dry hang",
///   "buildMethod": "concrete",
///   "buildMethodIsolation": "outside isolation",
///   "isolationCoverage": "dark color"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementConfiguration {
    #[serde(rename = "type")]
    element_type: ElementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub_type: Option<SubType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    outside_cover: Option<OutsideCover>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    build_method: Option<BuildMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    build_method_isolation: Option<BuildMethodIsolation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    isolation_coverage: Option<IsolationCoverage>,
}

impl ElementConfiguration {
    /// Start a configuration of the given type with its default sub-type.
    pub fn new(element_type: ElementType) -> Self {
        ElementConfiguration {
            element_type,
            sub_type: rules::sub_types_for(element_type).first().copied(),
            outside_cover: None,
            build_method: None,
            build_method_isolation: None,
            isolation_coverage: None,
        }
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn sub_type(&self) -> Option<SubType> {
        self.sub_type
    }

    pub fn outside_cover(&self) -> Option<OutsideCover> {
        self.outside_cover
    }

    pub fn build_method(&self) -> Option<BuildMethod> {
        self.build_method
    }

    pub fn build_method_isolation(&self) -> Option<BuildMethodIsolation> {
        self.build_method_isolation
    }

    pub fn isolation_coverage(&self) -> Option<IsolationCoverage> {
        self.isolation_coverage
    }

    /// Only outside walls carry cover/build-method/isolation fields.
    pub fn is_outside_wall(&self) -> bool {
        self.element_type == ElementType::Wall && self.sub_type == Some(SubType::OutsideWall)
    }

    /// Catalog filtering context for this configuration
    pub fn context(&self) -> ElementContext {
        ElementContext::new(self.build_method, self.build_method_isolation)
    }

    /// Sub-types the current type allows
    pub fn allowed_sub_types(&self) -> &'static [SubType] {
        rules::sub_types_for(self.element_type)
    }

    /// Build methods the current cover allows (empty until a cover is set)
    pub fn allowed_build_methods(&self) -> &'static [BuildMethod] {
        self.outside_cover.map(rules::build_methods_for).unwrap_or(&[])
    }

    /// Isolation methods the current build method allows
    pub fn allowed_isolations(&self) -> &'static [BuildMethodIsolation] {
        self.build_method.map(rules::isolations_for).unwrap_or(&[])
    }

    fn clear_wall_fields(&mut self) {
        self.outside_cover = None;
        self.build_method = None;
        self.build_method_isolation = None;
        self.isolation_coverage = None;
    }

    fn require_outside_wall(&self, field: ConfigField, value: impl std::fmt::Display) -> EnvelopeResult<()> {
        if self.is_outside_wall() {
            Ok(())
        } else {
            Err(EnvelopeError::invalid_input(
                field.name(),
                value.to_string(),
                "Only applies to Outside Wall elements",
            ))
        }
    }

    /// Change the element type.
    ///
    /// The sub-type resets to the first one allowed for the new type (none
    /// for thermal bridges) and every outside-wall field is cleared.
    /// Re-selecting the current type changes nothing.
    pub fn set_type(&mut self, element_type: ElementType) {
        if self.element_type == element_type {
            return;
        }
        debug!(from = %self.element_type, to = %element_type, "element type changed");
        *self = ElementConfiguration::new(element_type);
    }

    /// Change the sub-type. Leaving `Outside Wall` clears the wall fields.
    pub fn set_sub_type(&mut self, sub_type: SubType) -> EnvelopeResult<()> {
        let allowed = self.allowed_sub_types();
        if !allowed.contains(&sub_type) {
            return Err(EnvelopeError::invalid_selection(ConfigField::SubType.name(), sub_type, allowed));
        }
        if self.sub_type != Some(sub_type) {
            self.sub_type = Some(sub_type);
            if !self.is_outside_wall() {
                self.clear_wall_fields();
            }
        }
        Ok(())
    }

    /// Change the outside cover.
    ///
    /// A different cover clears the build method and its isolation. Returns
    /// the build methods now on offer.
    pub fn set_outside_cover(&mut self, cover: OutsideCover) -> EnvelopeResult<&'static [BuildMethod]> {
        self.require_outside_wall(ConfigField::OutsideCover, cover)?;
        if self.outside_cover != Some(cover) {
            debug!(cover = %cover, "outside cover changed, clearing build method");
            self.outside_cover = Some(cover);
            self.build_method = None;
            self.build_method_isolation = None;
        }
        Ok(rules::build_methods_for(cover))
    }

    /// Change the build method.
    ///
    /// The isolation method collapses according to how many options the new
    /// build method has: one is selected automatically, several leave the
    /// field empty for the user, none skips the step.
    pub fn set_build_method(&mut self, method: BuildMethod) -> EnvelopeResult<Cascade<BuildMethodIsolation>> {
        self.require_outside_wall(ConfigField::BuildMethod, method)?;
        if self.outside_cover.is_none() {
            return Err(EnvelopeError::missing_field(ConfigField::OutsideCover.name()));
        }
        let allowed = self.allowed_build_methods();
        if !allowed.contains(&method) {
            return Err(EnvelopeError::invalid_selection(ConfigField::BuildMethod.name(), method, allowed));
        }

        let cascade = Cascade::from_options(rules::isolations_for(method));
        if self.build_method != Some(method) {
            self.build_method = Some(method);
            self.build_method_isolation = cascade.selected();
            debug!(
                method = %method,
                isolation = ?self.build_method_isolation,
                "build method changed"
            );
        }
        Ok(cascade)
    }

    /// Choose the isolation method explicitly.
    pub fn set_build_method_isolation(&mut self, isolation: BuildMethodIsolation) -> EnvelopeResult<()> {
        self.require_outside_wall(ConfigField::BuildMethodIsolation, isolation)?;
        if self.build_method.is_none() {
            return Err(EnvelopeError::missing_field(ConfigField::BuildMethod.name()));
        }
        let allowed = self.allowed_isolations();
        if !allowed.contains(&isolation) {
            return Err(EnvelopeError::invalid_selection(
                ConfigField::BuildMethodIsolation.name(),
                isolation,
                allowed,
            ));
        }
        self.build_method_isolation = Some(isolation);
        Ok(())
    }

    /// Choose the exterior color class.
    ///
    /// Only asked for once the build method and (when it has options) the
    /// isolation method are known.
    pub fn set_isolation_coverage(&mut self, coverage: IsolationCoverage) -> EnvelopeResult<()> {
        self.require_outside_wall(ConfigField::IsolationCoverage, coverage)?;
        if self.build_method.is_none() {
            return Err(EnvelopeError::missing_field(ConfigField::BuildMethod.name()));
        }
        if self.build_method_isolation.is_none() && !self.allowed_isolations().is_empty() {
            return Err(EnvelopeError::missing_field(ConfigField::BuildMethodIsolation.name()));
        }
        self.isolation_coverage = Some(coverage);
        Ok(())
    }

    /// The next field the user has to fill, or `None` when complete.
    pub fn pending_field(&self) -> Option<ConfigField> {
        if self.sub_type.is_none() && !self.allowed_sub_types().is_empty() {
            return Some(ConfigField::SubType);
        }
        if !self.is_outside_wall() {
            return None;
        }
        if self.outside_cover.is_none() {
            return Some(ConfigField::OutsideCover);
        }
        if self.build_method.is_none() {
            return Some(ConfigField::BuildMethod);
        }
        if self.build_method_isolation.is_none() && !self.allowed_isolations().is_empty() {
            return Some(ConfigField::BuildMethodIsolation);
        }
        if self.isolation_coverage.is_none() {
            return Some(ConfigField::IsolationCoverage);
        }
        None
    }

    /// Whether every field the decision tables ask for is filled.
    pub fn is_complete(&self) -> bool {
        self.pending_field().is_none()
    }

    /// Check a configuration that did not come through the setters.
    ///
    /// Incomplete configurations are valid; values that contradict the
    /// decision tables are not.
    pub fn validate(&self) -> EnvelopeResult<()> {
        let sub_types = self.allowed_sub_types();
        match self.sub_type {
            Some(sub_type) if !sub_types.contains(&sub_type) => {
                return Err(EnvelopeError::invalid_selection(ConfigField::SubType.name(), sub_type, sub_types));
            }
            _ => {}
        }

        if !self.is_outside_wall() {
            let stray = [
                (ConfigField::OutsideCover, self.outside_cover.is_some()),
                (ConfigField::BuildMethod, self.build_method.is_some()),
                (ConfigField::BuildMethodIsolation, self.build_method_isolation.is_some()),
                (ConfigField::IsolationCoverage, self.isolation_coverage.is_some()),
            ];
            if let Some((field, _)) = stray.iter().find(|(_, set)| *set) {
                return Err(EnvelopeError::invalid_input(
                    field.name(),
                    "set",
                    "Only applies to Outside Wall elements",
                ));
            }
            return Ok(());
        }

        if let Some(method) = self.build_method {
            if self.outside_cover.is_none() {
                return Err(EnvelopeError::missing_field(ConfigField::OutsideCover.name()));
            }
            let allowed = self.allowed_build_methods();
            if !allowed.contains(&method) {
                return Err(EnvelopeError::invalid_selection(ConfigField::BuildMethod.name(), method, allowed));
            }
        }

        if let Some(isolation) = self.build_method_isolation {
            let allowed = self.allowed_isolations();
            if !allowed.contains(&isolation) {
                return Err(EnvelopeError::invalid_selection(
                    ConfigField::BuildMethodIsolation.name(),
                    isolation,
                    allowed,
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Layers and elements
// ============================================================================

/// Label shown for a layer without a name, by 1-based position.
pub fn default_layer_name(position: usize) -> String {
    format!("Layer {}", position)
}

/// One material course of an element's build-up.
///
/// `thermal_conductivity` and `mass` are copied from the catalog entry when
/// the layer is saved; they are never edited directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub substance: String,
    #[serde(default)]
    pub maker: String,
    #[serde(default)]
    pub product: String,
    /// Thickness in cm
    #[serde(default)]
    pub thickness: f64,
    /// λ in W/(m·K)
    #[serde(default)]
    pub thermal_conductivity: f64,
    /// kg/m³
    #[serde(default)]
    pub mass: f64,
}

impl Layer {
    /// A fresh, empty layer with a new id and a positional name.
    pub fn placeholder(position: usize) -> Self {
        Layer {
            id: Uuid::new_v4(),
            name: default_layer_name(position),
            substance: String::new(),
            maker: String::new(),
            product: String::new(),
            thickness: 0.0,
            thermal_conductivity: 0.0,
            mass: 0.0,
        }
    }

    /// Name to display for the layer at `index` (0-based).
    pub fn display_name(&self, index: usize) -> String {
        if self.name.trim().is_empty() {
            default_layer_name(index + 1)
        } else {
            self.name.clone()
        }
    }
}

/// A building element and its layer build-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: Uuid,
    pub name: String,
    #[serde(flatten)]
    pub configuration: ElementConfiguration,
    /// Ordered inside to outside
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl Element {
    pub fn new(name: impl Into<String>, configuration: ElementConfiguration) -> Self {
        Element {
            id: Uuid::new_v4(),
            name: name.into(),
            configuration,
            layers: Vec::new(),
        }
    }

    /// Catalog filtering context of this element
    pub fn context(&self) -> ElementContext {
        self.configuration.context()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outside_wall() -> ElementConfiguration {
        let config = ElementConfiguration::new(ElementType::Wall);
        assert_eq!(config.sub_type(), Some(SubType::OutsideWall));
        config
    }

    #[test]
    fn test_new_uses_first_sub_type() {
        assert_eq!(ElementConfiguration::new(ElementType::Ceiling).sub_type(), Some(SubType::UpperOpenSpace));
        assert_eq!(ElementConfiguration::new(ElementType::ThermalBridge).sub_type(), None);
    }

    #[test]
    fn test_type_change_resets_sub_type_and_wall_fields() {
        let mut config = outside_wall();
        config.set_outside_cover(OutsideCover::Plaster).unwrap();
        config.set_build_method(BuildMethod::Blocks).unwrap();

        config.set_type(ElementType::Floor);
        assert_eq!(config.sub_type(), Some(SubType::UpperOpenSpace));
        assert_eq!(config.outside_cover(), None);
        assert_eq!(config.build_method(), None);

        config.set_type(ElementType::ThermalBridge);
        assert_eq!(config.sub_type(), None);
        assert!(config.is_complete());
    }

    #[test]
    fn test_same_type_keeps_fields() {
        let mut config = outside_wall();
        config.set_outside_cover(OutsideCover::DryHang).unwrap();
        config.set_type(ElementType::Wall);
        assert_eq!(config.outside_cover(), Some(OutsideCover::DryHang));
    }

    #[test]
    fn test_sub_type_must_match_type() {
        let mut config = ElementConfiguration::new(ElementType::Floor);
        let err = config.set_sub_type(SubType::UpperRoof).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SELECTION");
        assert_eq!(config.sub_type(), Some(SubType::UpperOpenSpace));
    }

    #[test]
    fn test_leaving_outside_wall_clears_wall_fields() {
        let mut config = outside_wall();
        config.set_outside_cover(OutsideCover::Plaster).unwrap();
        config.set_sub_type(SubType::IsolationWall).unwrap();
        assert_eq!(config.outside_cover(), None);
        assert!(config.set_outside_cover(OutsideCover::Plaster).is_err());
    }

    #[test]
    fn test_cover_change_clears_build_method() {
        let mut config = outside_wall();
        config.set_outside_cover(OutsideCover::Plaster).unwrap();
        config.set_build_method(BuildMethod::Concrete).unwrap();
        config.set_build_method_isolation(BuildMethodIsolation::InsideIsolation).unwrap();

        let offered = config.set_outside_cover(OutsideCover::GluedStone).unwrap();
        assert_eq!(offered, &[BuildMethod::Concrete, BuildMethod::Blocks]);
        assert_eq!(config.build_method(), None);
        assert_eq!(config.build_method_isolation(), None);
    }

    #[test]
    fn test_single_isolation_collapses() {
        let mut config = outside_wall();
        config.set_outside_cover(OutsideCover::Plaster).unwrap();

        let cascade = config.set_build_method(BuildMethod::AmirWall).unwrap();
        assert_eq!(cascade, Cascade::Auto(BuildMethodIsolation::OutsideIsolation));
        assert_eq!(config.build_method_isolation(), Some(BuildMethodIsolation::OutsideIsolation));
        assert_eq!(config.pending_field(), Some(ConfigField::IsolationCoverage));
    }

    #[test]
    fn test_multiple_isolations_need_a_choice() {
        let mut config = outside_wall();
        config.set_outside_cover(OutsideCover::Plaster).unwrap();
        config.set_build_method(BuildMethod::AmirWall).unwrap();

        let cascade = config.set_build_method(BuildMethod::Blocks).unwrap();
        assert!(cascade.needs_input());
        assert_eq!(config.build_method_isolation(), None);
        assert_eq!(config.pending_field(), Some(ConfigField::BuildMethodIsolation));
        assert!(config.set_isolation_coverage(IsolationCoverage::DarkColor).is_err());
    }

    #[test]
    fn test_light_build_skips_isolation() {
        let mut config = outside_wall();
        config.set_outside_cover(OutsideCover::DryHang).unwrap();
        assert_eq!(config.set_build_method(BuildMethod::LightBuild).unwrap(), Cascade::Skip);
        assert_eq!(config.pending_field(), Some(ConfigField::IsolationCoverage));
        config.set_isolation_coverage(IsolationCoverage::BrightColor).unwrap();
        assert!(config.is_complete());
    }

    #[test]
    fn test_build_method_must_fit_cover() {
        let mut config = outside_wall();
        assert!(config.set_build_method(BuildMethod::Concrete).is_err());
        config.set_outside_cover(OutsideCover::GluedStone).unwrap();
        let err = config.set_build_method(BuildMethod::AmirWall).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SELECTION");
    }

    #[test]
    fn test_pending_field_walks_the_chain() {
        let mut config = outside_wall();
        assert_eq!(config.pending_field(), Some(ConfigField::OutsideCover));
        config.set_outside_cover(OutsideCover::DryHang).unwrap();
        assert_eq!(config.pending_field(), Some(ConfigField::BuildMethod));
        config.set_build_method(BuildMethod::Concrete).unwrap();
        assert_eq!(config.pending_field(), Some(ConfigField::BuildMethodIsolation));
        config.set_build_method_isolation(BuildMethodIsolation::OutsideIsolation).unwrap();
        config.set_isolation_coverage(IsolationCoverage::DarkColor).unwrap();
        assert!(config.is_complete());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_shape() {
        let mut config = outside_wall();
        config.set_outside_cover(OutsideCover::DryHang).unwrap();
        config.set_build_method(BuildMethod::Concrete).unwrap();
        config.set_build_method_isolation(BuildMethodIsolation::OutsideIsolation).unwrap();
        config.set_isolation_coverage(IsolationCoverage::DarkColor).unwrap();

        let element = Element::new("North wall", config);
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["type"], "Wall");
        assert_eq!(json["subType"], "Outside Wall");
        assert_eq!(json["outsideCover"], "dry hang");
        assert_eq!(json["buildMethod"], "concrete");
        assert_eq!(json["buildMethodIsolation"], "outside isolation");
        assert_eq!(json["isolationCoverage"], "dark color");

        let back: Element = serde_json::from_value(json).unwrap();
        assert_eq!(back, element);
    }

    #[test]
    fn test_validate_rejects_inconsistent_documents() {
        let json = serde_json::json!({
            "type": "Wall",
            "subType": "Outside Wall",
            "outsideCover": "glued stone",
            "buildMethod": "amirWall"
        });
        let config: ElementConfiguration = serde_json::from_value(json).unwrap();
        assert!(config.validate().is_err());

        let json = serde_json::json!({ "type": "Floor", "subType": "Upper Open Space", "buildMethod": "blocks" });
        let config: ElementConfiguration = serde_json::from_value(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_flexible_parsing() {
        assert_eq!(SubType::from_str_flexible("outside-wall").unwrap(), SubType::OutsideWall);
        assert_eq!(BuildMethod::from_str_flexible("amir_wall").unwrap(), BuildMethod::AmirWall);
        assert_eq!(
            BuildMethodIsolation::from_str_flexible("Outside Isolation").unwrap(),
            BuildMethodIsolation::OutsideIsolation
        );
        assert_eq!(ElementType::from_str_flexible("thermalbridge").unwrap(), ElementType::ThermalBridge);
        assert!(OutsideCover::from_str_flexible("wallpaper").is_err());
    }

    #[test]
    fn test_layer_display_name_falls_back_to_position() {
        let mut layer = Layer::placeholder(3);
        assert_eq!(layer.name, "Layer 3");
        layer.name.clear();
        assert_eq!(layer.display_name(0), "Layer 1");
    }
}
