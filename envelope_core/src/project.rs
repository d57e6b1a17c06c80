//! # Project Data Structures
//!
//! The `Project` struct is the root container for all compliance data.
//! Projects serialize to `.evp` (Envelope) files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: GlobalSettings (code, climate zone, compliance limits)
//! └── building_types: Vec<BuildingType>
//!     └── spaces: Vec<Space>
//!         └── elements: Vec<Element>
//!             └── layers: Vec<Layer>
//! ```
//!
//! ## Example
//!
//! ```rust
//! use envelope_core::element::{Element, ElementConfiguration, ElementType};
//! use envelope_core::project::Project;
//!
//! let mut project = Project::new("Jane Engineer", "25-042", "ACME Corp");
//! let type_id = project.add_building_type("Residential");
//! let space_id = project.add_space(&type_id, "Living room")?;
//! let location = project.add_element(
//!     &type_id,
//!     &space_id,
//!     Element::new("North wall", ElementConfiguration::new(ElementType::Wall)),
//! )?;
//! assert!(project.element(&location).is_some());
//! # Ok::<(), envelope_core::errors::EnvelopeError>(())
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::compliance::ComplianceLimits;
use crate::element::Element;
use crate::errors::{EnvelopeError, EnvelopeResult};

/// Current schema version for .evp files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// The four ids that address one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementLocation {
    pub project_id: Uuid,
    pub type_id: Uuid,
    pub space_id: Uuid,
    pub element_id: Uuid,
}

impl std::fmt::Display for ElementLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.project_id, self.type_id, self.space_id, self.element_id
        )
    }
}

/// Root project container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,

    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// Global settings (code, limits)
    pub settings: GlobalSettings,

    /// Building types, in display order
    #[serde(default)]
    pub building_types: Vec<BuildingType>,
}

/// A group of spaces sharing a use (residential, offices, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingType {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub spaces: Vec<Space>,
}

/// A room or zone holding building elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Example
    ///
    /// ```rust
    /// use envelope_core::project::Project;
    ///
    /// let project = Project::new("John Doe", "25-001", "Client Corp");
    /// assert_eq!(project.meta.engineer, "John Doe");
    /// ```
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            id: Uuid::new_v4(),
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: GlobalSettings::default(),
            building_types: Vec::new(),
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Add a building type and return its id.
    pub fn add_building_type(&mut self, name: impl Into<String>) -> Uuid {
        let id = Uuid::new_v4();
        self.building_types.push(BuildingType {
            id,
            name: name.into(),
            spaces: Vec::new(),
        });
        self.touch();
        id
    }

    pub fn building_type(&self, type_id: &Uuid) -> Option<&BuildingType> {
        self.building_types.iter().find(|t| &t.id == type_id)
    }

    /// Building type by (case-insensitive) name
    pub fn find_building_type(&self, name: &str) -> Option<&BuildingType> {
        self.building_types.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    fn space_mut(&mut self, type_id: &Uuid, space_id: &Uuid) -> Option<&mut Space> {
        self.building_types
            .iter_mut()
            .find(|t| &t.id == type_id)?
            .spaces
            .iter_mut()
            .find(|s| &s.id == space_id)
    }

    /// Add a space under a building type and return its id.
    pub fn add_space(&mut self, type_id: &Uuid, name: impl Into<String>) -> EnvelopeResult<Uuid> {
        let building_type = self
            .building_types
            .iter_mut()
            .find(|t| &t.id == type_id)
            .ok_or_else(|| EnvelopeError::invalid_input("typeId", type_id.to_string(), "Unknown building type"))?;
        let id = Uuid::new_v4();
        building_type.spaces.push(Space {
            id,
            name: name.into(),
            elements: Vec::new(),
        });
        self.touch();
        Ok(id)
    }

    /// Add an element to a space.
    ///
    /// The element configuration is checked against the decision tables.
    pub fn add_element(&mut self, type_id: &Uuid, space_id: &Uuid, element: Element) -> EnvelopeResult<ElementLocation> {
        element.configuration.validate()?;
        let project_id = self.id;
        let element_id = element.id;
        let space = self
            .space_mut(type_id, space_id)
            .ok_or_else(|| EnvelopeError::invalid_input("spaceId", space_id.to_string(), "Unknown space"))?;
        space.elements.push(element);
        self.touch();
        Ok(ElementLocation {
            project_id,
            type_id: *type_id,
            space_id: *space_id,
            element_id,
        })
    }

    pub fn element(&self, location: &ElementLocation) -> Option<&Element> {
        if location.project_id != self.id {
            return None;
        }
        self.building_type(&location.type_id)?
            .spaces
            .iter()
            .find(|s| s.id == location.space_id)?
            .elements
            .iter()
            .find(|e| e.id == location.element_id)
    }

    /// Mutable access to an element. Marks the project as modified when found.
    pub fn element_mut(&mut self, location: &ElementLocation) -> Option<&mut Element> {
        if location.project_id != self.id {
            return None;
        }
        let element = self
            .building_types
            .iter_mut()
            .find(|t| t.id == location.type_id)?
            .spaces
            .iter_mut()
            .find(|s| s.id == location.space_id)?
            .elements
            .iter_mut()
            .find(|e| e.id == location.element_id)?;
        self.meta.modified = Utc::now();
        Some(element)
    }

    /// Find where an element lives by its id alone.
    pub fn locate_element(&self, element_id: &Uuid) -> Option<ElementLocation> {
        self.element_locations().find(|loc| &loc.element_id == element_id)
    }

    /// Locations of every element, in document order.
    pub fn element_locations(&self) -> impl Iterator<Item = ElementLocation> + '_ {
        let project_id = self.id;
        self.building_types.iter().flat_map(move |t| {
            t.spaces.iter().flat_map(move |s| {
                s.elements.iter().map(move |e| ElementLocation {
                    project_id,
                    type_id: t.id,
                    space_id: s.id,
                    element_id: e.id,
                })
            })
        })
    }

    pub fn element_count(&self) -> usize {
        self.element_locations().count()
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Global project settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Building code the compliance check follows (e.g., "SI-1045")
    pub code: String,

    /// Climate zone label, informational
    pub climate_zone: Option<String>,

    /// Maximum U-values per element class
    #[serde(default)]
    pub limits: ComplianceLimits,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        GlobalSettings {
            code: "SI-1045".to_string(),
            climate_zone: None,
            limits: ComplianceLimits::default(),
        }
    }
}
