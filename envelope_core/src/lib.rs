//! # envelope_core - Building Envelope Configuration Engine
//!
//! `envelope_core` models the thermal build-up of building elements (walls,
//! ceilings, floors, thermal bridges) for envelope compliance work. All data
//! types are JSON-serializable so projects can be stored, diffed, and handed
//! to other tools.
//!
//! ## Design Philosophy
//!
//! - **Rules as data**: element configuration follows fixed decision tables
//! - **Catalog-driven**: layer materials are chosen, never typed in
//! - **Store is the truth**: edits go through an [`store::ElementStore`] and
//!   local state adopts its answer
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use envelope_core::catalog::Catalog;
//! use envelope_core::element::{Element, ElementConfiguration, ElementType};
//! use envelope_core::layers::LayerEditor;
//! use envelope_core::project::Project;
//!
//! let mut project = Project::new("Jane Engineer", "25-042", "ACME");
//! let type_id = project.add_building_type("Residential");
//! let space_id = project.add_space(&type_id, "Bedroom")?;
//! let location = project.add_element(
//!     &type_id,
//!     &space_id,
//!     Element::new("Roof", ElementConfiguration::new(ElementType::Ceiling)),
//! )?;
//!
//! let mut element = project.element(&location).cloned().unwrap();
//! let mut editor = LayerEditor::new(Catalog::builtin());
//! editor.open_add(&element);
//! editor.set_substance("concrete")?;
//! editor.set_maker("Readymix")?;
//! editor.set_product("B-30")?;
//! editor.save(&mut element, &location, &mut project)?;
//!
//! assert_eq!(project.element(&location).unwrap().layers.len(), 1);
//! # Ok::<(), envelope_core::errors::EnvelopeError>(())
//! ```
//!
//! ## Modules
//!
//! - [`element`] - Element configuration rules, layers, and elements
//! - [`catalog`] - Layer material catalog and cascading option queries
//! - [`layers`] - Layer editing dialog and paged reorder/delete
//! - [`store`] - Element persistence port
//! - [`compliance`] - U-value calculation and limit check
//! - [`project`] - Project container, metadata, and settings
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - `file_io` - File operations with atomic saves and locking

pub mod catalog;
pub mod compliance;
pub mod element;
pub mod errors;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_io;
pub mod layers;
pub mod project;
pub mod store;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use catalog::{Catalog, LayerCatalogEntry};
pub use element::{Element, ElementConfiguration, ElementContext, Layer};
pub use errors::{EnvelopeError, EnvelopeResult};
#[cfg(not(target_arch = "wasm32"))]
pub use file_io::{load_project, save_project, FileLock};
pub use project::{ElementLocation, GlobalSettings, Project, ProjectMetadata};
pub use store::{ElementStore, UpdateResponse};
