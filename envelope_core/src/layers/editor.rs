//! Layer editing dialog state.
//!
//! A [`LayerEditor`] is either idle or editing one layer draft. Field changes
//! follow the substance → maker → product cascade: changing a field clears
//! everything downstream of it, choosing a product pulls thickness, λ and
//! mass from the catalog. The display name is never touched by the cascade.
//!
//! Option lists are not stored; they are derived from the draft and the
//! element context every time they are asked for.

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::catalog::{Catalog, LayerCatalogEntry};
use crate::element::{Element, ElementContext, Layer};
use crate::errors::{EnvelopeError, EnvelopeResult};
use crate::project::ElementLocation;
use crate::store::{persist, ElementStore};

/// Parse a raw thickness field.
///
/// Anything that is not a finite number reads as 0.
pub fn parse_thickness(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Whether the dialog creates a layer or rewrites an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Add,
    Edit { index: usize },
}

/// The in-progress layer of an open dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    mode: EditMode,
    draft: Layer,
    resolved: Option<LayerCatalogEntry>,
}

impl EditSession {
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn draft(&self) -> &Layer {
        &self.draft
    }

    /// Catalog entry matching the current substance/maker/product, if any
    pub fn resolved(&self) -> Option<&LayerCatalogEntry> {
        self.resolved.as_ref()
    }

    /// Check the draft can be saved, returning the entry it resolves to.
    pub fn validate(&self) -> EnvelopeResult<&LayerCatalogEntry> {
        let draft = &self.draft;
        for (field, value) in [
            ("substance", &draft.substance),
            ("maker", &draft.maker),
            ("product", &draft.product),
        ] {
            if value.is_empty() {
                return Err(EnvelopeError::missing_field(field));
            }
        }
        let entry = self.resolved.as_ref().ok_or_else(|| {
            EnvelopeError::catalog_entry_not_found(&draft.substance, &draft.maker, &draft.product)
        })?;
        if draft.thickness.is_nan() || draft.thickness <= 0.0 {
            return Err(EnvelopeError::invalid_input(
                "thickness",
                draft.thickness.to_string(),
                "Thickness must be positive",
            ));
        }
        if !entry.accepts_thickness(draft.thickness) {
            return Err(EnvelopeError::ThicknessOutOfRange {
                thickness: draft.thickness,
                min: entry.min_thickness,
                max: entry.max_thickness,
            });
        }
        Ok(entry)
    }

    fn clear_material_from_maker(&mut self) {
        self.draft.product.clear();
        self.draft.thickness = 0.0;
        self.draft.thermal_conductivity = 0.0;
        self.draft.mass = 0.0;
        self.resolved = None;
    }
}

/// Dialog state: nothing open, or one layer being edited.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorState {
    Idle,
    Editing(EditSession),
}

/// Layer dialog driven against one catalog.
#[derive(Debug)]
pub struct LayerEditor<'c> {
    catalog: &'c Catalog,
    state: EditorState,
}

impl<'c> LayerEditor<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        LayerEditor {
            catalog,
            state: EditorState::Idle,
        }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditorState::Editing(_))
    }

    pub fn session(&self) -> Option<&EditSession> {
        match &self.state {
            EditorState::Editing(session) => Some(session),
            EditorState::Idle => None,
        }
    }

    fn session_mut(&mut self) -> EnvelopeResult<&mut EditSession> {
        match &mut self.state {
            EditorState::Editing(session) => Ok(session),
            EditorState::Idle => Err(EnvelopeError::NotEditing),
        }
    }

    /// Open the dialog for a new layer appended after the existing ones.
    ///
    /// Returns the id the layer will be saved under.
    pub fn open_add(&mut self, element: &Element) -> Uuid {
        let draft = Layer::placeholder(element.layers.len() + 1);
        let id = draft.id;
        debug!(layer_id = %id, "opened layer dialog (add)");
        self.state = EditorState::Editing(EditSession {
            mode: EditMode::Add,
            draft,
            resolved: None,
        });
        id
    }

    /// Open the dialog on an existing layer.
    pub fn open_edit(&mut self, element: &Element, index: usize) -> EnvelopeResult<&EditSession> {
        let draft = element
            .layers
            .get(index)
            .cloned()
            .ok_or(EnvelopeError::IndexOutOfRange {
                index,
                len: element.layers.len(),
            })?;
        let resolved = self
            .catalog
            .resolve_entry(&draft.substance, &draft.maker, &draft.product)
            .cloned();
        debug!(layer_id = %draft.id, index, resolved = resolved.is_some(), "opened layer dialog (edit)");
        self.state = EditorState::Editing(EditSession {
            mode: EditMode::Edit { index },
            draft,
            resolved,
        });
        self.session().ok_or(EnvelopeError::NotEditing)
    }

    /// Close the dialog, discarding the draft.
    pub fn cancel(&mut self) {
        if self.is_editing() {
            debug!("layer dialog cancelled");
        }
        self.state = EditorState::Idle;
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> EnvelopeResult<()> {
        self.session_mut()?.draft.name = name.into();
        Ok(())
    }

    /// Choose a substance. Maker, product and all derived values reset.
    pub fn set_substance(&mut self, substance: impl Into<String>) -> EnvelopeResult<()> {
        let session = self.session_mut()?;
        session.draft.substance = substance.into();
        session.draft.maker.clear();
        session.clear_material_from_maker();
        debug!(substance = %session.draft.substance, "layer substance changed");
        Ok(())
    }

    /// Choose a maker. Product and all derived values reset.
    pub fn set_maker(&mut self, maker: impl Into<String>) -> EnvelopeResult<()> {
        let session = self.session_mut()?;
        session.draft.maker = maker.into();
        session.clear_material_from_maker();
        debug!(maker = %session.draft.maker, "layer maker changed");
        Ok(())
    }

    /// Choose a product and pull its catalog values.
    ///
    /// Thickness starts at the entry's minimum. A selection that matches no
    /// entry leaves thickness, λ and mass at zero and blocks saving.
    pub fn set_product(&mut self, product: impl Into<String>) -> EnvelopeResult<()> {
        let catalog = self.catalog;
        let session = self.session_mut()?;
        session.draft.product = product.into();
        session.resolved = catalog
            .resolve_entry(&session.draft.substance, &session.draft.maker, &session.draft.product)
            .cloned();

        let (thickness, lambda, mass) = session
            .resolved
            .as_ref()
            .map(|entry| (entry.min_thickness, entry.thermal_conductivity, entry.mass))
            .unwrap_or((0.0, 0.0, 0.0));
        session.draft.thickness = thickness;
        session.draft.thermal_conductivity = lambda;
        session.draft.mass = mass;
        debug!(
            product = %session.draft.product,
            entry = ?session.resolved.as_ref().map(|entry| entry.id.as_str()),
            "layer product changed"
        );
        Ok(())
    }

    pub fn set_thickness(&mut self, thickness: f64) -> EnvelopeResult<()> {
        self.session_mut()?.draft.thickness = thickness;
        Ok(())
    }

    /// Raw text edit of the thickness field.
    pub fn set_thickness_input(&mut self, input: &str) -> EnvelopeResult<()> {
        self.set_thickness(parse_thickness(input))
    }

    /// Substances on offer for the element.
    pub fn available_substances(&self, context: &ElementContext) -> Vec<&'c str> {
        self.catalog.available_substances(context)
    }

    /// Makers of the draft's substance. Empty while idle.
    pub fn available_makers(&self, context: &ElementContext) -> Vec<&'c str> {
        match self.session() {
            Some(session) => self.catalog.available_makers(&session.draft.substance, context),
            None => Vec::new(),
        }
    }

    /// Products of the draft's substance and maker. Empty while idle.
    pub fn available_products(&self, context: &ElementContext) -> Vec<&'c str> {
        match self.session() {
            Some(session) => {
                self.catalog
                    .available_products(&session.draft.substance, &session.draft.maker, context)
            }
            None => Vec::new(),
        }
    }

    /// Validate the draft, splice it into the element and persist.
    ///
    /// On any failure the element and the open dialog stay as they were.
    /// On success the element becomes the store's copy, the dialog closes,
    /// and the saved layer is returned.
    #[instrument(skip_all, fields(location = %location))]
    pub fn save(
        &mut self,
        element: &mut Element,
        location: &ElementLocation,
        store: &mut dyn ElementStore,
    ) -> EnvelopeResult<Layer> {
        let session = self.session().ok_or(EnvelopeError::NotEditing)?;
        let entry = session.validate().inspect_err(|e| {
            debug!(error = %e, "layer rejected by validation");
        })?;

        let mut layer = session.draft.clone();
        layer.thermal_conductivity = entry.thermal_conductivity;
        layer.mass = entry.mass;

        let mut updated = element.clone();
        match session.mode {
            EditMode::Add => updated.layers.push(layer.clone()),
            EditMode::Edit { index } => {
                let len = updated.layers.len();
                let slot = updated
                    .layers
                    .get_mut(index)
                    .ok_or(EnvelopeError::IndexOutOfRange { index, len })?;
                layer.id = slot.id;
                *slot = layer.clone();
            }
        }

        match persist(store, location, updated) {
            Ok(stored) => {
                *element = stored;
                self.state = EditorState::Idle;
                info!(layer_id = %layer.id, layers = element.layers.len(), "layer saved");
                Ok(layer)
            }
            Err(e) => {
                warn!(error = %e, "layer not saved, dialog stays open");
                Err(e)
            }
        }
    }
}
