//! # Element Persistence Port
//!
//! Layer edits, deletes and reorders never write elements themselves; they
//! hand the complete updated element to an [`ElementStore`] and adopt
//! whatever the store answers. The store is the source of truth.
//!
//! Two failure shapes exist, mirroring a REST update endpoint:
//! - `Err(_)`: the request itself was rejected (network, transport)
//! - `Ok(UpdateResponse { success: false, .. })`: the server refused it
//!
//! [`Project`] implements the port directly, acting as the in-process
//! document store used by the CLI.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::element::Element;
use crate::errors::{EnvelopeError, EnvelopeResult};
use crate::project::{ElementLocation, Project};

/// Response of an element update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Element>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UpdateResponse {
    pub fn ok(data: Element) -> Self {
        UpdateResponse {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        UpdateResponse {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// The element to adopt after this response.
    ///
    /// A successful response without data means the server stored exactly
    /// what was sent.
    pub fn into_element(self, submitted: Element) -> EnvelopeResult<Element> {
        if !self.success {
            return Err(EnvelopeError::persistence_failed(
                self.message.unwrap_or_else(|| "update was not accepted".to_string()),
            ));
        }
        Ok(self.data.unwrap_or(submitted))
    }
}

/// Port for persisting a whole element (never a partial update).
#[cfg_attr(test, mockall::automock)]
pub trait ElementStore {
    fn update_element(&mut self, location: &ElementLocation, element: &Element) -> EnvelopeResult<UpdateResponse>;
}

/// Send an element to the store and return the authoritative copy.
///
/// Every failure, rejected request or refused update alike, comes back as
/// [`EnvelopeError::PersistenceFailed`].
pub fn persist(store: &mut dyn ElementStore, location: &ElementLocation, element: Element) -> EnvelopeResult<Element> {
    let response = match store.update_element(location, &element) {
        Ok(response) => response,
        Err(e) => {
            warn!(location = %location, error = %e, "element update rejected");
            return Err(match e {
                EnvelopeError::PersistenceFailed { .. } => e,
                other => EnvelopeError::persistence_failed(other.to_string()),
            });
        }
    };
    response.into_element(element).inspect_err(|e| {
        warn!(location = %location, error = %e, "element update refused");
    })
}

impl ElementStore for Project {
    fn update_element(&mut self, location: &ElementLocation, element: &Element) -> EnvelopeResult<UpdateResponse> {
        if element.id != location.element_id {
            return Ok(UpdateResponse::failed("element id does not match its location"));
        }
        if let Err(e) = element.configuration.validate() {
            return Ok(UpdateResponse::failed(e.to_string()));
        }
        let Some(stored) = self.element_mut(location) else {
            return Ok(UpdateResponse::failed(format!("element {} not found", location.element_id)));
        };
        *stored = element.clone();
        debug!(location = %location, layers = element.layers.len(), "element stored");
        Ok(UpdateResponse::ok(element.clone()))
    }
}
