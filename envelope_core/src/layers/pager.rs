//! Paged layer list with drag-reorder and delete.
//!
//! Layers are shown in fixed-size pages. Drag events report in-page indices,
//! which are turned into absolute indices with
//! `(page - 1) * page_size + in_page_index`.
//!
//! Reorders are applied optimistically and rolled back when the store
//! refuses them. Deletes are applied only after the store accepts them.

use std::ops::Range;

use tracing::{debug, info, instrument, warn};

use crate::element::{Element, Layer};
use crate::errors::{EnvelopeError, EnvelopeResult};
use crate::project::ElementLocation;
use crate::store::{persist, ElementStore};

/// Layers per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Move the item at `from` so that it ends up at `to`, shifting the rest.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// What a reorder request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// Source and destination were the same; nothing was sent.
    NoOp,
    /// Absolute indices of the move
    Moved { from: usize, to: usize },
}

/// Current page of an element's layer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerPager {
    page_size: usize,
    /// 1-based
    page: usize,
}

impl Default for LayerPager {
    fn default() -> Self {
        LayerPager::new(DEFAULT_PAGE_SIZE)
    }
}

impl LayerPager {
    /// A pager on page 1. A zero page size is treated as 1.
    pub fn new(page_size: usize) -> Self {
        LayerPager {
            page_size: page_size.max(1),
            page: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Number of pages for `total` layers. An empty list still has one page.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// Go to a page, clamped into `1..=page_count`. Returns the page shown.
    pub fn set_page(&mut self, page: usize, total: usize) -> usize {
        self.page = page.clamp(1, self.page_count(total));
        self.page
    }

    /// Absolute index range of the current page.
    pub fn page_range(&self, total: usize) -> Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }

    /// Layers on the current page
    pub fn page_items<'a>(&self, layers: &'a [Layer]) -> &'a [Layer] {
        &layers[self.page_range(layers.len())]
    }

    pub fn absolute_index(&self, in_page_index: usize) -> usize {
        (self.page - 1) * self.page_size + in_page_index
    }

    /// 1-based page holding an absolute index
    pub fn page_of(&self, absolute_index: usize) -> usize {
        absolute_index / self.page_size + 1
    }

    /// Drag a layer within the list.
    ///
    /// The element is updated before the store is called and restored if
    /// the store refuses. After a successful move the pager follows the
    /// moved layer to its new page.
    #[instrument(skip_all, fields(location = %location, page = self.page))]
    pub fn reorder(
        &mut self,
        element: &mut Element,
        location: &ElementLocation,
        store: &mut dyn ElementStore,
        from_in_page: usize,
        to_in_page: usize,
    ) -> EnvelopeResult<ReorderOutcome> {
        let from = self.absolute_index(from_in_page);
        let to = self.absolute_index(to_in_page);
        if from == to {
            debug!(index = from, "reorder onto itself ignored");
            return Ok(ReorderOutcome::NoOp);
        }
        let len = element.layers.len();
        for index in [from, to] {
            if index >= len {
                return Err(EnvelopeError::IndexOutOfRange { index, len });
            }
        }

        let snapshot = element.layers.clone();
        move_item(&mut element.layers, from, to);

        match persist(store, location, element.clone()) {
            Ok(stored) => {
                *element = stored;
                let target_page = self.page_of(to);
                if target_page != self.page {
                    self.set_page(target_page, element.layers.len());
                }
                info!(from, to, page = self.page, "layer moved");
                Ok(ReorderOutcome::Moved { from, to })
            }
            Err(e) => {
                element.layers = snapshot;
                warn!(from, to, error = %e, "layer move rolled back");
                Err(e)
            }
        }
    }

    /// Delete the layer at an in-page index.
    ///
    /// The element only changes once the store accepts the shorter list.
    /// The current page is clamped if it no longer exists.
    #[instrument(skip_all, fields(location = %location, page = self.page))]
    pub fn delete(
        &mut self,
        element: &mut Element,
        location: &ElementLocation,
        store: &mut dyn ElementStore,
        in_page_index: usize,
    ) -> EnvelopeResult<Layer> {
        let index = self.absolute_index(in_page_index);
        let len = element.layers.len();
        if index >= len {
            return Err(EnvelopeError::IndexOutOfRange { index, len });
        }

        let mut updated = element.clone();
        let removed = updated.layers.remove(index);
        let stored = persist(store, location, updated).inspect_err(|e| {
            warn!(index, error = %e, "layer delete failed");
        })?;
        *element = stored;
        self.set_page(self.page, element.layers.len());
        info!(index, layer_id = %removed.id, page = self.page, "layer deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementConfiguration, ElementType};
    use crate::store::{MockElementStore, UpdateResponse};
    use uuid::Uuid;

    fn element_with_layers(count: usize) -> Element {
        let mut element = Element::new("Wall", ElementConfiguration::new(ElementType::Wall));
        element.layers = (1..=count).map(Layer::placeholder).collect();
        element
    }

    fn location(element: &Element) -> ElementLocation {
        ElementLocation {
            project_id: Uuid::new_v4(),
            type_id: Uuid::new_v4(),
            space_id: Uuid::new_v4(),
            element_id: element.id,
        }
    }

    fn accepting_store() -> MockElementStore {
        let mut store = MockElementStore::new();
        store
            .expect_update_element()
            .returning(|_, element| Ok(UpdateResponse::ok(element.clone())));
        store
    }

    fn ids(layers: &[Layer]) -> Vec<Uuid> {
        layers.iter().map(|layer| layer.id).collect()
    }

    #[test]
    fn test_move_item() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        move_item(&mut items, 0, 2);
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);
        move_item(&mut items, 3, 0);
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);
        move_item(&mut items, 1, 9);
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);
    }

    #[test]
    fn test_paging_arithmetic() {
        let mut pager = LayerPager::default();
        assert_eq!(pager.page_count(0), 1);
        assert_eq!(pager.page_count(5), 1);
        assert_eq!(pager.page_count(12), 3);
        assert_eq!(pager.set_page(7, 12), 3);
        assert_eq!(pager.page_range(12), 10..12);
        assert_eq!(pager.absolute_index(1), 11);
        assert_eq!(pager.page_of(4), 1);
        assert_eq!(pager.page_of(5), 2);
        assert_eq!(pager.set_page(0, 12), 1);
    }

    #[test]
    fn test_page_items() {
        let element = element_with_layers(7);
        let mut pager = LayerPager::default();
        pager.set_page(2, 7);
        let page = pager.page_items(&element.layers);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].name, "Layer 6");
    }

    #[test]
    fn test_reorder_matches_splice_and_follows_item() {
        let mut element = element_with_layers(12);
        let mut expected = ids(&element.layers);
        let moved = expected.remove(2);
        expected.insert(9, moved);

        let mut pager = LayerPager::default();
        let mut store = accepting_store();
        let loc = location(&element);
        let outcome = pager
            .reorder(&mut element, &loc, &mut store, 2, 9)
            .unwrap();

        assert_eq!(outcome, ReorderOutcome::Moved { from: 2, to: 9 });
        assert_eq!(ids(&element.layers), expected);
        assert_eq!(pager.page(), 2);
    }

    #[test]
    fn test_reorder_rolls_back_on_refusal() {
        let mut element = element_with_layers(12);
        let before = element.clone();
        let mut store = MockElementStore::new();
        store
            .expect_update_element()
            .times(1)
            .returning(|_, _| Ok(UpdateResponse::failed("conflict")));

        let mut pager = LayerPager::default();
        let loc = location(&element);
        let err = pager
            .reorder(&mut element, &loc, &mut store, 2, 9)
            .unwrap_err();

        assert_eq!(err.error_code(), "PERSISTENCE_FAILED");
        assert_eq!(element, before);
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn test_reorder_in_place_sends_nothing() {
        let mut element = element_with_layers(3);
        let mut store = MockElementStore::new();
        store.expect_update_element().never();

        let mut pager = LayerPager::default();
        let loc = location(&element);
        let outcome = pager
            .reorder(&mut element, &loc, &mut store, 1, 1)
            .unwrap();
        assert_eq!(outcome, ReorderOutcome::NoOp);
    }

    #[test]
    fn test_reorder_uses_current_page() {
        let mut element = element_with_layers(8);
        let mut pager = LayerPager::default();
        pager.set_page(2, 8);
        let mut store = accepting_store();

        let moved = element.layers[6].id;
        let loc = location(&element);
        pager
            .reorder(&mut element, &loc, &mut store, 1, 0)
            .unwrap();
        assert_eq!(element.layers[5].id, moved);
        assert_eq!(pager.page(), 2);
    }

    #[test]
    fn test_reorder_out_of_range() {
        let mut element = element_with_layers(3);
        let mut store = MockElementStore::new();
        store.expect_update_element().never();
        let mut pager = LayerPager::default();
        let loc = location(&element);
        let err = pager
            .reorder(&mut element, &loc, &mut store, 0, 4)
            .unwrap_err();
        assert_eq!(err, EnvelopeError::IndexOutOfRange { index: 4, len: 3 });
    }

    #[test]
    fn test_delete_last_item_clamps_page() {
        let mut element = element_with_layers(6);
        let mut pager = LayerPager::default();
        pager.set_page(2, 6);
        let mut store = accepting_store();

        let loc = location(&element);
        let removed = pager
            .delete(&mut element, &loc, &mut store, 0)
            .unwrap();
        assert_eq!(removed.name, "Layer 6");
        assert_eq!(element.layers.len(), 5);
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn test_refused_delete_keeps_layers() {
        let mut element = element_with_layers(4);
        let before = element.clone();
        let mut store = MockElementStore::new();
        store
            .expect_update_element()
            .returning(|_, _| Err(EnvelopeError::Internal { message: "timeout".into() }));

        let mut pager = LayerPager::default();
        let loc = location(&element);
        assert!(pager.delete(&mut element, &loc, &mut store, 1).is_err());
        assert_eq!(element, before);
    }
}
