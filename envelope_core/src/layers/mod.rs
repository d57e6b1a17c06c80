//! # Layer Editing
//!
//! Editing an element's layer build-up:
//!
//! - [`editor`]: the add/edit dialog with cascading catalog selection
//! - [`pager`]: the paged list with drag-reorder and delete
//!
//! Both hand the complete updated element to an
//! [`ElementStore`](crate::store::ElementStore) and adopt its answer.

pub mod editor;
pub mod pager;

pub use editor::{parse_thickness, EditMode, EditSession, EditorState, LayerEditor};
pub use pager::{move_item, LayerPager, ReorderOutcome, DEFAULT_PAGE_SIZE};
