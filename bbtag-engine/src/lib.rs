//! # BBCode tag engine
//!
//! The markup core of a BBCode editing widget.
//!
//! ## Features
//! - Tag insertion around a selection, with dummy labels for empty selections
//!   and special handling for links, images and lists
//! - Balancing of unclosed markup before submission, with default
//!   parameters for bare `[size]`, `[color]`, `[url]` and `[indent]`
//! - Placeholder protection for the remote preview round trip
//! - YAML configuration of the dummy label, tag catalog and defaults
//!
//! ## Example: balancing
//! ```
//! use bbtag_engine::balance;
//!
//! assert_eq!(balance("[b][i]x[/i]"), "[b][i]x[/i][/b]");
//! ```
//!
//! ## Example: insertion
//! ```
//! use bbtag_engine::{insert, Fragment, Selection};
//!
//! let edit = insert("world", Selection { start: 0, end: 5 }, &Fragment::tag("b"), "text").unwrap();
//! assert_eq!(edit.text, "[b]world[/b]");
//! assert_eq!(edit.selection, Selection { start: 3, end: 8 });
//! ```

pub mod balancer;
pub mod color;
pub mod config;
pub mod editor;
pub mod error;
pub mod fragment;
pub mod insert;
pub mod preview;
pub mod registry;
pub mod scan;
pub mod selection;

// --- Core types ---
pub use balancer::Balancer;
pub use config::{DefaultParam, EditorConfig};
pub use editor::{Editor, ModalAction, PlainTextInput, TextInput};
pub use error::{BbError, BbResult};
pub use fragment::{Command, Fragment};
pub use insert::Edit;
pub use preview::{PreviewOutcome, PreviewRequest, PreviewResponse};
pub use registry::{BbTag, TagRegistry};
pub use selection::Selection;

/// Close every open tag in `text`, using the built-in default parameters
pub fn balance(text: &str) -> String {
    balancer::balance(text)
}

/// Insert `fragment` at `selection`; `dummy` fills an empty selection
pub fn insert(text: &str, selection: Selection, fragment: &Fragment, dummy: &str) -> BbResult<Edit> {
    insert::insert(text, selection, fragment, dummy)
}
