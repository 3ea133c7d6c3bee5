//! Tag insertion around a selection.
//!
//! Every operation takes the buffer and a selection and returns the new
//! buffer together with the selection the input should show afterwards.

use crate::error::BbResult;
use crate::fragment::{Fragment, LIST_CLOSE, LIST_ITEM, LIST_OPEN};
use crate::selection::{byte_offset, char_len, Selection};
use regex::Regex;
use std::sync::OnceLock;

/// Result of an insertion: the rewritten buffer and the new selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub text: String,
    pub selection: Selection,
}

/// Insert `fragment` into `text` at `selection`.
///
/// `dummy` is the placeholder label used when nothing is selected.
pub fn insert(text: &str, selection: Selection, fragment: &Fragment, dummy: &str) -> BbResult<Edit> {
    selection.check(text)?;

    let edit = match fragment {
        Fragment::List => insert_list(text, selection, dummy),
        Fragment::Image { .. } => {
            tracing::trace!(at = selection.end, "appending image fragment");
            let inserted = format!("{}{}", fragment.open(), fragment.close());
            let caret = selection.end + char_len(&inserted);
            Edit {
                text: splice(text, selection.end, selection.end, &inserted),
                selection: Selection::caret(caret),
            }
        }
        Fragment::Link { label, .. } => {
            let selected = selection.slice(text);
            if selection.is_empty() || selected.replace('\n', "") != *label {
                // Intentionally not wrapped: a selection other than the label
                // stays in place and the link follows it (DESIGN.md, link rule 3)
                tracing::trace!(at = selection.end, "inserting link with remembered label");
                surround(text, Selection::caret(selection.end), fragment, label)
            } else {
                wrap(text, selection, fragment)
            }
        }
        Fragment::Pair { .. } => {
            if selection.is_empty() {
                surround(text, selection, fragment, dummy)
            } else {
                wrap(text, selection, fragment)
            }
        }
    };

    Ok(edit)
}

/// Wrap the selected text in the fragment; the selection keeps covering it
fn wrap(text: &str, selection: Selection, fragment: &Fragment) -> Edit {
    let open = fragment.open();
    let selected = selection.slice(text);
    let replacement = format!("{}{}{}", open, selected, fragment.close());
    let shift = char_len(&open);

    Edit {
        text: splice(text, selection.start, selection.end, &replacement),
        selection: Selection {
            start: selection.start + shift,
            end: selection.end + shift,
        },
    }
}

/// Insert `open + inner + close` at a caret and select `inner`
fn surround(text: &str, caret: Selection, fragment: &Fragment, inner: &str) -> Edit {
    let open = fragment.open();
    let replacement = format!("{}{}{}", open, inner, fragment.close());
    let start = caret.start + char_len(&open);

    Edit {
        text: splice(text, caret.start, caret.start, &replacement),
        selection: Selection {
            start,
            end: start + char_len(inner),
        },
    }
}

fn list_open_regex() -> &'static Regex {
    static LIST_OPEN_REGEX: OnceLock<Regex> = OnceLock::new();
    LIST_OPEN_REGEX.get_or_init(|| Regex::new(r"(?i)\[list\]\[\*\]").unwrap())
}

fn list_close_regex() -> &'static Regex {
    static LIST_CLOSE_REGEX: OnceLock<Regex> = OnceLock::new();
    LIST_CLOSE_REGEX.get_or_init(|| Regex::new(r"(?i)\[/list\]").unwrap())
}

const LIST_OPEN_LAID_OUT: &str = "[list]\n[*]";
const LIST_CLOSE_LAID_OUT: &str = "\n[/list]";

/// Wrap the selection (or the dummy label) in a list, one item per line
fn insert_list(text: &str, selection: Selection, dummy: &str) -> Edit {
    let body = if selection.is_empty() {
        dummy.to_string()
    } else {
        let selected = selection.slice(text);
        if selected.contains('\n') {
            // Leading line breaks would produce empty first items
            selected.trim_start_matches('\n').replace('\n', LIST_ITEM)
        } else {
            selected.to_string()
        }
    };

    let span = format!("{}{}{}", LIST_OPEN, body, LIST_CLOSE);
    let span = list_open_regex().replace_all(&span, LIST_OPEN_LAID_OUT);
    let span = list_close_regex().replace_all(&span, LIST_CLOSE_LAID_OUT);

    tracing::trace!(items = span.matches(LIST_ITEM).count(), "inserting list");

    let start = selection.start + char_len(LIST_OPEN_LAID_OUT);
    let end = selection.start + char_len(&span) - char_len(LIST_CLOSE_LAID_OUT);

    Edit {
        text: splice(text, selection.start, selection.end, &span),
        selection: Selection { start, end },
    }
}

/// Replace the characters `start..end` of `text` with `replacement`
fn splice(text: &str, start: usize, end: usize, replacement: &str) -> String {
    let from = byte_offset(text, start);
    let to = byte_offset(text, end);
    let mut out = String::with_capacity(text.len() + replacement.len());
    out.push_str(&text[..from]);
    out.push_str(replacement);
    out.push_str(&text[to..]);
    out
}
