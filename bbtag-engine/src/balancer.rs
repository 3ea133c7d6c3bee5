//! Closing of unbalanced markup.
//!
//! The balancer closes the first unmatched opening tag, balances what lies
//! between that tag and its closer, then carries on with whatever follows
//! the closer. Missing closers are appended to the end of the segment being
//! balanced, so they land right before the enclosing tag's closer.
//!
//! Example: `some [size=10][i]text for[/size] a [b]example` becomes
//! `some [size=10][i]text for[/i][/size] a [b]example[/b]`.
//!
//! Nesting depth is bounded only by the input: segments are kept on an
//! explicit stack, never on the call stack.

use std::collections::HashMap;

use crate::config::{builtin_defaults, DefaultParam};
use crate::fragment::LIST_ITEM;
use crate::scan::{self, CloserIndex, TagToken, NOTIFICATION_CLOSE, USER_CLOSE};

/// Stands in for `[*]` while tags are matched, so list items are not taken for openers
const LIST_ITEM_SENTINEL: &str = "\u{E000}li\u{E000}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balancer {
    defaults: Vec<DefaultParam>,
}

impl Default for Balancer {
    fn default() -> Self {
        Self::new(builtin_defaults())
    }
}

impl Balancer {
    pub fn new(defaults: Vec<DefaultParam>) -> Self {
        Self { defaults }
    }

    /// Return `text` with every opening tag closed.
    ///
    /// Never fails: malformed markup is always coerced into a closed form.
    pub fn balance(&self, text: &str) -> String {
        let protected = text.replace(LIST_ITEM, LIST_ITEM_SENTINEL);

        let balanced = close_until_stable(protected);
        let balanced = self.fill_defaults(balanced);

        balanced.replace(LIST_ITEM_SENTINEL, LIST_ITEM)
    }

    /// `[size]` becomes `[size=10]` and so on
    fn fill_defaults(&self, text: String) -> String {
        self.defaults.iter().fold(text, |acc, param| {
            let bare = format!("[{}]", param.tag);
            let filled = format!("[{}={}]", param.tag, param.value);
            scan::replace_ignore_case(&acc, &bare, &filled)
        })
    }
}

/// Run closing rounds until one leaves the text as it found it.
///
/// Dropping a stray closer can splice the text around it into a new tag
/// (`[[/x]b]` leaves `[b]`), which the next round then closes. Each splice
/// turns a `[` that was plain text into a tag, so the rounds are capped by
/// the number of `[` in the input.
fn close_until_stable(mut text: String) -> String {
    let max_rounds = 2 * text.matches('[').count() + 2;
    for _ in 0..max_rounds {
        let next = close_round(&text);
        if next == text {
            break;
        }
        text = next;
    }
    text
}

fn close_round(text: &str) -> String {
    let balanced = close_segments(text);
    let balanced = balanced.replace(NOTIFICATION_CLOSE, USER_CLOSE);
    drop_surplus_closers(&balanced)
}

/// A segment being balanced: the tokens `next..end_tok` and the text up to `hi`
struct Segment {
    pos: usize,
    hi: usize,
    next: usize,
    end_tok: usize,
    /// Emitted once the segment is done
    closer: String,
}

fn close_segments(text: &str) -> String {
    let tokens = scan::tokens(text);
    let closers = CloserIndex::new(&tokens);
    let mut out = String::with_capacity(text.len());
    let mut stack = vec![Segment {
        pos: 0,
        hi: text.len(),
        next: 0,
        end_tok: tokens.len(),
        closer: String::new(),
    }];

    while let Some(segment) = stack.last_mut() {
        // Closers met here match nothing in this segment and stay as text
        let opener = (segment.next..segment.end_tok).find(|&idx| tokens[idx].is_open());

        let Some(open_idx) = opener else {
            out.push_str(&text[segment.pos..segment.hi]);
            out.push_str(&segment.closer);
            stack.pop();
            continue;
        };

        let open = &tokens[open_idx];
        let span = open.span();
        let name = open.name();
        out.push_str(&text[segment.pos..span.end]);

        let inner = match closers.first_between(name, open_idx, segment.end_tok) {
            Some(close_idx) => {
                let close = tokens[close_idx].span();
                segment.pos = close.end;
                segment.next = close_idx + 1;
                Segment {
                    pos: span.end,
                    hi: close.start,
                    next: open_idx + 1,
                    end_tok: close_idx,
                    closer: text[close].to_string(),
                }
            }
            None => {
                tracing::debug!(tag = %name, "closing unmatched tag");
                let inner = Segment {
                    pos: span.end,
                    hi: segment.hi,
                    next: open_idx + 1,
                    end_tok: segment.end_tok,
                    closer: scan::close_tag(name),
                };
                segment.pos = segment.hi;
                segment.next = segment.end_tok;
                inner
            }
        };
        stack.push(inner);
    }

    out
}

/// Remove closing tags that close nothing
fn drop_surplus_closers(text: &str) -> String {
    let mut pending: HashMap<String, usize> = HashMap::new();
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    for token in scan::tokens(text) {
        let key = scan::closer_name(token.name());
        match token {
            TagToken::Open { .. } => *pending.entry(key).or_insert(0) += 1,
            TagToken::Close { span, name } => match pending.get_mut(&key) {
                Some(count) if *count > 0 => *count -= 1,
                _ => {
                    tracing::debug!(tag = %name, "dropping closing tag without opener");
                    out.push_str(&text[pos..span.start]);
                    pos = span.end;
                }
            },
        }
    }

    out.push_str(&text[pos..]);
    out
}

/// Balance `text` with the built-in default parameters
pub fn balance(text: &str) -> String {
    Balancer::default().balance(text)
}
