//! Positional tag scanning.
//!
//! Tags are never turned into a tree: they are located by pattern and
//! described by byte offsets into the buffer.

use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::OnceLock;

/// A closing tag, or an opening tag `[name]` / `[name=param]` whose name
/// holds no `/`, `[` or `]`; whichever starts first
const TAG_PATTERN: &str = r"\[(?:/([^\[\]]*)|([^/\[\]]*?)(?:=[^\[\]]*)?)\]";

fn tag_regex() -> &'static Regex {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    TAG_REGEX.get_or_init(|| Regex::new(TAG_PATTERN).unwrap())
}

pub fn close_tag(name: &str) -> String {
    format!("[/{}]", name)
}

/// Case-folded tag name; two names match when their folds are equal
pub fn fold_name(name: &str) -> String {
    name.chars().flat_map(char::to_lowercase).collect()
}

/// Opening tag of a user mention; it is closed by `[/user]`
pub const NOTIFICATION_TAG: &str = "user notified";
pub const NOTIFICATION_CLOSE: &str = "[/user notified]";
pub const USER_CLOSE: &str = "[/user]";

/// Folded name of the closing tag that matches a tag called `name`
pub fn closer_name(name: &str) -> String {
    let name = fold_name(name);
    if name == NOTIFICATION_TAG {
        "user".to_string()
    } else {
        name
    }
}

/// A tag token, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagToken {
    Open { name: String, span: Range<usize> },
    Close { name: String, span: Range<usize> },
}

impl TagToken {
    pub fn name(&self) -> &str {
        match self {
            TagToken::Open { name, .. } | TagToken::Close { name, .. } => name,
        }
    }

    pub fn span(&self) -> Range<usize> {
        match self {
            TagToken::Open { span, .. } | TagToken::Close { span, .. } => span.clone(),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, TagToken::Open { .. })
    }
}

/// All opening and closing tags of `text`, left to right
pub fn tokens(text: &str) -> Vec<TagToken> {
    tag_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let span = caps.get(0)?.range();
            if let Some(name) = caps.get(1) {
                Some(TagToken::Close {
                    name: name.as_str().to_string(),
                    span,
                })
            } else {
                let name = caps.get(2)?.as_str();
                // `[*]` marks a list item, not an opening tag
                if name == "*" && span.len() == 3 {
                    return None;
                }
                Some(TagToken::Open {
                    name: name.to_string(),
                    span,
                })
            }
        })
        .collect()
}

/// Closing tags of a token list, grouped by folded name
#[derive(Debug, Default)]
pub struct CloserIndex {
    by_name: HashMap<String, Vec<usize>>,
}

impl CloserIndex {
    pub fn new(tokens: &[TagToken]) -> Self {
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, token) in tokens.iter().enumerate() {
            if !token.is_open() {
                by_name.entry(fold_name(token.name())).or_default().push(idx);
            }
        }
        Self { by_name }
    }

    /// Index of the first closing tag named `name` in the token range `after+1..before`
    pub fn first_between(&self, name: &str, after: usize, before: usize) -> Option<usize> {
        let indices = self.by_name.get(&fold_name(name))?;
        let first = indices.partition_point(|&idx| idx <= after);
        indices.get(first).copied().filter(|&idx| idx < before)
    }
}

/// Case-insensitive search for `needle` in `text[from..]`
pub fn find_ignore_case(text: &str, from: usize, needle: &str) -> Option<Range<usize>> {
    let first = needle.chars().next()?;
    text[from..]
        .char_indices()
        .filter(|&(_, ch)| chars_eq_ignore_case(ch, first))
        .find_map(|(idx, _)| {
            let start = from + idx;
            match_len_ignore_case(&text[start..], needle).map(|len| start..start + len)
        })
}

/// Replace every case-insensitive occurrence of `needle` with `replacement`
pub fn replace_ignore_case(text: &str, needle: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while let Some(found) = find_ignore_case(text, pos, needle) {
        out.push_str(&text[pos..found.start]);
        out.push_str(replacement);
        pos = found.end;
    }
    out.push_str(&text[pos..]);
    out
}

fn match_len_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    let mut hay = haystack.char_indices();
    for n in needle.chars() {
        let (_, h) = hay.next()?;
        if !chars_eq_ignore_case(h, n) {
            return None;
        }
    }
    Some(hay.next().map(|(idx, _)| idx).unwrap_or(haystack.len()))
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}
