//! Payload handling around the remote preview call.
//!
//! The call itself is made by the host. This module prepares the text that
//! is sent and decodes what comes back. Already-encoded brackets, quotes and
//! `<` typed by the user are swapped for placeholder tokens on the way out,
//! so the server does not take them for markup, and restored on the way back.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::error::BbResult;
use crate::scan::replace_ignore_case;

pub const CLOSE_BRACKET_PLACEHOLDER: &str = "@w0956756wo@";
pub const OPEN_BRACKET_PLACEHOLDER: &str = "@ywdffgg434y@";
pub const QUOTE_PLACEHOLDER: &str = "14@123435vggv4f";
pub const LESS_THAN_PLACEHOLDER: &str = "gertfgertgf@@@@@#4324234";

/// Characters `encodeURI` leaves alone, besides ASCII alphanumerics
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#');

/// Encode buffer text for the preview request
pub fn protect(text: &str) -> String {
    let padded = format!(" {}", text);
    let padded = replace_ignore_case(&padded, "%5D", CLOSE_BRACKET_PLACEHOLDER);
    let padded = replace_ignore_case(&padded, "%5B", OPEN_BRACKET_PLACEHOLDER);
    let padded = replace_ignore_case(&padded, "%22", QUOTE_PLACEHOLDER);
    let padded = padded.replace('<', LESS_THAN_PLACEHOLDER);

    let encoded = utf8_percent_encode(&padded, URI_COMPONENT).to_string();

    encoded
        .replace("%5D", "]")
        .replace("%5B", "[")
        .replace("%22", "\"")
        .replace("%20", " ")
}

/// Characters whose escapes `decodeURI` leaves encoded
const RESERVED: &[u8] = b";/?:@&=+$,#";

/// Percent-decode `text` like `decodeURI`: escapes of reserved characters stay as they are
fn decode_uri(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut chunk_start = 0;
    let mut idx = 0;

    while idx + 2 < bytes.len() {
        let reserved = bytes[idx] == b'%'
            && std::str::from_utf8(&bytes[idx + 1..idx + 3])
                .ok()
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .is_some_and(|byte| RESERVED.contains(&byte));
        if reserved {
            out.push_str(&percent_decode_str(&text[chunk_start..idx]).decode_utf8_lossy());
            out.push_str(&text[idx..idx + 3]);
            idx += 3;
            chunk_start = idx;
        } else {
            idx += 1;
        }
    }

    out.push_str(&percent_decode_str(&text[chunk_start..]).decode_utf8_lossy());
    out
}

/// Decode the converted markup returned by the preview call
pub fn restore(html: &str) -> String {
    let decoded = decode_uri(html);
    let decoded = replace_ignore_case(&decoded, CLOSE_BRACKET_PLACEHOLDER, "%5D");
    let decoded = replace_ignore_case(&decoded, OPEN_BRACKET_PLACEHOLDER, "%5B");
    let decoded = replace_ignore_case(&decoded, QUOTE_PLACEHOLDER, "%22");
    let decoded = replace_ignore_case(&decoded, LESS_THAN_PLACEHOLDER, "&lt;");
    decoded.trim().to_string()
}

/// Pick the preview endpoint for a form.
///
/// The first path segment of `form_action` found in `allowed` wins,
/// otherwise the first allowed entry is used.
pub fn preview_endpoint(root: &str, allowed: &[&str], form_action: &str) -> Option<String> {
    let path = match form_action.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map(|(_, path)| path).unwrap_or(""),
        None => form_action,
    };
    let path = path.split(['?', '#']).next().unwrap_or("");

    let segment = path
        .split('/')
        .filter(|s| !s.is_empty())
        .find(|s| allowed.contains(s))
        .or_else(|| allowed.first().copied())?;

    Some(format!("{}/{}/bbToHtml", root.trim_end_matches('/'), segment))
}

/// Form data posted to the preview endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewRequest {
    #[serde(skip)]
    pub endpoint: String,
    #[serde(rename = "bodyText")]
    pub body_text: String,
}

impl PreviewRequest {
    /// Build a request for already balanced `text`
    pub fn new(endpoint: String, text: &str) -> Self {
        Self {
            endpoint,
            body_text: protect(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(rename = "defaultMessage")]
    pub default_message: String,
}

/// JSON body returned by the preview endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewResponse {
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub is_invalid: bool,
    #[serde(default)]
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewOutcome {
    /// Markup ready to be shown
    Rendered(String),
    /// Validation messages to show next to the editor
    Invalid(Vec<String>),
}

impl PreviewResponse {
    pub fn from_json(json: &str) -> BbResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_outcome(self) -> PreviewOutcome {
        if self.is_invalid {
            PreviewOutcome::Invalid(self.errors.into_iter().map(|e| e.default_message).collect())
        } else {
            PreviewOutcome::Rendered(restore(&self.html))
        }
    }
}
