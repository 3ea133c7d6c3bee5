use crate::error::{BbError, BbResult};

pub const IMAGE_OPEN: &str = "[img]";
pub const IMAGE_CLOSE: &str = "[/img]";
pub const LINK_CLOSE: &str = "[/url]";
pub const LIST_OPEN: &str = "[list][*]";
pub const LIST_CLOSE: &str = "[/list]";
pub const LIST_ITEM: &str = "[*]";

/// What an insertion action puts around the selection.
///
/// The kind is decided when the action starts, so the insertion rules never
/// have to look at the literal closing text again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Plain opening/closing pair. An empty `close` is an unpaired fragment such as `[*]`.
    Pair { open: String, close: String },
    /// Image: the URL travels inside the opening fragment, nothing gets wrapped
    Image { url: String },
    /// Link to `url`. `label` is the value remembered from the link dialog.
    Link { url: String, label: String },
    /// Bulleted list; line breaks in the selection become list items
    List,
}

impl Fragment {
    pub fn pair(open: impl Into<String>, close: impl Into<String>) -> Self {
        Fragment::Pair {
            open: open.into(),
            close: close.into(),
        }
    }

    /// `[name]` ... `[/name]`
    pub fn tag(name: &str) -> Self {
        Self::pair(format!("[{}]", name), format!("[/{}]", name))
    }

    /// `[name=value]` ... `[/name]`
    pub fn tag_with_value(name: &str, value: &str) -> Self {
        Self::pair(format!("[{}={}]", name, value), format!("[/{}]", name))
    }

    pub fn list_item() -> Self {
        Self::pair(LIST_ITEM, "")
    }

    pub fn open(&self) -> String {
        match self {
            Fragment::Pair { open, .. } => open.clone(),
            Fragment::Image { url } => format!("{}{}", IMAGE_OPEN, url),
            Fragment::Link { url, .. } => format!("[url={}]", url),
            Fragment::List => LIST_OPEN.to_string(),
        }
    }

    pub fn close(&self) -> &str {
        match self {
            Fragment::Pair { close, .. } => close,
            Fragment::Image { .. } => IMAGE_CLOSE,
            Fragment::Link { .. } => LINK_CLOSE,
            Fragment::List => LIST_CLOSE,
        }
    }
}

/// Toolbar commands that insert a fragment without a dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Bold,
    Italic,
    Underline,
    LineThrough,
    Highlight,
    Left,
    Center,
    Right,
    Quote,
    List,
    ListElement,
    Size(String),
    Code(String),
    Indent(String),
    /// Upper-case hex colour without `#`
    Color(String),
}

impl Command {
    /// Parse a command name as used by the toolbar and the CLI.
    ///
    /// `size`, `code`, `indent` and `color` need a value.
    pub fn from_name(name: &str, value: Option<&str>) -> BbResult<Self> {
        let needs_value = || {
            value
                .map(str::to_string)
                .ok_or_else(|| BbError::MissingCommandValue {
                    command: name.to_string(),
                })
        };

        let command = match name {
            "bold" => Command::Bold,
            "italic" => Command::Italic,
            "underline" => Command::Underline,
            "line-through" => Command::LineThrough,
            "highlight" => Command::Highlight,
            "left" => Command::Left,
            "center" => Command::Center,
            "right" => Command::Right,
            "quote" => Command::Quote,
            "list" => Command::List,
            "list-element" => Command::ListElement,
            "size" => Command::Size(needs_value()?),
            "code" => Command::Code(needs_value()?),
            "indent" => Command::Indent(needs_value()?),
            "color" => Command::Color(needs_value()?),
            _ => {
                return Err(BbError::UnknownCommand {
                    command: name.to_string(),
                })
            }
        };
        Ok(command)
    }

    pub fn fragment(&self) -> Fragment {
        match self {
            Command::Bold => Fragment::tag("b"),
            Command::Italic => Fragment::tag("i"),
            Command::Underline => Fragment::tag("u"),
            Command::LineThrough => Fragment::tag("s"),
            Command::Highlight => Fragment::tag("highlight"),
            Command::Left => Fragment::tag("left"),
            Command::Center => Fragment::tag("center"),
            Command::Right => Fragment::tag("right"),
            Command::Quote => Fragment::tag("quote"),
            Command::List => Fragment::List,
            Command::ListElement => Fragment::list_item(),
            Command::Size(size) => Fragment::tag_with_value("size", size),
            Command::Code(lang) => Fragment::tag_with_value("code", lang),
            Command::Indent(indent) => Fragment::tag_with_value("indent", indent),
            Command::Color(hex) => Fragment::tag_with_value("color", hex),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_texts() {
        let image = Fragment::Image {
            url: "http://x/a.png".to_string(),
        };
        assert_eq!(image.open(), "[img]http://x/a.png");
        assert_eq!(image.close(), "[/img]");

        let link = Fragment::Link {
            url: "http://x".to_string(),
            label: "x".to_string(),
        };
        assert_eq!(link.open(), "[url=http://x]");
        assert_eq!(link.close(), "[/url]");

        assert_eq!(Fragment::list_item().close(), "");
    }

    #[test]
    fn test_command_fragments() {
        assert_eq!(Command::Bold.fragment(), Fragment::pair("[b]", "[/b]"));
        assert_eq!(
            Command::Size("14".into()).fragment(),
            Fragment::pair("[size=14]", "[/size]")
        );
        assert_eq!(Command::List.fragment(), Fragment::List);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            Command::from_name("line-through", None),
            Ok(Command::LineThrough)
        );
        assert_eq!(
            Command::from_name("code", Some("java")),
            Ok(Command::Code("java".into()))
        );
        assert_eq!(
            Command::from_name("size", None),
            Err(BbError::MissingCommandValue {
                command: "size".into()
            })
        );
        assert!(matches!(
            Command::from_name("blink", None),
            Err(BbError::UnknownCommand { .. })
        ));
    }
}
