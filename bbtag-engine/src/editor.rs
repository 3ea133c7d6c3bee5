use crate::balancer::Balancer;
use crate::color;
use crate::config::EditorConfig;
use crate::error::{BbError, BbResult};
use crate::fragment::{Command, Fragment};
use crate::insert::{insert, Edit};
use crate::preview::{preview_endpoint, PreviewRequest};
use crate::registry::TagRegistry;
use crate::selection::{char_len, Selection};

/// The text input the editor works on.
///
/// Offsets are character offsets with line breaks normalized to `\n`,
/// whatever the platform selection API reports.
pub trait TextInput {
    fn text(&self) -> &str;
    fn set_text(&mut self, text: String);
    fn selection(&self) -> Selection;
    fn set_selection(&mut self, selection: Selection);
    /// Give the input keyboard focus. Inputs without focus keep the default no-op.
    fn focus(&mut self) {}
}

/// In-memory [`TextInput`], used by the CLI and in tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlainTextInput {
    text: String,
    selection: Selection,
    focused: bool,
}

impl PlainTextInput {
    /// Input holding `text` with the caret at the start
    pub fn new(text: &str) -> Self {
        Self {
            text: normalize_line_breaks(text),
            selection: Selection::caret(0),
            focused: false,
        }
    }

    pub fn with_selection(text: &str, start: usize, end: usize) -> BbResult<Self> {
        let mut input = Self::new(text);
        let selection = Selection::new(start, end)?;
        selection.check(&input.text)?;
        input.selection = selection;
        Ok(input)
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn selected_text(&self) -> &str {
        self.selection.slice(&self.text)
    }
}

impl TextInput for PlainTextInput {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = normalize_line_breaks(&text);
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}

fn normalize_line_breaks(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// A dialog-driven action in progress (link, image, colour).
///
/// Holds the selection taken when the dialog opened. Dropping it cancels
/// the action; the buffer is only touched on commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalAction {
    pub selection: Selection,
    /// Selected text, used to pre-fill the link label
    pub selected_text: String,
}

/// Editing session over a [`TextInput`]
pub struct Editor<I: TextInput> {
    input: I,
    config: EditorConfig,
    registry: TagRegistry,
    balancer: Balancer,
    preview_mode: bool,
}

impl<I: TextInput> Editor<I> {
    pub fn new(input: I, config: EditorConfig) -> Self {
        let registry = config.registry();
        let balancer = Balancer::new(config.defaults.clone());
        Self {
            input,
            config,
            registry,
            balancer,
            preview_mode: false,
        }
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn into_input(self) -> I {
        self.input
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// While the preview is shown every insertion is ignored
    pub fn set_preview_mode(&mut self, preview_mode: bool) {
        self.preview_mode = preview_mode;
    }

    pub fn is_preview_mode(&self) -> bool {
        self.preview_mode
    }

    /// Run a toolbar command on the current selection
    pub fn apply(&mut self, command: &Command) -> BbResult<()> {
        self.insert_fragment(&command.fragment(), self.input.selection())
    }

    /// Start a dialog-driven action on the current selection
    pub fn begin_modal(&self) -> ModalAction {
        let selection = self.input.selection();
        let text = self.input.text();
        let selected_text = match selection.check(text) {
            Ok(()) => selection.slice(text).to_string(),
            Err(_) => String::new(),
        };
        ModalAction {
            selection,
            selected_text,
        }
    }

    /// Insert a link. An empty `label` falls back to the URL.
    pub fn commit_link(&mut self, action: ModalAction, url: &str, label: &str) -> BbResult<()> {
        let url = url.trim();
        if url.is_empty() {
            return Err(BbError::EmptyUrl);
        }
        let label = if label.is_empty() { url } else { label };
        let fragment = Fragment::Link {
            url: url.to_string(),
            label: label.to_string(),
        };
        self.insert_fragment(&fragment, action.selection)
    }

    pub fn commit_image(&mut self, action: ModalAction, url: &str) -> BbResult<()> {
        let url = url.trim();
        if url.is_empty() {
            return Err(BbError::EmptyUrl);
        }
        let fragment = Fragment::Image {
            url: url.to_string(),
        };
        self.insert_fragment(&fragment, action.selection)
    }

    /// Wrap the selection in `[color=...]`; `css_color` is what the picker reports
    pub fn commit_color(&mut self, action: ModalAction, css_color: &str) -> BbResult<()> {
        let hex = color::to_hex(css_color)?;
        self.insert_fragment(&Command::Color(hex).fragment(), action.selection)
    }

    pub fn insert_link(&mut self, url: &str, label: &str) -> BbResult<()> {
        let action = self.begin_modal();
        self.commit_link(action, url, label)
    }

    pub fn insert_image(&mut self, url: &str) -> BbResult<()> {
        let action = self.begin_modal();
        self.commit_image(action, url)
    }

    pub fn insert_color(&mut self, css_color: &str) -> BbResult<()> {
        let action = self.begin_modal();
        self.commit_color(action, css_color)
    }

    fn insert_fragment(&mut self, fragment: &Fragment, selection: Selection) -> BbResult<()> {
        if self.preview_mode {
            tracing::debug!("ignoring insertion while preview is shown");
            return Ok(());
        }

        let Edit { text, selection } =
            insert(self.input.text(), selection, fragment, &self.config.dummy_label)?;

        self.input.set_text(text);
        self.input.set_selection(selection);
        self.input.focus();
        Ok(())
    }

    /// Close every open tag in the buffer; the caret moves to the end
    pub fn close_tags(&mut self) {
        let balanced = self.balancer.balance(self.input.text());
        let end = char_len(&balanced);
        self.input.set_text(balanced);
        self.input.set_selection(Selection::caret(end));
        self.input.focus();
    }

    /// Close tags and prepare the preview request for the form posting to `form_action`
    pub fn preview_request(
        &mut self,
        root: &str,
        allowed: &[&str],
        form_action: &str,
    ) -> Option<PreviewRequest> {
        let endpoint = preview_endpoint(root, allowed, form_action)?;
        self.close_tags();
        Some(PreviewRequest::new(endpoint, self.input.text()))
    }
}
