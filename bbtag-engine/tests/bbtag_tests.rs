use bbtag_engine::scan::{self, TagToken};
use bbtag_engine::{
    balance, insert, Balancer, BbError, Command, Editor, EditorConfig, Fragment, PlainTextInput,
    Selection, TextInput,
};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

fn get_fixture_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("fixtures");
    path.push(filename);
    path
}

fn read_fixture(filename: &str) -> String {
    fs::read_to_string(get_fixture_path(filename)).unwrap()
}

/// Inputs mixing plain text, nesting, bad nesting, stray closers and bare tags
const CORPUS: &[&str] = &[
    "",
    "plain text only",
    "[b]hello",
    "[b][i]x[/i]",
    "[i][b]x[/i]",
    "[size]text[/size]",
    "[color]red[url]http://a[/url]",
    "a[/i]b[/b]",
    "[b]x[/b][/b] [b]",
    "[b][i]x[/b][/i]",
    "[quote=anna]hi [quote]nested\n[list][*]a\n[*]b",
    "[B]mixed case[/b] and [I]more",
    "[code=java]if (a) { b(); }\n[indent]x",
    "[user notified]anna[/user] hello [user notified]bob",
    "unterminated [b and ] odd [/ ] brackets [[b]]",
    "a[]b[=x]c",
    "żółw [b]gęś\n\tzażółć",
    "[url=http://x.org/a/b?c=d]link[/url][img]http://x.org/i.png[/img]",
];

/// Stray closers sitting between `[` and a name; dropping them splices a new tag
const SPLICING_CLOSERS: &[&str] = &[
    "[[/x]b]",
    "[/[/x]b]",
    "a[[/x]b]c[/b]",
    "[[[/x]/x]b]",
    "[b][[/i]i]x",
];

/// Every input the balancing properties are checked against
fn property_inputs() -> Vec<String> {
    let mut inputs: Vec<String> = CORPUS
        .iter()
        .chain(SPLICING_CLOSERS)
        .map(|s| s.to_string())
        .collect();

    inputs.push("[b]".repeat(1_000));
    inputs.push(format!("{}x{}", "[i][u]".repeat(500), "[/u]".repeat(300)));
    inputs.push("[quote][/quote]".repeat(500) + &"[/quote]".repeat(500));
    inputs
}

/// Every string of up to `max_len` characters over `alphabet`
fn all_strings(alphabet: &[char], max_len: usize) -> Vec<String> {
    let mut all = vec![String::new()];
    let mut previous = vec![String::new()];
    for _ in 0..max_len {
        let mut next = Vec::with_capacity(previous.len() * alphabet.len());
        for prefix in &previous {
            for &ch in alphabet {
                let mut s = prefix.clone();
                s.push(ch);
                next.push(s);
            }
        }
        all.extend(next.iter().cloned());
        previous = next;
    }
    all
}

/// Open/close counts per closing-tag name
fn tag_counts(text: &str) -> HashMap<String, (usize, usize)> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for token in scan::tokens(text) {
        let entry = counts.entry(scan::closer_name(token.name())).or_insert((0, 0));
        match token {
            TagToken::Open { .. } => entry.0 += 1,
            TagToken::Close { .. } => entry.1 += 1,
        }
    }
    counts
}

// Fixture tests
#[test]
fn test_unclosed_fixture() {
    let input = read_fixture("unclosed.bb");
    let expected = read_fixture("unclosed.balanced.bb");
    assert_eq!(balance(&input), expected);
}

#[test]
fn test_balanced_fixture_is_untouched() {
    let input = read_fixture("balanced.bb");
    assert_eq!(balance(&input), input);
}

#[test]
fn test_config_fixture() {
    let config = EditorConfig::load(get_fixture_path("editor.yaml")).unwrap();
    assert_eq!(config.dummy_label, "tekst");

    let mut editor = Editor::new(PlainTextInput::new("[size]a [color]b"), config);
    editor.close_tags();
    // only the configured defaults are filled in
    assert_eq!(editor.input().text(), "[size=14]a [color]b[/color][/size]");
}

#[test]
fn test_missing_config_file() {
    let result = EditorConfig::load(get_fixture_path("does-not-exist.yaml"));
    assert!(matches!(result, Err(BbError::Io(_))));
}

// Balancer properties
#[test]
fn test_balance_scenarios() {
    assert_eq!(balance("[b]hello"), "[b]hello[/b]");
    assert_eq!(balance("[size]text[/size]"), "[size=10]text[/size]");
    assert_eq!(balance("[b][i]x[/i]"), "[b][i]x[/i][/b]");
}

fn assert_closed_and_stable(text: &str) {
    let balanced = balance(text);
    assert_eq!(balance(&balanced), balanced, "not idempotent for: {:?}", text);
    for (name, (open, close)) in tag_counts(&balanced) {
        assert_eq!(
            open, close,
            "tag '{}' unbalanced in {:?} (from {:?})",
            name, balanced, text
        );
    }
}

#[test]
fn test_balance_is_idempotent_and_closes_every_tag() {
    for text in property_inputs() {
        assert_closed_and_stable(&text);
    }
}

#[test]
fn test_balance_over_all_short_bracket_strings() {
    for text in all_strings(&['[', ']', '/', 'b', 'x'], 6) {
        assert_closed_and_stable(&text);
    }
}

#[test]
fn test_splicing_closers() {
    assert_eq!(balance("[[/x]b]"), "[b][/b]");
    assert_eq!(balance("[/[/x]b]"), "");
    assert_eq!(balance("[b][[/i]i]x"), "[b][i]x[/i][/b]");
    // a closer that matches something is never dropped
    assert_eq!(balance("[b][[/b]i]x"), "[b][[/b]i]x");
}

#[test]
fn test_balance_keeps_plain_text() {
    for text in CORPUS {
        let strip = |s: &str| -> String {
            let mut out = s.to_string();
            for token in scan::tokens(s).iter().rev() {
                out.replace_range(token.span(), "");
            }
            out
        };
        assert_eq!(
            strip(&balance(text)),
            strip(text),
            "text outside tags changed for: {:?}",
            text
        );
    }
}

#[test]
fn test_balanced_input_is_untouched() {
    let inputs = [
        "[b]bold[/b] and [i]italic[/i]",
        "[quote=x][quote]deep[/quote][/quote]",
        "[list]\n[*]one\n[*]two\n[/list]",
        "[size=10]s[/size][color=FF0000]c[/color][url=]u[/url][indent=15]i[/indent]",
        "no markup\r\nat all",
    ];
    for text in inputs {
        assert_eq!(balance(text), text);
    }
}

#[test]
fn test_custom_balancer_defaults() {
    let balancer = Balancer::new(Vec::new());
    assert_eq!(balancer.balance("[size]x"), "[size]x[/size]");
}

// Insertion properties
#[test]
fn test_insert_scenario() {
    let edit = insert("world", Selection { start: 0, end: 5 }, &Fragment::tag("b"), "text").unwrap();
    assert_eq!(edit.text, "[b]world[/b]");
    assert_eq!(edit.selection, Selection { start: 3, end: 8 });
}

#[test]
fn test_wrap_invariant() {
    let buffer = "zażółć gęślą\njaźń";
    let chars: Vec<char> = buffer.chars().collect();
    let fragment = Fragment::tag_with_value("size", "14");

    for start in 0..chars.len() {
        for end in start + 1..=chars.len() {
            let edit = insert(buffer, Selection { start, end }, &fragment, "text").unwrap();
            let before: String = chars[..start].iter().collect();
            let selected: String = chars[start..end].iter().collect();
            let after: String = chars[end..].iter().collect();

            assert_eq!(
                edit.text,
                format!("{}[size=14]{}[/size]{}", before, selected, after)
            );
            assert_eq!(edit.selection.slice(&edit.text), selected);
        }
    }
}

#[test]
fn test_dummy_invariant() {
    let buffer = "ab\ncd";
    for caret in 0..=5 {
        let edit = insert(buffer, Selection::caret(caret), &Fragment::tag("u"), "text").unwrap();
        let (before, after) = buffer.split_at(caret);
        assert_eq!(edit.text, format!("{}[u]text[/u]{}", before, after));
        assert_eq!(edit.selection.slice(&edit.text), "text");
    }
}

#[test]
fn test_insert_rejects_bad_selection() {
    let result = insert("ab", Selection { start: 3, end: 3 }, &Fragment::tag("b"), "text");
    assert!(matches!(result, Err(BbError::SelectionOutOfBounds { .. })));
}

// Editor session
#[test]
fn test_editing_then_submit() {
    let mut editor = Editor::new(PlainTextInput::new(""), EditorConfig::default());

    editor.apply(&Command::Bold).unwrap();
    assert_eq!(editor.input().text(), "[b]text[/b]");

    // typing over the dummy label leaves the caret inside [b]
    let input = editor.input_mut();
    input.set_text("[b]Hi [/b]".to_string());
    input.set_selection(Selection::caret(6));
    editor.apply(&Command::Size("18".to_string())).unwrap();
    assert_eq!(editor.input().text(), "[b]Hi [size=18]text[/size][/b]");

    let action = editor.begin_modal();
    editor.commit_image(action, "http://x.org/a.png").unwrap();
    assert_eq!(
        editor.input().text(),
        "[b]Hi [size=18]text[img]http://x.org/a.png[/img][/size][/b]"
    );

    editor.input_mut().set_text("[b]Hi [size]there".to_string());
    editor.close_tags();
    assert_eq!(editor.input().text(), "[b]Hi [size=10]there[/size][/b]");
}

#[test]
fn test_list_command_from_name() {
    let input = PlainTextInput::with_selection("milk\neggs\nbread", 0, 15).unwrap();
    let mut editor = Editor::new(input, EditorConfig::default());
    editor
        .apply(&Command::from_name("list", None).unwrap())
        .unwrap();

    assert_eq!(
        editor.input().text(),
        "[list]\n[*]milk[*]eggs[*]bread\n[/list]"
    );
    assert_eq!(editor.input().selected_text(), "milk[*]eggs[*]bread");
    assert_eq!(balance(editor.input().text()), editor.input().text());
}
