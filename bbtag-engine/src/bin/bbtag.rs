use anyhow::{Context, Result};
use bbtag_engine::{Command, Editor, EditorConfig, PlainTextInput, TextInput};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

/// Close and insert BBCode tags in text files
#[derive(Parser, Debug)]
#[command(name = "bbtag", version, about = "Close and insert BBCode tags")]
struct CliArgs {
    /// YAML editor configuration
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Print files with every open tag closed
    Balance {
        files: Vec<PathBuf>,
        /// Rewrite the files in place instead of printing
        #[arg(short, long)]
        write: bool,
    },
    /// Exit with status 1 if any file has unclosed tags
    Check { files: Vec<PathBuf> },
    /// Apply a toolbar command to a selection and print the result
    Wrap {
        file: PathBuf,
        /// bold, italic, underline, line-through, highlight, left, center,
        /// right, quote, list, list-element, size, code, indent, color
        #[arg(long)]
        command: String,
        /// Value for size, code, indent and color
        #[arg(long)]
        value: Option<String>,
        #[arg(long, default_value_t = 0)]
        start: usize,
        #[arg(long, default_value_t = 0)]
        end: usize,
    },
    /// Insert a link at a selection and print the result
    Link {
        file: PathBuf,
        #[arg(long)]
        url: String,
        #[arg(long, default_value = "")]
        label: String,
        #[arg(long, default_value_t = 0)]
        start: usize,
        #[arg(long, default_value_t = 0)]
        end: usize,
    },
    /// List the known tags
    Tags,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    match run(args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("✗ {:#}", e);
            process::exit(2);
        }
    }
}

fn run(args: CliArgs) -> Result<i32> {
    let config = match &args.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EditorConfig::default(),
    };

    match args.command {
        CliCommand::Balance { files, write } => {
            for path in files {
                let balanced = balance_file(&path, &config)?;
                if write {
                    fs::write(&path, balanced)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("✓ {} balanced", path.display());
                } else {
                    print!("{}", balanced);
                }
            }
            Ok(0)
        }
        CliCommand::Check { files } => {
            let mut exit_code = 0;
            for path in files {
                let content = read(&path)?;
                if balance_file(&path, &config)? == content.replace("\r\n", "\n") {
                    println!("✓ {} is balanced", path.display());
                } else {
                    eprintln!("✗ {} has unclosed or bare tags", path.display());
                    exit_code = 1;
                }
            }
            Ok(exit_code)
        }
        CliCommand::Wrap {
            file,
            command,
            value,
            start,
            end,
        } => {
            let command = Command::from_name(&command, value.as_deref())?;
            let mut editor = open_editor(&file, &config, start, end)?;
            editor.apply(&command)?;
            print_result(editor.input());
            Ok(0)
        }
        CliCommand::Link {
            file,
            url,
            label,
            start,
            end,
        } => {
            let mut editor = open_editor(&file, &config, start, end)?;
            editor.insert_link(&url, &label)?;
            print_result(editor.input());
            Ok(0)
        }
        CliCommand::Tags => {
            for name in config.registry().names() {
                println!("{}", name);
            }
            Ok(0)
        }
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn balance_file(path: &Path, config: &EditorConfig) -> Result<String> {
    let mut editor = Editor::new(PlainTextInput::new(&read(path)?), config.clone());
    editor.close_tags();
    Ok(editor.input().text().to_string())
}

fn open_editor(
    path: &Path,
    config: &EditorConfig,
    start: usize,
    end: usize,
) -> Result<Editor<PlainTextInput>> {
    let input = PlainTextInput::with_selection(&read(path)?, start, end)?;
    Ok(Editor::new(input, config.clone()))
}

fn print_result(input: &PlainTextInput) {
    println!("{}", input.text());
    let selection = input.selection();
    eprintln!("selection: {}..{}", selection.start, selection.end);
}
