use super::load_document;
use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use blueprint_editor::{ComponentKey, ComponentScope, EditSession, Patch};
use blueprint_parser::component_selector;
use clap::Args;
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Stylesheet to edit
    pub input: PathBuf,

    /// Read commands from this file instead of stdin
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Fail on malformed CSS instead of skipping it
    #[arg(long)]
    pub strict: bool,
}

/// One line of an edit script
#[derive(Debug, Clone, PartialEq, Eq)]
enum EditCommand {
    /// A JSON patch object
    Apply(Patch),
    Undo,
    Redo,
    Reset,
    Show,
    Patches,
    /// Toggle the dark preview, which decides the default `select` scope
    Dark,
    Select {
        selector: String,
        scope: Option<ComponentScope>,
    },
    Write(PathBuf),
}

#[derive(Error, Debug)]
enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid patch: {0}")]
    Patch(#[from] serde_json::Error),
}

impl FromStr for EditCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.starts_with('{') {
            return Ok(EditCommand::Apply(serde_json::from_str(line)?));
        }

        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default();
        let rest: Vec<&str> = words.collect();

        match (command, rest.as_slice()) {
            ("undo", []) => Ok(EditCommand::Undo),
            ("redo", []) => Ok(EditCommand::Redo),
            ("reset", []) => Ok(EditCommand::Reset),
            ("show", []) => Ok(EditCommand::Show),
            ("patches", []) => Ok(EditCommand::Patches),
            ("dark", []) => Ok(EditCommand::Dark),
            ("write", [path]) => Ok(EditCommand::Write(PathBuf::from(path))),
            ("write", _) => Err(CommandError::Usage("write <path>")),
            ("select", [selector @ .., last]) => {
                let scope = match *last {
                    "light" => Some(ComponentScope::Light),
                    "dark" => Some(ComponentScope::Dark),
                    _ => None,
                };
                let selector = match scope {
                    Some(_) => selector.join(" "),
                    None => rest.join(" "),
                };
                if selector.is_empty() {
                    return Err(CommandError::Usage("select <selector> [light|dark]"));
                }
                Ok(EditCommand::Select { selector, scope })
            }
            ("select", []) => Err(CommandError::Usage("select <selector> [light|dark]")),
            _ => Err(CommandError::Unknown(line.to_string())),
        }
    }
}

pub fn edit(args: EditArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let doc = load_document(&args.input, args.strict || config.strict)?;

    let mut session = EditSession::new(config.patcher(None));
    session.load(doc);

    let reader: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut failures = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let result = line
            .parse::<EditCommand>()
            .map_err(anyhow::Error::from)
            .and_then(|command| run_command(&mut session, command));
        if let Err(err) = result {
            failures += 1;
            eprintln!("{} line {}: {:#}", "✗".red(), index + 1, err);
        }
    }

    if failures > 0 {
        return Err(anyhow!("{} command(s) failed", failures));
    }
    Ok(())
}

fn run_command(session: &mut EditSession, command: EditCommand) -> Result<()> {
    debug!(command = ?command, "Running edit command");

    match command {
        EditCommand::Apply(patch) => {
            let summary = patch.to_string();
            session.apply(patch)?;
            println!("{} {}", "✓".green(), summary);
        }
        EditCommand::Undo => {
            let patch = session.history().undo_patch().cloned();
            match patch {
                Some(patch) if session.undo() => println!("{} undo {}", "✓".green(), patch),
                _ => println!("{} Nothing to undo", "•".dimmed()),
            }
        }
        EditCommand::Redo => {
            let patch = session.history().redo_patch().cloned();
            match patch {
                Some(patch) if session.redo() => println!("{} redo {}", "✓".green(), patch),
                _ => println!("{} Nothing to redo", "•".dimmed()),
            }
        }
        EditCommand::Reset => {
            session.reset();
            println!("{} History cleared", "✓".green());
        }
        EditCommand::Show => print!("{}", session.patched_css()),
        EditCommand::Patches => {
            println!("{}", serde_json::to_string_pretty(session.current_patches())?);
        }
        EditCommand::Dark => {
            let dark = session.toggle_dark_mode();
            println!("{} Dark preview {}", "✓".green(), if dark { "on" } else { "off" });
        }
        EditCommand::Select { selector, scope } => {
            let key = resolve_key(&selector, scope, session.is_dark_mode())?;
            let block = session.select_component(key)?;

            println!("{} {}", block.selector_name.bold(), format!("[{}]", block.scope).dimmed());
            for property in &block.properties {
                println!("    {}: {}", property.name, property.value);
            }
        }
        EditCommand::Write(path) => {
            session.write_patched(&path)?;
            println!("{} Wrote {}", "✓".green(), path.display());
        }
    }
    Ok(())
}

/// Key for a `select` target. Without an explicit scope the dark preview
/// picks it, and a dark selector gains its `.dark ` ancestor.
fn resolve_key(selector: &str, scope: Option<ComponentScope>, dark_mode: bool) -> Result<ComponentKey> {
    let scope = scope.unwrap_or(if dark_mode {
        ComponentScope::Dark
    } else {
        ComponentScope::Light
    });

    let selector = match scope {
        ComponentScope::Dark if !selector.starts_with(".dark") => format!(".dark {}", selector),
        _ => selector.to_string(),
    };

    match component_selector(&selector) {
        Some((canonical, actual)) if actual == scope => Ok(ComponentKey::new(canonical, scope)),
        _ => Err(anyhow!("Not a {} component selector: {}", scope, selector)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_editor::TokenScope;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!("undo".parse::<EditCommand>().unwrap(), EditCommand::Undo);
        assert_eq!("  redo ".parse::<EditCommand>().unwrap(), EditCommand::Redo);
        assert_eq!("patches".parse::<EditCommand>().unwrap(), EditCommand::Patches);
        assert_eq!(
            "write out.css".parse::<EditCommand>().unwrap(),
            EditCommand::Write(PathBuf::from("out.css"))
        );
        assert!(matches!("write".parse::<EditCommand>(), Err(CommandError::Usage(_))));
        assert!(matches!("undo 2".parse::<EditCommand>(), Err(CommandError::Unknown(_))));
    }

    #[test]
    fn test_parse_patch_line() {
        let line = r#"{"type":"token-set","tokenName":"--gap","scope":"dark","newValue":"2px"}"#;
        let expected = Patch::token_set("--gap", TokenScope::Dark, "2px").unwrap();
        assert_eq!(line.parse::<EditCommand>().unwrap(), EditCommand::Apply(expected));

        let invalid = r#"{"type":"token-set","tokenName":"gap","scope":"dark","newValue":"2px"}"#;
        assert!(matches!(invalid.parse::<EditCommand>(), Err(CommandError::Patch(_))));
    }

    #[test]
    fn test_parse_select() {
        assert_eq!(
            "select .dark .bp-btn dark".parse::<EditCommand>().unwrap(),
            EditCommand::Select {
                selector: ".dark .bp-btn".to_string(),
                scope: Some(ComponentScope::Dark)
            }
        );
        assert_eq!(
            "select .bp-btn".parse::<EditCommand>().unwrap(),
            EditCommand::Select {
                selector: ".bp-btn".to_string(),
                scope: None
            }
        );
        assert!(matches!("select light".parse::<EditCommand>(), Err(CommandError::Usage(_))));
    }

    #[test]
    fn test_resolve_key_uses_dark_preview() {
        let key = resolve_key(".bp-btn", None, true).unwrap();
        assert_eq!(key, ComponentKey::new(".dark .bp-btn", ComponentScope::Dark));

        let key = resolve_key(".bp-btn", None, false).unwrap();
        assert_eq!(key, ComponentKey::new(".bp-btn", ComponentScope::Light));

        assert!(resolve_key(".dark .bp-btn", Some(ComponentScope::Light), false).is_err());
        assert!(resolve_key("h1", None, false).is_err());
    }

    #[test]
    fn test_apply_without_document_fails() {
        let mut session = EditSession::default();
        let patch = Patch::token_set("--gap", TokenScope::Root, "8px").unwrap();
        assert!(run_command(&mut session, EditCommand::Apply(patch)).is_err());
        assert!(session.current_patches().is_empty());
    }

    #[test]
    fn test_run_script_against_session() {
        let source = ":root { --gap: 4px; }\n.bp-card { padding: var(--gap); }\n";
        let mut session = EditSession::default();
        session.load(blueprint_editor::Document::from_source(
            PathBuf::from("theme.css"),
            source.to_string(),
        ));

        let script = [
            r#"{"type":"token-set","tokenName":"--gap","scope":"root","newValue":"8px"}"#,
            r#"{"type":"component-add-property","selectorName":".bp-card","scope":"light","property":"gap","newValue":"2px"}"#,
            "undo",
            "select .bp-card light",
        ];
        for line in script {
            run_command(&mut session, line.parse().unwrap()).unwrap();
        }

        assert_eq!(session.current_patches().len(), 1);
        assert_eq!(session.patched_css(), ":root { --gap: 8px; }\n.bp-card { padding: var(--gap); }\n");
        assert_eq!(
            session.selected_key(),
            Some(&ComponentKey::new(".bp-card", ComponentScope::Light))
        );
    }
}
