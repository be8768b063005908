use super::load_document;
use crate::config::Config;
use anyhow::{anyhow, Result};
use blueprint_editor::{categorize, ComponentBlock, Document, Token, TokenScope};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Stylesheet or directory of stylesheets to inspect
    pub input: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Fail on malformed CSS instead of skipping it
    #[arg(long)]
    pub strict: bool,
}

/// Per-file inventory as printed by `--format json`
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct FileReport<'a> {
    path: String,
    tokens: &'a [Token],
    components: &'a [ComponentBlock],
    diagnostics: Vec<String>,
}

impl<'a> FileReport<'a> {
    fn new(doc: &'a Document) -> Self {
        Self {
            path: doc.path.display().to_string(),
            tokens: doc.tokens(),
            components: doc.components(),
            diagnostics: doc.diagnostics().iter().map(|d| d.to_string()).collect(),
        }
    }
}

pub fn inspect(args: InspectArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let strict = args.strict || config.strict;
    let json = match args.format.as_str() {
        "json" => true,
        "text" => false,
        other => return Err(anyhow!("Unknown format: {} (expected text or json)", other)),
    };

    let files = if args.input.is_file() {
        vec![args.input.clone()]
    } else if args.input.is_dir() {
        find_css_files(&args.input, &config)
    } else {
        return Err(anyhow!("Input path does not exist: {}", args.input.display()));
    };

    let mut documents = Vec::new();
    let mut failed = 0;
    for file in &files {
        match load_document(file, strict) {
            Ok(doc) => documents.push(doc),
            Err(err) => {
                failed += 1;
                eprintln!("{} {:#}", "✗".red(), err);
            }
        }
    }

    if json {
        let reports: Vec<_> = documents.iter().map(FileReport::new).collect();
        if args.input.is_file() && reports.len() == 1 {
            println!("{}", serde_json::to_string_pretty(&reports[0])?);
        } else {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    } else {
        for doc in &documents {
            print_document(doc);
        }
        if args.input.is_dir() {
            println!("   Files inspected: {}", documents.len());
        }
    }

    if failed > 0 {
        return Err(anyhow!("{} file(s) could not be inspected", failed));
    }
    Ok(())
}

fn print_document(doc: &Document) {
    println!("{}", doc.path.display().to_string().bold());

    for scope in [TokenScope::Root, TokenScope::Dark] {
        let tokens: Vec<_> = doc.extraction().tokens_in(scope).collect();
        if tokens.is_empty() {
            continue;
        }
        println!("  {} ({})", "Tokens".cyan().bold(), scope);
        for token in tokens {
            println!("    {}: {}", token.name, token.raw_value);
        }
    }

    for (category, blocks) in categorize(doc.components()) {
        if blocks.is_empty() {
            continue;
        }
        println!("  {}", category.to_string().cyan().bold());
        for block in blocks {
            println!(
                "    {} {} {}",
                block.selector_name,
                format!("[{}]", block.scope).dimmed(),
                format!("{} properties", block.properties.len()).dimmed()
            );
        }
    }

    if doc.diagnostics().is_empty() {
        println!("  {} No issues found", "✓".green());
    } else {
        for diagnostic in doc.diagnostics() {
            println!("  {} {}", "warning".yellow().bold(), diagnostic);
        }
    }
    println!();
}

fn find_css_files(dir: &Path, config: &Config) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && config.is_stylesheet(path))
        .collect();
    files.sort();
    files
}
