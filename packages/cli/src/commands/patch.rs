use super::load_document;
use crate::config::Config;
use anyhow::{Context, Result};
use blueprint_editor::{Patch, PatchOutcome, PatchStrategy};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub struct PatchArgs {
    /// Stylesheet to patch
    pub input: PathBuf,

    /// JSON file holding an array of patches
    #[arg(short, long)]
    pub patches: PathBuf,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Fail on malformed CSS instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Override the configured strategy (scoped, first-match)
    #[arg(long)]
    pub strategy: Option<PatchStrategy>,
}

pub fn patch(args: PatchArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let doc = load_document(&args.input, args.strict || config.strict)?;

    let content = fs::read_to_string(&args.patches)
        .with_context(|| format!("Failed to read {}", args.patches.display()))?;
    let patches: Vec<Patch> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid patch file {}", args.patches.display()))?;

    let patcher = config.patcher(args.strategy);
    let (css, outcomes) = patcher.patch_with_outcomes(doc.source(), &patches);

    // Status goes to stderr so stdout stays pure CSS
    for (patch, outcome) in patches.iter().zip(&outcomes) {
        let mark = match outcome {
            PatchOutcome::Applied => "✓".green(),
            PatchOutcome::Unchanged | PatchOutcome::AlreadyPresent => "•".dimmed(),
            PatchOutcome::TargetNotFound => "✗".yellow(),
        };
        eprintln!("  {} {} {}", mark, patch, format!("({})", outcome_label(*outcome)).dimmed());
    }

    let applied = outcomes.iter().filter(|o| o.changed()).count();
    match &args.out {
        Some(out) => {
            fs::write(out, &css).with_context(|| format!("Failed to write {}", out.display()))?;
            info!(path = %out.display(), applied, "Wrote patched CSS");
            eprintln!(
                "✨ {} {} of {} patches → {}",
                "Done".green().bold(),
                applied,
                patches.len(),
                out.display()
            );
        }
        None => print!("{}", css),
    }

    Ok(())
}

fn outcome_label(outcome: PatchOutcome) -> &'static str {
    match outcome {
        PatchOutcome::Applied => "applied",
        PatchOutcome::Unchanged => "unchanged",
        PatchOutcome::AlreadyPresent => "already present",
        PatchOutcome::TargetNotFound => "target not found",
    }
}
