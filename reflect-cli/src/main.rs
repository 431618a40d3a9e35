mod render;

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{Duration, Local, NaiveDate};
use clap::{Parser, Subcommand};
use reflect_core::calendar::entry_key;
use reflect_core::session::DeleteOutcome;
use reflect_core::{Config, RemoteGateway, SaveReport, Session};
use render::Renderer;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::fs;
use std::process::{Command as Process, ExitCode};

/// reflect — journaling client with streaks and AI drafting
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the editor for a day (defaults to today)
    Edit {
        /// `today`, `yesterday` or an ISO date like 2025-08-25
        date: Option<String>,
        /// Tag to attach; may be given multiple times
        #[arg(long)]
        tag: Vec<String>,
        /// Photo file to attach; may be given multiple times
        #[arg(long)]
        photo: Vec<PathBuf>,
        /// Rewrite the entry with the AI service before saving
        #[arg(long)]
        rewrite: bool,
    },
    /// Print the saved entry for a day
    On { date: String },
    /// Delete the saved entry for a day
    Delete {
        date: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Show streak, goals and badges
    Stats,
    /// Write the whole journal as JSON to a file (stdout by default)
    Export { file: Option<PathBuf> },
    /// Restore a journal from an exported JSON file
    Import { file: PathBuf },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("reflect: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    let renderer = Renderer::new(&config.date_format);
    let mut session = Session::connect(RemoteGateway::new(&config.server_url));

    match cli.command.unwrap_or(Command::Edit {
        date: None,
        tag: vec![],
        photo: vec![],
        rewrite: false,
    }) {
        Command::Edit {
            date,
            tag,
            photo,
            rewrite,
        } => cmd_edit(&mut session, &renderer, &config, date, tag, photo, rewrite),
        Command::On { date } => cmd_on(&session, &renderer, &date),
        Command::Delete { date, yes } => cmd_delete(&mut session, &renderer, &date, yes),
        Command::Stats => {
            renderer.print_stats(session.progress());
            Ok(())
        }
        Command::Export { file } => cmd_export(&session, &renderer, file.as_deref()),
        Command::Import { file } => cmd_import(&mut session, &renderer, &file),
    }
}

fn cmd_edit(
    session: &mut Session<RemoteGateway>,
    renderer: &Renderer,
    config: &Config,
    date: Option<String>,
    tags: Vec<String>,
    photos: Vec<PathBuf>,
    rewrite: bool,
) -> Result<()> {
    let date = parse_date(date.as_deref().unwrap_or("today"))?;
    let nudge_mode = session.open_editor(date)?.nudge_mode;

    if nudge_mode {
        collect_nudges(session, renderer)?;
    }

    if let Some(editor) = session.editor_mut() {
        for tag in &tags {
            editor.buffer.add_tag(tag);
        }
        let mut refs = Vec::with_capacity(photos.len());
        for path in &photos {
            refs.push(photo_data_uri(path)?);
        }
        let submitted = refs.len();
        let accepted = editor.buffer.add_photos(refs);
        if accepted < submitted {
            renderer.print_info("Some photos were dropped: an entry holds at most 10.");
        }
    }

    let seed = session
        .editor()
        .map(|e| e.buffer.draft.text.clone())
        .unwrap_or_default();
    let text = edit_in_buffer(config, &seed)?;

    let mut live = Some(text.clone());
    if rewrite && !text.trim().is_empty() {
        match session.rewrite(Some(&text)) {
            Ok(()) => {
                if let Some(editor) = session.editor() {
                    renderer.print_md(&editor.buffer.draft.text);
                }
                if !confirm_stdin("Keep the rewritten version?")? {
                    session.undo();
                }
                live = None;
            }
            Err(e) => renderer.print_info(&format!("Rewrite failed: {e}")),
        }
    }

    if !session.is_dirty(live.as_deref()) {
        renderer.print_info("Nothing to save.");
        return Ok(());
    }

    let report = session.save(live.as_deref())?;
    print_save_report(renderer, &report);
    Ok(())
}

/// Nudge-collection flow for a day with no saved text: read short notes
/// line by line, then offer to generate a draft from them.
fn collect_nudges(session: &mut Session<RemoteGateway>, renderer: &Renderer) -> Result<()> {
    renderer.print_info(
        "No entry yet for this day. Jot quick nudges, one per line; finish with an empty line.",
    );
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            break;
        }
        if let Some(editor) = session.editor_mut() {
            editor.nudges.add(&line);
        }
    }

    let collected = session.editor().map_or(0, |e| e.nudges.len());
    if collected == 0 {
        return Ok(());
    }
    if !confirm_stdin(&format!("Generate a draft from these {collected} nudges?"))? {
        return Ok(());
    }
    match session.generate_from_nudges() {
        Ok(()) => renderer.print_info("Draft generated; opening it in your editor."),
        Err(e) => renderer.print_info(&format!("Generation failed: {e}")),
    }
    Ok(())
}

fn cmd_on(session: &Session<RemoteGateway>, renderer: &Renderer, date: &str) -> Result<()> {
    let date = parse_date(date)?;
    match session.entry(&entry_key(date)) {
        Some(entry) => renderer.print_entry(date, entry),
        None => renderer.print_info(&format!("No entry found for {date}.")),
    }
    Ok(())
}

fn cmd_delete(
    session: &mut Session<RemoteGateway>,
    renderer: &Renderer,
    date: &str,
    yes: bool,
) -> Result<()> {
    let date = parse_date(date)?;
    if session.entry(&entry_key(date)).is_none() {
        renderer.print_info(&format!("No entry found for {date}."));
        return Ok(());
    }
    session.open_editor(date)?;
    let mut confirm = |prompt: &str| {
        if yes {
            true
        } else {
            confirm_stdin(prompt).unwrap_or(false)
        }
    };
    match session.delete(&mut confirm)? {
        DeleteOutcome::Deleted => renderer.print_info("Entry deleted."),
        DeleteOutcome::Declined => renderer.print_info("Kept."),
    }
    Ok(())
}

fn cmd_export(
    session: &Session<RemoteGateway>,
    renderer: &Renderer,
    file: Option<&Path>,
) -> Result<()> {
    let snapshot = session.export()?;
    let json = serde_json::to_string_pretty(&snapshot)?;
    match file {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            renderer.print_info(&format!("Journal exported to {}.", path.display()));
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_import(
    session: &mut Session<RemoteGateway>,
    renderer: &Renderer,
    file: &Path,
) -> Result<()> {
    let raw = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let payload: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", file.display()))?;
    let count = session.import(&payload)?;
    renderer.print_info(&format!("Imported {count} entries."));
    Ok(())
}

fn print_save_report(renderer: &Renderer, report: &SaveReport) {
    if report.deleted {
        renderer.print_info("Empty entry: the day was cleared instead of saved.");
        return;
    }
    renderer.print_info("Entry saved.");
    if let Some(mood) = report.mood {
        renderer.print_mood(mood);
    }
    if let Some(message) = &report.encouragement {
        renderer.print_info(message);
    }
    if let Some(milestone) = report.milestone {
        renderer.print_celebration(milestone);
    }
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    let today = Local::now().date_naive();
    match input.to_ascii_lowercase().as_str() {
        "today" => Ok(today),
        "yesterday" => Ok(today - Duration::days(1)),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .with_context(|| format!("'{other}' is not a date; use today, yesterday or YYYY-MM-DD")),
    }
}

fn confirm_stdin(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Reads a photo file into an embeddable data-URI image reference.
fn photo_data_uri(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    };
    Ok(format!("data:{mime};base64,{}", BASE64.encode(bytes)))
}

fn resolve_editor(config: &Config) -> String {
    config
        .editor
        .as_deref()
        .map(str::to_string)
        .or_else(|| std::env::var("VISUAL").ok())
        .or_else(|| std::env::var("EDITOR").ok())
        .unwrap_or_else(|| "vim".into())
}

/// Opens the user's editor on a temp file seeded with the current draft
/// and returns the edited text.
fn edit_in_buffer(config: &Config, seed: &str) -> Result<String> {
    let file = tempfile::Builder::new()
        .prefix("reflect")
        .suffix(".md")
        .tempfile()?;
    fs::write(file.path(), seed)?;

    let editor = resolve_editor(config);
    let status = Process::new(&editor).arg(file.path()).status()?;
    if !status.success() {
        anyhow::bail!("Editor exited with status {}", status);
    }
    Ok(fs::read_to_string(file.path())?)
}
