//! `quicknotes`: command-line front end for the Quicknotes core library.
//!
//! Each invocation opens the notes store, turns the subcommand into one or
//! more [`Intent`]s, applies them and prints the result.

mod cli;
mod render;
mod settings;

use chrono::Local;
use clap::Parser;
use cli::{Cli, Command};
use quicknotes_core::{
    ExportFormat, Intent, KeyValueStore, Notebook, Outcome, QuicknotesError, SortOrder,
    SqliteStore, TagFilter,
};
use settings::AppSettings;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("quicknotes: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Config { store_path, sort_recent } => configure(
            &settings::settings_file_path(),
            store_path,
            sort_recent,
            &mut out,
        ),
        command => {
            let settings = settings::load_settings();
            let path = cli
                .store
                .unwrap_or_else(|| PathBuf::from(&settings.store_path));
            log::debug!("using store {}", path.display());
            let backend = SqliteStore::open_or_create(&path).map_err(|e| e.user_message())?;
            let mut notebook = Notebook::open(backend);
            execute(&mut notebook, command, &settings, &mut out, &mut confirm_on_stdin)
        }
    }
}

/// Asks a yes/no question on the terminal; anything but `y`/`yes` is a no.
fn confirm_on_stdin(question: &str) -> bool {
    eprint!("{question} [y/N] ");
    let _ = io::stderr().flush();
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn user_error(e: QuicknotesError) -> String {
    e.user_message()
}

fn io_error(e: io::Error) -> String {
    format!("Output error: {e}")
}

/// Expands a unique id prefix to the full id; anything else is returned as-is
/// and will be treated as a note that no longer exists.
fn resolve_id<B: KeyValueStore>(notebook: &Notebook<B>, input: &str) -> String {
    if notebook.get_note(input).is_some() {
        return input.to_string();
    }
    let mut matches = notebook.notes().iter().filter(|n| n.id.starts_with(input));
    match (matches.next(), matches.next()) {
        (Some(note), None) if !input.is_empty() => note.id.clone(),
        _ => input.to_string(),
    }
}

fn execute<B: KeyValueStore>(
    notebook: &mut Notebook<B>,
    command: Command,
    settings: &AppSettings,
    out: &mut dyn Write,
    confirm: &mut dyn FnMut(&str) -> bool,
) -> Result<(), String> {
    match command {
        Command::Add { title, content, tags } => {
            let outcome = notebook
                .apply(Intent::Create { title, content, tags })
                .map_err(user_error)?;
            if let Outcome::Created { id } = outcome {
                writeln!(out, "Created {id}").map_err(io_error)?;
            }
        }
        Command::Edit { id, title, content, tags } => {
            let id = resolve_id(notebook, &id);
            let Some(current) = notebook.get_note(&id) else {
                writeln!(out, "No note {id}; nothing changed").map_err(io_error)?;
                return Ok(());
            };
            let intent = Intent::Update {
                title: title.unwrap_or_else(|| current.title.clone()),
                content: content.unwrap_or_else(|| current.content.clone()),
                tags: tags.unwrap_or_else(|| current.tags.join(", ")),
                id,
            };
            report(notebook.apply(intent).map_err(user_error)?, out)?;
        }
        Command::Rm { id, yes } => {
            let id = resolve_id(notebook, &id);
            if !yes && notebook.get_note(&id).is_some() && !confirm("Delete this note?") {
                writeln!(out, "Cancelled").map_err(io_error)?;
                return Ok(());
            }
            report(notebook.apply(Intent::Delete { id }).map_err(user_error)?, out)?;
        }
        Command::Clone { id } => {
            let id = resolve_id(notebook, &id);
            report(notebook.apply(Intent::Clone { id }).map_err(user_error)?, out)?;
        }
        Command::Pin { id } => {
            let id = resolve_id(notebook, &id);
            report(notebook.apply(Intent::TogglePin { id }).map_err(user_error)?, out)?;
        }
        Command::Show { id } => {
            let id = resolve_id(notebook, &id);
            let written = match notebook.get_note(&id) {
                Some(note) => write!(out, "{}", render::render_note(note, &Local)),
                None => writeln!(out, "No note {id}"),
            };
            written.map_err(io_error)?;
        }
        Command::List { search, tag, pinned, oldest, recent } => {
            let sort = if oldest {
                SortOrder::Oldest
            } else if recent {
                SortOrder::Recent
            } else {
                SortOrder::from_recent(settings.default_sort_recent)
            };
            for intent in [
                Intent::SetSearch { text: search },
                Intent::SetTagFilter {
                    tag: TagFilter::from(tag),
                },
                Intent::SetPinnedOnly {
                    pinned_only: pinned,
                },
                Intent::SetSortOrder { sort },
            ] {
                notebook.apply(intent).map_err(user_error)?;
            }
            write!(out, "{}", render::render_listing(&notebook.listing(), &Local))
                .map_err(io_error)?;
        }
        Command::Tags => {
            for tag in notebook.listing().available_tags {
                writeln!(out, "{tag}").map_err(io_error)?;
            }
        }
        Command::Export { format, out: file } => {
            let format = ExportFormat::from(format);
            let content = match notebook.apply(Intent::Export { format }).map_err(user_error)? {
                Outcome::Exported { content, .. } => content,
                _ => String::new(),
            };
            match file {
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join(format.default_filename())
                    } else {
                        path
                    };
                    std::fs::write(&path, content)
                        .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
                    writeln!(
                        out,
                        "Exported {} as {format} to {}",
                        render::count_label(notebook.notes().len()),
                        path.display()
                    )
                    .map_err(io_error)?;
                }
                None => writeln!(out, "{content}").map_err(io_error)?,
            }
        }
        Command::Import { file, yes } => {
            let json = std::fs::read_to_string(&file)
                .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;
            let existing = notebook.notes().len();
            if !yes
                && existing > 0
                && !confirm(&format!("Replace all {}?", render::count_label(existing)))
            {
                writeln!(out, "Cancelled").map_err(io_error)?;
                return Ok(());
            }
            let count = notebook.import_json(&json).map_err(user_error)?;
            writeln!(out, "Imported {}", render::count_label(count)).map_err(io_error)?;
        }
        Command::Clear { yes } => {
            let confirmed = yes || confirm("Delete ALL notes?");
            let outcome = notebook
                .apply(Intent::ClearAll { confirmed })
                .map_err(user_error)?;
            report(outcome, out)?;
        }
        Command::Theme { mode } => match mode {
            None => writeln!(out, "{}", notebook.theme()).map_err(io_error)?,
            Some(mode) => {
                let theme = mode.resolve(notebook.theme());
                let outcome = notebook
                    .apply(Intent::SetTheme { theme })
                    .map_err(user_error)?;
                report(outcome, out)?;
            }
        },
        Command::Config { .. } => {
            return Err("config does not operate on a notes store".to_string());
        }
    }
    Ok(())
}

/// Prints a one-line summary of what an intent did.
fn report(outcome: Outcome, out: &mut dyn Write) -> Result<(), String> {
    let line = match outcome {
        Outcome::Created { id } => format!("Created {id}"),
        Outcome::Updated { id } => format!("Updated {}", render::short_id(&id)),
        Outcome::Deleted { id } => format!("Deleted {}", render::short_id(&id)),
        Outcome::Cloned { source_id, id } => format!(
            "Cloned {} as {id}",
            render::short_id(&source_id)
        ),
        Outcome::PinToggled { id, pinned } => format!(
            "{} {}",
            if pinned { "Pinned" } else { "Unpinned" },
            render::short_id(&id)
        ),
        Outcome::Cleared { removed } => format!("Deleted {}", render::count_label(removed)),
        Outcome::ThemeChanged(theme) => format!("Theme set to {theme}"),
        Outcome::Ignored => "Nothing changed".to_string(),
        Outcome::FilterChanged | Outcome::Exported { .. } => return Ok(()),
    };
    writeln!(out, "{line}").map_err(io_error)
}

/// Prints the settings stored at `path`, saving any requested changes first.
fn configure(
    path: &Path,
    store_path: Option<PathBuf>,
    sort_recent: Option<bool>,
    out: &mut dyn Write,
) -> Result<(), String> {
    let mut current = settings::load_settings_from(path);
    let mut changed = false;
    if let Some(store_path) = store_path {
        current.store_path = store_path.to_string_lossy().to_string();
        changed = true;
    }
    if let Some(sort_recent) = sort_recent {
        current.default_sort_recent = sort_recent;
        changed = true;
    }
    if changed {
        settings::save_settings_to(path, &current)?;
        log::info!("saved settings to {}", path.display());
    }
    let json = serde_json::to_string_pretty(&current)
        .map_err(|e| format!("Failed to serialize settings: {e}"))?;
    writeln!(out, "# {}\n{json}", path.display()).map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quicknotes_core::MemoryStore;

    fn notebook() -> Notebook<MemoryStore> {
        Notebook::open(MemoryStore::new())
    }

    fn run_cmd(
        nb: &mut Notebook<MemoryStore>,
        args: &[&str],
        answer: bool,
    ) -> Result<String, String> {
        let mut argv = vec!["quicknotes"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).map_err(|e| e.to_string())?;
        let mut out = Vec::new();
        execute(nb, cli.command, &AppSettings::default(), &mut out, &mut |_| answer)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn add_then_list() {
        let mut nb = notebook();
        let args = ["add", "Shopping", "-c", "milk", "-t", "home, errands"];
        let out = run_cmd(&mut nb, &args, true).unwrap();
        assert!(out.starts_with("Created "));
        assert_eq!(nb.notes()[0].tags, vec!["home", "errands"]);

        let out = run_cmd(&mut nb, &["list", "--search", "MILK"], true).unwrap();
        assert!(out.contains("Shopping"));
        assert!(out.ends_with("1 shown, 1 note\n"));
    }

    #[test]
    fn add_empty_note_fails_with_message() {
        let mut nb = notebook();
        let err = run_cmd(&mut nb, &["add", "  "], true).unwrap_err();
        assert_eq!(err, quicknotes_core::EMPTY_NOTE_MESSAGE);
        assert!(nb.notes().is_empty());
    }

    #[test]
    fn edit_keeps_unspecified_fields_and_accepts_prefix() {
        let mut nb = notebook();
        let id = nb.create_note("Title", "Body", "a,b").unwrap();

        let out = run_cmd(&mut nb, &["edit", &id[..6], "--title", "Renamed"], true).unwrap();
        assert!(out.starts_with("Updated"));
        let note = nb.get_note(&id).unwrap();
        assert_eq!(note.title, "Renamed");
        assert_eq!(note.content, "Body");
        assert_eq!(note.tags, vec!["a", "b"]);
    }

    #[test]
    fn edit_unknown_note_changes_nothing() {
        let mut nb = notebook();
        nb.create_note("Title", "", "").unwrap();
        let before = nb.notes().to_vec();
        let out = run_cmd(&mut nb, &["edit", "zzzz-not-there", "--title", "X"], true).unwrap();
        assert!(out.contains("nothing changed"));
        assert_eq!(nb.notes(), before.as_slice());
    }

    #[test]
    fn pin_and_pinned_only_listing() {
        let mut nb = notebook();
        let a = nb.create_note("A", "x", "").unwrap();
        nb.create_note("B", "y", "").unwrap();

        let out = run_cmd(&mut nb, &["pin", a.as_str()], true).unwrap();
        assert!(out.starts_with("Pinned"));

        let out = run_cmd(&mut nb, &["list", "--pinned"], true).unwrap();
        assert!(out.contains("  A"));
        assert!(!out.contains("  B"));
    }

    #[test]
    fn rm_respects_confirmation() {
        let mut nb = notebook();
        let id = nb.create_note("A", "", "").unwrap();

        let out = run_cmd(&mut nb, &["rm", id.as_str()], false).unwrap();
        assert_eq!(out, "Cancelled\n");
        assert_eq!(nb.notes().len(), 1);

        run_cmd(&mut nb, &["rm", id.as_str()], true).unwrap();
        assert!(nb.notes().is_empty());

        let out = run_cmd(&mut nb, &["rm", id.as_str(), "--yes"], true).unwrap();
        assert_eq!(out, "Nothing changed\n");
    }

    #[test]
    fn clear_requires_confirmation() {
        let mut nb = notebook();
        nb.create_note("A", "", "").unwrap();
        nb.create_note("B", "", "").unwrap();

        assert_eq!(run_cmd(&mut nb, &["clear"], false).unwrap(), "Nothing changed\n");
        assert_eq!(nb.notes().len(), 2);

        assert_eq!(run_cmd(&mut nb, &["clear"], true).unwrap(), "Deleted 2 notes\n");
        assert!(nb.notes().is_empty());
    }

    #[test]
    fn clone_and_tags() {
        let mut nb = notebook();
        let id = nb.create_note("A", "", "zeta, alpha").unwrap();
        run_cmd(&mut nb, &["clone", id.as_str()], true).unwrap();
        assert_eq!(nb.notes().len(), 2);

        let out = run_cmd(&mut nb, &["tags"], true).unwrap();
        assert_eq!(out, "alpha\nzeta\n");
    }

    #[test]
    fn export_to_file_and_import_back() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.json");
        let file_arg = file.to_str().unwrap();

        let mut nb = notebook();
        nb.create_note("A", "x", "t").unwrap();
        let out = run_cmd(&mut nb, &["export", "--out", file_arg], true).unwrap();
        assert!(out.starts_with("Exported 1 note as json"));

        let mut other = notebook();
        other.create_note("Old", "", "").unwrap();
        let out = run_cmd(&mut other, &["import", file_arg], false).unwrap();
        assert_eq!(out, "Cancelled\n");
        let out = run_cmd(&mut other, &["import", file_arg, "--yes"], false).unwrap();
        assert_eq!(out, "Imported 1 note\n");
        assert_eq!(other.notes(), nb.notes());
    }

    #[test]
    fn export_into_directory_uses_default_filename() {
        let dir = tempfile::tempdir().unwrap();
        let mut nb = notebook();
        nb.create_note("A", "x", "").unwrap();

        let target = dir.path().to_str().unwrap();
        run_cmd(&mut nb, &["export", "-f", "txt", "-o", target], true).unwrap();
        let text = std::fs::read_to_string(dir.path().join("notes.txt")).unwrap();
        assert!(text.starts_with("# A\n"));
    }

    #[test]
    fn export_text_to_stdout() {
        let mut nb = notebook();
        nb.create_note("A", "body", "t1,t2").unwrap();
        let out = run_cmd(&mut nb, &["export", "-f", "txt"], true).unwrap();
        assert!(out.starts_with("# A\nTags: t1, t2\nUpdated: "));
        assert!(out.contains("\n\nbody\n---\n"));
    }

    #[test]
    fn theme_toggle_persists() {
        let mut nb = notebook();
        assert_eq!(run_cmd(&mut nb, &["theme"], true).unwrap(), "light\n");
        let out = run_cmd(&mut nb, &["theme", "toggle"], true).unwrap();
        assert_eq!(out, "Theme set to dark\n");
        assert_eq!(run_cmd(&mut nb, &["theme"], true).unwrap(), "dark\n");
    }

    #[test]
    fn resolve_id_requires_unique_prefix() {
        let mut nb = notebook();
        let a = nb.create_note("A", "", "").unwrap();
        assert_eq!(resolve_id(&nb, &a[..4]), a);
        assert_eq!(resolve_id(&nb, ""), "");
        assert_eq!(resolve_id(&nb, "not-a-prefix"), "not-a-prefix");
    }

    #[test]
    fn configure_saves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut out = Vec::new();
        let store_path = Some(PathBuf::from("/data/n.db"));
        configure(&path, store_path, Some(false), &mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("\"storePath\": \"/data/n.db\""));

        let saved = settings::load_settings_from(&path);
        assert_eq!(saved.store_path, "/data/n.db");
        assert!(!saved.default_sort_recent);
    }
}
