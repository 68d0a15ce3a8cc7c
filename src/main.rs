//! CLI entry point for superstem-export
//!
//! Drives the export panel core from the command line: label preview,
//! export directory derivation, exporting a DigitalMicrograph file under its
//! derived name, new library creation and settings inspection.

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use superstem_export::config::{JsonFileStore, SettingsManager, SuperstemSettings};
use superstem_export::core::{
    naming::build_label, resolver::derive_export_directory, DisplayItem, FieldEdit, NamingField,
    NamingFields, SessionField, SessionMetadata, SessionStore,
};
use superstem_export::logging::{init_logging, LogConfig};
use superstem_export::panel::{
    project::record_project_switch, CopyWriter, DialogContext, DialogTicket, DocumentHost,
    ExportPanel, LibraryDialog, MemoryItem, PanelContext, PanelOptions, ProjectHost, UiTaskQueue,
    WarningPresenter, WriterRegistry,
};

/// Persistent panel state kept next to the settings file
const STATE_FILE_NAME: &str = "superstem_export_state.json";

#[derive(Parser)]
#[command(name = "superstem-export")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding superstem_customisation.json
    #[arg(short, long, global = true, default_value = "~/.config/superstem")]
    config_location: String,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the label an export action would give the display item
    Label {
        #[command(flatten)]
        naming: NamingArgs,
    },

    /// Derive the export directory for a session
    ExportDir {
        #[command(flatten)]
        session: SessionArgs,

        /// Date to use instead of today (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Export a DigitalMicrograph file under its derived name
    Export {
        /// Existing dm3/dm4 file standing in for the selected display item
        source: PathBuf,

        #[command(flatten)]
        naming: NamingArgs,

        #[command(flatten)]
        session: SessionArgs,

        /// Export directory to use instead of the derived one
        #[arg(long)]
        directory: Option<String>,

        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Create a new library below the data base directory
    NewLibrary {
        #[command(flatten)]
        session: SessionArgs,

        #[arg(long)]
        site: Option<String>,

        #[arg(long)]
        instrument: Option<String>,

        #[arg(long)]
        task: Option<String>,

        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show the resolved settings
    Settings {
        /// Rewrite the settings file in canonical form
        #[arg(long)]
        rewrite: bool,
    },
}

#[derive(Args)]
struct NamingArgs {
    #[arg(long)]
    no: String,

    #[arg(long, default_value = "")]
    sub: String,

    /// Field of view in nm
    #[arg(long)]
    fov: String,

    #[arg(long)]
    descr: String,

    #[arg(short, long, default_value = "HAADF")]
    action: String,
}

impl NamingArgs {
    fn fields(&self) -> NamingFields {
        NamingFields::new(&self.no, &self.sub, &self.fov, &self.descr)
    }

    fn edits(&self) -> Vec<FieldEdit<NamingField>> {
        NamingField::ALL
            .iter()
            .map(|&field| FieldEdit::new(field, self.fields().get(field)))
            .collect()
    }
}

#[derive(Args)]
struct SessionArgs {
    #[arg(long)]
    microscopist: String,

    #[arg(long)]
    sample: String,

    #[arg(long)]
    sample_area: String,
}

impl SessionArgs {
    fn to_session(&self) -> SessionMetadata {
        SessionMetadata::new()
            .with(SessionField::Microscopist, &self.microscopist)
            .with(SessionField::Sample, &self.sample)
            .with(SessionField::SampleArea, &self.sample_area)
    }
}

// Host seams for a single command-line run

struct CliHost {
    item: Rc<dyn DisplayItem>,
}

impl DocumentHost for CliHost {
    fn selected_display_item(&self) -> Option<Rc<dyn DisplayItem>> {
        Some(self.item.clone())
    }
}

struct ConsoleWarnings;

impl WarningPresenter for ConsoleWarnings {
    fn show_warning(&self, message: &str, _ticket: DialogTicket) {
        eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
    }
}

struct ConsoleProjects;

impl ProjectHost for ConsoleProjects {
    fn create_project_reference(&self, directory: &Path, name: &str) {
        println!("{} Project reference {} → {}", "✓".green(), name.bold(), directory.display());
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_logging(&LogConfig::from_verbosity(cli.verbose).with_ansi(!cli.no_color))?;

    let config_location = PathBuf::from(shellexpand::tilde(&cli.config_location).as_ref());
    let manager = SettingsManager::new(&config_location);
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Label { naming } => print_label(&naming)?,
        Commands::ExportDir { session, date } => {
            let settings = manager.load();
            let directory = derive_export_directory(
                &session.to_session(),
                &settings.export_base_directory(),
                date.unwrap_or(today),
            );
            println!("{}", directory.display());
        }
        Commands::Export {
            source,
            naming,
            session,
            directory,
            date,
        } => {
            let store = open_store(&config_location)?;
            let path = export(
                manager.load(),
                store,
                &source,
                &naming,
                &session,
                directory.as_deref(),
                date.unwrap_or(today),
            )?;
            println!("{} Exported {}", "✓".green().bold(), path.display());
        }
        Commands::NewLibrary {
            session,
            site,
            instrument,
            task,
            date,
        } => {
            let store = open_store(&config_location)?;
            let session_store = session.to_session();
            for (field, value) in [
                (SessionField::Site, site),
                (SessionField::Instrument, instrument),
                (SessionField::Task, task),
            ] {
                if let Some(value) = value {
                    session_store.set_value(field, &value);
                }
            }
            new_library(manager.load(), store, session_store, date.unwrap_or(today))?;
        }
        Commands::Settings { rewrite } => show_settings(&manager, rewrite)?,
    }

    Ok(())
}

fn open_store(config_location: &Path) -> anyhow::Result<Rc<JsonFileStore>> {
    let store = JsonFileStore::open(config_location.join(STATE_FILE_NAME))?;
    Ok(Rc::new(store))
}

fn print_label(naming: &NamingArgs) -> anyhow::Result<()> {
    let label = build_label(&naming.fields(), &naming.action)?;
    println!("{}", label.cyan().bold());
    Ok(())
}

/// Runs one export through a real panel instance
fn export(
    settings: SuperstemSettings,
    store: Rc<JsonFileStore>,
    source: &Path,
    naming: &NamingArgs,
    session: &SessionArgs,
    directory: Option<&str>,
    date: NaiveDate,
) -> anyhow::Result<PathBuf> {
    if !source.is_file() {
        anyhow::bail!("Source file not found: {}", source.display());
    }
    let title = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut writers = WriterRegistry::new();
    writers.register(Rc::new(CopyWriter::new(source.to_path_buf())));

    let mut options = PanelOptions::default();
    if !options.actions.contains(&naming.action) {
        options.actions.push(naming.action.clone());
    }

    let queue = Rc::new(UiTaskQueue::new());
    let ctx = PanelContext {
        session: Rc::new(session.to_session()),
        store,
        queue: queue.clone(),
        host: Rc::new(CliHost {
            item: Rc::new(MemoryItem::new(&title)),
        }),
        warnings: Rc::new(ConsoleWarnings),
        projects: Rc::new(ConsoleProjects),
        writers,
        settings,
    };
    let panel = ExportPanel::new(ctx, options)?;

    for edit in naming.edits() {
        panel.on_field_edited(edit);
    }
    match directory {
        Some(directory) => panel.on_export_directory_edited(directory),
        None => {
            let directory = panel.set_export_folder_on(date);
            println!("{} Export folder {}", "→".cyan(), directory.display());
        }
    }
    queue.run_pending();

    Ok(panel.export_named(&naming.action)?)
}

fn new_library(
    settings: SuperstemSettings,
    store: Rc<JsonFileStore>,
    session: SessionMetadata,
    date: NaiveDate,
) -> anyhow::Result<()> {
    let queue = Rc::new(UiTaskQueue::new());
    let ctx = DialogContext {
        session: Rc::new(session),
        queue: queue.clone(),
        projects: Rc::new(ConsoleProjects),
        settings,
    };
    let dialog = LibraryDialog::new(ctx, date);
    queue.run_pending();

    match dialog.create_library()? {
        Some(reference) => {
            record_project_switch(store.as_ref(), &reference.workspace_file);
            println!(
                "{} Library {} in {}",
                "✓".green().bold(),
                reference.name.bold(),
                dialog.data_base_directory().display()
            );
        }
        None => {
            println!(
                "{} Microscopist, sample and sample area are required",
                "✗".red().bold()
            );
            std::process::exit(1);
        }
    }
    Ok(())
}

fn show_settings(manager: &SettingsManager, rewrite: bool) -> anyhow::Result<()> {
    let settings = manager.load();

    println!("{}", format!("Settings from: {}\n", manager.settings_path().display()).bold());
    println!("  data_base_directory   {}", settings.data_base_directory().display());
    println!("  export_base_directory {}", settings.export_base_directory().display());
    for (key, value) in [
        ("default_project", &settings.default_project),
        ("compress_program", &settings.compress_program),
        ("hashes_program", &settings.hashes_program),
        ("superstem_site", &settings.superstem_site),
        ("superstem_instrument", &settings.superstem_instrument),
    ] {
        let value = value.as_deref().unwrap_or("-");
        println!("  {:<21} {}", key, value.dimmed());
    }
    if !settings.extra.is_empty() {
        println!("  ({} other keys)", settings.extra.len());
    }

    if rewrite {
        manager.rewrite()?;
        println!("\n{} Rewrote {}", "✓".green(), manager.settings_path().display());
    }
    Ok(())
}
