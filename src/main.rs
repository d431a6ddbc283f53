// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

// Use library instead of local modules
use scf_casebook::{
    audit, export_all, Config, ConfigArgs, DataStore, Exhibit, Presenter, Severity, TableView,
    ViewOptions, TABLES,
};

/// 📚 SCF Casebook - P&G / Fibria supply chain finance exhibits
#[derive(Debug, Parser)]
#[command(
    name = "scf-casebook",
    version,
    about = "P&G / Fibria supply chain finance case exhibits"
)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the 14 exhibits
    List,

    /// Render one exhibit (q1-q6, exhibit-1 ... exhibit-8)
    Render {
        id: String,

        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render every exhibit plus manifest.json into a directory
    Export {
        /// Defaults to --export-dir
        dir: Option<PathBuf>,
    },

    /// Preview tables, all of them or those one exhibit binds
    Tables {
        id: Option<String>,

        /// Also write each table as CSV into this directory
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Recompute hand-calculated figures and list mismatches
    Audit {
        #[arg(long)]
        json: bool,
    },

    /// Interactive exhibit browser (default)
    Tui,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::from(cli.config);
    let options = ViewOptions {
        debug: config.debug,
        height: config.height,
        show_tables: false,
    };

    match cli.command.unwrap_or(Command::Tui) {
        Command::List => run_list(),
        Command::Render { id, output } => run_render(&id, output.as_deref(), &options),
        Command::Export { dir } => run_export(&dir.unwrap_or_else(|| config.export_dir.clone())),
        Command::Tables { id, csv } => run_tables(id.as_deref(), csv.as_deref()),
        Command::Audit { json } => run_audit(json),
        Command::Tui => run_ui_mode(&config),
    }
}

fn run_list() -> Result<()> {
    println!("📚 SCF Casebook - {} exhibits", Exhibit::ALL.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for exhibit in Exhibit::ALL {
        println!(
            "{:<10} {:<10} {} ({} tables)",
            exhibit.label(),
            exhibit.slug(),
            exhibit.title(),
            exhibit.tables().len()
        );
    }

    Ok(())
}

fn run_render(id: &str, output: Option<&Path>, options: &ViewOptions) -> Result<()> {
    let presenter = Presenter::new();
    let presentation = presenter.render_by_id(id, options);

    if let Some(error) = &presentation.error {
        if let Some(traceback) = &error.traceback {
            eprintln!("{}", traceback);
        }
        bail!("{}", error.message);
    }

    if let Some(panel) = &presentation.debug {
        eprintln!("🔍 {}", panel.render_report.summary());
        eprintln!(
            "🔍 {} characters, viewer height {}px",
            panel.document_length, presentation.height
        );
        eprintln!("🔍 {}", panel.integrity.summary());
    }

    match output {
        Some(path) => {
            std::fs::write(path, &presentation.document)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("✓ Wrote {} to {}", presentation.title, path.display());
        }
        None => print!("{}", presentation.document),
    }

    Ok(())
}

fn run_export(dir: &Path) -> Result<()> {
    println!("📦 Exporting exhibits to {}", dir.display());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let store = DataStore::new();
    let manifest =
        export_all(&store, dir).with_context(|| format!("exporting to {}", dir.display()))?;

    for entry in &manifest.exhibits {
        println!("✓ {:<16} {:>7} chars  {}", entry.file, entry.length, &entry.sha256[..12]);
    }
    println!("\n✅ {} exhibits + manifest.json", manifest.exhibits.len());

    Ok(())
}

fn run_tables(id: Option<&str>, csv: Option<&Path>) -> Result<()> {
    let store = DataStore::new();

    let views = match id {
        Some(id) => {
            let exhibit: Exhibit = id.parse()?;
            println!("📊 Tables for {} - {}\n", exhibit, exhibit.title());
            TableView::for_exhibit(&store, exhibit)?
        }
        None => {
            println!("📊 All {} tables\n", TABLES.len());
            TABLES
                .iter()
                .map(|info| TableView::from_store(&store, info.key))
                .collect::<scf_casebook::Result<Vec<_>>>()?
        }
    };

    for view in &views {
        print_table(view);
        if let Some(dir) = csv {
            let path = view
                .write_csv(dir)
                .with_context(|| format!("writing {}.csv", view.name))?;
            println!("✓ Wrote {}\n", path.display());
        }
    }

    Ok(())
}

fn print_table(view: &TableView) {
    let widths: Vec<usize> = view
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            view.rows
                .iter()
                .map(|row| row.get(i).map_or(0, |cell| cell.chars().count()))
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
                .min(40)
        })
        .collect();

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let text: String = cell.chars().take(*width).collect();
                format!("{:<width$}", text, width = *width)
            })
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{} ({} rows)", view.name, view.len());
    println!("{}", line(view.columns.as_slice()));
    for row in &view.rows {
        println!("{}", line(row.as_slice()));
    }
    println!();
}

fn run_audit(json: bool) -> Result<()> {
    let report = audit(&DataStore::new());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("🧮 Integrity audit");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for finding in &report.findings {
        let icon = match finding.severity {
            Severity::Critical => "❌",
            Severity::Warning => "⚠️ ",
        };
        println!(
            "{} {} [{}] {}: stated {} vs {}",
            icon, finding.table, finding.record, finding.field, finding.stated, finding.note
        );
    }

    println!("\n{}", report.summary());
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    println!("🖥️  Loading SCF Casebook...\n");
    println!("Starting UI... (Press 'q' to quit)\n");

    // stderr output would tear the alternate screen
    log::set_max_level(log::LevelFilter::Off);

    let mut app = ui::App::new(Presenter::new(), config.clone());
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use web UI: cargo run --bin casebook-server --features server");
    std::process::exit(1);
}
