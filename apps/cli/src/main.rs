use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    BlobImageStore, FormValues, HttpMeasureApi, ImageStore, SelectedFile, SubmitOutcome,
    WorkflowCoordinator,
};
use shared::domain::DisplayUnit;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod plot_files;
mod terminal;

use config::{load_settings, Settings};
use plot_files::FilePlotStore;
use terminal::TerminalView;

#[derive(Parser, Debug)]
#[command(name = "pathgauge", about = "Measure tool-path distances on a remote server")]
struct Cli {
    /// Overrides `server_url` from pathgauge.toml / the environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a file, print the measured distance and fetch the plot.
    Measure {
        #[arg(long)]
        file: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        start_line: String,
        #[arg(long, allow_hyphen_values = true)]
        end_line: String,
        #[arg(long)]
        unit: Option<DisplayUnit>,
        /// Re-render the result in these units after the first one.
        #[arg(long = "show-in", value_delimiter = ',')]
        show_in: Vec<DisplayUnit>,
        /// Write the plot here instead of keeping it in memory.
        #[arg(long)]
        plot_dir: Option<PathBuf>,
    },
    /// List the supported display units.
    Units,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }

    match cli.command {
        Command::Measure {
            file,
            start_line,
            end_line,
            unit,
            show_in,
            plot_dir,
        } => {
            if let Some(unit) = unit {
                settings.default_unit = unit;
            }
            if plot_dir.is_some() {
                settings.plot_dir = plot_dir;
            }
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read '{}'", file.display()))?;
            let filename = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string());
            let form = FormValues {
                file: Some(SelectedFile::new(filename, bytes)),
                start_line,
                end_line,
            };
            measure(&settings, form, &show_in).await?;
        }
        Command::Units => {
            for unit in DisplayUnit::ALL {
                println!("{:<3} {} per mm", unit.label(), unit.factor());
            }
        }
    }

    Ok(())
}

async fn measure(settings: &Settings, form: FormValues, show_in: &[DisplayUnit]) -> Result<()> {
    let api = HttpMeasureApi::with_endpoints(
        &settings.server_url,
        &settings.upload_path,
        &settings.plot_path,
        settings.request_timeout(),
    )?;
    let view = Arc::new(TerminalView::new(form));
    let memory_store = BlobImageStore::new();
    let images: Arc<dyn ImageStore> = match &settings.plot_dir {
        Some(dir) => {
            let store = FilePlotStore::new(dir)?;
            info!(dir = %store.dir().display(), "writing plots to disk");
            Arc::new(store)
        }
        None => Arc::new(memory_store.clone()),
    };
    let coordinator = WorkflowCoordinator::new_with_unit(
        Arc::new(api),
        view.clone(),
        images,
        settings.default_unit,
    );

    let outcome = coordinator.submit().await;
    print!("{}", view.render());
    match outcome.context("measurement failed")? {
        SubmitOutcome::Completed => {}
        SubmitOutcome::Superseded => anyhow::bail!("measurement was superseded"),
    }

    for unit in show_in {
        if coordinator.change_unit(*unit).await.is_some() {
            println!("--- {unit}");
            print!("{}", view.render());
        }
    }

    if settings.plot_dir.is_none() {
        if let Some(plot) = coordinator
            .current_plot()
            .await
            .and_then(|handle| memory_store.get(&handle))
        {
            println!(
                "plot kept in memory ({} bytes, {}); pass --plot-dir to save it",
                plot.bytes.len(),
                plot.mime_type
            );
        }
    }

    Ok(())
}
