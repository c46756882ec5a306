//! Syllabus CLI: submit syllabus PDFs and download the generated artifact.
//!
//! Set SYLLABUS_API_URL (or API_URL) to point at the service; defaults to
//! http://localhost:8000. Downloads land in SYLLABUS_DOWNLOAD_DIR or `--out`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use syllabus_api_client::{ApiClient, LocalDownloads, SubmissionController};
use syllabus_cli::{init_tracing, pick_pdfs, render_or_fallback, render_state};
use syllabus_core::{ClientConfig, FileSelectionStore, SubmissionOptions};

#[derive(Parser)]
#[command(name = "syllabus", about = "Syllabus calendar generator CLI")]
struct Cli {
    /// Service base URL (overrides SYLLABUS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload PDFs and save the generated calendar, summary, or bundle
    Generate {
        /// PDF files to submit
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// A course schedule is among the files
        #[arg(long)]
        schedule: bool,
        /// Semester start date, sent with --schedule
        #[arg(long, value_name = "YYYY-MM-DD")]
        semester_start: Option<String>,
        /// Directory to save the download into
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print state transitions as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Check that the service is up
    Health,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = ClientConfig::from_env()
        .context("Failed to load configuration")?
        .with_base_url(cli.api_url);

    match cli.command {
        Commands::Generate {
            files,
            schedule,
            semester_start,
            out,
            json,
        } => {
            let config = config.with_download_dir(out);
            let reference_date = semester_start
                .as_deref()
                .map(SubmissionOptions::parse_date)
                .transpose()?;
            if reference_date.is_some() && !schedule {
                tracing::warn!("--semester-start is only sent together with --schedule");
            }

            let client = ApiClient::new(&config).context("Failed to create API client")?;
            let controller = SubmissionController::new(
                client,
                Arc::new(LocalDownloads::new(config.download_dir.clone())),
            );

            let mut selection = FileSelectionStore::new();
            selection.on_files_selected(pick_pdfs(&files).await?);
            let mut options = SubmissionOptions::new(schedule, reference_date);

            let mut transitions = controller.transitions();
            let renderer = tokio::spawn(async move {
                while let Some(state) = transitions.recv().await {
                    println!("{}", render_or_fallback(|| render_state(&state, json)));
                }
            });

            let result = controller.submit(&mut selection, &mut options).await;
            // Closes the transition channel so the renderer drains and exits.
            drop(controller);
            renderer.await.context("Renderer task failed")?;

            match result {
                Ok(saved) if json => print_json(&saved)?,
                Ok(saved) => println!("Saved {}", saved.path.display()),
                Err(err) => return Err(anyhow::Error::new(err).context("Submission failed")),
            }
        }
        Commands::Health => {
            let client = ApiClient::new(&config).context("Failed to create API client")?;
            let response = client
                .health()
                .await
                .with_context(|| format!("Health check against {} failed", client.base_url()))?;
            print_json(&response)?;
        }
    }

    Ok(())
}
