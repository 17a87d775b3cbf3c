use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{DocumentFile, HttpGateway, SessionController, SessionError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod repl;

use config::load_settings;
use repl::{parse_command, render, render_updates, Command, HELP};

#[derive(Parser, Debug)]
#[command(about = "Upload a document and ask questions about it")]
struct Args {
    #[arg(long, default_value = "docchat.toml")]
    config: PathBuf,
    /// Overrides the backend address from the config file and environment.
    #[arg(long)]
    backend_url: Option<String>,
    /// Documents to select before the prompt opens.
    files: Vec<PathBuf>,
}

async fn read_documents(paths: &[PathBuf]) -> Result<Vec<DocumentFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = DocumentFile::from_path(path)
            .await
            .with_context(|| format!("failed to load document '{}'", path.display()))?;
        files.push(file);
    }
    Ok(files)
}

/// Runs a round-trip in the background so the prompt stays responsive and
/// the renderer can show the loading state. A second call made meanwhile
/// comes back as `Busy`.
fn spawn_call<F>(call: F)
where
    F: std::future::Future<Output = Result<(), SessionError>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(err) = call.await {
            println!("{err}");
        }
    });
}

/// Runs one command. Returns `false` when the user asked to leave.
async fn handle(controller: &Arc<SessionController>, command: Command) -> bool {
    let outcome = match command {
        Command::Quit => return false,
        Command::Help => {
            println!("{HELP}");
            return true;
        }
        Command::Status => {
            print!("{}", render(&controller.snapshot().await));
            return true;
        }
        Command::Select(paths) => match read_documents(&paths).await {
            Ok(files) => controller.select_files(files).await,
            Err(err) => {
                println!("{err:#}");
                Ok(())
            }
        },
        Command::Upload => {
            let controller = Arc::clone(controller);
            spawn_call(async move { controller.upload().await });
            Ok(())
        }
        Command::Reset => {
            controller.reset().await;
            Ok(())
        }
        Command::Question(text) => match controller.set_question(text).await {
            Ok(()) => {
                let controller = Arc::clone(controller);
                spawn_call(async move { controller.submit_question().await });
                Ok(())
            }
            Err(SessionError::NotChatting) => {
                println!("upload a document first (:select <path>, then :upload)");
                Ok(())
            }
            Err(err) => Err(err),
        },
    };

    if let Err(err) = outcome {
        println!("{err}");
    }
    true
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config);
    if let Some(url) = args.backend_url {
        settings.backend_url = url;
    }
    info!(backend_url = %settings.backend_url, "starting docchat");

    let gateway = HttpGateway::new(&settings.backend_url).context("invalid backend url")?;
    let controller = Arc::new(SessionController::new(Arc::new(gateway)));
    tokio::spawn(render_updates(controller.subscribe(), |frame| print!("{frame}")));

    if !args.files.is_empty() {
        let files = read_documents(&args.files).await?;
        controller.select_files(files).await?;
    }
    if args.files.is_empty() {
        print!("{}", render(&controller.snapshot().await));
    }
    println!("type :help for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if !handle(&controller, parse_command(&line)).await {
            break;
        }
    }

    Ok(())
}
