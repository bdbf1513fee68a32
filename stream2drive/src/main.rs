mod config;
mod console;
mod mime;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use drive_client::DriveClient;
use drive_types::{FileMetadata, DEFAULT_MIME_TYPE};
use progress_tracking::{NoOpProgressSink, ProgressSink};
use tracing::debug;
use transfer::{OutputSink, TransferEngine, UploadSource};

use crate::config::Config;
use crate::console::ConsoleProgress;

const USER_AGENT: &str = concat!("stream2drive", "/", env!("CARGO_PKG_VERSION"));

#[derive(Parser)]
#[command(
    name = "stream2drive",
    version,
    about = "Stream files to and from Google Drive"
)]
struct Cli {
    /// Operate inside this Drive folder instead of the root.
    #[arg(short, long, global = true)]
    parent: Option<String>,

    /// Print chunk-level progress to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download a remote file. Use '-' as the output name for stdout.
    Get(GetArgs),
    /// Upload a local file. Use '-' as the file to read standard input.
    Put(PutArgs),
    /// List files in the working folder.
    List,
    /// Print MD5 checksums of files in the working folder.
    Md5,
}

#[derive(Args)]
struct GetArgs {
    /// Remote file name.
    file: String,

    /// Local destination name; defaults to the remote name.
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Args)]
struct PutArgs {
    /// Local file to upload, or '-' for standard input.
    file: String,

    /// Remote name; defaults to the local file name. Required with '-'.
    #[arg(short, long)]
    output: Option<String>,

    /// Override the guessed MIME type.
    #[arg(short, long)]
    mime: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Only this layer prints errors; everything below returns them.
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}.");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve()?;
    debug!(
        "endpoint={} chunk_size={} data_dir={}",
        config.api_endpoint,
        config.chunk_size,
        config.data_dir.display()
    );
    let client = DriveClient::new(
        &config.api_endpoint,
        &config.upload_endpoint,
        &config.auth_config(),
        USER_AGENT,
    )?;

    let parent_id = match &cli.parent {
        Some(name) => Some(client.find_folder(name)?),
        None => None,
    };

    let progress: Box<dyn ProgressSink> = if cli.verbose {
        Box::new(ConsoleProgress)
    } else {
        Box::new(NoOpProgressSink)
    };
    let engine = TransferEngine::new(&client, progress.as_ref()).with_chunk_size(config.chunk_size);

    match cli.command {
        Command::Get(args) => {
            let local = args.output.as_deref().unwrap_or(&args.file);
            let sink = if local == "-" {
                OutputSink::Stdout
            } else {
                OutputSink::File(PathBuf::from(local))
            };
            engine.download(&args.file, parent_id.as_deref().unwrap_or("root"), sink)?;
        },
        Command::Put(args) => {
            let (source, name, guessed_mime) = if args.file == "-" {
                let Some(name) = args.output.clone() else {
                    bail!("uploading from standard input requires --output <name>");
                };
                (UploadSource::stdin(), name, DEFAULT_MIME_TYPE.to_owned())
            } else {
                let name = match args.output.clone() {
                    Some(name) => name,
                    None => Path::new(&args.file)
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| args.file.clone()),
                };
                (
                    UploadSource::file(&args.file)?,
                    name,
                    mime::guess(&args.file),
                )
            };

            let mut metadata = FileMetadata::new(name, args.mime.unwrap_or(guessed_mime));
            if let Some(id) = &parent_id {
                metadata = metadata.with_parent(id.clone());
            }
            engine.upload(source, &metadata)?;
        },
        Command::List => {
            for entry in client.list_files(parent_id.as_deref().unwrap_or("root"))? {
                println!("{}", console::format_list_entry(&entry));
            }
        },
        Command::Md5 => {
            for entry in client.list_files(parent_id.as_deref().unwrap_or("root"))? {
                println!("{}", console::format_md5_entry(&entry));
            }
        },
    }

    Ok(())
}
