// SPDX-License-Identifier: MIT

//! exo - local workload orchestrator CLI

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod daemon_process;
mod env;
mod output;

use std::io::Read as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use exo_daemon::Request;

use crate::client::{ClientError, DaemonClient};
use crate::output::{print_response, OutputFormat};

#[derive(Parser)]
#[command(name = "exo", version, about = "Local workload orchestrator")]
struct Cli {
    /// Workspace root; defaults to the current directory.
    #[arg(short = 'C', long = "dir", global = true, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Workspace(WorkspaceCommand),
    /// Convert a Compose file on stdin into an exo manifest on stdout
    Compose2exo,
    /// Manage the exod background process
    Daemon {
        #[command(subcommand)]
        command: DaemonCommand,
    },
}

#[derive(Subcommand)]
enum WorkspaceCommand {
    /// Describe the workspace itself
    Describe,
    /// Tear down every component and remove the workspace
    Destroy,
    /// Apply a manifest file to the workspace
    Apply {
        /// Manifest path (format inferred from its suffix unless --format is given)
        path: PathBuf,
        #[arg(long)]
        format: Option<String>,
    },
    /// Refresh every component, or just the named ones
    Refresh {
        refs: Vec<String>,
    },
    /// Resolve refs (names or ids) to component ids
    Resolve {
        refs: Vec<String>,
    },
    /// List components
    Ps {
        #[arg(long = "type")]
        types: Vec<String>,
        #[arg(long)]
        include_disposed: bool,
    },
    CreateComponent {
        name: String,
        type_: String,
        spec: String,
    },
    UpdateComponent {
        ref_: String,
        type_: String,
        spec: String,
    },
    RefreshComponent {
        ref_: String,
    },
    DisposeComponent {
        ref_: String,
    },
    DeleteComponent {
        ref_: String,
    },
    /// Describe every log group in the workspace
    Logs,
    /// Page through log events
    Events {
        #[arg(long)]
        log: Vec<String>,
        #[arg(long)]
        cursor: Option<String>,
        #[arg(long, default_value_t = 0)]
        prev: usize,
        #[arg(long, default_value_t = 50)]
        next: usize,
    },
    Start,
    Stop,
    Restart,
    StartComponent {
        ref_: String,
    },
    StopComponent {
        ref_: String,
    },
    RestartComponent {
        ref_: String,
    },
    Processes,
    Volumes,
    Networks,
}

#[derive(Subcommand)]
enum DaemonCommand {
    Start,
    Stop,
    Status,
    Restart,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let root = resolve_root(cli.directory)?;

    if let Err(e) = run(cli.command, &root, cli.output).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
    Ok(())
}

fn resolve_root(directory: Option<PathBuf>) -> anyhow::Result<String> {
    let dir = match directory {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    Ok(dir.canonicalize().unwrap_or(dir).display().to_string())
}

async fn run(command: Commands, root: &str, format: OutputFormat) -> anyhow::Result<()> {
    let command = match command {
        Commands::Compose2exo => return compose2exo(),
        Commands::Daemon { command } => return daemon_command(command).await,
        Commands::Workspace(command) => command,
    };

    let request = build_request(command, root);
    let client = match &request {
        Request::Describe { .. } | Request::Resolve { .. } | Request::DescribeComponents { .. } | Request::DescribeLogs { .. } | Request::GetEvents { .. } | Request::DescribeProcesses { .. } | Request::DescribeVolumes { .. } | Request::DescribeNetworks { .. } => {
            DaemonClient::for_query().or_else(|_| DaemonClient::for_action())?
        }
        _ => DaemonClient::for_action()?,
    };

    match client.call(&request).await {
        Ok(response) => {
            print_response(&response, format);
            Ok(())
        }
        Err(ClientError::Rejected { status, message }) => {
            eprintln!("error ({status}): {message}");
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

fn build_request(command: WorkspaceCommand, root: &str) -> Request {
    let root = root.to_string();
    match command {
        WorkspaceCommand::Describe => Request::Describe { root },
        WorkspaceCommand::Destroy => Request::Destroy { root },
        WorkspaceCommand::Apply { path, format } => {
            let path = if path.is_absolute() { path } else { std::path::Path::new(&root).join(path) };
            Request::Apply { root, format, path: Some(path.display().to_string()), source: None }
        }
        WorkspaceCommand::Refresh { refs } => Request::RefreshAllComponents { root, refs: if refs.is_empty() { None } else { Some(refs) } },
        WorkspaceCommand::Resolve { refs } => Request::Resolve { root, refs },
        WorkspaceCommand::Ps { types, include_disposed } => {
            Request::DescribeComponents { root, ids: None, types: if types.is_empty() { None } else { Some(types) }, include_disposed }
        }
        WorkspaceCommand::CreateComponent { name, type_, spec } => Request::CreateComponent { root, name, type_, spec },
        WorkspaceCommand::UpdateComponent { ref_, type_, spec } => Request::UpdateComponent { root, ref_, type_, spec },
        WorkspaceCommand::RefreshComponent { ref_ } => Request::RefreshComponent { root, ref_ },
        WorkspaceCommand::DisposeComponent { ref_ } => Request::DisposeComponent { root, ref_ },
        WorkspaceCommand::DeleteComponent { ref_ } => Request::DeleteComponent { root, ref_ },
        WorkspaceCommand::Logs => Request::DescribeLogs { root },
        WorkspaceCommand::Events { log, cursor, prev, next } => Request::GetEvents { root, logs: if log.is_empty() { None } else { Some(log) }, cursor, prev, next },
        WorkspaceCommand::Start => Request::Start { root },
        WorkspaceCommand::Stop => Request::Stop { root },
        WorkspaceCommand::Restart => Request::Restart { root },
        WorkspaceCommand::StartComponent { ref_ } => Request::StartComponent { root, ref_ },
        WorkspaceCommand::StopComponent { ref_ } => Request::StopComponent { root, ref_ },
        WorkspaceCommand::RestartComponent { ref_ } => Request::RestartComponent { root, ref_ },
        WorkspaceCommand::Processes => Request::DescribeProcesses { root },
        WorkspaceCommand::Volumes => Request::DescribeVolumes { root },
        WorkspaceCommand::Networks => Request::DescribeNetworks { root },
    }
}

fn compose2exo() -> anyhow::Result<()> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let hcl = exo_manifest::compose_to_exo(&input)?;
    print!("{hcl}");
    Ok(())
}

async fn daemon_command(command: DaemonCommand) -> anyhow::Result<()> {
    match command {
        DaemonCommand::Start => {
            DaemonClient::for_action()?;
            println!("exod running");
        }
        DaemonCommand::Stop => {
            daemon_process::stop_daemon_sync();
            println!("exod stopped");
        }
        DaemonCommand::Restart => {
            daemon_process::stop_daemon_sync();
            DaemonClient::for_action()?;
            println!("exod running");
        }
        DaemonCommand::Status => {
            let running = match DaemonClient::for_query() {
                Ok(client) => client.send(&Request::Ping).await.is_ok(),
                Err(_) => false,
            };
            println!("{}", if running { "exod is running" } else { "exod is not running" });
        }
    }
    Ok(())
}
