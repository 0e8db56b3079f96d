// SPDX-License-Identifier: MIT

use clap::ValueEnum;
use exo_daemon::Response;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print a successful response either as pretty JSON or a short,
/// human-readable line — there's no table renderer here, every response
/// shape is printed the same uniform way.
pub fn print_response(response: &Response, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(response) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("error: failed to render response as JSON: {e}"),
        },
        OutputFormat::Text => print_text(response),
    }
}

fn print_text(response: &Response) {
    match response {
        Response::Pong => println!("pong"),
        Response::Ok => println!("ok"),
        Response::Created { id } => println!("{id}"),
        Response::Job { id } => println!("job {id}"),
        Response::Resolved { ids } => {
            for id in ids {
                println!("{}", id.as_deref().unwrap_or("-"));
            }
        }
        Response::Applied { warnings } => {
            println!("applied");
            for warning in warnings {
                eprintln!("warning: {warning}");
            }
        }
        Response::Components { components } => {
            for c in components {
                println!("{}\t{}\t{}", c.id.as_str(), c.type_, c.name);
            }
        }
        Response::Processes { processes } => {
            for p in processes {
                println!("{p:?}");
            }
        }
        Response::Resources { resources } => {
            for r in resources {
                println!("{r:?}");
            }
        }
        Response::Logs { groups } => {
            for g in groups {
                println!("{g:?}");
            }
        }
        Response::Events { page } => {
            for event in &page.items {
                println!("{event:?}");
            }
        }
        Response::Workspace { description } => println!("{description:?}"),
        Response::Error { status, message } => eprintln!("error ({status}): {message}"),
    }
}
