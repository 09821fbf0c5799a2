use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{FormController, FormStatus, ListState, ReservationApi, ReservationClient};
use shared::{
    domain::{BookId, PagingState},
    error::{ApiError, Operation},
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::load_settings;

const DELETED_MESSAGE: &str = "Reservation deleted successfully.";

#[derive(Parser, Debug)]
#[command(name = "reservations", about = "Manage library reservations over the reservation API")]
struct Cli {
    /// Overrides the configured API base URL.
    #[arg(long)]
    api_url: Option<String>,
    /// Config file; defaults to ./reservations.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Create {
        user_id: String,
        book_id: String,
    },
    List {
        /// Token printed by a previous `list`.
        #[arg(long)]
        paging_state: Option<String>,
    },
    Show {
        book_id: String,
    },
    Update {
        old_book_id: String,
        user_id: String,
        book_id: String,
    },
    Delete {
        book_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let (mut settings, notes) = load_settings(cli.config.as_deref())?;
    if let Some(api_url) = cli.api_url {
        settings.api_base_url = api_url;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    for note in notes {
        warn!("config: {note}");
    }

    let http = reqwest::Client::builder()
        .timeout(settings.request_timeout())
        .build()
        .context("failed to build http client")?;
    let client = ReservationClient::with_http_client(http, &settings.api_base_url)
        .context("invalid api base url")?;

    let succeeded = run(cli.command, &client).await;
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run(command: Command, api: &dyn ReservationApi) -> bool {
    match command {
        Command::Create { user_id, book_id } => {
            let form = FormController::new()
                .set_user_id(user_id)
                .set_book_id(book_id)
                .submit_create(api)
                .await;
            report_form(form.status())
        }
        Command::Update {
            old_book_id,
            user_id,
            book_id,
        } => {
            let form = FormController::prefilled(user_id, book_id)
                .submit_update(api, &old_book_id)
                .await;
            report_form(form.status())
        }
        Command::List { paging_state } => {
            let cursor = paging_state.map(PagingState::from);
            match ListState::initial().load_page(api, cursor.as_ref()).await {
                Ok(state) => {
                    print!("{}", render::page_table(&state));
                    true
                }
                Err(err) => report_error(&err, Operation::ListPage),
            }
        }
        Command::Show { book_id } => {
            let book_id = match BookId::parse(&book_id) {
                Ok(id) => id,
                Err(err) => return report_error(&err.into(), Operation::Detail),
            };
            match api.fetch_detail(book_id).await {
                Ok(reservation) => {
                    print!("{}", render::detail(&reservation));
                    true
                }
                Err(err) => report_error(&err, Operation::Detail),
            }
        }
        Command::Delete { book_id } => {
            let book_id = match BookId::parse(&book_id) {
                Ok(id) => id,
                Err(err) => return report_error(&err.into(), Operation::Delete),
            };
            match api.delete_by_book_id(book_id).await {
                Ok(()) => {
                    println!("{DELETED_MESSAGE}");
                    true
                }
                Err(err) => report_error(&err, Operation::Delete),
            }
        }
    }
}

fn report_form(status: &FormStatus) -> bool {
    match status {
        FormStatus::Success { message } => {
            println!("{message}");
            true
        }
        FormStatus::Error { message, .. } => {
            eprintln!("{message}");
            false
        }
        FormStatus::Idle | FormStatus::Submitting { .. } => {
            eprintln!("submission did not settle");
            false
        }
    }
}

fn report_error(err: &ApiError, operation: Operation) -> bool {
    warn!(kind = ?err.kind(), "{err}");
    eprintln!("{}", err.user_message(operation));
    false
}
