use std::io::Write;

use anyhow::Context;
use renta_client::SessionController;
use renta_config::RentaConfig;
use renta_core::responses::AskResponse;
use renta_core::{SessionEvent, SessionState};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::ask;
use crate::output::output;

/// Handle `renta chat`.
///
/// Every finished session, complete or failed, is reset before the next
/// question. An empty line or EOF ends the loop.
pub async fn handle(flags: &GlobalFlags, config: &RentaConfig) -> anyhow::Result<()> {
    let controller = SessionController::from_config(config)?;
    let store = renta_auth::CredentialStore::from_config(&config.credential)?;
    let api_key = ask::load_api_key(&store)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut state = SessionState::new();
    let mut asked = 0_usize;

    loop {
        if !flags.quiet {
            prompt(if asked == 0 {
                "Ask a question: "
            } else {
                "\nAsk another question: "
            });
        }

        let Some(line) = lines
            .next_line()
            .await
            .context("failed to read question from stdin")?
        else {
            break;
        };
        let query = line.trim();
        if query.is_empty() {
            break;
        }

        let (finished, result) = ask::run_session(&controller, query, &api_key, flags, state).await;
        if let Err(error) = result {
            eprintln!("renta error: {error}");
        }
        if flags.format != OutputFormat::Table {
            output(&AskResponse::from(&finished), flags.format)?;
        }

        state = finished.apply(SessionEvent::Reset);
        asked += 1;
    }

    tracing::debug!(asked, "chat ended");
    Ok(())
}

fn prompt(text: &str) {
    let mut stderr = std::io::stderr().lock();
    let _ = write!(stderr, "{text}").and_then(|()| stderr.flush());
}
