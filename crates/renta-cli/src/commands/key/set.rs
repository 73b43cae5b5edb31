use std::io::IsTerminal;

use anyhow::Context;
use renta_auth::CredentialStore;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::KeySetArgs;
use crate::output::output;

#[derive(Serialize)]
struct KeySetResponse {
    stored: bool,
    source: String,
}

pub fn handle(args: &KeySetArgs, flags: &GlobalFlags, store: &CredentialStore) -> anyhow::Result<()> {
    let key = match &args.key {
        Some(key) => key.clone(),
        None => read_key(flags.quiet)?,
    };

    // Rejected keys leave the stored one untouched.
    let source = store.save(key.trim_end_matches(['\r', '\n']))?;
    output(
        &KeySetResponse {
            stored: true,
            source: source.to_string(),
        },
        flags.format,
    )
}

fn read_key(quiet: bool) -> anyhow::Result<String> {
    if !quiet && std::io::stdin().is_terminal() {
        eprint!("OpenAI API key: ");
    }
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read API key from stdin")?;
    Ok(line)
}
