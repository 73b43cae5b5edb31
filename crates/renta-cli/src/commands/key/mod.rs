mod clear;
mod set;
mod status;

use renta_config::RentaConfig;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::KeyCommands;

/// Handle `renta key <subcommand>`.
pub fn handle(
    action: &KeyCommands,
    flags: &GlobalFlags,
    config: &RentaConfig,
) -> anyhow::Result<()> {
    let store = renta_auth::CredentialStore::from_config(&config.credential)?;
    match action {
        KeyCommands::Set(args) => set::handle(args, flags, &store),
        KeyCommands::Clear => clear::handle(flags, &store),
        KeyCommands::Status => status::handle(flags, &store),
    }
}
