use renta_config::RentaConfig;

use crate::cli::{Commands, GlobalFlags};
use crate::commands;

/// Route a parsed command to its handler.
pub async fn dispatch(
    command: Commands,
    config: &RentaConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Ask(args) => commands::ask::handle(&args, flags, config).await,
        Commands::Chat => commands::chat::handle(flags, config).await,
        Commands::Key { action } => commands::key::handle(&action, flags, config),
        Commands::Endpoint => commands::endpoint::handle(flags, config),
        Commands::Schema(args) => commands::schema::handle(&args, flags),
    }
}
