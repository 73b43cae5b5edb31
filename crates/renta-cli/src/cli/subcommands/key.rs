use clap::{Args, Subcommand};

/// API key commands.
#[derive(Clone, Debug, Subcommand)]
pub enum KeyCommands {
    /// Validate and store a key (read from stdin when omitted).
    Set(KeySetArgs),
    /// Remove the stored key.
    Clear,
    /// Show whether a usable key is stored.
    Status,
}

#[derive(Clone, Debug, Args)]
pub struct KeySetArgs {
    /// The OpenAI API key. Omit it to keep the key out of shell history.
    pub key: Option<String>,
}
