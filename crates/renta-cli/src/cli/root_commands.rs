use clap::{Args, Subcommand, ValueEnum};

use crate::cli::subcommands::KeyCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Ask one question and stream the answer.
    Ask(AskArgs),
    /// Ask questions interactively until an empty line or EOF.
    Chat,
    /// Manage the stored API key.
    Key {
        #[command(subcommand)]
        action: KeyCommands,
    },
    /// Show which answer server would be used.
    Endpoint,
    /// Print the JSON schema of a response type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct AskArgs {
    /// The question; words are joined with single spaces.
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,
}

impl AskArgs {
    #[must_use]
    pub fn query(&self) -> String {
        self.question.join(" ")
    }
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    #[arg(value_enum)]
    pub type_name: SchemaType,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaType {
    Ask,
    Session,
    KeyStatus,
    Endpoint,
}
