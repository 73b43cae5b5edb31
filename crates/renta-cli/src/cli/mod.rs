use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{ColorMode, GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `renta` binary.
#[derive(Debug, Parser)]
#[command(
    name = "renta",
    version,
    about = "RentaGPT - ask about Spanish personal income tax from the terminal"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Colors and hyperlinks: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,

    /// Answer server URL (ws:// or wss://), bypassing host routing
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Host name used to pick the answer server from the configured routes
    #[arg(long, global = true)]
    pub host: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            color: self.color,
            endpoint: self.endpoint.clone(),
            host: self.host.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::subcommands::KeyCommands;
    use super::{Cli, ColorMode, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_table_output() {
        let cli = Cli::try_parse_from(["renta", "endpoint"]).expect("cli should parse");
        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.color, ColorMode::Auto);
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "renta",
            "--format",
            "json",
            "--verbose",
            "--host",
            "rentagpt.com",
            "endpoint",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
        assert_eq!(cli.host.as_deref(), Some("rentagpt.com"));
        assert!(matches!(cli.command, Commands::Endpoint));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["renta", "chat", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Chat));
    }

    #[test]
    fn ask_joins_question_words() {
        let cli = Cli::try_parse_from(["renta", "ask", "¿Cómo", "tributa", "un", "alquiler?"])
            .expect("cli should parse");

        let Commands::Ask(args) = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(args.query(), "¿Cómo tributa un alquiler?");
    }

    #[test]
    fn ask_requires_a_question() {
        assert!(Cli::try_parse_from(["renta", "ask"]).is_err());
    }

    #[test]
    fn key_set_accepts_optional_value() {
        let cli = Cli::try_parse_from(["renta", "key", "set"]).expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Key {
                action: KeyCommands::Set(ref args)
            } if args.key.is_none()
        ));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["renta", "--format", "xml", "endpoint"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from([
            "renta",
            "--endpoint",
            "ws://127.0.0.1:9000/chat",
            "--color",
            "never",
            "endpoint",
        ])
        .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.endpoint.as_deref(), Some("ws://127.0.0.1:9000/chat"));
        assert_eq!(flags.color, ColorMode::Never);
    }
}
