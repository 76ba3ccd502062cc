use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "daybook", author, version, about = "Daily notes and attachments for a markdown vault")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Vault root directory
    #[arg(long, global = true, default_value = ".")]
    pub vault: PathBuf,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Report what would be written without touching the vault
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the path of today's daily note, creating it if needed
    Today {
        /// Only print the path
        #[arg(long)]
        no_create: bool,
    },
    /// Check whether a vault path is a daily note
    Check {
        /// Vault-relative path, e.g. Daily/2024/Jan/2024-01-15.md
        path: String,
    },
    /// Save files next to a note and embed them in it
    Attach {
        /// Vault-relative path of the note
        #[arg(long)]
        note: String,

        /// Files to attach, processed in order
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },
    /// Validate a date format and render the current time with it
    Format {
        /// Moment-style format, e.g. "dddd, MMMM D YYYY"
        format: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_attach() {
        let cli =
            Cli::try_parse_from(["daybook", "--dry-run", "-vv", "attach", "--note", "Inbox.md", "a.png", "b.pdf"]).unwrap();
        assert!(cli.dry_run);
        assert_eq!(cli.verbose, 2);
        let Command::Attach { note, files } = cli.command else {
            panic!("expected attach");
        };
        assert_eq!(note, "Inbox.md");
        assert_eq!(files, vec![PathBuf::from("a.png"), PathBuf::from("b.pdf")]);
    }

    #[test]
    fn test_attach_requires_files() {
        assert!(Cli::try_parse_from(["daybook", "attach", "--note", "Inbox.md"]).is_err());
    }
}
