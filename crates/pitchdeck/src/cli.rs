use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pitchdeck")]
#[command(author, version, about)]
#[command(long_about = "An interactive pitch deck presenter.\n\n\
    Slides, points and media are described in a YAML deck file; without one\n\
    the bundled deck is shown.\n\n\
    Examples:\n  \
    pitchdeck                        Present the bundled deck (fullscreen)\n  \
    pitchdeck deck.yaml --windowed   Present a deck in a window\n  \
    pitchdeck deck.yaml --watch      Reload the deck whenever it is saved\n  \
    pitchdeck check deck.yaml        Validate a deck and its assets")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// YAML deck to present (the bundled deck when omitted)
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long, global = false)]
    pub slide: Option<usize>,

    /// Reload the deck when the file changes
    #[arg(long, global = false, requires = "file")]
    pub watch: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a deck file and every asset it references
    Check {
        /// Deck file to validate
        file: PathBuf,
    },

    /// Print the slides and points of a deck
    Outline {
        /// Deck file (the bundled deck when omitted)
        file: Option<PathBuf>,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.theme, defaults.transition_ms, audio.volume)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Check { file }) => crate::commands::check::run(&file),
            Some(Commands::Outline { file }) => crate::commands::outline::run(file.as_deref()),
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                crate::commands::version::run();
                Ok(())
            }
            None => {
                if let Some(file) = &self.file {
                    if !file.exists() {
                        anyhow::bail!("File not found: {}", file.display());
                    }
                }
                crate::app::run(crate::app::LaunchOptions {
                    deck_path: self.file,
                    windowed: self.windowed,
                    start_slide: self.slide,
                    watch: self.watch,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_present_flags() {
        let cli = Cli::parse_from([
            "pitchdeck",
            "deck.yaml",
            "--windowed",
            "--slide",
            "3",
            "--watch",
        ]);
        assert_eq!(cli.file, Some(PathBuf::from("deck.yaml")));
        assert!(cli.windowed);
        assert_eq!(cli.slide, Some(3));
        assert!(cli.watch);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_watch_needs_a_file() {
        assert!(Cli::try_parse_from(["pitchdeck", "--watch"]).is_err());
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::parse_from(["pitchdeck", "-vv", "outline"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Commands::Outline { file: None })));
    }
}
