use std::path::PathBuf;

mod init;
mod menu;
mod status;
mod terminal;

use clap::ArgAction;
use init::Init;
use menu::Menu;
use status::Status;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The path to the root of the catalog
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or(Command::Menu(Menu::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Create the config file and empty data files
    Init(Init),

    /// Show record counts
    Status(Status),

    /// Start an interactive session (default)
    ///
    /// Administrators manage libraries and items; members borrow and return
    /// items.
    Menu(Menu),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Init(command) => command.run(&root),
            Self::Status(command) => command.run(root),
            Self::Menu(command) => command.run(root),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn no_subcommand_defaults_to_menu() {
        let cli = Cli::try_parse_from(["catalog"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.root, PathBuf::from("."));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["catalog", "status", "-vv", "--root", "/tmp/lib"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.root, PathBuf::from("/tmp/lib"));
        assert!(matches!(cli.command, Some(Command::Status(_))));
    }
}
