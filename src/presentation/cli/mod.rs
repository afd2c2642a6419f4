pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::entities::project_config::CONFIG_FILE_NAME;
use crate::infrastructure::git::GitCli;
use crate::presentation::ui::DisplayHelper;
use commands::{CommandContext, ExecCommand, HealthCommand, InitCommand, StatusCommand};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    " ",
    env!("BUILD_DATE"),
    ")"
);

/// Output format for batch reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    Text,
    /// JSON output
    Json,
}

/// nestrepo - Discover and manage nested git repositories inside a project tree
#[derive(Debug, Parser)]
#[command(name = "nestrepo")]
#[command(about = "Discover and manage nested git repositories inside a project tree")]
#[command(version = VERSION)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project root (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Configuration file (defaults to <project root>/project-repos.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Git executable
    #[arg(long, global = true, env = "NESTREPO_GIT", default_value = "git")]
    pub git: String,

    /// Seconds allowed for a remote reachability probe
    #[arg(long, global = true, env = "NESTREPO_REMOTE_TIMEOUT", default_value_t = 10)]
    pub remote_timeout: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage the repositories nested in this project
    #[command(subcommand)]
    Repo(RepoCommand),
}

#[derive(Debug, Subcommand)]
pub enum RepoCommand {
    /// Scan the project tree and write project-repos.json
    Init {
        /// Overwrite an existing configuration without asking
        #[arg(short, long)]
        yes: bool,

        /// Directory levels to scan below the project root
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..=32))]
        max_depth: Option<u16>,

        /// Directory names or relative paths to skip (comma separated)
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,

        /// Record repositories nested inside other repositories (default)
        #[arg(long, overrides_with = "no_nested")]
        nested: bool,

        /// Stop at the first repository on each branch of the tree
        #[arg(long, overrides_with = "nested")]
        no_nested: bool,
    },

    /// Show the working-tree status of each repository
    Status {
        /// Only repositories whose name or path contains this text, or whose group equals it
        #[arg(short, long)]
        filter: Option<String>,

        /// Seconds allowed for the whole batch
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Run a git command in each repository
    Exec {
        /// Git command line, e.g. "fetch --all"
        command: String,

        /// Only repositories whose name or path contains this text, or whose group equals it
        #[arg(short, long)]
        filter: Option<String>,

        /// Seconds allowed for the whole batch
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Check that each configured repository is present and consistent
    Health {
        /// Only repositories whose name or path contains this text, or whose group equals it
        #[arg(short, long)]
        filter: Option<String>,

        /// Also check that the remote answers
        #[arg(long)]
        check_remote: bool,

        /// Seconds allowed for the whole batch
        #[arg(short, long)]
        timeout: Option<u64>,
    },
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    pub fn from_cli(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected command and return the process exit code
    pub async fn run(self) -> anyhow::Result<i32> {
        let context = self.context()?;

        match self.cli.command_repo() {
            RepoCommand::Init {
                yes,
                max_depth,
                exclude,
                nested,
                no_nested,
            } => {
                InitCommand {
                    yes: *yes,
                    max_depth: max_depth.map(usize::from),
                    exclude: exclude.clone(),
                    nested: *nested || !no_nested,
                }
                .execute(&context)
                .await
            }
            RepoCommand::Status { filter, timeout } => {
                StatusCommand {
                    filter: filter.clone(),
                    timeout: *timeout,
                    verbose: self.cli.verbose,
                }
                .execute(&context)
                .await
            }
            RepoCommand::Exec {
                command,
                filter,
                timeout,
            } => {
                ExecCommand {
                    command: command.clone(),
                    filter: filter.clone(),
                    timeout: *timeout,
                }
                .execute(&context)
                .await
            }
            RepoCommand::Health {
                filter,
                check_remote,
                timeout,
            } => {
                HealthCommand {
                    filter: filter.clone(),
                    check_remote: *check_remote,
                    timeout: *timeout,
                }
                .execute(&context)
                .await
            }
        }
    }

    fn context(&self) -> anyhow::Result<CommandContext> {
        let project_root = match &self.cli.directory {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        let config_path = self
            .cli
            .config
            .clone()
            .unwrap_or_else(|| project_root.join(CONFIG_FILE_NAME));
        let git = GitCli::new()
            .with_executable(self.cli.git.clone())
            .with_probe_timeout(self.cli.remote_timeout);

        let display = DisplayHelper::detect(self.cli.no_color, self.cli.verbose);
        colored::control::set_override(display.use_color);

        Ok(CommandContext {
            project_root,
            config_path,
            output: self.cli.output,
            display,
            git: Arc::new(git),
        })
    }
}

impl Cli {
    fn command_repo(&self) -> &RepoCommand {
        let Commands::Repo(command) = &self.command;
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_init_flags() {
        let cli = Cli::try_parse_from([
            "nestrepo",
            "repo",
            "init",
            "-y",
            "--max-depth",
            "5",
            "--exclude",
            "target,dist",
            "--no-nested",
        ])
        .unwrap();

        let RepoCommand::Init {
            yes,
            max_depth,
            exclude,
            no_nested,
            ..
        } = cli.command_repo()
        else {
            panic!("Expected init");
        };
        assert!(*yes);
        assert_eq!(*max_depth, Some(5));
        assert_eq!(exclude, &vec!["target".to_string(), "dist".to_string()]);
        assert!(*no_nested);
    }

    #[test]
    fn test_max_depth_is_bounded() {
        assert!(Cli::try_parse_from(["nestrepo", "repo", "init", "--max-depth", "0"]).is_err());
        assert!(Cli::try_parse_from(["nestrepo", "repo", "init", "--max-depth", "33"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "nestrepo", "repo", "health", "--check-remote", "--output", "json", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(matches!(
            cli.command_repo(),
            RepoCommand::Health {
                check_remote: true,
                ..
            }
        ));
    }
}
