//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "homesick",
    about = "Manage dotfiles kept in git repositories (castles) and symlinked into your home",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override the target home directory
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Override the repository root holding the castles
    #[arg(long, global = true)]
    pub repos: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Clone a repository as a castle
    Clone(CloneOpts),
    /// Commit all changes in a castle
    Commit(CommitOpts),
    /// Show uncommitted changes in a castle
    Diff(CastleOpts),
    /// Run a command in the root of a castle
    Exec(ExecOpts),
    /// Run a command in the root of every castle
    #[command(alias = "exec_all")]
    ExecAll(ExecAllOpts),
    /// Create a new castle at PATH
    Generate(GenerateOpts),
    /// Symlink a castle's files into the home directory
    #[command(alias = "symlink")]
    Link(LinkOpts),
    /// List castles and their remotes
    List,
    /// Open the editor in the root of a castle
    #[command(alias = "edit")]
    Open(CastleOpts),
    /// Pull a castle, or every castle with --all
    Pull(PullOpts),
    /// Push a castle
    Push(CastleOpts),
    /// Start a shell in the root of a castle
    #[command(alias = "cd")]
    Shell(CastleOpts),
    /// Print the path of a castle
    #[command(aliases = ["path", "show_path"])]
    ShowPath(CastleOpts),
    /// Show the git status of a castle
    Status(CastleOpts),
    /// Move a file into a castle and link it back
    Track(TrackOpts),
    /// Remove a castle's symlinks from the home directory
    Unlink(CastleOpts),
    /// Print version information
    Version,
    /// Print a shell completion script
    Completions(CompletionsOpts),
}

impl Command {
    /// Subcommand name, used to name the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Clone(_) => "clone",
            Self::Commit(_) => "commit",
            Self::Diff(_) => "diff",
            Self::Exec(_) => "exec",
            Self::ExecAll(_) => "exec-all",
            Self::Generate(_) => "generate",
            Self::Link(_) => "link",
            Self::List => "list",
            Self::Open(_) => "open",
            Self::Pull(_) => "pull",
            Self::Push(_) => "push",
            Self::Shell(_) => "shell",
            Self::ShowPath(_) => "show-path",
            Self::Status(_) => "status",
            Self::Track(_) => "track",
            Self::Unlink(_) => "unlink",
            Self::Version => "version",
            Self::Completions(_) => "completions",
        }
    }
}

/// A single optional castle name.
#[derive(Parser, Debug, Clone, Default)]
pub struct CastleOpts {
    /// Castle name (defaults to the configured default castle)
    pub castle: Option<String>,
}

/// Options for the `clone` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CloneOpts {
    /// Repository URI, or `user/repo` for GitHub
    pub uri: String,
    /// Castle name (defaults to the repository name)
    pub name: Option<String>,
}

/// Options for the `commit` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct CommitOpts {
    /// Castle name
    pub castle: Option<String>,
    /// Commit message; the editor opens when omitted
    pub message: Vec<String>,
}

/// Options for the `exec` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ExecOpts {
    /// Castle name
    pub castle: String,
    /// Program and arguments
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Options for the `exec-all` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ExecAllOpts {
    /// Program and arguments
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Options for the `generate` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct GenerateOpts {
    /// Directory of the new castle
    pub path: PathBuf,
}

/// Options for the `link` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct LinkOpts {
    /// Castle name
    pub castle: Option<String>,
    /// Overwrite every conflict without asking
    #[arg(short, long, conflicts_with = "skip")]
    pub force: bool,
    /// Leave every conflict alone without asking
    #[arg(short, long)]
    pub skip: bool,
}

/// Options for the `pull` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct PullOpts {
    /// Castle name
    pub castle: Option<String>,
    /// Pull every castle
    #[arg(long, conflicts_with = "castle")]
    pub all: bool,
}

/// Options for the `track` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct TrackOpts {
    /// File or directory inside the home directory
    pub file: PathBuf,
    /// Castle name
    pub castle: Option<String>,
}

/// Options for the `completions` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionsOpts {
    /// Target shell
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
