use crate::calendar::SourceKind;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gapfill")]
#[command(about = "Backfill empty contribution-calendar days with date-stamped git commits")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Path to git repository")]
    pub repo: Option<PathBuf>,

    #[arg(long, global = true, help = "Directory holding saved settings (default: ~/.gapfill)")]
    pub config_dir: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,
}

#[derive(Args, Clone, Default)]
pub struct RangeArgs {
    #[arg(long, help = "First day (YYYY-MM-DD, RFC3339, or a duration like 90days); defaults to the saved period")]
    pub since: Option<String>,

    #[arg(long, help = "Last day (YYYY-MM-DD, RFC3339, or a duration like 7days); defaults to today with --since, else the saved period")]
    pub until: Option<String>,
}

#[derive(Args, Clone)]
pub struct SourceArgs {
    #[arg(long, value_enum, default_value_t = SourceKind::Github, help = "Where existing contributions are read from")]
    pub source: SourceKind,

    #[arg(long, help = "GitHub username (overrides GITHUB_USER and saved credentials)")]
    pub username: Option<String>,

    #[arg(long, help = "GitHub token (overrides GITHUB_TOKEN and saved credentials)")]
    pub token: Option<String>,
}

#[derive(Args, Clone)]
pub struct FillArgs {
    #[clap(flatten)]
    pub range: RangeArgs,

    #[clap(flatten)]
    pub source: SourceArgs,

    #[arg(long, allow_negative_numbers = true, help = "Maximum commits added to an empty day (default: saved value, then 3)")]
    pub max_per_day: Option<i64>,

    #[arg(short, long, help = "Commit message for the generated commits")]
    pub message: Option<String>,

    #[arg(long, help = "Seed for reproducible commit counts and times")]
    pub seed: Option<u64>,

    #[arg(long, help = "Print the plan without creating commits")]
    pub dry_run: bool,

    #[arg(long, help = "Output as JSON")]
    pub json: bool,

    #[arg(long, help = "Remember the resolved period for later runs")]
    pub save_period: bool,
}

#[derive(Args, Clone)]
pub struct CommitArgs {
    #[arg(long, required_unless_present = "random", conflicts_with = "random", help = "Exact local time: \"YYYY-MM-DD HH:MM:SS\"")]
    pub at: Option<String>,

    #[arg(long, help = "Pick a random day of the period and a random time of day")]
    pub random: bool,

    #[arg(short, long, help = "Commit message")]
    pub message: String,

    #[arg(long, help = "Stage one random changed file before committing")]
    pub stage_random: bool,

    #[clap(flatten)]
    pub range: RangeArgs,

    #[arg(long, help = "Seed for the random choices")]
    pub seed: Option<u64>,
}

#[derive(Args, Clone)]
pub struct CalendarArgs {
    #[clap(flatten)]
    pub range: RangeArgs,

    #[clap(flatten)]
    pub source: SourceArgs,

    #[arg(long, help = "Output as JSON")]
    pub json: bool,
}

#[derive(Subcommand, Clone)]
pub enum ConfigAction {
    /// Print the saved settings
    Show,
    /// Save GitHub credentials
    Credentials {
        #[arg(long)]
        username: String,
        #[arg(long)]
        token: String,
    },
    /// Save the default fill period
    Period {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    /// Save the maximum commits added to an empty day (1-7)
    MaxCommits { value: u32 },
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill every empty day of a period with empty commits
    Fill(FillArgs),
    /// Create one dated commit from the staged changes
    Commit(CommitArgs),
    /// Show the contribution calendar for a period
    Calendar(CalendarArgs),
    /// Manage saved settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Fill(args) => crate::fill::exec(&self.common, args),
            Commands::Commit(args) => crate::commit::exec(&self.common, args),
            Commands::Calendar(args) => crate::calendar::exec(&self.common, args),
            Commands::Config { action } => crate::settings::exec(&self.common, action),
        }
    }
}
