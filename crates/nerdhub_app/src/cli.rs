//! Command-line surface of the `nerdhub` binary.
//!
//! Global options may also come from the environment so a shell profile can
//! point every invocation at the same backend and state directory.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use hub_logging::LogDestination;
use nerdhub_core::{GameSortField, QuoteSortField};

/// NerdHub dashboard in the terminal.
#[derive(Parser, Debug)]
#[command(name = "nerdhub")]
#[command(version)]
#[command(about = "Browse the NerdHub game library and quotes, and run admin jobs")]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalOptions {
    /// Backend base URL; `/api/...` paths are appended to it.
    #[arg(long, env = "NERDHUB_API_ROOT", global = true)]
    pub api_root: Option<String>,

    /// Directory holding view preferences and the sign-in session.
    ///
    /// Defaults to the current directory.
    #[arg(long, env = "NERDHUB_STATE_DIR", global = true)]
    pub state_dir: Option<PathBuf>,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogTarget::File, global = true)]
    pub log: LogTarget,

    /// Log at debug level.
    #[arg(short = 'v', long = "verbose", global = true)]
    pub is_verbose: bool,

    /// Delay between status requests when the server suggests none.
    #[arg(long, default_value_t = 1000, global = true)]
    pub poll_default_ms: u64,

    /// Status requests allowed per update run; 0 means no limit.
    #[arg(long, default_value_t = 1800, global = true)]
    pub poll_max_attempts: u32,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the shared game library.
    Games(GamesArgs),

    /// Show one game, optionally refreshing its store data first.
    Game {
        appid: u32,
        /// Ask the backend to re-fetch the store page before showing it.
        #[arg(long)]
        refresh: bool,
    },

    /// List quotes.
    Quotes(QuotesArgs),

    /// Show a featured quote.
    #[command(subcommand)]
    Quote(FeaturedQuote),

    /// Delete a quote by id.
    DeleteQuote { id: String },

    /// List Steam id to member mappings.
    Mappings,

    /// Add a mapping or update an existing one.
    SetMapping {
        #[arg(long)]
        steam_id: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        nickname: Option<String>,
    },

    /// Refresh owned games for a set of Steam accounts and wait for the result.
    UpdateGames {
        /// Comma or space separated Steam ids.
        #[arg(long)]
        steam_ids: String,
        /// Restrict the update to these app ids.
        #[arg(long)]
        app_ids: Option<String>,
        /// Replace data the backend already has.
        #[arg(long)]
        override_existing: bool,
    },

    /// Compare running versions with the latest releases.
    About,

    /// Show the signed-in profile.
    Profile,

    /// Sign in with an identity claims JSON document.
    Login {
        #[arg(long)]
        claims: PathBuf,
    },

    /// Forget the current sign-in.
    Logout,

    /// Inspect or clear saved view preferences.
    #[command(subcommand)]
    Prefs(PrefsCommand),
}

#[derive(Args, Debug, Clone, Default)]
pub struct GamesArgs {
    /// Case-insensitive match on the game name.
    #[arg(long)]
    pub search: Option<String>,

    /// Only games owned by this Steam id (repeatable; all must own it).
    #[arg(long = "owner")]
    pub owners: Vec<String>,

    /// Only games in this category (repeatable; all must match).
    #[arg(long = "category")]
    pub categories: Vec<String>,

    #[arg(long)]
    pub free_only: bool,

    #[arg(long)]
    pub on_sale: bool,

    /// name, price, discount, owners or appid.
    #[arg(long, value_parser = parse_game_sort)]
    pub sort: Option<GameSortField>,

    #[arg(long, conflicts_with = "asc")]
    pub desc: bool,

    #[arg(long)]
    pub asc: bool,

    /// Remember sort and toggles for later runs.
    #[arg(long)]
    pub save: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct QuotesArgs {
    /// Case-insensitive match on quote text, author or context.
    #[arg(long)]
    pub search: Option<String>,

    /// Only quotes by this author (repeatable).
    #[arg(long = "author")]
    pub authors: Vec<String>,

    /// date or author.
    #[arg(long, value_parser = parse_quote_sort)]
    pub sort: Option<QuoteSortField>,

    #[arg(long, conflicts_with = "asc")]
    pub desc: bool,

    #[arg(long)]
    pub asc: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeaturedQuote {
    Random,
    Daily,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefsCommand {
    Show,
    Reset,
}

fn parse_game_sort(value: &str) -> Result<GameSortField, String> {
    GameSortField::parse(value).ok_or_else(|| {
        format!("unknown sort field `{value}` (expected name, price, discount, owners or appid)")
    })
}

fn parse_quote_sort(value: &str) -> Result<QuoteSortField, String> {
    QuoteSortField::parse(value)
        .ok_or_else(|| format!("unknown sort field `{value}` (expected date or author)"))
}
