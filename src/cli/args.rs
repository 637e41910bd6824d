//! Command-line argument definitions using clap.

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::api::Category;
use crate::config::{Config, Gamemode};

/// Default recursion depth for `recursive-favorites`.
pub const DEFAULT_DEPTH: u32 = 3;

/// osu! beatmapset downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "osu-beatmap-downloader",
    version,
    about = "Bulk-download osu! beatmapsets from a player profile",
    long_about = "A CLI tool to download every beatmapset from selected categories of an osu! profile.\n\n\
                  Supports favourites, ranked, loved, pending, graveyard, most played, top scores \n\
                  and first places, plus recursive favourites across map creators."
)]
pub struct Args {
    /// Path to configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a configuration file holding your OAuth credentials.
    GenerateConfig {
        /// OAuth application client ID.
        #[arg(long)]
        client_id: u64,

        /// OAuth application client secret.
        #[arg(long)]
        client_secret: String,
    },

    /// Download beatmapsets from selected categories of a profile.
    Download(DownloadArgs),

    /// Download a user's favourites, then their creators' favourites, and so on.
    RecursiveFavorites(RecursiveArgs),
}

/// Options shared by the downloading subcommands.
#[derive(ClapArgs, Debug, Clone)]
pub struct SharedArgs {
    /// Numeric ID of the osu! user.
    #[arg(short, long)]
    pub user: u64,

    /// Existing directory to save beatmapsets into.
    #[arg(short, long = "output")]
    pub output: Option<PathBuf>,

    /// Stop paging a category at the first empty page instead of trusting
    /// the profile's counts.
    #[arg(long)]
    pub stop_on_empty_page: bool,

    /// OAuth client ID (overrides the config file).
    #[arg(long, env = "OSU_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<u64>,

    /// OAuth client secret (overrides the config file).
    #[arg(long, env = "OSU_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct DownloadArgs {
    #[command(flatten)]
    pub shared: SharedArgs,

    /// Favourite beatmapsets.
    #[arg(short = 'f', long = "favorite")]
    pub favourite: bool,

    /// Ranked and approved beatmapsets.
    #[arg(short, long)]
    pub ranked: bool,

    /// Loved beatmapsets.
    #[arg(short, long)]
    pub loved: bool,

    /// Pending beatmapsets.
    #[arg(short, long)]
    pub pending: bool,

    /// Graveyarded beatmapsets.
    #[arg(short, long)]
    pub graveyard: bool,

    /// Most played beatmapsets.
    #[arg(short, long = "most-played")]
    pub most_played: bool,

    /// Beatmapsets of the user's top scores.
    #[arg(short, long)]
    pub best: bool,

    /// Beatmapsets of the user's first places.
    #[arg(short = '1', long)]
    pub firsts: bool,

    /// Ruleset for top scores and first places.
    #[arg(long, value_enum)]
    pub gamemode: Option<GamemodeArg>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RecursiveArgs {
    #[command(flatten)]
    pub shared: SharedArgs,

    /// How many levels of users to visit (1 = only this user's favourites).
    #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
    pub depth: u32,
}

/// CLI gamemode argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GamemodeArg {
    Osu,
    Taiko,
    /// osu!catch.
    #[value(alias = "catch")]
    Fruits,
    Mania,
}

impl From<GamemodeArg> for Gamemode {
    fn from(arg: GamemodeArg) -> Self {
        match arg {
            GamemodeArg::Osu => Gamemode::Osu,
            GamemodeArg::Taiko => Gamemode::Taiko,
            GamemodeArg::Fruits => Gamemode::Fruits,
            GamemodeArg::Mania => Gamemode::Mania,
        }
    }
}

impl DownloadArgs {
    /// Categories selected by flags, in canonical order.
    pub fn categories(&self) -> Vec<Category> {
        let flags = [
            (self.favourite, Category::Favourite),
            (self.ranked, Category::Ranked),
            (self.loved, Category::Loved),
            (self.pending, Category::Pending),
            (self.graveyard, Category::Graveyard),
            (self.most_played, Category::MostPlayed),
            (self.best, Category::Best),
            (self.firsts, Category::Firsts),
        ];

        flags
            .into_iter()
            .filter_map(|(set, category)| set.then_some(category))
            .collect()
    }

    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        self.shared.merge_into_config(config);

        if let Some(gamemode) = self.gamemode {
            config.options.gamemode = gamemode.into();
        }
    }
}

impl SharedArgs {
    /// Whether the CLI or environment supplied full credentials.
    pub fn has_credentials(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }

    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(client_id) = self.client_id {
            config.credentials.client_id = client_id;
        }

        if let Some(secret) = &self.client_secret {
            config.credentials.client_secret = secret.clone();
        }

        if let Some(dir) = &self.output {
            config.options.output_directory = Some(dir.clone());
        }

        // Only override when set, so the config file can turn it on.
        if self.stop_on_empty_page {
            config.options.stop_on_empty_page = true;
        }
    }
}

impl Command {
    /// Shared download options, if this subcommand downloads anything.
    pub fn shared(&self) -> Option<&SharedArgs> {
        match self {
            Command::GenerateConfig { .. } => None,
            Command::Download(args) => Some(&args.shared),
            Command::RecursiveFavorites(args) => Some(&args.shared),
        }
    }
}
