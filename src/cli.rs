// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Global flags configure where we talk to and where client state lives; each
// can also come from an environment variable (clap's `env` feature), which is
// how GITHUB_TOKEN reaches us.
//
// Subcommands map one-to-one onto library operations:
//   profile / repos              -> users
//   branches / ls / cat / readme -> contents, branches, README
//   inspect                      -> probes (language, live page, demo link)
//   token / theme / links        -> persisted client state
// =============================================================================

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use gh_folio::config::{DEFAULT_API_ROOT, DEFAULT_CONCURRENCY, DEFAULT_RAW_ROOT, DEFAULT_TIMEOUT_SECS};

#[derive(Parser, Debug)]
#[command(
    name = "gh-folio",
    version,
    about = "Browse a GitHub portfolio from the terminal",
    long_about = "gh-folio shows a GitHub user's profile and repositories, lets you browse \
                  repository contents on any branch, and renders READMEs to display-ready HTML."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// GitHub REST API root
    #[arg(long, global = true, env = "GH_FOLIO_API_ROOT", default_value = DEFAULT_API_ROOT)]
    pub api_root: String,

    /// Root for raw file content (used for README images)
    #[arg(long, global = true, env = "GH_FOLIO_RAW_ROOT", default_value = DEFAULT_RAW_ROOT)]
    pub raw_root: String,

    /// Access token. Taken from the environment, never written to disk
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Where theme, links and a typed-in token are kept
    #[arg(long, global = true, env = "GH_FOLIO_STATE")]
    pub state_file: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// How many repositories to enrich at once (repos --enrich)
    #[arg(long, global = true, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Output JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// More logging (-v info, -vv debug). RUST_LOG wins when set
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a user's profile
    ///
    /// Example: gh-folio profile octocat
    Profile { username: String },

    /// List a user's repositories (first 100, most recently updated first)
    Repos {
        username: String,

        /// Also detect language, live page and demo link for each repository
        #[arg(long)]
        enrich: bool,

        /// Leave out forks
        #[arg(long)]
        no_forks: bool,
    },

    /// List a repository's branches, marking the default pick
    Branches {
        /// owner/repo or a github.com URL
        repo: String,
    },

    /// List a directory
    ///
    /// Example: gh-folio ls rust-lang/rust src --ref master
    Ls {
        repo: String,

        /// Directory path, repository root if omitted
        #[arg(default_value = "")]
        path: String,

        /// Branch, tag or commit (default branch if omitted)
        #[arg(long = "ref")]
        r#ref: Option<String>,
    },

    /// Print a file
    Cat {
        repo: String,
        path: String,

        #[arg(long = "ref")]
        r#ref: Option<String>,
    },

    /// Print a repository's README as normalized HTML
    Readme {
        repo: String,

        #[arg(long = "ref")]
        r#ref: Option<String>,

        /// Fetch the markdown and render it locally instead of using
        /// GitHub's rendering; prints the rewritten markdown too
        #[arg(long)]
        markdown: bool,
    },

    /// Language guess, live page and package.json demo link for a repository
    Inspect { repo: String },

    /// Manage the stored access token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show or change the theme
    Theme {
        #[arg(value_enum)]
        choice: Option<ThemeChoice>,
    },

    /// Custom links and per-page link arrangement
    Links {
        #[command(subcommand)]
        action: LinkAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum TokenAction {
    /// Store a token (read from stdin when omitted)
    Set { value: Option<String> },
    /// Forget the stored token
    Clear,
    /// Where the active token comes from
    Status,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeChoice {
    Light,
    Dark,
    Toggle,
}

#[derive(Subcommand, Debug)]
pub enum LinkAction {
    /// Show custom links as arranged for a page
    List {
        /// Page the arrangement belongs to
        #[arg(long, default_value = "home")]
        page: String,
    },
    /// Add a link, or relabel an existing one with the same URL
    Add { label: String, url: String },
    /// Remove a link
    Remove { url: String },
    /// Move the link shown at position FROM to position TO (0-based)
    Move {
        from: usize,
        to: usize,
        #[arg(long, default_value = "home")]
        page: String,
    },
    /// Hide a link on a page
    Hide {
        url: String,
        #[arg(long, default_value = "home")]
        page: String,
    },
    /// Show a hidden link again
    Unhide {
        url: String,
        #[arg(long, default_value = "home")]
        page: String,
    },
}
