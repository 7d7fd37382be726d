//! Command line surface.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{ArgAction, ArgGroup, Parser};
use wordlistctl_core::Config;

/// Placeholder argument that turns an operation into a listing.
const LIST_MARKER: &str = "?";

#[derive(Parser, Debug)]
#[command(
    name = "wordlistctl",
    version,
    about = "Fetch, verify and install wordlists",
    disable_help_flag = true,
    disable_version_flag = true,
    after_help = "Wordlist ids are relative to the chosen category: `-f 1337` and \
                  `-c 1 -f 1337` select different wordlists. Use `-f ? -c 1` to see them."
)]
#[command(group(
    ArgGroup::new("operation")
        .args(["fetch", "search_local", "search_catalog", "list_named"])
        .multiple(false)
))]
pub struct Cli {
    /// Download wordlist <ID> (0 for all); `?` lists wordlists with their ids
    #[arg(short = 'f', long = "fetch", value_name = "ID")]
    pub fetch: Option<String>,

    /// Wordlists base directory
    #[arg(short = 'd', long = "base-dir", value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Change category by index or name; `?` lists categories
    #[arg(short = 'c', long = "category", value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Search the base directory for file names matching <REGEX>
    #[arg(short = 's', long = "search-local", value_name = "REGEX")]
    pub search_local: Option<String>,

    /// Search the catalog for wordlist names matching <REGEX>
    #[arg(short = 'S', long = "search-catalog", value_name = "REGEX")]
    pub search_catalog: Option<String>,

    /// List wordlists of the given comma separated categories
    #[arg(short = 'F', long = "list-categories", value_name = "NAMES")]
    pub list_named: Option<String>,

    /// Prefer http sources
    #[arg(short = 'h', long = "prefer-http")]
    pub prefer_http: bool,

    /// Decompress downloaded archives
    #[arg(short = 'X', long = "decompress")]
    pub decompress: bool,

    /// Remove archives after decompression
    #[arg(short = 'r', long = "remove-archive")]
    pub remove_archive: bool,

    /// Max parallel downloads
    #[arg(
        short = 't',
        long = "threads",
        value_name = "NUM",
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub threads: Option<u16>,

    /// Disable torrent downloads
    #[arg(short = 'T', long = "no-torrent")]
    pub no_torrent: bool,

    /// User-Agent for direct downloads
    #[arg(short = 'A', long = "user-agent", value_name = "STR")]
    pub user_agent: Option<String>,

    /// Skip integrity checks
    #[arg(short = 'I', long = "skip-integrity-check")]
    pub skip_integrity_check: bool,

    /// Configuration file
    #[arg(long, value_name = "FILE", env = "WORDLISTCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Catalog file (JSON)
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Print version and exit
    #[arg(short = 'V', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,

    /// Print help and exit
    #[arg(short = 'H', long = "help", action = ArgAction::Help)]
    pub help: Option<bool>,
}

/// What the invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Fetch(i64),
    ListEntries,
    ListCategories,
    ListNamed(String),
    SearchCatalog(String),
    SearchLocal(String),
}

impl Cli {
    pub fn operation(&self) -> Result<Operation> {
        if self.category.as_deref() == Some(LIST_MARKER) {
            return Ok(Operation::ListCategories);
        }

        if let Some(fetch) = &self.fetch {
            if fetch == LIST_MARKER {
                return Ok(Operation::ListEntries);
            }
            let id = fetch
                .trim()
                .parse::<i64>()
                .map_err(|_| anyhow::anyhow!("{} is not a valid number", fetch))?;
            return Ok(Operation::Fetch(id));
        }

        if let Some(names) = &self.list_named {
            return Ok(Operation::ListNamed(names.clone()));
        }
        if let Some(pattern) = &self.search_catalog {
            return Ok(Operation::SearchCatalog(pattern.clone()));
        }
        if let Some(pattern) = &self.search_local {
            return Ok(Operation::SearchLocal(pattern.clone()));
        }

        bail!("no operation selected (-H for help and usage)")
    }

    /// Category key to activate, unless the flag asks for a listing.
    pub fn category_key(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| *c != LIST_MARKER)
    }

    /// Layer command line flags over the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(catalog) = &self.catalog {
            config.catalog = catalog.clone();
        }

        let retrieval = &mut config.retrieval;
        if let Some(dir) = &self.base_dir {
            retrieval.base_dir = std::path::absolute(dir).unwrap_or_else(|_| dir.clone());
        }
        if let Some(threads) = self.threads {
            retrieval.max_parallel = threads as usize;
        }
        if let Some(ua) = &self.user_agent {
            retrieval.user_agent = ua.clone();
        }
        retrieval.prefer_http |= self.prefer_http;
        retrieval.decompress |= self.decompress;
        retrieval.remove_archive |= self.remove_archive;
        retrieval.skip_integrity_check |= self.skip_integrity_check;
        if self.no_torrent {
            retrieval.torrent_downloads = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["wordlistctl"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_fetch_with_flags() {
        let cli = parse(&["-f", "0", "-Xr", "-t", "20", "-A", "noleak"]);
        assert_eq!(cli.operation().unwrap(), Operation::Fetch(0));

        let mut config = Config::default();
        cli.apply(&mut config);
        assert!(config.retrieval.decompress);
        assert!(config.retrieval.remove_archive);
        assert_eq!(config.retrieval.max_parallel, 20);
        assert_eq!(config.retrieval.user_agent, "noleak");
        assert!(config.retrieval.torrent_downloads);
    }

    #[test]
    fn test_short_h_is_prefer_http() {
        let cli = parse(&["-f", "2", "-d", "/tmp/wordlists", "-h", "-T", "-I"]);
        let mut config = Config::default();
        cli.apply(&mut config);
        assert!(config.retrieval.prefer_http);
        assert!(!config.retrieval.torrent_downloads);
        assert!(config.retrieval.skip_integrity_check);
        assert_eq!(
            config.retrieval.base_dir,
            PathBuf::from("/tmp/wordlists")
        );
    }

    #[test]
    fn test_listing_markers() {
        assert_eq!(
            parse(&["-f", "?", "-c", "1"]).operation().unwrap(),
            Operation::ListEntries
        );
        assert_eq!(parse(&["-c", "?"]).operation().unwrap(), Operation::ListCategories);
        assert_eq!(
            parse(&["-F", "username,password"]).operation().unwrap(),
            Operation::ListNamed("username,password".to_string())
        );
    }

    #[test]
    fn test_category_key() {
        assert_eq!(parse(&["-f", "0", "-c", "4"]).category_key(), Some("4"));
        assert_eq!(parse(&["-c", "?"]).category_key(), None);
    }

    #[test]
    fn test_searches() {
        assert_eq!(
            parse(&["-S", "rock"]).operation().unwrap(),
            Operation::SearchCatalog("rock".to_string())
        );
        assert_eq!(
            parse(&["-s", "rock.*"]).operation().unwrap(),
            Operation::SearchLocal("rock.*".to_string())
        );
    }

    #[test]
    fn test_invalid_id() {
        assert!(parse(&["-f", "abc"]).operation().is_err());
    }

    #[test]
    fn test_no_operation() {
        assert!(parse(&["-X"]).operation().is_err());
    }

    #[test]
    fn test_multiple_operations_rejected() {
        assert!(Cli::try_parse_from(["wordlistctl", "-f", "0", "-S", "rock"]).is_err());
    }

    #[test]
    fn test_zero_threads_rejected() {
        assert!(Cli::try_parse_from(["wordlistctl", "-f", "0", "-t", "0"]).is_err());
    }
}
