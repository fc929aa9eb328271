use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::path::PathBuf;

/// Scrape songs from an Instagram profile and add them to Apple Music.
#[derive(Debug, Parser)]
#[command(name = "tunescout", version)]
pub struct Cli {
    /// Instagram username to scrape (overrides TARGET_INSTAGRAM_USER)
    #[arg(long)]
    pub user: Option<String>,

    /// Number of posts to scan (overrides MAX_POSTS, default 100)
    #[arg(long)]
    pub posts: Option<usize>,

    /// Show what would be added without actually adding
    #[arg(long)]
    pub dry_run: bool,

    /// Save results to a CSV file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Log verbosity (overrides LOG_LEVEL, default info)
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Runtime configuration merged from CLI arguments and environment
/// variables; CLI wins.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub target_user: String,
    pub max_posts: usize,
    pub dry_run: bool,
    pub log_level: String,
    pub output_file: Option<PathBuf>,

    pub ig_session_id: Option<String>,

    pub apple_developer_token: Option<String>,
    pub apple_user_token: Option<String>,
    pub storefront: String,
}

impl RunConfig {
    pub fn load(cli: &Cli) -> Result<Self> {
        dotenvy::dotenv().ok();

        let target_user = cli
            .user
            .clone()
            .or_else(|| env::var("TARGET_INSTAGRAM_USER").ok())
            .context("TARGET_INSTAGRAM_USER must be set in the environment or passed via --user")?;

        let max_posts = match cli.posts {
            Some(posts) => posts,
            None => env::var("MAX_POSTS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .context("MAX_POSTS must be a number")?,
        };

        Ok(Self {
            target_user,
            max_posts,
            dry_run: cli.dry_run || env_flag("DRY_RUN"),
            log_level: cli
                .log_level
                .clone()
                .or_else(|| env::var("LOG_LEVEL").ok())
                .unwrap_or_else(|| "info".to_string()),
            output_file: cli.output.clone(),
            ig_session_id: env::var("IG_SESSION_ID").ok(),
            apple_developer_token: env::var("APPLE_DEVELOPER_TOKEN").ok(),
            apple_user_token: env::var("APPLE_MUSIC_USER_TOKEN").ok(),
            storefront: env::var("APPLE_MUSIC_STOREFRONT").unwrap_or_else(|_| "us".to_string()),
        })
    }

    /// The catalog session is mandatory for live runs; dry runs never touch
    /// the catalog.
    pub fn require_developer_token(&self) -> Result<&str> {
        self.apple_developer_token
            .as_deref()
            .context("APPLE_DEVELOPER_TOKEN is required unless running with --dry-run")
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|value| value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_developer_token_is_an_error() {
        let config = RunConfig {
            target_user: "someband".into(),
            max_posts: 100,
            dry_run: false,
            log_level: "info".into(),
            output_file: None,
            ig_session_id: None,
            apple_developer_token: None,
            apple_user_token: None,
            storefront: "us".into(),
        };
        assert!(config.require_developer_token().is_err());

        let config = RunConfig {
            apple_developer_token: Some("token".into()),
            ..config
        };
        assert_eq!(config.require_developer_token().unwrap(), "token");
    }
}
