//! Command-line interface for cnblogs-publish.
//!
//! One note per invocation: create it on first run, update it afterwards.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::adapters::CnblogsClient;
use crate::config::{self, ResolvedConfig};
use crate::core::{publish_note, InjectOutcome, NoteReport, Publisher};

/// cnblogs-publish - publish or update a Markdown note on cnblogs
#[derive(Parser, Debug)]
#[command(name = "cnblogs-publish")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Markdown note to publish
    pub note: PathBuf,

    /// Config file (defaults to .cnblogs/config.yaml in this or a parent directory)
    #[arg(short, long, env = "CNBLOGS_PUBLISH_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let config = config::load_config(self.config.as_deref())?;
        self.run(config).await
    }

    /// Publish the note with already resolved configuration
    pub async fn run(self, config: ResolvedConfig) -> Result<()> {
        if let Some(path) = &config.config_file {
            info!("Using config file {}", path.display());
        }

        if !self.note.is_file() {
            anyhow::bail!(
                "File not found: {}\nUsage: cnblogs-publish <NOTE.md>",
                self.note.display()
            );
        }

        let client =
            CnblogsClient::from_config(&config).context("Failed to create cnblogs client")?;
        let publisher = Publisher::new(client);

        let report = publish_note(&self.note, &publisher).await?;
        print_report(&report);

        Ok(())
    }
}

/// Print the result of a run
fn print_report(report: &NoteReport) {
    let post = &report.outcome.post;
    println!("Successfully {}: {} (ID: {})", report.outcome.action, report.title, post.id);
    println!("Link: {}", post.url);

    match report.injection {
        Some(InjectOutcome::CreatedBlock) | Some(InjectOutcome::Inserted) => {
            println!("Recorded post_id: {} in the note", post.id);
        }
        Some(InjectOutcome::MalformedBlock) => {
            eprintln!(
                "Warning: front matter is incomplete, \
                 add `post_id: {}` by hand to avoid duplicates",
                post.id
            );
        }
        Some(InjectOutcome::AlreadyPresent) | None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiSettings, Credentials};
    use clap::CommandFactory;
    use tempfile::TempDir;

    fn offline_config() -> ResolvedConfig {
        ResolvedConfig {
            credentials: Credentials::new("session=abc", "xsrf-123"),
            api: ApiSettings::default(),
            config_file: None,
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_requires_exactly_one_note() {
        assert!(Cli::try_parse_from(["cnblogs-publish"]).is_err());
        assert!(Cli::try_parse_from(["cnblogs-publish", "a.md", "b.md"]).is_err());

        let cli = Cli::try_parse_from(["cnblogs-publish", "a.md"]).unwrap();
        assert_eq!(cli.note, PathBuf::from("a.md"));
    }

    #[tokio::test]
    async fn test_missing_note_names_file_and_usage() {
        let temp = TempDir::new().unwrap();
        let cli = Cli {
            note: temp.path().join("missing-note.md"),
            config: None,
        };

        let err = cli.run(offline_config()).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("File not found"), "{}", message);
        assert!(message.contains("missing-note.md"), "{}", message);
        assert!(message.contains("Usage: cnblogs-publish <NOTE.md>"), "{}", message);
    }

    #[tokio::test]
    async fn test_directory_is_not_a_note() {
        let temp = TempDir::new().unwrap();
        let cli = Cli {
            note: temp.path().to_path_buf(),
            config: None,
        };

        let err = cli.run(offline_config()).await.unwrap_err();
        assert!(err.to_string().starts_with("File not found"));
    }
}
