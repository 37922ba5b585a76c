//! External collector program adapter
//!
//! Runs the configured program once per task as
//! `<command> <args..> --keyword K --source S --resolution R --modifier M`
//! and reads one URL per non-empty stdout line.

use super::{CollectorError, LinkCollector};
use crate::config::CollectorConfig;
use crate::source::{Resolution, SourceFamily};
use async_trait::async_trait;
use tokio::process::Command;

/// Collects links by invoking an external program
#[derive(Debug, Clone)]
pub struct CommandCollector {
    program: String,
    args: Vec<String>,
}

impl CommandCollector {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &CollectorConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
    }

    fn build_command(
        &self,
        keyword: &str,
        family: SourceFamily,
        resolution: Resolution,
        query_modifier: &str,
    ) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg("--keyword")
            .arg(keyword)
            .arg("--source")
            .arg(family.name())
            .arg("--resolution")
            .arg(resolution.as_str())
            .arg("--modifier")
            .arg(query_modifier)
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl LinkCollector for CommandCollector {
    async fn collect(
        &self,
        keyword: &str,
        family: SourceFamily,
        resolution: Resolution,
        query_modifier: &str,
    ) -> Result<Vec<String>, CollectorError> {
        let output = self
            .build_command(keyword, family, resolution, query_modifier)
            .output()
            .await?;

        if !output.status.success() {
            return Err(CollectorError::Exit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| CollectorError::InvalidOutput)?;
        Ok(parse_links(&stdout))
    }
}

fn parse_links(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_links_skips_blank_lines() {
        let links = parse_links("https://a/1.jpg\n\n  https://a/2.png \r\n");
        assert_eq!(links, vec!["https://a/1.jpg", "https://a/2.png"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_collect_reads_stdout() {
        let collector = CommandCollector::new(
            "sh",
            vec![
                "-c".to_string(),
                "echo https://img/$2-$4.jpg; echo https://img/second.png".to_string(),
                "collector".to_string(),
            ],
        );

        let links = collector
            .collect("cat", SourceFamily::Naver, Resolution::Full, "")
            .await
            .unwrap();

        assert_eq!(links, vec!["https://img/cat-naver.jpg", "https://img/second.png"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_collect_nonzero_exit_is_error() {
        let collector = CommandCollector::new(
            "sh",
            vec!["-c".to_string(), "echo boom >&2; exit 3".to_string()],
        );

        let result = collector
            .collect("cat", SourceFamily::Google, Resolution::Thumbnail, "")
            .await;

        match result {
            Err(CollectorError::Exit { stderr, .. }) => assert_eq!(stderr, "boom"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_collect_missing_program() {
        let collector = CommandCollector::new("/nonexistent/collect-links", vec![]);
        let result = collector
            .collect("cat", SourceFamily::Google, Resolution::Thumbnail, "")
            .await;
        assert!(matches!(result, Err(CollectorError::Spawn(_))));
    }
}
