//! Explanation text and path arguments shared by every command.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use officedj_compose::Arrangement;

/// Where the music comes from.
#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    /// Explanation text
    #[arg(short, long, conflicts_with = "text_file")]
    pub text: Option<String>,

    /// File containing the explanation text
    #[arg(long)]
    pub text_file: Option<String>,

    /// Page path hint, e.g. /jiwon
    #[arg(short, long)]
    pub path: Option<String>,

    /// Remix generation
    #[arg(short, long, default_value_t = 0)]
    pub generation: u32,
}

impl InputArgs {
    /// The explanation text; missing input is the empty string.
    pub fn load_text(&self) -> Result<String> {
        match (&self.text, &self.text_file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(file)) => fs::read_to_string(Path::new(file))
                .with_context(|| format!("failed to read text file: {}", file)),
            (None, None) => Ok(String::new()),
        }
    }

    /// The path hint, falling back to `fallback` when no flag was given.
    pub fn path_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.path.as_deref().unwrap_or(fallback)
    }

    /// Derives the arrangement these arguments describe.
    pub fn arrangement(&self) -> Result<Arrangement> {
        let text = self.load_text()?;
        Ok(Arrangement::compose(&text, self.path_or(""), self.generation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_is_empty() {
        let args = InputArgs::default();
        assert_eq!(args.load_text().unwrap(), "");
        assert_eq!(args.path_or("/fallback"), "/fallback");
    }

    #[test]
    fn test_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("about.txt");
        fs::write(&file, "LED 조명 7개 설치").unwrap();
        let args = InputArgs {
            text_file: Some(file.to_string_lossy().into_owned()),
            path: Some("/jiwon".to_string()),
            ..InputArgs::default()
        };
        assert_eq!(args.load_text().unwrap(), "LED 조명 7개 설치");
        let arrangement = args.arrangement().unwrap();
        assert_eq!(arrangement, Arrangement::compose("LED 조명 7개 설치", "/jiwon", 0));
    }

    #[test]
    fn test_unreadable_file_is_an_error() {
        let args = InputArgs {
            text_file: Some("/definitely/not/here.txt".to_string()),
            ..InputArgs::default()
        };
        let err = args.load_text().unwrap_err();
        assert!(err.to_string().contains("failed to read text file"));
    }
}
