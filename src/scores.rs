use std::fs;
use std::io;
use std::path::Path;

use log::warn;

pub const MAX_HIGH_SCORES: usize = 10;

/// Best scores so far, highest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighScores {
    entries: Vec<(String, u32)>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `name:score` lines from `path`.
    ///
    /// A missing file is an empty table and bad lines are logged and
    /// skipped. Any other read error is returned, so the caller does not
    /// overwrite a file it could not read.
    pub fn load(path: &Path) -> io::Result<Self> {
        match fs::read(path) {
            Ok(bytes) => Ok(Self::parse_bytes(&bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("High score file not found: {}", path.display());
                Ok(Self::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Lines that are not UTF-8 are skipped like any other bad line.
    pub fn parse_bytes(bytes: &[u8]) -> Self {
        let mut scores = Self::new();

        for raw in bytes.split(|&b| b == b'\n') {
            match std::str::from_utf8(raw) {
                Ok(line) => scores.parse_line(line),
                Err(_) => warn!("Invalid high score line: {}", String::from_utf8_lossy(raw).trim()),
            }
        }

        scores.sort_and_truncate();
        scores
    }

    pub fn parse(text: &str) -> Self {
        Self::parse_bytes(text.as_bytes())
    }

    fn parse_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let mut parts = line.split(':');
        let (name, score) = match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(score), None) => (name, score),
            _ => {
                warn!("Invalid high score line: {}", line);
                return;
            }
        };

        match score.trim().parse::<u32>() {
            Ok(score) => self.entries.push((name.to_string(), score)),
            Err(_) => warn!("Invalid high score value: {}", line),
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_text())
    }

    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|(name, score)| format!("{}:{}\n", name, score))
            .collect()
    }

    /// Adds a finished round and keeps the best `MAX_HIGH_SCORES`.
    pub fn record(&mut self, name: &str, score: u32) {
        self.entries.push((name.to_string(), score));
        self.sort_and_truncate();
    }

    pub fn entries(&self) -> &[(String, u32)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sort_and_truncate(&mut self) {
        // Stable, so earlier entries win ties
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries.truncate(MAX_HIGH_SCORES);
    }
}
