// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Loads a labelled intent corpus from a directory.
//
// Layout: one file per intent, the file stem is the label.
//
//   data/intents/
//     weather.txt      ← one utterance per line
//     dust.txt
//     restaurant.csv   ← first column only, header optional,
//                        quoted fields may contain commas
//
// Files are visited in name order and lines keep their order,
// so the corpus (and therefore the seeded split) is the same
// on every run.

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use std::{fs, path::{Path, PathBuf}};

use crate::data::preprocessor::Preprocessor;
use crate::domain::traits::UtteranceSource;
use crate::domain::utterance::Utterance;

/// Header names skipped when they appear as the first line of a .csv file
const CSV_HEADERS: [&str; 3] = ["question", "text", "utterance"];

pub struct CorpusLoader {
    dir:          String,
    preprocessor: Preprocessor,
}

impl CorpusLoader {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: dir.into(), preprocessor: Preprocessor::new() }
    }
}

impl UtteranceSource for CorpusLoader {
    fn load_all(&self) -> Result<Vec<Utterance>> {
        let dir = Path::new(&self.dir);

        if !dir.exists() {
            tracing::warn!(
                "Data directory '{}' does not exist — returning empty corpus",
                self.dir
            );
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .with_context(|| format!("Cannot read directory '{}'", self.dir))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_corpus_file(p))
            .collect();
        paths.sort();

        let mut utterances = Vec::new();
        for path in &paths {
            match self.load_intent_file(path) {
                Ok(mut lines) => {
                    tracing::debug!("Loaded {} utterances from '{}'", lines.len(), path.display());
                    utterances.append(&mut lines);
                }
                Err(e) => {
                    tracing::warn!("Skipping '{}': {:#}", path.display(), e);
                }
            }
        }

        tracing::info!(
            "Loaded {} utterances from {} intent files",
            utterances.len(),
            paths.len()
        );
        Ok(utterances)
    }
}

impl CorpusLoader {
    fn load_intent_file(&self, path: &Path) -> Result<Vec<Utterance>> {
        let label = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .with_context(|| format!("Cannot derive an intent name from '{}'", path.display()))?
            .to_string();

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;

        let fields = if path.extension().and_then(|e| e.to_str()) == Some("csv") {
            csv_first_column(&raw)
                .with_context(|| format!("Malformed CSV in '{}'", path.display()))?
        } else {
            raw.lines().map(str::to_string).collect()
        };

        Ok(fields
            .iter()
            .map(|field| self.preprocessor.clean(field))
            .filter(|text| !text.is_empty())
            .map(|text| Utterance::new(text, label.clone()))
            .collect())
    }
}

/// First column of every record, minus a recognised header row.
fn csv_first_column(raw: &str) -> Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(raw.as_bytes());

    let mut out = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let field  = record.get(0).unwrap_or_default();
        if row == 0 && CSV_HEADERS.contains(&field.to_lowercase().as_str()) {
            continue;
        }
        out.push(field.to_string());
    }
    Ok(out)
}

fn is_corpus_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("txt") | Some("csv")
    )
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn loader_for(dir: &tempfile::TempDir) -> CorpusLoader {
        CorpusLoader::new(dir.path().to_string_lossy().to_string())
    }

    #[test]
    fn test_label_comes_from_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("weather.txt"), "is it raining\nwill it snow\n").unwrap();
        fs::write(dir.path().join("dust.txt"), "fine dust today\n").unwrap();

        let corpus = loader_for(&dir).load_all().unwrap();
        assert_eq!(
            corpus,
            vec![
                Utterance::new("fine dust today", "dust"),
                Utterance::new("is it raining", "weather"),
                Utterance::new("will it snow", "weather"),
            ]
        );
    }

    #[test]
    fn test_csv_first_column_and_header() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("travel.csv"),
            "question,label\nfind a hotel in jeju,O O B-LOC\n",
        ).unwrap();

        let corpus = loader_for(&dir).load_all().unwrap();
        assert_eq!(corpus, vec![Utterance::new("find a hotel in jeju", "travel")]);
    }

    #[test]
    fn test_csv_quoted_field_keeps_its_commas() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("alarm.csv"),
            "text,label\n\"wake me up at 7, please\",x\nsnooze the alarm\n",
        ).unwrap();

        let corpus = loader_for(&dir).load_all().unwrap();
        assert_eq!(
            corpus,
            vec![
                Utterance::new("wake me up at 7, please", "alarm"),
                Utterance::new("snooze the alarm", "alarm"),
            ]
        );
    }

    #[test]
    fn test_skips_blank_lines_and_other_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("dust.txt"), "\n   \nair quality\n\n").unwrap();
        fs::write(dir.path().join("notes.md"), "not a corpus file").unwrap();

        let corpus = loader_for(&dir).load_all().unwrap();
        assert_eq!(corpus, vec![Utterance::new("air quality", "dust")]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let loader = CorpusLoader::new("/definitely/not/a/real/dir");
        assert!(loader.load_all().unwrap().is_empty());
    }
}
