//! Loading comparison cases and saving evaluation reports.
//!
//! Both are plain JSON so they can be produced and inspected by other tools.

use crate::error::{EvalError, Result};
use crate::evaluator::EvaluationReport;
use crate::types::ResultItem;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A query with the two ranked result lists to compare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonCase {
    /// Optional label; defaults to the file stem when loaded from disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub query: String,
    pub results_a: Vec<ResultItem>,
    pub results_b: Vec<ResultItem>,
}

impl ComparisonCase {
    pub fn new(
        query: impl Into<String>,
        results_a: Vec<ResultItem>,
        results_b: Vec<ResultItem>,
    ) -> Self {
        Self {
            name: None,
            query: query.into(),
            results_a,
            results_b,
        }
    }

    /// The case name, or the query when unnamed.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.query)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;
    serde_json::from_str(&content)
        .map_err(|e| EvalError::Serialization(format!("{}: {}", path.display(), e)))
}

/// Load a single comparison case.
pub fn load_case(path: &Path) -> Result<ComparisonCase> {
    if !path.is_file() {
        return Err(EvalError::CaseNotFound(path.to_path_buf()));
    }

    let mut case: ComparisonCase = read_json(path)?;
    if case.name.is_none() {
        case.name = path.file_stem().map(|s| s.to_string_lossy().into_owned());
    }
    Ok(case)
}

/// Load every `*.json` case under `dir`, ordered by path.
pub fn load_cases(dir: &Path) -> Result<Vec<ComparisonCase>> {
    if !dir.is_dir() {
        return Err(EvalError::InvalidCasesPath(dir.to_path_buf()));
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(EvalError::EmptyCases(dir.to_path_buf()));
    }

    paths.iter().map(|path| load_case(path)).collect()
}

/// Write any serializable report as pretty JSON, creating parent directories.
pub fn save_report<T: Serialize>(report: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| EvalError::io(parent, e))?;
        }
    }

    let json = serde_json::to_string_pretty(report)
        .map_err(|e| EvalError::Serialization(e.to_string()))?;
    fs::write(path, json).map_err(|e| EvalError::io(path, e))
}

/// Load a previously saved evaluation report.
pub fn load_report(path: &Path) -> Result<EvaluationReport> {
    if !path.is_file() {
        return Err(EvalError::CaseNotFound(path.to_path_buf()));
    }
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Score;
    use tempfile::tempdir;

    fn sample_case() -> ComparisonCase {
        ComparisonCase::new(
            "vercel pricing",
            vec![ResultItem::new("Pricing", "Plans and limits").with_url("https://vercel.com/pricing")],
            vec![ResultItem::new("Blog", "Latest news")],
        )
    }

    #[test]
    fn test_case_roundtrip_uses_file_stem_as_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vercel.json");
        save_report(&sample_case(), &path).unwrap();

        let loaded = load_case(&path).unwrap();
        assert_eq!(loaded.name.as_deref(), Some("vercel"));
        assert_eq!(loaded.query, "vercel pricing");
        assert_eq!(loaded.results_a.len(), 1);
        assert_eq!(loaded.label(), "vercel");
    }

    #[test]
    fn test_load_case_missing() {
        let dir = tempdir().unwrap();
        let result = load_case(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(EvalError::CaseNotFound(_))));
    }

    #[test]
    fn test_load_case_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"query\": ").unwrap();
        assert!(matches!(load_case(&path), Err(EvalError::Serialization(_))));
    }

    #[test]
    fn test_load_cases_walks_and_sorts() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir_all(&nested).unwrap();

        save_report(&sample_case(), &dir.path().join("b.json")).unwrap();
        save_report(&sample_case(), &nested.join("a.json")).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let cases = load_cases(dir.path()).unwrap();
        let names: Vec<&str> = cases.iter().map(|c| c.label()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_load_cases_errors() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_cases(dir.path()),
            Err(EvalError::EmptyCases(_))
        ));
        assert!(matches!(
            load_cases(&dir.path().join("missing")),
            Err(EvalError::InvalidCasesPath(_))
        ));
    }

    #[test]
    fn test_report_roundtrip_keeps_unavailable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("report.json");

        save_report(&EvaluationReport::unavailable(), &path).unwrap();
        let loaded = load_report(&path).unwrap();

        assert_eq!(loaded.dataset_a.score, Score::Unavailable);
        assert_eq!(loaded, EvaluationReport::unavailable());
    }
}
