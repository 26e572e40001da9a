//! Writing and reading the run summary.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{PipelineError, Result};
use crate::evaluate::EvaluationResult;

/// Writes `result` as pretty-printed JSON to `path`, creating missing parent
/// directories and replacing any file already there.
pub fn save_summary<P: AsRef<Path>>(result: &EvaluationResult, path: P) -> Result<()> {
    let path = path.as_ref();
    let write_error = |source: std::io::Error| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    let json = serde_json::to_string_pretty(result).map_err(|e| PipelineError::Summary {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, json).map_err(write_error)?;

    info!(path = %path.display(), "saved model summary");
    Ok(())
}

/// Reads a summary previously written by [`save_summary`].
pub fn load_summary<P: AsRef<Path>>(path: P) -> Result<EvaluationResult> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PipelineError::NotFound {
            path: path.to_path_buf(),
        },
        _ => PipelineError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    serde_json::from_str(&contents).map_err(|e| PipelineError::Summary {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> EvaluationResult {
        EvaluationResult {
            crops: vec!["apple".into(), "kidneybeans".into(), "rice".into()],
            accuracy: 0.9136363636363637,
            total_samples: 2200,
            train_samples: 1760,
            test_samples: 440,
        }
    }

    #[test]
    fn test_roundtrip_is_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model_info.json");
        save_summary(&summary(), &path).unwrap();
        assert_eq!(load_summary(&path).unwrap(), summary());
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models").join("nested").join("summary.json");
        save_summary(&summary(), &path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        fs::write(&path, "{\"stale\": true, \"padding\": \"".to_string() + &"x".repeat(4096) + "\"}")
            .unwrap();

        let mut result = summary();
        result.accuracy = 0.25;
        save_summary(&result, &path).unwrap();
        assert_eq!(load_summary(&path).unwrap(), result);
    }

    #[test]
    fn test_write_error_names_path() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file cannot serve as a parent directory.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let path = blocker.join("summary.json");

        let err = save_summary(&summary(), &path).unwrap_err();
        assert_eq!(err.kind(), "WriteError");
        assert!(matches!(err, PipelineError::Write { path: ref p, .. } if p == &path));
    }

    #[test]
    fn test_load_missing_summary() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_summary(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, PipelineError::NotFound { .. }));
    }

    #[test]
    fn test_load_malformed_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{\"crops\": 3}").unwrap();
        assert!(matches!(
            load_summary(&path),
            Err(PipelineError::Summary { .. })
        ));
    }
}
