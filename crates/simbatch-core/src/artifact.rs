//! Artifact naming, rendering and file IO.
//!
//! An artifact holds four lines: start timestamp, end timestamp, duration
//! (`<s>_<ms>`) and the sample value. The last line has no trailing newline.
use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use simbatch_model::{DurationMs, TaskResult, TaskSpec, Timestamp};
use thiserror::Error;
use time::UtcOffset;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to write artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed artifact {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// Artifact contents read back from disk.
///
/// Timestamps in the file only keep hundredths; `duration` is exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArtifactRecord {
    pub start: Timestamp,
    pub end: Timestamp,
    pub duration: DurationMs,
    pub sample: f64,
}

pub fn artifact_file_name(spec: &TaskSpec, start: &Timestamp) -> String {
    spec.artifact_name(start)
}

pub fn artifact_path(dir: &Path, spec: &TaskSpec, start: &Timestamp) -> PathBuf {
    dir.join(artifact_file_name(spec, start))
}

pub fn render(result: &TaskResult) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        result.start(),
        result.end(),
        result.duration(),
        result.sample_text()
    )
}

/// Write one artifact.
///
/// Creates or truncates the file; with `exclusive` an existing file is an error.
pub fn write(path: &Path, result: &TaskResult, exclusive: bool) -> Result<(), ArtifactError> {
    let io_err = |source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut opts = OpenOptions::new();
    opts.write(true);
    if exclusive {
        opts.create_new(true);
    } else {
        opts.create(true).truncate(true);
    }

    let mut file = opts.open(path).map_err(io_err)?;
    file.write_all(render(result).as_bytes()).map_err(io_err)?;
    file.flush().map_err(io_err)
}

/// Parse artifact text; timestamps are interpreted in `offset`.
pub fn parse(path: &Path, content: &str, offset: UtcOffset) -> Result<ArtifactRecord, ArtifactError> {
    let malformed = |reason: String| ArtifactError::Malformed {
        path: path.to_path_buf(),
        reason,
    };

    let lines: Vec<&str> = content.split('\n').collect();
    let [start, end, duration, sample] = lines.as_slice() else {
        return Err(malformed(format!("expected 4 lines, found {}", lines.len())));
    };

    let start = Timestamp::parse(start, offset).map_err(|e| malformed(e.to_string()))?;
    let end = Timestamp::parse(end, offset).map_err(|e| malformed(e.to_string()))?;
    let duration = DurationMs::parse(duration).map_err(|e| malformed(e.to_string()))?;
    let sample: f64 = sample
        .parse()
        .map_err(|_| malformed(format!("sample is not a number: '{sample}'")))?;

    Ok(ArtifactRecord {
        start,
        end,
        duration,
        sample,
    })
}

pub fn read(path: &Path, offset: UtcOffset) -> Result<ArtifactRecord, ArtifactError> {
    let content = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(path, &content, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use simbatch_model::{Category, Strategy};
    use time::macros::datetime;

    fn result() -> TaskResult {
        TaskResult::new(
            Timestamp::from(datetime!(2024-03-05 07:08:09.120 UTC)),
            Timestamp::from(datetime!(2024-03-05 07:08:10.354 UTC)),
            0.25,
        )
        .unwrap()
    }

    fn spec() -> TaskSpec {
        TaskSpec::new(Strategy::Thread, Category::new(3).unwrap(), 4, 4)
    }

    #[test]
    fn renders_four_lines_without_trailing_newline() {
        assert_eq!(
            render(&result()),
            "20240305_070809_12\n20240305_070810_35\n1_234\n0.25"
        );
    }

    #[test]
    fn path_joins_output_dir_and_name() {
        let start = result().start();
        let path = artifact_path(Path::new("/out"), &spec(), &start);
        assert_eq!(path, PathBuf::from("/out/PROT_MT_3_n4_20240305_070809_12.sim"));
    }

    #[test]
    fn write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.sim");

        write(&path, &result(), false).unwrap();
        let record = read(&path, UtcOffset::UTC).unwrap();

        assert_eq!(record.duration, DurationMs::new(1_234));
        assert_eq!(record.sample, 0.25);
        assert_eq!(record.start.to_string(), "20240305_070809_12");
    }

    #[test]
    fn default_mode_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.sim");
        fs::write(&path, "stale content that is longer than the artifact itself").unwrap();

        write(&path, &result(), false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), render(&result()));
    }

    #[test]
    fn exclusive_mode_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.sim");

        write(&path, &result(), true).unwrap();
        let err = write(&path, &result(), true).unwrap_err();
        assert!(matches!(err, ArtifactError::Io { ref source, .. } if source.kind() == io::ErrorKind::AlreadyExists));
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("a.sim");
        assert!(matches!(write(&path, &result(), false), Err(ArtifactError::Io { .. })));
    }

    #[test]
    fn parse_rejects_wrong_line_count() {
        let err = parse(Path::new("x.sim"), "a\nb\nc\n", UtcOffset::UTC).unwrap_err();
        assert!(matches!(err, ArtifactError::Malformed { .. }));
    }
}
