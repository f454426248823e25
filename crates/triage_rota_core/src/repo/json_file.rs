use super::{RepoError, RepoResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::Path;

/// Reads `path` as JSON, returning `None` when the file does not exist.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> RepoResult<Option<T>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(RepoError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| RepoError::InvalidData {
            path: path.to_path_buf(),
            source,
        })
}

/// Writes `value` as pretty JSON with a trailing newline.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> RepoResult<()> {
    let mut content =
        serde_json::to_string_pretty(value).map_err(|source| RepoError::InvalidData {
            path: path.to_path_buf(),
            source,
        })?;
    content.push('\n');
    write_text_file(path, &content)
}

/// Writes `content` to `path`, creating parent directories first.
pub fn write_text_file(path: &Path, content: &str) -> RepoResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| RepoError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, content).map_err(|source| RepoError::Io {
        path: path.to_path_buf(),
        source,
    })
}
