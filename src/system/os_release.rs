use std::io;
use std::path::Path;

use thiserror::Error;

pub const DEFAULT_OS_RELEASE_PATH: &str = "/etc/os-release";

const PRETTY_NAME_KEY: &str = "PRETTY_NAME=";

#[derive(Debug, Error)]
pub enum OsReleaseError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("could not identify operating system from {path}")]
    NotIdentified { path: String },
}

/// Reads the human-readable OS name (`PRETTY_NAME`) from an os-release file.
pub fn read_os_name(path: &Path) -> Result<String, OsReleaseError> {
    let contents = std::fs::read_to_string(path).map_err(|source| OsReleaseError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_pretty_name(&contents).ok_or_else(|| OsReleaseError::NotIdentified {
        path: path.display().to_string(),
    })
}

/// Extracts the quoted `PRETTY_NAME="..."` value.
pub fn parse_pretty_name(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let value = line.trim().strip_prefix(PRETTY_NAME_KEY)?;
        let inner = value.strip_prefix('"')?;
        let end = inner.rfind('"')?;
        Some(inner[..end].to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBIAN: &str = r#"PRETTY_NAME="Debian GNU/Linux 12 (bookworm)"
NAME="Debian GNU/Linux"
VERSION_ID="12"
ID=debian
"#;

    #[test]
    fn extracts_pretty_name() {
        assert_eq!(
            parse_pretty_name(DEBIAN).as_deref(),
            Some("Debian GNU/Linux 12 (bookworm)")
        );
    }

    #[test]
    fn ignores_other_keys() {
        let contents = "NAME=\"Arch Linux\"\nID=arch\n";
        assert_eq!(parse_pretty_name(contents), None);
    }

    #[test]
    fn unquoted_value_is_not_identified() {
        assert_eq!(parse_pretty_name("PRETTY_NAME=Alpine\n"), None);
    }

    #[test]
    fn empty_quoted_value() {
        assert_eq!(parse_pretty_name("PRETTY_NAME=\"\"\n").as_deref(), Some(""));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = read_os_name(Path::new("/nonexistent/os-release")).unwrap_err();
        assert!(matches!(err, OsReleaseError::Read { .. }));
    }

    #[test]
    fn file_without_key_is_not_identified() {
        let temp = std::env::temp_dir().join("ptop_test_os_release_no_key");
        std::fs::write(&temp, "ID=plan9\n").unwrap();
        let err = read_os_name(&temp).unwrap_err();
        assert!(matches!(err, OsReleaseError::NotIdentified { .. }));
        let _ = std::fs::remove_file(&temp);
    }
}
