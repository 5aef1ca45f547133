//! The `.homesick_subdir` declaration file.
//!
//! One path per line, relative to the castle's `home/`. No comments, quoting
//! or escaping; the trailing newline is optional and a missing file means no
//! declarations.
use std::io::ErrorKind;

use super::Castle;
use crate::error::CastleError;

/// Read the castle's declared subdirectories in file order.
///
/// Entries are returned verbatim: no trimming, no de-duplication, blank lines
/// included. Both `\n` and `\r\n` terminators are accepted.
///
/// # Errors
///
/// Returns [`CastleError::Io`] if the file exists but cannot be read as
/// UTF-8 text.
pub fn read_declarations(castle: &Castle) -> Result<Vec<String>, CastleError> {
    let path = castle.subdir_file();
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(CastleError::io(path, e)),
    };
    Ok(content.lines().map(str::to_string).collect())
}

/// Append `subdir` to the declaration file unless it is already declared.
///
/// Creates the file when absent. Returns `true` if the file changed.
///
/// # Errors
///
/// Returns [`CastleError::Io`] if the file cannot be read or written.
pub fn append_declaration(castle: &Castle, subdir: &str) -> Result<bool, CastleError> {
    let existing = read_declarations(castle)?;
    if existing.iter().any(|d| d == subdir) {
        return Ok(false);
    }

    let path = castle.subdir_file();
    let mut content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(CastleError::io(path, e)),
    };
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(subdir);
    content.push('\n');

    std::fs::write(&path, content).map_err(|e| CastleError::io(path, e))?;
    Ok(true)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::castle::testing::Fixture;

    #[test]
    fn reads_declarations_in_order() {
        let fx = Fixture::new();
        let castle = fx.registry().resolve("dotfiles").unwrap();
        assert_eq!(
            read_declarations(&castle).unwrap(),
            [".dir2", ".nonexistent", ".dir3/.subdir1"]
        );
    }

    #[test]
    fn missing_file_is_empty() {
        let fx = Fixture::new();
        let castle = fx.registry().resolve("private").unwrap();
        assert!(read_declarations(&castle).unwrap().is_empty());
    }

    #[test]
    fn keeps_blank_lines_and_handles_crlf() {
        let fx = Fixture::new();
        let castle = fx.registry().resolve("private").unwrap();
        std::fs::write(castle.subdir_file(), ".config\r\n\r\n.local/share").unwrap();
        assert_eq!(
            read_declarations(&castle).unwrap(),
            [".config", "", ".local/share"]
        );
    }

    #[test]
    fn duplicates_are_kept() {
        let fx = Fixture::new();
        let castle = fx.registry().resolve("private").unwrap();
        std::fs::write(castle.subdir_file(), ".config\n.config\n").unwrap();
        assert_eq!(read_declarations(&castle).unwrap(), [".config", ".config"]);
    }

    #[test]
    fn unreadable_file_is_io_error() {
        let fx = Fixture::new();
        let castle = fx.registry().resolve("private").unwrap();
        std::fs::create_dir(castle.subdir_file()).unwrap();
        let err = read_declarations(&castle).unwrap_err();
        assert!(matches!(err, CastleError::Io { ref path, .. } if *path == castle.subdir_file()));
    }

    #[test]
    fn invalid_utf8_is_io_error() {
        let fx = Fixture::new();
        let castle = fx.registry().resolve("private").unwrap();
        std::fs::write(castle.subdir_file(), [0xff, 0xfe, b'\n']).unwrap();
        assert!(matches!(
            read_declarations(&castle),
            Err(CastleError::Io { .. })
        ));
    }

    #[test]
    fn append_creates_file() {
        let fx = Fixture::new();
        let castle = fx.registry().resolve("private").unwrap();
        assert!(append_declaration(&castle, ".config/nvim").unwrap());
        assert_eq!(
            std::fs::read_to_string(castle.subdir_file()).unwrap(),
            ".config/nvim\n"
        );
    }

    #[test]
    fn append_adds_missing_newline_and_skips_duplicates() {
        let fx = Fixture::new();
        let castle = fx.registry().resolve("private").unwrap();
        std::fs::write(castle.subdir_file(), ".config").unwrap();

        assert!(append_declaration(&castle, ".local/bin").unwrap());
        assert!(!append_declaration(&castle, ".config").unwrap());
        assert_eq!(
            std::fs::read_to_string(castle.subdir_file()).unwrap(),
            ".config\n.local/bin\n"
        );
    }
}
