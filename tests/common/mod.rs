// Shared helpers for integration tests.
//
// Provides a temporary directory holding a fake home and a repository root,
// plus a fluent builder for castles, so each test can lay out an isolated
// environment without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use homesick::castle::CastleRegistry;
use homesick::commands::CommandSetup;
use homesick::config::{DEFAULT_CASTLE, Settings};

/// An isolated home directory backed by a [`tempfile::TempDir`].
///
/// ```text
/// <tmp>/home/                      target home
/// <tmp>/home/.homesick/repos/      repository root
/// ```
pub struct TestHome {
    /// Temporary directory containing everything.
    pub root: tempfile::TempDir,
}

impl TestHome {
    /// Create an empty home with an empty repository root.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let home = Self { root };
        std::fs::create_dir_all(home.repos()).expect("create repos dir");
        home
    }

    /// The target home directory.
    pub fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    /// The repository root.
    pub fn repos(&self) -> PathBuf {
        self.home().join(".homesick").join("repos")
    }

    /// Registry over [`Self::repos`].
    pub fn registry(&self) -> CastleRegistry {
        CastleRegistry::new(self.repos())
    }

    /// Command setup pointing at this home.
    pub fn setup(&self, dry_run: bool) -> CommandSetup {
        CommandSetup::new(
            Settings {
                home: self.home(),
                repos: self.repos(),
                default_castle: DEFAULT_CASTLE.to_string(),
                editor: None,
                shell: None,
            },
            dry_run,
        )
    }

    /// Start building castle `name`.
    pub fn castle(&self, name: &str) -> CastleBuilder {
        CastleBuilder {
            path: self.repos().join(name),
            git: true,
        }
    }

    /// Write `content` to `relative` inside the target home.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.home().join(relative);
        write_file(&path, content);
        path
    }
}

/// Fluent builder for a castle directory.
pub struct CastleBuilder {
    path: PathBuf,
    git: bool,
}

impl CastleBuilder {
    /// Leave out the `.git` marker.
    pub fn without_git(mut self) -> Self {
        self.git = false;
        self
    }

    /// Add a file under the castle's `home/` tree.
    pub fn file(self, relative: &str, content: &str) -> Self {
        write_file(&self.path.join("home").join(relative), content);
        self
    }

    /// Add an empty directory under the castle's `home/` tree.
    pub fn dir(self, relative: &str) -> Self {
        std::fs::create_dir_all(self.path.join("home").join(relative)).expect("create dir");
        self
    }

    /// Write the `.homesick_subdir` declaration file.
    pub fn subdirs(self, lines: &[&str]) -> Self {
        let mut content = lines.join("\n");
        content.push('\n');
        write_file(&self.path.join(".homesick_subdir"), &content);
        self
    }

    /// Create the castle on disk and return its root.
    pub fn build(self) -> PathBuf {
        std::fs::create_dir_all(self.path.join("home")).expect("create castle home");
        if self.git {
            std::fs::create_dir_all(self.path.join(".git")).expect("create .git");
        }
        self.path
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}
