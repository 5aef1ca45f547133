#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
//! Integration tests for castle resolution and linkable discovery.

mod common;

use std::path::{Path, PathBuf};

use common::TestHome;
use homesick::castle::linkables::{compute_linkables, path_is_ancestor_of};
use homesick::castle::subdirs::read_declarations;
use homesick::error::CastleError;

fn joined(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[test]
fn lists_only_git_castles_in_name_order() {
    let home = TestHome::new();
    home.castle("zsh").file(".zshrc", "").build();
    home.castle("dotfiles").file(".bashrc", "").build();
    home.castle("scratch").without_git().build();

    let names: Vec<String> = home
        .registry()
        .list_all()
        .unwrap()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    assert_eq!(names, ["dotfiles", "zsh"]);
}

#[test]
fn resolution_errors_are_not_found() {
    let home = TestHome::new();
    home.castle("scratch").without_git().build();
    let registry = home.registry();

    for name in ["", "scratch", "missing", "../home"] {
        assert!(
            matches!(registry.resolve(name), Err(CastleError::NotFound { .. })),
            "{name:?}"
        );
    }
}

#[cfg(unix)]
#[test]
fn symlinked_castle_directory_is_listed() {
    let home = TestHome::new();
    let elsewhere = home.root.path().join("work-dotfiles");
    std::fs::create_dir_all(elsewhere.join(".git")).unwrap();
    std::os::unix::fs::symlink(&elsewhere, home.repos().join("work")).unwrap();

    let castles = home.registry().list_all().unwrap();
    assert_eq!(castles.len(), 1);
    assert_eq!(castles[0].name(), "work");
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

#[test]
fn declared_subdirectories_are_walked() {
    let home = TestHome::new();
    home.castle("dotfiles")
        .file(".bashrc", "")
        .file(".config/nvim/init.lua", "")
        .file(".config/git/config", "")
        .file(".local/share/applications/editor.desktop", "")
        .file(".local/bin/tool", "")
        .subdirs(&[".config", ".local/share"])
        .build();

    let castle = home.registry().resolve("dotfiles").unwrap();
    assert_eq!(
        read_declarations(&castle).unwrap(),
        [".config", ".local/share"]
    );
    insta::assert_snapshot!(joined(&compute_linkables(&castle).unwrap()), @r"
    .bashrc
    .config/git
    .config/nvim
    .local/share/applications
    ");
}

#[test]
fn without_declarations_only_top_level_entries() {
    let home = TestHome::new();
    home.castle("dotfiles")
        .file(".vimrc", "")
        .file(".vim/colors/dark.vim", "")
        .build();

    let castle = home.registry().resolve("dotfiles").unwrap();
    assert_eq!(
        compute_linkables(&castle).unwrap(),
        [PathBuf::from(".vim"), PathBuf::from(".vimrc")]
    );
}

#[test]
fn ancestor_relation() {
    let anc = |a: &str, b: &str| path_is_ancestor_of(Path::new(a), Path::new(b));
    assert!(anc(".local/share", ".local"));
    assert!(anc(".config", ".config"));
    assert!(!anc(".local/share", ".bashrc"));
    assert!(!anc(".config", ".bashrc"));
    assert!(!anc(".localx/share", ".local"));
}
