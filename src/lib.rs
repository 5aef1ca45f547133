//! Castle-based dotfiles management.
//!
//! A *castle* is a git repository under `~/.homesick/repos/` whose `home/`
//! tree mirrors the user's home directory. `homesick link` symlinks every
//! entry of that tree into place, descending into the subdirectories listed
//! in the castle's `.homesick_subdir` file so that they become real
//! directories holding individual links.
//!
//! The crate is layered bottom-up:
//!
//! - **[`castle`]**: resolve castles, read declarations, discover linkables
//! - **[`resources`]**: idempotent `check + apply` primitives for symlinks and
//!   directories
//! - **[`link`]**: the link applier and conflict resolution
//! - **[`vcs`]**: git, behind the [`vcs::Vcs`] trait
//! - **[`commands`]**: subcommand orchestration for the CLI
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod castle;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod link;
pub mod logging;
pub mod resources;
pub mod vcs;
