//! Command: print version information.

/// Version string: `HOMESICK_VERSION` captured at build time, else the
/// crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("HOMESICK_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// The line printed by `homesick version`.
#[must_use]
pub fn line() -> String {
    format!("homesick {}", version())
}
