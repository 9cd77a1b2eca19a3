//! Stable exit codes for the `taskhive` binary.

/// The session ended through a quit command or end of input.
pub const OK: i32 = 0;
/// Malformed command line (reported by the argument parser).
pub const USAGE: i32 = 2;
/// The configuration file could not be loaded or an override could not be merged.
pub const CONFIG: i32 = 3;
/// The log destination could not be created or the subscriber could not be installed.
pub const LOGGER: i32 = 4;
/// A configured model entry could not be registered.
pub const MODEL: i32 = 5;
/// The agent tree could not be built.
pub const AGENT: i32 = 6;
/// The interactive surface failed (stdin or stdout I/O error).
pub const SESSION: i32 = 7;
