// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Diagnostics for the doctree crates
//!
//! Structured logging through `emit`, written to stderr.
//!
//! Usage:
//! - DOCTREE_LOG=off (default) - no logs
//! - DOCTREE_LOG=info - grants and completed operations
//! - DOCTREE_LOG=debug - path walks, created nodes, byte counts
//! - DOCTREE_LOG=warn or error - failures only

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable selecting the log level
pub const LOG_ENV: &str = "DOCTREE_LOG";

static INIT: Once = Once::new();

/// Map a `DOCTREE_LOG` value to a minimum level. `None` means logging is
/// off; unknown values are reported as `Err` with the fallback level.
pub fn parse_level(value: &str) -> Result<Option<emit::Level>, emit::Level> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "off" => Ok(None),
        "debug" => Ok(Some(emit::Level::Debug)),
        "info" => Ok(Some(emit::Level::Info)),
        "warn" => Ok(Some(emit::Level::Warn)),
        "error" => Ok(Some(emit::Level::Error)),
        _ => Err(emit::Level::Info),
    }
}

/// Initialize diagnostics from the DOCTREE_LOG environment variable
///
/// Call once at startup; later calls are ignored.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let value = std::env::var(LOG_ENV).unwrap_or_default();
        let (level, unknown) = match parse_level(&value) {
            Ok(None) => return,
            Ok(Some(level)) => (level, false),
            Err(fallback) => (fallback, true),
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(level))
            .init();
        if unknown {
            emit::warn!("Unknown {env} value '{value}', using info", env: LOG_ENV, value: value);
        }

        // The runtime lives for the rest of the process.
        std::mem::forget(rt);
    });
}

/// Log operations a user may want to see: grants, completed requests
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detail for debugging: path walks, created nodes, byte counts
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log failed or refused operations that the caller will see as errors
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}
