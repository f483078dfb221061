//! CLI exit codes.
//!
//! Scripts rely on these; do not renumber.
//!
//! | Range   | Domain     | Description                              |
//! |---------|------------|------------------------------------------|
//! | 0       | Universal  | Success                                  |
//! | 2       | Universal  | CLI usage error (bad args)               |
//! | 3-9     | document   | Reading, writing and editing documents   |
//! | 10-19   | generation | Generation relay                         |

// =============================================================================
// Universal (0-2)
// =============================================================================

pub const EXIT_SUCCESS: u8 = 0;

/// Bad arguments or options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Document (3-9)
// =============================================================================

/// Cannot read or write a file.
pub const EXIT_IO: u8 = 3;

/// Document file is not a valid snapshot.
pub const EXIT_INVALID_DOCUMENT: u8 = 4;

/// Edit rejected (range outside the grid, duplicate column, ...).
pub const EXIT_REJECTED: u8 = 5;

// =============================================================================
// Generation (10-19)
// =============================================================================

/// Relay endpoint or model not set.
pub const EXIT_RELAY_NOT_CONFIGURED: u8 = 10;

/// Relay unreachable or returned an error status.
pub const EXIT_RELAY_FAILED: u8 = 11;

/// Relay answered but the reply could not be used.
pub const EXIT_RELAY_BAD_REPLY: u8 = 12;
