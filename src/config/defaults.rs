//! Default value functions for configuration.

use solace_proto::line::DEFAULT_MAX_LINE_LEN;

pub fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// =============================================================================
// Listener Defaults
// =============================================================================

pub fn default_max_line_length() -> usize {
    DEFAULT_MAX_LINE_LEN
}

pub fn default_outbound_queue() -> usize {
    256
}

// =============================================================================
// Directory Defaults
// =============================================================================

pub fn default_directory_url() -> String {
    "http://localhost:8080".to_string()
}

pub fn default_directory_timeout() -> u64 {
    30
}

// =============================================================================
// Keepalive Defaults
// =============================================================================

pub fn default_ping_after_pong() -> u64 {
    5
}

pub fn default_ping_tolerance() -> u64 {
    2
}
