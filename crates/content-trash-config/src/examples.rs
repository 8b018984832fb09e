// crates/content-trash-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and the CLI.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example `content-trash.toml`. Every key is spelled out with its
//! default value except where a production deployment should differ.

/// Returns a canonical example `content-trash.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[database]
path = "content-trash.db"
busy_timeout_ms = 5000
journal_mode = "wal"
sync_mode = "full"

[host]
versioning = true
default_template_id = 1
root_path = "|"

[retention]
# One of 0, 1, 7, 14, 30, 60, 90, 180, 365. Zero disables purging.
max_age_days = 30

[restore]
operator = "content-trash"
claim_ttl_secs = 600

[logging]
sink = "file"
path = "content-trash.log"

[admin]
login = "admin"
is_admin = true
"#,
    )
}
