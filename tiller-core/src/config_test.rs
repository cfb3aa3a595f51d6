use std::time::Duration;

use crate::RaftNodeConfig;
use crate::ReplicationConfig;

#[test]
fn test_defaults_are_valid() {
    let config = RaftNodeConfig::default();

    assert!(config.validate().is_ok());
    assert_eq!(config.replication.message_timeout_ms, 300);
    assert_eq!(config.replication.max_entries_per_request, 100);
}

/// Six heartbeats per message timeout.
#[test]
fn test_heartbeat_interval_is_a_sixth_of_the_timeout() {
    let replication = ReplicationConfig {
        message_timeout_ms: 300,
        max_entries_per_request: 100,
    };

    assert_eq!(replication.heartbeat_interval(), Duration::from_millis(50));
    assert_eq!(replication.disposal_grace(), Duration::from_millis(600));
}

#[test]
fn test_timeout_below_heartbeat_divisor_is_rejected() {
    let replication = ReplicationConfig {
        message_timeout_ms: 5,
        max_entries_per_request: 100,
    };

    assert!(replication.validate().is_err());
}

#[test]
fn test_zero_batch_limit_is_rejected() {
    let replication = ReplicationConfig {
        message_timeout_ms: 300,
        max_entries_per_request: 0,
    };

    assert!(replication.validate().is_err());
}

/// Partial configuration files fall back to field defaults.
#[test]
fn test_partial_source_uses_field_defaults() {
    let source = config::Config::builder()
        .add_source(config::File::from_str(
            "message_timeout_ms = 600",
            config::FileFormat::Toml,
        ))
        .build()
        .expect("build config");

    let replication: ReplicationConfig = source.try_deserialize().expect("deserialize");

    assert_eq!(replication.message_timeout_ms, 600);
    assert_eq!(replication.max_entries_per_request, 100);
    assert_eq!(replication.heartbeat_interval(), Duration::from_millis(100));
}
