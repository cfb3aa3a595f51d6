use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// The leader sleeps `message_timeout / HEARTBEATS_PER_TIMEOUT` between
/// fan-out rounds, so a healthy follower sees roughly six heartbeats per
/// election timeout.
const HEARTBEATS_PER_TIMEOUT: u32 = 6;

/// Top-level node configuration consumed by the replication core.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RaftNodeConfig {
    /// Settings for log replication and snapshot fallback
    #[serde(default)]
    pub replication: ReplicationConfig,
}

impl RaftNodeConfig {
    /// Validates all subsystem configurations.
    pub fn validate(&self) -> Result<()> {
        self.replication.validate()
    }
}

/// Configuration for the leader's replication machinery.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReplicationConfig {
    /// Base peer message timeout in milliseconds. The heartbeat period and
    /// the disposal grace period both derive from this value.
    #[serde(default = "default_message_timeout_ms")]
    pub message_timeout_ms: u64,

    /// Maximum number of log entries carried by a single AppendEntries
    /// request. Lagging peers catch up over multiple rounds.
    #[serde(default = "default_max_entries_per_request")]
    pub max_entries_per_request: u64,
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self {
            message_timeout_ms: default_message_timeout_ms(),
            max_entries_per_request: default_max_entries_per_request(),
        }
    }
}

impl ReplicationConfig {
    pub fn message_timeout(&self) -> Duration {
        Duration::from_millis(self.message_timeout_ms)
    }

    /// Interval between heartbeat fan-out rounds.
    pub fn heartbeat_interval(&self) -> Duration {
        self.message_timeout() / HEARTBEATS_PER_TIMEOUT
    }

    /// Bounded wait for the heartbeat driver to stop on disposal.
    pub fn disposal_grace(&self) -> Duration {
        self.message_timeout() * 2
    }

    pub fn validate(&self) -> Result<()> {
        if self.message_timeout_ms < HEARTBEATS_PER_TIMEOUT as u64 {
            return Err(Error::Config(ConfigError::Message(format!(
                "message_timeout_ms must be at least {HEARTBEATS_PER_TIMEOUT}ms"
            ))));
        }

        if self.max_entries_per_request == 0 {
            return Err(Error::Config(ConfigError::Message(
                "max_entries_per_request must be greater than 0".into(),
            )));
        }

        Ok(())
    }
}

fn default_message_timeout_ms() -> u64 {
    300
}

fn default_max_entries_per_request() -> u64 {
    100
}
