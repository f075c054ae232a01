//! Shared types for kubetables
//!
//! This crate contains data structures used across multiple kubetables crates.

use std::fmt;

// ============================================================================
// Kubernetes Resource Types
// ============================================================================

/// Pod information
#[derive(Clone, Debug)]
pub struct PodInfo {
    pub name: String,
    /// Containers declared in the pod spec, in spec order
    pub containers: Vec<ContainerInfo>,
}

impl PodInfo {
    pub fn new(name: String) -> Self {
        Self {
            name,
            containers: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ContainerInfo {
    pub name: String,
}

impl ContainerInfo {
    pub fn new(name: String) -> Self {
        Self { name }
    }
}

/// Identifies one container's log stream
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamIdentity {
    pub namespace: String,
    pub pod: String,
    pub container: String,
}

impl StreamIdentity {
    pub fn new(
        namespace: impl Into<String>,
        pod: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            pod: pod.into(),
            container: container.into(),
        }
    }

    /// Banner line printed above the table of one source
    pub fn banner(&self, source: &str) -> String {
        format!("{}, source={}", self, source)
    }
}

impl fmt::Display for StreamIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "namespace={}, pod={}, container={}",
            self.namespace, self.pod, self.container
        )
    }
}

// ============================================================================
// Log Types
// ============================================================================

/// One parsed log line: field name to dynamic value
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Field injected into every record by the parser
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Field holding the payload when it is not a JSON object
pub const MSG_FIELD: &str = "msg";

/// Field used to group records into tables
pub const SOURCE_FIELD: &str = "source";

/// Grouping key of a record: its `source` text, or "" when absent or not text
pub fn source_of(record: &Record) -> &str {
    record
        .get(SOURCE_FIELD)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
}
