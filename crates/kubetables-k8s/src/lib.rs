//! Kubernetes client for kubetables
//!
//! This crate provides Kubernetes API integration for loading cluster
//! configuration, listing pods, and opening container log streams.

mod client;

pub use client::{ContainerLogs, KubeClient, LogStream, since_seconds};

// Re-export types that are used in our public API
pub use kubetables_types::{ContainerInfo, PodInfo};
