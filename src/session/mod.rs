//! Database session seam and its CQL cluster implementation.

use std::net::SocketAddr;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use scylla::client::execution_profile::ExecutionProfile;
use scylla::client::session_builder::SessionBuilder;
use scylla::statement::Consistency;

use crate::config::ClusterConfig;
use crate::error::BoxError;

const DEFAULT_CQL_PORT: u16 = 9042;
const SUPPORTED_PROTOCOL_VERSION: u8 = 4;

/// A connected handle that can run one statement at a time from any number of tasks.
#[async_trait]
pub trait Session: Send + Sync {
    async fn execute(&self, statement: &str) -> Result<(), BoxError>;
}

pub struct CqlSession {
    inner: scylla::client::session::Session,
}

impl CqlSession {
    pub async fn connect(cfg: &ClusterConfig) -> Result<Self> {
        if cfg.protocol_version != SUPPORTED_PROTOCOL_VERSION {
            bail!(
                "unsupported CQL protocol version {} (only v{} is supported)",
                cfg.protocol_version,
                SUPPORTED_PROTOCOL_VERSION
            );
        }

        let profile = ExecutionProfile::builder()
            .consistency(Consistency::Quorum)
            .request_timeout(Some(cfg.request_timeout))
            .build();

        let nodes: Vec<String> = cfg.hosts.iter().map(|h| with_default_port(h)).collect();
        tracing::info!(hosts = ?nodes, "connecting to cluster");

        let inner = SessionBuilder::new()
            .known_nodes(&nodes)
            .connection_timeout(cfg.request_timeout)
            .default_execution_profile_handle(profile.into_handle())
            .build()
            .await
            .with_context(|| format!("failed to connect to {}", nodes.join(",")))?;

        Ok(Self { inner })
    }
}

#[async_trait]
impl Session for CqlSession {
    async fn execute(&self, statement: &str) -> Result<(), BoxError> {
        self.inner.query_unpaged(statement, ()).await?;
        Ok(())
    }
}

/// Append the CQL native port to hosts given without one.
fn with_default_port(host: &str) -> String {
    let host = host.trim();
    if host.parse::<SocketAddr>().is_ok() {
        return host.to_string();
    }
    match host.rsplit_once(':') {
        Some((name, port)) if !name.contains(':') && port.parse::<u16>().is_ok() => host.to_string(),
        // bare IPv6 literal
        Some(_) => format!("[{}]:{}", host.trim_matches(|c| c == '[' || c == ']'), DEFAULT_CQL_PORT),
        None => format!("{}:{}", host, DEFAULT_CQL_PORT),
    }
}
