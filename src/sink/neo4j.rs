//! Neo4jHttpSink - Neo4j over the HTTP transactional endpoint
//!
//! Every call is one statement posted to `/db/{database}/tx/commit`, which
//! Neo4j runs in its own auto-committed transaction. Values always travel as
//! parameters; only sanitized label and type tokens are placed in the query
//! text, quoted with backticks.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

use super::{GraphSink, SinkError, SinkResult};
use crate::config::ConnectionConfig;
use crate::error::IngestError;
use crate::graph::{properties_to_json, Label};
use crate::ingest::{NodeRecord, RelationshipRecord};

const PING_QUERY: &str = "RETURN 1 AS ok";

const NODE_EXISTS_QUERY: &str = "MATCH (n {name: $name}) RETURN count(n) AS found";

/// Neo4j codes that mean the caller can never succeed with these credentials
const SECURITY_ERROR_PREFIX: &str = "Neo.ClientError.Security.";

/// Neo4j codes for a server that cannot take writes right now
const TRANSIENT_ERROR_PREFIX: &str = "Neo.TransientError.";

/// Gateway statuses: the server behind the endpoint is unavailable
fn is_unavailable(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
    )
}

#[derive(Serialize)]
struct CommitRequest<'a> {
    statements: [Statement<'a>; 1],
}

#[derive(Serialize)]
struct Statement<'a> {
    statement: &'a str,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    errors: Vec<Neo4jError>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    #[serde(default)]
    data: Vec<ResultRow>,
}

#[derive(Debug, Deserialize)]
struct ResultRow {
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Neo4jError {
    code: String,
    message: String,
}

/// Cypher for merging a node by name and applying its labels
pub fn node_merge_statement(labels: &[Label]) -> String {
    let mut statement = String::from("MERGE (n {name: $name})");
    if !labels.is_empty() {
        statement.push_str(" SET n");
        for label in labels {
            statement.push_str(&format!(":`{}`", label));
        }
    }
    statement.push_str(" SET n += $properties RETURN count(n) AS affected");
    statement
}

/// Cypher for merging a typed edge between two nodes matched by name
pub fn relationship_merge_statement(rel: &RelationshipRecord) -> String {
    format!(
        "MATCH (a {{name: $start}}), (b {{name: $end}}) \
         MERGE (a)-[r:`{}`]->(b) \
         SET r += $properties RETURN count(r) AS affected",
        rel.relationship_type()
    )
}

/// Sink that talks to a Neo4j server over HTTP
pub struct Neo4jHttpSink {
    commit_url: String,
    user: String,
    password: String,
    http_client: Client,
    closed: AtomicBool,
}

impl Neo4jHttpSink {
    /// Build a sink from connection parameters.
    ///
    /// No request is made here; `ping` checks reachability.
    pub fn new(config: &ConnectionConfig) -> Result<Self, IngestError> {
        let commit_url = config.commit_url()?;
        let http_client = Client::builder()
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| IngestError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            commit_url,
            user: config.user.clone(),
            password: config.password.clone(),
            http_client,
            closed: AtomicBool::new(false),
        })
    }

    pub fn commit_url(&self) -> &str {
        &self.commit_url
    }

    /// Run one auto-committed statement and return its rows
    async fn run(&self, statement: &str, parameters: Value) -> SinkResult<Vec<Vec<Value>>> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(SinkError::Closed);
        }

        let body = CommitRequest {
            statements: [Statement {
                statement,
                parameters,
            }],
        };

        let response = self
            .http_client
            .post(&self.commit_url)
            .basic_auth(&self.user, Some(&self.password))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SinkError::Connection(format!(
                "authentication failed ({})",
                status
            )));
        }
        if is_unavailable(status) {
            return Err(SinkError::Connection(format!(
                "HTTP {} from {}",
                status, self.commit_url
            )));
        }

        let text = response.text().await?;
        let parsed: CommitResponse = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => {
                return Err(SinkError::Protocol(format!("unexpected response body: {}", e)))
            }
            Err(_) => {
                return Err(SinkError::Protocol(format!(
                    "HTTP {} from {}",
                    status, self.commit_url
                )))
            }
        };

        if let Some(error) = parsed.errors.into_iter().next() {
            if error.code.starts_with(SECURITY_ERROR_PREFIX)
                || error.code.starts_with(TRANSIENT_ERROR_PREFIX)
            {
                return Err(SinkError::Connection(format!("{}: {}", error.code, error.message)));
            }
            return Err(SinkError::Write(format!("{}: {}", error.code, error.message)));
        }

        if !status.is_success() {
            return Err(SinkError::Protocol(format!(
                "HTTP {} from {}",
                status, self.commit_url
            )));
        }

        Ok(parsed
            .results
            .into_iter()
            .next()
            .map(|result| result.data.into_iter().map(|row| row.row).collect())
            .unwrap_or_default())
    }

    /// Run a statement expected to return a single count
    async fn run_count(&self, statement: &str, parameters: Value) -> SinkResult<u64> {
        let rows = self.run(statement, parameters).await?;
        rows.first()
            .and_then(|row| row.first())
            .and_then(Value::as_u64)
            .ok_or_else(|| SinkError::Protocol(format!("expected a count from {:?}", statement)))
    }
}

#[async_trait]
impl GraphSink for Neo4jHttpSink {
    async fn ping(&self) -> SinkResult<()> {
        self.run(PING_QUERY, json!({})).await?;
        info!("Connected to Neo4j at {}", self.commit_url);
        Ok(())
    }

    async fn merge_node(&self, node: &NodeRecord) -> SinkResult<u64> {
        let statement = node_merge_statement(&node.labels());
        let parameters = json!({
            "name": node.name(),
            "properties": properties_to_json(&node.attributes()),
        });
        debug!("{}", statement);
        self.run_count(&statement, parameters).await
    }

    async fn node_exists(&self, name: &str) -> SinkResult<bool> {
        let found = self.run_count(NODE_EXISTS_QUERY, json!({ "name": name })).await?;
        Ok(found > 0)
    }

    async fn merge_relationship(&self, rel: &RelationshipRecord) -> SinkResult<u64> {
        let statement = relationship_merge_statement(rel);
        let parameters = json!({
            "start": rel.start(),
            "end": rel.end(),
            "properties": properties_to_json(rel.properties()),
        });
        debug!("{}", statement);
        self.run_count(&statement, parameters).await
    }

    async fn close(&self) -> SinkResult<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            info!("Neo4j connection closed");
        }
        Ok(())
    }
}
