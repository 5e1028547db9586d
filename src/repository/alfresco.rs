//! Alfresco public REST API client.

use super::{ChildrenPage, NodeEntry, Pagination, TreeSource};
use crate::config::RepositoryConfig;
use crate::error::ExportError;
use crate::types::CHILDREN_PAGE_SIZE;
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

const SOURCE: &str = "repository";
const AUTH_PATH: &str = "/alfresco/api/-default-/public/authentication/versions/1/tickets";
const NODES_PATH: &str = "/alfresco/api/-default-/public/alfresco/versions/1/nodes";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TicketRequest<'a> {
    user_id: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TicketResponse {
    entry: TicketEntry,
}

#[derive(Debug, Deserialize)]
struct TicketEntry {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ChildrenResponse {
    list: ChildrenList,
}

#[derive(Debug, Deserialize)]
struct ChildrenList {
    #[serde(default)]
    pagination: Pagination,
    #[serde(default)]
    entries: Vec<EntryWrapper>,
}

#[derive(Debug, Deserialize)]
struct EntryWrapper {
    entry: NodeEntry,
}

/// Tree source backed by an Alfresco content repository.
pub struct AlfrescoTreeSource {
    client: Client,
    host: String,
    username: String,
    password: String,
    ticket: RwLock<Option<String>>,
}

impl AlfrescoTreeSource {
    pub fn new(config: &RepositoryConfig) -> Result<Self, ExportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ExportError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            host: config.host.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            ticket: RwLock::new(None),
        })
    }

    fn ticket(&self) -> Result<String, ExportError> {
        self.ticket.read().clone().ok_or_else(|| {
            ExportError::RemoteFetchFailure("Repository session not established".to_string())
        })
    }
}

#[async_trait]
impl TreeSource for AlfrescoTreeSource {
    async fn login(&self) -> Result<(), ExportError> {
        info!(host = %self.host, "Logging into repository");
        let response = self
            .client
            .post(format!("{}{}", self.host, AUTH_PATH))
            .json(&TicketRequest {
                user_id: &self.username,
                password: &self.password,
            })
            .send()
            .await
            .map_err(|e| ExportError::AuthenticationFailure(format!("repository login: {}", e)))?;

        if !response.status().is_success() {
            return Err(ExportError::AuthenticationFailure(format!(
                "repository login returned {}",
                response.status()
            )));
        }

        let ticket: TicketResponse = response
            .json()
            .await
            .map_err(|e| ExportError::AuthenticationFailure(format!("repository login: {}", e)))?;
        *self.ticket.write() = Some(ticket.entry.id);
        info!("Repository login successful");
        Ok(())
    }

    async fn list_children(
        &self,
        node_id: &str,
        skip_count: u64,
    ) -> Result<ChildrenPage, ExportError> {
        let ticket = self.ticket()?;
        debug!(node_id, skip_count, "Listing repository children");
        let response = self
            .client
            .get(format!("{}{}/{}/children", self.host, NODES_PATH, node_id))
            .query(&[
                ("skipCount", skip_count.to_string()),
                ("maxItems", CHILDREN_PAGE_SIZE.to_string()),
                ("alf_ticket", ticket),
            ])
            .send()
            .await
            .map_err(|e| ExportError::remote(SOURCE, e))?;

        if !response.status().is_success() {
            return Err(ExportError::RemoteFetchFailure(format!(
                "listing children of {} returned {}",
                node_id,
                response.status()
            )));
        }

        let body: ChildrenResponse = response
            .json()
            .await
            .map_err(|e| ExportError::remote(SOURCE, e))?;
        Ok(ChildrenPage {
            entries: body.list.entries.into_iter().map(|w| w.entry).collect(),
            pagination: body.list.pagination,
        })
    }

    fn content_url(&self, file_id: &str) -> String {
        let ticket = self.ticket.read().clone().unwrap_or_default();
        format!(
            "{}{}/{}/content?attachment=false&alf_ticket={}",
            self.host, NODES_PATH, file_id, ticket
        )
    }
}
