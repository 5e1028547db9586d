//! OrderCloud catalog client (OAuth2 client credentials).

use super::{CatalogSource, CategoryPage, PageRequest};
use crate::config::CatalogConfig;
use crate::error::ExportError;
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const SOURCE: &str = "catalog";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct OrderCloudCatalogSource {
    client: Client,
    api_url: String,
    auth_url: String,
    client_id: String,
    client_secret: String,
    scopes: Vec<String>,
    access_token: RwLock<Option<String>>,
}

impl OrderCloudCatalogSource {
    pub fn new(config: &CatalogConfig) -> Result<Self, ExportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ExportError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            auth_url: config.auth_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scopes: config.scopes.clone(),
            access_token: RwLock::new(None),
        })
    }

    fn categories_url(&self, catalog_id: &str) -> String {
        format!("{}/v1/catalogs/{}/categories", self.api_url, catalog_id)
    }
}

#[async_trait]
impl CatalogSource for OrderCloudCatalogSource {
    async fn login(&self) -> Result<(), ExportError> {
        info!(auth_url = %self.auth_url, "Logging into catalog");
        let scope = self.scopes.join(" ");
        let response = self
            .client
            .post(format!("{}/oauth/token", self.auth_url))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", scope.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ExportError::AuthenticationFailure(format!("catalog login: {}", e)))?;

        if !response.status().is_success() {
            return Err(ExportError::AuthenticationFailure(format!(
                "catalog login returned {}",
                response.status()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ExportError::AuthenticationFailure(format!("catalog login: {}", e)))?;
        *self.access_token.write() = Some(token.access_token);
        info!("Catalog login successful");
        Ok(())
    }

    async fn list_categories(
        &self,
        catalog_id: &str,
        request: &PageRequest,
    ) -> Result<CategoryPage, ExportError> {
        let token = self.access_token.read().clone().ok_or_else(|| {
            ExportError::RemoteFetchFailure("Catalog access token not established".to_string())
        })?;
        debug!(catalog_id, page = request.page, "Listing catalog categories");

        let response = self
            .client
            .get(self.categories_url(catalog_id))
            .bearer_auth(token)
            .query(&[
                ("page", request.page.to_string()),
                ("pageSize", request.page_size.to_string()),
                ("depth", request.depth.clone()),
            ])
            .send()
            .await
            .map_err(|e| ExportError::remote(SOURCE, e))?;

        if !response.status().is_success() {
            return Err(ExportError::RemoteFetchFailure(format!(
                "category page {} returned {}",
                request.page,
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ExportError::remote(SOURCE, e))
    }
}
