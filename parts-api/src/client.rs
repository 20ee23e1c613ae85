use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    config::ApiConfig,
    credentials::Credentials,
    error::{ApiError, Result},
    gateway::PartsGateway,
    models::{
        CartInfo, CartPart, Part, QuoteRequest, QuoteResult, RemovePartsRequest, ShopProfile,
        Supplier, Vehicle,
    },
    token::TokenManager,
};

/// HTTP implementation of [`PartsGateway`] against the PartsTech REST API
pub struct PartsApi {
    http: reqwest::Client,
    config: ApiConfig,
    tokens: Arc<TokenManager>,
}

impl PartsApi {
    pub fn new(config: ApiConfig, credentials: Credentials) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Transport)?;
        let tokens = Arc::new(TokenManager::new(http.clone(), config.clone(), credentials));
        Ok(Self {
            http,
            config,
            tokens,
        })
    }

    pub fn tokens(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    pub async fn suppliers(&self) -> Result<Vec<Supplier>> {
        let request = self.http.get(self.config.url("/profile/shop/suppliers"));
        self.send_json(request, "suppliers").await
    }

    /// Attach a bearer token, send, and return the body of a 2xx response
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        operation: &'static str,
    ) -> Result<String> {
        let token = self.tokens.valid_token().await?;
        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                warn!(operation, "request failed before a response: {}", e);
                ApiError::Transport(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::Transport)?;
        if !status.is_success() {
            warn!(operation, status = status.as_u16(), body = %body, "remote returned an error");
            return Err(ApiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!(operation, status = status.as_u16(), "remote call succeeded");
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation: &'static str,
    ) -> Result<T> {
        let body = self.execute(request, operation).await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!(operation, "response did not match the expected shape: {}", e);
            ApiError::Decode(format!("{}: {}", operation, e))
        })
    }
}

#[async_trait]
impl PartsGateway for PartsApi {
    async fn login(&self, credentials: &Credentials) -> Result<()> {
        self.tokens.login(credentials).await
    }

    async fn part_by_id(&self, part_id: &str) -> Result<Part> {
        info!(part_id, "looking up part");
        let url = self.config.url_with_segment("/catalog/parts", part_id)?;
        let request = self.http.get(url);
        self.send_json(request, "part_by_id").await
    }

    async fn quote_for_part(&self, part_number: &str) -> Result<QuoteResult> {
        let store_id = self
            .suppliers()
            .await?
            .into_iter()
            .next()
            .map(|supplier| supplier.store.id)
            .ok_or_else(|| ApiError::Precondition("shop has no suppliers to quote".to_string()))?;

        info!(part_number, store_id = %store_id, "requesting quote");
        let request = self
            .http
            .post(self.config.url("/catalog/quote"))
            .json(&QuoteRequest::for_part(part_number, store_id));
        self.send_json(request, "quote_for_part").await
    }

    async fn shop_profile(&self) -> Result<ShopProfile> {
        let request = self.http.get(self.config.url("/profile/shop"));
        self.send_json(request, "shop_profile").await
    }

    async fn vehicle_by_id(&self, vehicle_id: u64) -> Result<Vehicle> {
        let url = self
            .config
            .url_with_segment("/taxonomy/vehicles", &vehicle_id.to_string())?;
        let request = self.http.get(url);
        self.send_json(request, "vehicle_by_id").await
    }

    async fn create_cart(&self) -> Result<()> {
        let request = self.http.post(self.config.url("/punchout/cart/create"));
        self.execute(request, "create_cart").await.map(|_| ())
    }

    async fn add_part_to_cart(&self, part: &CartPart) -> Result<()> {
        let request = self
            .http
            .post(self.config.url("/punchout/cart/add-part"))
            .json(part);
        self.execute(request, "add_part_to_cart").await.map(|_| ())
    }

    async fn remove_parts_from_cart(&self, parts: &[CartPart]) -> Result<()> {
        let request = self
            .http
            .delete(self.config.url("/punchout/cart/remove-parts"))
            .json(&RemovePartsRequest { parts });
        self.execute(request, "remove_parts_from_cart")
            .await
            .map(|_| ())
    }

    async fn cart_info(&self) -> Result<CartInfo> {
        let request = self.http.get(self.config.url("/punchout/cart/info"));
        self.send_json(request, "cart_info").await
    }
}
