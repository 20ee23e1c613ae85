//! In-memory [`PartsGateway`] that records every call, for tests of code
//! built on top of the gateway.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::time::Duration;

use crate::{
    credentials::Credentials,
    error::{ApiError, Result},
    gateway::PartsGateway,
    models::{CartInfo, CartPart, Part, QuoteResult, RemoteId, ShopProfile, Vehicle},
};

#[derive(Default)]
pub struct RecordingGateway {
    part: Option<Part>,
    quote: Option<QuoteResult>,
    shop: Option<ShopProfile>,
    failure_status: Option<u16>,
    accepted_login: Option<(String, String)>,
    cart_lost: AtomicBool,
    next_create_failure: AtomicU16,
    create_delay: Duration,
    calls: Mutex<Vec<String>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_part(mut self, part: Part) -> Self {
        self.part = Some(part);
        self
    }

    pub fn with_quote(mut self, quote: QuoteResult) -> Self {
        self.quote = Some(quote);
        self
    }

    pub fn with_shop(mut self, shop: ShopProfile) -> Self {
        self.shop = Some(shop);
        self
    }

    /// Every remote operation answers with this HTTP status
    pub fn failing_with(mut self, status: u16) -> Self {
        self.failure_status = Some(status);
        self
    }

    pub fn accepting_login(mut self, user_id: &str, user_key: &str) -> Self {
        self.accepted_login = Some((user_id.to_string(), user_key.to_string()));
        self
    }

    /// The next add-to-cart answers 404 as if the remote cart had vanished
    pub fn lose_cart(&self) {
        self.cart_lost.store(true, Ordering::SeqCst);
    }

    /// The next create-cart answers with this HTTP status
    pub fn fail_next_create(&self, status: u16) {
        self.next_create_failure.store(status, Ordering::SeqCst);
    }

    /// Create-cart takes this long to answer
    pub fn slow_create(mut self, delay: Duration) -> Self {
        self.create_delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Number of recorded calls to the named operation
    pub fn count(&self, operation: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.split(':').next() == Some(operation))
            .count()
    }

    fn record(&self, call: String) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        match self.failure_status {
            Some(status) => Err(ApiError::Api {
                status,
                body: r#"{"error":"internal failure"}"#.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn configured<T: Clone>(value: &Option<T>, what: &str) -> Result<T> {
        value.clone().ok_or_else(|| ApiError::Api {
            status: 404,
            body: format!("no {} configured", what),
        })
    }
}

#[async_trait]
impl PartsGateway for RecordingGateway {
    async fn login(&self, credentials: &Credentials) -> Result<()> {
        self.record(format!("login:{}", credentials.user.id))?;
        match &self.accepted_login {
            Some((id, key)) if *id == credentials.user.id && *key == credentials.user.key => {
                Ok(())
            }
            _ => Err(ApiError::Auth("login rejected with status 401".to_string())),
        }
    }

    async fn part_by_id(&self, part_id: &str) -> Result<Part> {
        self.record(format!("part_by_id:{}", part_id))?;
        Self::configured(&self.part, "part")
    }

    async fn quote_for_part(&self, part_number: &str) -> Result<QuoteResult> {
        self.record(format!("quote_for_part:{}", part_number))?;
        Self::configured(&self.quote, "quote")
    }

    async fn shop_profile(&self) -> Result<ShopProfile> {
        self.record("shop_profile".to_string())?;
        Self::configured(&self.shop, "shop")
    }

    async fn vehicle_by_id(&self, vehicle_id: u64) -> Result<Vehicle> {
        self.record(format!("vehicle_by_id:{}", vehicle_id))?;
        Ok(Vehicle {
            id: RemoteId::Number(vehicle_id),
            year: None,
            make: None,
            model: None,
        })
    }

    async fn create_cart(&self) -> Result<()> {
        self.record("create_cart".to_string())?;
        if !self.create_delay.is_zero() {
            tokio::time::sleep(self.create_delay).await;
        }
        match self.next_create_failure.swap(0, Ordering::SeqCst) {
            0 => Ok(()),
            status => Err(ApiError::Api {
                status,
                body: "cart could not be created".to_string(),
            }),
        }
    }

    async fn add_part_to_cart(&self, part: &CartPart) -> Result<()> {
        self.record(format!("add_part_to_cart:{}", part.part_id))?;
        if self.cart_lost.swap(false, Ordering::SeqCst) {
            return Err(ApiError::Api {
                status: 404,
                body: "cart not found".to_string(),
            });
        }
        Ok(())
    }

    async fn remove_parts_from_cart(&self, parts: &[CartPart]) -> Result<()> {
        let ids: Vec<&str> = parts.iter().map(|p| p.part_id.as_str()).collect();
        self.record(format!("remove_parts_from_cart:{}", ids.join(",")))
    }

    async fn cart_info(&self) -> Result<CartInfo> {
        self.record("cart_info".to_string())?;
        Ok(CartInfo::default())
    }
}
