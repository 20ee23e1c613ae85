use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    error::{ApiError, Result},
    gateway::PartsGateway,
    models::{CartInfo, CartPart},
};

/// Tracks whether the remote cart exists and serializes every cart mutation.
///
/// The flag lives behind an async mutex that is held for the whole remote
/// call, so concurrent adds and removes against one cart run one at a time.
/// It only flips to `true` after the remote confirms the cart was created.
pub struct CartState {
    gateway: Arc<dyn PartsGateway>,
    exists: Mutex<bool>,
}

impl CartState {
    pub fn new(gateway: Arc<dyn PartsGateway>) -> Self {
        Self {
            gateway,
            exists: Mutex::new(false),
        }
    }

    pub async fn exists(&self) -> bool {
        *self.exists.lock().await
    }

    pub async fn ensure_cart_exists(&self) -> Result<()> {
        let mut exists = self.exists.lock().await;
        self.create_if_missing(&mut exists).await
    }

    /// Add a part, creating the cart first if needed.
    ///
    /// If the remote reports the cart missing although it was created earlier,
    /// the cart is created once more and the add retried once. The flag stays
    /// set throughout, also when that second create fails.
    pub async fn add_part(&self, part: &CartPart) -> Result<()> {
        let mut exists = self.exists.lock().await;
        let created_now = !*exists;
        self.create_if_missing(&mut exists).await?;

        match self.gateway.add_part_to_cart(part).await {
            Err(ApiError::Api { status: 404, .. }) if !created_now => {
                warn!(part_id = %part.part_id, "remote cart disappeared, recreating it once");
                self.gateway.create_cart().await?;
                info!("cart recreated");
                self.gateway.add_part_to_cart(part).await
            }
            outcome => outcome,
        }
    }

    pub async fn remove_part(&self, part: &CartPart) -> Result<()> {
        let exists = self.exists.lock().await;
        if !*exists {
            return Err(ApiError::Precondition(
                "cannot remove parts, no cart exists".to_string(),
            ));
        }
        self.gateway
            .remove_parts_from_cart(std::slice::from_ref(part))
            .await
    }

    pub async fn items(&self) -> Result<CartInfo> {
        let exists = self.exists.lock().await;
        if !*exists {
            return Err(ApiError::Precondition(
                "cannot list parts, no cart exists".to_string(),
            ));
        }
        self.gateway.cart_info().await
    }

    /// Forget the cart, e.g. when the user's session is reset
    pub async fn reset(&self) {
        *self.exists.lock().await = false;
    }

    async fn create_if_missing(&self, exists: &mut bool) -> Result<()> {
        if *exists {
            return Ok(());
        }
        self.gateway.create_cart().await?;
        *exists = true;
        info!("cart created");
        Ok(())
    }
}
