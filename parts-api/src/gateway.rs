use async_trait::async_trait;

use crate::{
    credentials::Credentials,
    error::Result,
    models::{CartInfo, CartPart, Part, QuoteResult, ShopProfile, Vehicle},
};

/// Remote operations the bot performs on the user's behalf.
///
/// Implementations attach authentication themselves and never retry; a
/// failed call is reported to the caller as-is.
#[async_trait]
pub trait PartsGateway: Send + Sync {
    /// Authenticate as the given user; the resulting tokens are used for later calls
    async fn login(&self, credentials: &Credentials) -> Result<()>;

    async fn part_by_id(&self, part_id: &str) -> Result<Part>;

    /// Quote a part number at the shop's first supplier
    async fn quote_for_part(&self, part_number: &str) -> Result<QuoteResult>;

    async fn shop_profile(&self) -> Result<ShopProfile>;

    async fn vehicle_by_id(&self, vehicle_id: u64) -> Result<Vehicle>;

    async fn create_cart(&self) -> Result<()>;

    async fn add_part_to_cart(&self, part: &CartPart) -> Result<()>;

    async fn remove_parts_from_cart(&self, parts: &[CartPart]) -> Result<()>;

    async fn cart_info(&self) -> Result<CartInfo>;
}
