//! Typed request and response bodies, one per endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ApiError, Result};

/// Identifiers the remote sends either as numbers or as strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteId::Number(n) => write!(f, "{}", n),
            RemoteId::Text(s) => f.write_str(s),
        }
    }
}

// GET /catalog/parts/{partId}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub part_name: String,
    pub part_number: String,
    #[serde(default)]
    pub images: Vec<PartImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartImage {
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub full: Option<String>,
}

impl Part {
    /// Medium-size image to show with the part: the second one when there are
    /// more than two, otherwise the last one.
    pub fn display_image(&self) -> Option<&str> {
        let image = if self.images.len() > 2 {
            self.images.get(1)
        } else {
            self.images.last()
        };
        image.and_then(|image| image.medium.as_deref())
    }
}

// GET /profile/shop

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopProfile {
    pub id: RemoteId,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub cellphone: Option<String>,
    #[serde(default)]
    pub billing_address: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address1: String,
    #[serde(default)]
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}\n {}, {}, {}\n{}",
            self.address1,
            self.address2.as_deref().unwrap_or_default(),
            self.city,
            self.state,
            self.zip_code,
            self.country
        )
    }
}

impl ShopProfile {
    pub fn formatted_address(&self) -> Result<String> {
        self.billing_address
            .as_ref()
            .map(ToString::to_string)
            .ok_or_else(|| ApiError::Decode(format!("shop {} has no billing address", self.id)))
    }
}

// GET /profile/shop/suppliers

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub store: Store,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: RemoteId,
    #[serde(default)]
    pub name: Option<String>,
}

// POST /catalog/quote

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub search_params: SearchParams,
    pub store_id: RemoteId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub part_number: Vec<String>,
}

impl QuoteRequest {
    pub fn for_part(part_number: impl Into<String>, store_id: RemoteId) -> Self {
        Self {
            search_params: SearchParams {
                part_number: vec![part_number.into()],
            },
            store_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    #[serde(default)]
    pub parts: Vec<QuotedPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotedPart {
    #[serde(default)]
    pub store: Option<QuotedStore>,
    #[serde(default)]
    pub price: Option<Price>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotedStore {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    #[serde(default)]
    pub list: Option<f64>,
    #[serde(default)]
    pub cost: Option<f64>,
}

/// Store name and list price of the first quoted part
#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    pub store_name: String,
    pub list_price: f64,
}

impl QuoteResult {
    pub fn first_offer(&self) -> Option<Offer> {
        let part = self.parts.first()?;
        Some(Offer {
            store_name: part.store.as_ref()?.name.clone(),
            list_price: part.price.as_ref()?.list?,
        })
    }
}

// GET /taxonomy/vehicles/{id}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: RemoteId,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

// punchout cart

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPart {
    pub part_id: String,
    pub quantity: u32,
}

impl CartPart {
    pub fn new(part_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            part_id: part_id.into(),
            quantity,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RemovePartsRequest<'a> {
    pub parts: &'a [CartPart],
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartInfo {
    #[serde(default)]
    pub parts: Vec<CartPart>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn part_with_images(count: usize) -> Part {
        Part {
            part_name: "Brake Pad Set".to_string(),
            part_number: "ABC123".to_string(),
            images: (1..=count)
                .map(|i| PartImage {
                    preview: None,
                    medium: Some(format!("img-{i}")),
                    full: None,
                })
                .collect(),
        }
    }

    #[test]
    fn display_image_prefers_second_of_many() {
        assert_eq!(part_with_images(3).display_image(), Some("img-2"));
        assert_eq!(part_with_images(2).display_image(), Some("img-2"));
        assert_eq!(part_with_images(1).display_image(), Some("img-1"));
        assert_eq!(part_with_images(0).display_image(), None);
    }

    #[test]
    fn address_formatting() {
        let shop: ShopProfile = serde_json::from_value(json!({
            "id": "shop-7",
            "name": "Joe's Garage",
            "phone": "555-0100",
            "billingAddress": {
                "address1": "1 Main St",
                "city": "Springfield",
                "state": "IL",
                "zipCode": "62701",
                "country": "US"
            }
        }))
        .unwrap();

        assert_eq!(
            shop.formatted_address().unwrap(),
            "1 Main St, \n Springfield, IL, 62701\nUS"
        );
        assert_eq!(shop.cellphone, None);
    }

    #[test]
    fn missing_address_is_reported() {
        let shop: ShopProfile =
            serde_json::from_value(json!({ "id": 7, "name": "Joe's Garage" })).unwrap();
        assert!(matches!(shop.formatted_address(), Err(ApiError::Decode(_))));
    }

    #[test]
    fn quote_request_wire_shape() {
        let body = serde_json::to_value(QuoteRequest::for_part("ABC123", RemoteId::Number(42)))
            .unwrap();
        assert_eq!(
            body,
            json!({ "searchParams": { "partNumber": ["ABC123"] }, "storeId": 42 })
        );
    }

    #[test]
    fn first_offer_needs_store_and_price() {
        let quote: QuoteResult = serde_json::from_value(json!({
            "parts": [{ "store": { "name": "Main St Parts" }, "price": { "list": 42.5 } }]
        }))
        .unwrap();
        assert_eq!(
            quote.first_offer(),
            Some(Offer {
                store_name: "Main St Parts".to_string(),
                list_price: 42.5
            })
        );

        let no_price: QuoteResult =
            serde_json::from_value(json!({ "parts": [{ "store": { "name": "X" } }] })).unwrap();
        assert_eq!(no_price.first_offer(), None);
    }
}
