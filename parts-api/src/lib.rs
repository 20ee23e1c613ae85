pub mod cart;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod models;
pub mod token;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[cfg(test)]
mod fake_remote;

// Re-export commonly used types
pub use cart::CartState;
pub use client::PartsApi;
pub use config::ApiConfig;
pub use credentials::{Credentials, Party};
pub use error::{ApiError, Result};
pub use gateway::PartsGateway;
pub use models::{
    Address, CartInfo, CartPart, Offer, Part, PartImage, QuoteResult, RemoteId, ShopProfile,
    Vehicle,
};
pub use token::TokenManager;
