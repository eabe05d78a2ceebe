//! Client-side session custody for the ClassNest API.
//!
//! Owns the active access/refresh token pair, persists it across restarts,
//! attaches it to outbound calls and renews it transparently. The three
//! seams are [`api::AuthApi`] (transport), [`store::TokenStore`] (durable
//! storage) and [`session::SessionClient`] (lifecycle).

pub mod api;
pub mod session;
pub mod store;

pub use api::{ApiClientError, AuthApi, HttpAuthApi, LoginResponse, Principal, TokenPair};
pub use session::{SessionClient, SessionError};
pub use store::{FileTokenStore, MemoryTokenStore, StoreError, StoredTokens, TokenStore};
