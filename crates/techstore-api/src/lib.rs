//! # techstore-api: REST Client Layer
//!
//! Everything between the pure business logic in `techstore-core` and
//! the upstream REST API lives here.
//!
//! ## Control Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Data Flow                                        │
//! │                                                                         │
//! │  CLI ──► Queries ──► services ──► ApiClient ──► remote REST API         │
//! │            │                         │                                  │
//! │            │                         └── bearer token from              │
//! │            ▼                             SessionStore                   │
//! │      ResourceStore                                                      │
//! │      (COW snapshots, broadcast notify)                                  │
//! │                                                                         │
//! │  Reads fill the cache (one bounded retry). Mutations splice the         │
//! │  affected record synchronously, then revalidate in the background.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - environment-driven configuration
//! - [`client`] - HTTP wrapper: bearer auth, normalized errors, 401 exit
//! - [`auth`] - login/register and unverified token payload decoding
//! - [`session`] - persisted session state (token, theme, document tags)
//! - [`cache`] - per-resource collections with subscribe/notify
//! - [`services`] - 1:1 REST resource accessors
//! - [`query`] - cached reads + optimistic mutations with revalidation
//! - [`error`] - normalized error taxonomy

pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod services;
pub mod session;

pub use auth::AuthApi;
pub use cache::{CacheEvent, ChangeKind, Collection, ResourceKey, ResourceStore};
pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use query::Queries;
pub use session::{SessionStore, Theme, UserProfile};
