//! REST shell for the Chronicle append-only log.
//!
//! Exposes one history tree and one mountain range over HTTP:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 axum router                  │
//! │   (TraceLayer, TimeoutLayer, optional CORS)  │
//! └──────────────────────────────────────────────┘
//!          │                    │
//!          ▼                    ▼
//! ┌─────────────────┐   ┌──────────────────┐
//! │   /v1/log/*     │   │    /v1/mmr/*     │
//! │  append, root,  │   │  append, root,   │
//! │  proofs         │   │  peaks           │
//! └─────────────────┘   └──────────────────┘
//!          │                    │
//!          └──────────┬─────────┘
//!                     ▼
//! ┌──────────────────────────────────────────────┐
//! │                  AppState                    │
//! │        (chronicle-tree, chronicle-mmr)       │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The shell only consumes the core crates' operations; all cryptographic
//! behaviour lives there.

pub mod config;
pub mod rest;
pub mod server;

pub use config::{ApiConfig, ConfigError};
pub use rest::{ApiError, LogApi, MmrApi, StatusApi};
pub use server::{router, serve, AppState};
