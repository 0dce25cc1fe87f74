//! Server state and lifecycle.
//!
//! The state owns one history tree and one mountain range. Each structure
//! linearises its own calls internally, but the handlers report compound
//! facts (append result plus new root, root plus peaks), so both fields sit
//! behind an outer lock held across the whole operation. The history tree
//! cannot exist empty, so it materialises with the first appended leaf;
//! until then the log endpoints report an empty log.

use std::sync::Arc;
use std::time::Instant;

use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::Router;
use parking_lot::RwLock;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use chronicle_core::{Error, Hash, Result};
use chronicle_mmr::{Mmr, PeakInfo};
use chronicle_tree::{ConsistencyProof, InclusionProof, Tree};

use crate::config::ApiConfig;
use crate::rest::create_router;

/// Shared API state.
pub struct AppState {
    /// Server configuration.
    pub config: ApiConfig,
    /// The history tree; absent until the first leaf arrives.
    tree: RwLock<Option<Tree>>,
    /// The mountain range.
    mmr: RwLock<Mmr>,
    /// Server start time.
    start_time: Instant,
}

impl AppState {
    /// Create new state with an empty log and an empty mountain range.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            tree: RwLock::new(None),
            mmr: RwLock::new(Mmr::new()),
            start_time: Instant::now(),
        }
    }

    /// Append a leaf to the history tree, creating the tree on first use.
    /// Returns the new leaf's index and the new root.
    pub fn append_log_leaf(&self, data: &[u8]) -> Result<(usize, Hash)> {
        let mut guard = self.tree.write();
        match guard.as_ref() {
            None => {
                let tree = Tree::new(&[data])?;
                let root = tree.root_hash();
                *guard = Some(tree);
                Ok((0, root))
            }
            Some(tree) => {
                tree.append(data)?;
                Ok((tree.leaf_count() - 1, tree.root_hash()))
            }
        }
    }

    /// Current log root and size, if any leaves have been appended.
    pub fn log_root(&self) -> Option<(Hash, usize)> {
        let guard = self.tree.read();
        guard
            .as_ref()
            .map(|tree| (tree.root_hash(), tree.leaf_count()))
    }

    /// Inclusion proof for the leaf at `index`, plus the root and size it
    /// speaks about.
    pub fn log_inclusion(&self, index: usize) -> Result<(InclusionProof, Hash, usize)> {
        let guard = self.tree.read();
        let tree = guard.as_ref().ok_or(Error::InvalidIndex)?;
        let proof = tree.inclusion_proof(index)?;
        Ok((proof, tree.root_hash(), tree.leaf_count()))
    }

    /// Inclusion proof for the earliest leaf equal to `data`.
    pub fn log_inclusion_for(&self, data: &[u8]) -> Result<(InclusionProof, Hash, usize)> {
        let guard = self.tree.read();
        let tree = guard.as_ref().ok_or(Error::LeafNotFound)?;
        let proof = tree.inclusion_proof_for(data)?;
        Ok((proof, tree.root_hash(), tree.leaf_count()))
    }

    /// Consistency proof for the first `m` leaves against the current log.
    pub fn log_consistency(&self, m: usize) -> Result<(ConsistencyProof, Hash, usize)> {
        let guard = self.tree.read();
        let tree = guard.as_ref().ok_or(Error::InvalidConsistencyRange)?;
        let proof = tree.consistency_proof(m)?;
        Ok((proof, tree.root_hash(), tree.leaf_count()))
    }

    /// Append a leaf to the mountain range. Returns the new leaf count and
    /// bagged root, read under the same guard as the append so the pair
    /// describes one state.
    pub fn append_mmr_leaf(&self, data: &[u8]) -> Result<(u64, Hash)> {
        let mmr = self.mmr.write();
        mmr.append(data)?;
        let root = mmr
            .root_hash()
            .expect("mmr with an appended leaf has a root");
        Ok((mmr.leaf_count(), root))
    }

    /// Current mountain range root, leaf count, and peaks, all from one
    /// snapshot.
    pub fn mmr_snapshot(&self) -> (Option<Hash>, u64, Vec<PeakInfo>) {
        let mmr = self.mmr.read();
        (mmr.root_hash(), mmr.leaf_count(), mmr.peaks())
    }

    /// Current log size (0 while the tree is unmaterialised).
    pub fn log_size(&self) -> usize {
        self.tree
            .read()
            .as_ref()
            .map(|tree| tree.leaf_count())
            .unwrap_or(0)
    }

    /// Seconds since the server started.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// MMR leaf count.
    pub fn mmr_leaf_count(&self) -> u64 {
        self.mmr.read().leaf_count()
    }
}

/// Assemble the full router with the middleware stack.
pub fn router(state: Arc<AppState>) -> Router {
    let config = state.config.clone();

    let mut app = create_router().with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(config.request_timeout)),
    );

    if config.cors_enabled {
        app = app.layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([CONTENT_TYPE])
                .allow_origin(Any),
        );
    }

    app
}

/// Bind and run the server until a shutdown signal arrives.
pub async fn serve(config: ApiConfig) -> std::io::Result<()> {
    let listen_addr = config.listen_addr;
    let state = Arc::new(AppState::new(config));
    let app = router(state);

    let listener = TcpListener::bind(listen_addr).await?;
    info!("server listening on {}", listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received, draining connections");
    }
}
