//! REST API endpoints.
//!
//! Endpoints:
//! - POST /v1/log/leaves - Append a leaf to the history tree
//! - GET /v1/log/root - Current root and size
//! - GET /v1/log/proofs/inclusion?index=N | leaf=hex - Inclusion proof
//! - GET /v1/log/proofs/consistency?first=M - Consistency proof
//! - POST /v1/mmr/leaves - Append a leaf to the mountain range
//! - GET /v1/mmr/root - Bagged root and peaks
//! - GET /v1/status - Server status
//!
//! Leaf bytes and digests travel hex-encoded.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use chronicle_core::{Error, Position};
use chronicle_tree::{ConsistencyProof, InclusionProof};

use crate::server::AppState;

/// REST API error response.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "code": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::LeafNotFound => ApiError::NotFound(e.to_string()),
            _ => ApiError::BadRequest(e.to_string()),
        }
    }
}

fn decode_leaf(hex_leaf: &str) -> Result<Vec<u8>, ApiError> {
    hex::decode(hex_leaf)
        .map_err(|_| ApiError::BadRequest("leaf must be hex-encoded".to_string()))
}

// ============================================================================
// Log API
// ============================================================================

/// Request to append a leaf (hex-encoded bytes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendLeafRequest {
    /// Leaf bytes, hex-encoded.
    pub leaf: String,
}

/// Response for a history tree append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendLogResponse {
    /// Position of the appended leaf.
    pub index: usize,
    /// Root after the append.
    pub root: String,
}

/// Current root of the history tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRootResponse {
    /// Root digest, absent while the log is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// Number of leaves.
    pub size: usize,
}

/// One step of an inclusion path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofStep {
    /// Sibling digest, hex-encoded.
    pub hash: String,
    /// Side the sibling lies on.
    pub position: Position,
}

/// Inclusion proof response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InclusionProofResponse {
    /// Index the proof speaks about.
    pub index: Option<usize>,
    /// Sibling path, leaf level first.
    pub path: Vec<ProofStep>,
    /// Root the proof verifies against.
    pub root: String,
    /// Log size when the proof was generated.
    pub tree_size: usize,
}

impl InclusionProofResponse {
    fn new(index: Option<usize>, proof: &InclusionProof, root: &chronicle_core::Hash, size: usize) -> Self {
        Self {
            index,
            path: proof
                .path
                .iter()
                .map(|node| ProofStep {
                    hash: node.hash.to_hex(),
                    position: node.position,
                })
                .collect(),
            root: root.to_hex(),
            tree_size: size,
        }
    }
}

/// Query parameters for an inclusion proof: one of `index` or `leaf`.
#[derive(Debug, Clone, Deserialize)]
pub struct InclusionProofQuery {
    /// Leaf position.
    pub index: Option<usize>,
    /// Leaf bytes, hex-encoded.
    pub leaf: Option<String>,
}

/// Query parameters for a consistency proof.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsistencyProofQuery {
    /// Size of the earlier committed log.
    pub first: usize,
}

/// Consistency proof response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyProofResponse {
    /// Size of the earlier log.
    pub first: usize,
    /// Current log size.
    pub size: usize,
    /// Current root.
    pub root: String,
    /// Proof digests, hex-encoded, in emission order.
    pub hashes: Vec<String>,
}

impl ConsistencyProofResponse {
    fn new(first: usize, proof: &ConsistencyProof, root: &chronicle_core::Hash, size: usize) -> Self {
        Self {
            first,
            size,
            root: root.to_hex(),
            hashes: proof.hashes.iter().map(|h| h.to_hex()).collect(),
        }
    }
}

/// Log API handlers.
pub struct LogApi;

impl LogApi {
    /// Create router for log endpoints.
    pub fn router() -> Router<Arc<AppState>> {
        Router::new()
            .route("/leaves", post(Self::append_leaf))
            .route("/root", get(Self::root))
            .route("/proofs/inclusion", get(Self::inclusion_proof))
            .route("/proofs/consistency", get(Self::consistency_proof))
    }

    /// POST /v1/log/leaves - Append a leaf.
    async fn append_leaf(
        State(state): State<Arc<AppState>>,
        Json(request): Json<AppendLeafRequest>,
    ) -> Result<Json<AppendLogResponse>, ApiError> {
        let leaf = decode_leaf(&request.leaf)?;
        let (index, root) = state.append_log_leaf(&leaf)?;

        info!(index, "appended log leaf");
        Ok(Json(AppendLogResponse {
            index,
            root: root.to_hex(),
        }))
    }

    /// GET /v1/log/root - Current root and size.
    async fn root(State(state): State<Arc<AppState>>) -> Json<LogRootResponse> {
        let response = match state.log_root() {
            Some((root, size)) => LogRootResponse {
                root: Some(root.to_hex()),
                size,
            },
            None => LogRootResponse {
                root: None,
                size: 0,
            },
        };
        Json(response)
    }

    /// GET /v1/log/proofs/inclusion - Prove a leaf by index or by bytes.
    async fn inclusion_proof(
        State(state): State<Arc<AppState>>,
        Query(query): Query<InclusionProofQuery>,
    ) -> Result<Json<InclusionProofResponse>, ApiError> {
        match (query.index, query.leaf) {
            (Some(index), None) => {
                let (proof, root, size) = state.log_inclusion(index)?;
                Ok(Json(InclusionProofResponse::new(
                    Some(index),
                    &proof,
                    &root,
                    size,
                )))
            }
            (None, Some(leaf)) => {
                let leaf = decode_leaf(&leaf)?;
                let (proof, root, size) = state.log_inclusion_for(&leaf)?;
                Ok(Json(InclusionProofResponse::new(None, &proof, &root, size)))
            }
            _ => Err(ApiError::BadRequest(
                "provide exactly one of index or leaf".to_string(),
            )),
        }
    }

    /// GET /v1/log/proofs/consistency - Prove an earlier size is a prefix.
    async fn consistency_proof(
        State(state): State<Arc<AppState>>,
        Query(query): Query<ConsistencyProofQuery>,
    ) -> Result<Json<ConsistencyProofResponse>, ApiError> {
        let (proof, root, size) = state.log_consistency(query.first)?;
        Ok(Json(ConsistencyProofResponse::new(
            query.first,
            &proof,
            &root,
            size,
        )))
    }
}

// ============================================================================
// MMR API
// ============================================================================

/// Response for a mountain range append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendMmrResponse {
    /// Leaf count after the append.
    pub leaf_count: u64,
    /// Bagged root after the append.
    pub root: String,
}

/// One peak of the mountain range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeakResponse {
    /// Peak height (0 for a bare leaf).
    pub height: u32,
    /// Peak digest, hex-encoded.
    pub digest: String,
}

/// Current state of the mountain range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MmrRootResponse {
    /// Bagged root, absent while the range is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// Number of appended leaves.
    pub leaf_count: u64,
    /// Current peaks, left to right.
    pub peaks: Vec<PeakResponse>,
}

/// MMR API handlers.
pub struct MmrApi;

impl MmrApi {
    /// Create router for MMR endpoints.
    pub fn router() -> Router<Arc<AppState>> {
        Router::new()
            .route("/leaves", post(Self::append_leaf))
            .route("/root", get(Self::root))
    }

    /// POST /v1/mmr/leaves - Append a leaf.
    async fn append_leaf(
        State(state): State<Arc<AppState>>,
        Json(request): Json<AppendLeafRequest>,
    ) -> Result<Json<AppendMmrResponse>, ApiError> {
        let leaf = decode_leaf(&request.leaf)?;
        let (leaf_count, root) = state.append_mmr_leaf(&leaf)?;

        info!(leaf_count, "appended mmr leaf");
        Ok(Json(AppendMmrResponse {
            leaf_count,
            root: root.to_hex(),
        }))
    }

    /// GET /v1/mmr/root - Bagged root and peaks.
    async fn root(State(state): State<Arc<AppState>>) -> Json<MmrRootResponse> {
        let (root, leaf_count, peaks) = state.mmr_snapshot();
        Json(MmrRootResponse {
            root: root.map(|h| h.to_hex()),
            leaf_count,
            peaks: peaks
                .iter()
                .map(|peak| PeakResponse {
                    height: peak.height,
                    digest: peak.digest.to_hex(),
                })
                .collect(),
        })
    }
}

// ============================================================================
// Status API
// ============================================================================

/// Server status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_seconds: u64,
    /// History tree leaf count.
    pub log_size: usize,
    /// Mountain range leaf count.
    pub mmr_leaf_count: u64,
}

/// Status API handlers.
pub struct StatusApi;

impl StatusApi {
    /// Create router for status endpoints.
    pub fn router() -> Router<Arc<AppState>> {
        Router::new().route("/", get(Self::get_status))
    }

    /// GET /v1/status - Server status.
    async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
        Json(StatusResponse {
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.uptime_seconds(),
            log_size: state.log_size(),
            mmr_leaf_count: state.mmr_leaf_count(),
        })
    }
}

// ============================================================================
// Combined Router
// ============================================================================

/// Create the complete REST API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/v1/log", LogApi::router())
        .nest("/v1/mmr", MmrApi::router())
        .nest("/v1/status", StatusApi::router())
}
