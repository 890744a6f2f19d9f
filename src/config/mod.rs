//! Configuration module - peering document types and the peer registry

pub mod arn;
pub mod registry;
pub mod types;

pub use arn::account_id_from_role_arn;
pub use registry::{ConfigError, PeerRecord, PeerRegistry, DEFAULT_REGION};
pub use types::{PeerEntry, PeeringDoc};
