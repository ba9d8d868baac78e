//! System identifier minting.
//!
//! Registration needs a previously-unused, namespaced identifier for each
//! object. Production deployments are expected to request durable
//! identifiers (NOID/ARK) from an institutional naming authority; that call
//! lives behind the [`Authority`] trait so the pipeline never knows which
//! implementation it is talking to. [`RandomAuthority`] is the local
//! implementation: a namespace tag plus a v4 UUID, collision-resistant by
//! its 122 random bits.
//!
//! Note that idempotence is *not* this crate's job: the registration stage
//! never asks for an identifier for an object that already has one, so an
//! authority can be a pure generator with no lookup side.

pub mod error;

use crate::error::Result;
use derive_more::Display;
use uuid::Uuid;

/// Default namespace tag carried by locally minted identifiers.
pub const DEFAULT_NAMESPACE: &str = "vtdata";

/// A minted system identifier.
///
/// Always of the form `<namespace>_<token>`; usable directly as a directory
/// name (the token never contains path separators).
#[derive(Debug, Clone, Display, PartialEq, Eq, Hash)]
pub struct SystemId(String);

impl SystemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for SystemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A source of previously-unused system identifiers.
///
/// Swappable between local random generation and a remote naming-authority
/// call; the pipeline only sees this seam.
pub trait Authority {
    fn mint(&self) -> Result<SystemId>;
}

/// Locally minted random identifiers: `<namespace>_<uuid-v4>`.
#[derive(Debug, Clone)]
pub struct RandomAuthority {
    namespace: String,
}

impl RandomAuthority {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self { namespace: namespace.into() }
    }
}

impl Default for RandomAuthority {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

impl Authority for RandomAuthority {
    fn mint(&self) -> Result<SystemId> {
        Ok(SystemId(format!("{}_{}", self.namespace, Uuid::new_v4())))
    }
}
