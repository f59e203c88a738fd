//! Shared type definitions for the generative-media gateway.
//!
//! Everything in here is plain data: the inbound request shape, the
//! normalized call result and envelope, usage-log records, key records and the
//! platform catalog. Behaviour lives in `core` and the provider modules.

pub mod catalog;
pub mod envelope;
pub mod keys;
pub mod media;
pub mod request;
pub mod usage;

pub use catalog::Platform;
pub use envelope::{CallMeta, CallResult, ResultEnvelope};
pub use keys::ApiKeyRecord;
pub use media::MediaUrls;
pub use request::{GenerationRequest, RequestShapeError};
pub use usage::UsageLogEntry;
