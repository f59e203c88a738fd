pub mod adapter;
pub mod error;
pub mod json;
pub mod media;
pub mod params;
#[cfg(test)]
pub mod testing;
pub mod transport;
pub mod usage;

pub use crate::core::adapter::{classify, timed, Operation, ProviderAdapter, WireConvention};
pub use crate::core::error::{GatewayError, TransportError};
pub use crate::core::media::{extract_media, MediaKind, MediaNode};
pub use crate::core::params::ParamReader;
pub use crate::core::transport::{
    HttpTransport, MultipartForm, TransportConfig, TransportResponse,
};
pub use crate::core::usage::{
    JsonlUsageSink, MemoryUsageSink, TracingUsageSink, UsageRecorder, UsageSink,
};
