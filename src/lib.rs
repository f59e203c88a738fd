#[path = "../crates/sdk-types/src/lib.rs"]
pub mod types;
#[path = "../crates/core/src/lib.rs"]
pub mod core;
#[path = "../crates/provider/src/lib.rs"]
pub mod provider;
#[path = "../crates/transports/reqwest/src/lib.rs"]
pub mod transport_reqwest;

#[path = "../crates/providers/kling/src/lib.rs"]
pub mod provider_kling;
#[path = "../crates/providers/cometapi/src/lib.rs"]
pub mod provider_cometapi;

#[path = "../crates/router/src/lib.rs"]
pub mod router;
#[path = "../crates/server/src/lib.rs"]
pub mod server;

pub mod transports {
    pub use crate::transport_reqwest as reqwest;
}

pub mod providers {
    pub use crate::provider_cometapi as cometapi;
    pub use crate::provider_kling as kling;
}

pub(crate) use crate::core as gateway_core;
pub(crate) use crate::provider as gateway_provider;
pub(crate) use crate::transport_reqwest as reqwest_transport;
pub(crate) use crate::types as gateway_types;
