use serde::{Deserialize, Serialize};

/// Media URLs harvested from a provider result, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaUrls {
    pub images: Vec<String>,
    pub videos: Vec<String>,
}

