use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key-management record as owned by the external key store.
///
/// Secret material is never part of the record; see `provider::Credentials`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyRecord {
    pub id: String,
    pub platform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_preview: Option<String>,
}

/// Short, non-reversible preview of a secret for display ("sk-a...wxyz").
pub fn key_preview(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::key_preview;

    #[test]
    fn preview_hides_the_middle_of_the_secret() {
        assert_eq!(key_preview("sk-abcdefghijkl"), "sk-a...ijkl");
        assert_eq!(key_preview("short"), "*****");
    }
}
