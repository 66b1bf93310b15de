use serde::{Deserialize, Serialize};

/// Connection settings for one search cluster.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Takes precedence over basic auth when both are set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept_invalid_certs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_field: Option<String>,
}

impl ProfileConfig {
    /// Fills every unset field from `other`.
    pub(crate) fn merge(&self, other: Option<&ProfileConfig>) -> ProfileConfig {
        let Some(other) = other else {
            return self.clone();
        };

        ProfileConfig {
            cluster_url: self.cluster_url.clone().or_else(|| other.cluster_url.clone()),
            username: self.username.clone().or_else(|| other.username.clone()),
            password: self.password.clone().or_else(|| other.password.clone()),
            api_key: self.api_key.clone().or_else(|| other.api_key.clone()),
            accept_invalid_certs: self.accept_invalid_certs.or(other.accept_invalid_certs),
            time_field: self.time_field.clone().or_else(|| other.time_field.clone()),
        }
    }
}
