//! Shared response models

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Overall health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Result of one dependency health check
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResult {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// Health endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub checks: HashMap<String, HealthCheckResult>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: HealthStatus::Healthy,
            checks: HashMap::new(),
        }
    }

    pub fn with_checks(mut self, checks: HashMap<String, HealthCheckResult>) -> Self {
        if checks.values().any(|c| c.status == HealthStatus::Unhealthy) {
            self.status = HealthStatus::Unhealthy;
        }
        self.checks = checks;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unhealthy_check_degrades_overall_status() {
        let mut checks = HashMap::new();
        checks.insert(
            "database".to_string(),
            HealthCheckResult {
                status: HealthStatus::Unhealthy,
                message: None,
                duration_ms: None,
            },
        );
        let response = HealthResponse::healthy().with_checks(checks);
        assert_eq!(response.status, HealthStatus::Unhealthy);
    }
}
