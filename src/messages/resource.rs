//! Container-resource deployment negotiation messages.

use serde::{Deserialize, Serialize};

use super::TransactionId;
use crate::resource::{ResolvedResource, ResourceDependencyReference};

/// Master-to-controller query: are these dependencies already present?
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerResourceDeploymentQueryRequest {
    pub transaction_id: TransactionId,
    pub queries: Vec<ResourceDependencyReference>,
}

impl ContainerResourceDeploymentQueryRequest {
    pub fn new(transaction_id: TransactionId) -> Self {
        Self {
            transaction_id,
            queries: Vec::new(),
        }
    }

    pub fn add_query(&mut self, query: ResourceDependencyReference) {
        self.queries.push(query);
    }
}

/// Controller's answer to a resource deployment query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerResourceDeploymentQueryResponse {
    pub transaction_id: TransactionId,
    pub status: ResourceQueryStatus,
}

/// Closed status vocabulary for query responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceQueryStatus {
    /// Every queried dependency is satisfied on the controller.
    SpecificQuerySatisfied,
    /// At least one queried dependency is missing.
    SpecificQueryNotSatisfied,
    /// Response to a general inventory query, not a specific one.
    GeneralQueryResponse,
}

/// Master-to-controller commit: install these resolved resources.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerResourceDeploymentCommitRequest {
    pub transaction_id: TransactionId,
    pub items: Vec<ResolvedResource>,
}

impl ContainerResourceDeploymentCommitRequest {
    pub fn new(transaction_id: TransactionId, items: Vec<ResolvedResource>) -> Self {
        Self {
            transaction_id,
            items,
        }
    }
}

/// Controller's answer to a resource commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerResourceDeploymentCommitResponse {
    pub transaction_id: TransactionId,
    pub status: ResourceCommitStatus,
    /// Remote-supplied detail, present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Closed status vocabulary for commit responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceCommitStatus {
    Success,
    Failure,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Version, VersionRange};

    #[test]
    fn query_request_round_trips() {
        let mut request = ContainerResourceDeploymentQueryRequest::new(TransactionId::new("tx-9"));
        request.add_query(ResourceDependencyReference::new(
            "lib-comm",
            VersionRange::parse("[1.0.0,2.0.0)").unwrap(),
        ));

        let encoded = serde_json::to_string(&request).unwrap();
        let decoded: ContainerResourceDeploymentQueryRequest =
            serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn commit_items_carry_resolved_resources() {
        let request = ContainerResourceDeploymentCommitRequest::new(
            TransactionId::new("tx-9"),
            vec![ResolvedResource::new(
                "lib-comm",
                Version::new(1, 5, 0),
                "sha-abc",
                "repo://bundles/lib-comm/1.5.0",
            )],
        );

        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded["items"][0]["sourceUri"], "repo://bundles/lib-comm/1.5.0");
        assert_eq!(encoded["items"][0]["version"]["version"], "1.5.0");
    }

    #[test]
    fn unknown_query_status_is_rejected() {
        let err = serde_json::from_str::<ContainerResourceDeploymentQueryResponse>(
            r#"{"transactionId":"tx","status":"PARTIAL"}"#,
        );
        assert!(err.is_err());
    }
}
