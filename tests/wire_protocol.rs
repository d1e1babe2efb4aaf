//! Wire-level conversation tests: typed messages through the envelope
//! codec, framed onto a byte stream, and reassembled on the far side.

use spacedock::messages::codec::{
    decode_request, decode_status, encode_request, encode_status, ControllerOperation,
    ControllerRequestMessage, ControllerStatusMessage, ControllerStatusType, MessageReader,
    CONTROLLER_SERVER_PORT, MESSAGE_DELIMITER,
};
use spacedock::messages::{
    ActivityDeployStatus, ContainerResourceDeploymentCommitRequest,
    ContainerResourceDeploymentCommitResponse, ContainerResourceDeploymentQueryRequest,
    ContainerResourceDeploymentQueryResponse, LiveActivityDeploymentRequest,
    LiveActivityDeploymentResult, ResourceCommitStatus, ResourceQueryStatus, TransactionId,
};
use spacedock::resource::{ResolvedResource, ResourceDependencyReference, Version, VersionRange};

fn tx() -> TransactionId {
    TransactionId::new("4f9c26b2-5a54-4a3f-8f6c-2c7b5a3c9d10")
}

#[test]
fn master_side_of_a_dependency_deployment_conversation() {
    // Master -> controller: query the dependencies.
    let mut query = ContainerResourceDeploymentQueryRequest::new(tx());
    query.add_query(ResourceDependencyReference::new(
        "lib-comm",
        VersionRange::parse("[1.0.0,2.0.0)").unwrap(),
    ));
    let frame = encode_request(
        &ControllerRequestMessage::with_payload(ControllerOperation::ResourceQuery, &query)
            .unwrap(),
    )
    .unwrap();

    // Controller side decodes the framed request.
    let mut reader = MessageReader::new();
    reader.push(&frame);
    let received = decode_request(&reader.next_frame().unwrap()).unwrap();
    assert_eq!(received.operation, ControllerOperation::ResourceQuery);
    let received_query: ContainerResourceDeploymentQueryRequest =
        received.decode_payload().unwrap().expect("payload present");
    assert_eq!(received_query, query);

    // Controller -> master: dependencies are already satisfied.
    let response = ContainerResourceDeploymentQueryResponse {
        transaction_id: tx(),
        status: ResourceQueryStatus::SpecificQuerySatisfied,
    };
    let status_frame = encode_status(
        &ControllerStatusMessage::with_payload(
            "sc-1",
            ControllerStatusType::ContainerResourceQuery,
            &response,
        )
        .unwrap(),
    )
    .unwrap();

    reader.push(&status_frame);
    let status = decode_status(&reader.next_frame().unwrap()).unwrap();
    assert_eq!(status.controller_uuid, "sc-1");
    assert_eq!(
        status.status_type,
        ControllerStatusType::ContainerResourceQuery
    );
    let decoded: ContainerResourceDeploymentQueryResponse =
        status.decode_payload().unwrap().expect("payload present");
    assert_eq!(decoded, response);
}

#[test]
fn commit_and_deploy_requests_round_trip() {
    let commit = ContainerResourceDeploymentCommitRequest::new(
        tx(),
        vec![ResolvedResource::new(
            "lib-comm",
            Version::new(1, 5, 0),
            "sig-1",
            "repo://container_bundle/lib-comm/1.5.0",
        )],
    );
    let deploy = LiveActivityDeploymentRequest {
        transaction_id: tx(),
        uuid: "la-1".into(),
        identifying_name: "com.example.greeter".into(),
        version: Version::new(1, 2, 3),
        activity_source_uri: "repo://activity/com.example.greeter/1.2.3".into(),
    };

    for (operation, frame) in [
        (
            ControllerOperation::ResourceCommit,
            encode_request(
                &ControllerRequestMessage::with_payload(
                    ControllerOperation::ResourceCommit,
                    &commit,
                )
                .unwrap(),
            )
            .unwrap(),
        ),
        (
            ControllerOperation::DeployLiveActivity,
            encode_request(
                &ControllerRequestMessage::with_payload(
                    ControllerOperation::DeployLiveActivity,
                    &deploy,
                )
                .unwrap(),
            )
            .unwrap(),
        ),
    ] {
        assert!(frame.ends_with(MESSAGE_DELIMITER));
        let decoded = decode_request(&frame[..frame.len() - MESSAGE_DELIMITER.len()]).unwrap();
        assert_eq!(decoded.operation, operation);
    }
}

#[test]
fn controller_statuses_stream_through_one_reader() {
    let heartbeat = ControllerStatusMessage::bare("sc-1", ControllerStatusType::Heartbeat);
    let commit_response = ControllerStatusMessage::with_payload(
        "sc-1",
        ControllerStatusType::ContainerResourceCommit,
        &ContainerResourceDeploymentCommitResponse {
            transaction_id: tx(),
            status: ResourceCommitStatus::Failure,
            detail: Some("bundle store is full".into()),
        },
    )
    .unwrap();
    let install_result = ControllerStatusMessage::with_payload(
        "sc-1",
        ControllerStatusType::ActivityInstall,
        &LiveActivityDeploymentResult::new(
            tx(),
            "la-1",
            ActivityDeployStatus::Success,
            None,
            1_234,
        ),
    )
    .unwrap();

    // All three frames arrive as one byte stream, chopped arbitrarily.
    let mut stream = Vec::new();
    for message in [&heartbeat, &commit_response, &install_result] {
        stream.extend_from_slice(&encode_status(message).unwrap());
    }

    let mut reader = MessageReader::new();
    let mut frames = Vec::new();
    for chunk in stream.chunks(7) {
        reader.push(chunk);
        while let Some(frame) = reader.next_frame() {
            frames.push(frame);
        }
    }
    assert_eq!(frames.len(), 3);
    assert_eq!(reader.pending(), 0);

    assert_eq!(decode_status(&frames[0]).unwrap(), heartbeat);

    let failure: ContainerResourceDeploymentCommitResponse = decode_status(&frames[1])
        .unwrap()
        .decode_payload()
        .unwrap()
        .expect("payload present");
    assert_eq!(failure.status, ResourceCommitStatus::Failure);
    assert_eq!(failure.detail.as_deref(), Some("bundle store is full"));

    let result: LiveActivityDeploymentResult = decode_status(&frames[2])
        .unwrap()
        .decode_payload()
        .unwrap()
        .expect("payload present");
    assert_eq!(result.status, ActivityDeployStatus::Success);
    assert_eq!(result.time_deployed, 1_234);
}

#[test]
fn malformed_frames_are_reported_not_defaulted() {
    assert!(decode_request(b"{\"operation\":").is_err());
    assert!(decode_status(b"[1,2,3]").is_err());
    assert!(decode_status(br#"{"statusType":"heartbeat"}"#).is_err(), "missing controllerUuid");
}

#[test]
fn default_controller_port_is_stable() {
    assert_eq!(CONTROLLER_SERVER_PORT, 8100);
}
