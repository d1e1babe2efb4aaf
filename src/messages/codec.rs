//! The master/controller wire envelope.
//!
//! Every message on the stream transport is one JSON object followed by the
//! two-byte delimiter `\n\n`. Controller-bound traffic is an operation
//! envelope; master-bound traffic is a status envelope. Payloads ride as
//! embedded JSON objects and decode into typed messages on demand.
//!
//! Output is UTF-8 with every non-ASCII character escaped.

use std::io::{self, Write};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use serde_json::Value;
use thiserror::Error;

/// Frame delimiter on the stream transport.
pub const MESSAGE_DELIMITER: &[u8] = b"\n\n";

/// Default controller listen port.
pub const CONTROLLER_SERVER_PORT: u16 = 8100;

/// Wire codec errors. Parse errors are reported to the caller of the
/// decoding operation; nothing is silently defaulted.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    #[error("could not encode message: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("could not parse message: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("message payload does not match the expected shape: {0}")]
    Payload(#[source] serde_json::Error),
}

/// Operations a master may request of a controller. Closed vocabulary;
/// unknown operation strings fail decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControllerOperation {
    Status,
    ShutdownController,
    ShutdownActivities,
    DeployLiveActivity,
    DeleteLiveActivity,
    CleanDataTmp,
    CleanDataPermanent,
    CaptureData,
    RestoreData,
    ResourceQuery,
    ResourceCommit,
    Configure,
    LiveActivityRuntimeRequest,
}

/// Status kinds a controller may push to the master. Closed vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControllerStatusType {
    ControllerFullStatus,
    Heartbeat,
    LiveActivityRuntimeStatus,
    ActivityInstall,
    ActivityDelete,
    DataCapture,
    DataRestore,
    ContainerResourceQuery,
    ContainerResourceCommit,
    Shutdown,
}

/// Controller-bound request envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControllerRequestMessage {
    pub operation: ControllerOperation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl ControllerRequestMessage {
    /// An envelope with no payload.
    pub fn bare(operation: ControllerOperation) -> Self {
        Self {
            operation,
            payload: None,
        }
    }

    /// An envelope carrying `payload` as an embedded JSON object.
    pub fn with_payload<T: Serialize>(
        operation: ControllerOperation,
        payload: &T,
    ) -> Result<Self, CodecError> {
        Ok(Self {
            operation,
            payload: Some(serde_json::to_value(payload).map_err(CodecError::Encode)?),
        })
    }

    /// Decode the payload into a typed message.
    ///
    /// An absent payload is `Ok(None)`; a payload of the wrong shape is a
    /// reported error, never a garbage object.
    pub fn decode_payload<T: DeserializeOwned>(&self) -> Result<Option<T>, CodecError> {
        decode_payload(self.payload.as_ref())
    }
}

/// Master-bound status envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerStatusMessage {
    pub controller_uuid: String,
    pub status_type: ControllerStatusType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl ControllerStatusMessage {
    pub fn bare(controller_uuid: impl Into<String>, status_type: ControllerStatusType) -> Self {
        Self {
            controller_uuid: controller_uuid.into(),
            status_type,
            payload: None,
        }
    }

    pub fn with_payload<T: Serialize>(
        controller_uuid: impl Into<String>,
        status_type: ControllerStatusType,
        payload: &T,
    ) -> Result<Self, CodecError> {
        Ok(Self {
            controller_uuid: controller_uuid.into(),
            status_type,
            payload: Some(serde_json::to_value(payload).map_err(CodecError::Encode)?),
        })
    }

    pub fn decode_payload<T: DeserializeOwned>(&self) -> Result<Option<T>, CodecError> {
        decode_payload(self.payload.as_ref())
    }
}

fn decode_payload<T: DeserializeOwned>(payload: Option<&Value>) -> Result<Option<T>, CodecError> {
    match payload {
        Some(value) => T::deserialize(value)
            .map(Some)
            .map_err(CodecError::Payload),
        None => Ok(None),
    }
}

/// Encode a request envelope as a delimited frame.
pub fn encode_request(message: &ControllerRequestMessage) -> Result<Vec<u8>, CodecError> {
    encode_frame(message)
}

/// Encode a status envelope as a delimited frame.
pub fn encode_status(message: &ControllerStatusMessage) -> Result<Vec<u8>, CodecError> {
    encode_frame(message)
}

/// Decode one frame (without its delimiter) as a request envelope.
pub fn decode_request(frame: &[u8]) -> Result<ControllerRequestMessage, CodecError> {
    serde_json::from_slice(frame).map_err(CodecError::Parse)
}

/// Decode one frame (without its delimiter) as a status envelope.
pub fn decode_status(frame: &[u8]) -> Result<ControllerStatusMessage, CodecError> {
    serde_json::from_slice(frame).map_err(CodecError::Parse)
}

fn encode_frame<T: Serialize>(message: &T) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(256);
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, AsciiEscapeFormatter);
    message
        .serialize(&mut serializer)
        .map_err(CodecError::Encode)?;
    out.extend_from_slice(MESSAGE_DELIMITER);
    Ok(out)
}

/// Compact JSON formatter that escapes every non-ASCII character as
/// `\uXXXX` (surrogate pairs for the astral planes).
struct AsciiEscapeFormatter;

impl Formatter for AsciiEscapeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units).iter() {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }

}

/// Reassembles delimited frames from a byte stream.
///
/// Feed it whatever the transport delivers; it buffers until a full frame
/// (terminated by [`MESSAGE_DELIMITER`]) is available. Partial frames stay
/// buffered across reads, and one read may surface several frames.
#[derive(Default)]
pub struct MessageReader {
    buffer: Vec<u8>,
}

impl MessageReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes received from the transport.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Take the next complete frame, without its delimiter, if one is
    /// buffered.
    pub fn next_frame(&mut self) -> Option<Vec<u8>> {
        let at = self
            .buffer
            .windows(MESSAGE_DELIMITER.len())
            .position(|window| window == MESSAGE_DELIMITER)?;
        let frame = self.buffer[..at].to_vec();
        self.buffer.drain(..at + MESSAGE_DELIMITER.len());
        Some(frame)
    }

    /// Bytes currently buffered without a completing delimiter.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}
