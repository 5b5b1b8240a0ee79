/*

KNX datapoint types for HVAC
----------------------------

Each datapoint type (DPT) converts between an application value and the
fixed-width payload carried in a bus telegram:

OperationMode <> DptHvacMode  <> [u8; 1]   (direct index, DPT 20.102 style)
HvacStatus    <> DptHvacStatus <> [u8; 1]  (one-hot mode nibble + flag bits)

The two byte layouts are incompatible and must never be interchanged.

Telegram framing, addressing and the device layer live elsewhere; a DPT is a
pure value transformation.

*/

use bytes::Bytes;
use serde_json::Value;
use thiserror::Error;

pub mod mode;
pub use mode::{ControllerMode, DptHvacMode, ModeValue, OperationMode};

pub mod status;
pub use status::{DptHvacStatus, FieldError, HvacStatus, StatusByte, StatusValue};

/// A payload that is malformed at the wire level. Distinct from
/// [`ConversionError`]: a correctly shaped payload carrying an
/// out-of-domain value is not a payload error.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadError {
    #[error("expected a payload of {expected} byte(s), got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("status mode bits are not one-hot: {0:#010b}")]
    AmbiguousModeBits(u8),
}

/// A value that cannot be represented by the datapoint type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("mode index out of range: {0:#04x}")]
    ModeIndexOutOfRange(u8),

    #[error("unknown operation mode: {0:?}")]
    UnknownMode(String),

    #[error("value {0} cannot be encoded by this datapoint type")]
    UnsupportedValue(Value),

    #[error("invalid status fields: {0}")]
    InvalidFields(#[from] FieldError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DptError {
    #[error("could not parse payload: {0}")]
    Payload(#[from] PayloadError),

    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DptType {
    HvacMode,
    HvacStatus,
}

/// Object-safe surface for callers that pick a datapoint type at runtime and
/// shuttle loosely typed values in and out (mode decodes to its lower-case
/// name, status to its field dict).
pub trait DptCodec {
    fn encode_value(&self, value: &Value) -> Result<Bytes, DptError>;
    fn decode_value(&self, payload: &[u8]) -> Result<Value, DptError>;
}

pub fn create_dpt(ty: DptType) -> Box<dyn DptCodec> {
    match ty {
        DptType::HvacMode => Box::new(DptHvacMode),
        DptType::HvacStatus => Box::new(DptHvacStatus),
    }
}

/// Both HVAC datapoint types are one byte wide on the wire.
pub(crate) fn single_byte(payload: &[u8]) -> Result<u8, PayloadError> {
    match payload {
        [byte] => Ok(*byte),
        _ => Err(PayloadError::WrongLength {
            expected: 1,
            actual: payload.len(),
        }),
    }
}
