use bytes::Bytes;
use serde_json::Value;

use super::{single_byte, ConversionError, DptCodec, DptError};

/// HVAC operating mode. The discriminant is the wire index used by
/// [`DptHvacMode`] only; [`DptHvacStatus`](super::DptHvacStatus) carries the
/// same domain as a one-hot nibble instead.
///
/// Strings parse case-insensitively against either the symbolic name
/// ("frost_protection") or the display value ("Frost Protection").
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum OperationMode {
    #[strum(serialize = "auto", to_string = "Auto")]
    Auto = 0,
    #[strum(serialize = "comfort", to_string = "Comfort")]
    Comfort = 1,
    #[strum(serialize = "standby", to_string = "Standby")]
    Standby = 2,
    #[strum(serialize = "night", to_string = "Night")]
    Night = 3,
    #[strum(serialize = "frost_protection", to_string = "Frost Protection")]
    FrostProtection = 4,
}

impl OperationMode {
    pub fn wire_index(self) -> u8 {
        self as u8
    }

    /// Lower-case symbolic name, the token used in field dicts.
    pub fn name(self) -> &'static str {
        match self {
            OperationMode::Auto => "auto",
            OperationMode::Comfort => "comfort",
            OperationMode::Standby => "standby",
            OperationMode::Night => "night",
            OperationMode::FrostProtection => "frost_protection",
        }
    }
}

impl TryFrom<u8> for OperationMode {
    type Error = ConversionError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Ok(match raw {
            0 => OperationMode::Auto,
            1 => OperationMode::Comfort,
            2 => OperationMode::Standby,
            3 => OperationMode::Night,
            4 => OperationMode::FrostProtection,
            _ => return Err(ConversionError::ModeIndexOutOfRange(raw)),
        })
    }
}

/// Whether the controller is heating or cooling. Only appears inside
/// [`HvacStatus`](super::HvacStatus); it has no direct-index encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ControllerMode {
    Heat,
    Cool,
}

/// Inputs accepted by [`DptHvacMode::to_knx`]. Loosely typed values arrive as
/// `Json` and are discriminated there; everything that is not a known mode
/// string is rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ModeValue {
    Mode(OperationMode),
    Json(Value),
}

impl From<OperationMode> for ModeValue {
    fn from(mode: OperationMode) -> Self {
        ModeValue::Mode(mode)
    }
}

impl From<&str> for ModeValue {
    fn from(name: &str) -> Self {
        ModeValue::Json(Value::String(name.to_owned()))
    }
}

impl From<String> for ModeValue {
    fn from(name: String) -> Self {
        ModeValue::Json(Value::String(name))
    }
}

impl From<Value> for ModeValue {
    fn from(value: Value) -> Self {
        ModeValue::Json(value)
    }
}

/// Direct-index codec for [`OperationMode`].
pub struct DptHvacMode;

impl DptHvacMode {
    pub fn to_knx(&self, value: impl Into<ModeValue>) -> Result<Bytes, ConversionError> {
        let mode = match value.into() {
            ModeValue::Mode(mode) => mode,
            ModeValue::Json(Value::String(name)) => name
                .parse::<OperationMode>()
                .map_err(|_| ConversionError::UnknownMode(name))?,
            ModeValue::Json(other) => return Err(ConversionError::UnsupportedValue(other)),
        };
        Ok(Bytes::copy_from_slice(&[mode.wire_index()]))
    }

    pub fn from_knx(&self, payload: &[u8]) -> Result<OperationMode, DptError> {
        let raw = single_byte(payload)?;
        Ok(OperationMode::try_from(raw)?)
    }
}

impl DptCodec for DptHvacMode {
    fn encode_value(&self, value: &Value) -> Result<Bytes, DptError> {
        Ok(self.to_knx(value.clone())?)
    }

    fn decode_value(&self, payload: &[u8]) -> Result<Value, DptError> {
        Ok(Value::String(self.from_knx(payload)?.name().to_owned()))
    }
}
