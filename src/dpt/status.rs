use bitfield::bitfield;
use bytes::Bytes;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

use super::{single_byte, ControllerMode, ConversionError, DptCodec, DptError, OperationMode};
use super::PayloadError;

/// Combined HVAC status: operating mode plus four independent flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HvacStatus {
    pub mode: OperationMode,
    pub dew_point: bool,
    pub heat_cool: ControllerMode,
    pub inactive: bool,
    pub frost_alarm: bool,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("missing field: {0}")]
    Missing(&'static str),

    #[error("field {field} has unexpected type: {value}")]
    WrongType { field: &'static str, value: Value },

    #[error("field {field} has unrecognized value: {value:?}")]
    UnknownToken { field: &'static str, value: String },
}

fn field<'a>(data: &'a Map<String, Value>, name: &'static str) -> Result<&'a Value, FieldError> {
    data.get(name).ok_or(FieldError::Missing(name))
}

fn bool_field(data: &Map<String, Value>, name: &'static str) -> Result<bool, FieldError> {
    match field(data, name)? {
        Value::Bool(flag) => Ok(*flag),
        other => Err(FieldError::WrongType {
            field: name,
            value: other.clone(),
        }),
    }
}

impl HvacStatus {
    /// Builds a status from its field dict. `mode` parses like any operation
    /// mode string; `heat_cool` only accepts the exact tokens "heat"/"cool".
    pub fn from_dict(data: &Map<String, Value>) -> Result<Self, FieldError> {
        let mode = match field(data, "mode")? {
            Value::String(name) => {
                name.parse::<OperationMode>()
                    .map_err(|_| FieldError::UnknownToken {
                        field: "mode",
                        value: name.clone(),
                    })?
            }
            other => {
                return Err(FieldError::WrongType {
                    field: "mode",
                    value: other.clone(),
                })
            }
        };
        let dew_point = bool_field(data, "dew_point")?;
        let heat_cool = match field(data, "heat_cool")? {
            Value::String(name) => {
                name.parse::<ControllerMode>()
                    .map_err(|_| FieldError::UnknownToken {
                        field: "heat_cool",
                        value: name.clone(),
                    })?
            }
            other => {
                return Err(FieldError::WrongType {
                    field: "heat_cool",
                    value: other.clone(),
                })
            }
        };
        let inactive = bool_field(data, "inactive")?;
        let frost_alarm = bool_field(data, "frost_alarm")?;

        Ok(HvacStatus {
            mode,
            dew_point,
            heat_cool,
            inactive,
            frost_alarm,
        })
    }

    /// Inverse of [`from_dict`](Self::from_dict); mode and heat_cool come out
    /// as their lower-case tokens.
    pub fn as_dict(&self) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("mode".into(), self.mode.name().into());
        data.insert("dew_point".into(), self.dew_point.into());
        data.insert("heat_cool".into(), self.heat_cool.to_string().into());
        data.insert("inactive".into(), self.inactive.into());
        data.insert("frost_alarm".into(), self.frost_alarm.into());
        data
    }
}

impl Serialize for HvacStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_dict().serialize(serializer)
    }
}

bitfield! {
    /// Wire layout of the status byte. The mode occupies the high nibble as a
    /// one-hot field (all-zero means Auto); the flags sit in the low bits.
    /// FrostProtection's bit position is extrapolated from the one-hot pattern
    /// of the other modes and has not been confirmed against a real device.
    pub struct StatusByte(u8);
    impl Debug;
    pub comfort, set_comfort : 7;
    pub standby, set_standby : 6;
    pub night, set_night : 5;
    pub frost_protection, set_frost_protection : 4;
    pub dew_point, set_dew_point : 3;
    pub heat, set_heat : 2;
    pub inactive, set_inactive : 1;
    pub frost_alarm, set_frost_alarm : 0;
    pub u8, mode_bits, _ : 7, 4;
}

impl From<&HvacStatus> for StatusByte {
    fn from(status: &HvacStatus) -> Self {
        let mut byte = StatusByte(0);
        match status.mode {
            OperationMode::Auto => {}
            OperationMode::Comfort => byte.set_comfort(true),
            OperationMode::Standby => byte.set_standby(true),
            OperationMode::Night => byte.set_night(true),
            OperationMode::FrostProtection => byte.set_frost_protection(true),
        }
        byte.set_dew_point(status.dew_point);
        byte.set_heat(status.heat_cool == ControllerMode::Heat);
        byte.set_inactive(status.inactive);
        byte.set_frost_alarm(status.frost_alarm);
        byte
    }
}

impl TryFrom<StatusByte> for HvacStatus {
    type Error = PayloadError;

    fn try_from(byte: StatusByte) -> Result<Self, PayloadError> {
        if byte.mode_bits().count_ones() > 1 {
            return Err(PayloadError::AmbiguousModeBits(byte.0));
        }

        let mode = if byte.comfort() {
            OperationMode::Comfort
        } else if byte.standby() {
            OperationMode::Standby
        } else if byte.night() {
            OperationMode::Night
        } else if byte.frost_protection() {
            OperationMode::FrostProtection
        } else {
            OperationMode::Auto
        };

        Ok(HvacStatus {
            mode,
            dew_point: byte.dew_point(),
            heat_cool: if byte.heat() {
                ControllerMode::Heat
            } else {
                ControllerMode::Cool
            },
            inactive: byte.inactive(),
            frost_alarm: byte.frost_alarm(),
        })
    }
}

/// Inputs accepted by [`DptHvacStatus::to_knx`]: a record, or a loosely typed
/// value that must be an object acceptable to [`HvacStatus::from_dict`].
#[derive(Debug, Clone, PartialEq)]
pub enum StatusValue {
    Status(HvacStatus),
    Json(Value),
}

impl From<HvacStatus> for StatusValue {
    fn from(status: HvacStatus) -> Self {
        StatusValue::Status(status)
    }
}

impl From<&HvacStatus> for StatusValue {
    fn from(status: &HvacStatus) -> Self {
        StatusValue::Status(*status)
    }
}

impl From<Map<String, Value>> for StatusValue {
    fn from(data: Map<String, Value>) -> Self {
        StatusValue::Json(Value::Object(data))
    }
}

impl From<Value> for StatusValue {
    fn from(value: Value) -> Self {
        StatusValue::Json(value)
    }
}

/// Bit-packed codec for [`HvacStatus`]. Its byte layout is incompatible with
/// [`DptHvacMode`](super::DptHvacMode) even though both carry the same mode
/// domain.
pub struct DptHvacStatus;

impl DptHvacStatus {
    pub fn to_knx(&self, value: impl Into<StatusValue>) -> Result<Bytes, ConversionError> {
        let status = match value.into() {
            StatusValue::Status(status) => status,
            StatusValue::Json(Value::Object(data)) => HvacStatus::from_dict(&data)?,
            StatusValue::Json(other) => return Err(ConversionError::UnsupportedValue(other)),
        };
        Ok(Bytes::copy_from_slice(&[StatusByte::from(&status).0]))
    }

    pub fn from_knx(&self, payload: &[u8]) -> Result<HvacStatus, PayloadError> {
        let raw = single_byte(payload)?;
        HvacStatus::try_from(StatusByte(raw))
    }
}

impl DptCodec for DptHvacStatus {
    fn encode_value(&self, value: &Value) -> Result<Bytes, DptError> {
        Ok(self.to_knx(value.clone())?)
    }

    fn decode_value(&self, payload: &[u8]) -> Result<Value, DptError> {
        Ok(Value::Object(self.from_knx(payload)?.as_dict()))
    }
}
