pub mod dpt;

pub use dpt::{
    create_dpt, ControllerMode, ConversionError, DptCodec, DptError, DptHvacMode, DptHvacStatus,
    DptType, FieldError, HvacStatus, ModeValue, OperationMode, PayloadError, StatusByte,
    StatusValue,
};
