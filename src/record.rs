use chrono::NaiveDateTime;
use std::fmt;
use thiserror::Error;

/// Number of payload bytes holding the scalar value.
const VALUE_WIDTH: usize = 8;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("payload too short to hold a value: {0} bytes")]
    PayloadTooShort(usize),
}

/// A single time-stamped record for one key.
///
/// The payload is an opaque byte sequence whose first 8 bytes are defined to
/// be the scalar value as a little-endian IEEE-754 double. The value is
/// extracted once at construction; records are immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    key: String,
    timestamp: NaiveDateTime,
    payload: Vec<u8>,
    value: f64,
}

impl Record {
    pub fn new(
        key: impl Into<String>,
        timestamp: NaiveDateTime,
        payload: Vec<u8>,
    ) -> Result<Self, RecordError> {
        if payload.len() < VALUE_WIDTH {
            return Err(RecordError::PayloadTooShort(payload.len()));
        }

        let mut head = [0u8; VALUE_WIDTH];
        head.copy_from_slice(&payload[..VALUE_WIDTH]);
        let value = f64::from_le_bytes(head);

        Ok(Self {
            key: key.into(),
            timestamp,
            payload,
            value,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// The scalar value extracted from the payload head.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.key, self.timestamp, self.value)
    }
}
