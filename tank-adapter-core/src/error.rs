use serde::{Serialize, ser::SerializeStruct};
use std::error::Error as StdError;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;

/// Vendor failure a driver may place in the error chain to expose its native code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DriverError {
    pub code: i64,
    pub message: String,
}

impl DriverError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Database operation failure.
///
/// Every execution error raised through the adapter is normalized into this kind: the message of
/// the failure, the vendor code when one was found and the originating error as `source`.
#[derive(thiserror::Error, Debug)]
#[error("{message}")]
pub struct DbalError {
    message: String,
    code: Option<i64>,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl DbalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            source: None,
        }
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    /// Normalize any driver error, keeping the whole chain reachable through `source()`.
    ///
    /// The message joins the chain (`context: cause`), the code is the first one found in it.
    pub fn from_driver(error: Error) -> Self {
        let error = match error.downcast::<DbalError>() {
            Ok(already) => return already,
            Err(error) => error,
        };
        let code = error.chain().find_map(|e| {
            if let Some(e) = e.downcast_ref::<DriverError>() {
                Some(e.code)
            } else {
                e.downcast_ref::<DbalError>().and_then(DbalError::code)
            }
        });
        Self {
            message: format!("{:#}", error),
            code,
            source: Some(error.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> Option<i64> {
        self.code
    }
}

impl From<DriverError> for DbalError {
    fn from(value: DriverError) -> Self {
        Self {
            message: value.message.clone(),
            code: Some(value.code),
            source: Some(Box::new(value)),
        }
    }
}

impl Serialize for DbalError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("DbalError", 2)?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("code", &self.code)?;
        state.end()
    }
}
