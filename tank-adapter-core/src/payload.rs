use crate::{DbalError, ParamType, QueryOutcome, SqlPerformance, Value, truncate_long};
use serde::{Serialize, Serializer, ser::SerializeMap};
use std::fmt::{self, Display};

/// The statement an operation runs: text, positional parameters and their type hints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statement<'a> {
    pub sentence: &'a str,
    pub params: &'a [Value],
    pub types: &'a [ParamType],
}

impl<'a> Statement<'a> {
    pub fn new(sentence: &'a str, params: &'a [Value], types: &'a [ParamType]) -> Self {
        Self {
            sentence,
            params,
            types,
        }
    }
}

impl Display for Statement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sentence))
    }
}

/// What a listener receives for each notification.
///
/// Payloads borrow from the call that emits them and live only as long as the dispatch.
#[derive(Debug, Clone, Copy)]
pub enum EventPayload<'a> {
    /// Before the statement reaches the connection.
    Before(Statement<'a>),
    /// After a successful execution.
    After {
        statement: Statement<'a>,
        result: QueryOutcome<'a>,
        performance: SqlPerformance,
    },
    /// The execution failed.
    Error {
        statement: Statement<'a>,
        error: &'a DbalError,
    },
}

impl<'a> EventPayload<'a> {
    pub fn before(statement: Statement<'a>) -> Self {
        EventPayload::Before(statement)
    }

    pub fn after(
        statement: Statement<'a>,
        result: impl Into<QueryOutcome<'a>>,
        performance: SqlPerformance,
    ) -> Self {
        EventPayload::After {
            statement,
            result: result.into(),
            performance,
        }
    }

    pub fn error(statement: Statement<'a>, error: &'a DbalError) -> Self {
        EventPayload::Error { statement, error }
    }

    pub fn statement(&self) -> &Statement<'a> {
        match self {
            EventPayload::Before(statement)
            | EventPayload::After { statement, .. }
            | EventPayload::Error { statement, .. } => statement,
        }
    }

    pub fn sentence(&self) -> &'a str {
        self.statement().sentence
    }

    pub fn params(&self) -> &'a [Value] {
        self.statement().params
    }

    pub fn types(&self) -> &'a [ParamType] {
        self.statement().types
    }

    pub fn result(&self) -> Option<&QueryOutcome<'a>> {
        match self {
            EventPayload::After { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn performance(&self) -> Option<&SqlPerformance> {
        match self {
            EventPayload::After { performance, .. } => Some(performance),
            _ => None,
        }
    }

    pub fn error_value(&self) -> Option<&'a DbalError> {
        match *self {
            EventPayload::Error { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Keys: `sentence`, `params`, `types`, plus `performance` (after) or `error` (error).
impl Serialize for EventPayload<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = match self {
            EventPayload::Before(..) => 3,
            _ => 4,
        };
        let statement = self.statement();
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("sentence", statement.sentence)?;
        map.serialize_entry("params", statement.params)?;
        map.serialize_entry("types", statement.types)?;
        match self {
            EventPayload::Before(..) => {}
            EventPayload::After { performance, .. } => {
                map.serialize_entry("performance", performance)?
            }
            EventPayload::Error { error, .. } => map.serialize_entry("error", error)?,
        }
        map.end()
    }
}
