use std::{collections::HashMap, sync::Arc};
use tank_adapter_core::{
    Connect, Connection, DriverError, Error, ParamType, Params, Result, RowLabeled, RowNames,
    RowSet, Value,
};

/// A statement received by a [`MemoryConnection`].
#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    pub sentence: String,
    pub params: Params,
    pub types: Vec<ParamType>,
}

/// Scripted connection: answers are registered per statement text before use.
///
/// Statements without a registered answer fail with the MySQL "table doesn't exist" code. Each
/// successful statement starting with `INSERT` advances the generated identifier.
#[derive(Default, Debug)]
pub struct MemoryConnection {
    rows: HashMap<String, RowSet>,
    updates: HashMap<String, u64>,
    failures: HashMap<String, DriverError>,
    executed: Vec<Executed>,
    last_insert_id: u64,
}

pub const NO_SUCH_TABLE: i64 = 1146;

impl MemoryConnection {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_rows(mut self, sentence: &str, rows: RowSet) -> Self {
        self.rows.insert(sentence.into(), rows);
        self
    }

    pub fn with_update(mut self, sentence: &str, affected: u64) -> Self {
        self.updates.insert(sentence.into(), affected);
        self
    }

    pub fn with_failure(mut self, sentence: &str, error: DriverError) -> Self {
        self.failures.insert(sentence.into(), error);
        self
    }

    /// Every statement received, failed ones included, in order.
    pub fn executed(&self) -> &[Executed] {
        &self.executed
    }

    fn receive(&mut self, sentence: &str, params: &[Value], types: &[ParamType]) -> Result<()> {
        self.executed.push(Executed {
            sentence: sentence.into(),
            params: params.to_vec(),
            types: types.to_vec(),
        });
        if let Some(error) = self.failures.get(sentence) {
            return Err(Error::new(error.clone()).context("While executing on memory"));
        }
        Ok(())
    }

    fn missing(sentence: &str) -> Error {
        Error::new(DriverError::new(
            NO_SUCH_TABLE,
            format!("No answer registered for `{}`", sentence),
        ))
    }
}

impl Connection for MemoryConnection {
    fn execute_query(
        &mut self,
        sentence: &str,
        params: &[Value],
        types: &[ParamType],
    ) -> Result<RowSet> {
        self.receive(sentence, params, types)?;
        self.rows
            .get(sentence)
            .cloned()
            .ok_or_else(|| Self::missing(sentence))
    }

    fn execute_update(
        &mut self,
        sentence: &str,
        params: &[Value],
        types: &[ParamType],
    ) -> Result<u64> {
        self.receive(sentence, params, types)?;
        let affected = *self
            .updates
            .get(sentence)
            .ok_or_else(|| Self::missing(sentence))?;
        if sentence
            .get(..6)
            .is_some_and(|v| v.eq_ignore_ascii_case("insert"))
        {
            self.last_insert_id += affected;
        }
        Ok(affected)
    }

    fn last_insert_id(&mut self) -> Result<String> {
        Ok(self.last_insert_id.to_string())
    }
}

impl Connect for MemoryConnection {
    const NAME: &'static str = "memory";

    fn connect(url: &str) -> Result<Self> {
        log::debug!("Opening memory connection `{}`", url);
        Ok(MemoryConnection::new())
    }
}

/// Rows sharing the same `labels`.
pub fn rows<const N: usize>(labels: [&str; N], values: Vec<[Value; N]>) -> RowSet {
    let labels: RowNames = labels.into_iter().map(String::from).collect::<Vec<_>>().into();
    values
        .into_iter()
        .map(|v| RowLabeled::new(Arc::clone(&labels), Box::new(v)))
        .collect()
}
