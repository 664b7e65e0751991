use crate::{ParamType, Result, RowSet, Value};

/// Database connection wrapped by the adapter.
///
/// Implemented by drivers. Every method blocks until the database answers; failures come back as
/// `anyhow` errors, optionally carrying a [`DriverError`](crate::DriverError) with the vendor code.
pub trait Connection {
    /// Execute a read statement and return every row.
    fn execute_query(
        &mut self,
        sentence: &str,
        params: &[Value],
        types: &[ParamType],
    ) -> Result<RowSet>;

    /// Execute a write statement and return the number of rows changed.
    fn execute_update(
        &mut self,
        sentence: &str,
        params: &[Value],
        types: &[ParamType],
    ) -> Result<u64>;

    /// Identifier generated by the most recent insert.
    fn last_insert_id(&mut self) -> Result<String>;
}

/// Connections that can be opened from a URL.
pub trait Connect: Connection + Sized {
    /// Scheme accepted by [`Connect::connect`], for example `mysql`.
    const NAME: &'static str;

    fn connect(url: &str) -> Result<Self>;
}

impl<C: Connection + ?Sized> Connection for &mut C {
    fn execute_query(
        &mut self,
        sentence: &str,
        params: &[Value],
        types: &[ParamType],
    ) -> Result<RowSet> {
        (**self).execute_query(sentence, params, types)
    }

    fn execute_update(
        &mut self,
        sentence: &str,
        params: &[Value],
        types: &[ParamType],
    ) -> Result<u64> {
        (**self).execute_update(sentence, params, types)
    }

    fn last_insert_id(&mut self) -> Result<String> {
        (**self).last_insert_id()
    }
}

impl<C: Connection + ?Sized> Connection for Box<C> {
    fn execute_query(
        &mut self,
        sentence: &str,
        params: &[Value],
        types: &[ParamType],
    ) -> Result<RowSet> {
        (**self).execute_query(sentence, params, types)
    }

    fn execute_update(
        &mut self,
        sentence: &str,
        params: &[Value],
        types: &[ParamType],
    ) -> Result<u64> {
        (**self).execute_update(sentence, params, types)
    }

    fn last_insert_id(&mut self) -> Result<String> {
        (**self).last_insert_id()
    }
}
