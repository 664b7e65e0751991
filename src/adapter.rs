use std::{error::Error as StdError, sync::Arc, time::Instant};
use tank_adapter_core::{
    Connect, Connection, Context, DbalError, EventPayload, Events, Level, Logger,
    NotificationSink, ParamType, PerformanceRecord, Pipeline, QueryOutcome, Result, RowSet,
    SqlPerformance, Statement, Value, format_sql, truncate_long, types_aligned,
};
use url::Url;
use urlencoding::decode;

/// Instrumented facade over a [`Connection`].
///
/// Every `query` / `non_query` call emits a `before-*` notification, runs the statement while
/// timing it, then either emits `after-*` and logs a performance record, or emits `on-error`,
/// logs the failure and returns it. Logger and notification sink are optional: when absent the
/// corresponding side effects are skipped.
pub struct Adapter<C: Connection> {
    connection: C,
    logger: Option<Arc<dyn Logger>>,
    event_manager: Option<Arc<dyn NotificationSink>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Query,
    NonQuery,
}

impl Operation {
    fn before(self) -> Events {
        match self {
            Operation::Query => Events::BeforeQuery,
            Operation::NonQuery => Events::BeforeNonQuery,
        }
    }
    fn after(self) -> Events {
        match self {
            Operation::Query => Events::AfterQuery,
            Operation::NonQuery => Events::AfterNonQuery,
        }
    }
    fn location(self) -> &'static str {
        match self {
            Operation::Query => "tank_adapter::Adapter::query",
            Operation::NonQuery => "tank_adapter::Adapter::non_query",
        }
    }
}

/// Values an operation can hand to the `after-*` notification.
trait Outcome {
    fn outcome(&self) -> QueryOutcome<'_>;
}

impl Outcome for RowSet {
    fn outcome(&self) -> QueryOutcome<'_> {
        self.into()
    }
}

impl Outcome for u64 {
    fn outcome(&self) -> QueryOutcome<'_> {
        (*self).into()
    }
}

/// Borrowed view of the optional collaborators, checked once per call.
#[derive(Clone, Copy)]
struct Reporter<'r> {
    logger: Option<&'r dyn Logger>,
    sink: Option<&'r dyn NotificationSink>,
}

impl Reporter<'_> {
    fn notify(&self, event: Events, payload: &EventPayload<'_>) {
        if let Some(sink) = self.sink {
            sink.dispatch(event, payload);
        }
    }

    fn log(&self, level: Level, message: &str) {
        if let Some(logger) = self.logger {
            logger.log(level, message);
        }
    }

    fn log_error(&self, location: &str, error: &dyn StdError) {
        if self.logger.is_some() {
            self.log(
                Level::Error,
                &format!("Error in the {}(...) -> {}", location, error),
            );
        }
    }

    fn log_performance(&self, statement: &Statement<'_>, performance: &SqlPerformance) {
        if self.logger.is_none() {
            return;
        }
        let sql = format_sql(statement.sentence, statement.params);
        let record = PerformanceRecord::new(format!("{}", truncate_long!(sql)), performance);
        match record.to_json() {
            Ok(message) => self.log(Level::Info, &message),
            Err(e) => log::error!("Could not serialize the performance record: {:#}", e),
        }
    }
}

impl<C: Connection> Adapter<C> {
    /// Wrap `connection`, with no logger and no notification sink.
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            logger: None,
            event_manager: None,
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_event_manager(mut self, event_manager: Arc<dyn NotificationSink>) -> Self {
        self.event_manager = Some(event_manager);
        self
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    pub fn into_connection(self) -> C {
        self.connection
    }

    pub fn logger(&self) -> Option<&Arc<dyn Logger>> {
        self.logger.as_ref()
    }

    pub fn set_logger(&mut self, logger: Arc<dyn Logger>) -> &mut Self {
        self.logger = Some(logger);
        self
    }

    pub fn event_manager(&self) -> Option<&Arc<dyn NotificationSink>> {
        self.event_manager.as_ref()
    }

    pub fn set_event_manager(&mut self, event_manager: Arc<dyn NotificationSink>) -> &mut Self {
        self.event_manager = Some(event_manager);
        self
    }

    /// Execute a read statement and return every row produced by the connection.
    pub fn query(
        &mut self,
        sentence: &str,
        params: &[Value],
        types: &[ParamType],
    ) -> std::result::Result<RowSet, DbalError> {
        self.run(Operation::Query, sentence, params, types, |c, s, p, t| {
            c.execute_query(s, p, t)
        })
    }

    /// Execute a write statement and return the number of rows it changed.
    pub fn non_query(
        &mut self,
        sentence: &str,
        params: &[Value],
        types: &[ParamType],
    ) -> std::result::Result<u64, DbalError> {
        self.run(Operation::NonQuery, sentence, params, types, |c, s, p, t| {
            c.execute_update(s, p, t)
        })
    }

    /// Identifier generated by the most recent insert on the connection.
    pub fn last_insert_id(&mut self) -> std::result::Result<String, DbalError> {
        self.connection
            .last_insert_id()
            .map_err(DbalError::from_driver)
    }

    /// Write `message` to the logger, if any.
    pub fn log(&self, level: Level, message: &str) {
        self.reporter().log(level, message);
    }

    pub fn log_info(&self, message: &str) {
        self.reporter().log(Level::Info, message);
    }

    /// Log `error` at error level, `location` names the failing call.
    pub fn log_error(&self, location: &str, error: &dyn StdError) {
        self.reporter().log_error(location, error);
    }

    /// Send `payload` to the notification sink, if any.
    pub fn notify(&self, event: Events, payload: &EventPayload<'_>) -> &Self {
        self.reporter().notify(event, payload);
        self
    }

    fn reporter(&self) -> Reporter<'_> {
        Reporter {
            logger: self.logger.as_deref(),
            sink: self.event_manager.as_deref(),
        }
    }

    fn run<R: Outcome>(
        &mut self,
        operation: Operation,
        sentence: &str,
        params: &[Value],
        types: &[ParamType],
        execute: impl FnOnce(&mut C, &str, &[Value], &[ParamType]) -> Result<R>,
    ) -> std::result::Result<R, DbalError> {
        let sentence = sentence.trim();
        let statement = Statement::new(sentence, params, types);
        if !types_aligned(params, types) {
            log::warn!(
                "{} type hints for {} parameters in: {}",
                types.len(),
                params.len(),
                statement
            );
        }
        log::debug!("{}: {}", operation.location(), statement);
        let reporter = Reporter {
            logger: self.logger.as_deref(),
            sink: self.event_manager.as_deref(),
        };
        let connection = &mut self.connection;
        reporter.notify(operation.before(), &EventPayload::before(statement));
        Pipeline::of(move || -> std::result::Result<_, DbalError> {
            let start = Instant::now();
            let result =
                execute(connection, sentence, params, types).map_err(DbalError::from_driver)?;
            Ok((result, SqlPerformance::new(start.elapsed())))
        })
        .tap(move |(result, performance)| {
            let payload = EventPayload::after(statement, result.outcome(), *performance);
            reporter.notify(operation.after(), &payload);
            Ok(())
        })
        .tap(move |(_, performance)| {
            reporter.log_performance(&statement, performance);
            Ok(())
        })
        .tap_catch(move |error| {
            log::debug!("{:#} while running: {}", error, statement);
            reporter.notify(Events::OnError, &EventPayload::error(statement, error));
        })
        .tap_catch(move |error| reporter.log_error(operation.location(), error))
        .invoke()
        .map(|(result, _)| result)
    }
}

impl<C: Connect> Adapter<C> {
    /// Open a connection from `url` and wrap it.
    ///
    /// The url scheme must match the connection's [`Connect::NAME`].
    pub fn connect(url: &str) -> std::result::Result<Self, DbalError> {
        open::<C>(url).map(Adapter::new).map_err(|e| {
            log::error!("{:#}", e);
            DbalError::from_driver(e)
        })
    }
}

fn open<C: Connect>(url: &str) -> Result<C> {
    let decoded = decode(url);
    let target = redact_password(decoded.as_deref().unwrap_or(url));
    let context = || format!("While trying to connect to `{}`", truncate_long!(target));
    let decoded = decoded.with_context(context)?;
    let prefix = format!("{}://", C::NAME);
    if !decoded.starts_with(&prefix) {
        return Err(tank_adapter_core::Error::msg(format!(
            "Connection url must start with `{}`",
            prefix
        ))
        .context(context()));
    }
    Url::parse(&decoded).with_context(context)?;
    log::debug!("Connecting to `{}`", target);
    C::connect(url).with_context(context)
}

/// `url` with the password of its user info, if any, replaced by `***`.
fn redact_password(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_owned();
    };
    let authority = &rest[..rest.find(['/', '?', '#']).unwrap_or(rest.len())];
    let Some(at) = authority.rfind('@') else {
        return url.to_owned();
    };
    let Some(colon) = authority[..at].find(':') else {
        return url.to_owned();
    };
    format!("{}://{}:***{}", scheme, &rest[..colon], &rest[at..])
}

impl<C: Connection + std::fmt::Debug> std::fmt::Debug for Adapter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adapter")
            .field("connection", &self.connection)
            .field("logger", &self.logger.is_some())
            .field("event_manager", &self.event_manager.is_some())
            .finish()
    }
}
