use log::Level;

/// Destination of the adapter's own log lines (performance records and failures).
pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

impl<F> Logger for F
where
    F: Fn(Level, &str) + Send + Sync,
{
    fn log(&self, level: Level, message: &str) {
        self(level, message)
    }
}

/// Forwards to the `log` facade under the `tank_adapter` target.
#[derive(Default, Debug, Clone, Copy)]
pub struct FacadeLogger;

impl FacadeLogger {
    pub const TARGET: &'static str = "tank_adapter";
}

impl Logger for FacadeLogger {
    fn log(&self, level: Level, message: &str) {
        log::log!(target: Self::TARGET, level, "{}", message);
    }
}
