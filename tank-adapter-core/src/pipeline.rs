use std::fmt;

type Producer<'a, T, E> = Box<dyn FnOnce() -> Result<T, E> + 'a>;

enum Stage<'a, T, E> {
    Tap(Box<dyn FnOnce(&T) -> Result<(), E> + 'a>),
    Then(Box<dyn FnOnce(T) -> Result<T, E> + 'a>),
    Catch(Box<dyn FnOnce(E) -> Result<T, E> + 'a>),
    TapCatch(Box<dyn FnOnce(&E) + 'a>),
}

impl<T, E> Stage<'_, T, E> {
    fn name(&self) -> &'static str {
        match self {
            Stage::Tap(..) => "tap",
            Stage::Then(..) => "then",
            Stage::Catch(..) => "catch",
            Stage::TapCatch(..) => "tap_catch",
        }
    }
}

/// A chain of stages over a single fallible value, executed by [`Pipeline::invoke`].
///
/// Building the chain runs nothing: each method consumes the pipeline and returns it with one more
/// stage. On invocation the stages run in registration order:
/// - `tap` and `then` run only while the chain holds a value;
/// - `catch` and `tap_catch` run only while the chain holds an error;
/// - an error raised by any stage is what every following `catch` / `tap_catch` observes;
/// - a `catch` that returns `Ok` puts the chain back on the value path.
///
/// ```
/// use tank_adapter_core::Pipeline;
/// let result = Pipeline::of(|| Ok::<_, String>(20))
///     .then(|v| Ok(v + 1))
///     .tap(|v| if *v > 0 { Ok(()) } else { Err("negative".into()) })
///     .then(|v| Ok(v * 2))
///     .invoke();
/// assert_eq!(result, Ok(42));
/// ```
pub struct Pipeline<'a, T, E> {
    producer: Producer<'a, T, E>,
    stages: Vec<Stage<'a, T, E>>,
}

impl<'a, T: 'a, E: 'a> Pipeline<'a, T, E> {
    /// Start a chain whose initial value comes from `producer`.
    pub fn of(producer: impl FnOnce() -> Result<T, E> + 'a) -> Self {
        Self {
            producer: Box::new(producer),
            stages: Vec::new(),
        }
    }

    /// Observe the value. An error returned by `observer` fails the chain, the value is unchanged
    /// otherwise.
    pub fn tap(self, observer: impl FnOnce(&T) -> Result<(), E> + 'a) -> Self {
        self.stage(Stage::Tap(Box::new(observer)))
    }

    /// Replace the value with the result of `transform`.
    pub fn then(self, transform: impl FnOnce(T) -> Result<T, E> + 'a) -> Self {
        self.stage(Stage::Then(Box::new(transform)))
    }

    /// Handle the error: `Ok` recovers the chain, `Err` keeps it failed with the returned error.
    pub fn catch(self, handler: impl FnOnce(E) -> Result<T, E> + 'a) -> Self {
        self.stage(Stage::Catch(Box::new(handler)))
    }

    /// Observe the error, the chain stays failed with the same error.
    pub fn tap_catch(self, observer: impl FnOnce(&E) + 'a) -> Self {
        self.stage(Stage::TapCatch(Box::new(observer)))
    }

    /// Number of stages registered after the producer.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run the producer and every stage, returning the final value or the unrecovered error.
    pub fn invoke(self) -> Result<T, E> {
        let mut state = (self.producer)();
        for stage in self.stages {
            state = match (stage, state) {
                (Stage::Tap(observer), Ok(value)) => observer(&value).map(|_| value),
                (Stage::Then(transform), Ok(value)) => transform(value),
                (Stage::Catch(handler), Err(error)) => handler(error),
                (Stage::TapCatch(observer), Err(error)) => {
                    observer(&error);
                    Err(error)
                }
                (_, state) => state,
            };
        }
        state
    }

    fn stage(mut self, stage: Stage<'a, T, E>) -> Self {
        self.stages.push(stage);
        self
    }
}

impl<T, E> fmt::Debug for Pipeline<'_, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field(
                "stages",
                &self.stages.iter().map(Stage::name).collect::<Vec<_>>(),
            )
            .finish()
    }
}
