//! Non-success task outcomes.
//!
//! A task that does not succeed either faults or is cancelled. Cancellation
//! carries no payload and is modelled as a task state; everything else is a
//! [`Fault`]:
//!
//! - [`StructuredError`]: data describing an expected failure,
//! - [`UncaughtException`]: a defect (panic) captured from a continuation or
//!   a producer work function,
//! - an aggregate of several faults collected by a join.

use std::any::Any;
use std::collections::BTreeMap;
use std::slice;

use thiserror::Error;

/// Error domain used for faults raised by this crate itself.
pub const TASK_ERROR_DOMAIN: &str = "ensue.task";

/// The fault carried by a faulted task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    /// An expected failure described by a domain, a code, and extra info.
    #[error(transparent)]
    Error(#[from] StructuredError),

    /// A defect captured while running user code.
    #[error(transparent)]
    Exception(#[from] UncaughtException),

    /// Two or more faults collected by a join, in input order.
    #[error("{} faults occurred: {}", .0.len(), describe_all(.0))]
    Aggregate(Vec<Fault>),
}

/// Structured description of an expected failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{domain} error {code}")]
pub struct StructuredError {
    /// Namespace the code belongs to.
    pub domain: String,

    /// Domain-specific error code.
    pub code: i64,

    /// Free-form key/value details.
    pub info: BTreeMap<String, String>,
}

/// A captured defect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("uncaught exception: {reason}")]
pub struct UncaughtException {
    /// Short reason, usually the panic message.
    pub reason: String,

    /// Optional extra detail.
    pub detail: Option<String>,
}

impl StructuredError {
    /// Creates a structured error with no extra info.
    pub fn new(domain: impl Into<String>, code: i64) -> Self {
        Self {
            domain: domain.into(),
            code,
            info: BTreeMap::new(),
        }
    }

    /// Attaches a key/value pair to the error info.
    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.info.insert(key.into(), value.into());
        self
    }
}

impl Fault {
    /// Shorthand for a [`Fault::Error`] with no extra info.
    pub fn error(domain: impl Into<String>, code: i64) -> Self {
        Fault::Error(StructuredError::new(domain, code))
    }

    /// Shorthand for a [`Fault::Exception`] with no detail.
    pub fn exception(reason: impl Into<String>) -> Self {
        Fault::Exception(UncaughtException {
            reason: reason.into(),
            detail: None,
        })
    }

    pub fn exception_with_detail(reason: impl Into<String>, detail: impl Into<String>) -> Self {
        Fault::Exception(UncaughtException {
            reason: reason.into(),
            detail: Some(detail.into()),
        })
    }

    /// Builds the fault reported by a join.
    ///
    /// A single fault is returned as is; only two or more are wrapped.
    ///
    /// # Panics
    ///
    /// Panics if `faults` is empty.
    pub fn aggregate(mut faults: Vec<Fault>) -> Self {
        assert!(!faults.is_empty(), "cannot aggregate zero faults");

        if faults.len() == 1 {
            return faults.remove(0);
        }
        Fault::Aggregate(faults)
    }

    /// Converts a panic payload into an [`UncaughtException`].
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let reason = if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_owned()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "opaque panic payload".to_owned()
        };

        let detail = std::thread::current()
            .name()
            .map(|name| format!("panicked on thread '{name}'"));

        Fault::Exception(UncaughtException { reason, detail })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Fault::Error(_))
    }

    pub fn is_exception(&self) -> bool {
        matches!(self, Fault::Exception(_))
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, Fault::Aggregate(_))
    }

    /// Returns the member faults of an aggregate, or this fault alone.
    pub fn inner_faults(&self) -> &[Fault] {
        match self {
            Fault::Aggregate(faults) => faults,
            other => slice::from_ref(other),
        }
    }
}

fn describe_all(faults: &[Fault]) -> String {
    faults
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
