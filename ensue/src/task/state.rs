/// Task has not been completed yet.
///
/// Continuations registered in this state are queued in the registry.
pub(crate) const PENDING: usize = 0;

/// A completion operation won the race and is writing the outcome.
///
/// Readers still observe the task as pending until the terminal state is
/// published.
pub(crate) const COMPLETING: usize = 1;

/// Task completed with a result.
pub(crate) const SUCCEEDED: usize = 2;

/// Task completed with a fault.
pub(crate) const FAULTED: usize = 3;

/// Task was cancelled.
pub(crate) const CANCELLED: usize = 4;

/// Returns `true` for the three terminal states.
pub(crate) fn is_terminal(state: usize) -> bool {
    state >= SUCCEEDED
}

pub(crate) fn name(state: usize) -> &'static str {
    match state {
        PENDING => "pending",
        COMPLETING => "completing",
        SUCCEEDED => "succeeded",
        FAULTED => "faulted",
        CANCELLED => "cancelled",
        _ => "unknown",
    }
}
