use super::{Executor, Job};
use crate::context::{enter_inline, inline_depth};

use tracing::debug;

/// Default bound on nested inline continuations per thread.
pub const MAX_INLINE_DEPTH: usize = 20;

/// Runs jobs inline on the calling thread while the thread's nesting depth
/// stays below a bound, and on the background pool beyond it.
///
/// Most continuation chains are short, and running them on the thread that
/// completed the antecedent avoids a hand-off. A long synchronous chain
/// (each continuation completing the next task inline) would otherwise
/// grow the stack without limit.
#[derive(Debug, Clone, Copy)]
pub struct DefaultExecutor {
    max_depth: usize,
}

impl DefaultExecutor {
    pub fn new() -> Self {
        Self::with_max_depth(MAX_INLINE_DEPTH)
    }

    /// A `max_depth` of zero dispatches every job to the background pool.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for DefaultExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for DefaultExecutor {
    fn execute(&self, job: Job) {
        let depth = inline_depth();

        if depth < self.max_depth {
            let _guard = enter_inline();
            job();
        } else {
            debug!(depth, "inline depth exceeded, dispatching to background pool");
            super::background().execute(job);
        }
    }
}
