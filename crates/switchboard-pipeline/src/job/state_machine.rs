//! Job state transition rules.

use crate::error::JobError;
use crate::types::JobState;

/// Check that a transition is legal.
///
/// Pending may start processing or go straight to any terminal state
/// (a job whose text yields nothing completes without processing, and a
/// cancel can land before processing starts). Processing may only end.
/// Terminal states accept nothing.
pub fn validate_transition(from: JobState, to: JobState) -> Result<(), JobError> {
    use JobState::*;

    let legal = match from {
        Pending => matches!(to, Processing | Completed | Failed | Cancelled),
        Processing => matches!(to, Completed | Failed | Cancelled),
        Completed | Failed | Cancelled => false,
    };

    if legal {
        Ok(())
    } else {
        Err(JobError::InvalidTransition { from, to })
    }
}
