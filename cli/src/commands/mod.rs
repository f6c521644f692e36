//! Subcommand implementations.

pub mod monitors;
pub mod pick;
pub mod run;

/// Whether an error is the operator stopping the command.
pub fn is_interrupted(err: &anyhow::Error) -> bool {
    err.downcast_ref::<clickloop_core::Error>()
        .is_some_and(clickloop_core::Error::is_interrupted)
}
