//! Error definitions.

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
///Timer errors.
///
///Scheduling itself never fails: delay coercion is total and cancellation of anything is no-op.
///Errors are only possible where value enters from dynamically typed source.
pub enum Error {
    ///Argument cannot be used as requested, e.g. callback is not a function.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}
