//! Small propagators relating the time variables of the model.
mod duration;
mod equivalence;
mod precedence;

pub(crate) use duration::DurationArgs;
pub(crate) use equivalence::EquivalenceArgs;
pub(crate) use precedence::PrecedenceArgs;
