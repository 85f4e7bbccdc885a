/*!

The public facade. A host builds an [`Environment`] to get [`SortId`]s, builds two [`Term`]s out
of them, hands both to [`UnificationProblem::new`], then calls [`UnificationProblem::advance`] in
a loop to enumerate unifiers.

*/

mod environment;
mod error;
mod problem;
mod unifier;

pub use environment::Environment;
pub use error::ProblemError;
pub use problem::UnificationProblem;
pub use unifier::Unifier;

pub use crate::core::engine::{Advance, Budget};
pub use crate::core::sort::SortId;
pub use crate::core::term::{AtomHead, CombinatorKind, Term, Variable};
