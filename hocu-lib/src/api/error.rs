use thiserror::Error;

use crate::core::term::NamespaceIndex;

/// Fatal problems caught while constructing a [`crate::api::UnificationProblem`]. Nothing that
/// goes wrong once the search itself is running shows up here: a branch that can't be solved is
/// not an error, it's just a branch the engine backtracks out of.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum ProblemError {
  #[error("left term has sort {left:?} but right term has sort {right:?}")]
  SortMismatch { left: crate::core::sort::SortId, right: crate::core::sort::SortId },

  #[error("variable {id} uses namespace {namespace}, which is reserved for variables the engine generates internally")]
  ReservedNamespace { id: u32, namespace: NamespaceIndex },
}
