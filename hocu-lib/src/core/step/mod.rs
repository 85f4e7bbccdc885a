/*!

Candidate generation ([`enumerate`]) and step application ([`apply`]) for a single pending pair.
Kept apart from [`crate::core::engine`] so the backtracking loop itself stays readable: the engine
only ever needs to ask "what can I try here" and "what happens if I commit to this".

*/

mod apply;
mod enumerate;

pub(crate) use apply::{apply, ApplyOutcome, MutationLog};
pub(crate) use enumerate::enumerate;
