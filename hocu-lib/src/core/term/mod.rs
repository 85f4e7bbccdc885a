/*!

Two representations of applicative terms live side by side here: [`Term`], the binary curried
spine the host builds and reads back, and [`TermArena`]/[`TermId`], the head-plus-argument-deque
representation the search procedure actually rewrites. [`appify`] and [`deappify`] convert between
them.

*/

mod app_term;
mod head;
mod node;

pub use app_term::{AtomHead, CombinatorKind, Term, Variable};
pub(crate) use app_term::{appify, deappify};
pub(crate) use head::{Combinator, Head, NamespaceIndex, VarSpec, FRESH_NAMESPACE};
pub(crate) use node::{HoNode, TermArena, TermId};
