use std::fmt;

use hocu_abs::IString;

use super::head::{Combinator, Head, VarSpec};
use super::node::{TermArena, TermId};
use crate::core::sort::{SortId, SortTable};

/// A variable as the host names it: an id plus a namespace distinguishing which side of a
/// problem (or which a-renamed copy) it came from. Two variables are the same variable iff both
/// fields match.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct Variable {
  pub id: u32,
  /// Distinguishes variables coming from the two sides of a problem (or from a-renamed copies)
  /// so identically-numbered variables from each side never collide. Pick any two distinct
  /// values for the two input terms; just never use `u32::MAX`, which the engine reserves for
  /// variables it invents internally during narrowing.
  pub namespace: u32,
}

/// The applicative terms the host builds and reads back: a binary, left-associative spine of
/// `@` applications bottoming out in a variable, a combinator, or a constant. This is the public
/// face of the engine's internal head-plus-argument-deque representation
/// ([`crate::core::term::TermArena`]); [`crate::core::term::appify`] and
/// [`crate::core::term::deappify`] are mutual inverses between the two.
#[derive(Clone, PartialEq, Debug)]
pub enum Term {
  Atom(AtomHead, SortId),
  Apply(Box<Term>, Box<Term>),
}

/// The three kinds of leaf a [`Term`] can carry.
#[derive(Clone, PartialEq, Debug)]
pub enum AtomHead {
  Var(Variable),
  Comb(CombinatorKind),
  Const(IString),
}

/// Public mirror of the five combinators, re-exported so hosts never need to depend on
/// `core::term::head` internals.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum CombinatorKind {
  I,
  K,
  B,
  C,
  S,
}

impl fmt::Display for CombinatorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let letter = match self {
      CombinatorKind::I => "I",
      CombinatorKind::K => "K",
      CombinatorKind::B => "B",
      CombinatorKind::C => "C",
      CombinatorKind::S => "S",
    };
    f.write_str(letter)
  }
}

impl From<CombinatorKind> for Combinator {
  fn from(value: CombinatorKind) -> Self {
    match value {
      CombinatorKind::I => Combinator::I,
      CombinatorKind::K => Combinator::K,
      CombinatorKind::B => Combinator::B,
      CombinatorKind::C => Combinator::C,
      CombinatorKind::S => Combinator::S,
    }
  }
}

impl From<Combinator> for CombinatorKind {
  fn from(value: Combinator) -> Self {
    match value {
      Combinator::I => CombinatorKind::I,
      Combinator::K => CombinatorKind::K,
      Combinator::B => CombinatorKind::B,
      Combinator::C => CombinatorKind::C,
      Combinator::S => CombinatorKind::S,
    }
  }
}

impl Term {
  pub fn var(var: Variable, sort: SortId) -> Self {
    Term::Atom(AtomHead::Var(var), sort)
  }

  pub fn comb(kind: CombinatorKind, sort: SortId) -> Self {
    Term::Atom(AtomHead::Comb(kind), sort)
  }

  pub fn constant(name: &str, sort: SortId) -> Self {
    Term::Atom(AtomHead::Const(IString::from(name)), sort)
  }

  pub fn apply(self, arg: Term) -> Self {
    Term::Apply(Box::new(self), Box::new(arg))
  }

  /// The sort of the term as a whole (the range left over after every argument on the spine has
  /// been applied).
  pub fn sort(&self, sorts: &SortTable) -> SortId {
    match self {
      Term::Atom(_, sort) => *sort,
      Term::Apply(f, _) => {
        let f_sort = f.sort(sorts);
        sorts.range(f_sort).expect("Term::sort: applying a non-functional sort")
      }
    }
  }
}

fn head_to_internal(head: &AtomHead) -> Head {
  match head {
    AtomHead::Var(v) => Head::Var(VarSpec { id: v.id, namespace: v.namespace }),
    AtomHead::Comb(c) => Head::Comb((*c).into()),
    AtomHead::Const(name) => Head::Const(name.clone()),
  }
}

fn head_to_public(head: &Head) -> AtomHead {
  match head {
    Head::Var(v) => AtomHead::Var(Variable { id: v.id, namespace: v.namespace }),
    Head::Comb(c) => AtomHead::Comb((*c).into()),
    Head::Const(name) => AtomHead::Const(name.clone()),
  }
}

/// Flattens a binary `Apply` spine into a head-plus-argument-deque node, folding left to right:
/// `((f @ a) @ b) @ c` becomes a node with head `f` and args `[a, b, c]`. The arena is mutated in
/// place as arguments are appended, mirroring the way the engine mutates a node's argument deque
/// during search.
pub(crate) fn deappify(term: &Term, arena: &mut TermArena) -> TermId {
  match term {
    Term::Atom(head, sort) => arena.mk_leaf(head_to_internal(head), *sort),
    Term::Apply(f, a) => {
      let f_id = deappify(f, arena);
      let a_id = deappify(a, arena);
      arena.add_arg(f_id, a_id)
    }
  }
}

/// The inverse of [`deappify`]: rebuilds a binary `Apply` spine from a node's head and argument
/// deque, left-associating in argument order.
pub(crate) fn appify(id: TermId, arena: &TermArena) -> Term {
  let node = arena.node(id);
  let mut result = Term::Atom(head_to_public(&node.head), node.head_sort);
  for &arg_id in node.args.iter() {
    let arg_term = appify(arg_id, arena);
    result = Term::Apply(Box::new(result), Box::new(arg_term));
  }
  result
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn appify_deappify_round_trip() {
    let mut sorts = SortTable::new();
    let base = sorts.intern_base("i");
    let func = sorts.make_functional(base, base);

    let x = Variable { id: 0, namespace: 1 };
    let y = Variable { id: 1, namespace: 1 };
    let term = Term::var(x, func).apply(Term::var(y, base));

    let mut arena = TermArena::new();
    let id = deappify(&term, &mut arena);
    assert_eq!(arena.arg_count(id), 1);

    let rebuilt = appify(id, &arena);
    assert_eq!(rebuilt, term);
  }
}
