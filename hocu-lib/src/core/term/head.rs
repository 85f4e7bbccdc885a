use hocu_abs::IString;

/// A namespace distinguishes variables coming from the two sides of a unification problem (or
/// from a-renamed copies thereof) so that identically-numbered variables never collide by
/// accident. [`FRESH_NAMESPACE`] is reserved for variables the engine itself introduces during
/// narrowing; hosts must not use it for their own input terms.
pub(crate) type NamespaceIndex = u32;

pub(crate) const FRESH_NAMESPACE: NamespaceIndex = u32::MAX;

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub(crate) struct VarSpec {
  pub(crate) id: u32,
  pub(crate) namespace: NamespaceIndex,
}

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub(crate) enum Combinator {
  I,
  K,
  B,
  C,
  S,
}

impl Combinator {
  /// Number of arguments this combinator needs before it becomes a weak redex. Combinator sorts
  /// are always shaped so that `arity(sort) == required_args()`; this is kept separately only as
  /// a sanity check and for the rare place that needs it before a sort is available.
  pub(crate) fn required_args(self) -> u32 {
    match self {
      Combinator::I => 1,
      Combinator::K => 2,
      Combinator::B | Combinator::C | Combinator::S => 3,
    }
  }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) enum Head {
  Var(VarSpec),
  Comb(Combinator),
  Const(IString),
}

impl Head {
  pub(crate) fn is_var(&self) -> bool {
    matches!(self, Head::Var(_))
  }

  pub(crate) fn as_comb(&self) -> Option<Combinator> {
    match self {
      Head::Comb(c) => Some(*c),
      _ => None,
    }
  }
}
