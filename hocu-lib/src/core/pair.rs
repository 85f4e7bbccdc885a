use super::term::Combinator;

/// Which half of a [`UnificationPair`] a one-sided step acts on.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub(crate) enum Side {
  Left,
  Right,
}

impl Side {
  pub(crate) fn other(self) -> Side {
    match self {
      Side::Left => Side::Right,
      Side::Right => Side::Left,
    }
  }
}

/// A variable-headed term can be narrowed into any of the five combinators directly (reusing
/// whatever arguments it already carries), or into one of the four "X" variants, which inject a
/// single fresh variable to make a combinator shape fit that the existing arguments alone
/// couldn't. `I` has no `X` counterpart: it only ever consumes one existing argument.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub(crate) enum Narrow {
  I,
  K,
  KX,
  B,
  BX,
  C,
  CX,
  S,
  SX,
}

/// A single candidate rewrite of a pending pair. Variants line up with the taxonomy: the five
/// weak-reduction rules, the nine narrowing shapes (five direct plus four fresh-variable
/// variants), and the three structural moves (decompose, eliminate, split) that don't touch
/// combinator redexes at all. `AddArg` and `Decomp` only ever act on both sides at once, so they
/// carry no [`Side`].
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub(crate) enum Step {
  AddArg,
  Reduce(Side, Combinator),
  Narrow(Side, Narrow),
  Decomp,
  Eliminate(Side),
  Split(Side),
}

impl Step {
  /// The narrowing kind this step performs, regardless of which side it acts on — the
  /// admissibility table (§4.5) only ever cares about *which combinator family* was narrowed
  /// last, not which side.
  pub(crate) fn narrow_kind(self) -> Option<Narrow> {
    match self {
      Step::Narrow(_, n) => Some(n),
      _ => None,
    }
  }
}

/// One outstanding disagreement between two terms. The search procedure repeatedly pops the top
/// pair, enumerates its admissible next steps, and either commits to one (pushing any pairs it
/// spawns) or backtracks when none remain.
#[derive(Clone, Debug)]
pub(crate) struct UnificationPair {
  pub(crate) left: super::term::TermId,
  pub(crate) right: super::term::TermId,
  /// The last two steps taken against this pair (most recent first), consulted by the
  /// admissibility table to rule out redundant or non-terminating step sequences.
  pub(crate) history: [Option<Step>; 2],
}

impl UnificationPair {
  pub(crate) fn new(left: super::term::TermId, right: super::term::TermId) -> Self {
    Self { left, right, history: [None, None] }
  }

  pub(crate) fn record(&mut self, step: Step) {
    self.history = [Some(step), self.history[0]];
  }

  pub(crate) fn last(&self) -> Option<Step> {
    self.history[0]
  }

  pub(crate) fn second_last(&self) -> Option<Step> {
    self.history[1]
  }

  pub(crate) fn last_narrow(&self) -> Option<Narrow> {
    self.last().and_then(Step::narrow_kind)
  }

  pub(crate) fn second_last_narrow(&self) -> Option<Narrow> {
    self.second_last().and_then(Step::narrow_kind)
  }
}
