use std::collections::HashMap;

use super::term::{TermId, VarSpec};

/// The bindings the search has committed to so far, keyed by variable. Bindings are added and
/// removed as the backtracking engine descends into and retreats out of branches; nothing here
/// ever mutates a binding in place; a variable is either bound once or removed wholesale by the
/// undo log.
#[derive(Clone, Default, Debug)]
pub(crate) struct Substitution {
  bindings: HashMap<VarSpec, TermId>,
}

impl Substitution {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn get(&self, var: VarSpec) -> Option<TermId> {
    self.bindings.get(&var).copied()
  }

  pub(crate) fn is_bound(&self, var: VarSpec) -> bool {
    self.bindings.contains_key(&var)
  }

  /// Binds `var` to `value`. Panics if `var` is already bound: the engine always removes a
  /// stale binding via the undo log before a later step could rebind the same variable, so a
  /// double-bind here means an undo frame was dropped somewhere upstream.
  pub(crate) fn bind(&mut self, var: VarSpec, value: TermId) {
    let previous = self.bindings.insert(var, value);
    debug_assert!(previous.is_none(), "variable bound twice without an intervening unbind");
  }

  pub(crate) fn unbind(&mut self, var: VarSpec) {
    self.bindings.remove(&var);
  }

  pub(crate) fn len(&self) -> usize {
    self.bindings.len()
  }

  pub(crate) fn iter(&self) -> impl Iterator<Item = (VarSpec, TermId)> + '_ {
    self.bindings.iter().map(|(&k, &v)| (k, v))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bind_get_unbind_round_trips() {
    let mut subst = Substitution::new();
    let v = VarSpec { id: 0, namespace: 0 };
    assert!(subst.get(v).is_none());
    subst.bind(v, TermId::for_test(7));
    assert!(subst.is_bound(v));
    subst.unbind(v);
    assert!(!subst.is_bound(v));
  }
}
