use std::collections::HashMap;

use hocu_abs::IString;

use super::SortId;

#[derive(Clone, Debug)]
enum SortDef {
  Base { name: IString },
  Functional { domain: SortId, range: SortId },
}

/// Owns every sort ever named or built during a run. Functional sorts are hash-consed on
/// `(domain, range)`, mirroring the way the engine hash-conses functional sorts for its
/// combinator constants: two requests for `a -> (a -> a)` always get back the same id, so sort
/// equality is an integer compare everywhere else in the crate.
#[derive(Clone, Default, Debug)]
pub(crate) struct SortTable {
  defs: Vec<SortDef>,
  base_by_name: HashMap<IString, SortId>,
  functional_by_pair: HashMap<(SortId, SortId), SortId>,
}

impl SortTable {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn intern_base(&mut self, name: impl Into<IString>) -> SortId {
    let name = name.into();
    if let Some(&id) = self.base_by_name.get(&name) {
      return id;
    }
    let id = SortId(self.defs.len() as u32);
    self.defs.push(SortDef::Base { name: name.clone() });
    self.base_by_name.insert(name, id);
    id
  }

  pub(crate) fn make_functional(&mut self, domain: SortId, range: SortId) -> SortId {
    if let Some(&id) = self.functional_by_pair.get(&(domain, range)) {
      return id;
    }
    let id = SortId(self.defs.len() as u32);
    self.defs.push(SortDef::Functional { domain, range });
    self.functional_by_pair.insert((domain, range), id);
    id
  }

  pub(crate) fn is_functional(&self, sort: SortId) -> bool {
    matches!(self.defs[sort.index()], SortDef::Functional { .. })
  }

  pub(crate) fn domain(&self, sort: SortId) -> Option<SortId> {
    match self.defs[sort.index()] {
      SortDef::Functional { domain, .. } => Some(domain),
      SortDef::Base { .. } => None,
    }
  }

  pub(crate) fn range(&self, sort: SortId) -> Option<SortId> {
    match self.defs[sort.index()] {
      SortDef::Functional { range, .. } => Some(range),
      SortDef::Base { .. } => None,
    }
  }

  /// Number of arguments `sort` can be applied to before the result is no longer functional.
  pub(crate) fn arity(&self, sort: SortId) -> u32 {
    let mut count = 0;
    let mut current = sort;
    while let SortDef::Functional { range, .. } = self.defs[current.index()] {
      count += 1;
      current = range;
    }
    count
  }

  /// The sort that results from applying `sort` to `n` arguments. If `n` exceeds `arity(sort)`,
  /// returns the final (fully-applied) range rather than erroring — narrowing admissibility
  /// checks rely on being able to ask for e.g. a 2-prefix of an arity-1 sort and get back
  /// something comparable, per the sort algebra's `appliedToN`.
  pub(crate) fn applied_to_n(&self, sort: SortId, n: u32) -> SortId {
    let mut current = sort;
    for _ in 0..n {
      match self.range(current) {
        Some(next) => current = next,
        None => break,
      }
    }
    current
  }

  /// The sort expected of the `n`th argument (0-indexed) of something with sort `sort`.
  pub(crate) fn nth_arg_sort(&self, sort: SortId, n: u32) -> SortId {
    let prefix = self.applied_to_n(sort, n);
    self.domain(prefix).expect("nth_arg_sort: prefix sort is not functional")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn base_sorts_intern_by_name() {
    let mut table = SortTable::new();
    let a = table.intern_base("a");
    let b = table.intern_base("a");
    let c = table.intern_base("b");
    assert_eq!(a, b);
    assert_ne!(a, c);
  }

  #[test]
  fn functional_sorts_hash_cons() {
    let mut table = SortTable::new();
    let a = table.intern_base("a");
    let b = table.intern_base("b");
    let f1 = table.make_functional(a, b);
    let f2 = table.make_functional(a, b);
    assert_eq!(f1, f2);
    assert!(table.is_functional(f1));
    assert!(!table.is_functional(a));
  }

  #[test]
  fn arity_and_applied_to_n_match_curried_shape() {
    // b -> (a -> (a -> b))  has arity 3
    let mut table = SortTable::new();
    let a = table.intern_base("a");
    let b = table.intern_base("b");
    let inner = table.make_functional(a, b);
    let mid = table.make_functional(a, inner);
    let outer = table.make_functional(b, mid);
    assert_eq!(table.arity(outer), 3);
    assert_eq!(table.applied_to_n(outer, 1), mid);
    assert_eq!(table.applied_to_n(outer, 2), inner);
    assert_eq!(table.applied_to_n(outer, 3), b);
    assert_eq!(table.nth_arg_sort(outer, 0), b);
    assert_eq!(table.nth_arg_sort(outer, 1), a);
    assert_eq!(table.nth_arg_sort(outer, 2), a);
  }
}
