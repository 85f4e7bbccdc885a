use hocu_abs::IString;

use super::sort::{SortId, SortTable};

/// Owns the sort algebra shared across however many unification problems the host poses. A
/// single `Environment` is meant to be built once and reused: interning the same base sort name
/// or asking for the same functional sort twice always yields the same [`SortId`].
#[derive(Clone, Default, Debug)]
pub(crate) struct Environment {
  sorts: SortTable,
}

impl Environment {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn base_sort(&mut self, name: impl Into<IString>) -> SortId {
    self.sorts.intern_base(name)
  }

  pub(crate) fn function_sort(&mut self, domain: SortId, range: SortId) -> SortId {
    self.sorts.make_functional(domain, range)
  }

  pub(crate) fn sorts(&self) -> &SortTable {
    &self.sorts
  }
}
