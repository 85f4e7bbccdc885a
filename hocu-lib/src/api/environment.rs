use crate::core::environment::Environment as CoreEnvironment;
use crate::core::sort::SortTable;
use crate::core::sort::SortId;

/// Owns the sort algebra for however many unification problems the host poses. Build one,
/// intern the base sorts and combinator-sort shapes your terms need, then pass it to
/// [`crate::api::UnificationProblem::new`] for each problem; interning the same name or the same
/// `(domain, range)` pair twice always returns the same [`SortId`].
#[derive(Clone, Default, Debug)]
pub struct Environment {
  inner: CoreEnvironment,
}

impl Environment {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn base_sort(&mut self, name: &str) -> SortId {
    self.inner.base_sort(name)
  }

  pub fn function_sort(&mut self, domain: SortId, range: SortId) -> SortId {
    self.inner.function_sort(domain, range)
  }

  pub(crate) fn sorts(&self) -> &SortTable {
    self.inner.sorts()
  }
}
