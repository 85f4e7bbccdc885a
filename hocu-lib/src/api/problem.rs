use tracing::info_span;

use super::environment::Environment;
use super::error::ProblemError;
use super::unifier::Unifier;
use crate::core::engine::{Advance, Budget, UnificationEngine};
use crate::core::term::{deappify, AtomHead, Term, TermArena, FRESH_NAMESPACE};

fn check_namespaces(term: &Term) -> Result<(), ProblemError> {
  match term {
    Term::Atom(AtomHead::Var(var), _) if var.namespace == FRESH_NAMESPACE => {
      Err(ProblemError::ReservedNamespace { id: var.id, namespace: var.namespace })
    }
    Term::Atom(_, _) => Ok(()),
    Term::Apply(f, a) => {
      check_namespaces(f)?;
      check_namespaces(a)
    }
  }
}

/// A single higher-order combinatory unification problem: two terms whose unifiability is
/// decided by backtracking search. Construct one with [`UnificationProblem::new`], then call
/// [`UnificationProblem::advance`] repeatedly to enumerate its most-general unifiers.
pub struct UnificationProblem {
  engine: UnificationEngine,
}

impl UnificationProblem {
  /// Builds a new problem from two terms of equal sort. Fails fast, before any search runs, if
  /// the terms disagree in sort or if either uses the namespace the engine reserves for
  /// variables it generates internally during narrowing.
  pub fn new(env: &Environment, left: Term, right: Term) -> Result<Self, ProblemError> {
    let sorts = env.sorts();
    let left_sort = left.sort(sorts);
    let right_sort = right.sort(sorts);
    if left_sort != right_sort {
      return Err(ProblemError::SortMismatch { left: left_sort, right: right_sort });
    }
    check_namespaces(&left)?;
    check_namespaces(&right)?;

    let mut arena = TermArena::new();
    let left_id = deappify(&left, &mut arena);
    let right_id = deappify(&right, &mut arena);
    let engine = UnificationEngine::new(arena, sorts.clone(), left_id, right_id);

    Ok(Self { engine })
  }

  /// Runs the search until a unifier is found, every branch is exhausted, or `budget` runs out.
  /// Call again after `Found` to backtrack into the next unifier, if any.
  pub fn advance(&mut self, budget: &Budget) -> Advance {
    let span = info_span!("unification_advance");
    let _guard = span.enter();
    self.engine.advance(budget)
  }

  /// A view onto the substitution as it stands right after an `advance` call returned `Found`.
  /// Its contents are meaningless after a later `advance` call that doesn't also return `Found`.
  pub fn current_unifier(&self) -> Unifier<'_> {
    Unifier::new(&self.engine)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::term::{AtomHead as InnerAtomHead, CombinatorKind};
  use crate::Variable;

  #[test]
  fn identical_variables_unify_with_no_bindings() {
    let mut env = Environment::new();
    let s = env.base_sort("i");
    let x = Variable { id: 0, namespace: 0 };

    let mut problem = UnificationProblem::new(&env, Term::var(x, s), Term::var(x, s)).unwrap();
    assert_eq!(problem.advance(&Budget::unbounded()), Advance::Found);
    assert!(problem.current_unifier().bindings().is_empty());
  }

  #[test]
  fn distinct_constants_of_the_same_sort_do_not_unify() {
    let mut env = Environment::new();
    let s = env.base_sort("i");

    let mut problem =
      UnificationProblem::new(&env, Term::constant("a", s), Term::constant("b", s)).unwrap();
    assert_eq!(problem.advance(&Budget::unbounded()), Advance::Exhausted);
  }

  #[test]
  fn bare_variable_eliminates_to_the_other_side() {
    let mut env = Environment::new();
    let s = env.base_sort("i");
    let x = Variable { id: 0, namespace: 0 };

    let mut problem =
      UnificationProblem::new(&env, Term::var(x, s), Term::constant("a", s)).unwrap();
    assert_eq!(problem.advance(&Budget::unbounded()), Advance::Found);

    let bound = problem.current_unifier().apply(x).unwrap();
    assert_eq!(bound, Term::constant("a", s));
  }

  #[test]
  fn i_combinator_reduces_before_eliminating() {
    let mut env = Environment::new();
    let s = env.base_sort("i");
    let func = env.function_sort(s, s);
    let y = Variable { id: 0, namespace: 0 };

    let left = Term::comb(CombinatorKind::I, func).apply(Term::var(y, s));
    let right = Term::constant("a", s);

    let mut problem = UnificationProblem::new(&env, left, right).unwrap();
    assert_eq!(problem.advance(&Budget::unbounded()), Advance::Found);

    let bound = problem.current_unifier().apply(y).unwrap();
    assert_eq!(bound, Term::constant("a", s));
  }

  #[test]
  fn mismatched_sorts_are_rejected_at_construction() {
    let mut env = Environment::new();
    let s = env.base_sort("i");
    let t = env.base_sort("o");
    let x = Variable { id: 0, namespace: 0 };

    let err = UnificationProblem::new(&env, Term::var(x, s), Term::var(x, t)).unwrap_err();
    assert!(matches!(err, ProblemError::SortMismatch { .. }));
  }

  #[test]
  fn reserved_namespace_is_rejected_at_construction() {
    let mut env = Environment::new();
    let s = env.base_sort("i");
    let reserved = Variable { id: 0, namespace: u32::MAX };

    let err = UnificationProblem::new(&env, Term::var(reserved, s), Term::constant("a", s))
      .unwrap_err();
    assert!(matches!(err, ProblemError::ReservedNamespace { .. }));
  }

  #[test]
  fn second_advance_exhausts_a_problem_with_a_single_unifier() {
    let mut env = Environment::new();
    let s = env.base_sort("i");
    let x = Variable { id: 0, namespace: 0 };

    let mut problem =
      UnificationProblem::new(&env, Term::var(x, s), Term::constant("a", s)).unwrap();
    assert_eq!(problem.advance(&Budget::unbounded()), Advance::Found);
    assert_eq!(problem.advance(&Budget::unbounded()), Advance::Exhausted);
  }

  #[test]
  fn zero_step_budget_reports_budget_exceeded() {
    let mut env = Environment::new();
    let s = env.base_sort("i");
    let x = Variable { id: 0, namespace: 0 };

    let mut problem =
      UnificationProblem::new(&env, Term::var(x, s), Term::constant("a", s)).unwrap();
    assert_eq!(problem.advance(&Budget::with_max_steps(0)), Advance::BudgetExceeded);
  }

  #[test]
  fn atom_head_distinguishes_variables_combinators_and_constants() {
    let mut env = Environment::new();
    let s = env.base_sort("i");
    match Term::constant("a", s) {
      Term::Atom(InnerAtomHead::Const(_), sort) => assert_eq!(sort, s),
      _ => panic!("expected a constant atom"),
    }
  }

  #[test]
  fn k_combinator_reduces_by_discarding_its_second_argument() {
    let mut env = Environment::new();
    let s = env.base_sort("i");
    let s2 = env.function_sort(s, s);
    let k_sort = env.function_sort(s, s2);

    let left = Term::comb(CombinatorKind::K, k_sort)
      .apply(Term::constant("a", s))
      .apply(Term::constant("b", s));
    let right = Term::constant("a", s);

    let mut problem = UnificationProblem::new(&env, left, right).unwrap();
    assert_eq!(problem.advance(&Budget::unbounded()), Advance::Found);
    assert!(problem.current_unifier().bindings().is_empty());
  }

  #[test]
  fn s_k_k_reduces_to_the_identity_function() {
    let mut env = Environment::new();
    let i = env.base_sort("i");
    let s2 = env.function_sort(i, i);
    let s2_to_i = env.function_sort(s2, i);
    let k1 = env.function_sort(i, s2_to_i);
    let k2 = env.function_sort(i, s2);
    let k2_to_s2 = env.function_sort(k2, s2);
    let s_sort = env.function_sort(k1, k2_to_s2);

    let left = Term::comb(CombinatorKind::S, s_sort)
      .apply(Term::comb(CombinatorKind::K, k1))
      .apply(Term::comb(CombinatorKind::K, k2))
      .apply(Term::constant("z", i));
    let right = Term::constant("z", i);

    let mut problem = UnificationProblem::new(&env, left, right).unwrap();
    assert_eq!(problem.advance(&Budget::unbounded()), Advance::Found);
    assert!(problem.current_unifier().bindings().is_empty());
  }

  #[test]
  fn b_combinator_composes_its_first_two_arguments() {
    let mut env = Environment::new();
    let i = env.base_sort("i");
    let func = env.function_sort(i, i);
    let func_to_func = env.function_sort(func, func);
    let b_sort = env.function_sort(func, func_to_func);

    let f = Term::constant("f", func);
    let g = Term::constant("g", func);
    let x = Term::constant("x", i);

    let left = Term::comb(CombinatorKind::B, b_sort).apply(f.clone()).apply(g.clone()).apply(x.clone());
    let right = f.apply(g.apply(x));

    let mut problem = UnificationProblem::new(&env, left, right).unwrap();
    assert_eq!(problem.advance(&Budget::unbounded()), Advance::Found);
    assert!(problem.current_unifier().bindings().is_empty());
  }

  #[test]
  fn c_combinator_swaps_its_last_two_arguments() {
    let mut env = Environment::new();
    let i = env.base_sort("i");
    let inner2 = env.function_sort(i, i);
    let ffunc2 = env.function_sort(i, inner2);
    let c_sort = env.function_sort(ffunc2, ffunc2);

    let f = Term::constant("f", ffunc2);
    let a = Term::constant("a", i);
    let b = Term::constant("b", i);

    let left = Term::comb(CombinatorKind::C, c_sort).apply(f.clone()).apply(a.clone()).apply(b.clone());
    let right = f.apply(b).apply(a);

    let mut problem = UnificationProblem::new(&env, left, right).unwrap();
    assert_eq!(problem.advance(&Budget::unbounded()), Advance::Found);
    assert!(problem.current_unifier().bindings().is_empty());
  }

  #[test]
  fn kx_narrowing_resolves_a_flex_rigid_pair_to_a_fully_closed_binding() {
    let mut env = Environment::new();
    let s = env.base_sort("i");
    let func = env.function_sort(s, s);
    // Pre-intern so the fresh functional sort narrowing needs already exists at a stable id
    // before the engine clones the sort table; otherwise the clone's own interning would hand
    // back a different id than a later, independent call against `env` would.
    let k_full_sort = env.function_sort(s, func);
    let x = Variable { id: 0, namespace: 0 };

    let left = Term::var(x, func).apply(Term::constant("a", s));
    let right = Term::constant("b", s);

    let mut problem = UnificationProblem::new(&env, left, right).unwrap();
    assert_eq!(problem.advance(&Budget::unbounded()), Advance::Found);

    let bound = problem.current_unifier().apply(x).unwrap();
    let expected = Term::comb(CombinatorKind::K, k_full_sort).apply(Term::constant("b", s));
    assert_eq!(bound, expected);
  }

  #[test]
  fn distinct_variables_unify_by_eliminating_one_into_the_other() {
    let mut env = Environment::new();
    let s = env.base_sort("i");
    let x = Variable { id: 0, namespace: 0 };
    let y = Variable { id: 0, namespace: 1 };

    let mut problem = UnificationProblem::new(&env, Term::var(x, s), Term::var(y, s)).unwrap();
    assert_eq!(problem.advance(&Budget::unbounded()), Advance::Found);

    let bound = problem.current_unifier().apply(x).unwrap();
    assert_eq!(bound, Term::var(y, s));
  }

  /// Unifiability and the shape of the resulting unifier never depend on what a constant happens
  /// to be named — only its sort and position matter. Exercises that with a batch of
  /// deterministically-seeded random names rather than one fixed one.
  #[test]
  fn constant_naming_never_affects_unifiability_or_unifier_shape() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    for _ in 0..20 {
      let suffix: u32 = rng.gen();
      let name = format!("const_{suffix}");

      let mut env = Environment::new();
      let s = env.base_sort("i");
      let x = Variable { id: 0, namespace: 0 };

      let mut problem =
        UnificationProblem::new(&env, Term::var(x, s), Term::constant(&name, s)).unwrap();
      assert_eq!(problem.advance(&Budget::unbounded()), Advance::Found);

      let bound = problem.current_unifier().apply(x).unwrap();
      assert_eq!(bound, Term::constant(&name, s));
    }
  }

  #[test]
  fn a_variable_cannot_unify_with_a_term_it_occurs_in() {
    let mut env = Environment::new();
    let s = env.base_sort("i");
    let func = env.function_sort(s, s);
    let x = Variable { id: 0, namespace: 0 };

    let left = Term::var(x, s);
    let right = Term::constant("f", func).apply(Term::var(x, s));

    let mut problem = UnificationProblem::new(&env, left, right).unwrap();
    assert_eq!(problem.advance(&Budget::unbounded()), Advance::Exhausted);
  }
}
