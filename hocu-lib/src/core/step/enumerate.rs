use hocu_abs::{smallvec, SmallVec};

use super::super::pair::{Narrow, Side, Step, UnificationPair};
use super::super::sort::SortTable;
use super::super::term::{TermArena, TermId};

/// The narrowing admissibility table (§4.5): rules out the handful of step sequences that would
/// otherwise let the search thrash forever re-narrowing a variable into an equivalent, strictly
/// less general shape. Every narrow kind not named here is always admissible once it is
/// sort-admissible; this mirrors the reference implementation's `canPerformStep` exactly,
/// including its asymmetric shape (only `KX`, `K`, `I`, `CX` have nontrivial forbidden
/// predecessors).
fn is_admissible(pair: &UnificationPair, candidate: Narrow) -> bool {
  let ls = pair.last_narrow();
  let sls = pair.second_last_narrow();
  match candidate {
    Narrow::KX => {
      ls != Some(Narrow::SX)
        && ls != Some(Narrow::BX)
        && !(ls == Some(Narrow::CX) && sls == Some(Narrow::SX))
        && !(ls == Some(Narrow::KX) && sls == Some(Narrow::CX))
    }
    Narrow::K => ls != Some(Narrow::SX) && ls != Some(Narrow::CX),
    Narrow::I => ls != Some(Narrow::BX) && !(ls == Some(Narrow::KX) && sls == Some(Narrow::CX)),
    Narrow::CX => ls != Some(Narrow::CX),
    _ => true,
  }
}

/// Enumerates the narrowing and reduction candidates for one side of a pair, following the
/// admissibility conditions of §4.5 exactly: each combinator narrowing is offered only when the
/// term's existing arguments already carry the sorts that combinator needs, and a combinator-
/// headed, fully-applied term offers its unique matching `*_REDUCE`.
fn populate_side(term: TermId, side: Side, list: &mut SmallVec<[Step; 8]>, pair: &UnificationPair, arena: &TermArena, sorts: &SortTable) {
  if arena.is_var_headed(term) {
    // Every term reaching here has at least one argument: a bare variable (zero arguments) was
    // already routed to `ELIMINATE` before `populate_side` is ever called.
    let sigma = arena.head_sort(term);
    let n = arena.arg_count(term);
    let arg_sort = |k: usize| arena.nth_arg_sort(term, k, sorts);

    if is_admissible(pair, Narrow::KX) {
      list.push(Step::Narrow(side, Narrow::KX));
    }

    if arg_sort(0) == sorts.applied_to_n(sigma, 1) && is_admissible(pair, Narrow::I) {
      list.push(Step::Narrow(side, Narrow::I));
    }

    if n > 1 && arg_sort(0) == sorts.applied_to_n(sigma, 2) && is_admissible(pair, Narrow::K) {
      list.push(Step::Narrow(side, Narrow::K));
    }

    if n > 2 {
      let s1 = arg_sort(0);
      let s2 = arg_sort(1);
      let s3 = arg_sort(2);
      let prefix3 = sorts.applied_to_n(sigma, 3);

      let b_ok = sorts.arity(s1) >= 1
        && sorts.arity(s2) >= 1
        && sorts.domain(s1) == sorts.range(s2)
        && sorts.domain(s2) == Some(s3)
        && sorts.range(s1) == Some(prefix3);
      if b_ok {
        list.push(Step::Narrow(side, Narrow::B));
      }

      let c_ok = sorts.arity(s1) >= 2
        && sorts.applied_to_n(s1, 2) == prefix3
        && sorts.nth_arg_sort(s1, 0) == s2
        && sorts.nth_arg_sort(s1, 1) == s3;
      if c_ok {
        list.push(Step::Narrow(side, Narrow::C));
      }

      let s_ok = sorts.arity(s1) >= 2
        && sorts.arity(s2) >= 1
        && sorts.applied_to_n(s1, 2) == prefix3
        && sorts.domain(s1) == Some(s3)
        && sorts.domain(s2) == Some(s3)
        && sorts.nth_arg_sort(s1, 1) == sorts.range(s2).unwrap_or(s1);
      if s_ok {
        list.push(Step::Narrow(side, Narrow::S));
      }
    }

    if n > 1 {
      let s1 = arg_sort(0);
      let s2 = arg_sort(1);
      if sorts.arity(s1) >= 1 && sorts.domain(s1) == Some(s2) {
        list.push(Step::Narrow(side, Narrow::BX));
        list.push(Step::Narrow(side, Narrow::SX));
      }
      if is_admissible(pair, Narrow::CX) {
        list.push(Step::Narrow(side, Narrow::CX));
      }
    }
  }

  if let Some(c) = arena.comb_head(term) {
    if !arena.is_under_applied_comb(term, sorts) {
      list.push(Step::Reduce(side, c));
    }
  }
}

/// Enumerates the steps admissible against a pair's current shape, per §4 rules 1-7: a bare
/// variable is only ever eliminated; a variable applied to no more arguments than the other side
/// carries may split; a variable-headed term is narrowed or (if the other side is an
/// under-applied combinator) left to grow via `ADD_ARG`; a combinator-headed, fully-applied term
/// reduces; matching rigid heads decompose. `DECOMP` and `ADD_ARG` are `BOTH`-tagged and, when
/// either is available, take priority over every side-specific candidate (§4 step-ordering note).
pub(crate) fn enumerate(pair: &UnificationPair, arena: &TermArena, sorts: &SortTable) -> SmallVec<[Step; 8]> {
  let l = pair.left;
  let r = pair.right;

  if arena.is_bare_var(l) {
    return smallvec![Step::Eliminate(Side::Left)];
  }
  if arena.is_bare_var(r) {
    return smallvec![Step::Eliminate(Side::Right)];
  }

  let mut left_list: SmallVec<[Step; 8]> = SmallVec::new();
  let mut right_list: SmallVec<[Step; 8]> = SmallVec::new();
  let mut both_list: SmallVec<[Step; 8]> = SmallVec::new();

  if arena.is_var_headed(l) && arena.arg_count(l) > 0 && arena.arg_count(l) <= arena.arg_count(r) {
    left_list.push(Step::Split(Side::Left));
  }
  if arena.is_var_headed(r) && arena.arg_count(r) > 0 && arena.arg_count(r) <= arena.arg_count(l) {
    right_list.push(Step::Split(Side::Right));
  }

  populate_side(l, Side::Left, &mut left_list, pair, arena, sorts);
  populate_side(r, Side::Right, &mut right_list, pair, arena, sorts);

  if arena.same_first_order_head(l, r) {
    both_list.push(Step::Decomp);
  }
  if arena.is_under_applied_comb(l, sorts) || arena.is_under_applied_comb(r, sorts) {
    both_list.push(Step::AddArg);
  }

  if !both_list.is_empty() {
    both_list
  } else {
    left_list.extend(right_list);
    left_list
  }
}
