use hocu_abs::{IString, SmallVec};

use super::super::fresh::FreshSupply;
use super::super::pair::{Narrow, Side, Step, UnificationPair};
use super::super::sort::SortTable;
use super::super::substitution::Substitution;
use super::super::term::{Combinator, Head, HoNode, TermArena, TermId, VarSpec};

/// Snapshots taken so a step can be undone: nodes mutated in place (restored in reverse order)
/// and variables bound into the substitution (simply unbound).
#[derive(Default)]
pub(crate) struct MutationLog {
  pub(crate) nodes: Vec<(TermId, HoNode)>,
  pub(crate) bound_vars: Vec<VarSpec>,
}

impl MutationLog {
  fn snapshot(&mut self, arena: &TermArena, id: TermId) {
    self.nodes.push((id, arena.node(id).clone()));
  }
}

pub(crate) enum ApplyOutcome {
  /// The pair that was stepped, plus any newly spawned pairs, should replace whatever the
  /// engine popped. An empty `new_pairs` with the original pair not included means the pair was
  /// fully resolved.
  Progress { new_pairs: SmallVec<[UnificationPair; 3]> },
  /// The step cannot succeed (occurs check violation or a rigid head clash) — this branch is
  /// dead and the engine must backtrack.
  Failed,
}

fn term_for_side(pair: &UnificationPair, side: Side) -> TermId {
  match side {
    Side::Left => pair.left,
    Side::Right => pair.right,
  }
}

/// True if `var` occurs anywhere in the subtree rooted at `term` — as a bare occurrence or as the
/// head of a larger application. Walked before any binding is committed, since a binding that
/// would make a variable occur within its own value can never be discharged by further rewriting.
fn occurs(arena: &TermArena, var: VarSpec, term: TermId) -> bool {
  if matches!(arena.head(term), Head::Var(v) if *v == var) {
    return true;
  }
  (0..arena.arg_count(term)).any(|i| occurs(arena, var, arena.nth_arg(term, i)))
}

/// Performs the weak-reduction rule for `comb` against `target` in place: pop the arguments it
/// consumes off the front and `headify` the result back into `target`'s own slot. Shared between
/// `*_REDUCE` steps and the auto-reduction a narrowing splice triggers when it leaves a fully
/// applied combinator behind.
fn reduce_in_place(comb: Combinator, target: TermId, arena: &mut TermArena, log: &mut MutationLog) {
  let mut pop = |arena: &mut TermArena, log: &mut MutationLog| {
    log.snapshot(arena, target);
    arena.pop_front_arg(target)
  };

  match comb {
    Combinator::I => {
      let x = pop(arena, log);
      log.snapshot(arena, target);
      arena.headify(target, x);
    }
    Combinator::K => {
      let x = pop(arena, log);
      let _y = pop(arena, log);
      log.snapshot(arena, target);
      arena.headify(target, x);
    }
    Combinator::B => {
      let f = pop(arena, log);
      let g = pop(arena, log);
      let x = pop(arena, log);
      log.snapshot(arena, g);
      let gx = arena.add_arg(g, x);
      log.snapshot(arena, target);
      arena.push_front_arg(target, gx);
      log.snapshot(arena, target);
      arena.headify(target, f);
    }
    Combinator::C => {
      let f = pop(arena, log);
      let g = pop(arena, log);
      let x = pop(arena, log);
      log.snapshot(arena, target);
      arena.push_front_arg(target, g);
      log.snapshot(arena, target);
      arena.push_front_arg(target, x);
      log.snapshot(arena, target);
      arena.headify(target, f);
    }
    Combinator::S => {
      let f = pop(arena, log);
      let g = pop(arena, log);
      let x = pop(arena, log);
      log.snapshot(arena, f);
      let fx = arena.add_arg(f, x);
      let x2 = arena.clone_subtree(x);
      log.snapshot(arena, g);
      let gx2 = arena.add_arg(g, x2);
      log.snapshot(arena, target);
      arena.push_front_arg(target, gx2);
      log.snapshot(arena, target);
      arena.headify(target, fx);
    }
  }
}

/// Replaces every occurrence of `var` reachable from `root` with an independent copy of `bound`,
/// mutating nodes in place via `headify` (so a node already referenced by a parent's argument
/// list doesn't need that parent updated — it keeps pointing at the same id, now repurposed). A
/// splice that leaves a fully applied combinator behind keeps reducing it in place: binding a
/// variable to (say) a bare `K` only becomes a weak redex once the occurrence's own remaining
/// arguments are still attached, and that reduction has to happen as part of the same step rather
/// than waiting to be separately enumerated.
fn splice_var(arena: &mut TermArena, root: TermId, var: VarSpec, bound: TermId, sorts: &SortTable, log: &mut MutationLog) {
  if matches!(arena.head(root), Head::Var(v) if *v == var) {
    let replacement = arena.clone_subtree(bound);
    log.snapshot(arena, root);
    arena.headify(root, replacement);
    while let Some(c) = arena.comb_head(root) {
      if arena.is_under_applied_comb(root, sorts) {
        break;
      }
      reduce_in_place(c, root, arena, log);
    }
  }
  for i in 0..arena.arg_count(root) {
    splice_var(arena, arena.nth_arg(root, i), var, bound, sorts, log);
  }
}

fn splice_var_into_pairs(
  arena: &mut TermArena,
  var: VarSpec,
  bound: TermId,
  sorts: &SortTable,
  pairs: &mut [UnificationPair],
  log: &mut MutationLog,
) {
  for pair in pairs.iter_mut() {
    splice_var(arena, pair.left, var, bound, sorts, log);
    splice_var(arena, pair.right, var, bound, sorts, log);
  }
}

/// Binds `var` to `bound` and propagates the substitution into every still-pending pair, plus
/// (when `also_splice_into` is given) a pair that is still live and must see its own update.
#[allow(clippy::too_many_arguments)]
fn eliminate_and_splice(
  var: VarSpec,
  bound: TermId,
  arena: &mut TermArena,
  sorts: &SortTable,
  subst: &mut Substitution,
  pending: &mut [UnificationPair],
  also_splice_into: Option<&mut UnificationPair>,
  log: &mut MutationLog,
) {
  subst.bind(var, bound);
  log.bound_vars.push(var);
  splice_var_into_pairs(arena, var, bound, sorts, pending, log);
  if let Some(pair) = also_splice_into {
    splice_var(arena, pair.left, var, bound, sorts, log);
    splice_var(arena, pair.right, var, bound, sorts, log);
  }
}

/// `ADD_ARG` always pads both sides at once: the two terms of a pending pair denote the same
/// sort throughout the search, so the sort still needed to fill out either one is the same sort,
/// and a single fresh rigid constant (never a variable — it must never itself become a unifiable
/// placeholder) keeps them in lockstep.
fn apply_add_arg(mut pair: UnificationPair, arena: &mut TermArena, sorts: &SortTable, fresh: &mut FreshSupply, log: &mut MutationLog) -> ApplyOutcome {
  let remaining = arena.result_sort(pair.left, sorts);
  let needed_sort = sorts.domain(remaining).expect("ADD_ARG is only enumerated when a side is an under-applied combinator");

  let name: IString = fresh.fresh_const_name().into();
  let left_const = arena.mk_leaf(Head::Const(name.clone()), needed_sort);
  let right_const = arena.mk_leaf(Head::Const(name), needed_sort);

  log.snapshot(arena, pair.left);
  arena.add_arg(pair.left, left_const);
  log.snapshot(arena, pair.right);
  arena.add_arg(pair.right, right_const);

  pair.record(Step::AddArg);
  ApplyOutcome::Progress { new_pairs: SmallVec::from_slice(&[pair]) }
}

fn apply_reduce(side: Side, comb: Combinator, mut pair: UnificationPair, arena: &mut TermArena, log: &mut MutationLog) -> ApplyOutcome {
  let target = term_for_side(&pair, side);
  reduce_in_place(comb, target, arena, log);
  pair.record(Step::Reduce(side, comb));
  ApplyOutcome::Progress { new_pairs: SmallVec::from_slice(&[pair]) }
}

fn combinator_for(narrow: Narrow) -> Combinator {
  match narrow {
    Narrow::I => Combinator::I,
    Narrow::K | Narrow::KX => Combinator::K,
    Narrow::B | Narrow::BX => Combinator::B,
    Narrow::C | Narrow::CX => Combinator::C,
    Narrow::S | Narrow::SX => Combinator::S,
  }
}

/// Builds the term a narrowing step binds the occurrence's head variable to, but does not splice
/// it anywhere yet. A plain narrow (`I`, `K`, `B`, `C`, `S`) binds to the bare combinator at the
/// variable's own sort `sigma` directly — the admissibility checks in `enumerate` (§4.5) already
/// guarantee `sigma` itself decomposes into a valid instantiation of that combinator's principal
/// type, so no fresh arguments are needed; the occurrence's existing arguments are consumed by
/// the auto-reduction `splice_var` performs once the binding lands. An `X` variant additionally
/// introduces one fresh variable, prepended as the combinator's first argument, whose sort is
/// derived from the occurrence's own first one or two argument sorts.
fn build_narrow_binding(narrow: Narrow, occurrence: TermId, arena: &mut TermArena, sorts: &mut SortTable, fresh: &mut FreshSupply) -> TermId {
  let comb = combinator_for(narrow);
  let sigma = arena.head_sort(occurrence);

  match narrow {
    Narrow::I | Narrow::K | Narrow::B | Narrow::C | Narrow::S => arena.mk_comb(comb, sigma),

    Narrow::KX => {
      let fresh_sort = sorts.applied_to_n(sigma, 1);
      let comb_sort = sorts.make_functional(fresh_sort, sigma);
      let bound = arena.mk_comb(comb, comb_sort);
      let v = fresh.fresh_var();
      let arg = arena.mk_var(v, fresh_sort);
      arena.add_arg(bound, arg);
      bound
    }

    Narrow::BX | Narrow::CX | Narrow::SX => {
      let a0 = arena.nth_arg_sort(occurrence, 0, sorts);
      let a1 = arena.nth_arg_sort(occurrence, 1, sorts);
      let range2 = sorts.applied_to_n(sigma, 2);

      let s1 = if narrow == Narrow::CX {
        a0
      } else {
        sorts.range(a0).expect("BX/SX narrowing requires a functional first argument sort")
      };

      let fresh_sort = if narrow == Narrow::BX {
        sorts.make_functional(s1, range2)
      } else {
        let inner = sorts.make_functional(s1, range2);
        sorts.make_functional(a1, inner)
      };

      let comb_sort = sorts.make_functional(fresh_sort, sigma);
      let bound = arena.mk_comb(comb, comb_sort);
      let v = fresh.fresh_var();
      let arg = arena.mk_var(v, fresh_sort);
      arena.add_arg(bound, arg);
      bound
    }
  }
}

#[allow(clippy::too_many_arguments)]
fn apply_narrow(
  side: Side,
  narrow: Narrow,
  mut pair: UnificationPair,
  arena: &mut TermArena,
  sorts: &mut SortTable,
  subst: &mut Substitution,
  fresh: &mut FreshSupply,
  pending: &mut [UnificationPair],
  log: &mut MutationLog,
) -> ApplyOutcome {
  let occurrence = term_for_side(&pair, side);
  let var = match arena.head(occurrence) {
    Head::Var(v) => *v,
    _ => unreachable!("Narrow is only ever enumerated against a variable-headed term"),
  };

  let bound = build_narrow_binding(narrow, occurrence, arena, sorts, fresh);
  eliminate_and_splice(var, bound, arena, sorts, subst, pending, Some(&mut pair), log);
  pair.record(Step::Narrow(side, narrow));
  ApplyOutcome::Progress { new_pairs: SmallVec::from_slice(&[pair]) }
}

/// Pointwise on matching argument positions; fails immediately if any pair of arguments already
/// carries incompatible rigid heads; rather than spawning a doomed subgoal that can only ever
/// fail later.
fn apply_decomp(pair: UnificationPair, arena: &TermArena) -> ApplyOutcome {
  let n = arena.arg_count(pair.left);
  for i in 0..n {
    if arena.diff_first_order_head(arena.nth_arg(pair.left, i), arena.nth_arg(pair.right, i)) {
      return ApplyOutcome::Failed;
    }
  }
  let mut new_pairs = SmallVec::new();
  for i in 0..n {
    new_pairs.push(UnificationPair::new(arena.nth_arg(pair.left, i), arena.nth_arg(pair.right, i)));
  }
  ApplyOutcome::Progress { new_pairs }
}

fn apply_eliminate(
  side: Side,
  pair: UnificationPair,
  arena: &mut TermArena,
  sorts: &SortTable,
  subst: &mut Substitution,
  pending: &mut [UnificationPair],
  log: &mut MutationLog,
) -> ApplyOutcome {
  let var = match arena.head(term_for_side(&pair, side)) {
    Head::Var(v) => *v,
    _ => unreachable!("Eliminate is only ever enumerated against a bare variable"),
  };
  let bound = term_for_side(&pair, side.other());

  if matches!(arena.head(bound), Head::Var(v) if *v == var) && arena.arg_count(bound) == 0 {
    // Both sides were already the same bare variable; nothing to bind or propagate.
    return ApplyOutcome::Progress { new_pairs: SmallVec::new() };
  }
  if occurs(arena, var, bound) {
    return ApplyOutcome::Failed;
  }

  eliminate_and_splice(var, bound, arena, sorts, subst, pending, None, log);
  ApplyOutcome::Progress { new_pairs: SmallVec::new() }
}

/// Binds the variable-headed side (with `k` arguments) to a term built from the other side's own
/// head applied to the other side's first `m - k` arguments (`m` being its argument count), then
/// decomposes the two now arity-matched, same-headed sides pointwise. Occurs-checked against the
/// other side first, since the binding reuses its head directly.
#[allow(clippy::too_many_arguments)]
fn apply_split(
  side: Side,
  mut pair: UnificationPair,
  arena: &mut TermArena,
  sorts: &SortTable,
  subst: &mut Substitution,
  pending: &mut [UnificationPair],
  log: &mut MutationLog,
) -> ApplyOutcome {
  let target = term_for_side(&pair, side);
  let other = term_for_side(&pair, side.other());

  let var = match arena.head(target) {
    Head::Var(v) => *v,
    _ => unreachable!("Split is only ever enumerated against a variable-headed term"),
  };
  if occurs(arena, var, other) {
    return ApplyOutcome::Failed;
  }

  let k = arena.arg_count(target);
  let m = arena.arg_count(other);
  let prefix_len = m - k;

  let other_head = arena.head(other).clone();
  let other_head_sort = arena.head_sort(other);
  let bound = arena.mk_leaf(other_head, other_head_sort);
  for i in 0..prefix_len {
    let arg = arena.nth_arg(other, i);
    let cloned = arena.clone_subtree(arg);
    arena.add_arg(bound, cloned);
  }

  eliminate_and_splice(var, bound, arena, sorts, subst, pending, Some(&mut pair), log);

  if !arena.same_head_and_arity(pair.left, pair.right) {
    return ApplyOutcome::Failed;
  }

  let n = arena.arg_count(pair.left);
  for i in 0..n {
    if arena.diff_first_order_head(arena.nth_arg(pair.left, i), arena.nth_arg(pair.right, i)) {
      return ApplyOutcome::Failed;
    }
  }
  let mut new_pairs = SmallVec::new();
  for i in 0..n {
    new_pairs.push(UnificationPair::new(arena.nth_arg(pair.left, i), arena.nth_arg(pair.right, i)));
  }
  pair.record(Step::Split(side));
  ApplyOutcome::Progress { new_pairs }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn apply(
  step: Step,
  pair: UnificationPair,
  arena: &mut TermArena,
  sorts: &mut SortTable,
  subst: &mut Substitution,
  fresh: &mut FreshSupply,
  pending: &mut [UnificationPair],
  log: &mut MutationLog,
) -> ApplyOutcome {
  match step {
    Step::AddArg => apply_add_arg(pair, arena, sorts, fresh, log),
    Step::Reduce(side, comb) => apply_reduce(side, comb, pair, arena, log),
    Step::Narrow(side, narrow) => apply_narrow(side, narrow, pair, arena, sorts, subst, fresh, pending, log),
    Step::Decomp => apply_decomp(pair, arena),
    Step::Eliminate(side) => apply_eliminate(side, pair, arena, sorts, subst, pending, log),
    Step::Split(side) => apply_split(side, pair, arena, sorts, subst, pending, log),
  }
}
