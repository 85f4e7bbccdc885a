use hocu_abs::{Arena, Mark, SmallVec};

use super::head::{Combinator, Head};
use crate::core::sort::{SortId, SortTable};

/// An index into a [`TermArena`]. Cheap to copy, compare and hash; the arena never reuses an
/// index once handed out, so two `TermId`s are equal iff they name the same node.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub(crate) struct TermId(usize);

#[cfg(test)]
impl TermId {
  pub(crate) fn for_test(n: usize) -> Self {
    TermId(n)
  }
}

#[derive(Clone, Debug)]
pub(crate) struct HoNode {
  pub(crate) head: Head,
  pub(crate) head_sort: SortId,
  pub(crate) args: SmallVec<[TermId; 4]>,
}

/// The working representation of applicative terms during search: a head plus an argument deque,
/// rather than the binary curried spine the host sees through [`crate::api::Term`]. Every
/// destructive operation the engine performs (`headify`, pushing/popping an argument) mutates a
/// node in place; the backtracking engine is responsible for snapshotting a node before mutating
/// it so the mutation can be undone.
#[derive(Clone, Default)]
pub(crate) struct TermArena {
  arena: Arena<HoNode>,
}

impl TermArena {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn mark(&self) -> Mark {
    self.arena.mark()
  }

  pub(crate) fn truncate_to(&mut self, mark: Mark) {
    self.arena.truncate_to(mark)
  }

  pub(crate) fn node(&self, id: TermId) -> &HoNode {
    self.arena.get(id.0)
  }

  fn alloc(&mut self, node: HoNode) -> TermId {
    TermId(self.arena.alloc(node))
  }

  pub(crate) fn mk_leaf(&mut self, head: Head, sort: SortId) -> TermId {
    self.alloc(HoNode { head, head_sort: sort, args: SmallVec::new() })
  }

  pub(crate) fn mk_var(&mut self, spec: super::head::VarSpec, sort: SortId) -> TermId {
    self.mk_leaf(Head::Var(spec), sort)
  }

  pub(crate) fn mk_comb(&mut self, comb: Combinator, sort: SortId) -> TermId {
    self.mk_leaf(Head::Comb(comb), sort)
  }

  /// Overwrites the node at `id`, returning the value that was there. Callers in `core::engine`
  /// snapshot the returned value onto the current undo frame before discarding it.
  pub(crate) fn replace_node(&mut self, id: TermId, node: HoNode) -> HoNode {
    self.arena.replace(id.0, node)
  }

  pub(crate) fn restore_node(&mut self, id: TermId, node: HoNode) {
    self.arena.restore(id.0, node)
  }

  pub(crate) fn head(&self, id: TermId) -> &Head {
    &self.node(id).head
  }

  pub(crate) fn head_sort(&self, id: TermId) -> SortId {
    self.node(id).head_sort
  }

  pub(crate) fn args(&self, id: TermId) -> &[TermId] {
    &self.node(id).args
  }

  pub(crate) fn arg_count(&self, id: TermId) -> usize {
    self.node(id).args.len()
  }

  pub(crate) fn nth_arg(&self, id: TermId, n: usize) -> TermId {
    self.node(id).args[n]
  }

  /// Appends `arg` to the end of `target`'s argument deque, mutating `target` in place and
  /// returning it for convenience. This is the one place `deappify` needs: folding a binary
  /// `Apply` spine onto the head it eventually bottoms out at.
  pub(crate) fn add_arg(&mut self, target: TermId, arg: TermId) -> TermId {
    let node = self.arena.get_mut(target.0);
    node.args.push(arg);
    target
  }

  pub(crate) fn push_front_arg(&mut self, target: TermId, arg: TermId) {
    self.arena.get_mut(target.0).args.insert(0, arg);
  }

  pub(crate) fn pop_front_arg(&mut self, target: TermId) -> TermId {
    self.arena.get_mut(target.0).args.remove(0)
  }

  pub(crate) fn pop_back_arg(&mut self, target: TermId) -> TermId {
    self.arena.get_mut(target.0).args.pop().expect("pop_back_arg: no arguments")
  }

  /// Replaces `self`'s head and prepends `donor`'s arguments ahead of `self`'s own, then
  /// discards `donor` (its slot becomes unreachable garbage, which is fine: the arena never
  /// reclaims individual slots, only truncates from the end). This is how a combinator reduction
  /// splices its result back into the position the redex used to occupy.
  pub(crate) fn headify(&mut self, target: TermId, donor: TermId) {
    let donor_node = self.node(donor).clone();
    let target_node = self.arena.get_mut(target.0);
    let mut new_args = donor_node.args;
    new_args.extend(target_node.args.drain(..));
    target_node.head = donor_node.head;
    target_node.head_sort = donor_node.head_sort;
    target_node.args = new_args;
  }

  /// Deep-copies the subtree rooted at `id` into fresh slots of the same arena. Used whenever a
  /// bound term is spliced into more than one occurrence: each splice must own an independent
  /// copy, since later steps may reduce one occurrence without touching the others.
  pub(crate) fn clone_subtree(&mut self, id: TermId) -> TermId {
    let node = self.node(id).clone();
    let new_args: SmallVec<[TermId; 4]> =
      node.args.iter().map(|&a| self.clone_subtree(a)).collect();
    self.alloc(HoNode { head: node.head, head_sort: node.head_sort, args: new_args })
  }

  pub(crate) fn result_sort(&self, id: TermId, sorts: &SortTable) -> SortId {
    sorts.applied_to_n(self.head_sort(id), self.arg_count(id) as u32)
  }

  pub(crate) fn nth_arg_sort(&self, id: TermId, n: usize, sorts: &SortTable) -> SortId {
    self.result_sort(self.nth_arg(id, n), sorts)
  }

  pub(crate) fn sort_of_length_n_pref(&self, id: TermId, n: u32, sorts: &SortTable) -> SortId {
    sorts.applied_to_n(self.head_sort(id), n)
  }

  pub(crate) fn is_bare_var(&self, id: TermId) -> bool {
    let node = self.node(id);
    node.head.is_var() && node.args.is_empty()
  }

  pub(crate) fn is_var_headed(&self, id: TermId) -> bool {
    self.node(id).head.is_var()
  }

  pub(crate) fn comb_head(&self, id: TermId) -> Option<Combinator> {
    self.node(id).head.as_comb()
  }

  pub(crate) fn is_under_applied_comb(&self, id: TermId, sorts: &SortTable) -> bool {
    let node = self.node(id);
    node.head.as_comb().is_some() && (node.args.len() as u32) < sorts.arity(node.head_sort)
  }

  /// Two non-variable heads of the same sort and the same symbol/combinator. A variable-headed
  /// term never has the same first-order head as anything, including another occurrence of the
  /// same variable: that case is handled by the occurs check and elimination, not by decomposition.
  pub(crate) fn same_first_order_head(&self, a: TermId, b: TermId) -> bool {
    let na = self.node(a);
    let nb = self.node(b);
    if na.head.is_var() || nb.head.is_var() {
      return false;
    }
    na.head_sort == nb.head_sort && na.head == nb.head && na.args.len() == nb.args.len()
  }

  pub(crate) fn diff_first_order_head(&self, a: TermId, b: TermId) -> bool {
    let na = self.node(a);
    let nb = self.node(b);
    !na.head.is_var() && !nb.head.is_var() && !self.same_first_order_head(a, b)
  }

  /// Same head value, sort and arity, whether or not that head is a variable. `SPLIT` uses this
  /// for its post-binding check instead of `same_first_order_head`: binding the split variable to
  /// a prefix of the other side's arguments can leave both sides headed by the very same
  /// variable (e.g. splitting `X a` against `Y a b` binds `X := Y a`, so both sides end up headed
  /// by `Y`), which `same_first_order_head` would (correctly, for decomposition's own purposes)
  /// refuse to call equal.
  pub(crate) fn same_head_and_arity(&self, a: TermId, b: TermId) -> bool {
    let na = self.node(a);
    let nb = self.node(b);
    na.head == nb.head && na.head_sort == nb.head_sort && na.args.len() == nb.args.len()
  }
}
