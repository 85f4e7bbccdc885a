use std::time::{Duration, Instant};

use hocu_abs::SmallVec;
use tracing::{trace, warn};

use super::fresh::FreshSupply;
use super::pair::{Step, UnificationPair};
use super::sort::SortTable;
use super::step::{self, ApplyOutcome, MutationLog};
use super::substitution::Substitution;
use super::term::TermArena;
use hocu_abs::Mark;

/// Caller-supplied limits on how long the search is allowed to run before giving up and handing
/// control back. Replaces a fixed iteration cap with something the host controls: a budget with
/// both fields `None` never yields [`Advance::BudgetExceeded`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Budget {
  pub max_steps: Option<u64>,
  pub deadline: Option<Instant>,
}

impl Budget {
  pub fn unbounded() -> Self {
    Self::default()
  }

  pub fn with_max_steps(max_steps: u64) -> Self {
    Self { max_steps: Some(max_steps), deadline: None }
  }

  pub fn with_timeout(timeout: Duration) -> Self {
    Self { max_steps: None, deadline: Some(Instant::now() + timeout) }
  }
}

/// The outcome of one call to [`UnificationEngine::advance`].
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Advance {
  /// A unifier is ready; read it off the engine's substitution before calling `advance` again.
  Found,
  /// Every branch has been explored; no further unifiers exist.
  Exhausted,
  /// The budget ran out mid-search. The engine's internal state is untouched, so a fresh call
  /// to `advance` (perhaps after handing the host a bigger budget) picks up exactly where this
  /// one left off.
  BudgetExceeded,
}

struct CommittedUndo {
  arena_mark: Mark,
  log: MutationLog,
}

struct ChoicePoint {
  pair: UnificationPair,
  candidates: SmallVec<[Step; 8]>,
  next_index: usize,
  pairs_len_before: usize,
  committed: Option<CommittedUndo>,
}

/// The backtracking search itself. Owns a private copy of the sort table (narrowing invents new
/// functional sorts on the fly) and a working arena of [`super::term::TermId`]s; the pair stack
/// plus a trail of [`ChoicePoint`]s implement depth-first search with an explicit undo log rather
/// than whole-state snapshotting.
pub(crate) struct UnificationEngine {
  arena: TermArena,
  sorts: SortTable,
  subst: Substitution,
  fresh: FreshSupply,
  pairs: Vec<UnificationPair>,
  choice_stack: Vec<ChoicePoint>,
  steps_taken: u64,
  /// Set after a `Found` result so the next `advance` call knows to back out of the solution
  /// it just reported before resuming the search for another one.
  solved: bool,
}

impl UnificationEngine {
  pub(crate) fn new(arena: TermArena, sorts: SortTable, left: super::term::TermId, right: super::term::TermId) -> Self {
    Self {
      arena,
      sorts,
      subst: Substitution::new(),
      fresh: FreshSupply::new(),
      pairs: vec![UnificationPair::new(left, right)],
      choice_stack: Vec::new(),
      steps_taken: 0,
      solved: false,
    }
  }

  pub(crate) fn substitution(&self) -> &Substitution {
    &self.subst
  }

  pub(crate) fn arena(&self) -> &TermArena {
    &self.arena
  }

  pub(crate) fn sorts(&self) -> &SortTable {
    &self.sorts
  }

  fn budget_exceeded(&self, budget: &Budget) -> bool {
    if let Some(max) = budget.max_steps {
      if self.steps_taken >= max {
        return true;
      }
    }
    if let Some(deadline) = budget.deadline {
      if Instant::now() >= deadline {
        return true;
      }
    }
    false
  }

  pub(crate) fn advance(&mut self, budget: &Budget) -> Advance {
    if self.solved {
      self.solved = false;
      if !self.backtrack() {
        return Advance::Exhausted;
      }
    }

    loop {
      if self.budget_exceeded(budget) {
        warn!(steps_taken = self.steps_taken, "budget exceeded");
        return Advance::BudgetExceeded;
      }

      if self.pairs.is_empty() {
        self.solved = true;
        trace!(bindings = self.subst.len(), "unifier found");
        return Advance::Found;
      }

      self.steps_taken += 1;
      let pair = self.pairs.pop().expect("checked non-empty above");
      let candidates = step::enumerate(&pair, &self.arena, &self.sorts);
      let pairs_len_before = self.pairs.len();
      trace!(candidates = candidates.len(), "enumerated pair");
      self.choice_stack.push(ChoicePoint {
        pair,
        candidates,
        next_index: 0,
        pairs_len_before,
        committed: None,
      });

      if !self.try_commit_next() && !self.backtrack() {
        return Advance::Exhausted;
      }
    }
  }

  /// Tries each remaining candidate of the top choice point in turn, committing the first one
  /// that makes progress. Returns `false` once every candidate has been tried and failed, which
  /// means the top choice point itself is dead.
  fn try_commit_next(&mut self) -> bool {
    loop {
      let (pair, step_kind, pairs_len_before) = {
        let cp = self.choice_stack.last_mut().expect("try_commit_next: empty choice stack");
        if cp.next_index >= cp.candidates.len() {
          return false;
        }
        let step_kind = cp.candidates[cp.next_index];
        cp.next_index += 1;
        (cp.pair.clone(), step_kind, cp.pairs_len_before)
      };
      trace!(?step_kind, "attempting step");

      let arena_mark = self.arena.mark();
      let mut log = MutationLog::default();
      let outcome = step::apply(
        step_kind,
        pair,
        &mut self.arena,
        &mut self.sorts,
        &mut self.subst,
        &mut self.fresh,
        &mut self.pairs[..pairs_len_before],
        &mut log,
      );

      match outcome {
        ApplyOutcome::Progress { new_pairs } => {
          self.pairs.truncate(pairs_len_before);
          self.pairs.extend(new_pairs);
          let cp = self.choice_stack.last_mut().expect("choice stack non-empty: just pushed to it");
          cp.committed = Some(CommittedUndo { arena_mark, log });
          return true;
        }
        ApplyOutcome::Failed => continue,
      }
    }
  }

  /// Undoes the top choice point's committed candidate (if any) and tries its next one; if the
  /// choice point has no candidates left, discards it and retries the one below. Returns `false`
  /// once the whole trail is exhausted.
  fn backtrack(&mut self) -> bool {
    loop {
      let committed = match self.choice_stack.last_mut() {
        Some(cp) => cp.committed.take(),
        None => return false,
      };
      if let Some(committed) = committed {
        let pairs_len_before = self.choice_stack.last().unwrap().pairs_len_before;
        self.undo(committed, pairs_len_before);
      }
      if self.try_commit_next() {
        return true;
      }
      trace!(depth = self.choice_stack.len(), "choice point exhausted");
      self.choice_stack.pop();
    }
  }

  fn undo(&mut self, committed: CommittedUndo, pairs_len_before: usize) {
    self.pairs.truncate(pairs_len_before);
    for (id, node) in committed.log.nodes.into_iter().rev() {
      self.arena.restore_node(id, node);
    }
    for var in committed.log.bound_vars.into_iter().rev() {
      self.subst.unbind(var);
    }
    self.arena.truncate_to(committed.arena_mark);
  }
}
