use crate::core::engine::UnificationEngine;
use crate::core::substitution::Substitution;
use crate::core::term::{AtomHead, Head, Term, TermArena, TermId, VarSpec, Variable};

/// A read-only view onto the bindings the search has committed to. Borrowed from a
/// [`crate::api::UnificationProblem`]; only meaningful immediately after an `advance` call that
/// returned [`crate::api::Advance::Found`].
pub struct Unifier<'a> {
  engine: &'a UnificationEngine,
}

/// Rebuilds `id` as a host-visible [`Term`], substituting in the (recursively resolved) binding
/// of any bound variable it carries rather than leaving it as a bare occurrence. Narrowing routes
/// a binding through internally-generated variables as often as not (`X ↦ K Y`, `Y ↦ b`); a host
/// reading `X`'s binding has no way to look those up itself, so this closes over the whole chain
/// before handing a term back.
fn resolve(id: TermId, arena: &TermArena, subst: &Substitution) -> Term {
  let base = match arena.head(id) {
    Head::Var(v) => match subst.get(*v) {
      Some(bound_id) => resolve(bound_id, arena, subst),
      None => Term::var(Variable { id: v.id, namespace: v.namespace }, arena.head_sort(id)),
    },
    Head::Comb(c) => Term::comb((*c).into(), arena.head_sort(id)),
    Head::Const(name) => Term::Atom(AtomHead::Const(name.clone()), arena.head_sort(id)),
  };
  (0..arena.arg_count(id)).fold(base, |acc, i| acc.apply(resolve(arena.nth_arg(id, i), arena, subst)))
}

impl<'a> Unifier<'a> {
  pub(crate) fn new(engine: &'a UnificationEngine) -> Self {
    Self { engine }
  }

  /// The term `var` is bound to, fully resolved. `None` if `var` was never bound by this unifier
  /// (it may still be constrained indirectly through other bindings).
  pub fn apply(&self, var: Variable) -> Option<Term> {
    let spec = VarSpec { id: var.id, namespace: var.namespace };
    let id = self.engine.substitution().get(spec)?;
    Some(resolve(id, self.engine.arena(), self.engine.substitution()))
  }

  /// Every variable this unifier binds, paired with the (fully resolved) term it's bound to.
  /// Skips bindings for variables in the engine's internal namespace: those exist only to mediate
  /// between bindings a host asked for and carry no meaning of their own.
  pub fn bindings(&self) -> Vec<(Variable, Term)> {
    self
      .engine
      .substitution()
      .iter()
      .filter(|(spec, _)| spec.namespace != crate::core::term::FRESH_NAMESPACE)
      .map(|(spec, id)| {
        let var = Variable { id: spec.id, namespace: spec.namespace };
        (var, resolve(id, self.engine.arena(), self.engine.substitution()))
      })
      .collect()
  }
}
