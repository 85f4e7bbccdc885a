/*!

A backtracking solver for higher-order combinatory unification: deciding whether two applicative
terms built from the combinators `I`, `K`, `B`, `C`, `S` and free variables can be made equal under
weak reduction, and if so, enumerating their most-general unifiers.

```
use hocu_lib::{Budget, Environment, Term, UnificationProblem, Variable};

let mut env = Environment::new();
let base = env.base_sort("i");

let x = Variable { id: 0, namespace: 0 };
let y = Variable { id: 0, namespace: 1 };

let left = Term::var(x, base);
let right = Term::var(y, base);

let mut problem = UnificationProblem::new(&env, left, right).unwrap();
match problem.advance(&Budget::unbounded()) {
    hocu_lib::Advance::Found => {
        let _unifier = problem.current_unifier();
    }
    _ => {}
}
```

*/

mod api;
mod core;

pub use api::*;
pub use hocu_abs::IString;
