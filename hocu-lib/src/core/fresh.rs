use super::term::{VarSpec, FRESH_NAMESPACE};

/// Issues variables and constants the search procedure invents on its own (narrowing
/// instantiations, `ADD_ARG` padding). Every fresh variable lives in [`FRESH_NAMESPACE`], which
/// the host must never use for its own input terms, so a fresh variable can never collide with
/// one supplied from outside.
#[derive(Clone, Default, Debug)]
pub(crate) struct FreshSupply {
  next_var: u32,
  next_const: u32,
}

impl FreshSupply {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn fresh_var(&mut self) -> VarSpec {
    let id = self.next_var;
    self.next_var += 1;
    VarSpec { id, namespace: FRESH_NAMESPACE }
  }

  pub(crate) fn fresh_const_name(&mut self) -> String {
    let name = format!("f{}", self.next_const);
    self.next_const += 1;
    name
  }
}
