/// An index into a [`SortTable`](super::SortTable). Opaque to the host: constructed only by
/// [`crate::api::Environment`] and passed back in, never built from a raw integer.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct SortId(pub(crate) u32);

impl SortId {
  #[inline(always)]
  pub(crate) fn index(self) -> usize {
    self.0 as usize
  }
}
