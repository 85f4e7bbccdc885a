/*!

Types/type aliases that abstract over the implementing backing type, in the spirit of mod2-abs:
this module redirects to whatever chosen implementation we want for a handful of cross-cutting
utilities so the engine crate (`hocu-lib`) never has to care which crate backs an interned string
or a bump allocator.

*/

mod arena;

pub use arena::{Arena, Mark};

/// Interned string type. If we ever want to swap `string_cache` for `ustr` (as the teacher crate
/// considered doing), this is the only line that needs to change.
pub use string_cache::DefaultAtom as IString;

/// Short argument lists (almost always 0–4 args per combinator application) are stored inline
/// rather than spilling to the heap.
pub use smallvec::{smallvec, SmallVec};
