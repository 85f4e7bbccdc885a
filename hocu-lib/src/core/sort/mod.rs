/*!

The sort algebra. A sort is either a base sort (interned by name) or a functional sort built from
a domain and a range, `domain -> range`. Functional sorts are hash-consed: asking for the same
`(domain, range)` pair twice always returns the same [`SortId`], so two terms built from equal
sorts compare equal as sorts without a deep structural walk.

*/

mod sort_id;
mod table;

pub use sort_id::SortId;
pub(crate) use table::SortTable;
