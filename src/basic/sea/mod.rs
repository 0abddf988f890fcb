//! Sea of items.
//!
//! Definitions are addressed by dense IDs rather than by reference, which
//! allows:
//! -   direct addressing of individual definitions, through their ID,
//! -   side tables keyed by the same IDs, such as the memoized type of each
//!     definition, filled in as more information trickles through.

mod table;

pub use self::table::*;
