//! Expansion of lamdef blocks
//!
//! [`header`] finds `lamdef(...):` headers, [`block`] resolves each into
//! its statement, body and terminator, and [`expand`] splices the result
//! into a nested function plus a reference to it.

pub mod block;
pub mod error;
pub mod expand;
pub mod header;
pub mod naming;
pub mod options;

pub use block::{LamdefBlock, resolve_block};
pub use error::{LineSpan, RewriteError};
pub use expand::{BlockInfo, ExpandedBlock, Expander, Expansion, Listing};
pub use header::{HeaderScan, LamdefHeader, scan_headers};
pub use naming::NameAllocator;
pub use options::{IndentStyle, RewriteOptions};
