//! Overlay stack synchronized with the URL.
//!
//! The set of open drawers and modals lives in one query parameter of the
//! current URL rather than in component state. Every read decodes the stack
//! from the URL, so back/forward navigation is reflected without any extra
//! bookkeeping, and every write is a read-modify-write of that parameter that
//! leaves all other parameters untouched.
//!
//! * [`OverlaySync`]: open/close/query operations over a [`Location`]
//! * [`BoundOverlay`]: the same operations with the name fixed up front
//! * [`wire`]: the compressed on-the-wire entry format
//! * [`MemoryLocation`]: in-process history used by tests and tooling

pub mod entry;
pub mod location;
pub mod sync;
pub mod wire;

#[cfg(test)]
mod invariants;

pub use entry::{OverlayData, OverlayEntry, OverlayStack, OverlayTarget};
pub use location::{Location, MemoryLocation};
pub use sync::{BoundOverlay, OverlaySync};
pub use tether_config::{CodecKind, HistoryMode, KeyTable, OverlayConfig};
pub use wire::WireError;
