//! The library synchronization engine.
//!
//! Mirrors a Google Drive folder of PDFs into the local `library_items`
//! table. Data flow: [`sync::LibrarySync`] decides whether to skip, join an
//! in-flight run, or start a new one; a run fetches the full listing via
//! [`drive`], merges [`overrides`] through [`normalize`], and reconciles the
//! result against the store via [`store`].

pub mod drive;
pub mod error;
pub mod normalize;
pub mod overrides;
pub mod store;
pub mod sync;

pub use error::SyncError;
pub use sync::LibrarySync;
