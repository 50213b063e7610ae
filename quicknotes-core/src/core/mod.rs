//! Internal domain modules for the Quicknotes core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod clock;
pub mod error;
pub mod export;
pub mod intent;
pub mod note;
pub mod notebook;
pub mod query;
pub mod storage;
pub mod store;
pub mod theme;
