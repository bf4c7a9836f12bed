//! Client library for the asset-management API.
//!
//! The interesting piece is [`wizard::AssetWizard`], the two-step asset
//! creation saga: create the base record, create the category-specific
//! detail record, verify, and compensate with a best-effort delete when
//! anything after the first create fails. [`refdata`] supplies the
//! read-only lookup snapshot and the name→id resolution the saga runs on,
//! and [`api`] is the reqwest client plus the `AssetService` seam tests
//! fake out.
pub mod api;
pub mod config;
pub mod model;
pub mod notify;
pub mod refdata;
pub mod wizard;
