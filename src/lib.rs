//! libris: a small digital-library service.
//!
//! An admin uploads book files and cover images, metadata lands in the
//! catalog, and readers browse and resume books. The two pieces with real
//! contracts live in [`accent`] (cover → accent color) and [`progress`]
//! (book id → last page viewed); [`reader`] ties progress to the two viewer
//! presentation modes, and [`library_api`] is the HTTP surface around them.

pub mod accent;
pub mod config;
pub mod domain;
pub mod library_api;
pub mod progress;
pub mod reader;
pub mod storage;
