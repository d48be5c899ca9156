//! Test helpers: fixture images and store doubles.

pub mod fixtures;
pub mod mock_store;
