//! Stopover - tourism review backend
//!
//! CRUD API for travel destinations and visitor reviews, each carrying
//! uploaded photos. Exposes all modules for integration testing.

pub mod blob;
pub mod describe;
pub mod entities;
pub mod errors;
pub mod settings;
pub mod storage;
pub mod validate;
pub mod web;
