//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Admin password login backed by the session store
//! - `contact` - Per-sender contact form throttling
//! - `catalog` - Cached product listing

pub mod auth;
pub mod catalog;
pub mod contact;
