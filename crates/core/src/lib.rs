//! Crocs Rwanda Core - Storefront domain library.
//!
//! This crate provides the types and rules shared by every Crocs Rwanda component:
//! - `storefront` - HTTP server for the shop, checkout and admin API
//! - `cli` - Command-line tools for migrations, seeding and admin setup
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database access,
//! no HTTP clients. Cart arithmetic and checkout validation live here so that the
//! server and any client reach the same totals from the same code.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, and statuses
//! - [`catalog`] - Product records, loose-record normalisation, merge and filters
//! - [`cart`] - Selection-aware shopping cart keyed by product + variant
//! - [`checkout`] - Order request validation and summary computation
//! - [`contact`] - Contact form validation and submission throttling

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod contact;
pub mod types;

pub use types::*;
