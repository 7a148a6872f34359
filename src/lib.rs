//! Order intake for a small storefront: a product catalog with atomic stock
//! reservation, a pricing and validation engine, and an order ledger, each
//! store running as an actor behind a cloneable client.

pub mod actor_framework;
pub mod app_system;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod ledger;
pub mod orders;
pub mod pricing;

#[cfg(test)]
mod integration_tests;
#[cfg(test)]
mod mock_framework;
