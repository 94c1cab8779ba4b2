//! Service Order Engine library crate.
//!
//! This crate prices staffing jobs and turns order forms into priced
//! service orders.  External applications may depend on the
//! `service_order_engine` crate and call `engine::compute_job_pricing`
//! directly, drive an `order::OrderDesk`, or embed the API via
//! `api::build_router`.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod fees;
pub mod models;
pub mod notify;
pub mod order;
pub mod schedule;
