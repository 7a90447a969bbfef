//! Terminal invoice builder: line items, fixed-rate totals and a persisted
//! history of saved invoices.

pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod history;
pub mod logging;
pub mod models;
pub mod pricing;
pub mod ui;
pub mod view;
pub mod workspace;
