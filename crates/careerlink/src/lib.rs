//! Client core for the CareerLink job board.
//!
//! The crate adapts the backend's heterogeneous JSON into typed pages
//! ([`normalize`]), searches and pages in-memory collections ([`query`]),
//! drives employer status changes on applications ([`workflow`]), and wraps
//! the REST backend ([`client`]) behind a service that falls back to mock
//! data ([`service`], [`mock`]).

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod mock;
pub mod normalize;
pub mod query;
pub mod service;
pub mod session;
pub mod telemetry;
pub mod tracker;
pub mod workflow;
