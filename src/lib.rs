//! Configuration for a receiver that scrapes Prometheus endpoints.
//!
//! The receiver embeds a regular Prometheus configuration under its `config`
//! key and can optionally be driven by a target allocator. Everything in this
//! crate runs once while the receiver is being constructed: a document is
//! decoded into a [`ReceiverConfig`], validated, and then handed as a read
//! only value to whatever performs the actual scraping.

pub mod adapter;
pub mod client;
pub mod config;
mod credentials;
pub mod endpoint;
pub mod error;
mod features;
mod inline;
pub mod load;
pub mod prometheus;

pub use adapter::{AdapterError, PromConfig, PromHttpSdConfig};
pub use config::{ReceiverConfig, TargetAllocatorConfig};
pub use error::Error;
