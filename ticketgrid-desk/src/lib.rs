//! TICKETGRID Desk - Upstream Desk API Client
//!
//! HTTP access to the third-party desk API: OAuth token caching, paced and
//! retried GETs, offset/limit pagination, and roster backfill. This crate
//! owns every network call the service makes; the aggregation logic in
//! ticketgrid-core stays pure and consumes what is collected here through
//! the `TicketSource` trait.

pub mod client;
pub mod config;
pub mod roster;
pub mod token;
pub mod types;

pub use client::DeskClient;
pub use config::DeskConfig;
pub use roster::collect_board_inputs;
pub use token::TokenCache;
