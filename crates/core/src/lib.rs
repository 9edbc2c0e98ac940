//! Core library for slack-sleuth
//!
//! This crate implements the **Functional Core** of the slack-sleuth application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`sleuth_core`** (this crate): retrieval protocol and message analysis, with zero I/O
//! - **`sleuth`**: HTTP transport, CLI, console and file output (the Imperative Shell)
//!
//! The only code here that touches the outside world does so through traits the shell
//! implements: [`pagination::PageFetch`] for paged listings and [`users::UserLookup`] for
//! single-user lookups. Tests substitute fakes for both.
//!
//! # Module Organization
//!
//! - [`time_range`]: Optional start/end instants encoded for the history endpoint
//! - [`pagination`]: Cursor-driven retrieval of a complete listing
//! - [`message`]: Message records and the filter removing system entries
//! - [`extract`]: Mention and tag extraction from message text
//! - [`analyze`]: Grouping, popularity scoring and the analysis report
//! - [`users`]: Memoized user lookups for verbose rendering
//! - [`snapshot`]: Persisted message snapshots
//! - [`slack`]: Slack Web API response types and their transformation into core records
//! - [`limit`]: Validated numeric options
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use sleuth_core::analyze::group_by_mentioned_user;
//! use sleuth_core::message::Message;
//!
//! let messages = vec![
//!     Message::with_text("Hi <@U1> and <@U2>"),
//!     Message::with_text("Hey <@U1>"),
//! ];
//!
//! let grouping = group_by_mentioned_user(&messages);
//!
//! assert_eq!(grouping.keys(), vec!["U1", "U2"]);
//! ```

pub mod analyze;
pub mod extract;
pub mod limit;
pub mod message;
pub mod pagination;
pub mod slack;
pub mod snapshot;
pub mod time_range;
pub mod users;
