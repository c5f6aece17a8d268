//! Hypermedia transport module
//!
//! Everything needed to turn a URI or a transition into a decoded resource:
//! the data model, HAL/Siren decoding and the HTTP client.
//!
//! # Module Structure
//!
//! - [`representor`] - `Representor`, `Transition` and attribute rendering
//! - [`client`] - the `Transport` trait and the `Hyperdrive` client
//! - [`http`] - reqwest wrapper, URI template expansion and request bodies
//! - [`parser`] - HAL and Siren decoders
//! - [`error`] - `HyperdriveError`
//!
//! # Example
//!
//! ```ignore
//! use starship::hyperdrive::{Hyperdrive, Transport};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = Hyperdrive::new()?;
//!     let root = client.request_uri("https://polls.apiblueprint.org/").await?;
//!     println!("{} transitions", root.transitions.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod parser;
pub mod representor;

pub use client::{Hyperdrive, Transport};
pub use error::{format_error, HyperdriveError};
pub use representor::{
    display_value, InputProperty, Representor, Transition, TransitionInput, SELF_RELATION,
};
