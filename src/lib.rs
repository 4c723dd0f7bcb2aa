//! # contacts
//!
//! An in-memory contact book served over HTTP.
//!
//! The [`ContactStore`] owns every [`Contact`] and hands out ids from a
//! counter that never goes backwards. [`api::routes`] binds the store to a
//! small REST surface, and [`Server`] runs it on hyper with graceful shutdown.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use contacts::{api, ContactStore, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), contacts::Error> {
//!     let store = Arc::new(ContactStore::seeded());
//!     Server::bind(([127, 0, 0, 1], 3000).into())
//!         .serve(api::routes(store))
//!         .await
//! }
//! ```
//!
//! Then:
//!
//! ```text
//! curl localhost:3000/contacts
//! curl -X POST localhost:3000/contacts -d '{"first_name":"Ada"}'
//! curl -X PUT localhost:3000/contacts/1 -d '{"last_name":"Lovelace"}'
//! curl -X DELETE localhost:3000/contacts/0
//! ```

mod contact;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;
mod store;

pub mod api;
pub mod config;
pub mod health;

pub use contact::{Contact, ContactPatch, Deleted};
pub use error::Error;
pub use handler::{Handler, with_state};
pub use method::{Method, UnknownMethod};
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use store::{ContactStore, StoreError};
