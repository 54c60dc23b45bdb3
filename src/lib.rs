pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod routes;
pub mod service;
pub mod store;
pub mod utils;
pub mod validation;

pub use error::{LinkError, StoreError};
pub use model::{CreatedLink, Link};
pub use service::LinkService;
pub use store::{LinkStore, MemoryLinkStore, PgLinkStore};
