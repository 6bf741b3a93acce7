//! Paginated, token-authenticated access to templated REST collections.

pub mod client;
pub mod http;
pub mod page;
pub mod template;

pub use client::{ResourceClient, DEFAULT_PAGE_SIZE};
pub use page::Page;
pub use template::{PathParams, ResourceTemplate};
