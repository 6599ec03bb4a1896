//! REST access to the presence provider.

mod batch;
mod client;

pub use batch::fetch_many;
pub use client::{classify_response, LanyardRestClient, PresenceApi};
