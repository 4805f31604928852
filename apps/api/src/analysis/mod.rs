// Resume analyzer: view controller, sessions, and the external analysis client.
// All calls to the analysis service go through client.rs.

pub mod client;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod sessions;
pub mod view;
