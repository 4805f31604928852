// Speech intake: recorded answers packaged for the external coaching service.

pub mod client;
pub mod handlers;
pub mod models;
