//! The news relay: a small HTTP service that holds the NewsAPI credential
//! and forwards listing requests to the upstream `top-headlines` endpoint.
//!
//! The reader never talks to NewsAPI directly; it calls the relay's
//! `/api/news` route and receives the upstream status and body unchanged.

mod params;
mod server;

pub use params::ProxyParams;
pub use server::{
    router, serve, ProxyError, ProxySetupError, ProxyState, DEFAULT_UPSTREAM_URL, NEWS_ROUTE,
};
