//! newsdesk: a terminal news reader and the relay that holds its API key.
//!
//! The reader ([`ui`], [`app`], [`listing`]) talks only to the relay
//! ([`proxy`]) through [`news::NewsClient`]; the relay forwards requests to
//! NewsAPI with the credential attached. Bookmarks and the theme preference
//! persist through [`storage`].

pub mod app;
pub mod config;
pub mod listing;
pub mod news;
pub mod proxy;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod util;
