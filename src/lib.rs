//! An MMA fan website.
//!
//! Published events with their fight cards, news articles, fighter
//! profiles and a glossary, served as server-rendered pages with
//! search-engine metadata. Content comes from `PostgreSQL` or from built-in
//! mock data.

pub mod domain;
pub use domain::{Config, Event, Fighter, NewsArticle};

/// Content storage and the published-content catalog.
pub mod storage;
pub use storage::{Catalog, ContentStore, NewsDesk};

pub mod seo;

pub mod ticker;
pub use ticker::Ticker;

pub mod wallet;

pub mod web;
pub use web::{AppState, router, serve};
