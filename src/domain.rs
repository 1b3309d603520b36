//! Domain models for the site.
//!
//! Events and their fight cards, news articles and their editorial
//! lifecycle, fighter profiles, reference content, and the pure formatting
//! rules shared by pages and the command line.

mod config;
pub use config::{Config, ConfigError, DataSource, WalletConfig};

/// Countdown to an event start.
pub mod countdown;
pub use countdown::{Countdown, TimeLeft};

/// Date display.
pub mod date;
pub use date::{DateFormatter, format_event_date, format_event_date_str};

/// Events and fight-card ordering.
pub mod event;
pub use event::{Bout, BoutResult, CardPosition, Event, EventStatus, order_fight_card};

pub mod fighter;
pub use fighter::Fighter;

pub mod glossary;

/// News articles.
pub mod news;
pub use news::{ArticleStatus, ArticleUpdate, NewDraft, NewsArticle, PublishError, UnpublishError};

mod optimistic;
pub use optimistic::Optimistic;

mod slug;
pub use slug::generate_slug;
