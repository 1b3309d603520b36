//! Search-engine metadata: page tags, schema.org structured data, the
//! sitemap and `robots.txt`.

mod metadata;
pub use metadata::{PageMeta, Robots, SITE_NAME};

pub mod schema;
pub use schema::{Crumb, JsonLd};

mod sitemap;
pub use sitemap::{ChangeFrequency, SitemapEntry, build_sitemap, render_sitemap, robots_txt};
