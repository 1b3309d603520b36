use clap::Parser;
use dialoguer::Confirm;
use mmabox::{
    AppState, NewsArticle,
    domain::{ArticleStatus, ArticleUpdate, DateFormatter, Optimistic, date::parse_date},
    storage::DeskError,
};
use tracing::instrument;

use super::terminal::{Colorize, is_narrow};

#[derive(Debug, Parser)]
pub enum News {
    /// List every article, drafts first
    List,

    /// Start a draft about a topic
    Draft {
        /// What the article is about; becomes the working title
        topic: String,
    },

    /// Change fields of an article
    Edit(Edit),

    /// Publish an article
    Publish {
        /// Article id
        id: i64,

        /// Publish time (RFC 3339 or a date); defaults to now
        #[arg(long)]
        at: Option<String>,
    },

    /// Return a published article to draft
    Unpublish {
        /// Article id
        id: i64,
    },

    /// Delete an article
    Delete {
        /// Article id
        id: i64,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Debug, Parser)]
pub struct Edit {
    /// Article id
    id: i64,

    /// New headline
    #[arg(long)]
    title: Option<String>,

    /// New slug
    #[arg(long)]
    slug: Option<String>,

    /// New teaser
    #[arg(long)]
    summary: Option<String>,

    /// New byline
    #[arg(long)]
    author: Option<String>,

    /// New image URL
    #[arg(long)]
    image_url: Option<String>,

    /// New source URL
    #[arg(long)]
    source_url: Option<String>,
}

impl Edit {
    fn update(&self) -> ArticleUpdate {
        ArticleUpdate {
            title: self.title.clone(),
            slug: self.slug.clone().map(Some),
            summary: self.summary.clone().map(Some),
            author: self.author.clone().map(Some),
            image_url: self.image_url.clone().map(Some),
            source_url: self.source_url.clone().map(Some),
            ..ArticleUpdate::default()
        }
    }
}

impl News {
    #[instrument(level = "debug", skip(state))]
    pub async fn run(self, state: &AppState) -> anyhow::Result<()> {
        let desk = state.desk();
        let dates = DateFormatter::new(state.config().timezone());
        let mut listing = Optimistic::new(desk.list().await?);

        let (outcome, success) = match self {
            Self::List => {
                print_table(listing.get(), &dates);
                return Ok(());
            }
            Self::Draft { topic } => {
                let outcome = listing
                    .update(
                        |_| {},
                        |mut articles| async move {
                            let draft = desk.create_draft(&topic).await?;
                            articles.insert(0, draft);
                            Ok::<_, DeskError>(articles)
                        },
                    )
                    .await
                    .map(|_| ());
                (outcome, "Draft created.")
            }
            Self::Edit(edit) => {
                let update = edit.update();
                let outcome = edit_article(
                    &mut listing,
                    edit.id,
                    |article| article.apply(&update, chrono::Utc::now()),
                    desk.update(edit.id, &update),
                )
                .await;
                (outcome, "Article updated.")
            }
            Self::Publish { id, at } => {
                let at = at
                    .map(|raw| {
                        parse_date(&raw, state.config().timezone())
                            .ok_or_else(|| anyhow::anyhow!("'{raw}' is not a date"))
                    })
                    .transpose()?;
                let outcome = edit_article(
                    &mut listing,
                    id,
                    |article| article.status = ArticleStatus::Published,
                    desk.publish(id, at),
                )
                .await;
                (outcome, "Article published.")
            }
            Self::Unpublish { id } => {
                let outcome = edit_article(
                    &mut listing,
                    id,
                    |article| article.status = ArticleStatus::Draft,
                    desk.unpublish(id),
                )
                .await;
                (outcome, "Article moved back to draft.")
            }
            Self::Delete { id, yes } => {
                let Some(article) = listing.get().iter().find(|article| article.id == id) else {
                    anyhow::bail!("Article {id} not found");
                };
                if !yes
                    && !Confirm::new()
                        .with_prompt(format!("Delete \"{}\"?", article.title))
                        .default(false)
                        .interact()?
                {
                    println!("Cancelled");
                    return Ok(());
                }
                let outcome = listing
                    .update(
                        |articles| articles.retain(|article| article.id != id),
                        |articles| async move {
                            desk.delete(id).await?;
                            Ok::<_, DeskError>(articles)
                        },
                    )
                    .await
                    .map(|_| ());
                (outcome, "Article deleted.")
            }
        };

        match outcome {
            Ok(()) => {
                println!("{}", format!("✅ {success}").success());
                print_table(listing.get(), &dates);
                Ok(())
            }
            Err(error) => {
                eprintln!("{}", format!("⚠️  {error}").warning());
                Err(error.into())
            }
        }
    }
}

/// Applies `change` to the listed article, then reconciles with the saved
/// result of `action`. The listing is restored if `action` fails.
async fn edit_article(
    listing: &mut Optimistic<Vec<NewsArticle>>,
    id: i64,
    change: impl FnOnce(&mut NewsArticle),
    action: impl Future<Output = Result<NewsArticle, DeskError>>,
) -> Result<(), DeskError> {
    listing
        .update(
            |articles| {
                if let Some(article) = articles.iter_mut().find(|article| article.id == id) {
                    change(article);
                }
            },
            |mut articles| async move {
                let saved = action.await?;
                if let Some(slot) = articles.iter_mut().find(|article| article.id == saved.id) {
                    *slot = saved;
                }
                Ok::<_, DeskError>(articles)
            },
        )
        .await
        .map(|_| ())
}

fn status_label(status: ArticleStatus) -> String {
    match status {
        ArticleStatus::Draft => "draft".warning(),
        ArticleStatus::Published => "published".success(),
        ArticleStatus::Archived => "archived".dim(),
    }
}

fn print_table(articles: &[NewsArticle], dates: &DateFormatter) {
    if articles.is_empty() {
        println!("No articles yet. Start one with 'mmabox news draft <topic>'.");
        return;
    }

    println!();
    if is_narrow() {
        for article in articles {
            println!("#{} {}", article.id, article.title);
            println!("   {}", status_label(article.status));
        }
        return;
    }

    println!("{:<5} {:<10} {:<16} {}", "Id", "Status", "Published", "Title");
    println!("{}", "─".repeat(72).dim());
    for article in articles {
        let published = article
            .published_at
            .map_or_else(|| "–".to_string(), |at| dates.format_day(Some(at)));
        // Pad before colouring so escape codes do not skew the columns.
        let status = status_label(article.status);
        let padding = " ".repeat(10usize.saturating_sub(article.status.as_str().len()));
        println!(
            "{:<5} {status}{padding} {:<16} {}",
            article.id, published, article.title
        );
    }
}

#[cfg(test)]
mod tests {
    use mmabox::storage::seed::Seed;

    use super::*;

    fn listing() -> Optimistic<Vec<NewsArticle>> {
        Optimistic::new(Seed::builtin().articles)
    }

    #[test]
    fn edit_flags_become_an_update() {
        let edit = Edit {
            id: 4,
            title: None,
            slug: None,
            summary: None,
            author: Some("Desk Editor".to_string()),
            image_url: None,
            source_url: None,
        };
        let update = edit.update();

        assert_eq!(update.author, Some(Some("Desk Editor".to_string())));
        assert_eq!(update.title, None);
        assert_eq!(update.content, None);
    }

    #[tokio::test]
    async fn failed_actions_restore_the_listing() {
        let mut listing = listing();
        let before = listing.get().clone();

        let outcome = edit_article(
            &mut listing,
            4,
            |article| article.status = ArticleStatus::Published,
            async { Err(DeskError::NotFound(4)) },
        )
        .await;

        assert!(outcome.is_err());
        assert_eq!(listing.get(), &before);
    }

    #[tokio::test]
    async fn successful_actions_adopt_the_saved_article() {
        let mut listing = listing();
        let mut saved = listing.get()[3].clone();
        saved.author = Some("Desk Editor".to_string());
        saved.status = ArticleStatus::Published;

        edit_article(
            &mut listing,
            4,
            |article| article.status = ArticleStatus::Published,
            async move { Ok(saved) },
        )
        .await
        .unwrap();

        let article = listing.get().iter().find(|article| article.id == 4).unwrap();
        assert_eq!(article.author.as_deref(), Some("Desk Editor"));
    }
}
