//! Template view models.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::{
    domain::{
        Bout, Countdown, DateFormatter, Event, Fighter, NewsArticle, TimeLeft,
        glossary::{self, Term},
    },
    wallet::Account,
};

/// The connected wallet account on the community page.
#[derive(Debug, Serialize)]
pub struct AccountView {
    pub name: String,
    pub address: String,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            name: account.display_name(),
            address: account.address.as_str().to_string(),
        }
    }
}

/// An event as listed on cards.
#[derive(Debug, Serialize)]
pub struct EventSummary {
    pub id: i64,
    pub path: String,
    pub title: String,
    pub league: String,
    pub main_card: Option<String>,
    pub date: String,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

impl EventSummary {
    pub fn new(event: &Event, dates: &DateFormatter) -> Self {
        Self {
            id: event.id,
            path: format!("/events/{}", event.id),
            title: event.title().to_string(),
            league: event.league.clone(),
            main_card: event.main_card.clone(),
            date: dates.format(event.date),
            location: event.location.clone(),
            image_url: event.image_url.clone(),
        }
    }
}

/// A bout on an event page.
#[derive(Debug, Serialize)]
pub struct BoutView {
    pub matchup: String,
    pub position: &'static str,
    pub weight_class: Option<String>,
    pub is_title_fight: bool,
    pub is_cancelled: bool,
    pub notes: Option<String>,
    pub result: Option<String>,
}

impl From<&Bout> for BoutView {
    fn from(bout: &Bout) -> Self {
        let result = bout.result.as_ref().map(|result| {
            let mut line = format!("{} def. {} via {}", result.winner, result.loser, result.method);
            if let Some(round) = result.round {
                line.push_str(&format!(", R{round}"));
            }
            if let Some(time) = &result.time {
                line.push_str(&format!(" ({time})"));
            }
            line
        });
        Self {
            matchup: bout.matchup(),
            position: bout.display_position().label(),
            weight_class: bout.weight_class.clone(),
            is_title_fight: bout.is_title_fight,
            is_cancelled: bout.is_cancelled(),
            notes: bout.notes.clone(),
            result,
        }
    }
}

/// Initial countdown state rendered with a page.
#[derive(Debug, Serialize)]
pub struct CountdownView {
    pub target: String,
    pub state: &'static str,
    pub left: TimeLeft,
}

impl CountdownView {
    pub fn new(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let countdown = Countdown::at(target, now);
        Self {
            target: target.to_rfc3339_opts(SecondsFormat::Secs, true),
            state: if countdown.is_elapsed() {
                "elapsed"
            } else {
                "counting"
            },
            left: countdown.time_left(),
        }
    }
}

/// An article as listed on cards and shown on its own page.
#[derive(Debug, Serialize)]
pub struct ArticleSummary {
    pub path: String,
    pub title: String,
    pub summary: Option<String>,
    pub author: Option<String>,
    pub date: String,
    pub image_url: Option<String>,
}

impl ArticleSummary {
    pub fn new(article: &NewsArticle, dates: &DateFormatter) -> Self {
        Self {
            path: format!("/news/{}", article.link_slug()),
            title: article.title.clone(),
            summary: article.summary.clone(),
            author: article.author.clone(),
            date: dates.format_day(article.published_at),
            image_url: article.image_url.clone(),
        }
    }
}

/// A fighter in the roster grid.
#[derive(Debug, Serialize)]
pub struct FighterCard {
    pub id: i64,
    pub name: String,
    pub initials: String,
    pub division: String,
    pub record: String,
    pub image: Option<String>,
}

impl From<&Fighter> for FighterCard {
    fn from(fighter: &Fighter) -> Self {
        Self {
            id: fighter.id,
            name: fighter.name.clone(),
            initials: fighter.initials(),
            division: fighter.division.clone(),
            record: fighter.record.clone(),
            image: fighter.image.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TermView {
    pub term: &'static str,
    pub definition: &'static str,
    pub anchor: String,
}

impl From<&Term> for TermView {
    fn from(term: &Term) -> Self {
        Self {
            term: term.term,
            definition: term.definition,
            anchor: term.anchor(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub name: &'static str,
    pub terms: Vec<TermView>,
}

#[derive(Debug, Serialize)]
pub struct LetterGroup {
    pub letter: char,
    pub terms: Vec<TermView>,
}

/// The glossary grouped by category.
pub fn glossary_categories() -> Vec<CategoryView> {
    glossary::GLOSSARY
        .iter()
        .map(|category| CategoryView {
            name: category.name,
            terms: category.terms.iter().map(TermView::from).collect(),
        })
        .collect()
}

/// The glossary grouped by first letter.
pub fn glossary_index() -> Vec<LetterGroup> {
    glossary::terms_by_letter()
        .into_iter()
        .map(|(letter, terms)| LetterGroup {
            letter,
            terms: terms.into_iter().map(TermView::from).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::{BoutResult, CardPosition};

    #[test]
    fn result_line_includes_round_and_time() {
        let mut bout = Bout::new("Johnson", "Thompson").at(CardPosition::MainEvent);
        bout.result = Some(BoutResult {
            winner: "Johnson".to_string(),
            loser: "Thompson".to_string(),
            method: "KO/TKO".to_string(),
            round: Some(2),
            time: Some("3:41".to_string()),
        });

        let view = BoutView::from(&bout);

        assert_eq!(
            view.result.as_deref(),
            Some("Johnson def. Thompson via KO/TKO, R2 (3:41)")
        );
        assert_eq!(view.position, "Main Event");
    }

    #[test]
    fn countdown_view_reports_state() {
        let target = Utc.with_ymd_and_hms(2025, 4, 16, 2, 0, 0).unwrap();

        let counting = CountdownView::new(target, target - chrono::Duration::seconds(90));
        assert_eq!(counting.state, "counting");
        assert_eq!(counting.left.minutes, 1);
        assert_eq!(counting.target, "2025-04-16T02:00:00Z");

        let elapsed = CountdownView::new(target, target);
        assert_eq!(elapsed.state, "elapsed");
        assert_eq!(elapsed.left, TimeLeft::default());
    }

    #[test]
    fn index_groups_are_alphabetical() {
        let letters: Vec<_> = glossary_index().iter().map(|group| group.letter).collect();
        let mut sorted = letters.clone();
        sorted.sort_unstable();
        assert_eq!(letters, sorted);
    }
}
