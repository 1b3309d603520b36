use clap::Parser;
use mmabox::{
    AppState, Event,
    domain::{Bout, DateFormatter},
};
use tracing::instrument;

use super::terminal::{Colorize, is_narrow};

#[derive(Debug, Parser)]
pub struct Card {
    /// Event id or slug
    event: String,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Card {
    #[instrument(level = "debug", skip(self, state), fields(event = %self.event))]
    pub async fn run(self, state: &AppState) -> anyhow::Result<()> {
        let Some(event) = state.catalog().find_event(&self.event).await else {
            anyhow::bail!("No published event matches '{}'", self.event);
        };

        match self.output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&event.ordered_card())?);
            }
            OutputFormat::Table => {
                let dates = DateFormatter::new(state.config().timezone());
                for line in render(&event, &dates, is_narrow()) {
                    println!("{line}");
                }
            }
        }
        Ok(())
    }
}

fn bout_line(bout: &Bout, narrow: bool) -> String {
    let mut line = bout.matchup();
    if bout.is_title_fight {
        line.push_str(" 🏆");
    }
    if !narrow {
        if let Some(weight_class) = &bout.weight_class {
            line = format!("{line:<40} {}", weight_class.dim());
        }
    }
    if bout.is_cancelled() {
        format!("{} {}", line.dim(), "(cancelled)".warning())
    } else {
        line
    }
}

/// The event header followed by the ordered card, grouped by position.
fn render(event: &Event, dates: &DateFormatter, narrow: bool) -> Vec<String> {
    let mut lines = vec![
        format!("{} · {}", event.title().strong(), event.league),
        dates.format(event.date),
    ];
    if let Some(location) = &event.location {
        lines.push(location.clone());
    }

    let card = event.ordered_card();
    if card.is_empty() {
        lines.push(String::new());
        lines.push("Fight card to be announced.".dim());
        return lines;
    }

    let mut heading = None;
    for bout in &card {
        let label = bout.display_position().label();
        if heading != Some(label) {
            lines.push(String::new());
            lines.push(label.info());
            heading = Some(label);
        }
        lines.push(format!("  {}", bout_line(bout, narrow)));
        if let Some(notes) = &bout.notes {
            lines.push(format!("    {}", notes.dim()));
        }
        if let Some(result) = &bout.result {
            lines.push(format!(
                "    {} def. {} via {}",
                result.winner.success(),
                result.loser,
                result.method
            ));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use mmabox::storage::seed::Seed;

    use super::*;

    fn event(id: i64) -> Event {
        Seed::builtin()
            .events
            .into_iter()
            .find(|event| event.id == id)
            .unwrap()
    }

    #[test]
    fn groups_bouts_under_their_position() {
        let lines = render(&event(1), &DateFormatter::default(), true);
        let position = |needle: &str| lines.iter().position(|line| line.contains(needle)).unwrap();

        assert!(position("Main Event") < position("Alex Johnson vs. James Thompson"));
        assert!(position("James Thompson") < position("Co-Main Event"));
        assert!(position("Co-Main Event") < position("Main Card"));
        assert!(position("Ken Sato") < position("Omar Haddad"));
        assert!(position("Preliminary Card") < position("Cancelled"));
        assert!(lines.iter().any(|line| line.contains("(cancelled)")));
    }

    #[test]
    fn shows_results() {
        let lines = render(&event(5), &DateFormatter::default(), true);
        assert!(lines.iter().any(|line| line.contains("def.") && line.contains("KO/TKO")));
    }

    #[test]
    fn empty_cards_are_announced_later() {
        let mut event = event(2);
        event.fight_card.clear();

        let lines = render(&event, &DateFormatter::default(), false);
        assert!(lines.last().unwrap().contains("Fight card to be announced."));
    }
}
