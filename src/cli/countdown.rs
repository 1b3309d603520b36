use std::io::Write as _;

use clap::Parser;
use mmabox::{
    AppState, Ticker,
    domain::{Countdown as State, TimeLeft},
    storage::system_clock,
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
pub struct Countdown {
    /// Event id or slug
    event: String,

    /// Print the current state once and exit
    #[arg(long)]
    once: bool,
}

impl Countdown {
    #[instrument(level = "debug", skip(self, state), fields(event = %self.event))]
    pub async fn run(self, state: &AppState) -> anyhow::Result<()> {
        let Some(event) = state.catalog().find_event(&self.event).await else {
            anyhow::bail!("No published event matches '{}'", self.event);
        };
        let Some(target) = event.date else {
            anyhow::bail!("{} has no announced start time", event.title());
        };

        println!("{}", event.title().strong());
        let ticker = Ticker::start(target, system_clock());
        let mut updates = ticker.subscribe();
        let mut current = *updates.borrow_and_update();
        show(current)?;

        while !self.once && !current.is_elapsed() {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    current = *updates.borrow_and_update();
                    show(current)?;
                }
                _ = tokio::signal::ctrl_c() => break,
            }
        }
        println!();
        Ok(())
    }
}

fn show(countdown: State) -> std::io::Result<()> {
    let line = match countdown {
        State::Counting(left) => format_time_left(left),
        State::Elapsed => format!(
            "{} {}",
            format_time_left(TimeLeft::default()),
            "Started".success()
        ),
    };
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "\r{line}")?;
    stdout.flush()
}

fn format_time_left(left: TimeLeft) -> String {
    format!(
        "{}d {:02}h {:02}m {:02}s",
        left.days, left.hours, left.minutes, left.seconds
    )
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(TimeLeft::default() => "0d 00h 00m 00s"; "zero")]
    #[test_case(TimeLeft { days: 6, hours: 2, minutes: 5, seconds: 9 } => "6d 02h 05m 09s"; "padded")]
    #[test_case(TimeLeft { days: 120, hours: 23, minutes: 59, seconds: 59 } => "120d 23h 59m 59s"; "long")]
    fn formats(left: TimeLeft) -> String {
        format_time_left(left)
    }
}
