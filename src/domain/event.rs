//! Events and their fight cards.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publication state of an event.
///
/// Stored upper-case in the `events.status` column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    /// Not visible on the site.
    #[default]
    Draft,
    /// Visible on the site.
    Published,
}

impl EventStatus {
    /// The column value for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Published => "PUBLISHED",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A promoted MMA event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Datastore identifier.
    pub id: i64,
    /// Promotion, e.g. `UFC`.
    pub league: String,
    /// Display name, e.g. `UFC 298`.
    #[serde(default)]
    pub event_name: Option<String>,
    /// URL slug.
    #[serde(default)]
    pub slug: Option<String>,
    /// Headline bout, e.g. `Johnson vs. Thompson`.
    #[serde(default)]
    pub main_card: Option<String>,
    /// Scheduled start.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// Venue and city.
    #[serde(default)]
    pub location: Option<String>,
    /// Broadcast details.
    #[serde(default)]
    pub how_to_watch: Option<String>,
    /// Broadcast link.
    #[serde(default)]
    pub how_to_watch_url: Option<String>,
    /// Ticket purchase link.
    #[serde(default)]
    pub ticket_link: Option<String>,
    /// Poster image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Publication state.
    #[serde(default)]
    pub status: EventStatus,
    /// Short description shown on the event page.
    #[serde(default)]
    pub description: Option<String>,
    /// Row creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Row modification time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Bouts in the order they were entered.
    #[serde(default)]
    pub fight_card: Vec<Bout>,
}

impl Event {
    /// The name to show for the event, falling back to the headline bout.
    #[must_use]
    pub fn title(&self) -> &str {
        self.event_name
            .as_deref()
            .or(self.main_card.as_deref())
            .unwrap_or("Event")
    }

    /// Whether the event is visible on the site.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == EventStatus::Published
    }

    /// The two sides of the headline bout, split on `vs.`.
    #[must_use]
    pub fn headliners(&self) -> Option<(&str, &str)> {
        let main_card = self.main_card.as_deref()?;
        let (red, blue) = main_card
            .split_once(" vs. ")
            .or_else(|| main_card.split_once(" vs "))?;
        Some((red.trim(), blue.trim()))
    }

    /// The fight card in display order.
    #[must_use]
    pub fn ordered_card(&self) -> Vec<Bout> {
        order_fight_card(self.fight_card.clone())
    }
}

/// Slot of a bout within an event's lineup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardPosition {
    /// Last bout of the night.
    MainEvent,
    /// Bout before the main event.
    CoMain,
    /// Any other bout on the main card.
    MainCard,
    /// Preliminary card.
    Prelim,
    /// Title bout that is neither main nor co-main event.
    TitleFight,
    /// Bout that will not take place.
    Cancelled,
    /// Any value this version does not recognise.
    #[serde(other)]
    Unknown,
}

impl CardPosition {
    /// Sort rank of a recognised position. `Unknown` has none.
    #[must_use]
    pub const fn rank(self) -> Option<u32> {
        match self {
            Self::MainEvent => Some(1),
            Self::CoMain => Some(2),
            Self::TitleFight => Some(3),
            Self::MainCard => Some(4),
            Self::Prelim => Some(5),
            Self::Cancelled => Some(6),
            Self::Unknown => None,
        }
    }

    /// Human label for the position.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MainEvent => "Main Event",
            Self::CoMain => "Co-Main Event",
            Self::MainCard => "Main Card",
            Self::Prelim => "Preliminary Card",
            Self::TitleFight => "Title Fight",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Bout",
        }
    }
}

/// Rank of entries with no usable position or flag.
pub const UNSPECIFIED_RANK: u32 = 99;

/// Bout order assumed when none is recorded.
pub const DEFAULT_BOUT_ORDER: u32 = 99;

/// Outcome of a completed bout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoutResult {
    /// Winning fighter.
    pub winner: String,
    /// Losing fighter.
    pub loser: String,
    /// Finish, e.g. `KO/TKO` or `Decision (unanimous)`.
    pub method: String,
    /// Round the bout ended in.
    #[serde(default, deserialize_with = "lenient::number")]
    pub round: Option<u32>,
    /// Time within the round, e.g. `4:31`.
    #[serde(default)]
    pub time: Option<String>,
}

/// An entry on a fight card.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bout {
    /// First-named fighter.
    pub fighter1: String,
    /// Second-named fighter.
    pub fighter2: String,
    /// Weight class, e.g. `Lightweight`.
    #[serde(default)]
    pub weight_class: Option<String>,
    /// Whether a title is on the line.
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_title_fight: bool,
    /// Slot on the card.
    #[serde(default)]
    pub card_position: Option<CardPosition>,
    /// Explicit position within the slot, ascending.
    #[serde(default, deserialize_with = "lenient::number")]
    pub bout_order: Option<u32>,
    /// Free text shown under the bout.
    #[serde(default)]
    pub notes: Option<String>,
    /// Outcome, once known.
    #[serde(default)]
    pub result: Option<BoutResult>,
    /// Legacy main-event flag, consulted when no position is recorded.
    #[serde(
        default,
        skip_serializing_if = "std::ops::Not::not",
        deserialize_with = "lenient::flag"
    )]
    pub is_main_event: bool,
    /// Legacy co-main flag, consulted when no position is recorded.
    #[serde(
        default,
        skip_serializing_if = "std::ops::Not::not",
        deserialize_with = "lenient::flag"
    )]
    pub is_co_main_event: bool,
}

impl Bout {
    /// Creates a bout between two fighters with nothing else recorded.
    #[must_use]
    pub fn new(fighter1: impl Into<String>, fighter2: impl Into<String>) -> Self {
        Self {
            fighter1: fighter1.into(),
            fighter2: fighter2.into(),
            ..Self::default()
        }
    }

    /// Sets the card position.
    #[must_use]
    pub const fn at(mut self, position: CardPosition) -> Self {
        self.card_position = Some(position);
        self
    }

    /// Sets the bout order.
    #[must_use]
    pub const fn ordered(mut self, order: u32) -> Self {
        self.bout_order = Some(order);
        self
    }

    /// Primary sort key.
    ///
    /// A recognised card position wins. Otherwise the legacy flags decide,
    /// and entries with neither sort last.
    #[must_use]
    pub fn rank(&self) -> u32 {
        if let Some(rank) = self.card_position.and_then(CardPosition::rank) {
            return rank;
        }
        if self.is_main_event {
            1
        } else if self.is_co_main_event {
            2
        } else if self.is_title_fight {
            3
        } else {
            UNSPECIFIED_RANK
        }
    }

    /// Secondary sort key.
    #[must_use]
    pub fn order(&self) -> u32 {
        self.bout_order.unwrap_or(DEFAULT_BOUT_ORDER)
    }

    /// The position the bout is displayed under.
    #[must_use]
    pub fn display_position(&self) -> CardPosition {
        match self.card_position {
            Some(position) if position != CardPosition::Unknown => position,
            _ => match self.rank() {
                1 => CardPosition::MainEvent,
                2 => CardPosition::CoMain,
                3 => CardPosition::TitleFight,
                _ => CardPosition::Unknown,
            },
        }
    }

    /// Whether the bout has been called off.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.card_position == Some(CardPosition::Cancelled)
    }

    /// `Fighter A vs. Fighter B`.
    #[must_use]
    pub fn matchup(&self) -> String {
        format!("{} vs. {}", self.fighter1, self.fighter2)
    }
}

/// Sorts a fight card into display order.
///
/// Bouts are ordered by [`Bout::rank`] and then by [`Bout::order`]. The sort
/// is stable, so bouts that tie on both keys keep their input order.
#[must_use]
pub fn order_fight_card(mut bouts: Vec<Bout>) -> Vec<Bout> {
    bouts.sort_by_key(|bout| (bout.rank(), bout.order()));
    bouts
}

/// Decodes a stored fight card one bout at a time.
///
/// Entries that are not bouts are skipped with a warning, so one bad entry
/// never hides the rest of the card. A value that is not an array yields an
/// empty card.
#[must_use]
pub fn decode_fight_card(value: serde_json::Value) -> Vec<Bout> {
    let serde_json::Value::Array(entries) = value else {
        if !value.is_null() {
            tracing::warn!(%value, "Fight card is not a list; ignoring it");
        }
        return Vec::new();
    };
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(bout) => Some(bout),
            Err(error) => {
                tracing::warn!(index, %error, "Skipping unreadable bout");
                None
            }
        })
        .collect()
}

/// Field decoders that tolerate hand-edited JSON.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// `true`, `false`, `"true"`, `"false"`, `1`, `0`; anything else is `false`.
    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Bool(flag) => flag,
            Value::String(text) => text.trim().eq_ignore_ascii_case("true"),
            Value::Number(number) => number.as_u64() == Some(1),
            _ => false,
        })
    }

    /// A non-negative integer, possibly written as a string. Anything else
    /// is `None`.
    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_case::test_case;

    use super::*;

    fn names(bouts: &[Bout]) -> Vec<&str> {
        bouts.iter().map(|b| b.fighter1.as_str()).collect()
    }

    #[test]
    fn hand_edited_fields_are_tolerated() {
        let bout: Bout = serde_json::from_str(
            r#"{
                "fighter1": "Alex Johnson",
                "fighter2": "James Thompson",
                "is_title_fight": null,
                "is_main_event": "true",
                "bout_order": "2",
                "result": {
                    "winner": "Alex Johnson",
                    "loser": "James Thompson",
                    "method": "KO/TKO",
                    "round": "2"
                }
            }"#,
        )
        .unwrap();

        assert!(!bout.is_title_fight);
        assert!(bout.is_main_event);
        assert_eq!(bout.bout_order, Some(2));
        assert_eq!(bout.result.and_then(|result| result.round), Some(2));
    }

    #[test]
    fn unreadable_bouts_do_not_hide_the_rest_of_the_card() {
        let card = decode_fight_card(serde_json::json!([
            {"fighter1": "Alex Johnson", "fighter2": "James Thompson", "bout_order": "1"},
            {"fighter1": 42},
            "not a bout",
            {"fighter1": "Ryan Cole", "fighter2": "Dane Porter", "is_title_fight": null},
        ]));

        assert_eq!(names(&card), ["Alex Johnson", "Ryan Cole"]);
    }

    #[test_case(serde_json::Value::Null; "null")]
    #[test_case(serde_json::json!({"fighter1": "a"}); "object")]
    fn non_list_cards_are_empty(value: serde_json::Value) {
        assert!(decode_fight_card(value).is_empty());
    }

    #[test_case(CardPosition::MainEvent, 1)]
    #[test_case(CardPosition::CoMain, 2)]
    #[test_case(CardPosition::TitleFight, 3)]
    #[test_case(CardPosition::MainCard, 4)]
    #[test_case(CardPosition::Prelim, 5)]
    #[test_case(CardPosition::Cancelled, 6)]
    fn position_rank(position: CardPosition, expected: u32) {
        assert_eq!(Bout::new("a", "b").at(position).rank(), expected);
    }

    #[test]
    fn legacy_flags_fill_in_for_missing_position() {
        let main = Bout {
            is_main_event: true,
            ..Bout::new("a", "b")
        };
        let co_main = Bout {
            is_co_main_event: true,
            ..Bout::new("a", "b")
        };
        let title = Bout {
            is_title_fight: true,
            ..Bout::new("a", "b")
        };

        assert_eq!(main.rank(), 1);
        assert_eq!(co_main.rank(), 2);
        assert_eq!(title.rank(), 3);
        assert_eq!(Bout::new("a", "b").rank(), UNSPECIFIED_RANK);
    }

    #[test]
    fn unknown_position_falls_back_to_flags() {
        let bout: Bout = serde_json::from_value(serde_json::json!({
            "fighter1": "a",
            "fighter2": "b",
            "card_position": "EARLY_PRELIM",
            "is_title_fight": true,
        }))
        .unwrap();

        assert_eq!(bout.card_position, Some(CardPosition::Unknown));
        assert_eq!(bout.rank(), 3);
        assert_eq!(bout.display_position(), CardPosition::TitleFight);
    }

    #[test]
    fn orders_by_rank_then_bout_order() {
        let card = vec![
            Bout::new("prelim", "x").at(CardPosition::Prelim),
            Bout::new("main-card-2", "x").at(CardPosition::MainCard).ordered(2),
            Bout::new("main", "x").at(CardPosition::MainEvent),
            Bout::new("main-card-1", "x").at(CardPosition::MainCard).ordered(1),
            Bout::new("loose", "x"),
            Bout::new("co-main", "x").at(CardPosition::CoMain),
            Bout::new("off", "x").at(CardPosition::Cancelled),
        ];

        let ordered = order_fight_card(card);

        assert_eq!(
            names(&ordered),
            [
                "main",
                "co-main",
                "main-card-1",
                "main-card-2",
                "prelim",
                "off",
                "loose"
            ]
        );
    }

    #[test]
    fn missing_bout_order_sorts_after_explicit_order() {
        let card = vec![
            Bout::new("unordered", "x").at(CardPosition::Prelim),
            Bout::new("ordered", "x").at(CardPosition::Prelim).ordered(98),
        ];

        assert_eq!(names(&order_fight_card(card)), ["ordered", "unordered"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let card = vec![
            Bout::new("first", "x").at(CardPosition::Prelim),
            Bout::new("second", "x").at(CardPosition::Prelim),
            Bout::new("third", "x").at(CardPosition::Prelim),
        ];

        assert_eq!(
            names(&order_fight_card(card)),
            ["first", "second", "third"]
        );
    }

    #[test]
    fn headliners_split_main_card() {
        let event = Event {
            main_card: Some("Johnson vs. Thompson".to_string()),
            ..sample_event()
        };
        assert_eq!(event.headliners(), Some(("Johnson", "Thompson")));
    }

    #[test]
    fn title_falls_back_to_main_card() {
        let event = Event {
            event_name: None,
            main_card: Some("Lee vs. Garcia".to_string()),
            ..sample_event()
        };
        assert_eq!(event.title(), "Lee vs. Garcia");
    }

    #[test]
    fn status_uses_upper_case_column_values() {
        assert_eq!(
            serde_json::to_value(EventStatus::Published).unwrap(),
            "PUBLISHED"
        );
    }

    fn sample_event() -> Event {
        Event {
            id: 1,
            league: "UFC".to_string(),
            event_name: Some("UFC 298".to_string()),
            slug: None,
            main_card: None,
            date: None,
            location: None,
            how_to_watch: None,
            how_to_watch_url: None,
            ticket_link: None,
            image_url: None,
            status: EventStatus::Published,
            description: None,
            created_at: None,
            updated_at: None,
            fight_card: Vec::new(),
        }
    }

    fn arb_position() -> impl Strategy<Value = Option<CardPosition>> {
        prop_oneof![
            Just(None),
            Just(Some(CardPosition::MainEvent)),
            Just(Some(CardPosition::CoMain)),
            Just(Some(CardPosition::MainCard)),
            Just(Some(CardPosition::Prelim)),
            Just(Some(CardPosition::TitleFight)),
            Just(Some(CardPosition::Cancelled)),
            Just(Some(CardPosition::Unknown)),
        ]
    }

    prop_compose! {
        fn arb_bout()(
            name in "[a-z]{1,8}",
            position in arb_position(),
            order in proptest::option::of(0u32..120),
            title in any::<bool>(),
            main in any::<bool>(),
        ) -> Bout {
            Bout {
                is_title_fight: title,
                is_main_event: main,
                card_position: position,
                bout_order: order,
                ..Bout::new(name, "opponent")
            }
        }
    }

    proptest! {
        #[test]
        fn ordering_is_idempotent(card in proptest::collection::vec(arb_bout(), 0..24)) {
            let once = order_fight_card(card);
            let twice = order_fight_card(once.clone());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn nothing_outranks_a_main_event(card in proptest::collection::vec(arb_bout(), 0..24)) {
            let ordered = order_fight_card(card);
            for (i, bout) in ordered.iter().enumerate() {
                if bout.card_position != Some(CardPosition::MainEvent) {
                    continue;
                }
                for earlier in &ordered[..i] {
                    prop_assert_eq!(earlier.rank(), 1);
                    prop_assert!(earlier.order() <= bout.order());
                }
            }
        }
    }
}
