use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    ArticleStatus, Bout, BoutResult, CardPosition, Event, EventStatus, Fighter, NewsArticle,
};

/// Content for the mock store and the fighter roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    /// Events in any state.
    #[serde(default)]
    pub events: Vec<Event>,
    /// Articles in any state.
    #[serde(default)]
    pub articles: Vec<NewsArticle>,
    /// Fighter profiles.
    #[serde(default)]
    pub fighters: Vec<Fighter>,
}

/// Errors raised while reading a seed file.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// The file could not be read.
    #[error("Failed to read seed file: {0}")]
    Read(#[from] std::io::Error),

    /// The file is not a valid seed document.
    #[error("Failed to parse seed file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl Seed {
    /// The content the site ships with.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            events: events(),
            articles: articles(),
            fighters: fighters(),
        }
    }

    /// Reads a YAML seed document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parses a YAML seed document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not describe a seed.
    pub fn from_yaml(content: &str) -> Result<Self, SeedError> {
        Ok(serde_yaml::from_str(content)?)
    }
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).single()
}

fn bout(red: &str, blue: &str, weight_class: &str, position: CardPosition) -> Bout {
    Bout {
        weight_class: Some(weight_class.to_string()),
        is_title_fight: position == CardPosition::TitleFight,
        ..Bout::new(red, blue).at(position)
    }
}

#[allow(clippy::too_many_arguments)]
fn event(
    id: i64,
    league: &str,
    name: &str,
    main_card: &str,
    date: Option<DateTime<Utc>>,
    location: &str,
    description: &str,
    fight_card: Vec<Bout>,
) -> Event {
    Event {
        id,
        league: league.to_string(),
        event_name: Some(name.to_string()),
        slug: Some(crate::domain::generate_slug(name)),
        main_card: Some(main_card.to_string()),
        date,
        location: Some(location.to_string()),
        how_to_watch: None,
        how_to_watch_url: None,
        ticket_link: None,
        image_url: None,
        status: EventStatus::Published,
        description: Some(description.to_string()),
        created_at: at(2025, 3, 1, 12, 0),
        updated_at: None,
        fight_card,
    }
}

fn events() -> Vec<Event> {
    vec![
        Event {
            how_to_watch: Some("UFC Fight Pass and ESPN+".to_string()),
            how_to_watch_url: Some("https://www.espn.com/espnplus/".to_string()),
            ticket_link: Some("https://www.ufc.com/tickets".to_string()),
            ..event(
                1,
                "UFC",
                "UFC 298",
                "Johnson vs. Thompson",
                at(2025, 4, 16, 2, 0),
                "Las Vegas, NV",
                "An epic championship showdown at the UFC Apex.",
                vec![
                    bout("Ryan Cole", "Dane Porter", "Featherweight", CardPosition::Prelim),
                    Bout {
                        notes: Some("Thompson moves up from welterweight".to_string()),
                        ..bout(
                            "Alex Johnson",
                            "James Thompson",
                            "Lightweight",
                            CardPosition::MainEvent,
                        )
                    },
                    bout("Sarah Williams", "Nina Petrova", "Women's Bantamweight", CardPosition::CoMain),
                    bout("Omar Haddad", "Luis Ortega", "Welterweight", CardPosition::MainCard).ordered(2),
                    bout("Ken Sato", "Marco Bianchi", "Flyweight", CardPosition::MainCard).ordered(1),
                    bout("Tom Reyes", "Ali Karimi", "Bantamweight", CardPosition::Cancelled),
                ],
            )
        },
        event(
            2,
            "Bellator",
            "Bellator 300",
            "Davis vs. Rodriguez",
            at(2025, 4, 23, 3, 0),
            "Los Angeles, CA",
            "Bellator celebrates its 300th event with a stacked card.",
            vec![
                bout("Chris Davis", "Mike Rodriguez", "Middleweight", CardPosition::MainEvent),
                bout("Elena Martinez", "Ivy Chen", "Women's Flyweight", CardPosition::TitleFight),
                bout("Sam Brooks", "Jon Weller", "Lightweight", CardPosition::Prelim),
            ],
        ),
        event(
            3,
            "UFC",
            "UFC Fight Night",
            "Lee vs. Garcia",
            at(2025, 5, 6, 0, 0),
            "Miami, FL",
            "Rising stars clash in this exciting Fight Night event.",
            vec![
                Bout {
                    is_main_event: true,
                    weight_class: Some("Welterweight".to_string()),
                    ..Bout::new("Daniel Lee", "Victor Garcia")
                },
                Bout {
                    is_co_main_event: true,
                    weight_class: Some("Heavyweight".to_string()),
                    ..Bout::new("Carlos Mendez", "Boris Ivanov")
                },
            ],
        ),
        Event {
            status: EventStatus::Draft,
            ..event(
                4,
                "UFC",
                "UFC 299",
                "To be announced",
                None,
                "TBA",
                "Card to be announced.",
                Vec::new(),
            )
        },
        Event {
            fight_card: vec![Bout {
                result: Some(BoutResult {
                    winner: "Alex Johnson".to_string(),
                    loser: "Paul Kerr".to_string(),
                    method: "KO/TKO".to_string(),
                    round: Some(2),
                    time: Some("3:12".to_string()),
                }),
                ..bout("Alex Johnson", "Paul Kerr", "Lightweight", CardPosition::MainEvent)
            }],
            ..event(
                5,
                "UFC",
                "UFC 297",
                "Johnson vs. Kerr",
                at(2025, 1, 19, 3, 0),
                "Toronto, ON",
                "Johnson extends his win streak north of the border.",
                Vec::new(),
            )
        },
    ]
}

fn article(
    id: i64,
    title: &str,
    summary: &str,
    content: &str,
    published_at: Option<DateTime<Utc>>,
) -> NewsArticle {
    NewsArticle {
        id,
        title: title.to_string(),
        slug: Some(crate::domain::generate_slug(title)),
        summary: Some(summary.to_string()),
        content: Some(content.to_string()),
        image_url: None,
        source_url: None,
        author: Some("mma.box Staff".to_string()),
        published_at,
        status: ArticleStatus::Published,
        created_at: published_at,
        updated_at: None,
    }
}

fn articles() -> Vec<NewsArticle> {
    vec![
        article(
            1,
            "Champion Announces Retirement After Historic Run",
            "After 10 consecutive title defenses, the legendary champion steps away from the octagon...",
            "In a shocking announcement that has sent ripples through the MMA world, the long-reigning champion has decided to hang up the gloves after an unprecedented run of dominance. The decision comes after their historic tenth consecutive title defense last month, cementing their legacy as one of the all-time greats in the sport.\n\nIn an emotional press conference, the champion cited the desire to leave on their own terms and focus on family and other business ventures outside of fighting. The promotion has not yet announced plans for the now-vacant title, though a tournament featuring the top contenders is reportedly being considered.",
            at(2025, 4, 3, 14, 0),
        ),
        article(
            2,
            "New Tournament Format Announced for Next Season",
            "The promotion unveiled plans for a revolutionary tournament structure beginning next year...",
            "In an exciting development for MMA fans, a major promotion has announced a complete overhaul of its competition format starting next season. The new structure will feature a year-long tournament across all weight classes, with fighters earning points based on their performances.\n\nThe top eight fighters in each division at the end of the regular season will advance to the championship playoffs, where they will compete in a single-elimination tournament to crown the champion. This innovative approach aims to ensure that the most deserving fighters get title opportunities while creating more meaningful and consequential matchups throughout the year.",
            at(2025, 4, 2, 14, 0),
        ),
        article(
            3,
            "Rising Star Signs Multi-Fight Contract After Knockout Win",
            "Following an impressive victory last weekend, the undefeated prospect has signed a new deal...",
            "Fresh off a spectacular knockout victory that had fans on their feet, the rising star has secured their future with a lucrative multi-fight contract extension. The undefeated prospect has been turning heads in the MMA world with their devastating finishing ability and charismatic personality.\n\nThe new deal, reportedly worth several million dollars, will keep them with the promotion for at least five more fights. Promotion officials have indicated that with another win, they could find themselves in title contention before the end of the year. Their next bout is expected to be announced in the coming weeks, with rumors suggesting it could be against a top-five opponent.",
            at(2025, 3, 30, 14, 0),
        ),
        NewsArticle {
            author: None,
            status: ArticleStatus::Draft,
            published_at: None,
            created_at: at(2025, 4, 4, 9, 0),
            ..article(
                4,
                "Title Eliminator Set for Summer Card",
                "Two contenders will meet with a title shot on the line.",
                "Details are still being finalised.",
                None,
            )
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn profile(
    id: i64,
    name: &str,
    record: &str,
    division: &str,
    age: u32,
    height: &str,
    weight: &str,
    reach: &str,
    stance: &str,
    team: &str,
    country: &str,
    bio: &str,
) -> Fighter {
    Fighter {
        age: Some(age),
        height: Some(height.to_string()),
        weight: Some(weight.to_string()),
        reach: Some(reach.to_string()),
        stance: Some(stance.to_string()),
        team: Some(team.to_string()),
        country: Some(country.to_string()),
        bio: Some(bio.to_string()),
        featured: true,
        ..listing(id, name, record, division)
    }
}

fn listing(id: i64, name: &str, record: &str, division: &str) -> Fighter {
    Fighter {
        id,
        name: name.to_string(),
        record: record.to_string(),
        division: division.to_string(),
        image: None,
        age: None,
        height: None,
        weight: None,
        reach: None,
        stance: None,
        team: None,
        country: None,
        bio: None,
        featured: false,
    }
}

fn fighters() -> Vec<Fighter> {
    vec![
        profile(
            1,
            "Alex \"The Destroyer\" Johnson",
            "24-2-0",
            "Lightweight",
            29,
            "5'10\"",
            "155 lbs",
            "72\"",
            "Orthodox",
            "Elite MMA Academy",
            "United States",
            "Alex Johnson has been dominating the lightweight division with his explosive striking and excellent takedown defense. Known for his devastating knockouts, \"The Destroyer\" is currently on a 6-fight win streak and closing in on a title shot.",
        ),
        profile(
            2,
            "Sarah \"Knockout Queen\" Williams",
            "18-0-0",
            "Women's Bantamweight",
            27,
            "5'8\"",
            "135 lbs",
            "69\"",
            "Southpaw",
            "Apex Fight Club",
            "Canada",
            "The undefeated Sarah Williams has taken the women's bantamweight division by storm. With 15 of her 18 victories coming by way of knockout, the \"Knockout Queen\" has earned her nickname through devastating striking performances. Currently the champion, she's looking to continue her historic run of dominance.",
        ),
        profile(
            3,
            "Mike \"Iron Fist\" Rodriguez",
            "22-3-1",
            "Middleweight",
            31,
            "6'2\"",
            "185 lbs",
            "78\"",
            "Orthodox",
            "Warriors Training Center",
            "Brazil",
            "A veteran of the sport, Mike Rodriguez combines technical brilliance with raw power. His journey from the regional circuit to becoming one of the most respected fighters in the middleweight division is a testament to his dedication and resilience. Known for his iron chin and powerful hands, he continues to be a fan favorite.",
        ),
        listing(4, "James \"The Machine\" Thompson", "19-4-2", "Welterweight"),
        listing(5, "Elena \"The Assassin\" Martinez", "15-1-0", "Women's Flyweight"),
        listing(6, "Carlos \"Dynamite\" Mendez", "20-5-0", "Heavyweight"),
    ]
}
