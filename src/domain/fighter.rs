//! Fighter profiles.

use serde::{Deserialize, Serialize};

/// A fighter profile. Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fighter {
    /// Identifier used in profile URLs.
    pub id: i64,
    /// Display name, nickname included.
    pub name: String,
    /// Win-loss-draw record, e.g. `24-2-0`.
    pub record: String,
    /// Weight division.
    pub division: String,
    /// Portrait.
    #[serde(default)]
    pub image: Option<String>,
    /// Age in years.
    #[serde(default)]
    pub age: Option<u32>,
    /// Height, e.g. `5'10"`.
    #[serde(default)]
    pub height: Option<String>,
    /// Fighting weight, e.g. `155 lbs`.
    #[serde(default)]
    pub weight: Option<String>,
    /// Reach, e.g. `72"`.
    #[serde(default)]
    pub reach: Option<String>,
    /// Orthodox or southpaw.
    #[serde(default)]
    pub stance: Option<String>,
    /// Training camp.
    #[serde(default)]
    pub team: Option<String>,
    /// Nationality.
    #[serde(default)]
    pub country: Option<String>,
    /// Short biography.
    #[serde(default)]
    pub bio: Option<String>,
    /// Shown on the homepage.
    #[serde(default)]
    pub featured: bool,
}

impl Fighter {
    /// Initials used when there is no portrait.
    #[must_use]
    pub fn initials(&self) -> String {
        self.name.chars().take(2).collect::<String>().to_uppercase()
    }

    /// Profile facts that are known, as label/value pairs.
    #[must_use]
    pub fn stats(&self) -> Vec<(&'static str, String)> {
        [
            ("Age", self.age.map(|age| age.to_string())),
            ("Height", self.height.clone()),
            ("Weight", self.weight.clone()),
            ("Reach", self.reach.clone()),
            ("Stance", self.stance.clone()),
            ("Country", self.country.clone()),
            ("Team", self.team.clone()),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.map(|value| (label, value)))
        .collect()
    }
}

/// Division filter value meaning "every division".
pub const ALL_DIVISIONS: &str = "All";

/// Filters fighters by a case-insensitive name search and a division.
///
/// An empty search matches every name; [`ALL_DIVISIONS`] or no division
/// matches every division.
#[must_use]
pub fn filter_fighters<'a>(
    fighters: &'a [Fighter],
    search: &str,
    division: Option<&str>,
) -> Vec<&'a Fighter> {
    let needle = search.trim().to_lowercase();
    fighters
        .iter()
        .filter(|fighter| needle.is_empty() || fighter.name.to_lowercase().contains(&needle))
        .filter(|fighter| match division {
            None | Some(ALL_DIVISIONS | "") => true,
            Some(division) => fighter.division == division,
        })
        .collect()
}

/// Distinct divisions in first-seen order, preceded by [`ALL_DIVISIONS`].
#[must_use]
pub fn divisions(fighters: &[Fighter]) -> Vec<&str> {
    let mut divisions = vec![ALL_DIVISIONS];
    for fighter in fighters {
        if !divisions.contains(&fighter.division.as_str()) {
            divisions.push(&fighter.division);
        }
    }
    divisions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fighter(id: i64, name: &str, division: &str) -> Fighter {
        Fighter {
            id,
            name: name.to_string(),
            record: "1-0-0".to_string(),
            division: division.to_string(),
            image: None,
            age: Some(29),
            height: None,
            weight: Some("155 lbs".to_string()),
            reach: None,
            stance: None,
            team: None,
            country: None,
            bio: None,
            featured: false,
        }
    }

    fn roster() -> Vec<Fighter> {
        vec![
            fighter(1, "Alex Johnson", "Lightweight"),
            fighter(2, "Sarah Williams", "Women's Bantamweight"),
            fighter(3, "Mike Rodriguez", "Middleweight"),
            fighter(4, "James Thompson", "Lightweight"),
        ]
    }

    #[test]
    fn search_is_case_insensitive() {
        let roster = roster();
        let found = filter_fighters(&roster, "JOHN", None);
        assert_eq!(found.iter().map(|f| f.id).collect::<Vec<_>>(), [1]);
    }

    #[test]
    fn division_filter() {
        let roster = roster();
        let found = filter_fighters(&roster, "", Some("Lightweight"));
        assert_eq!(found.iter().map(|f| f.id).collect::<Vec<_>>(), [1, 4]);
        assert_eq!(filter_fighters(&roster, "", Some(ALL_DIVISIONS)).len(), 4);
    }

    #[test]
    fn divisions_are_distinct_and_ordered() {
        assert_eq!(
            divisions(&roster()),
            ["All", "Lightweight", "Women's Bantamweight", "Middleweight"]
        );
    }

    #[test]
    fn stats_skip_unknown_values() {
        assert_eq!(
            fighter(1, "Alex", "Lightweight").stats(),
            [("Age", "29".to_string()), ("Weight", "155 lbs".to_string())]
        );
    }

    #[test]
    fn initials_are_upper_case() {
        assert_eq!(fighter(1, "alex", "x").initials(), "AL");
    }
}
