//! Glossary and FAQ content.

use std::collections::BTreeMap;

use serde::Serialize;

/// A defined term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Term {
    /// The term.
    pub term: &'static str,
    /// Its meaning.
    pub definition: &'static str,
}

impl Term {
    /// Anchor id used to link to the term, e.g. `term-rear-naked-choke-(rnc)`.
    #[must_use]
    pub fn anchor(&self) -> String {
        let words: Vec<_> = self.term.split_whitespace().collect();
        format!("term-{}", words.join("-").to_lowercase())
    }
}

/// Terms sharing a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Category heading.
    pub name: &'static str,
    /// Terms in display order.
    pub terms: &'static [Term],
}

const fn term(term: &'static str, definition: &'static str) -> Term {
    Term { term, definition }
}

/// The glossary, grouped by category.
pub const GLOSSARY: &[Category] = &[
    Category {
        name: "Striking",
        terms: &[
            term("Jab", "A quick, straight punch thrown with the lead hand, primarily used to measure distance, set up combinations, or keep opponents at bay."),
            term("Cross", "A straight punch thrown with the rear hand that typically follows the jab in a combination."),
            term("Hook", "A punch thrown in a semicircular motion with either hand, targeting the side of the opponent's head or body."),
            term("Uppercut", "A vertical, rising punch aimed at the opponent's chin or solar plexus."),
            term("Roundhouse Kick", "A kick executed with a circular motion, using the shin or instep to strike the target. Can be aimed at the legs, body, or head."),
            term("Front Kick", "A straight kick delivered with the ball of the foot, aimed at pushing the opponent away or striking their body/head."),
            term("Superman Punch", "A leaping punch where the fighter pushes off with one leg while simultaneously throwing a cross, giving the appearance of flying forward."),
            term("Elbow Strike", "Various striking techniques using the point or edge of the elbow against an opponent."),
        ],
    },
    Category {
        name: "Grappling & Takedowns",
        terms: &[
            term("Double Leg Takedown", "A wrestling takedown where the fighter shoots in to grab both of the opponent's legs and drives forward to bring them to the ground."),
            term("Single Leg Takedown", "A takedown where the fighter captures one of the opponent's legs and uses it to off-balance and bring them down."),
            term("Clinch", "A standing grappling position where fighters are holding onto each other, typically controlling the head/neck area (collar tie) or body."),
            term("Suplex", "A takedown where the opponent is lifted and thrown backwards, often in an arc. Various types exist, including German and belly-to-back."),
            term("Sprawl", "A defensive technique against takedown attempts where a fighter quickly moves their legs backward while putting their weight on the opponent's upper body."),
            term("Trip", "A takedown that uses the leg, foot, or hip to destabilize an opponent's balance and bring them to the ground."),
            term("Shoot", "The action of quickly dropping levels and moving forward to initiate a wrestling takedown."),
        ],
    },
    Category {
        name: "Ground Positions",
        terms: &[
            term("Mount", "A dominant ground position where a fighter is on top with their knees on either side of the opponent's torso."),
            term("Guard", "A ground position where the bottom fighter has their legs wrapped around the opponent's waist. Variations include closed, open, half, butterfly guard, etc."),
            term("Side Control", "A dominant position where the top fighter lies perpendicular across the opponent's chest, controlling them without the opponent's legs as a barrier."),
            term("Back Mount", "A dominant position where a fighter is behind their opponent with their hooks (feet) inserted inside the opponent's thighs for control."),
            term("North-South", "A controlling position where the top fighter is positioned with their head over the bottom fighter's head, facing in the opposite direction."),
            term("Turtle Position", "A defensive position where a fighter is on hands and knees with their head tucked, protecting their neck and midsection."),
        ],
    },
    Category {
        name: "Submissions",
        terms: &[
            term("Rear Naked Choke (RNC)", "A chokehold applied from behind the opponent, where the arm is wrapped around the neck and pressure is applied to the carotid arteries."),
            term("Guillotine Choke", "A front chokehold where the arm wraps around the opponent's neck while pulling upward, cutting off blood flow or air."),
            term("Armbar", "A joint lock that hyperextends the elbow joint by using the hips against the opponent's arm while controlling their wrist."),
            term("Triangle Choke", "A submission where the legs form a triangle around the opponent's neck and one arm, cutting off blood flow to the brain."),
            term("Kimura", "A shoulder lock achieved by controlling the opponent's arm behind their back and applying rotational pressure."),
            term("Americana", "A shoulder lock similar to the Kimura but applied with the opponent's arm bent and rotated outward."),
            term("D'Arce Choke", "A type of front headlock choke that compresses the arteries of the neck by encircling the neck and one arm with both arms."),
            term("Heel Hook", "A leg lock that twists the heel, causing severe rotation in the knee. One of the most dangerous submissions in MMA."),
        ],
    },
    Category {
        name: "General Terminology",
        terms: &[
            term("Octagon", "The eight-sided cage used in UFC and some other promotions where MMA fights take place."),
            term("Ground and Pound", "A strategy where a fighter takes their opponent to the ground and strikes them repeatedly from a dominant position."),
            term("Tap Out", "The physical act of submitting to a hold by tapping the opponent or mat to signal defeat and avoid injury."),
            term("Cage Control", "A judging criterion referring to which fighter is dictating the location of the fight by effectively using the cage."),
            term("Southpaw", "A fighter who adopts a stance with their right foot and hand forward, opposite to the orthodox stance."),
            term("Orthodox", "The traditional fighting stance with left foot and hand forward for right-handed fighters."),
            term("Counter Striker", "A fighter who prefers to wait for their opponent to attack, then capitalizes on openings with their own strikes."),
            term("Fight IQ", "A fighter's tactical intelligence and ability to make smart decisions during a fight based on circumstances."),
        ],
    },
];

/// Every glossary term in category order.
pub fn all_terms() -> impl Iterator<Item = &'static Term> {
    GLOSSARY.iter().flat_map(|category| category.terms)
}

/// Terms grouped under their upper-case initial, A to Z. Letters with no
/// terms are absent.
#[must_use]
pub fn terms_by_letter() -> BTreeMap<char, Vec<&'static Term>> {
    let mut letters: BTreeMap<char, Vec<&'static Term>> = BTreeMap::new();
    for term in all_terms() {
        if let Some(initial) = term.term.chars().next().map(|c| c.to_ascii_uppercase()) {
            if initial.is_ascii_uppercase() {
                letters.entry(initial).or_default().push(term);
            }
        }
    }
    letters
}

/// A frequently asked question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Faq {
    /// The question.
    pub question: &'static str,
    /// The answer.
    pub answer: &'static str,
}

/// Questions shown on the FAQ page.
pub const FAQ: &[Faq] = &[
    Faq {
        question: "What is mma.box?",
        answer: "mma.box is a fan hub for mixed martial arts covering upcoming events, full fight cards, fighter profiles and the latest news from the UFC, Bellator, ONE Championship and other promotions.",
    },
    Faq {
        question: "Which time zone are event times shown in?",
        answer: "Event start times are shown in US Eastern time, with the zone abbreviation (EDT or EST) next to each time.",
    },
    Faq {
        question: "How is the fight card ordered?",
        answer: "Bouts are listed from the main event down: main event, co-main event, other title fights, the rest of the main card, the preliminary card and finally cancelled bouts.",
    },
    Faq {
        question: "How often are events and news updated?",
        answer: "Event listings and news are updated daily. Fight cards change as bouts are added, moved or cancelled, so check back before fight night.",
    },
    Faq {
        question: "Do I need a crypto wallet to use the site?",
        answer: "No. Wallet connection is optional and only offered on the community page.",
    },
    Faq {
        question: "Where can I learn MMA terminology?",
        answer: "The glossary explains striking, grappling and submission terms, ground positions and general MMA vocabulary.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_hyphenate_words() {
        assert_eq!(
            term("Rear Naked Choke (RNC)", "").anchor(),
            "term-rear-naked-choke-(rnc)"
        );
    }

    #[test]
    fn letters_cover_every_term() {
        let letters = terms_by_letter();
        let grouped: usize = letters.values().map(Vec::len).sum();

        assert_eq!(grouped, all_terms().count());
        assert!(letters.keys().all(char::is_ascii_uppercase));
        assert_eq!(
            letters[&'S']
                .iter()
                .map(|t| t.term)
                .collect::<Vec<_>>(),
            [
                "Superman Punch",
                "Single Leg Takedown",
                "Suplex",
                "Sprawl",
                "Shoot",
                "Side Control",
                "Southpaw"
            ]
        );
    }

    #[test]
    fn letters_without_terms_are_absent() {
        assert!(!terms_by_letter().contains_key(&'Z'));
    }
}
