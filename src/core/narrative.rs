//! Rule-Based Narrative Generator
//!
//! Character cascade, first match wins:
//! 1. universities > 2 → Academic
//! 2. vitality > 75 AND night > 40 → Nightlife
//! 3. office > 70 → Corporate
//! 4. office > 50 AND vitality > 50 → Mixed-Use
//! 5. morning > 60 → Commuter
//! 6. vitality < 20 AND office < 20 → Residential
//! 7. otherwise Standard

use crate::types::{Borough, Character, NarrativeDraft, TimeBucket, TimeDna};
use crate::{
    ACADEMIC_MIN_UNIVERSITIES, COMMUTER_MIN_MORNING, CORPORATE_MIN_OFFICE, MIXED_USE_MIN_OFFICE,
    MIXED_USE_MIN_VITALITY, NIGHTLIFE_MIN_NIGHT, NIGHTLIFE_MIN_VITALITY, RESIDENTIAL_MAX_OFFICE,
    RESIDENTIAL_MAX_VITALITY,
};

/// Scores and shape feeding one generation
#[derive(Debug, Clone, Copy)]
pub struct NarrativeInputs {
    pub borough: Borough,
    pub vitality: f64,
    pub office: f64,
    pub universities: u32,
    pub time_dna: TimeDna,
}

/// Deterministic, stateless narrative generator
#[derive(Debug, Default)]
pub struct NarrativeGenerator;

impl NarrativeGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, inputs: &NarrativeInputs) -> NarrativeDraft {
        let character = self.classify(inputs);
        let vibe = vibe_sentence(character, inputs.borough, inputs.vitality);
        let time = time_sentence(inputs.time_dna.dominant());

        NarrativeDraft {
            character,
            persona: persona_title(character, inputs.borough),
            description: format!("{} {}", vibe, time),
        }
    }

    pub fn classify(&self, inputs: &NarrativeInputs) -> Character {
        let dna = &inputs.time_dna;

        if inputs.universities > ACADEMIC_MIN_UNIVERSITIES {
            Character::Academic
        } else if inputs.vitality > NIGHTLIFE_MIN_VITALITY && dna.night > NIGHTLIFE_MIN_NIGHT {
            Character::Nightlife
        } else if inputs.office > CORPORATE_MIN_OFFICE {
            Character::Corporate
        } else if inputs.office > MIXED_USE_MIN_OFFICE && inputs.vitality > MIXED_USE_MIN_VITALITY {
            Character::MixedUse
        } else if dna.morning > COMMUTER_MIN_MORNING {
            Character::Commuter
        } else if inputs.vitality < RESIDENTIAL_MAX_VITALITY && inputs.office < RESIDENTIAL_MAX_OFFICE {
            Character::Residential
        } else {
            Character::Standard
        }
    }
}

pub fn persona_title(character: Character, borough: Borough) -> String {
    match character {
        Character::Academic => format!("{} Student Hub", borough),
        Character::Nightlife => format!("{} Nightlife District", borough),
        Character::Corporate => format!("{} Business Center", borough),
        Character::MixedUse => format!("Dynamic {} Hub", borough),
        Character::Commuter => "Major Transit Anchor".to_string(),
        Character::Residential => "Local Neighborhood Stop".to_string(),
        Character::Standard => format!("{} Local Stop", borough),
    }
}

fn vibe_sentence(character: Character, borough: Borough, vitality: f64) -> String {
    match character {
        Character::Academic => {
            "Defined by student foot traffic and nearby educational institutions.".to_string()
        }
        Character::Nightlife => format!(
            "A high-energy area (Vitality: {}%) bustling with evening social activity.",
            vitality.trunc() as i64
        ),
        Character::Corporate => {
            "A dense commercial district dominated by office buildings and professional services."
                .to_string()
        }
        Character::MixedUse => "A balanced 'Live-Work-Play' neighborhood combining commercial density with social amenities.".to_string(),
        Character::Residential => {
            "A quieter, community-focused area serving local residents.".to_string()
        }
        // Commuter shares the generic sentence; its signal is in the time sentence
        Character::Commuter | Character::Standard => {
            format!("A key {} transit point serving the surrounding community.", borough)
        }
    }
}

fn time_sentence(peak: Option<TimeBucket>) -> &'static str {
    match peak {
        Some(TimeBucket::Morning) => "Passenger volume peaks in the Morning (6-10am), indicating a heavy outbound commuter flow.",
        Some(TimeBucket::Lunch) => "Activity is highest midday (11am-2pm), driven by local lunch crowds.",
        Some(TimeBucket::Evening) => "Passenger volume swells in the Evening (4-8pm) as the workday ends and retail activity picks up.",
        Some(TimeBucket::Night) => "Unusually high Late Night (10pm-4am) ridership signals a destination for after-hours entertainment.",
        None => "Ridership remains consistent throughout the day.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(vitality: f64, office: f64, universities: u32, dna: TimeDna) -> NarrativeInputs {
        NarrativeInputs {
            borough: Borough::Manhattan,
            vitality,
            office,
            universities,
            time_dna: dna,
        }
    }

    fn character(vitality: f64, office: f64, universities: u32, dna: TimeDna) -> Character {
        NarrativeGenerator::new().classify(&inputs(vitality, office, universities, dna))
    }

    #[test]
    fn test_academic_beats_corporate() {
        assert_eq!(character(10.0, 90.0, 3, TimeDna::default()), Character::Academic);
    }

    #[test]
    fn test_academic_needs_more_than_two() {
        assert_eq!(character(10.0, 90.0, 2, TimeDna::default()), Character::Corporate);
    }

    #[test]
    fn test_nightlife_needs_night_activity() {
        let busy_night = TimeDna::new(30, 20, 45, 55);
        let quiet_night = TimeDna::new(30, 20, 45, 40);
        assert_eq!(character(90.0, 20.0, 0, busy_night), Character::Nightlife);
        assert_eq!(character(90.0, 20.0, 0, quiet_night), Character::Standard);
    }

    #[test]
    fn test_cascade_order() {
        let flat = TimeDna::new(20, 20, 20, 20);
        assert_eq!(character(60.0, 60.0, 0, flat), Character::MixedUse);
        assert_eq!(character(60.0, 40.0, 0, TimeDna::new(70, 10, 10, 10)), Character::Commuter);
        assert_eq!(character(10.0, 10.0, 0, flat), Character::Residential);
        assert_eq!(character(30.0, 30.0, 0, flat), Character::Standard);
        // strict thresholds
        assert_eq!(character(20.0, 10.0, 0, flat), Character::Standard);
    }

    #[test]
    fn test_personas() {
        assert_eq!(persona_title(Character::MixedUse, Borough::Queens), "Dynamic Queens Hub");
        assert_eq!(persona_title(Character::Commuter, Borough::Bronx), "Major Transit Anchor");
        assert_eq!(
            persona_title(Character::Standard, Borough::StatenIsland),
            "Staten Island Local Stop"
        );
    }

    #[test]
    fn test_nightlife_description() {
        let draft = NarrativeGenerator::new().generate(&inputs(
            90.0,
            20.0,
            0,
            TimeDna::new(30, 20, 45, 55),
        ));
        assert_eq!(draft.persona, "Manhattan Nightlife District");
        assert_eq!(
            draft.description,
            "A high-energy area (Vitality: 90%) bustling with evening social activity. \
             Unusually high Late Night (10pm-4am) ridership signals a destination for after-hours entertainment."
        );
    }

    #[test]
    fn test_flat_shape_uses_consistent_sentence() {
        let draft = NarrativeGenerator::new().generate(&inputs(
            30.0,
            30.0,
            0,
            TimeDna::new(20, 20, 20, 20),
        ));
        assert_eq!(
            draft.description,
            "A key Manhattan transit point serving the surrounding community. \
             Ridership remains consistent throughout the day."
        );
    }

    #[test]
    fn test_vitality_truncates() {
        let draft = NarrativeGenerator::new().generate(&inputs(
            87.9,
            0.0,
            0,
            TimeDna::new(0, 0, 0, 50),
        ));
        assert!(draft.description.contains("(Vitality: 87%)"));
    }
}
