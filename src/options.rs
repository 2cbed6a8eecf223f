use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::OptionsError;

// Every enumerated option serializes to the label shown in the form and
// interpolated into prompts ("Mid-Range", "Study Room").
macro_rules! option_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

option_enum!(
    Personality {
        Introvert => "Introvert",
        Extrovert => "Extrovert",
        Balanced => "Balanced",
    }
);

option_enum!(
    Mood {
        Calm => "Calm",
        Energetic => "Energetic",
        Focused => "Focused",
        Creative => "Creative",
    }
);

option_enum!(
    Room {
        Bedroom => "Bedroom",
        StudyRoom => "Study Room",
        LivingRoom => "Living Room",
        Kitchen => "Kitchen",
        DiningRoom => "Dining Room",
        Bathroom => "Bathroom",
        Balcony => "Balcony",
    }
);

option_enum!(
    Style {
        Modern => "Modern",
        Indian => "Indian",
        Western => "Western",
    }
);

option_enum!(
    Budget {
        Economical => "Economical",
        MidRange => "Mid-Range",
        Premium => "Premium",
        Luxury => "Luxury",
    }
);

/// Emotions offered as quick picks. Any other text is accepted as well.
pub const PRESET_EMOTIONS: &[&str] = &[
    "Serenity",
    "Joy",
    "Security",
    "Inspiration",
    "Nostalgia",
    "Connection",
];

/// Selections for an interior design run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignOptions {
    pub personality: Personality,
    pub mood: Mood,
    pub room: Room,
    pub style: Style,
    pub budget: Budget,
    /// Free-text architectural features or dimensions. Empty means none.
    #[serde(default)]
    pub features: String,
}

/// Selections for an architectural concept run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptOptions {
    pub emotion: String,
    pub location: String,
}

impl ConceptOptions {
    pub fn new(emotion: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            emotion: emotion.into(),
            location: location.into(),
        }
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.emotion.trim().is_empty() {
            return Err(OptionsError::MissingEmotion);
        }
        if self.location.trim().is_empty() {
            return Err(OptionsError::MissingLocation);
        }
        Ok(())
    }
}

/// Big Five personality profile, each trait scored 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BigFiveTraits {
    pub openness: u8,
    pub conscientiousness: u8,
    pub extraversion: u8,
    pub agreeableness: u8,
    pub neuroticism: u8,
}

impl Default for BigFiveTraits {
    fn default() -> Self {
        Self {
            openness: 50,
            conscientiousness: 50,
            extraversion: 50,
            agreeableness: 50,
            neuroticism: 50,
        }
    }
}

impl BigFiveTraits {
    /// Collapses the profile onto the personality descriptor used in prompts.
    pub fn personality(&self) -> Personality {
        match self.extraversion.min(100) {
            0..=39 => Personality::Introvert,
            40..=60 => Personality::Balanced,
            _ => Personality::Extrovert,
        }
    }
}

/// Parses `openness,conscientiousness,extraversion,agreeableness,neuroticism`.
impl FromStr for BigFiveTraits {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || OptionsError::InvalidTraits(s.to_string());
        let scores = s
            .split(',')
            .map(|part| part.trim().parse::<u8>().ok().filter(|score| *score <= 100))
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(invalid)?;
        match scores.as_slice() {
            &[openness, conscientiousness, extraversion, agreeableness, neuroticism] => Ok(Self {
                openness,
                conscientiousness,
                extraversion,
                agreeableness,
                neuroticism,
            }),
            _ => Err(invalid()),
        }
    }
}
