//! Mood of the dashboard character, derived from the latest reading

use rand::Rng;
use serde::{Deserialize, Serialize};

/// At or below this temperature the character freezes
pub const FREEZING_MAX_CELSIUS: f64 = 5.0;
/// At or above this temperature the character burns
pub const BURNING_MIN_CELSIUS: f64 = 35.0;
/// At or above this humidity it rains
pub const RAINY_MIN_HUMIDITY: f64 = 75.0;
/// Sunbathing needs at least this temperature...
pub const SUNNY_MIN_CELSIUS: f64 = 25.0;
/// ...and humidity strictly below this
pub const SUNNY_MAX_HUMIDITY: f64 = 50.0;

pub const SNOW_PARTICLES: u32 = 50;
pub const RAIN_PARTICLES: u32 = 100;
/// Upper bound on particles placed for any spec
pub const MAX_PARTICLES: u32 = RAIN_PARTICLES;

/// Discrete mood/weather classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mood {
    Freezing,
    Burning,
    Rainy,
    SunnyDry,
    Neutral,
    /// Fallback when no reading could be obtained
    Disconnected,
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mood::Freezing => write!(f, "FREEZING"),
            Mood::Burning => write!(f, "BURNING"),
            Mood::Rainy => write!(f, "RAINY"),
            Mood::SunnyDry => write!(f, "SUNNY_DRY"),
            Mood::Neutral => write!(f, "NEUTRAL"),
            Mood::Disconnected => write!(f, "DISCONNECTED"),
        }
    }
}

/// Page background
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    Sky,
    Winter,
    Heatwave,
    Storm,
    Beach,
}

impl Background {
    pub fn gradient(&self) -> &'static str {
        match self {
            Background::Sky => "linear-gradient(135deg, #89f7fe 0%, #66a6ff 100%)",
            Background::Winter => "linear-gradient(135deg, #e6dada 0%, #274046 100%)",
            Background::Heatwave => "linear-gradient(135deg, #ff4e50 0%, #f9d423 100%)",
            Background::Storm => "linear-gradient(135deg, #4b6cb7 0%, #182848 100%)",
            Background::Beach => "linear-gradient(135deg, #fceabb 0%, #f8b500 100%)",
        }
    }
}

/// Visual variant of the character itself
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Character {
    /// Ice cube
    Cold,
    /// Red, on fire
    Hot,
    /// Holding an umbrella
    Wet,
    /// Towel and sunglasses
    Tanning,
    /// Green, bouncing
    Normal,
}

impl Character {
    pub fn css_class(&self) -> &'static str {
        match self {
            Character::Cold => "blob cold",
            Character::Hot => "blob hot",
            Character::Wet => "blob wet",
            Character::Tanning => "blob tanning",
            Character::Normal => "blob normal",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParticleKind {
    None,
    Snow,
    Rain,
}

/// Falling particles requested by a mood
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticleSpec {
    pub kind: ParticleKind,
    pub count: u32,
}

/// One placed particle, in CSS units
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Particle {
    /// Horizontal position, 0-100 %
    pub left_percent: f64,
    /// Fall duration, 0.5-1.5 s
    pub duration_secs: f64,
    /// Start delay, 0-2 s, so particles don't fall in lockstep
    pub delay_secs: f64,
}

impl ParticleSpec {
    pub fn none() -> Self {
        Self {
            kind: ParticleKind::None,
            count: 0,
        }
    }

    pub fn snow() -> Self {
        Self {
            kind: ParticleKind::Snow,
            count: SNOW_PARTICLES,
        }
    }

    pub fn rain() -> Self {
        Self {
            kind: ParticleKind::Rain,
            count: RAIN_PARTICLES,
        }
    }

    pub fn is_active(&self) -> bool {
        self.kind != ParticleKind::None && self.count > 0
    }

    /// Class list of the particle container
    pub fn css_class(&self) -> &'static str {
        match self.kind {
            ParticleKind::None => "weather-particles",
            ParticleKind::Snow => "weather-particles snow",
            ParticleKind::Rain => "weather-particles rain",
        }
    }

    /// Randomly place `count` particles, at most [`MAX_PARTICLES`]; an
    /// inactive spec yields none
    pub fn scatter<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Particle> {
        if !self.is_active() {
            return Vec::new();
        }

        (0..self.count.min(MAX_PARTICLES))
            .map(|_| Particle {
                left_percent: rng.gen_range(0.0..100.0),
                duration_secs: rng.gen_range(0.5..1.5),
                delay_secs: rng.gen_range(0.0..2.0),
            })
            .collect()
    }
}

/// Full presentation state of the character
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodState {
    pub mood: Mood,
    pub caption: String,
    pub background: Background,
    pub background_gradient: String,
    pub character: Character,
    pub particles: ParticleSpec,
    /// Whether the sun is shown in the scene
    pub sunny: bool,
}

impl MoodState {
    fn new(
        mood: Mood,
        caption: &str,
        background: Background,
        character: Character,
        particles: ParticleSpec,
    ) -> Self {
        Self {
            mood,
            caption: caption.to_string(),
            background,
            background_gradient: background.gradient().to_string(),
            character,
            particles,
            sunny: mood == Mood::SunnyDry,
        }
    }

    /// "No signal" visual: blue character, weather stopped, sun hidden
    pub fn disconnected() -> Self {
        Self::new(
            Mood::Disconnected,
            "Pas de signal...",
            Background::Sky,
            Character::Cold,
            ParticleSpec::none(),
        )
    }
}

/// Classify current conditions into exactly one mood.
///
/// Tiers are checked in order and the first match wins: temperature
/// extremes override every humidity-driven state.
pub fn classify(temperature: f64, humidity: f64) -> MoodState {
    if temperature <= FREEZING_MAX_CELSIUS {
        MoodState::new(
            Mood::Freezing,
            "Brrr... Il neige ! 🌨️",
            Background::Winter,
            Character::Cold,
            ParticleSpec::snow(),
        )
    } else if temperature >= BURNING_MIN_CELSIUS {
        MoodState::new(
            Mood::Burning,
            "AU SECOURS ! JE BRÛLE ! 🔥",
            Background::Heatwave,
            Character::Hot,
            ParticleSpec::none(),
        )
    } else if humidity >= RAINY_MIN_HUMIDITY {
        MoodState::new(
            Mood::Rainy,
            "Il pleut ! J'ai mon parapluie ! ☔",
            Background::Storm,
            Character::Wet,
            ParticleSpec::rain(),
        )
    } else if temperature >= SUNNY_MIN_CELSIUS && humidity < SUNNY_MAX_HUMIDITY {
        MoodState::new(
            Mood::SunnyDry,
            "Ah... La belle vie ! 😎",
            Background::Beach,
            Character::Tanning,
            ParticleSpec::none(),
        )
    } else {
        MoodState::new(
            Mood::Neutral,
            "Salut ! La vie est belle.",
            Background::Sky,
            Character::Normal,
            ParticleSpec::none(),
        )
    }
}
