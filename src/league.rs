//! Per-league normalisation constants, keyed by odds-provider sport identifiers.

use strum_macros::{Display, EnumIter};
use tracing::debug;

use crate::domain::LeagueConfig;

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, EnumIter, Display)]
pub enum League {
    #[strum(serialize = "Premier League")]
    PremierLeague,
    #[strum(serialize = "La Liga")]
    LaLiga,
    Bundesliga,
    #[strum(serialize = "Serie A")]
    SerieA,
    #[strum(serialize = "Ligue 1")]
    Ligue1,
    #[strum(serialize = "Champions League")]
    ChampionsLeague,
    #[strum(serialize = "World Cup")]
    WorldCup,
}
impl League {
    pub fn sport_key(&self) -> &'static str {
        match self {
            League::PremierLeague => "soccer_epl",
            League::LaLiga => "soccer_spain_la_liga",
            League::Bundesliga => "soccer_germany_bundesliga",
            League::SerieA => "soccer_italy_serie_a",
            League::Ligue1 => "soccer_france_ligue_one",
            League::ChampionsLeague => "soccer_uefa_champs_league",
            League::WorldCup => "soccer_fifa_world_cup",
        }
    }

    pub fn from_sport_key(sport_key: &str) -> Option<Self> {
        match sport_key {
            "soccer_epl" => Some(League::PremierLeague),
            "soccer_spain_la_liga" => Some(League::LaLiga),
            "soccer_germany_bundesliga" => Some(League::Bundesliga),
            "soccer_italy_serie_a" => Some(League::SerieA),
            "soccer_france_ligue_one" => Some(League::Ligue1),
            "soccer_uefa_champs_league" => Some(League::ChampionsLeague),
            "soccer_fifa_world_cup" => Some(League::WorldCup),
            _ => None,
        }
    }

    pub fn config(&self) -> LeagueConfig {
        let (avg_goals, competitiveness, home_advantage) = match self {
            League::PremierLeague => (2.82, 0.85, 0.10),
            League::LaLiga => (2.55, 0.75, 0.12),
            League::Bundesliga => (3.12, 0.70, 0.10),
            League::SerieA => (2.68, 0.78, 0.11),
            League::Ligue1 => (2.65, 0.72, 0.11),
            League::ChampionsLeague => (2.95, 0.65, 0.08),
            League::WorldCup => (2.60, 0.70, 0.03),
        };
        LeagueConfig {
            avg_goals,
            competitiveness,
            home_advantage,
        }
    }
}

/// Constants for the given provider sport key. Unknown keys get the generic defaults.
pub fn league_config(sport_key: &str) -> LeagueConfig {
    match League::from_sport_key(sport_key) {
        Some(league) => league.config(),
        None => {
            debug!("no league constants for {sport_key}, using defaults");
            LeagueConfig::default()
        }
    }
}
