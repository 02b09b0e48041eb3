//! Input and output value types shared by the prediction stages.

use std::fmt;

use ordinalizer::Ordinal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount, EnumIter};

/// Goals per team per match assumed when a provider supplies nothing usable.
pub const DEFAULT_GOALS_PER_MATCH: f64 = 1.3;

/// Total goals per match assumed when a league is unknown.
pub const DEFAULT_LEAGUE_AVG_GOALS: f64 = 2.5;

/// Decimal odds assumed for each outcome when the market is missing or malformed.
pub const EVEN_ODDS: f64 = 3.0;

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Display, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

#[derive(
    Clone, Copy, Debug, Hash, PartialEq, Eq, Ordinal, EnumCount, EnumIter, Display, Serialize, Deserialize,
)]
pub enum MatchResult {
    #[strum(serialize = "Home Win")]
    #[serde(rename = "Home Win")]
    HomeWin,

    Draw,

    #[strum(serialize = "Away Win")]
    #[serde(rename = "Away Win")]
    AwayWin,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Score {
    pub home: u8,
    pub away: u8,
}
impl Score {
    pub fn new(home: u8, away: u8) -> Self {
        Self { home, away }
    }

    pub fn total(&self) -> u16 {
        self.home as u16 + self.away as u16
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// Home, draw and away probabilities, in that order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbs {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}
impl OutcomeProbs {
    pub fn new(home: f64, draw: f64, away: f64) -> Self {
        Self { home, draw, away }
    }

    pub fn get(&self, result: MatchResult) -> f64 {
        self.as_array()[result.ordinal()]
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.home, self.draw, self.away]
    }

    pub fn sum(&self) -> f64 {
        self.home + self.draw + self.away
    }
}

impl From<[f64; 3]> for OutcomeProbs {
    fn from([home, draw, away]: [f64; 3]) -> Self {
        Self { home, draw, away }
    }
}

/// Per-team attacking and defensive profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    /// Recent results as `W`/`D`/`L` symbols, oldest first.
    pub form: String,
    pub goals_for: f64,
    pub goals_against: f64,
    pub xg_for: f64,
    pub xg_against: f64,
    pub shots_per_game: f64,
    pub possession: f64,
    pub pass_accuracy: f64,
    pub set_piece_goals: f64,
    pub cards_per_game: f64,
    #[serde(default)]
    pub home_advantage: Option<f64>,
    #[serde(default)]
    pub away_form: Option<f64>,
    #[serde(default)]
    pub fallback: bool,
}
impl TeamStats {
    /// League-average stats, marked as a fallback for a team whose data could not be sourced.
    pub fn fallback() -> Self {
        Self {
            fallback: true,
            ..Self::default()
        }
    }
}

impl Default for TeamStats {
    fn default() -> Self {
        Self {
            form: "DDDDD".into(),
            goals_for: DEFAULT_GOALS_PER_MATCH,
            goals_against: DEFAULT_GOALS_PER_MATCH,
            xg_for: DEFAULT_GOALS_PER_MATCH,
            xg_against: DEFAULT_GOALS_PER_MATCH,
            shots_per_game: 12.0,
            possession: 50.0,
            pass_accuracy: 80.0,
            set_piece_goals: 0.3,
            cards_per_game: 2.0,
            home_advantage: None,
            away_form: None,
            fallback: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadToHead {
    pub matches: u32,
    pub home_wins: u32,
    pub away_wins: u32,
    pub draws: u32,
    pub avg_goals: f64,
}

/// Aggregate record between the two sides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalData {
    pub matches: u32,
    pub home_wins: u32,
    pub away_wins: u32,
    pub draws: u32,
    pub avg_goals: f64,
    #[serde(default)]
    pub head_to_head: HeadToHead,
}
impl HistoricalData {
    /// Whether the outcome counts add up to the number of matches. Providers do not always
    /// honour this.
    pub fn is_consistent(&self) -> bool {
        let decided = self.home_wins as u64 + self.away_wins as u64 + self.draws as u64;
        decided == self.matches as u64
    }
}

/// Squad availability snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerData {
    pub key_players_available: u8,
    pub top_scorer_available: bool,
    pub injuries: u8,
    pub suspensions: u8,
    /// 0 to 100.
    pub fitness: f64,
}

impl Default for PlayerData {
    fn default() -> Self {
        Self {
            key_players_available: 9,
            top_scorer_available: true,
            injuries: 2,
            suspensions: 0,
            fitness: 75.0,
        }
    }
}

/// Ground-specific modifiers. `altitude` and `travel_distance` are raw magnitudes (metres and
/// kilometres); the rest are normalised.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VenueData {
    pub home_advantage: f64,
    pub altitude: f64,
    pub weather_impact: f64,
    pub pitch_condition: f64,
    pub travel_distance: f64,
}

impl Default for VenueData {
    fn default() -> Self {
        Self {
            home_advantage: 0.1,
            altitude: 0.0,
            weather_impact: 0.0,
            pitch_condition: 0.0,
            travel_distance: 0.0,
        }
    }
}

/// Decimal odds for the three match outcomes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Odds {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}
impl Odds {
    pub fn new(home: f64, draw: f64, away: f64) -> Self {
        Self { home, draw, away }
    }

    pub fn even() -> Self {
        Self::new(EVEN_ODDS, EVEN_ODDS, EVEN_ODDS)
    }

    pub fn get(&self, result: MatchResult) -> f64 {
        self.as_array()[result.ordinal()]
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.home, self.draw, self.away]
    }

    /// Every price must be a finite decimal above 1.0 to imply a probability.
    pub fn is_valid(&self) -> bool {
        self.as_array()
            .iter()
            .all(|&price| price.is_finite() && price > 1.0)
    }
}

impl Default for Odds {
    fn default() -> Self {
        Self::even()
    }
}

/// Bookmaker state for the match.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    pub opening: Odds,
    pub current: Odds,
    /// Current minus opening home price.
    pub odds_movement: f64,
    pub volume: f64,
    /// 0 to 1.
    pub sharp_money: f64,
}
impl MarketData {
    /// A market with no movement, volume or sharp action.
    pub fn from_odds(current: Odds) -> Self {
        Self {
            opening: current.clone(),
            current,
            odds_movement: 0.0,
            volume: 0.0,
            sharp_money: 0.0,
        }
    }

    pub fn with_opening(opening: Odds, current: Odds) -> Self {
        let odds_movement = current.home - opening.home;
        Self {
            opening,
            current,
            odds_movement,
            volume: 0.0,
            sharp_money: 0.0,
        }
    }
}

/// Qualitative pressure scores on a 1 to 10 scale, except `rest_days`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotivationFactors {
    pub importance: f64,
    pub table_pressure: f64,
    pub momentum: f64,
    pub revenge: f64,
    pub congestion: f64,
    pub rest_days: f64,
}

impl Default for MotivationFactors {
    fn default() -> Self {
        Self {
            importance: 5.0,
            table_pressure: 5.0,
            momentum: 5.0,
            revenge: 1.0,
            congestion: 5.0,
            rest_days: 4.0,
        }
    }
}

/// Per-league normalisation constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeagueConfig {
    /// Total goals per match, both sides combined.
    pub avg_goals: f64,
    pub competitiveness: f64,
    pub home_advantage: f64,
}
impl LeagueConfig {
    /// Average goals for one side, guarding against a zero or missing league average.
    pub fn team_avg_goals(&self) -> f64 {
        sanitise_avg_goals(self.avg_goals) / 2.0
    }
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            avg_goals: DEFAULT_LEAGUE_AVG_GOALS,
            competitiveness: 0.8,
            home_advantage: 0.1,
        }
    }
}

pub(crate) fn sanitise_avg_goals(avg_goals: f64) -> f64 {
    if avg_goals.is_finite() && avg_goals > 0.0 {
        avg_goals
    } else {
        DEFAULT_LEAGUE_AVG_GOALS
    }
}

/// Everything the predictor needs for one fixture.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchInput {
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub league: LeagueConfig,
    #[serde(default)]
    pub home: TeamStats,
    #[serde(default)]
    pub away: TeamStats,
    #[serde(default)]
    pub historical: HistoricalData,
    #[serde(default)]
    pub home_players: PlayerData,
    #[serde(default)]
    pub away_players: PlayerData,
    #[serde(default)]
    pub venue: VenueData,
    #[serde(default)]
    pub market: MarketData,
    #[serde(default)]
    pub home_motivation: MotivationFactors,
    #[serde(default)]
    pub away_motivation: MotivationFactors,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn match_result_labels() {
        assert_eq!(3, MatchResult::COUNT);
        let labels = MatchResult::iter().map(|result| result.to_string()).collect::<Vec<_>>();
        assert_eq!(vec!["Home Win", "Draw", "Away Win"], labels);
        assert_eq!(
            "\"Away Win\"",
            serde_json::to_string(&MatchResult::AwayWin).unwrap()
        );
    }

    #[test]
    fn outcome_probs_indexing() {
        let probs = OutcomeProbs::new(0.5, 0.3, 0.2);
        assert_eq!(0.5, probs.get(MatchResult::HomeWin));
        assert_eq!(0.3, probs.get(MatchResult::Draw));
        assert_eq!(0.2, probs.get(MatchResult::AwayWin));
        assert_eq!(probs, OutcomeProbs::from([0.5, 0.3, 0.2]));
    }

    #[test]
    fn score_display() {
        assert_eq!("3-0", Score::new(3, 0).to_string());
        assert_eq!(5, Score::new(2, 3).total());
    }

    #[test]
    fn odds_validity() {
        assert!(Odds::new(2.0, 3.2, 4.0).is_valid());
        assert!(!Odds::new(0.0, 3.2, 4.0).is_valid());
        assert!(!Odds::new(2.0, 1.0, 4.0).is_valid());
        assert!(!Odds::new(2.0, f64::NAN, 4.0).is_valid());
    }

    #[test]
    fn market_movement() {
        let market = MarketData::with_opening(Odds::new(2.2, 3.2, 3.8), Odds::new(2.0, 3.3, 4.0));
        assert!((market.odds_movement + 0.2).abs() < 1e-12);
    }

    #[test]
    fn history_consistency() {
        let consistent = HistoricalData {
            matches: 5,
            home_wins: 2,
            away_wins: 1,
            draws: 2,
            ..HistoricalData::default()
        };
        assert!(consistent.is_consistent());
        let inconsistent = HistoricalData {
            matches: 6,
            ..consistent
        };
        assert!(!inconsistent.is_consistent());
    }

    #[test]
    fn history_consistency_at_count_limits() {
        let saturated = HistoricalData {
            matches: u32::MAX,
            home_wins: u32::MAX,
            away_wins: 1,
            draws: u32::MAX,
            ..HistoricalData::default()
        };
        assert!(!saturated.is_consistent());
        let all_home = HistoricalData {
            matches: u32::MAX,
            home_wins: u32::MAX,
            away_wins: 0,
            draws: 0,
            ..HistoricalData::default()
        };
        assert!(all_home.is_consistent());
    }

    #[test]
    fn league_average_guarded() {
        let league = LeagueConfig {
            avg_goals: 0.0,
            ..LeagueConfig::default()
        };
        assert_eq!(1.25, league.team_avg_goals());
        assert_eq!(1.4, LeagueConfig { avg_goals: 2.8, ..LeagueConfig::default() }.team_avg_goals());
    }

    #[test]
    fn fallback_stats_are_marked() {
        let stats = TeamStats::fallback();
        assert!(stats.fallback);
        assert_eq!(DEFAULT_GOALS_PER_MATCH, stats.goals_for);
        assert!(!TeamStats::default().fallback);
    }

    #[test]
    fn match_input_defaults_from_json() {
        let input: MatchInput =
            serde_json::from_str(r#"{"home_team": "Arsenal", "away_team": "Chelsea"}"#).unwrap();
        assert_eq!("Arsenal", input.home_team);
        assert_eq!(LeagueConfig::default(), input.league);
        assert_eq!(Odds::even(), input.market.current);
    }
}
