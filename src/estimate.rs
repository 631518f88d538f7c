use serde::{Deserialize, Serialize};

pub const REGULATION_INNINGS: u32 = 9;

/// One past the last regulation inning, so that "innings left" counts the
/// current inning too.
const TOTAL_INNINGS: u64 = REGULATION_INNINGS as u64 + 1;

pub const AVG_TIME_PER_PITCH_MS: u64 = 20;
pub const AVG_TIME_PER_OUT_MS: u64 = 30_000;
pub const AVG_TIME_PER_INNING_MS: u64 = 180_000;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HalfInning {
    #[default]
    Top,
    Bottom,
}

/// Snapshot of where the game stands, taken from the live feed's current play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameClockState {
    pub current_inning: u32,
    pub current_inning_indicator: HalfInning,
    pub strikes: u32,
    pub balls: u32,
    pub outs: u32,
}

impl Default for GameClockState {
    fn default() -> Self {
        Self {
            current_inning: 1,
            current_inning_indicator: HalfInning::Top,
            strikes: 0,
            balls: 0,
            outs: 0,
        }
    }
}

/// Average durations used to project the time left in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    pub pitch_ms: u64,
    pub out_ms: u64,
    pub inning_ms: u64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            pitch_ms: AVG_TIME_PER_PITCH_MS,
            out_ms: AVG_TIME_PER_OUT_MS,
            inning_ms: AVG_TIME_PER_INNING_MS,
        }
    }
}

impl EstimatorConfig {
    pub fn estimate(&self, state: &GameClockState) -> u64 {
        estimate(state, self)
    }
}

/// Projected milliseconds until the game ends.
///
/// Innings left are counted against a ten-inning sentinel (minus half an
/// inning in the bottom half), so the top of the 9th leaves exactly one
/// inning. The projection is `1.5 * innings_left * inning_ms`, reduced by
/// the pitch and out time already spent in the current half, floored at 0.
///
/// Extra innings are projected as if they were the 9th.
pub fn estimate(state: &GameClockState, config: &EstimatorConfig) -> u64 {
    let pitches = u64::from(state.strikes) * 3 + u64::from(state.balls);
    let pitch_time = pitches.saturating_mul(config.pitch_ms);
    let out_time = u64::from(state.outs).saturating_mul(config.out_ms);

    // remaining_innings_time - (elapsed - remaining_innings_time / 2),
    // done in quarter innings to stay in integers.
    let half_innings = remaining_half_innings(state);
    let projected = half_innings.saturating_mul(config.inning_ms).saturating_mul(3) / 4;

    projected.saturating_sub(pitch_time.saturating_add(out_time))
}

fn remaining_half_innings(state: &GameClockState) -> u64 {
    let inning = u64::from(state.current_inning.clamp(1, REGULATION_INNINGS));
    let whole = (TOTAL_INNINGS - inning) * 2;
    match state.current_inning_indicator {
        HalfInning::Top => whole,
        HalfInning::Bottom => whole - 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_estimate(s: &GameClockState) -> u64 {
        estimate(s, &EstimatorConfig::default())
    }

    fn state(
        inning: u32,
        half: HalfInning,
        strikes: u32,
        balls: u32,
        outs: u32,
    ) -> GameClockState {
        GameClockState {
            current_inning: inning,
            current_inning_indicator: half,
            strikes,
            balls,
            outs,
        }
    }

    #[test]
    fn full_game_left() {
        assert_eq!(default_estimate(&state(1, HalfInning::Top, 0, 0, 0)), 2_430_000);
    }

    #[test]
    fn half_inning_left() {
        assert_eq!(default_estimate(&state(9, HalfInning::Bottom, 0, 0, 0)), 135_000);
    }

    #[test]
    fn full_inning_left() {
        assert_eq!(default_estimate(&state(9, HalfInning::Top, 0, 0, 0)), 270_000);
    }

    #[test]
    fn two_full_innings_left() {
        assert_eq!(default_estimate(&state(8, HalfInning::Top, 0, 0, 0)), 540_000);
    }

    #[test]
    fn outs_reduce_the_estimate() {
        assert_eq!(default_estimate(&state(9, HalfInning::Bottom, 0, 0, 1)), 105_000);
        assert_eq!(default_estimate(&state(9, HalfInning::Bottom, 0, 0, 2)), 75_000);
    }

    #[test]
    fn strikes_reduce_the_estimate() {
        assert_eq!(default_estimate(&state(9, HalfInning::Bottom, 1, 0, 2)), 74_940);
        assert_eq!(default_estimate(&state(9, HalfInning::Bottom, 2, 0, 2)), 74_880);
    }

    #[test]
    fn never_negative_for_heavy_counts() {
        let config = EstimatorConfig {
            pitch_ms: 1_000_000,
            ..EstimatorConfig::default()
        };
        assert_eq!(config.estimate(&state(9, HalfInning::Bottom, 2, 3, 2)), 0);
    }

    #[test]
    fn strictly_decreasing_in_outs() {
        for inning in 1..=REGULATION_INNINGS {
            for half in [HalfInning::Top, HalfInning::Bottom] {
                for strikes in 0..=2 {
                    for balls in 0..=3 {
                        let values: Vec<u64> = (0..=2)
                            .map(|outs| {
                                default_estimate(&state(inning, half, strikes, balls, outs))
                            })
                            .collect();
                        for pair in values.windows(2) {
                            assert!(pair[1] < pair[0] || pair[1] == 0, "{values:?}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn each_strike_costs_three_pitches() {
        for inning in 1..=REGULATION_INNINGS {
            for half in [HalfInning::Top, HalfInning::Bottom] {
                for outs in 0..=2 {
                    for balls in 0..=3 {
                        for strikes in 0..2 {
                            let before =
                                default_estimate(&state(inning, half, strikes, balls, outs));
                            let after =
                                default_estimate(&state(inning, half, strikes + 1, balls, outs));
                            assert_eq!(before - after, 3 * AVG_TIME_PER_PITCH_MS);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn method_matches_free_function() {
        let config = EstimatorConfig::default();
        let s = state(7, HalfInning::Top, 1, 1, 1);
        assert_eq!(config.estimate(&s), estimate(&s, &config));
    }

    #[test]
    fn deterministic() {
        let s = state(6, HalfInning::Bottom, 1, 2, 1);
        assert_eq!(default_estimate(&s), default_estimate(&s));
    }

    #[test]
    fn custom_averages_are_used() {
        let config = EstimatorConfig {
            pitch_ms: 100,
            out_ms: 10_000,
            inning_ms: 120_000,
        };
        // one inning left: 1.5 * 120000 - 2 * 100 - 10000
        assert_eq!(config.estimate(&state(9, HalfInning::Top, 0, 2, 1)), 169_800);
    }

    #[test]
    fn extra_innings_project_like_the_ninth() {
        assert_eq!(default_estimate(&state(10, HalfInning::Top, 0, 0, 0)), 270_000);
        assert_eq!(default_estimate(&state(12, HalfInning::Bottom, 0, 0, 1)), 105_000);
    }

    #[test]
    fn inning_zero_projects_like_the_first() {
        assert_eq!(
            default_estimate(&state(0, HalfInning::Top, 0, 0, 0)),
            default_estimate(&state(1, HalfInning::Top, 0, 0, 0))
        );
    }

    #[test]
    fn default_state_is_top_of_the_first() {
        assert_eq!(GameClockState::default(), state(1, HalfInning::Top, 0, 0, 0));
    }

    #[test]
    fn half_inning_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&HalfInning::Bottom).unwrap(), "\"bottom\"");
        let parsed: HalfInning = serde_json::from_str("\"top\"").unwrap();
        assert_eq!(parsed, HalfInning::Top);
    }
}
