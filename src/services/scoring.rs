use crate::models::domain::GameMode;

/// What a scoring rule sees about one player's answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoringContext {
    pub is_correct: bool,
    pub points: i32,
    pub response_time_ms: u64,
    pub time_limit_secs: u32,
}

pub trait ScoringRule: Send + Sync {
    /// Score delta for one answer; may be negative.
    fn score(&self, ctx: &ScoringContext) -> i32;
}

/// The question's points for a correct answer, nothing otherwise.
pub struct FixedPointsRule;

impl ScoringRule for FixedPointsRule {
    fn score(&self, ctx: &ScoringContext) -> i32 {
        if ctx.is_correct {
            ctx.points
        } else {
            0
        }
    }
}

static FIXED_POINTS: FixedPointsRule = FixedPointsRule;

/// Rule dispatch per mode. Survival's life mechanic lives in the session;
/// modes without product rules yet share the fixed-points rule.
pub fn scoring_rule_for(mode: GameMode) -> &'static dyn ScoringRule {
    match mode {
        GameMode::Standard | GameMode::Survival => &FIXED_POINTS,
        GameMode::Timed
        | GameMode::Fastest
        | GameMode::TopThree
        | GameMode::Regressive
        | GameMode::Shared
        | GameMode::DoubleOrNothing
        | GameMode::RandomChallenge
        | GameMode::Marathon
        | GameMode::Trap
        | GameMode::Memory => &FIXED_POINTS,
    }
}
