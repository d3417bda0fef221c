use serde::{Deserialize, Serialize};

pub const SURVIVAL_LIVES: u32 = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    #[default]
    Standard, // fixed points per correct answer
    Timed,           // against the clock
    Fastest,         // fastest correct answer wins the round
    TopThree,        // best three of four score
    Regressive,      // points decrease with answer order
    Shared,          // round winner shares with another player
    DoubleOrNothing, // stake the running score
    Survival,        // three lives, wrong answers cost one
    RandomChallenge,
    Marathon, // long run of consecutive questions
    Trap,     // one option costs points
    Memory,   // question visible for a limited time
}

impl GameMode {
    pub const ALL: [GameMode; 12] = [
        GameMode::Standard,
        GameMode::Timed,
        GameMode::Fastest,
        GameMode::TopThree,
        GameMode::Regressive,
        GameMode::Shared,
        GameMode::DoubleOrNothing,
        GameMode::Survival,
        GameMode::RandomChallenge,
        GameMode::Marathon,
        GameMode::Trap,
        GameMode::Memory,
    ];

    /// Lives handed to each player at session start.
    pub fn starting_lives(self) -> u32 {
        match self {
            GameMode::Survival => SURVIVAL_LIVES,
            _ => 0,
        }
    }

    pub fn uses_lives(self) -> bool {
        self == GameMode::Survival
    }
}
