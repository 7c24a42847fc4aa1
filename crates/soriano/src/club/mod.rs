//! Soriano Club loyalty features: the daily prize wheel and personalized missions.

pub mod missions;
pub mod router;
pub mod wheel;

pub use missions::{
    ClubActivity, Mission, MissionCategory, MissionError, MissionFacts, MissionGenerator,
    MissionPriority, PolicyOwnership, ProfileCompleteness,
};
pub use router::{club_router, ClubState, SpinResult};
pub use wheel::{
    normalize_probabilities, select_prize, PrizeKind, PrizeWheel, WheelError, WheelPrize,
    PROBABILITY_TOLERANCE,
};
