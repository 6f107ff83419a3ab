//! Seeded demo data: fabricated statements, credit score drift, and the RNG
//! they share.

mod generator;
mod rng;

pub use generator::{
    CreditScoreDrift, MockFinancialsGenerator, CREDIT_SCORE_CEILING, CREDIT_SCORE_FLOOR,
    CREDIT_SCORE_MAX_STEP, CREDIT_SCORE_START,
};
pub use rng::SeededRng;
