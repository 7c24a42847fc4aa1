use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tolerance on the weight total before a table is rescaled.
pub const PROBABILITY_TOLERANCE: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrizeKind {
    Points,
    Discount,
    Gift,
    TryAgain,
}

/// One slice of the Soriano Club wheel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelPrize {
    pub id: String,
    pub label: String,
    pub kind: PrizeKind,
    /// Points credited, or the discount percentage for `Discount` prizes.
    pub value: u32,
    pub probability: f64,
}

impl WheelPrize {
    pub fn new(id: &str, label: &str, kind: PrizeKind, value: u32, probability: f64) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind,
            value,
            probability,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WheelError {
    #[error("the prize wheel needs at least one prize")]
    Empty,
}

/// Returns an equivalent table whose probabilities sum to 1.0.
///
/// Non-finite or negative weights, or an all-zero table, fall back to a
/// uniform distribution. A total outside the tolerance is rescaled by the
/// true sum, computed relative to the largest weight.
pub fn normalize_probabilities(prizes: &[WheelPrize]) -> Result<Vec<WheelPrize>, WheelError> {
    if prizes.is_empty() {
        return Err(WheelError::Empty);
    }

    let malformed = prizes
        .iter()
        .any(|prize| !prize.probability.is_finite() || prize.probability < 0.0);
    let largest = prizes
        .iter()
        .map(|prize| prize.probability)
        .fold(0.0_f64, f64::max);

    if malformed || largest <= 0.0 {
        tracing::warn!(
            prizes = prizes.len(),
            "wheel weights unusable, falling back to uniform odds"
        );
        let uniform = 1.0 / prizes.len() as f64;
        return Ok(prizes
            .iter()
            .map(|prize| WheelPrize {
                probability: uniform,
                ..prize.clone()
            })
            .collect());
    }

    // Scaled by the largest weight first so the sum cannot overflow.
    let scaled_total: f64 = prizes
        .iter()
        .map(|prize| prize.probability / largest)
        .sum();
    let total = scaled_total * largest;

    if !total.is_finite() || (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Ok(prizes
            .iter()
            .map(|prize| WheelPrize {
                probability: prize.probability / largest / scaled_total,
                ..prize.clone()
            })
            .collect());
    }

    Ok(prizes.to_vec())
}

/// Cumulative-sum selection for a uniform `roll` in `[0, 1)`.
///
/// Falls back to the last prize when rounding keeps the running total below
/// the roll; `None` only for an empty table.
pub fn select_prize(prizes: &[WheelPrize], roll: f64) -> Option<&WheelPrize> {
    let mut cumulative = 0.0;
    for prize in prizes {
        cumulative += prize.probability;
        if roll < cumulative {
            return Some(prize);
        }
    }
    prizes.last()
}

/// Prize table with probabilities already normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrizeWheel {
    prizes: Vec<WheelPrize>,
}

impl PrizeWheel {
    pub fn new(prizes: Vec<WheelPrize>) -> Result<Self, WheelError> {
        let prizes = normalize_probabilities(&prizes)?;
        Ok(Self { prizes })
    }

    /// Daily wheel offered to club members.
    pub fn standard() -> Self {
        let prizes = vec![
            WheelPrize::new("points-10", "10 puntos Soriano", PrizeKind::Points, 10, 0.30),
            WheelPrize::new("points-25", "25 puntos Soriano", PrizeKind::Points, 25, 0.22),
            WheelPrize::new("points-50", "50 puntos Soriano", PrizeKind::Points, 50, 0.13),
            WheelPrize::new("points-100", "100 puntos Soriano", PrizeKind::Points, 100, 0.05),
            WheelPrize::new(
                "discount-5",
                "5% de descuento en tu próxima póliza",
                PrizeKind::Discount,
                5,
                0.08,
            ),
            WheelPrize::new(
                "gift-card",
                "Tarjeta regalo de 20 €",
                PrizeKind::Gift,
                20,
                0.02,
            ),
            WheelPrize::new("try-again", "Sigue intentándolo", PrizeKind::TryAgain, 0, 0.20),
        ];
        Self { prizes }
    }

    pub fn prizes(&self) -> &[WheelPrize] {
        &self.prizes
    }

    /// Draws one prize using the caller's random source.
    pub fn spin<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&WheelPrize, WheelError> {
        let roll: f64 = rng.gen();
        select_prize(&self.prizes, roll).ok_or(WheelError::Empty)
    }
}
