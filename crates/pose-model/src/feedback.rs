//! Feedback band tables.
//!
//! A table is an ordered list of half-open degree ranges `[min, max)`.
//! The first band has no lower bound and the last has no upper bound,
//! so every finite angle falls into exactly one band.

use serde::{Deserialize, Serialize};

/// Coarse quality rating attached to a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Good,
    Warning,
    Poor,
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Good => f.write_str("good"),
            Self::Warning => f.write_str("warning"),
            Self::Poor => f.write_str("poor"),
        }
    }
}

/// One row of the feedback table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackBand {
    /// Inclusive lower bound in degrees. `None` means unbounded.
    #[serde(default)]
    pub min_degrees: Option<f64>,

    /// Exclusive upper bound in degrees. `None` means unbounded.
    #[serde(default)]
    pub max_degrees: Option<f64>,

    pub label: String,
    pub rating: Rating,
    pub recommendation: String,
}

impl FeedbackBand {
    pub fn new(
        min_degrees: Option<f64>,
        max_degrees: Option<f64>,
        label: impl Into<String>,
        rating: Rating,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            min_degrees,
            max_degrees,
            label: label.into(),
            rating,
            recommendation: recommendation.into(),
        }
    }

    /// Whether `degrees` falls inside `[min, max)`.
    pub fn contains(&self, degrees: f64) -> bool {
        let above_min = self.min_degrees.map_or(true, |min| degrees >= min);
        let below_max = self.max_degrees.map_or(true, |max| degrees < max);
        above_min && below_max
    }

    /// Human-readable range, e.g. `[90, 120)` or `< 90`.
    pub fn range_label(&self) -> String {
        match (self.min_degrees, self.max_degrees) {
            (None, None) => "any".to_string(),
            (None, Some(max)) => format!("< {max}"),
            (Some(min), None) => format!(">= {min}"),
            (Some(min), Some(max)) => format!("[{min}, {max})"),
        }
    }
}

/// Validation failures for a band table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BandTableError {
    #[error("feedback table is empty")]
    Empty,

    #[error("first band '{label}' must have no lower bound")]
    BoundedStart { label: String },

    #[error("last band '{label}' must have no upper bound")]
    BoundedEnd { label: String },

    #[error("band '{label}' has an unbounded edge in the middle of the table")]
    InteriorUnbounded { label: String },

    #[error("band '{label}' has non-finite bound")]
    NonFinite { label: String },

    #[error("band '{label}' is empty or inverted")]
    EmptyRange { label: String },

    #[error("band '{previous}' ends at {end} but '{next}' starts at {start}")]
    Discontinuous {
        previous: String,
        next: String,
        end: f64,
        start: f64,
    },
}

/// A validated, ordered, gap-free feedback table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FeedbackBand>", into = "Vec<FeedbackBand>")]
pub struct FeedbackBands {
    bands: Vec<FeedbackBand>,
}

impl FeedbackBands {
    /// Validate and wrap an ordered list of bands.
    pub fn new(bands: Vec<FeedbackBand>) -> Result<Self, BandTableError> {
        let first = bands.first().ok_or(BandTableError::Empty)?;
        if first.min_degrees.is_some() {
            return Err(BandTableError::BoundedStart {
                label: first.label.clone(),
            });
        }
        if let Some(last) = bands.last() {
            if last.max_degrees.is_some() {
                return Err(BandTableError::BoundedEnd {
                    label: last.label.clone(),
                });
            }
        }

        let last_index = bands.len() - 1;
        for (i, band) in bands.iter().enumerate() {
            let interior_min = i > 0 && band.min_degrees.is_none();
            let interior_max = i < last_index && band.max_degrees.is_none();
            if interior_min || interior_max {
                return Err(BandTableError::InteriorUnbounded {
                    label: band.label.clone(),
                });
            }

            let bounds = [band.min_degrees, band.max_degrees];
            if bounds.iter().flatten().any(|v| !v.is_finite()) {
                return Err(BandTableError::NonFinite {
                    label: band.label.clone(),
                });
            }

            if let (Some(min), Some(max)) = (band.min_degrees, band.max_degrees) {
                if min >= max {
                    return Err(BandTableError::EmptyRange {
                        label: band.label.clone(),
                    });
                }
            }
        }

        for pair in bands.windows(2) {
            let (previous, next) = (&pair[0], &pair[1]);
            if let (Some(end), Some(start)) = (previous.max_degrees, next.min_degrees) {
                if end != start {
                    return Err(BandTableError::Discontinuous {
                        previous: previous.label.clone(),
                        next: next.label.clone(),
                        end,
                        start,
                    });
                }
            }
        }

        Ok(Self { bands })
    }

    /// Three-band table: `< 90` too tight, `[90, 120)` optimal, `>= 120` too wide.
    pub fn standard() -> Self {
        Self {
            bands: vec![
                FeedbackBand::new(
                    None,
                    Some(90.0),
                    "too tight",
                    Rating::Poor,
                    "Elbow is too bent at release. Extend the arm more through the ball.",
                ),
                FeedbackBand::new(
                    Some(90.0),
                    Some(120.0),
                    "optimal",
                    Rating::Good,
                    "Release angle is in the optimal range. Repeat this form on every shot.",
                ),
                FeedbackBand::new(
                    Some(120.0),
                    None,
                    "too wide",
                    Rating::Poor,
                    "Elbow is too open at release. Keep the elbow more bent for control.",
                ),
            ],
        }
    }

    /// Five-band table with "slightly" bands at 80-90 and 120-140 degrees.
    pub fn detailed() -> Self {
        Self {
            bands: vec![
                FeedbackBand::new(
                    None,
                    Some(80.0),
                    "too tight",
                    Rating::Poor,
                    "Release angle is well outside the optimal range. Practice the shot \
                     motion slowly, focusing on elbow positioning.",
                ),
                FeedbackBand::new(
                    Some(80.0),
                    Some(90.0),
                    "slightly tight",
                    Rating::Warning,
                    "Try extending your arm slightly more at the release point, with a \
                     smooth upward motion rather than a push.",
                ),
                FeedbackBand::new(
                    Some(90.0),
                    Some(120.0),
                    "optimal",
                    Rating::Good,
                    "Release angle is in the optimal range. Focus on consistency and \
                     replicate this angle on every shot.",
                ),
                FeedbackBand::new(
                    Some(120.0),
                    Some(140.0),
                    "slightly wide",
                    Rating::Warning,
                    "Keep your elbow more bent at release for better control and practice \
                     the follow-through with a higher elbow.",
                ),
                FeedbackBand::new(
                    Some(140.0),
                    None,
                    "too wide",
                    Rating::Poor,
                    "Release angle is well outside the optimal range. Review shooting \
                     fundamentals and record from multiple angles.",
                ),
            ],
        }
    }

    pub fn bands(&self) -> &[FeedbackBand] {
        &self.bands
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

impl Default for FeedbackBands {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<FeedbackBand>> for FeedbackBands {
    type Error = BandTableError;

    fn try_from(bands: Vec<FeedbackBand>) -> Result<Self, Self::Error> {
        Self::new(bands)
    }
}

impl From<FeedbackBands> for Vec<FeedbackBand> {
    fn from(table: FeedbackBands) -> Self {
        table.bands
    }
}
