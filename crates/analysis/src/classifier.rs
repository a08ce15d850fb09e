//! Release angle classification against a feedback table.

use shotform_pose_model::{Feedback, FeedbackBand, FeedbackBands};

/// Classification failures.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ClassifyError {
    #[error("angle {0} is not a finite number of degrees")]
    NonFinite(f64),

    #[error("no feedback band covers {0} degrees")]
    Uncovered(f64),
}

/// Maps an angle to exactly one feedback band.
#[derive(Debug, Clone, Default)]
pub struct FeedbackClassifier {
    bands: FeedbackBands,
}

impl FeedbackClassifier {
    pub fn new(bands: FeedbackBands) -> Self {
        Self { bands }
    }

    pub fn bands(&self) -> &FeedbackBands {
        &self.bands
    }

    /// The band containing `degrees`.
    pub fn band_for(&self, degrees: f64) -> Result<&FeedbackBand, ClassifyError> {
        if !degrees.is_finite() {
            return Err(ClassifyError::NonFinite(degrees));
        }
        self.bands
            .bands()
            .iter()
            .find(|band| band.contains(degrees))
            .ok_or(ClassifyError::Uncovered(degrees))
    }

    pub fn classify(&self, degrees: f64) -> Result<Feedback, ClassifyError> {
        let band = self.band_for(degrees)?;
        Ok(Feedback {
            label: band.label.clone(),
            rating: band.rating,
            recommendation: band.recommendation.clone(),
            range: band.range_label(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shotform_pose_model::Rating;

    #[test]
    fn test_standard_boundaries() {
        let classifier = FeedbackClassifier::default();
        assert_eq!(classifier.classify(89.999).unwrap().label, "too tight");
        assert_eq!(classifier.classify(90.0).unwrap().label, "optimal");
        assert_eq!(classifier.classify(119.999).unwrap().label, "optimal");
        assert_eq!(classifier.classify(120.0).unwrap().label, "too wide");
        assert_eq!(classifier.classify(0.0).unwrap().label, "too tight");
        assert_eq!(classifier.classify(180.0).unwrap().label, "too wide");
    }

    #[test]
    fn test_feedback_carries_band_details() {
        let feedback = FeedbackClassifier::default().classify(105.0).unwrap();
        assert_eq!(feedback.rating, Rating::Good);
        assert_eq!(feedback.range, "[90, 120)");
        assert!(!feedback.recommendation.is_empty());
    }

    #[test]
    fn test_detailed_table() {
        let classifier = FeedbackClassifier::new(FeedbackBands::detailed());
        let label = |deg: f64| classifier.classify(deg).unwrap().label;
        assert_eq!(label(79.9), "too tight");
        assert_eq!(label(80.0), "slightly tight");
        assert_eq!(label(100.0), "optimal");
        assert_eq!(label(120.0), "slightly wide");
        assert_eq!(label(140.0), "too wide");
        assert_eq!(classifier.classify(85.0).unwrap().rating, Rating::Warning);
    }

    #[test]
    fn test_non_finite_rejected() {
        let classifier = FeedbackClassifier::default();
        assert!(matches!(
            classifier.classify(f64::NAN),
            Err(ClassifyError::NonFinite(_))
        ));
        assert!(classifier.classify(f64::INFINITY).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn prop_every_angle_has_exactly_one_band(degrees in 0.0f64..=180.0) {
            for bands in [FeedbackBands::standard(), FeedbackBands::detailed()] {
                let matching = bands.bands().iter().filter(|b| b.contains(degrees)).count();
                prop_assert_eq!(matching, 1);
                prop_assert!(FeedbackClassifier::new(bands).classify(degrees).is_ok());
            }
        }

        #[test]
        fn prop_out_of_range_values_still_classified(degrees in -1e6f64..1e6) {
            prop_assert!(FeedbackClassifier::default().classify(degrees).is_ok());
        }
    }
}
