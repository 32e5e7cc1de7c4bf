//! Risk classification

use crate::detection::Detection;
use crate::geometry::Roi;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tri-state blind-spot risk classification.
///
/// Ordered by severity so a frame's result is the maximum over its
/// overlapping detections.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum RiskLevel {
    #[default]
    None,
    Low,
    High,
}

impl RiskLevel {
    /// Wire token for the outbound telemetry line
    pub fn as_wire_token(&self) -> &'static str {
        match self {
            RiskLevel::None => "NONE",
            RiskLevel::Low => "LOW",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire_token())
    }
}

/// Classify one frame's detections against the monitored region.
///
/// A detection contributes its class severity only if its box strictly
/// overlaps the region; the result is the maximum contribution, `None`
/// when nothing overlaps. Pure and stateless.
pub fn evaluate(detections: &[Detection], roi: &Roi) -> RiskLevel {
    detections
        .iter()
        .filter(|d| d.bbox.overlaps(roi.rect()))
        .map(|d| d.class().severity())
        .max()
        .unwrap_or(RiskLevel::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox;
    use proptest::prelude::*;

    fn roi() -> Roi {
        Roi::new(100, 100, 500, 400).unwrap()
    }

    #[test]
    fn test_empty_frame_is_none() {
        assert_eq!(evaluate(&[], &roi()), RiskLevel::None);
    }

    #[test]
    fn test_person_in_region_is_high() {
        // overlap holds: 50 < 500, 100 < 150, 50 < 400, 100 < 150
        let detections = vec![Detection::new("person", 50, 50, 150, 150)];
        assert_eq!(evaluate(&detections, &roi()), RiskLevel::High);
    }

    #[test]
    fn test_box_touching_region_edge_is_none() {
        // box.x2 == roi.x1 and box.y2 == roi.y1: strict test fails
        let detections = vec![Detection::new("person", 0, 0, 100, 100)];
        assert_eq!(evaluate(&detections, &roi()), RiskLevel::None);
    }

    #[test]
    fn test_vehicle_only_is_low() {
        let detections = vec![
            Detection::new("car", 120, 120, 200, 200),
            Detection::new("bus", 300, 150, 450, 300),
        ];
        assert_eq!(evaluate(&detections, &roi()), RiskLevel::Low);
    }

    #[test]
    fn test_person_outranks_vehicles() {
        let detections = vec![
            Detection::new("car", 120, 120, 200, 200),
            Detection::new("person", 250, 150, 320, 350),
            Detection::new("motorbike", 300, 150, 450, 300),
        ];
        assert_eq!(evaluate(&detections, &roi()), RiskLevel::High);
    }

    #[test]
    fn test_unknown_label_in_region_is_none() {
        let detections = vec![Detection::new("traffic light", 150, 150, 250, 250)];
        assert_eq!(evaluate(&detections, &roi()), RiskLevel::None);
    }

    #[test]
    fn test_person_outside_region_is_none() {
        let detections = vec![Detection::new("person", 600, 500, 700, 600)];
        assert_eq!(evaluate(&detections, &roi()), RiskLevel::None);
    }

    prop_compose! {
        fn arb_label()(label in prop_oneof![
            Just("person".to_string()),
            Just("car".to_string()),
            Just("motorbike".to_string()),
            Just("bus".to_string()),
            "[a-z]{1,12}",
        ]) -> String {
            label
        }
    }

    prop_compose! {
        fn arb_box()(x1 in -1000i32..1000, y1 in -1000i32..1000,
                     w in 1i32..500, h in 1i32..500) -> BoundingBox {
            BoundingBox::new(x1, y1, x1 + w, y1 + h)
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig { max_global_rejects: 20000, ..ProptestConfig::default() })]
        #[test]
        fn non_overlapping_detection_never_raises_risk(
            label in arb_label(),
            bbox in arb_box(),
        ) {
            let roi = roi();
            prop_assume!(!bbox.overlaps(roi.rect()));

            let detections = vec![Detection { label, bbox }];
            prop_assert_eq!(evaluate(&detections, &roi), RiskLevel::None);
        }

        #[test]
        fn overlapping_person_always_wins(
            others in prop::collection::vec((arb_label(), arb_box()), 0..8),
            bbox in arb_box(),
        ) {
            let roi = roi();
            prop_assume!(bbox.overlaps(roi.rect()));

            let mut detections: Vec<Detection> = others
                .into_iter()
                .map(|(label, bbox)| Detection { label, bbox })
                .collect();
            detections.push(Detection { label: "person".to_string(), bbox });

            prop_assert_eq!(evaluate(&detections, &roi), RiskLevel::High);
        }

        #[test]
        fn only_vehicles_overlapping_is_low(
            bbox in arb_box(),
            label in prop_oneof![
                Just("car".to_string()),
                Just("motorbike".to_string()),
                Just("bus".to_string()),
                Just("truck".to_string()),
            ],
        ) {
            let roi = roi();
            prop_assume!(bbox.overlaps(roi.rect()));

            let detections = vec![Detection { label, bbox }];
            prop_assert_eq!(evaluate(&detections, &roi), RiskLevel::Low);
        }
    }
}
