//! Pose and gesture classification over a single hand skeleton.
//!
//! Every function here is total: a hand that is not well formed classifies
//! as [`Pose::Invalid`] and fails every gesture predicate.

use crate::hand::{HandObservation, Keypoint, Landmark};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum thumb-to-fingertip distance for a closed fist.
pub const PINCH_THRESHOLD: f32 = 0.15;
/// Minimum index-to-middle fingertip distance for a V sign.
pub const SPREAD_THRESHOLD: f32 = 0.15;
/// Minimum opening angle (degrees) at the index and ring fingertips for a V sign.
pub const SPREAD_ANGLE_DEG: f32 = 60.0;

/// Hand shape recognized for rock-paper-scissors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pose {
    Rock,
    Paper,
    Scissors,
    Invalid,
}

impl Pose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rock => "rock",
            Self::Paper => "paper",
            Self::Scissors => "scissors",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Landmarks of a well-formed hand, looked up once.
struct Tips<'a> {
    hand: &'a HandObservation,
}

impl<'a> Tips<'a> {
    fn of(hand: &'a HandObservation) -> Option<Self> {
        hand.is_well_formed().then_some(Self { hand })
    }

    fn at(&self, landmark: Landmark) -> &'a Keypoint {
        // Safe to index: well-formed hands carry all 21 landmarks.
        &self.hand.points()[landmark.index()]
    }

    fn y(&self, landmark: Landmark) -> f32 {
        self.at(landmark).y
    }
}

/// Classify a hand as rock, paper or scissors.
///
/// Checks run in order and the first match wins: a tight thumb pinch is rock
/// even when the fingers also sit above their knuckles.
pub fn classify(hand: &HandObservation) -> Pose {
    let Some(tips) = Tips::of(hand) else {
        return Pose::Invalid;
    };

    let thumb = tips.at(Landmark::ThumbTip);
    let index = tips.at(Landmark::IndexTip);
    let middle = tips.at(Landmark::MiddleTip);
    let ring = tips.at(Landmark::RingTip);
    let little = tips.at(Landmark::LittleTip);

    if thumb.distance(index) < PINCH_THRESHOLD && thumb.distance(middle) < PINCH_THRESHOLD {
        return Pose::Rock;
    }

    let extended = [
        (Landmark::IndexTip, Landmark::IndexMcp),
        (Landmark::MiddleTip, Landmark::MiddleMcp),
        (Landmark::RingTip, Landmark::RingMcp),
        (Landmark::LittleTip, Landmark::LittleMcp),
    ]
    .iter()
    .all(|&(tip, base)| tips.y(tip) < tips.y(base));
    if extended {
        return Pose::Paper;
    }

    let spread = index.distance(middle) > SPREAD_THRESHOLD
        && angle_exceeds(thumb, index, middle, SPREAD_ANGLE_DEG)
        && angle_exceeds(middle, ring, little, SPREAD_ANGLE_DEG);
    if spread {
        return Pose::Scissors;
    }

    Pose::Invalid
}

/// Open hand with the thumb and little finger raised above the middle two.
pub fn is_restart_gesture(hand: &HandObservation) -> bool {
    let Some(tips) = Tips::of(hand) else {
        return false;
    };
    let middle = tips.y(Landmark::MiddleTip);
    let index = tips.y(Landmark::IndexTip);

    index < middle
        && index < tips.y(Landmark::RingTip)
        && tips.y(Landmark::ThumbTip) < middle
        && tips.y(Landmark::LittleTip) < middle
}

/// Index and little fingertips both above the thumb tip.
pub fn is_start_pose(hand: &HandObservation) -> bool {
    let Some(tips) = Tips::of(hand) else {
        return false;
    };
    let thumb = tips.y(Landmark::ThumbTip);

    tips.y(Landmark::IndexTip) < thumb && tips.y(Landmark::LittleTip) < thumb
}

/// Index fingertip is the topmost of the five fingertips.
pub fn is_pointing_pose(hand: &HandObservation) -> bool {
    let Some(tips) = Tips::of(hand) else {
        return false;
    };
    let index = tips.y(Landmark::IndexTip);

    Landmark::fingertips()
        .iter()
        .filter(|&&tip| tip != Landmark::IndexTip)
        .all(|&tip| index < tips.y(tip))
}

/// Whether the angle at `vertex` between `a` and `b` is wider than `min_deg`.
///
/// A degenerate angle (either arm of zero length) never exceeds the bound.
fn angle_exceeds(a: &Keypoint, vertex: &Keypoint, b: &Keypoint, min_deg: f32) -> bool {
    angle_deg(a, vertex, b).map_or(false, |angle| angle > min_deg)
}

fn angle_deg(a: &Keypoint, vertex: &Keypoint, b: &Keypoint) -> Option<f32> {
    let (ux, uy) = (a.x - vertex.x, a.y - vertex.y);
    let (vx, vy) = (b.x - vertex.x, b.y - vertex.y);
    let norms = ux.hypot(uy) * vx.hypot(vy);
    if norms <= f32::EPSILON {
        return None;
    }

    let cos = ((ux * vx + uy * vy) / norms).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::testing::HandBuilder;

    #[test]
    fn test_canned_shapes() {
        assert_eq!(classify(&HandBuilder::fist().build()), Pose::Rock);
        assert_eq!(classify(&HandBuilder::open_palm().build()), Pose::Paper);
        assert_eq!(classify(&HandBuilder::scissors().build()), Pose::Scissors);
        assert_eq!(classify(&HandBuilder::pointing().build()), Pose::Invalid);
    }

    #[test]
    fn test_pinch_wins_over_extended_fingers() {
        // Open palm with the thumb pulled up between index and middle tips.
        let hand = HandBuilder::open_palm()
            .set(Landmark::ThumbTip, 0.43, 0.30)
            .build();
        assert_eq!(classify(&hand), Pose::Rock);
    }

    #[test]
    fn test_rock_ignores_other_joints() {
        let hand = HandBuilder::scissors()
            .set(Landmark::ThumbTip, 0.45, 0.29)
            .set(Landmark::IndexTip, 0.40, 0.30)
            .set(Landmark::MiddleTip, 0.50, 0.28)
            .set(Landmark::Wrist, 0.1, 0.1)
            .build();
        assert_eq!(classify(&hand), Pose::Rock);
    }

    #[test]
    fn test_one_curled_finger_is_not_paper() {
        let hand = HandBuilder::open_palm()
            .set(Landmark::LittleTip, 0.62, 0.70)
            .build();
        assert_ne!(classify(&hand), Pose::Paper);
    }

    #[test]
    fn test_narrow_v_is_not_scissors() {
        let hand = HandBuilder::scissors()
            .set(Landmark::MiddleTip, 0.45, 0.28)
            .build();
        assert_eq!(classify(&hand), Pose::Invalid);
    }

    #[test]
    fn test_malformed_hand_is_invalid_everywhere() {
        let mut points = HandBuilder::fist().build().points().to_vec();
        points.truncate(12);
        let short = HandObservation::new(points);

        assert_eq!(classify(&short), Pose::Invalid);
        assert!(!is_restart_gesture(&short));
        assert!(!is_start_pose(&short));
        assert!(!is_pointing_pose(&short));

        let empty = HandObservation::default();
        assert_eq!(classify(&empty), Pose::Invalid);

        let offscreen = HandBuilder::fist().set(Landmark::Wrist, -0.2, 0.5).build();
        assert_eq!(classify(&offscreen), Pose::Invalid);
    }

    #[test]
    fn test_gesture_predicates() {
        let pointing = HandBuilder::pointing().build();
        assert!(is_pointing_pose(&pointing));
        assert!(!is_restart_gesture(&pointing));
        assert!(!is_start_pose(&pointing));

        let restart = HandBuilder::restart().build();
        assert!(is_restart_gesture(&restart));

        let palm = HandBuilder::open_palm().build();
        assert!(is_start_pose(&palm));
        assert!(!is_pointing_pose(&palm));

        let fist = HandBuilder::fist().build();
        assert!(!is_start_pose(&fist));
        assert!(!is_restart_gesture(&fist));
    }

    #[test]
    fn test_degenerate_angle() {
        let p = Keypoint::new(0.5, 0.5);
        assert_eq!(angle_deg(&p, &p, &Keypoint::new(0.6, 0.5)), None);

        let right = angle_deg(
            &Keypoint::new(0.6, 0.5),
            &p,
            &Keypoint::new(0.5, 0.4),
        )
        .unwrap();
        assert!((right - 90.0).abs() < 1e-3);
    }
}
