//! Hand skeleton keypoints as delivered by the hand tracker.
//!
//! One [`HandObservation`] holds the 21 landmarks of a single detected hand in
//! a single frame, in image-relative units (0.0 to 1.0, y growing downwards).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of landmarks in a hand skeleton.
pub const LANDMARK_COUNT: usize = 21;

/// The 21 anatomical landmarks, numbered the way the tracker emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Landmark {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    LittleMcp,
    LittlePip,
    LittleDip,
    LittleTip,
}

impl Landmark {
    pub const ALL: [Landmark; LANDMARK_COUNT] = [
        Self::Wrist,
        Self::ThumbCmc,
        Self::ThumbMcp,
        Self::ThumbIp,
        Self::ThumbTip,
        Self::IndexMcp,
        Self::IndexPip,
        Self::IndexDip,
        Self::IndexTip,
        Self::MiddleMcp,
        Self::MiddlePip,
        Self::MiddleDip,
        Self::MiddleTip,
        Self::RingMcp,
        Self::RingPip,
        Self::RingDip,
        Self::RingTip,
        Self::LittleMcp,
        Self::LittlePip,
        Self::LittleDip,
        Self::LittleTip,
    ];

    /// Position of this landmark in a [`HandObservation`] (0-20).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wrist => "wrist",
            Self::ThumbCmc => "thumb-cmc",
            Self::ThumbMcp => "thumb-mcp",
            Self::ThumbIp => "thumb-ip",
            Self::ThumbTip => "thumb-tip",
            Self::IndexMcp => "index-mcp",
            Self::IndexPip => "index-pip",
            Self::IndexDip => "index-dip",
            Self::IndexTip => "index-tip",
            Self::MiddleMcp => "middle-mcp",
            Self::MiddlePip => "middle-pip",
            Self::MiddleDip => "middle-dip",
            Self::MiddleTip => "middle-tip",
            Self::RingMcp => "ring-mcp",
            Self::RingPip => "ring-pip",
            Self::RingDip => "ring-dip",
            Self::RingTip => "ring-tip",
            Self::LittleMcp => "little-mcp",
            Self::LittlePip => "little-pip",
            Self::LittleDip => "little-dip",
            Self::LittleTip => "little-tip",
        }
    }

    /// Thumb, index, middle, ring and little fingertips.
    pub fn fingertips() -> [Landmark; 5] {
        [
            Self::ThumbTip,
            Self::IndexTip,
            Self::MiddleTip,
            Self::RingTip,
            Self::LittleTip,
        ]
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single normalized landmark position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "KeypointRepr")]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    /// Depth relative to the wrist, when the tracker provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
}

impl Keypoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: None }
    }

    /// Planar distance in normalized units; depth is ignored.
    pub fn distance(&self, other: &Keypoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn in_frame(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && (0.0..=1.0).contains(&self.x)
            && (0.0..=1.0).contains(&self.y)
            && self.z.map_or(true, f32::is_finite)
    }
}

// Recordings store keypoints either as `[x, y]` / `[x, y, z]` arrays or as objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum KeypointRepr {
    Planar([f32; 2]),
    Spatial([f32; 3]),
    Object {
        x: f32,
        y: f32,
        #[serde(default)]
        z: Option<f32>,
    },
}

impl From<KeypointRepr> for Keypoint {
    fn from(repr: KeypointRepr) -> Self {
        match repr {
            KeypointRepr::Planar([x, y]) => Self { x, y, z: None },
            KeypointRepr::Spatial([x, y, z]) => Self { x, y, z: Some(z) },
            KeypointRepr::Object { x, y, z } => Self { x, y, z },
        }
    }
}

/// All landmarks of one detected hand in one frame.
///
/// Construction never fails: a short or garbled list is kept as-is and
/// reported through [`HandObservation::is_well_formed`], so classifiers can
/// treat it as "no pose" instead of erroring mid-session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandObservation {
    points: Vec<Keypoint>,
}

impl HandObservation {
    pub fn new(points: Vec<Keypoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Keypoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, landmark: Landmark) -> Option<&Keypoint> {
        self.points.get(landmark.index())
    }

    /// Exactly 21 landmarks, all finite and inside the frame.
    pub fn is_well_formed(&self) -> bool {
        self.points.len() == LANDMARK_COUNT && self.first_out_of_frame().is_none()
    }

    /// First landmark that is non-finite or outside the frame.
    pub fn first_out_of_frame(&self) -> Option<Landmark> {
        Landmark::ALL
            .into_iter()
            .zip(&self.points)
            .find(|(_, point)| !point.in_frame())
            .map(|(landmark, _)| landmark)
    }
}

/// Canned hand shapes for tests and demos.
pub mod testing {
    use super::{HandObservation, Keypoint, Landmark, LANDMARK_COUNT};

    /// Builds a [`HandObservation`] from a base shape plus per-landmark overrides.
    #[derive(Debug, Clone)]
    pub struct HandBuilder {
        points: [Keypoint; LANDMARK_COUNT],
    }

    impl HandBuilder {
        fn palm() -> Self {
            let mut points = [Keypoint::default(); LANDMARK_COUNT];
            let base = [
                (Landmark::Wrist, 0.50, 0.90),
                (Landmark::ThumbCmc, 0.42, 0.85),
                (Landmark::ThumbMcp, 0.36, 0.78),
                (Landmark::ThumbIp, 0.32, 0.72),
                (Landmark::IndexMcp, 0.42, 0.60),
                (Landmark::MiddleMcp, 0.48, 0.58),
                (Landmark::RingMcp, 0.54, 0.60),
                (Landmark::LittleMcp, 0.60, 0.63),
            ];
            for (landmark, x, y) in base {
                points[landmark.index()] = Keypoint::new(x, y);
            }
            Self { points }
        }

        fn with_tips(mut self, tips: [(f32, f32); 5]) -> Self {
            let chains = [
                (Landmark::ThumbIp, Landmark::ThumbIp, Landmark::ThumbTip),
                (Landmark::IndexMcp, Landmark::IndexPip, Landmark::IndexTip),
                (Landmark::MiddleMcp, Landmark::MiddlePip, Landmark::MiddleTip),
                (Landmark::RingMcp, Landmark::RingPip, Landmark::RingTip),
                (Landmark::LittleMcp, Landmark::LittlePip, Landmark::LittleTip),
            ];
            for ((base, pip, tip), (x, y)) in chains.into_iter().zip(tips) {
                self.points[tip.index()] = Keypoint::new(x, y);
                if pip != base {
                    // PIP and DIP sit a third and two thirds of the way to the tip.
                    let b = self.points[base.index()];
                    let lerp = |t: f32| Keypoint::new(b.x + (x - b.x) * t, b.y + (y - b.y) * t);
                    self.points[pip.index()] = lerp(1.0 / 3.0);
                    self.points[pip.index() + 1] = lerp(2.0 / 3.0);
                }
            }
            self
        }

        /// All four fingers extended above their knuckles.
        pub fn open_palm() -> Self {
            Self::palm().with_tips([
                (0.28, 0.65),
                (0.38, 0.30),
                (0.48, 0.25),
                (0.57, 0.30),
                (0.66, 0.40),
            ])
        }

        /// Fingers curled into the palm, thumb tucked against them.
        pub fn fist() -> Self {
            Self::palm().with_tips([
                (0.46, 0.62),
                (0.44, 0.66),
                (0.49, 0.67),
                (0.54, 0.68),
                (0.59, 0.69),
            ])
        }

        /// Index and middle spread in a V, ring and little curled.
        pub fn scissors() -> Self {
            Self::palm().with_tips([
                (0.47, 0.66),
                (0.35, 0.30),
                (0.55, 0.28),
                (0.54, 0.68),
                (0.59, 0.69),
            ])
        }

        /// Only the index finger raised.
        pub fn pointing() -> Self {
            Self::palm().with_tips([
                (0.47, 0.66),
                (0.42, 0.30),
                (0.49, 0.67),
                (0.54, 0.68),
                (0.59, 0.69),
            ])
        }

        /// Thumb and little finger raised above the middle two fingers.
        pub fn restart() -> Self {
            Self::palm().with_tips([
                (0.30, 0.40),
                (0.40, 0.30),
                (0.48, 0.50),
                (0.55, 0.50),
                (0.65, 0.40),
            ])
        }

        pub fn set(mut self, landmark: Landmark, x: f32, y: f32) -> Self {
            self.points[landmark.index()] = Keypoint::new(x, y);
            self
        }

        /// Shift the whole hand so the index fingertip lands on `(x, y)`.
        pub fn index_tip_at(mut self, x: f32, y: f32) -> Self {
            let tip = self.points[Landmark::IndexTip.index()];
            let (dx, dy) = (x - tip.x, y - tip.y);
            for point in self.points.iter_mut() {
                point.x += dx;
                point.y += dy;
            }
            self
        }

        pub fn build(self) -> HandObservation {
            HandObservation::new(self.points.to_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::HandBuilder;
    use super::*;

    #[test]
    fn test_landmark_indices_follow_tracker_numbering() {
        assert_eq!(Landmark::Wrist.index(), 0);
        assert_eq!(Landmark::ThumbTip.index(), 4);
        assert_eq!(Landmark::IndexMcp.index(), 5);
        assert_eq!(Landmark::IndexTip.index(), 8);
        assert_eq!(Landmark::MiddleTip.index(), 12);
        assert_eq!(Landmark::RingTip.index(), 16);
        assert_eq!(Landmark::LittleMcp.index(), 17);
        assert_eq!(Landmark::LittleTip.index(), 20);
        for (i, landmark) in Landmark::ALL.iter().enumerate() {
            assert_eq!(landmark.index(), i);
        }
    }

    #[test]
    fn test_keypoint_accepts_array_and_object_forms() {
        let points: Vec<Keypoint> =
            serde_json::from_str(r#"[[0.1, 0.2], [0.3, 0.4, -0.05], {"x": 0.5, "y": 0.6}]"#)
                .unwrap();

        assert_eq!(points[0], Keypoint::new(0.1, 0.2));
        assert_eq!(points[1].z, Some(-0.05));
        assert_eq!(points[2], Keypoint::new(0.5, 0.6));
    }

    #[test]
    fn test_well_formed_requires_full_skeleton_in_frame() {
        assert!(HandBuilder::open_palm().build().is_well_formed());

        let mut short = HandBuilder::open_palm().build().points().to_vec();
        short.pop();
        assert!(!HandObservation::new(short).is_well_formed());

        let outside = HandBuilder::open_palm().set(Landmark::Wrist, 0.5, 1.4).build();
        assert!(!outside.is_well_formed());

        let nan = HandBuilder::open_palm()
            .set(Landmark::IndexTip, f32::NAN, 0.2)
            .build();
        assert!(!nan.is_well_formed());
    }

    #[test]
    fn test_first_out_of_frame_names_landmark() {
        let hand = HandBuilder::open_palm().build();
        assert_eq!(hand.first_out_of_frame(), None);

        let hand = HandBuilder::open_palm()
            .set(Landmark::RingTip, 0.5, 1.2)
            .set(Landmark::LittleTip, f32::NAN, 0.5)
            .build();
        let misplaced = hand.first_out_of_frame().unwrap();
        assert_eq!(misplaced, Landmark::RingTip);
        assert_eq!(misplaced.to_string(), "ring-tip");
        assert!(!hand.is_well_formed());
    }

    #[test]
    fn test_index_tip_at_moves_whole_hand() {
        let hand = HandBuilder::pointing().index_tip_at(0.3, 0.25).build();
        let tip = hand.get(Landmark::IndexTip).unwrap();
        assert!((tip.x - 0.3).abs() < 1e-6);
        assert!((tip.y - 0.25).abs() < 1e-6);

        let wrist = hand.get(Landmark::Wrist).unwrap();
        assert!((wrist.y - 0.85).abs() < 1e-5);
    }
}
