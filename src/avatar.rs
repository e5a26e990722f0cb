//! Avatar rig: cuboid segments posed by an [`AvatarPose`].
//!
//! A rig can be loaded from a TOML asset. When the asset is missing or
//! malformed the scene falls back to [`RigSpec::placeholder`], a single cube.

use crate::animation::AvatarPose;
use crate::color::Rgb;
use crate::math::{
    add, calculate_normal, multiply_matrices, multiply_matrix_vector, rotation_z, scale, yaw_pitch,
    IDENTITY,
};
use crate::palette::Palette;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RigError {
    #[error("failed to read rig {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid rig {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("rig {0} has no segments")]
    Empty(PathBuf),
}

/// Which pose channel drives a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentRole {
    Head,
    Eye,
    Body,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
    /// Follows the group transform only
    Prop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSlot {
    Skin,
    Shirt,
    Trousers,
    Eyes,
    Accent,
}

impl ColorSlot {
    pub fn resolve(self, palette: &Palette) -> Rgb {
        match self {
            ColorSlot::Skin => palette.skin,
            ColorSlot::Shirt => palette.shirt,
            ColorSlot::Trousers => palette.trousers,
            ColorSlot::Eyes => palette.eyes,
            ColorSlot::Accent => palette.accent,
        }
    }
}

/// A cuboid rotating about `pivot`; its centre sits at `pivot + offset` at rest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpec {
    pub name: String,
    pub role: SegmentRole,
    pub half_extents: [f64; 3],
    pub pivot: [f64; 3],
    #[serde(default)]
    pub offset: [f64; 3],
    pub color: ColorSlot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigSpec {
    pub segments: Vec<SegmentSpec>,
}

fn segment(
    name: &str,
    role: SegmentRole,
    half_extents: [f64; 3],
    pivot: [f64; 3],
    offset: [f64; 3],
    color: ColorSlot,
) -> SegmentSpec {
    SegmentSpec {
        name: name.to_string(),
        role,
        half_extents,
        pivot,
        offset,
        color,
    }
}

impl RigSpec {
    /// Head, eyes, body, arms and legs of the portfolio figure
    pub fn default_figure() -> Self {
        use ColorSlot::*;
        use SegmentRole::*;
        let neck = [0.0, 1.5, 0.0];
        RigSpec {
            segments: vec![
                segment("head", Head, [0.45, 0.45, 0.45], neck, [0.0, 0.5, 0.0], Skin),
                segment("left_eye", Eye, [0.08, 0.08, 0.03], neck, [-0.17, 0.6, 0.46], Eyes),
                segment("right_eye", Eye, [0.08, 0.08, 0.03], neck, [0.17, 0.6, 0.46], Eyes),
                segment("body", Body, [0.55, 0.75, 0.35], [0.0, 0.75, 0.0], [0.0; 3], Shirt),
                segment("left_arm", LeftArm, [0.15, 0.5, 0.15], [-0.8, 1.25, 0.0], [0.0, -0.5, 0.0], Skin),
                segment("right_arm", RightArm, [0.15, 0.5, 0.15], [0.8, 1.25, 0.0], [0.0, -0.5, 0.0], Skin),
                segment("left_leg", LeftLeg, [0.2, 0.6, 0.2], [-0.25, -0.25, 0.0], [0.0, -0.6, 0.0], Trousers),
                segment("right_leg", RightLeg, [0.2, 0.6, 0.2], [0.25, -0.25, 0.0], [0.0, -0.6, 0.0], Trousers),
            ],
        }
    }

    /// Single cube standing in for a rig that failed to load
    pub fn placeholder() -> Self {
        RigSpec {
            segments: vec![segment(
                "placeholder",
                SegmentRole::Prop,
                [0.8, 0.8, 0.8],
                [0.0, 0.5, 0.0],
                [0.0; 3],
                ColorSlot::Accent,
            )],
        }
    }

    pub fn load(path: &Path) -> Result<Self, RigError> {
        let raw = fs::read_to_string(path).map_err(|source| RigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rig: RigSpec = toml::from_str(&raw).map_err(|source| RigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if rig.segments.is_empty() {
            return Err(RigError::Empty(path.to_path_buf()));
        }
        Ok(rig)
    }

    pub fn load_or_placeholder(path: &Path) -> Self {
        match Self::load(path) {
            Ok(rig) => {
                tracing::info!("loaded rig {} ({} segments)", path.display(), rig.segments.len());
                rig
            }
            Err(e) => {
                tracing::warn!("{}; using placeholder figure", e);
                Self::placeholder()
            }
        }
    }

    /// Vertical span (min, max) of the rig at rest
    pub fn vertical_bounds(&self) -> (f64, f64) {
        self.segments.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            let center = s.pivot[1] + s.offset[1];
            (lo.min(center - s.half_extents[1]), hi.max(center + s.half_extents[1]))
        })
    }
}

/// Cube corners; faces below wind counter-clockwise seen from outside
const CORNERS: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

pub const FACES: [(usize, usize, usize, usize); 6] = [
    (4, 5, 6, 7),
    (1, 0, 3, 2),
    (0, 4, 7, 3),
    (5, 1, 2, 6),
    (7, 6, 2, 3),
    (0, 1, 5, 4),
];

pub const EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [[f64; 3]; 3],
    pub normal: [f64; 3],
    pub color: Rgb,
}

/// World-space corners of one posed segment
#[derive(Debug, Clone, PartialEq)]
pub struct PosedSegment {
    pub corners: [[f64; 3]; 8],
    pub color: Rgb,
}

pub struct Scene {
    rig: RigSpec,
}

impl Scene {
    pub fn new(rig: RigSpec) -> Self {
        Scene { rig }
    }

    pub fn rig(&self) -> &RigSpec {
        &self.rig
    }

    fn segment_rotation(role: SegmentRole, pose: &AvatarPose) -> [[f64; 3]; 3] {
        match role {
            SegmentRole::Head | SegmentRole::Eye => yaw_pitch(pose.head_yaw, pose.head_pitch),
            SegmentRole::LeftArm => rotation_z(pose.left_arm_swing),
            SegmentRole::RightArm => rotation_z(pose.right_arm_swing),
            SegmentRole::LeftLeg => rotation_z(pose.left_leg_swing),
            SegmentRole::RightLeg => rotation_z(pose.right_leg_swing),
            SegmentRole::Body | SegmentRole::Prop => IDENTITY,
        }
    }

    /// Applies the pose to every segment
    pub fn pose(&self, pose: &AvatarPose, palette: &Palette) -> Vec<PosedSegment> {
        let group = yaw_pitch(pose.group_yaw, pose.group_pitch);
        let lift = [0.0, pose.bounce, 0.0];

        self.rig
            .segments
            .iter()
            .map(|spec| {
                let local = Self::segment_rotation(spec.role, pose);
                let transform = multiply_matrices(&group, &local);
                let pivot = multiply_matrix_vector(&group, &spec.pivot);
                let mut extents = spec.half_extents;
                if spec.role == SegmentRole::Eye {
                    extents[1] *= pose.eye_openness;
                }

                let mut corners = [[0.0; 3]; 8];
                for (out, corner) in corners.iter_mut().zip(CORNERS.iter()) {
                    let at_rest = [
                        spec.offset[0] + corner[0] * extents[0],
                        spec.offset[1] + corner[1] * extents[1],
                        spec.offset[2] + corner[2] * extents[2],
                    ];
                    let rotated = add(&multiply_matrix_vector(&transform, &at_rest), &pivot);
                    *out = add(&scale(&rotated, pose.scale), &lift);
                }
                PosedSegment {
                    corners,
                    color: spec.color.resolve(palette),
                }
            })
            .collect()
    }

    /// Two triangles per cuboid face, with outward normals
    pub fn mesh(&self, pose: &AvatarPose, palette: &Palette) -> Vec<Triangle> {
        let mut triangles = Vec::with_capacity(self.rig.segments.len() * FACES.len() * 2);
        for seg in self.pose(pose, palette) {
            for &(a, b, c, d) in FACES.iter() {
                for [i, j, k] in [[a, b, c], [a, c, d]] {
                    let vertices = [seg.corners[i], seg.corners[j], seg.corners[k]];
                    triangles.push(Triangle {
                        vertices,
                        normal: calculate_normal(&vertices[0], &vertices[1], &vertices[2]),
                        color: seg.color,
                    });
                }
            }
        }
        triangles
    }
}
