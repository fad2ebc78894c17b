use euclid::default::{Rotation3D, Vector3D};

/// Source-provided monotonic timestamp in nanoseconds.
/// Only used for ordering and tolerance comparison.
pub type MCTime = i64;

pub type MCVector = Vector3D<f32>;
pub type MCRotation = Rotation3D<f32>;

// The MCPose struct represents a rigid pose: a position and a unit orientation.
// Composition follows the OpenXR convention of poses mapping a local space
// into its parent space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct MCPose {
    // Position in meters
    pub position: MCVector,

    // Orientation as a quaternion, normalized before composition
    pub orientation: MCRotation,
}

impl Default for MCPose {
    fn default() -> MCPose {
        MCPose::identity()
    }
}

impl MCPose {
    pub fn new(position: MCVector, orientation: MCRotation) -> MCPose {
        MCPose {
            position,
            orientation,
        }
    }

    pub fn identity() -> MCPose {
        MCPose::new(MCVector::zero(), MCRotation::identity())
    }

    pub fn from_translation(position: MCVector) -> MCPose {
        MCPose::new(position, MCRotation::identity())
    }

    pub fn from_rotation(orientation: MCRotation) -> MCPose {
        MCPose::new(MCVector::zero(), orientation)
    }

    /// Builds a pose from raw arrays, orientation given as `[x, y, z, w]`.
    pub fn from_arrays(position: [f32; 3], orientation: [f32; 4]) -> MCPose {
        MCPose::new(
            MCVector::new(position[0], position[1], position[2]),
            MCRotation::quaternion(orientation[0], orientation[1], orientation[2], orientation[3]),
        )
    }

    pub fn position_array(&self) -> [f32; 3] {
        [self.position.x, self.position.y, self.position.z]
    }

    /// Orientation as `[x, y, z, w]`.
    pub fn orientation_array(&self) -> [f32; 4] {
        let q = &self.orientation;
        [q.i, q.j, q.k, q.r]
    }

    pub fn normalized(&self) -> MCPose {
        MCPose::new(self.position, normalize_rotation(&self.orientation))
    }

    /// Returns the pose that applies `self` first and `other` afterwards.
    pub fn then(&self, other: &MCPose) -> MCPose {
        let a = normalize_rotation(&self.orientation);
        let b = normalize_rotation(&other.orientation);
        MCPose {
            position: b.transform_vector3d(self.position) + other.position,
            orientation: normalize_rotation(&a.then(&b)),
        }
    }

    pub fn inverse(&self) -> MCPose {
        let inverse = normalize_rotation(&self.orientation).inverse();
        MCPose {
            position: -inverse.transform_vector3d(self.position),
            orientation: inverse,
        }
    }

    pub fn is_identity(&self, epsilon: f32) -> bool {
        self.approx_eq(&MCPose::identity(), epsilon)
    }

    /// Compares positions component-wise and orientations up to sign.
    pub fn approx_eq(&self, other: &MCPose, epsilon: f32) -> bool {
        let d = self.position - other.position;
        if d.x.abs() > epsilon || d.y.abs() > epsilon || d.z.abs() > epsilon {
            return false;
        }
        let a = normalize_rotation(&self.orientation);
        let b = normalize_rotation(&other.orientation);
        let dot = a.i * b.i + a.j * b.j + a.k * b.k + a.r * b.r;
        1.0 - dot.abs() <= epsilon
    }
}

// A zero quaternion has no meaningful orientation, treat it as identity
// instead of producing NaNs.
pub fn normalize_rotation(rotation: &MCRotation) -> MCRotation {
    if rotation.square_norm() <= ::std::f32::EPSILON {
        return MCRotation::identity();
    }
    rotation.normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use euclid::Angle;

    const EPS: f32 = 1e-5;

    fn sample_pose() -> MCPose {
        MCPose::new(
            MCVector::new(0.5, -0.7, -0.3),
            MCRotation::around_y(Angle::radians(0.4)).then(&MCRotation::around_x(Angle::radians(-0.2))),
        )
    }

    #[test]
    fn inverse_cancels_pose() {
        let pose = sample_pose();
        assert!(pose.then(&pose.inverse()).is_identity(EPS));
        assert!(pose.inverse().then(&pose).is_identity(EPS));
    }

    #[test]
    fn then_applies_left_pose_first() {
        let forward = MCPose::from_translation(MCVector::new(0.0, 0.0, -1.0));
        let turn = MCPose::from_rotation(MCRotation::around_y(Angle::radians(::std::f32::consts::FRAC_PI_2)));
        let pose = forward.then(&turn);
        // (0, 0, -1) rotated a quarter turn around y lands on (-1, 0, 0)
        assert!((pose.position.x + 1.0).abs() < EPS);
        assert!(pose.position.z.abs() < EPS);
    }

    #[test]
    fn unnormalized_orientation_is_normalized_before_composition() {
        let raw = MCPose::from_arrays([0.0, 1.0, 0.0], [0.0, 0.0, 0.0, 2.0]);
        let composed = raw.then(&MCPose::identity());
        assert!((composed.orientation.square_norm() - 1.0).abs() < EPS);
        assert!(composed.approx_eq(&MCPose::from_translation(MCVector::new(0.0, 1.0, 0.0)), EPS));
    }

    #[test]
    fn zero_quaternion_behaves_as_identity() {
        let pose = MCPose::from_arrays([1.0, 2.0, 3.0], [0.0, 0.0, 0.0, 0.0]);
        assert!(pose.normalized().approx_eq(&MCPose::from_translation(MCVector::new(1.0, 2.0, 3.0)), EPS));
    }

    #[test]
    fn arrays_round_trip() {
        let pose = MCPose::from_arrays([0.1, 0.2, 0.3], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(pose.position_array(), [0.1, 0.2, 0.3]);
        assert_eq!(pose.orientation_array(), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn approx_eq_ignores_quaternion_sign() {
        let pose = sample_pose();
        let q = pose.orientation;
        let flipped = MCPose::new(pose.position, MCRotation::quaternion(-q.i, -q.j, -q.k, -q.r));
        assert!(pose.approx_eq(&flipped, EPS));
    }
}
