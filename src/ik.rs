use {
    crate::{angle, ratio::ClampedRatio, ratio::OutOfRange},
    core::{f64::consts::PI, fmt},
};

/// A point in the arm's base frame: the end-effector target, or the wrist
/// derived from it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position {
    /// Along the arm's zero-angle direction.
    pub x: f64,
    /// Perpendicular to `x`, counterclockwise.
    pub y: f64,
}

/// Rigid segment lengths, proximal to distal.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LimbLengths {
    pub shoulder_to_elbow: f64,
    pub elbow_to_wrist: f64,
    /// May be zero, which reduces the arm to two links.
    pub wrist_to_effector: f64,
}

/// Joint rotations in radians, each relative to its parent link.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JointAngles {
    pub shoulder: f64,
    pub elbow: f64,
    pub wrist: f64,
}

/// How the wrist is backed off from the target along the approach angle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WristApproach {
    /// Back off along the true bearing from the base to the target.
    #[default]
    Exact,
    /// Clamp the bearing onto [-1, 1] radians before backing off, as the
    /// legacy derivation did. For bearings past one radian the last link no
    /// longer points at the target, so the effector lands off target.
    ClampedToUnitRadian,
}

/// Everything the solver derived on the way to the joint angles.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Solution {
    pub angles: JointAngles,
    pub wrist: Position,
    pub approach_radians: f64,
    /// Interior angle at the elbow: pi when straight, 0 when folded.
    pub elbow_interior_radians: f64,
    pub elbow_cosine: ClampedRatio,
    pub shoulder_cosine: ClampedRatio,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IkError {
    InvalidParameter(InvalidParameter),
    Degenerate(Degenerate),
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidParameter {
    NonPositiveLength { limb: Limb, length: f64 },
    NegativeLength { limb: Limb, length: f64 },
    NonFiniteLength { limb: Limb, length: f64 },
    NonFiniteTarget { x: f64, y: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Degenerate {
    /// Backing off the last link put the wrist on the base, so there is no
    /// direction to reach along.
    WristAtBase { x: f64, y: f64 },
    /// Intermediate products over- or underflowed into 0/0 or inf/inf.
    RatioNotANumber(Ratio),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Limb {
    ShoulderToElbow,
    ElbowToWrist,
    WristToEffector,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ratio {
    ElbowCosine,
    ShoulderCosine,
}

impl Position {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance from the base, without squaring on the way.
    #[inline]
    pub fn magnitude(&self) -> f64 {
        libm::hypot(self.x, self.y)
    }
}

impl LimbLengths {
    #[inline]
    pub const fn new(shoulder_to_elbow: f64, elbow_to_wrist: f64, wrist_to_effector: f64) -> Self {
        Self {
            shoulder_to_elbow,
            elbow_to_wrist,
            wrist_to_effector,
        }
    }

    #[inline]
    pub fn validate(&self) -> Result<(), InvalidParameter> {
        let () = check_divisor_length(Limb::ShoulderToElbow, self.shoulder_to_elbow)?;
        let () = check_divisor_length(Limb::ElbowToWrist, self.elbow_to_wrist)?;
        let () = check_finite_length(Limb::WristToEffector, self.wrist_to_effector)?;
        if self.wrist_to_effector < 0.0 {
            return Err(InvalidParameter::NegativeLength {
                limb: Limb::WristToEffector,
                length: self.wrist_to_effector,
            });
        }
        Ok(())
    }
}

#[inline]
fn check_finite_length(limb: Limb, length: f64) -> Result<(), InvalidParameter> {
    // The solver squares every length, so the square has to be finite too.
    if length.is_finite() && (length * length).is_finite() {
        Ok(())
    } else {
        Err(InvalidParameter::NonFiniteLength { limb, length })
    }
}

#[inline]
fn check_divisor_length(limb: Limb, length: f64) -> Result<(), InvalidParameter> {
    let () = check_finite_length(limb, length)?;
    if length > 0.0 {
        Ok(())
    } else {
        Err(InvalidParameter::NonPositiveLength { limb, length })
    }
}

impl JointAngles {
    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        [self.shoulder, self.elbow, self.wrist]
    }

    #[inline]
    pub fn to_degrees(self) -> Self {
        Self {
            shoulder: angle::to_degrees(self.shoulder),
            elbow: angle::to_degrees(self.elbow),
            wrist: angle::to_degrees(self.wrist),
        }
    }

    /// Same pose, each joint on [-pi, pi).
    #[inline]
    pub fn wrapped(self) -> Self {
        Self {
            shoulder: angle::wrap_plus_minus_pi(self.shoulder),
            elbow: angle::wrap_plus_minus_pi(self.elbow),
            wrist: angle::wrap_plus_minus_pi(self.wrist),
        }
    }
}

impl From<JointAngles> for [f64; 3] {
    #[inline]
    fn from(angles: JointAngles) -> Self {
        angles.to_array()
    }
}

impl WristApproach {
    #[inline]
    fn heading(self, approach_radians: f64) -> f64 {
        match self {
            Self::Exact => approach_radians,
            Self::ClampedToUnitRadian => approach_radians.clamp(-1.0, 1.0),
        }
    }
}

impl Solution {
    /// Whether every law-of-cosines ratio was already a valid cosine, i.e.
    /// the angles actually put the effector on the target.
    #[inline]
    pub fn is_reachable(&self) -> bool {
        !self.elbow_cosine.was_clamped() && !self.shoulder_cosine.was_clamped()
    }

    #[inline]
    pub fn check_in_range(&self) -> Result<(), OutOfRange> {
        let () = self.elbow_cosine.check()?;
        self.shoulder_cosine.check()
    }
}

impl fmt::Display for IkError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter(e) => write!(f, "invalid parameter: {e}"),
            Self::Degenerate(e) => write!(f, "degenerate geometry: {e}"),
        }
    }
}

impl fmt::Display for InvalidParameter {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveLength { limb, length } => {
                write!(f, "{limb} length must be positive, got {length}")
            }
            Self::NegativeLength { limb, length } => {
                write!(f, "{limb} length must not be negative, got {length}")
            }
            Self::NonFiniteLength { limb, length } => {
                write!(f, "{limb} length must be finite when squared, got {length}")
            }
            Self::NonFiniteTarget { x, y } => write!(f, "target ({x}, {y}) is not finite"),
        }
    }
}

impl fmt::Display for Degenerate {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WristAtBase { x, y } => write!(f, "wrist at ({x}, {y}) coincides with the base"),
            Self::RatioNotANumber(ratio) => write!(f, "{ratio} evaluated to NaN"),
        }
    }
}

impl fmt::Display for Limb {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ShoulderToElbow => "shoulder-to-elbow",
            Self::ElbowToWrist => "elbow-to-wrist",
            Self::WristToEffector => "wrist-to-effector",
        })
    }
}

impl fmt::Display for Ratio {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ElbowCosine => "elbow cosine",
            Self::ShoulderCosine => "shoulder cosine",
        })
    }
}

impl core::error::Error for IkError {}
impl core::error::Error for InvalidParameter {}
impl core::error::Error for Degenerate {}

impl From<InvalidParameter> for IkError {
    #[inline]
    fn from(e: InvalidParameter) -> Self {
        Self::InvalidParameter(e)
    }
}

impl From<Degenerate> for IkError {
    #[inline]
    fn from(e: Degenerate) -> Self {
        Self::Degenerate(e)
    }
}

#[inline]
fn clamped(which: Ratio, raw: f64) -> Result<ClampedRatio, Degenerate> {
    let Some(ratio) = ClampedRatio::new(raw) else {
        return Err(Degenerate::RatioNotANumber(which));
    };
    if ratio.was_clamped() {
        let () = log::debug!("{which} {raw} clamped to {}", ratio.value());
    }
    Ok(ratio)
}

/// Joint angles placing the effector of an arm with limbs `l1`, `l2`, `l3`
/// at `(x, y)`, backing the wrist off along the exact approach angle.
///
/// Targets outside the workspace still get angles (the closest the clamped
/// geometry allows); use [`solve_with`] to find out whether that happened.
#[inline]
pub fn solve(x: f64, y: f64, l1: f64, l2: f64, l3: f64) -> Result<JointAngles, IkError> {
    solve_with(
        Position { x, y },
        &LimbLengths::new(l1, l2, l3),
        WristApproach::Exact,
    )
    .map(|solution| solution.angles)
}

pub fn solve_with(
    target: Position,
    limbs: &LimbLengths,
    approach: WristApproach,
) -> Result<Solution, IkError> {
    let () = limbs.validate().map_err(IkError::InvalidParameter)?;
    let Position { x, y } = target;
    if !(x.is_finite() && y.is_finite()) {
        return Err(IkError::InvalidParameter(
            InvalidParameter::NonFiniteTarget { x, y },
        ));
    }
    let LimbLengths {
        shoulder_to_elbow: l1,
        elbow_to_wrist: l2,
        wrist_to_effector: l3,
    } = *limbs;

    // Bearing from the base straight to the target, on [-pi, pi]:
    let approach_radians = libm::atan2(y, x);

    let wrist = {
        let heading = approach.heading(approach_radians);
        Position {
            x: x - l3 * libm::cos(heading),
            y: y - l3 * libm::sin(heading),
        }
    };
    let () = log::trace!(
        "target ({x}, {y}), approach {approach_radians} rad, wrist ({}, {})",
        wrist.x,
        wrist.y,
    );

    if wrist.x == 0.0 && wrist.y == 0.0 {
        return Err(IkError::Degenerate(Degenerate::WristAtBase {
            x: wrist.x,
            y: wrist.y,
        }));
    }
    // Nonzero from here on, though it may be subnormal or infinite.
    let reach = wrist.magnitude();

    // Law of cosines across the elbow:
    // reach^2 = L_1^2 + L_2^2 - 2 L_1 L_2 cos(elbow_interior)
    // Dividing through by L_1 L_2 keeps tiny and huge reaches from squaring
    // into 0 or inf.
    let elbow_cosine = clamped(
        Ratio::ElbowCosine,
        0.5 * ((l1 / l2) + (l2 / l1) - (reach / l1) * (reach / l2)),
    )?;
    let elbow_interior_radians = elbow_cosine.acos();

    // Law of cosines across the shoulder, between the reach line and L_1:
    // L_2^2 = reach^2 + L_1^2 - 2 reach L_1 cos(shoulder_offset)
    // Dividing through by reach likewise avoids squaring it.
    let shoulder_cosine = clamped(
        Ratio::ShoulderCosine,
        (reach + (l1 - l2) * (l1 + l2) / reach) / (2.0 * l1),
    )?;
    let shoulder_offset_radians = shoulder_cosine.acos();

    let wrist_bearing_radians = libm::atan2(wrist.y, wrist.x);

    let shoulder = wrist_bearing_radians - shoulder_offset_radians;
    let elbow = PI - elbow_interior_radians;
    let angles = JointAngles {
        shoulder,
        elbow,
        wrist: approach_radians - shoulder - elbow,
    };

    Ok(Solution {
        angles,
        wrist,
        approach_radians,
        elbow_interior_radians,
        elbow_cosine,
        shoulder_cosine,
    })
}
