use crate::ik::{self, IkError, JointAngles, LimbLengths, Position, Solution, WristApproach};

/// Limb lengths validated once, plus how the wrist approaches the target.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Arm {
    limbs: LimbLengths,
    approach: WristApproach,
}

impl Arm {
    #[inline]
    pub fn new(limbs: LimbLengths) -> Result<Self, IkError> {
        let () = limbs.validate().map_err(IkError::InvalidParameter)?;
        Ok(Self {
            limbs,
            approach: WristApproach::default(),
        })
    }

    #[inline]
    pub fn with_approach(self, approach: WristApproach) -> Self {
        Self { approach, ..self }
    }

    #[inline]
    pub fn limbs(&self) -> &LimbLengths {
        &self.limbs
    }

    #[inline]
    pub fn approach(&self) -> WristApproach {
        self.approach
    }

    /// Farthest the wrist gets from the base: both links in line.
    #[inline]
    pub fn max_wrist_reach(&self) -> f64 {
        self.limbs.shoulder_to_elbow + self.limbs.elbow_to_wrist
    }

    /// Closest the wrist gets to the base: elbow folded shut.
    #[inline]
    pub fn min_wrist_reach(&self) -> f64 {
        libm::fabs(self.limbs.shoulder_to_elbow - self.limbs.elbow_to_wrist)
    }

    #[inline]
    pub fn max_reach(&self) -> f64 {
        self.max_wrist_reach() + self.limbs.wrist_to_effector
    }

    #[inline]
    pub fn reach_to(&self, target: Position) -> Result<JointAngles, IkError> {
        ik::solve_with(target, &self.limbs, self.approach).map(|solution| solution.angles)
    }

    #[inline]
    pub fn reach_to_with_diagnostics(&self, target: Position) -> Result<Solution, IkError> {
        let solution = ik::solve_with(target, &self.limbs, self.approach)?;
        if let Err(e) = solution.check_in_range() {
            let () = log::warn!(
                "target ({}, {}) is outside the workspace ({e}); angles are approximate",
                target.x,
                target.y,
            );
        }
        Ok(solution)
    }
}
