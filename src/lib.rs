#![no_std]

pub mod angle;
pub mod arm;
pub mod ik;
pub mod ratio;

pub use {
    arm::Arm,
    ik::{
        Degenerate, IkError, InvalidParameter, JointAngles, Limb, LimbLengths, Position, Ratio,
        Solution, WristApproach, solve, solve_with,
    },
    ratio::{ClampedRatio, OutOfRange},
};
