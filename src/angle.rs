use core::f64::consts::PI;

const TWO_PI: f64 = 2.0 * PI;

pub const RADIANS_TO_DEGREES: f64 = {
    // Half a turn is pi radians and 180 degrees.
    180.0 / PI
};

#[inline]
pub fn to_degrees(radians: f64) -> f64 {
    radians * RADIANS_TO_DEGREES
}

/// The equivalent angle on [-pi, pi).
#[inline]
pub fn wrap_plus_minus_pi(radians: f64) -> f64 {
    let turns = libm::floor((radians + PI) / TWO_PI);
    let wrapped = radians - turns * TWO_PI;
    // Rounding in the subtraction can land just past either end.
    if wrapped >= PI {
        wrapped - TWO_PI
    } else if wrapped < -PI {
        wrapped + TWO_PI
    } else {
        wrapped
    }
}
