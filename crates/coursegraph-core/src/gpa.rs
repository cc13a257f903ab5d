//! GPA arithmetic over grade distributions.
//!
//! A grade distribution is five percentages (A through F). An instructor's
//! GPA is the grade-point mean implied by those percentages, and a course's
//! GPA is the student-weighted mean of its instructors' GPAs.

const GRADE_POINTS: [f64; 5] = [4.0, 3.0, 2.0, 1.0, 0.0];

/// GPA implied by the A/B/C/D/F percentages, unrounded.
///
/// Percentages are expected in `[0, 100]`; they are not renormalised when they
/// do not add up to 100.
pub fn distribution_gpa(percentages: [f64; 5]) -> f64 {
    percentages
        .iter()
        .zip(GRADE_POINTS.iter())
        .map(|(pct, points)| pct * points)
        .sum::<f64>()
        / 100.0
}

/// Student-weighted mean of `(gpa, students)` pairs, rounded to two decimals.
///
/// Pairs with zero students carry no weight. Returns `None` when no pair has
/// students.
pub fn weighted_gpa<I>(samples: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, u32)>,
{
    let (weighted_sum, students) = samples
        .into_iter()
        .filter(|(_, students)| *students > 0)
        .fold((0.0_f64, 0_u64), |(sum, total), (gpa, students)| {
            (sum + gpa * f64::from(students), total + u64::from(students))
        });

    if students == 0 {
        return None;
    }
    Some(round2(weighted_sum / students as f64))
}

/// Round half away from zero at two decimals.
///
/// Values such as `3.745` are not exactly representable and land a hair below
/// the midpoint, so the scaled value is nudged by a tolerance far below the
/// precision of any stored percentage before rounding.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    let nudged = scaled + scaled.signum() * 1e-9;
    nudged.round() / 100.0
}
