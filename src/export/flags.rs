//! Rule-based cell flagging for anomalous stage distributions
//!
//! Rules match on the stage display name (case-sensitive) and the cell's
//! percentage as a fraction in [0, 1]. Each cell is evaluated exactly once;
//! multiple matching rules still collapse to a single boolean.

/// Evaluate the flag rule set for one cell
///
/// - JUNK stages above 20%
/// - Not Connected (NC) stages above 20%
/// - Admission (A) stages below 5%
/// - Hot Prospect (HP) / Future Prospect (FP) stages below 5%
pub fn is_flagged(stage_name: &str, fraction: f64) -> bool {
    let mut flagged = false;

    if stage_name.contains("JUNK") && fraction > 0.2 {
        flagged = true;
    }

    if (stage_name.contains("Not Connected") || stage_name.contains("NC")) && fraction > 0.2 {
        flagged = true;
    }

    if (stage_name.contains("Admission") || stage_name == "A") && fraction < 0.05 {
        flagged = true;
    }

    if (stage_name.contains("Hot Prospect")
        || stage_name == "HP"
        || stage_name.contains("Future Prospect")
        || stage_name == "FP")
        && fraction < 0.05
    {
        flagged = true;
    }

    flagged
}

pub const LEGEND_TITLE: &str = "Highlighted Conditions (Red):";

pub const LEGEND_LINES: [&str; 4] = [
    "• JUNK > 20%",
    "• Not Connected (NC) > 20%",
    "• Admission (A) < 5%",
    "• Hot Prospect (HP) and Future Prospect (FP) < 5%",
];
