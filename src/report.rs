//! Plain-text rendering of sweep outcomes.

use core::fmt;

use crate::driver::TestCase;
use crate::sweep::{BinOutcome, CaseOutcome, SizeOutcome, SweepOutcome};

/// Diagnostics of one case, one block per bin that failed or was retried.
pub struct CaseReport<'a>(pub &'a CaseOutcome);

impl fmt::Display for CaseReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let case = self.0.case;
        for bin in &self.0.bins {
            if let Some(transient) = &bin.transient {
                write_header(f, &case, bin)?;
                writeln!(f, "  first attempt failed, retry passed:")?;
                write_indented(f, transient, "    ")?;
            }
            if !bin.failures.is_empty() {
                write_header(f, &case, bin)?;
                for failure in &bin.failures {
                    write_indented(f, failure, "  ")?;
                }
            }
        }
        Ok(())
    }
}

fn write_header(
    f: &mut fmt::Formatter<'_>,
    case: &TestCase,
    bin: &BinOutcome,
) -> fmt::Result {
    writeln!(
        f,
        "{case} bin {} amp {:.6} phase {:.1} deg:",
        bin.carrier.bin,
        bin.carrier.amplitude,
        bin.carrier.phase_degrees()
    )
}

fn write_indented(f: &mut fmt::Formatter<'_>, item: &dyn fmt::Display, indent: &str) -> fmt::Result {
    for line in item.to_string().lines() {
        writeln!(f, "{indent}{line}")?;
    }
    Ok(())
}

/// Every case of a size followed by its verdict line.
pub struct SizeReport<'a>(pub &'a SizeOutcome);

impl fmt::Display for SizeReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for case in &self.0.cases {
            write!(f, "{}", CaseReport(case))?;
        }
        if self.0.passed() {
            writeln!(f, "tests for size {} succeeded successfully.", self.0.size)
        } else {
            let failed = self.0.cases.iter().filter(|c| !c.passed()).count();
            writeln!(
                f,
                "tests for size {} failed in {failed} of {} configurations.",
                self.0.size,
                self.0.cases.len()
            )
        }
    }
}

/// Closing line of a sweep.
pub struct Summary<'a>(pub &'a SweepOutcome);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.passed() {
            writeln!(f, "all tests succeeded successfully.")
        } else {
            writeln!(
                f,
                "{} checks failed for {}.",
                self.0.failure_count(),
                self.0.backend
            )
        }
    }
}
