/// Input rejected by one of the summary computations.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InvalidInputError {
    #[display("sample must contain at least one value")]
    EmptySample,
    #[display("whisker multiplier must be finite and non-negative, got {value}")]
    InvalidWhiskerMultiplier { value: f64 },
    #[display("length mismatch: expected {expected} {what}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl InvalidInputError {
    pub(crate) fn check_len(
        what: &'static str,
        expected: usize,
        actual: usize,
    ) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::LengthMismatch {
                what,
                expected,
                actual,
            })
        }
    }
}
