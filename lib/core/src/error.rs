//! Error handling foundation for the sluice crates.
//!
//! Only the `Result` alias lives here. Each crate defines its own error
//! enums and wraps them in a rootcause `Report` at its fallible boundaries.

use rootcause::Report;

/// A Result type alias using rootcause's Report for error handling.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Unreachable;

    impl std::fmt::Display for Unreachable {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "backend unreachable")
        }
    }

    impl std::error::Error for Unreachable {}

    fn fail() -> Result<u16, Unreachable> {
        Err(Unreachable)?
    }

    #[test]
    fn result_type_works() {
        let ok: Result<i32, Unreachable> = Ok(42);
        assert_eq!(ok.expect("should be ok"), 42);
    }

    #[test]
    fn question_mark_wraps_context_in_report() {
        let err = fail().expect_err("should fail");
        assert!(err.to_string().contains("backend unreachable"));
    }
}
