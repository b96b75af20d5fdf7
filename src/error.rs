use thiserror::Error;

macro_rules! invalid_pattern {
    // Single string version
    ($msg:expr) => {
        crate::Error::InvalidPattern {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidPattern {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers all failure modes of signature compilation, pattern construction,
/// pattern matching, and stream editing. Each variant provides specific context about
/// the failure mode to enable appropriate error handling by the host patching driver.
///
/// # Error Categories
///
/// ## Pattern Definition Errors
/// - [`Error::UnsupportedExpression`] - Expression node the signature compiler cannot lower
/// - [`Error::InvalidPattern`] - Empty or malformed pattern supplied
///
/// ## Pattern Application Errors
/// - [`Error::PatternNotFound`] - Expected instruction subsequence missing from the target
///
/// ## Member Resolution Errors
/// - [`Error::NoMatchingConstructor`] - Overload resolution found no assignable constructor
///
/// # Examples
///
/// ```rust
/// use cilsplice::{Error, Pattern};
///
/// match Pattern::new(vec![]) {
///     Ok(_) => unreachable!(),
///     Err(Error::InvalidPattern { message, file, line }) => {
///         eprintln!("Invalid pattern: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The signature compiler encountered an expression node it cannot lower.
    ///
    /// Signature expressions must be side-effect-free computations (constants,
    /// member access, calls, comparisons, type tests). Assignments, blocks and
    /// other side-effecting shapes are rejected at definition time.
    ///
    /// The associated value names the offending node kind.
    #[error("The signature compiler cannot lower this expression kind - {kind}")]
    UnsupportedExpression {
        /// The expression node kind that could not be lowered
        kind: &'static str,
    },

    /// The expected instruction subsequence could not be located.
    ///
    /// This is always fatal to the current patch application: a missing pattern
    /// means the target method changed shape and the rewrite no longer applies.
    /// It is never silently skipped and never retried with a relaxed pattern.
    ///
    /// # Fields
    ///
    /// * `pattern` - Rendering of the pattern that failed to match
    /// * `method` - Description of the method being patched
    #[error("Pattern not found in {method}: {pattern}")]
    PatternNotFound {
        /// Rendering of the pattern that failed to match
        pattern: String,
        /// Description of the method being patched
        method: String,
    },

    /// An empty or malformed pattern was supplied.
    ///
    /// Rejected at construction time, before any matching attempt. The error
    /// includes the source location where the malformation was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file in which the error was raised
    /// * `line` - Source line in which the error was raised
    #[error("Invalid pattern - {file}:{line}: {message}")]
    InvalidPattern {
        /// The message to be printed for the InvalidPattern error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Constructor overload resolution failed.
    ///
    /// No constructor of the target type has parameters assignable from (or to)
    /// the requested argument types. The message lists the candidates that were
    /// considered, to diagnose version mismatches against the host assembly.
    #[error("{0}")]
    NoMatchingConstructor(String),
}
