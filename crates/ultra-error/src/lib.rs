use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::ops::Deref;

#[cfg(feature = "backtrace")]
use std::backtrace::Backtrace;

pub type Result<T> = std::result::Result<T, UltraError>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidParameter,
    InvariantViolation,
    Io,
    Evaluation,
    Multiple,
    Context,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrString(Cow<'static, str>);

impl AsRef<str> for ErrString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ErrString {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for ErrString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T: Into<Cow<'static, str>>> From<T> for ErrString {
    fn from(v: T) -> Self {
        Self(v.into())
    }
}

/// The four error kinds the core exposes: invalid configuration is rejected
/// before a run starts, an invariant violation aborts the run it occurred
/// in, I/O failures are reported from save/load, and evaluator failures
/// propagate from the user-supplied fitness function.
#[derive(Debug)]
pub enum UltraError {
    InvalidParameter {
        message: ErrString,
    },
    InvariantViolation {
        message: ErrString,
    },
    Io {
        message: ErrString,
    },
    Evaluation {
        message: ErrString,
    },

    Multiple(MultiDisplay),

    Context {
        context: ErrorContext,
        source: Box<UltraError>,
        #[cfg(feature = "backtrace")]
        backtrace: Backtrace,
    },
}

impl UltraError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidParameter { .. } => ErrorCode::InvalidParameter,
            Self::InvariantViolation { .. } => ErrorCode::InvariantViolation,
            Self::Io { .. } => ErrorCode::Io,
            Self::Evaluation { .. } => ErrorCode::Evaluation,
            Self::Multiple(_) => ErrorCode::Multiple,
            Self::Context { .. } => ErrorCode::Context,
        }
    }

    pub fn with_context(self, msg: impl Into<String>) -> Self {
        UltraError::Context {
            context: ErrorContext::new(msg),
            source: Box::new(self),
            #[cfg(feature = "backtrace")]
            backtrace: Backtrace::capture(),
        }
    }
}

impl Display for UltraError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { message } => write!(f, "invalid parameter: {}", message),
            Self::InvariantViolation { message } => write!(f, "invariant violation: {}", message),
            Self::Io { message } => write!(f, "I/O error: {}", message),
            Self::Evaluation { message } => write!(f, "evaluator error: {}", message),
            Self::Multiple(m) => write!(f, "multiple errors:\n{}", m),
            Self::Context {
                context, source, ..
            } => write!(f, "{}\ncaused by: {}", context, source),
        }
    }
}

impl std::error::Error for UltraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Context { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for UltraError {
    fn from(source: std::io::Error) -> Self {
        UltraError::Io {
            message: source.to_string().into(),
        }
    }
}

#[derive(Debug)]
pub struct ErrorContext {
    message: String,
}
impl ErrorContext {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}
impl Display for ErrorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
impl std::error::Error for ErrorContext {}

#[derive(Debug)]
pub struct MultiDisplay(Vec<UltraError>);
impl Display for MultiDisplay {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[{}] {} (code: {:?})", i, e, e.code())?;
        }
        Ok(())
    }
}
impl From<Vec<UltraError>> for MultiDisplay {
    fn from(v: Vec<UltraError>) -> Self {
        Self(v)
    }
}

pub trait ResultExt<T> {
    fn context(self, msg: impl Into<String>) -> Result<T>;
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<UltraError>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(msg))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| e.into().with_context(f()))
    }
}

pub trait IntoUltraError<T> {
    fn into_ultra_error(self) -> Result<T>;
}
impl<T, E: Into<UltraError>> IntoUltraError<T> for std::result::Result<T, E> {
    fn into_ultra_error(self) -> Result<T> {
        self.map_err(Into::into)
    }
}

#[doc(hidden)]
pub mod __private {
    #[inline]
    #[cold]
    #[must_use]
    pub fn must_use<E>(e: E) -> E {
        e
    }
}

#[macro_export]
macro_rules! err {
    (InvalidParameter: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__private::must_use($crate::UltraError::InvalidParameter { message: format!($fmt, $($arg),*).into() })
    };
    (InvariantViolation: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__private::must_use($crate::UltraError::InvariantViolation { message: format!($fmt, $($arg),*).into() })
    };
    (Io: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__private::must_use($crate::UltraError::Io { message: format!($fmt, $($arg),*).into() })
    };
    (Evaluation: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__private::must_use($crate::UltraError::Evaluation { message: format!($fmt, $($arg),*).into() })
    };
}

#[macro_export]
macro_rules! bail {
    ($($tt:tt)+) => { return Err($crate::err!($($tt)+)) };
}

#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($tt:tt)+) => {
        if !$cond { $crate::bail!($($tt)+); }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_display() {
        let e = err!(InvalidParameter: "tournament_size {} exceeds population {}", 10, 5);
        assert_eq!(e.code(), ErrorCode::InvalidParameter);
        assert!(e.to_string().contains("tournament_size"));
    }

    #[test]
    fn context_chains_source() {
        let e = err!(Io: "disk full").with_context("saving cache snapshot");
        assert_eq!(e.code(), ErrorCode::Context);
        assert!(e.to_string().contains("saving cache snapshot"));
        assert!(e.to_string().contains("disk full"));
    }

    #[test]
    fn ensure_macro_bails() {
        fn check(n: usize) -> Result<()> {
            ensure!(n >= 2, InvalidParameter: "min_individuals must be >= 2, got {}", n);
            Ok(())
        }

        assert!(check(1).is_err());
        assert!(check(2).is_ok());
    }
}
