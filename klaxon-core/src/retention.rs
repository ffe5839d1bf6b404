//! Retention conversion traits.

use crate::error::BoxError;

/// Whether a connection stays registered after its listener ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Retention {
    /// Stay connected for later dispatches.
    #[default]
    Keep,
    /// Remove this connection right after the current invocation.
    Discard,
}

impl Retention {
    /// Returns `true` for [`Retention::Keep`].
    pub fn is_keep(self) -> bool {
        matches!(self, Retention::Keep)
    }
}

/// Trait for converting a listener's output into a [`Retention`].
///
/// # Default Implementations
///
/// - `()` → Keep
/// - `bool` → `true` = Keep, `false` = Discard
/// - `Retention` → As is
/// - `Option<T>` → `None` = Keep, `Some(t)` delegates to `t`
/// - `Result<T, E>` → Delegates to inner `T` or propagates error
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be returned from a listener",
    label = "missing `IntoRetention` implementation",
    note = "Listeners return `()`, `bool`, `Retention`, or a `Result` of one of these."
)]
pub trait IntoRetention {
    /// Convert the output into retention behavior and optional error.
    fn into_retention(self) -> Result<Retention, BoxError>;
}

impl IntoRetention for () {
    fn into_retention(self) -> Result<Retention, BoxError> {
        Ok(Retention::Keep)
    }
}

impl IntoRetention for bool {
    fn into_retention(self) -> Result<Retention, BoxError> {
        Ok(if self {
            Retention::Keep
        } else {
            Retention::Discard
        })
    }
}

impl IntoRetention for Retention {
    fn into_retention(self) -> Result<Retention, BoxError> {
        Ok(self)
    }
}

impl<T: IntoRetention> IntoRetention for Option<T> {
    fn into_retention(self) -> Result<Retention, BoxError> {
        match self {
            Some(t) => t.into_retention(),
            None => Ok(Retention::Keep),
        }
    }
}

impl<T, E> IntoRetention for Result<T, E>
where
    T: IntoRetention,
    E: Into<BoxError>,
{
    fn into_retention(self) -> Result<Retention, BoxError> {
        match self {
            Ok(t) => t.into_retention(),
            Err(e) => Err(e.into()),
        }
    }
}
