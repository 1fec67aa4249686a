//! Driver errors

use core::fmt;
use ufmt::{derive::uDebug, uDebug, uWrite, Formatter};

/// The value a range check failed on
#[derive(Debug, uDebug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Second,
    Minute,
    Hour,
    Day,
    Weekday,
    Month,
    Year,
    Offset,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Second => "second",
            Field::Minute => "minute",
            Field::Hour => "hour",
            Field::Day => "day",
            Field::Weekday => "weekday",
            Field::Month => "month",
            Field::Year => "year",
            Field::Offset => "offset",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// The bus transaction failed
    Bus(E),
    /// The bus returned fewer bytes than the burst asked for. Nothing was
    /// decoded from it.
    ShortRead { expected: usize, received: usize },
    /// A value was outside its field's domain. Nothing was written.
    OutOfRange(Field),
}

impl<E> From<Field> for Error<E> {
    fn from(field: Field) -> Self {
        Error::OutOfRange(field)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "bus error: {:?}", e),
            Error::ShortRead { expected, received } => {
                write!(f, "short read: expected {} bytes, got {}", expected, received)
            }
            Error::OutOfRange(field) => write!(f, "{} out of range", field.name()),
        }
    }
}

// HAL error types rarely implement `uDebug`, so the bus error itself is elided
impl<E> uDebug for Error<E> {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match self {
            Error::Bus(_) => f.write_str("Bus(..)"),
            Error::ShortRead { expected, received } => {
                f.write_str("ShortRead { expected: ")?;
                uDebug::fmt(expected, f)?;
                f.write_str(", received: ")?;
                uDebug::fmt(received, f)?;
                f.write_str(" }")
            }
            Error::OutOfRange(field) => {
                f.write_str("OutOfRange(")?;
                uDebug::fmt(field, f)?;
                f.write_str(")")
            }
        }
    }
}
