//! Unified error type for `vtengine` operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("column {column} out of bounds for a {width}-wide grid")]
    ColumnOutOfBounds { column: usize, width: usize },

    #[error("row {row} out of bounds for a {height}-row grid")]
    RowOutOfBounds { row: usize, height: usize },

    #[error("margin top {top} is not strictly above bottom {bottom}")]
    InvalidMargins { top: usize, bottom: usize },

    #[error("rectangular area ({top},{left})-({bottom},{right}) is empty or inverted")]
    InvalidRectangle { top: usize, left: usize, bottom: usize, right: usize },

    #[error("hyperlink id {0} is not registered")]
    UnknownHyperlink(u32),

    #[error("sixel data malformed: {reason}")]
    MalformedSixel { reason: &'static str },

    #[error("palette register {0} out of range")]
    PaletteRegisterOutOfRange(u16),

    #[error(transparent)]
    Parse(#[from] vtparse::ParseError),
}

pub type EngineResult<T> = Result<T, EngineError>;
