//! Stylesheet syntax errors.

use nido_relief::Position;
use thiserror::Error;

/// Errors that stop the parser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `{` without a matching `}`
    #[error("{}:{}: Unclosed block", .position.line, .position.column)]
    UnclosedBlock { position: Position },

    /// A `/*` without a matching `*/`
    #[error("{}:{}: Unclosed comment", .position.line, .position.column)]
    UnclosedComment { position: Position },

    /// A quote without its closing quote
    #[error("{}:{}: Unclosed string", .position.line, .position.column)]
    UnclosedString { position: Position },

    /// A `}` at the top level
    #[error("{}:{}: Unexpected }}", .position.line, .position.column)]
    UnexpectedClose { position: Position },

    /// A statement that is neither a rule nor a declaration
    #[error("{}:{}: Unknown word {word}", .position.line, .position.column)]
    UnknownWord { word: String, position: Position },
}

impl ParseError {
    /// Where the error was detected
    pub fn position(&self) -> Position {
        match self {
            Self::UnclosedBlock { position }
            | Self::UnclosedComment { position }
            | Self::UnclosedString { position }
            | Self::UnexpectedClose { position }
            | Self::UnknownWord { position, .. } => *position,
        }
    }
}
