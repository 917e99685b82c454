//! # nido_armature
//!
//! Armature - The structural stylesheet parser for Nido.
//!
//! ## Name Origin
//!
//! An **armature** is the internal frame a sculptor builds before adding
//! clay. `nido_armature` builds the frame of a stylesheet: it finds where
//! rules, at-rules, declarations and comments begin and end, and leaves
//! selectors, params and values as text on the [`Stylesheet`] tree.
//!
//! ## Usage
//!
//! ```
//! let css = ".a { color: red; }\n.a .b { color: blue; }\n";
//! let sheet = nido_armature::parse(css).unwrap();
//!
//! assert_eq!(sheet.children(sheet.root()).len(), 2);
//! assert_eq!(sheet.to_css(), css);
//! ```

mod errors;
mod parser;

pub use errors::ParseError;
pub use parser::Parser;

use nido_relief::Stylesheet;

/// Parse a stylesheet.
#[inline]
pub fn parse(source: &str) -> Result<Stylesheet, ParseError> {
    Parser::new(source).parse()
}
