//! Lint rules for nido_patina.
//!
//! Rules are organized by category:
//! - `css`: Stylesheet rules (stylelint compatible names)

pub mod css;
