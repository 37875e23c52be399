//! locexpand - localization macro expander for genstrings
//!
//! Native string extraction only recognises the platform's own
//! localization calls. Projects that wrap those calls in their own macros
//! need the macros expanded first. locexpand copies the sources to a
//! scratch directory, blanks every include, expands only the project's
//! localization header with the C preprocessor, and runs the extractor over
//! the result.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (arguments, prompt, reporting)
//! - `config`: Configuration file loading and parsing
//! - `error`: Error taxonomy and exit status mapping
//! - `metadata`: Region lookup in the project's Info.plist
//! - `pipeline`: Collect, stage, strip, expand, extract

pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod pipeline;
