//! selfassess-report: text reports and charts built from session history.
//!
//! Tables are reStructuredText grid tables printed to stdout; charts are
//! self-contained SVG documents.

pub mod chart;
pub mod table;
pub mod text;
