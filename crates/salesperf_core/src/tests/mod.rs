//! Integration tests for the sales performance engine
//!
//! Tests are organized by topic:
//! - `scenarios` - Reference scenarios with hand-checked numbers
//! - `materiality` - Focus-list selection bounds and ordering
//! - `report` - End-to-end findings: availability, PVM, concentration, retention, outliers
//! - `full_year` - Full-year review framing and growth recommendations

mod materiality;
