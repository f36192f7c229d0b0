//! gatescore-report: Report rendering and the rank store.
//!
//! Turns a `ScoreCard` into a self-contained HTML page or a CSV table, and
//! keeps the JSON-file leaderboard used for ranks and score insights.

pub mod csv;
pub mod html;
pub mod leaderboard;
