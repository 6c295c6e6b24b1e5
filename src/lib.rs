//! Evaluation form for a school science fair.
//!
//! Judges pick themselves and a project from filterable lists, enter five
//! bounded scores and submit them to a spreadsheet script once a shared
//! password has been confirmed by the validation service.

pub use matchers::*;
pub use remote::*;

pub mod choice;
pub mod config;
pub mod form;
pub mod roster;
pub mod score;
pub mod server;
pub mod text;

mod matchers;
mod remote;

pub trait Matcher: Send + Sync {
    /// Applies the query against the candidates and returns the indices of
    /// the matching ones. The indices must be ascending: candidates keep the
    /// order the host gave them in.
    fn matches(&self, query: &str, candidates: &[String]) -> Vec<usize>;
}
