pub use substring::SubstringMatcher;

mod substring;
