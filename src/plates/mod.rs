mod patterns;
pub use patterns::*;

mod extractor;
pub use extractor::*;

mod dedupe;
pub use dedupe::*;
