mod records;
mod types;

pub use records::*;
pub use types::*;
