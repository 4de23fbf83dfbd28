mod catalog;
mod delete;
mod paths;
mod scan;

pub use catalog::*;
pub use delete::*;
pub use paths::*;
pub use scan::*;
