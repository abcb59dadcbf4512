mod error;
mod flagset;

pub use error::*;
pub use flagset::*;
