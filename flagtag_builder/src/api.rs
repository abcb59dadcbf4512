mod core;
mod defaults;
mod error;
mod kind;
mod reflect;
mod tags;
mod value;

pub use self::core::*;
pub use defaults::*;
pub use error::*;
pub use reflect::*;
pub use tags::*;
pub use value::*;

#[cfg(test)]
pub(crate) use value::test;
