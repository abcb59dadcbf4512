//! Builder module for `flagtag`.
//! See [documentation root](https://docs.rs/flagtag/latest/flagtag/index.html) for full details.
#![deny(missing_docs)]
mod api;
mod model;
mod parser;
#[allow(missing_docs)]
pub mod prelude;

pub use api::*;
pub use model::*;
pub use parser::*;

/// Support for the code generated by `#[derive(Flags)]`.
///
/// A field whose type implements [`prelude::Reflect`] probes as its storage; any other type probes as nothing.
/// The generated code calls `(&Probe::new(&mut field)).probe()`, where method resolution prefers [`__private::ReflectProbe`] over the auto-referenced [`__private::OpaqueProbe`].
#[doc(hidden)]
#[allow(missing_docs)]
pub mod __private {
    use std::cell::Cell;

    use crate::prelude::Reflect;

    pub struct Probe<'a, T>(Cell<Option<&'a mut T>>);

    impl<'a, T> Probe<'a, T> {
        pub fn new(field: &'a mut T) -> Self {
            Self(Cell::new(Some(field)))
        }
    }

    pub trait ReflectProbe<'a> {
        fn probe(&self) -> Option<&'a mut dyn Reflect>;
    }

    impl<'a, T: Reflect + 'a> ReflectProbe<'a> for Probe<'a, T> {
        fn probe(&self) -> Option<&'a mut dyn Reflect> {
            let field: &'a mut dyn Reflect = self.0.take()?;
            Some(field)
        }
    }

    pub trait OpaqueProbe<'a> {
        fn probe(&self) -> Option<&'a mut dyn Reflect>;
    }

    impl<'a, T> OpaqueProbe<'a> for &Probe<'a, T> {
        fn probe(&self) -> Option<&'a mut dyn Reflect> {
            None
        }
    }
}

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
