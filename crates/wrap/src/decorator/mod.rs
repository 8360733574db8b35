//! Decorators turn a value into another value built around it.
//!
//! A wrapping query set keeps its decorators as a runtime list of [`BoxDecorator`]s, each one a
//! type-erased [`Decorator`] of [`Wrapped`](crate::Wrapped) values.

mod boxed;

pub use boxed::BoxDecorator;

pub trait Decorator<In> {
    type Out;

    fn decorate(&self, raw: In) -> Self::Out;
}
