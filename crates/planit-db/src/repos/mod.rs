//! Collection repositories, implemented as `impl PlanitDb` blocks.

mod catalog;
mod course;
mod meta;
mod requirement;
