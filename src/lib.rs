//! pagebound - render a grouped content catalog as an animated, paginated
//! book.
//!
//! A catalog (ordered groups of entries) is flattened once into a fixed page
//! sequence by [`Book::assemble`], geometry is derived from the viewport by
//! [`LayoutConfig::compute`], and a [`RenderSurfaceController`] drives an
//! animated page-turn surface behind the [`surface::PageSurface`] capability
//! trait. Search selections resolve to page indices through
//! [`search::SearchResolver`].
//!
//! The terminal front end lives in the `pagebound` binary behind the `cli`
//! feature; this library is presentation-agnostic.

pub mod assembler;
pub mod catalog;
pub mod controller;
pub mod error;
pub mod layout;
pub mod search;
pub mod surface;

pub use {
    assembler::{Book, DEFAULT_PAGE_CAPACITY, PageDescriptor, PageKind},
    catalog::{Catalog, Entry, Group},
    controller::{NavigationIndex, RenderSurfaceController, SurfaceState},
    error::{BookError, Result},
    layout::{DeviceClass, Geometry, LayoutConfig},
    search::SearchResolver,
    surface::{PageSurface, SurfaceProvider, SurfaceSpec},
};
