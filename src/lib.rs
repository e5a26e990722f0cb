//! A personal portfolio page rendered in the terminal: a software-rasterized
//! avatar that idles, follows the pointer and bounces when clicked, beside
//! a few sections of text, a contact form and a persisted dark/light theme.

pub mod animation;
pub mod app;
pub mod avatar;
pub mod background;
pub mod color;
pub mod config;
pub mod contact;
pub mod error;
pub mod graphics;
pub mod halfblock;
pub mod math;
pub mod page;
pub mod palette;
pub mod state;
pub mod store;
pub mod theme;
pub mod vertex;

pub use error::{Error, Result};
