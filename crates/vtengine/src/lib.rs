#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::too_many_lines,
    clippy::cast_lossless,
    clippy::cast_precision_loss,
    clippy::must_use_candidate,
    clippy::struct_excessive_bools,
    clippy::return_self_not_must_use,
    clippy::field_reassign_with_default
)]

mod attributes;
pub use attributes::*;

mod cell;
pub use cell::*;

mod cursor;
pub use cursor::*;

mod error;
pub use error::*;

mod grid;
pub use grid::*;

mod hyperlink;
pub use hyperlink::*;

mod image;
pub use image::*;

mod line;
pub use line::*;

mod margin;
pub use margin::*;

mod modes;
pub use modes::*;

mod position;
pub use position::*;

mod tabstops;
pub use tabstops::*;

pub mod capabilities;
pub mod input_generator;

mod screen;
pub use screen::*;

mod terminal;
pub use terminal::*;
