//! # quill-theme: colorschemes for quill
//!
//! Colorschemes are plain `.clad` files of `key = #rrggbb` lines. Each one
//! names ten colors; activating a scheme turns those into eighteen numbered
//! color pairs registered on the drawing surface.
//!
//! ```text
//! colors/*.clad ──► Colorscheme::parse ──► ColorschemeRegistry
//!                                                │ activate(name)
//!                                                ▼
//!                                   install_pairs ──► Surface
//! ```

pub mod colorscheme;
pub mod pair;
pub mod registry;

pub use colorscheme::Colorscheme;
pub use pair::{ColorBackground, ColorForeground, pair_index};
pub use registry::ColorschemeRegistry;
