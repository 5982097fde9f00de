//! # quill-editor: editor core for quill
//!
//! Everything between the terminal and the file on disk:
//!
//! - **[`buffer`]**: rope-backed lines with the originated-empty flag
//! - **[`viewport`]**: first visible line, cursor row and column, scrolling
//! - **[`mode`]**: Normal, Insert, Visual (char or line), Command, Exit
//! - **[`command`]**: `:` line parsing into operations, the command line
//! - **[`options`]**: typed `:set` options
//! - **[`editor`]**: the modal state machine driving all of the above
//! - **[`view`]**: drawing a frame onto a `Surface`
//!
//! [`file`] and [`runtime`] cover loading, saving and the config directory.

pub mod bind_count;
pub mod buffer;
pub mod command;
pub mod editor;
pub mod file;
pub mod history;
pub mod mode;
pub mod options;
pub mod position;
pub mod runtime;
pub mod selection;
pub mod view;
pub mod viewport;
