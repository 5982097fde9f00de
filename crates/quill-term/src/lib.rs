// SPDX-License-Identifier: MIT
//
// quill-term: terminal layer for quill.
//
// Raw termios, the alternate screen, ANSI output and a byte-level key
// parser, all behind the `Surface` trait the editor core draws on. The
// in-memory `ScriptedSurface` implements the same trait for tests.
//
// No TUI framework sits underneath: output is plain ANSI escape sequences
// buffered per frame, input is parsed straight from stdin bytes.

pub mod ansi;
pub mod color;
pub mod input;
pub mod scripted;
pub mod surface;
