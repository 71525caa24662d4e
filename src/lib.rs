// zbatch: compress many files into independent zstd frames with one
// reusable set of buffers and one encoder.

pub mod config;
pub mod timefn;
pub mod engine;
pub mod io;
pub mod util;
pub mod cli;
