//! Integration tests that drive the `perfsum` binary end to end.

mod cli;
mod config;
