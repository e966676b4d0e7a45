//! Reversible stepping engine for a small AT&T-style x86-64 subset.
//!
//! Load text with [`engine::Session::start_execution`], then walk it with
//! `step_forward` / `step_back`. Every call returns a [`engine::Snapshot`].

pub mod engine;
