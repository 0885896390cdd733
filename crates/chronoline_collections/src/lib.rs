// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ordered containers for Chronoline.
//!
//! This crate provides the containers the timeline and playback layers keep
//! their ordered data in:
//! - `SortedList`, a comparison-ordered linked list with a lazily rebuilt
//!   positional index
//!
//! ## Architecture
//!
//! Nodes are stored in a slot arena and linked by key. Positional access goes
//! through a side index of node keys that is only trusted up to its current
//! length and extended on demand.

pub mod sorted_list;

pub use sorted_list::{Comparator, Iter, SortedList, SortedListError};
