//! Volume and life-support model for space habitat designs.
//!
//! A design is one pressurized envelope holding an ordered list of placed
//! modules. This crate computes how much of the envelope the modules use,
//! whether their combined resource production covers the crew's needs, and
//! which design rules are broken. Functions take plain data and return
//! results; the only I/O is snapshot save/load over generic readers and
//! writers.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`balance`] | Daily resource supply vs. demand, shortfalls, mission totals |
//! | [`catalog`] | Module kinds with baseline volume and resource rates |
//! | [`config`] | Design rules and per-crew consumption rates |
//! | [`design`] | Design aggregate, module editing, volume statistics |
//! | [`envelope`] | Habitat shell shapes and enclosed volume |
//! | [`error`] | Configuration errors for unknown kinds and shapes |
//! | [`geometry`] | Module solids and their volumes |
//! | [`library`] | One stored design per destination |
//! | [`mission`] | Crew size, duration, location |
//! | [`snapshot`] | Versioned JSON save/load with legacy import |
//! | [`validation`] | Advisory design rule checks |

pub mod balance;
pub mod catalog;
pub mod config;
pub mod design;
pub mod envelope;
pub mod error;
pub mod geometry;
pub mod library;
pub mod mission;
pub mod snapshot;
pub mod validation;
