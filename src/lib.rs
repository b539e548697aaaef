//! `ns-curves` library crate.
//!
//! Two independent numerical procedures over small in-memory datasets:
//!
//! - Nelson–Siegel yield-curve fit by Levenberg–Marquardt (`fit`)
//! - C2 cubic spline interpolation (`spline`)
//!
//! The binary (`nsfit`) is a thin wrapper around this library so that core
//! logic is testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod math;
pub mod models;
pub mod report;
pub mod spline;
