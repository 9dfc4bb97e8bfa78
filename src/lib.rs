#![no_std]

//! A decoder for the serial telemetry stream of MISOL weather stations.
//!
//! The station sends a fixed-length frame every few seconds carrying wind,
//! rain, light, UV, temperature, humidity, and battery state, optionally
//! followed by a barometric pressure extension. Misol synchronizes on that
//! stream, verifies each frame, converts its fields to physical units, and
//! derives night, precipitation intensity, and direction labels.
//!
//! Most users should begin with [`avec::WeatherStation`], which polls a
//! [`avec::ByteSource`] and forwards values to a [`avec::MeasurementSink`].
//! The stages it is built from are exposed in the [`sans`] module.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `derive`: enable the `MeasurementSink` derive macro (default).
//! - `std`: enable the reader-based byte source (default).
//! - `serde`: enable deserialization of [`config::Config`].

pub mod avec;
pub mod config;
pub mod sans;
