//! I/O-free decoding pipeline.
//!
//! This module is intended for applications that manage their own buffering
//! or scheduling. See [`crate::avec`] for a decoder covering the common case
//! of polling a serial port.
//!
//! # Architecture
//!
//! Bytes pass through the stages below, each a plain function or a small
//! state holder:
//!
//! 1. [`sync::Synchronizer`] buffers bytes, drops those ahead of a start
//! marker, and releases frames whose checksum holds (see [`check`]).
//!
//! 2. [`fields::extract`] reads raw integers from their places in the wire
//! layout described in [`frame`].
//!
//! 3. [`convert::convert`] scales raw integers to physical units.
//!
//! 4. [`derived::DerivedState`] computes values needing memory of earlier
//! frames, and [`describe`] turns values into plain-language text.
//!
//! No stage blocks. The synchronizer reports that it needs more bytes rather
//! than waiting for them, and every later stage completes on the frame it is
//! given.

pub mod check;
pub mod convert;
pub mod derived;
pub mod describe;
pub mod fields;
pub mod frame;
pub mod sync;
