//! System utilities for embedded devices.
//!
//! This module provides the system-level collaborators the protocol engine
//! needs from its host, kept `no_std` compatible.
//!
//! # Available Utilities
//!
//! - **[`clock`]**: Millisecond time source driving retries and frame timeouts
//!
//! # Usage
//!
//! On a microcontroller, wrap the HAL's tick counter:
//!
//! ```rust
//! use core::sync::atomic::{AtomicU32, Ordering};
//! use libmqttsn::system::clock::Clock;
//!
//! static TICKS: AtomicU32 = AtomicU32::new(0);
//!
//! struct SysTick;
//!
//! impl Clock for SysTick {
//!     fn now_millis(&self) -> u32 {
//!         TICKS.load(Ordering::Relaxed)
//!     }
//! }
//!
//! TICKS.store(42, Ordering::Relaxed);
//! assert_eq!(SysTick.now_millis(), 42);
//! ```

/// Millisecond time source.
///
/// Provides the [`Clock`](clock::Clock) trait and, with the `std` feature,
/// a wall-clock implementation.
pub mod clock;
