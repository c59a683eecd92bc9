/// A monotonic millisecond counter.
///
/// The value may wrap around; consumers compare instants with
/// `wrapping_sub`, so only differences matter.
pub trait Clock {
    /// Milliseconds since an arbitrary origin.
    fn now_millis(&self) -> u32;
}

impl<K: Clock + ?Sized> Clock for &K {
    fn now_millis(&self) -> u32 {
        (**self).now_millis()
    }
}

/// Clock backed by [`std::time::Instant`], counting from construction.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl SystemClock {
    /// Start counting from now.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for SystemClock {
    #[inline]
    fn now_millis(&self) -> u32 {
        self.origin.elapsed().as_millis() as u32
    }
}
