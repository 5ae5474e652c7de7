use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative stop signal. Clones share one flag, so a handle can be moved
/// into another thread or a signal handler while the cycle keeps its own.
/// The cycle consumes it at the top of the next iteration.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Consume a pending request; true at most once per `request_stop`.
    pub fn take_request(&self) -> bool {
        self.flag.swap(false, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let a = StopHandle::new();
        let b = a.clone();
        std::thread::spawn(move || b.request_stop())
            .join()
            .unwrap();
        assert!(a.take_request());
        assert!(!a.take_request());
    }
}
