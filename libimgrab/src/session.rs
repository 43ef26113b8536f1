/// Phases a download session moves through. `Completed`, `Cancelled` and
/// `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

/// State of a single download run. Owned exclusively by the orchestrator and
/// discarded when the run returns. The denominator grows as each page is
/// processed, so the derived percentage can drop when a later page adds
/// images before its own are counted. That streaming behavior is intentional.
#[derive(Debug)]
pub struct Session {
    phase: Phase,
    images_done: u64,
    images_discovered: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            images_done: 0,
            images_discovered: 0,
        }
    }

    pub fn begin(&mut self) {
        self.phase = Phase::Running;
    }

    pub fn finish(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Add a page's image reference count to the denominator.
    pub fn record_discovered(&mut self, count: usize) {
        self.images_discovered += count as u64;
    }

    /// Mark one image persisted and return the derived percentage. Undefined
    /// until at least one image has been discovered.
    pub fn record_completed(&mut self) -> Option<u8> {
        self.images_done += 1;
        self.percent()
    }

    /// `floor(done / discovered * 100)`, only defined once the denominator is
    /// non-zero. Reaches 100 exactly when every discovered image is done.
    pub fn percent(&self) -> Option<u8> {
        if self.images_discovered == 0 {
            return None;
        }
        Some((self.images_done * 100 / self.images_discovered) as u8)
    }

    pub fn images_done(&self) -> u64 {
        self.images_done
    }

    pub fn images_discovered(&self) -> u64 {
        self.images_discovered
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_percent_before_discovery() {
        let session = Session::new();
        assert_eq!(session.percent(), None);
    }

    #[test]
    fn percent_is_floored() {
        let mut session = Session::new();
        session.record_discovered(3);
        assert_eq!(session.record_completed(), Some(33));
        assert_eq!(session.record_completed(), Some(66));
        assert_eq!(session.record_completed(), Some(100));
    }

    #[test]
    fn later_page_grows_denominator() {
        let mut session = Session::new();
        session.record_discovered(3);
        for _ in 0..3 {
            session.record_completed();
        }
        assert_eq!(session.percent(), Some(100));

        // Second page discovered, ratio drops before its images are counted.
        session.record_discovered(2);
        assert_eq!(session.percent(), Some(60));
        assert_eq!(session.record_completed(), Some(80));
        assert_eq!(session.record_completed(), Some(100));
        assert_eq!(session.images_done(), 5);
        assert_eq!(session.images_discovered(), 5);
    }

    #[test]
    fn counters_never_decrease() {
        let mut session = Session::new();
        session.record_discovered(2);
        let mut last_done = 0;
        for _ in 0..2 {
            session.record_completed();
            assert!(session.images_done() >= last_done);
            assert!(session.images_done() <= session.images_discovered());
            last_done = session.images_done();
        }
    }

    #[test]
    fn phase_transitions() {
        let mut session = Session::new();
        assert_eq!(session.phase(), Phase::Idle);
        session.begin();
        assert_eq!(session.phase(), Phase::Running);
        session.finish(Phase::Cancelled);
        assert_eq!(session.phase(), Phase::Cancelled);
    }
}
