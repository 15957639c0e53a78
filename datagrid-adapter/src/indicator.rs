use crate::Debouncer;

/// Default quiet period before the scroll indicator hides again.
pub const DEFAULT_INDICATOR_QUIET_MS: u64 = 1_500;

/// Visibility timer for the "rows X-Y of Z" overlay.
///
/// Any scroll shows the indicator and restarts the hide timer; it hides once the quiet period
/// passes without scrolling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrollIndicator {
    enabled: bool,
    visible: bool,
    hide: Debouncer<()>,
}

impl ScrollIndicator {
    pub fn new(enabled: bool, quiet_ms: u64) -> Self {
        Self {
            enabled,
            visible: false,
            hide: Debouncer::new(quiet_ms),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn on_scroll(&mut self, now_ms: u64) {
        if !self.enabled {
            return;
        }
        self.visible = true;
        self.hide.schedule((), now_ms);
    }

    /// Returns `true` when the indicator was hidden by this tick.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if self.hide.poll(now_ms).is_some() {
            self.visible = false;
            return true;
        }
        false
    }

    pub fn cancel(&mut self) {
        self.hide.cancel();
        self.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hides_after_quiet_period() {
        let mut ind = ScrollIndicator::new(true, DEFAULT_INDICATOR_QUIET_MS);
        assert!(!ind.is_visible());
        ind.on_scroll(0);
        ind.on_scroll(1_000);
        assert!(!ind.tick(2_000));
        assert!(ind.is_visible());
        assert!(ind.tick(2_500));
        assert!(!ind.is_visible());
    }

    #[test]
    fn disabled_never_shows() {
        let mut ind = ScrollIndicator::new(false, 100);
        ind.on_scroll(0);
        assert!(!ind.is_visible());
    }
}
