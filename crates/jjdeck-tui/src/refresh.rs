use std::time::Duration;

/// Periodic background reload timer state.
///
/// The event loop only emits a tick while the driver is armed. Each tick
/// disarms it; handling the tick decides whether to re-arm and whether a
/// silent reload is due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RefreshDriver {
    interval: Option<Duration>,
    armed: bool,
    in_flight: bool,
}

impl RefreshDriver {
    /// Zero seconds disables periodic refresh.
    pub(crate) fn new(interval_secs: u64) -> Self {
        Self {
            interval: interval_from_secs(interval_secs),
            armed: true,
            in_flight: false,
        }
    }

    pub(crate) fn set_interval(&mut self, interval_secs: u64) {
        self.interval = interval_from_secs(interval_secs);
    }

    pub(crate) fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.armed && self.interval.is_some()
    }

    pub(crate) fn arm(&mut self) {
        self.armed = true;
    }

    pub(crate) fn disarm(&mut self) {
        self.armed = false;
    }

    /// Returns true when a background reload should be scheduled.
    ///
    /// `halted` leaves the driver disarmed until something re-arms it.
    /// `suppressed` re-arms without reloading.
    pub(crate) fn on_tick(&mut self, halted: bool, suppressed: bool) -> bool {
        self.armed = false;
        if halted || self.interval.is_none() {
            return false;
        }

        self.armed = true;
        if suppressed || self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    pub(crate) fn finish(&mut self) {
        self.in_flight = false;
    }
}

fn interval_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::RefreshDriver;

    #[test]
    fn tick_schedules_reload_and_rearms() {
        let mut driver = RefreshDriver::new(10);
        assert_eq!(driver.interval(), Some(Duration::from_secs(10)));
        assert!(driver.on_tick(false, false));
        assert!(driver.is_armed());
    }

    #[test]
    fn error_halts_until_rearmed() {
        let mut driver = RefreshDriver::new(10);
        assert!(!driver.on_tick(true, false));
        assert!(!driver.is_armed());

        driver.arm();
        assert!(driver.on_tick(false, false));
    }

    #[test]
    fn suppressed_tick_rearms_without_reloading() {
        let mut driver = RefreshDriver::new(10);
        assert!(!driver.on_tick(false, true));
        assert!(driver.is_armed());
    }

    #[test]
    fn only_one_background_reload_is_in_flight() {
        let mut driver = RefreshDriver::new(5);
        assert!(driver.on_tick(false, false));
        assert!(!driver.on_tick(false, false));
        driver.finish();
        assert!(driver.on_tick(false, false));
    }

    #[test]
    fn zero_interval_disables_ticks() {
        let mut driver = RefreshDriver::new(0);
        assert!(!driver.is_armed());
        assert!(!driver.on_tick(false, false));

        driver.set_interval(3);
        driver.arm();
        assert!(driver.is_armed());
    }
}
