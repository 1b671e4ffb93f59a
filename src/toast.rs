//! Time is passed in explicitly (milliseconds on any monotonic clock) so the
//! lifecycle can be driven by browser timers and by tests alike. Each toast
//! owns its own deadlines; advancing the clock never couples two toasts.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToastTiming {
    pub display_ms: u32,
    pub exit_ms: u32,
    /// Visible toasts beyond this start their exit early, oldest first.
    pub max_visible: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToastPhase {
    Visible { until: f64 },
    Leaving { until: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub phase: ToastPhase,
}

impl Toast {
    pub fn is_leaving(&self) -> bool {
        matches!(self.phase, ToastPhase::Leaving { .. })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToastQueue {
    timing: ToastTiming,
    next_id: u64,
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn new(timing: ToastTiming) -> Self {
        Self {
            timing,
            next_id: 1,
            toasts: Vec::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn push(&mut self, message: impl Into<String>, now: f64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            message: message.into(),
            phase: ToastPhase::Visible {
                until: now + f64::from(self.timing.display_ms),
            },
        });
        self.enforce_visible_cap(now);
        id
    }

    pub fn advance(&mut self, now: f64) {
        let exit_ms = f64::from(self.timing.exit_ms);

        for toast in &mut self.toasts {
            if let ToastPhase::Visible { until } = toast.phase {
                if now >= until {
                    toast.phase = ToastPhase::Leaving {
                        until: until + exit_ms,
                    };
                }
            }
        }

        self.toasts.retain(|toast| match toast.phase {
            ToastPhase::Leaving { until } => now < until,
            ToastPhase::Visible { .. } => true,
        });
    }

    fn enforce_visible_cap(&mut self, now: f64) {
        let exit_ms = f64::from(self.timing.exit_ms);
        let visible = self.toasts.iter().filter(|toast| !toast.is_leaving()).count();
        let mut excess = visible.saturating_sub(self.timing.max_visible);

        for toast in &mut self.toasts {
            if excess == 0 {
                break;
            }
            if !toast.is_leaving() {
                toast.phase = ToastPhase::Leaving {
                    until: now + exit_ms,
                };
                excess -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing() -> ToastTiming {
        ToastTiming {
            display_ms: 3_000,
            exit_ms: 300,
            max_visible: 4,
        }
    }

    #[test]
    fn toasts_expire_on_their_own_timers() {
        let mut queue = ToastQueue::new(timing());
        let first = queue.push("Email copied to clipboard!", 0.0);
        let second = queue.push("Email copied to clipboard!", 100.0);
        assert_ne!(first, second);
        assert_eq!(queue.iter().count(), 2, "duplicates are not collapsed");

        queue.advance(3_000.0);
        let phases: Vec<bool> = queue.iter().map(Toast::is_leaving).collect();
        assert_eq!(phases, vec![true, false]);

        queue.advance(3_300.0);
        let remaining: Vec<u64> = queue.iter().map(|toast| toast.id).collect();
        assert_eq!(remaining, vec![second]);
        assert!(queue.iter().all(Toast::is_leaving));

        queue.advance(3_399.0);
        assert_eq!(queue.iter().count(), 1);
        queue.advance(3_400.0);
        assert_eq!(queue.iter().count(), 0);
    }

    #[test]
    fn late_timer_still_honours_the_exit_window() {
        let mut queue = ToastQueue::new(timing());
        queue.push("hello", 0.0);

        queue.advance(3_250.0);
        assert_eq!(queue.iter().count(), 1);
        queue.advance(3_300.0);
        assert_eq!(queue.iter().count(), 0);
    }

    #[test]
    fn pushing_past_the_cap_retires_the_oldest_visible_toast() {
        let mut queue = ToastQueue::new(ToastTiming {
            max_visible: 2,
            ..timing()
        });
        let oldest = queue.push("a", 0.0);
        queue.push("b", 10.0);
        queue.push("c", 20.0);

        let leaving: Vec<u64> = queue
            .iter()
            .filter(|toast| toast.is_leaving())
            .map(|toast| toast.id)
            .collect();
        assert_eq!(leaving, vec![oldest]);

        queue.advance(320.0);
        assert_eq!(queue.iter().count(), 2);
    }
}
