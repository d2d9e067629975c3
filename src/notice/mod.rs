use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLength {
    Short,
    Long,
}

impl NoticeLength {
    pub fn duration(&self) -> Duration {
        match self {
            NoticeLength::Short => Duration::from_secs(3),
            NoticeLength::Long => Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub length: NoticeLength,
}

/// Shows short messages one at a time.
///
/// There is no timer thread: the owner reports passing time with `elapse()`,
/// or calls `expire()` directly when its own timer fires.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    showing: Option<Notice>,
    /// Time left for the notice on screen.
    remaining: Duration,
    queued: VecDeque<Notice>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the message went straight on screen. A message equal
    /// to the one showing or one already waiting is dropped.
    pub fn push(&mut self, message: impl Into<String>, length: NoticeLength) -> bool {
        let notice = Notice {
            message: message.into(),
            length,
        };

        match &self.showing {
            None => {
                self.show(notice);
                true
            }
            Some(current) => {
                let duplicate = current.message == notice.message
                    || self.queued.iter().any(|q| q.message == notice.message);
                if !duplicate {
                    self.queued.push_back(notice);
                }
                false
            }
        }
    }

    pub fn showing(&self) -> Option<&Notice> {
        self.showing.as_ref()
    }

    pub fn pending(&self) -> usize {
        self.queued.len()
    }

    /// Advances the clock by `elapsed`, expiring every notice whose time runs
    /// out; leftover time carries over to the next one.
    pub fn elapse(&mut self, mut elapsed: Duration) {
        while self.showing.is_some() {
            if elapsed < self.remaining {
                self.remaining -= elapsed;
                return;
            }
            elapsed -= self.remaining;
            self.expire();
        }
    }

    /// The current message's time is up; returns the next one, if any.
    pub fn expire(&mut self) -> Option<&Notice> {
        self.showing = None;
        self.remaining = Duration::ZERO;
        if let Some(next) = self.queued.pop_front() {
            self.show(next);
        }
        self.showing.as_ref()
    }

    fn show(&mut self, notice: Notice) {
        log::info!("{}", notice.message);
        self.remaining = notice.length.duration();
        self.showing = Some(notice);
    }
}
