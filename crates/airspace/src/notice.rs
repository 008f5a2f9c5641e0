/// Operator-facing message. Alerts block the operator until acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub seq: u64,
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    Alert,
    Info,
}

#[derive(Debug, Default)]
pub struct NoticeBus {
    next_seq: u64,
    notices: Vec<Notice>,
}

impl NoticeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, kind: NoticeKind, message: impl Into<String>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.notices.push(Notice {
            seq,
            kind,
            message: message.into(),
        });
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.emit(NoticeKind::Alert, message);
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::{NoticeBus, NoticeKind};

    #[test]
    fn sequence_keeps_growing_across_drains() {
        let mut bus = NoticeBus::new();
        bus.alert("first");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.notices().is_empty());

        bus.emit(NoticeKind::Info, "second");
        assert_eq!(bus.notices()[0].seq, 1);
    }
}
