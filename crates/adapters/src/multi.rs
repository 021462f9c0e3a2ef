//! Fan-out to several handlers.

use grovelog_ports::{Attr, Handler, Level, LogContext, Record};
use grovelog_shared::Result;
use std::fmt;
use std::sync::Arc;

/// Dispatches each record to an ordered list of children.
///
/// Delivery is fail-fast: the first child error ends the call and later
/// children are not attempted. The next call starts over with every child.
#[derive(Clone, Default)]
pub struct MultiHandler {
    children: Arc<[Arc<dyn Handler>]>,
}

impl MultiHandler {
    /// Fan out to `children`, in order.
    pub fn new(children: impl IntoIterator<Item = Arc<dyn Handler>>) -> Self {
        Self {
            children: children.into_iter().collect(),
        }
    }

    /// Children in dispatch order.
    #[must_use]
    pub fn children(&self) -> &[Arc<dyn Handler>] {
        &self.children
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true when there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn derive(&self, derive_child: impl Fn(Arc<dyn Handler>) -> Arc<dyn Handler>) -> Self {
        Self::new(self.children.iter().cloned().map(derive_child))
    }
}

impl fmt::Debug for MultiHandler {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("MultiHandler")
            .field("children", &self.children.len())
            .finish()
    }
}

impl Handler for MultiHandler {
    fn enabled(&self, ctx: &LogContext, level: Level) -> bool {
        self.children.iter().any(|child| child.enabled(ctx, level))
    }

    fn handle(&self, ctx: &LogContext, record: &Record) -> Result<()> {
        for child in self.children.iter() {
            if child.enabled(ctx, record.level) {
                child.handle(ctx, record)?;
            }
        }
        Ok(())
    }

    fn with_attrs(self: Arc<Self>, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        if attrs.iter().all(Attr::has_empty_key) {
            return self;
        }
        Arc::new(self.derive(|child| child.with_attrs(attrs.clone())))
    }

    fn with_group(self: Arc<Self>, name: &str) -> Arc<dyn Handler> {
        if name.is_empty() {
            return self;
        }
        Arc::new(self.derive(|child| child.with_group(name)))
    }

    fn flush(&self) -> Result<()> {
        for child in self.children.iter() {
            child.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grovelog_shared::{ErrorCode, LogError};
    use parking_lot::Mutex;
    use std::error::Error;

    /// Records calls into a shared journal.
    struct Probe {
        name: &'static str,
        min: Level,
        fail: bool,
        journal: Arc<Mutex<Vec<String>>>,
        attrs: Vec<Attr>,
        groups: Vec<String>,
    }

    impl Probe {
        fn new(name: &'static str, journal: &Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                name,
                min: Level::DEBUG,
                fail: false,
                journal: Arc::clone(journal),
                attrs: Vec::new(),
                groups: Vec::new(),
            }
        }
    }

    impl Handler for Probe {
        fn enabled(&self, _ctx: &LogContext, level: Level) -> bool {
            level >= self.min
        }

        fn handle(&self, _ctx: &LogContext, record: &Record) -> Result<()> {
            self.journal.lock().push(format!(
                "{}:{}:{}:{}",
                self.name,
                record.message,
                self.attrs.len(),
                self.groups.join(".")
            ));
            if self.fail {
                return Err(LogError::sink(ErrorCode::io(), "probe failure"));
            }
            Ok(())
        }

        fn with_attrs(self: Arc<Self>, attrs: Vec<Attr>) -> Arc<dyn Handler> {
            let mut merged = self.attrs.clone();
            merged.extend(attrs);
            Arc::new(Self {
                name: self.name,
                min: self.min,
                fail: self.fail,
                journal: Arc::clone(&self.journal),
                attrs: merged,
                groups: self.groups.clone(),
            })
        }

        fn with_group(self: Arc<Self>, name: &str) -> Arc<dyn Handler> {
            let mut groups = self.groups.clone();
            groups.push(name.to_string());
            Arc::new(Self {
                name: self.name,
                min: self.min,
                fail: self.fail,
                journal: Arc::clone(&self.journal),
                attrs: self.attrs.clone(),
                groups,
            })
        }
    }

    #[test]
    fn enabled_when_any_child_is() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let strict = Probe {
            min: Level::ERROR,
            ..Probe::new("strict", &journal)
        };
        let lenient = Probe {
            min: Level::INFO,
            ..Probe::new("lenient", &journal)
        };
        let children: [Arc<dyn Handler>; 2] = [Arc::new(strict), Arc::new(lenient)];
        let multi = MultiHandler::new(children);
        let ctx = LogContext::new();
        assert!(multi.enabled(&ctx, Level::INFO));
        assert!(!multi.enabled(&ctx, Level::DEBUG));
        assert!(!MultiHandler::default().enabled(&ctx, Level::ERROR));
    }

    #[test]
    fn first_failure_stops_delivery() -> Result<(), Box<dyn Error>> {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let failing = Probe {
            fail: true,
            ..Probe::new("first", &journal)
        };
        let children: [Arc<dyn Handler>; 2] =
            [Arc::new(failing), Arc::new(Probe::new("second", &journal))];
        let multi = MultiHandler::new(children);

        let record = Record::new(Level::INFO, "m");
        let error = multi.handle(&LogContext::new(), &record).err();
        assert!(matches!(error, Some(ref error) if error.is_sink()));
        assert_eq!(*journal.lock(), ["first:m:0:"]);

        // Later calls are unaffected.
        let _ = multi.handle(&LogContext::new(), &record);
        assert_eq!(journal.lock().len(), 2);
        Ok(())
    }

    #[test]
    fn disabled_children_are_skipped() -> Result<(), Box<dyn Error>> {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let quiet = Probe {
            min: Level::ERROR,
            ..Probe::new("quiet", &journal)
        };
        let children: [Arc<dyn Handler>; 2] =
            [Arc::new(quiet), Arc::new(Probe::new("loud", &journal))];
        let multi = MultiHandler::new(children);
        multi.handle(&LogContext::new(), &Record::new(Level::INFO, "m"))?;
        assert_eq!(*journal.lock(), ["loud:m:0:"]);
        Ok(())
    }

    #[test]
    fn derivation_applies_to_every_child() -> Result<(), Box<dyn Error>> {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let children: [Arc<dyn Handler>; 2] = [
            Arc::new(Probe::new("a", &journal)),
            Arc::new(Probe::new("b", &journal)),
        ];
        let multi: Arc<dyn Handler> = Arc::new(MultiHandler::new(children));

        let derived = Arc::clone(&multi)
            .with_group("req")
            .with_attrs(vec![Attr::new("id", 7)]);
        derived.handle(&LogContext::new(), &Record::new(Level::INFO, "m"))?;
        multi.handle(&LogContext::new(), &Record::new(Level::INFO, "p"))?;

        assert_eq!(*journal.lock(), ["a:m:1:req", "b:m:1:req", "a:p:0:", "b:p:0:"]);
        Ok(())
    }

    #[test]
    fn no_op_derivations_return_the_receiver() {
        let multi: Arc<dyn Handler> = Arc::new(MultiHandler::default());
        assert!(Arc::ptr_eq(&Arc::clone(&multi).with_group(""), &multi));
        assert!(Arc::ptr_eq(
            &Arc::clone(&multi).with_attrs(vec![Attr::new("", 1)]),
            &multi
        ));
    }
}
