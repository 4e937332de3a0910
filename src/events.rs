//! Change notifications shared by every list/table model.
//!
//! Views subscribe a callback and receive [`ModelEvent`]s.  Structural
//! changes are bracketed by an RAII guard so the closing event is emitted on
//! every exit path, including early returns.

/// A change announced by a model to its observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelEvent {
    /// Cell contents changed for the inclusive row range.
    DataChanged { first: usize, last: usize },
    /// All previously held row indices are about to become invalid.
    LayoutAboutToBeChanged,
    /// Row count and identity may have changed; re-query everything.
    LayoutChanged,
    RowsAboutToBeInserted { first: usize, last: usize },
    RowsInserted { first: usize, last: usize },
    RowsAboutToBeRemoved { first: usize, last: usize },
    RowsRemoved { first: usize, last: usize },
}

/// Handle returned by [`ModelNotifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&ModelEvent)>;

/// Observer list owned by a model.
#[derive(Default)]
pub struct ModelNotifier {
    observers: Vec<(SubscriptionId, Observer)>,
    next_id: u64,
}

impl std::fmt::Debug for ModelNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelNotifier")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ModelNotifier {
    pub fn subscribe(&mut self, observer: impl FnMut(&ModelEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns `false` if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    pub fn emit(&mut self, event: ModelEvent) {
        for (_, observer) in &mut self.observers {
            observer(&event);
        }
    }

    pub fn data_changed(&mut self, first: usize, last: usize) {
        self.emit(ModelEvent::DataChanged { first, last });
    }

    /// Bracket an insertion of rows `first..=last`.
    pub fn insert_rows(&mut self, first: usize, last: usize) -> Bracket<'_> {
        self.bracket(
            ModelEvent::RowsAboutToBeInserted { first, last },
            ModelEvent::RowsInserted { first, last },
        )
    }

    /// Bracket a removal of rows `first..=last`.
    pub fn remove_rows(&mut self, first: usize, last: usize) -> Bracket<'_> {
        self.bracket(
            ModelEvent::RowsAboutToBeRemoved { first, last },
            ModelEvent::RowsRemoved { first, last },
        )
    }

    /// Bracket a structural reset (orientation flip and the like).
    pub fn reset_layout(&mut self) -> Bracket<'_> {
        self.bracket(ModelEvent::LayoutAboutToBeChanged, ModelEvent::LayoutChanged)
    }

    fn bracket(&mut self, begin: ModelEvent, end: ModelEvent) -> Bracket<'_> {
        self.emit(begin);
        Bracket {
            notifier: self,
            end,
        }
    }
}

/// Emits the closing event of a structural change when dropped.
#[must_use = "dropping the bracket immediately closes the change"]
pub struct Bracket<'a> {
    notifier: &'a mut ModelNotifier,
    end: ModelEvent,
}

impl Drop for Bracket<'_> {
    fn drop(&mut self) {
        self.notifier.emit(self.end);
    }
}

/// Records every event it sees; handy for views and tests alike.
#[derive(Debug, Default, Clone)]
pub struct EventLog(std::rc::Rc<std::cell::RefCell<Vec<ModelEvent>>>);

impl EventLog {
    pub fn attach(&self, notifier: &mut ModelNotifier) -> SubscriptionId {
        let sink = self.0.clone();
        notifier.subscribe(move |ev| sink.borrow_mut().push(*ev))
    }

    pub fn take(&self) -> Vec<ModelEvent> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}
