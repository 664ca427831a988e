// ============================================================================
// REACTIVITY - Shared value with change subscribers
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

type Subscriber<T> = Rc<dyn Fn(&T)>;

/// Reactive value. Clones share both the value and the subscriber list.
pub struct ReactiveState<T> {
    value: Rc<RefCell<T>>,
    subscribers: Rc<RefCell<Vec<Subscriber<T>>>>,
}

impl<T: Clone + 'static> ReactiveState<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Replace the value and notify every subscriber
    pub fn set(&self, new_value: T) {
        *self.value.borrow_mut() = new_value;
        self.notify();
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&T) + 'static,
    {
        self.subscribers.borrow_mut().push(Rc::new(callback));
    }

    // Callbacks get a copy of the value and a snapshot of the list, so they
    // may read this state or subscribe again without a borrow conflict.
    fn notify(&self) {
        let current = self.get();
        let subscribers: Vec<Subscriber<T>> = self.subscribers.borrow().clone();
        for callback in subscribers {
            callback(&current);
        }
    }
}

impl<T: Clone + PartialEq + 'static> ReactiveState<T> {
    /// Set and notify only when the value actually changes
    pub fn set_if_changed(&self, new_value: T) -> bool {
        if *self.value.borrow() == new_value {
            return false;
        }
        self.set(new_value);
        true
    }
}

impl<T> Clone for ReactiveState<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            subscribers: self.subscribers.clone(),
        }
    }
}
