/// Identifies one callback registered on an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// An ordered list of callbacks, all invoked with the same payload.
pub struct Event<T> {
    handlers: Vec<(Subscription, Box<dyn FnMut(&T)>)>,
    next_id: u64,
}

impl<T> Event<T> {
    pub fn new() -> Self {
        return Event {
            handlers: Vec::new(),
            next_id: 0,
        };
    }

    pub fn subscribe<F>(&mut self, handler: F) -> Subscription
    where
        F: FnMut(&T) + 'static,
    {
        let subscription = Subscription(self.next_id);
        self.next_id += 1;

        self.handlers.push((subscription, Box::new(handler)));
        return subscription;
    }

    /// Removes a callback, keeping the others in registration order.
    /// Returns false when the subscription was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(id, _)| *id != subscription);
        return self.handlers.len() != before;
    }

    /// Invokes every callback in registration order.
    pub fn call(&mut self, data: &T) {
        for (_, handler) in &mut self.handlers {
            handler(data);
        }
    }

    pub fn len(&self) -> usize {
        return self.handlers.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.handlers.is_empty();
    }
}

impl<T> Default for Event<T> {
    fn default() -> Self {
        return Event::new();
    }
}
