//! Application store
//!
//! The single shared, mutable piece of client state:
//! - Actions: what happened
//! - State: what is true right now
//! - Reducer: pure function (State, Action) -> State
//!
//! [`Store`] owns the state, applies actions through the reducer and calls
//! every subscribed listener synchronously after each transition.
//!
//! ```
//! use libquill::store::{Action, Dispatch, Store};
//!
//! let mut store = Store::new();
//! let subscription = store.subscribe(|state| {
//!     println!("topics loading: {}", state.topics.is_loading());
//! });
//!
//! store.dispatch(Action::TopicsRequested);
//! store.unsubscribe(subscription);
//! ```

pub mod actions;
pub mod reducer;
pub mod state;

pub use actions::Action;
pub use reducer::reduce;
pub use state::{Keyed, Loadable, State, PAGE_SIZE};

/// Something that accepts actions: the store itself, or a channel leading to it
pub trait Dispatch {
    fn dispatch(&mut self, action: Action);
}

/// Handle returned by [`Store::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&State)>;

#[derive(Default)]
pub struct Store {
    state: State,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Register a listener called after every dispatch
    pub fn subscribe(&mut self, listener: impl FnMut(&State) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Dispatch for Store {
    fn dispatch(&mut self, action: Action) {
        tracing::trace!(?action, "dispatch");
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.state);
        }
    }
}

/// Collects actions instead of applying them (handy for tests and batching)
impl Dispatch for Vec<Action> {
    fn dispatch(&mut self, action: Action) {
        self.push(action);
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("subscribers", &self.listeners.len())
            .finish()
    }
}
