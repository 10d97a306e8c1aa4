//! One step of the event loop, minus the terminal and the runtime
//!
//! Store actions go to the store and may trigger a UI follow-up; every
//! other action runs through the UI reducer and is planned for effects.
//! The caller hands the returned effects to the service layer.

use std::collections::VecDeque;

use libquill::store::{Dispatch, Store};

use super::actions::Action;
use super::effects::{follow_store, plan, Effect};
use super::reducer::reduce;
use super::state::AppState;

pub fn handle(ui: AppState, store: &mut Store, action: Action) -> (AppState, Vec<Effect>) {
    let mut ui = ui;
    let mut effects = Vec::new();
    let mut queue = VecDeque::from([action]);

    while let Some(action) = queue.pop_front() {
        match action {
            Action::Store(store_action) => {
                store.dispatch(store_action.clone());
                queue.extend(follow_store(&ui, store.state(), &store_action));
            }
            action => {
                let after = reduce(ui.clone(), action.clone());
                effects.extend(plan(&ui, &after, &action, store.state()));
                ui = after;
            }
        }
    }

    (ui, effects)
}
