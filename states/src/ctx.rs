use std::any::{TypeId, type_name};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;

use flume::Receiver;
use tokio_util::sync::CancellationToken;

use crate::updater::Update;
use crate::{Command, CommandSnapshot, Compute, Dep, State, TaskId, Updater};

/// Owner of every state, compute and command of the app.
///
/// A frame looks like:
/// 1. `sync_computes()` applies values sent by commands and computes;
/// 2. widgets read caches and edit states, and enqueue commands;
/// 3. `run_computed()` recomputes computes whose deps changed;
/// 4. `flush_commands()` spawns queued commands.
#[derive(Debug)]
pub struct StateCtx {
    states: BTreeMap<TypeId, Box<dyn State>>,
    computes: BTreeMap<TypeId, Box<dyn Compute>>,
    // registration order, computes must be recorded after the computes they read
    compute_order: Vec<TypeId>,
    commands: BTreeMap<TypeId, Arc<dyn Command>>,

    dirty: BTreeSet<TypeId>,
    never_computed: BTreeSet<TypeId>,
    command_queue: VecDeque<TypeId>,

    updater: Updater,
    recv: Receiver<Update>,

    generation: u64,
    shutdown_token: CancellationToken,
    #[cfg(not(target_arch = "wasm32"))]
    task_set: tokio::task::JoinSet<()>,
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl StateCtx {
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();

        Self {
            states: BTreeMap::new(),
            computes: BTreeMap::new(),
            compute_order: Vec::new(),
            commands: BTreeMap::new(),
            dirty: BTreeSet::new(),
            never_computed: BTreeSet::new(),
            command_queue: VecDeque::new(),
            updater: Updater::new(send),
            recv,
            generation: 0,
            shutdown_token: CancellationToken::new(),
            #[cfg(not(target_arch = "wasm32"))]
            task_set: tokio::task::JoinSet::new(),
        }
    }

    pub fn add_state<T: State>(&mut self, state: T) {
        let id = TypeId::of::<T>();
        self.states.insert(id, Box::new(state));
        self.dirty.insert(id);
    }

    pub fn record_compute<T: Compute>(&mut self, compute: T) {
        let id = TypeId::of::<T>();
        if self.computes.insert(id, Box::new(compute)).is_none() {
            self.compute_order.push(id);
        }
        self.never_computed.insert(id);
    }

    pub fn record_command<T: Command>(&mut self, command: T) {
        self.commands.insert(TypeId::of::<T>(), Arc::new(command));
    }

    pub fn updater(&self) -> Updater {
        self.updater.clone()
    }

    /// # Panics
    /// Panics if `T` was never registered.
    pub fn state<T: State>(&self) -> &T {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|state| state.as_any().downcast_ref::<T>())
            .unwrap_or_else(|| panic!("State {} is not registered", type_name::<T>()))
    }

    /// Mutable access for widgets; the state is treated as changed.
    ///
    /// # Panics
    /// Panics if `T` was never registered.
    pub fn state_mut<T: State>(&mut self) -> &mut T {
        let id = TypeId::of::<T>();
        self.dirty.insert(id);
        self.states
            .get_mut(&id)
            .and_then(|state| state.as_any_mut().downcast_mut::<T>())
            .unwrap_or_else(|| panic!("State {} is not registered", type_name::<T>()))
    }

    pub fn update<T: State>(&mut self, f: impl FnOnce(&mut T)) {
        f(self.state_mut::<T>());
    }

    pub fn cached<T: Compute>(&self) -> Option<&T> {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|compute| compute.as_any().downcast_ref::<T>())
    }

    /// # Panics
    /// Panics if `T` was never recorded.
    pub fn compute<T: Compute>(&self) -> &T {
        self.cached::<T>()
            .unwrap_or_else(|| panic!("Compute {} is not registered", type_name::<T>()))
    }

    /// Apply every value published through an [`Updater`] since the last sync.
    pub fn sync_computes(&mut self) {
        #[cfg(not(target_arch = "wasm32"))]
        while let Some(joined) = self.task_set.try_join_next() {
            if let Err(err) = joined
                && err.is_panic()
            {
                log::error!("Command task panicked: {err}");
            }
        }

        while let Ok((id, value)) = self.recv.try_recv() {
            if let Some(compute) = self.computes.get_mut(&id) {
                compute.assign_box(value);
            } else if let Some(state) = self.states.get_mut(&id) {
                state.assign_box(value);
            } else {
                log::warn!("Dropped update for unregistered type {id:?}");
                continue;
            }
            self.dirty.insert(id);
        }
    }

    /// Run every compute that was never computed or whose deps changed since the last run.
    pub fn run_computed(&mut self) {
        let to_run: Vec<TypeId> = self
            .compute_order
            .iter()
            .copied()
            .filter(|id| {
                self.never_computed.contains(id)
                    || self.computes.get(id).is_some_and(|compute| {
                        let (state_deps, compute_deps) = compute.deps();
                        state_deps
                            .iter()
                            .chain(compute_deps)
                            .any(|dep| self.dirty.contains(dep))
                    })
            })
            .collect();

        for id in &to_run {
            if let Some(compute) = self.computes.get(id) {
                compute.compute(Dep::new(&self.states), self.updater.clone());
            }
        }

        self.never_computed.clear();
        self.dirty.clear();
    }

    /// Queue a command; it is spawned by the next [`Self::flush_commands`].
    pub fn enqueue_command<T: Command>(&mut self) {
        self.command_queue.push_back(TypeId::of::<T>());
    }

    /// Queue a command and spawn it right away.
    pub fn dispatch<T: Command>(&mut self) -> Vec<TaskId> {
        self.enqueue_command::<T>();
        self.flush_commands()
    }

    /// Spawn every queued command with one snapshot taken now.
    pub fn flush_commands(&mut self) -> Vec<TaskId> {
        if self.command_queue.is_empty() {
            return Vec::new();
        }

        let mut spawned = Vec::with_capacity(self.command_queue.len());
        while let Some(id) = self.command_queue.pop_front() {
            let Some(command) = self.commands.get(&id).cloned() else {
                log::error!("Command {id:?} was enqueued but never recorded");
                continue;
            };

            self.generation += 1;
            let task_id = TaskId::new(id, self.generation);
            let cancel = self.shutdown_token.child_token();
            let future = command.run(self.snapshot(), self.updater.clone(), cancel.clone());
            let guarded = async move {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {
                        log::info!("Command task {task_id:?} cancelled");
                    }
                    () = future => {}
                }
            };

            #[cfg(not(target_arch = "wasm32"))]
            self.task_set.spawn(guarded);
            #[cfg(target_arch = "wasm32")]
            wasm_bindgen_futures::spawn_local(guarded);

            log::debug!("Spawned command task {task_id:?}");
            spawned.push(task_id);
        }
        spawned
    }

    fn snapshot(&self) -> CommandSnapshot {
        let mut snap = CommandSnapshot::default();
        for (id, state) in &self.states {
            if let Some(value) = state.snapshot() {
                snap.insert(*id, value);
            }
        }
        for (id, compute) in &self.computes {
            if let Some(value) = compute.snapshot() {
                snap.insert(*id, value);
            }
        }
        snap
    }

    /// Spawned command tasks that have not been joined yet.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn task_count(&self) -> usize {
        self.task_set.len()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn task_set_mut(&mut self) -> &mut tokio::task::JoinSet<()> {
        &mut self.task_set
    }

    /// Cancel every outstanding command task.
    pub async fn shutdown(&mut self) {
        self.shutdown_token.cancel();
        #[cfg(not(target_arch = "wasm32"))]
        self.task_set.shutdown().await;
    }
}
