//! # Pipeline Coordinator
//!
//! Spawns the generator, inserter and monitor threads and owns them until
//! they have all exited.
//!
//! ## Handoff
//!
//! Generator and inserter meet on a `bounded(0)` channel: a send completes
//! only when the inserter takes the entity, so at most one entity is ever in
//! flight and insertion order equals generation order.
//!
//! ## Cancellation
//!
//! Every blocking point is a `select!` that also watches the shared
//! [`CancelToken`]. After a wake-up the flag is checked once more, so a tick
//! or a handoff that races with cancellation is not acted on.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, select, tick, Receiver, Sender, TrySendError};
use goban_store::{Entity, EntityStore};
use tracing::{debug, error, info, trace, warn};

use crate::cancel::CancelToken;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::factory::EntityFactory;
use crate::monitor::{Monitor, MonitorEvent};
use crate::task::{TaskGuard, TaskKind, TaskState, TaskStates};

/// Totals returned once every task has stopped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Entities the inserter accepted from the generator.
    pub generated: u64,
    /// Entities written to the store.
    pub inserted: u64,
    /// Monitor polls performed.
    pub monitor_ticks: u64,
}

/// Configures and starts a pipeline.
#[derive(Debug)]
pub struct PipelineBuilder {
    store: Arc<EntityStore>,
    config: PipelineConfig,
    events: Option<Sender<MonitorEvent>>,
}

impl PipelineBuilder {
    /// Creates a builder with the default configuration.
    #[must_use]
    pub fn new(store: Arc<EntityStore>) -> Self {
        Self {
            store,
            config: PipelineConfig::default(),
            events: None,
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Forwards every monitor event to `sender` as well as logging it.
    ///
    /// Events are dropped if the channel is full.
    #[must_use]
    pub fn monitor_events(mut self, sender: Sender<MonitorEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Validates the configuration and spawns the three tasks.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] for a bad configuration and
    /// [`PipelineError::Spawn`] if a thread cannot be created. Threads that
    /// were already running are cancelled and joined before returning.
    pub fn start(self) -> PipelineResult<PipelineHandle> {
        self.config.validate()?;
        self.launch()
    }

    fn launch(self) -> PipelineResult<PipelineHandle> {
        let Self {
            store,
            config,
            events,
        } = self;

        let token = CancelToken::new();
        let states = Arc::new(TaskStates::new());
        let (handoff_tx, handoff_rx) = bounded::<Entity>(0);

        let mut handle = PipelineHandle {
            token: token.clone(),
            states: Arc::clone(&states),
            generator: None,
            inserter: None,
            monitor: None,
        };

        let inserter_states = Arc::clone(&states);
        let inserter_token = token.clone();
        let inserter_store = Arc::clone(&store);
        handle.inserter = Some(spawn(TaskKind::Inserter, &handle.states, move || {
            let guard =
                TaskGuard::enter(TaskKind::Inserter, inserter_states, inserter_token.clone());
            Ok(run_inserter(&guard, &inserter_token, &inserter_store, &handoff_rx))
        })?);

        let generator_states = Arc::clone(&states);
        let generator_token = token.clone();
        let factory = EntityFactory::new(&config);
        let interval = config.generation_interval();
        handle.generator = Some(spawn(TaskKind::Generator, &handle.states, move || {
            let guard =
                TaskGuard::enter(TaskKind::Generator, generator_states, generator_token.clone());
            run_generator(&guard, &generator_token, factory, interval, &handoff_tx)
        })?);

        let monitor_token = token;
        let monitor = Monitor::new(store);
        let interval = config.monitor_interval();
        handle.monitor = Some(spawn(TaskKind::Monitor, &handle.states, move || {
            let guard = TaskGuard::enter(TaskKind::Monitor, states, monitor_token.clone());
            Ok(run_monitor(&guard, &monitor_token, monitor, interval, events.as_ref()))
        })?);

        info!(
            generation_interval_ms = config.generation_interval_ms,
            monitor_interval_ms = config.monitor_interval_ms,
            "pipeline started"
        );
        Ok(handle)
    }
}

/// Starts a pipeline with default settings and the given generation tick.
///
/// The monitor interval is shortened below the generation interval when
/// needed, see [`PipelineConfig::pace_monitor`].
///
/// # Errors
///
/// See [`PipelineBuilder::start`]. A zero interval is rejected.
pub fn start_pipeline(
    store: Arc<EntityStore>,
    generation_interval: Duration,
) -> PipelineResult<PipelineHandle> {
    PipelineBuilder::new(store)
        .config(PipelineConfig::for_generation_interval(generation_interval))
        .start()
}

/// Owns the running tasks.
///
/// Dropping a handle that was never joined cancels the pipeline and waits
/// for every task to exit.
#[derive(Debug)]
pub struct PipelineHandle {
    token: CancelToken,
    states: Arc<TaskStates>,
    generator: Option<JoinHandle<PipelineResult<u64>>>,
    inserter: Option<JoinHandle<PipelineResult<u64>>>,
    monitor: Option<JoinHandle<PipelineResult<u64>>>,
}

impl PipelineHandle {
    /// Signals cancellation. Returns `true` for the call that cancelled.
    pub fn cancel(&self) -> bool {
        let first = self.token.cancel();
        if first {
            info!("pipeline cancellation requested");
        }
        first
    }

    /// Checks if the pipeline was cancelled, by request or by a failing task.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Returns a clone of the shared cancellation token.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Returns the lifecycle state of one task.
    #[must_use]
    pub fn task_state(&self, task: TaskKind) -> TaskState {
        self.states.get(task)
    }

    /// Checks if every task has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        TaskKind::ALL
            .iter()
            .all(|task| self.states.get(*task) == TaskState::Stopped)
    }

    /// Waits for all three tasks to exit.
    ///
    /// Tasks only exit after cancellation, so without a prior
    /// [`cancel`](Self::cancel) this blocks until a task fails.
    ///
    /// # Errors
    ///
    /// Returns the first failure in task order (generator, inserter,
    /// monitor). All tasks are joined before the error is returned.
    pub fn join(mut self) -> PipelineResult<PipelineReport> {
        self.join_all()
    }

    /// Cancels and joins.
    ///
    /// # Errors
    ///
    /// See [`join`](Self::join).
    pub fn shutdown(self) -> PipelineResult<PipelineReport> {
        self.cancel();
        self.join()
    }

    fn join_all(&mut self) -> PipelineResult<PipelineReport> {
        let generated = join_task(TaskKind::Generator, self.generator.take());
        let inserted = join_task(TaskKind::Inserter, self.inserter.take());
        let monitor_ticks = join_task(TaskKind::Monitor, self.monitor.take());

        let report = PipelineReport {
            generated: generated?,
            inserted: inserted?,
            monitor_ticks: monitor_ticks?,
        };
        info!(
            generated = report.generated,
            inserted = report.inserted,
            monitor_ticks = report.monitor_ticks,
            "pipeline stopped"
        );
        Ok(report)
    }
}

impl Drop for PipelineHandle {
    fn drop(&mut self) {
        if self.generator.is_none() && self.inserter.is_none() && self.monitor.is_none() {
            return;
        }
        self.token.cancel();
        if let Err(err) = self.join_all() {
            error!(error = %err, "pipeline failed during drop");
        }
    }
}

/// Spawns a named task thread. A task that never started is marked stopped.
fn spawn<F>(
    task: TaskKind,
    states: &TaskStates,
    body: F,
) -> PipelineResult<JoinHandle<PipelineResult<u64>>>
where
    F: FnOnce() -> PipelineResult<u64> + Send + 'static,
{
    thread::Builder::new()
        .name(task.thread_name().to_string())
        .spawn(body)
        .map_err(|source| {
            states.advance(task, TaskState::Stopped);
            PipelineError::Spawn { task, source }
        })
}

fn join_task(
    task: TaskKind,
    handle: Option<JoinHandle<PipelineResult<u64>>>,
) -> PipelineResult<u64> {
    let Some(handle) = handle else {
        return Ok(0);
    };
    handle
        .join()
        .map_err(|_| PipelineError::TaskPanicked { task })?
}

fn run_generator(
    guard: &TaskGuard,
    token: &CancelToken,
    mut factory: EntityFactory,
    interval: Duration,
    handoff: &Sender<Entity>,
) -> PipelineResult<u64> {
    let ticker = tick(interval);
    let mut generated = 0u64;

    loop {
        select! {
            recv(token.receiver()) -> _ => break,
            recv(ticker) -> _ => {}
        }
        if token.is_cancelled() {
            break;
        }

        let entity = match factory.next_entity() {
            Ok(entity) => entity,
            Err(err) => {
                guard.fail(&err);
                return Err(err.into());
            }
        };
        let kind = entity.kind();

        select! {
            send(handoff, entity) -> res => {
                if res.is_err() {
                    warn!("inserter gone, generator stopping");
                    break;
                }
                generated += 1;
                trace!(kind = %kind, "entity handed off");
            }
            recv(token.receiver()) -> _ => break,
        }
    }

    guard.drain();
    debug!(generated, "generator draining");
    Ok(generated)
}

fn run_inserter(
    guard: &TaskGuard,
    token: &CancelToken,
    store: &EntityStore,
    handoff: &Receiver<Entity>,
) -> u64 {
    let mut inserted = 0u64;

    loop {
        select! {
            recv(handoff) -> msg => match msg {
                Ok(mut entity) => {
                    if token.is_cancelled() {
                        break;
                    }
                    store.insert_entity(&mut entity);
                    inserted += 1;
                }
                Err(_) => break,
            },
            recv(token.receiver()) -> _ => break,
        }
    }

    guard.drain();
    debug!(inserted, "inserter draining");
    inserted
}

fn run_monitor(
    guard: &TaskGuard,
    token: &CancelToken,
    mut monitor: Monitor,
    interval: Duration,
    events: Option<&Sender<MonitorEvent>>,
) -> u64 {
    let ticker = tick(interval);
    let mut ticks = 0u64;

    loop {
        select! {
            recv(token.receiver()) -> _ => break,
            recv(ticker) -> _ => {}
        }
        if token.is_cancelled() {
            break;
        }

        ticks += 1;
        for event in monitor.poll() {
            let Some(sender) = events else { continue };
            match sender.try_send(event) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => trace!("monitor event dropped, channel full"),
                Err(TrySendError::Disconnected(_)) => trace!("monitor event receiver gone"),
            }
        }
    }

    guard.drain();
    debug!(ticks, "monitor draining");
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use goban_model::ModelError;
    use goban_store::{EntityKind, SnapshotSink, StoreResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    /// Snapshot sink that panics on its `panic_at`-th save.
    struct PanickingSink {
        saves: AtomicUsize,
        panic_at: usize,
    }

    impl SnapshotSink for PanickingSink {
        fn save(&self, _kind: EntityKind, _entries: &[Entity]) -> StoreResult<()> {
            let n = self.saves.fetch_add(1, Ordering::SeqCst) + 1;
            if n == self.panic_at {
                panic!("snapshot sink failed on save {n}");
            }
            Ok(())
        }
    }

    fn fast_config() -> PipelineConfig {
        PipelineConfig::default()
            .with_generation_interval(Duration::from_millis(4))
            .with_monitor_interval(Duration::from_millis(2))
            .with_seed(1)
    }

    fn wait_until(limit: Duration, mut done: impl FnMut() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < limit {
            if done() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        done()
    }

    #[test]
    fn test_start_rejects_zero_interval() {
        let store = Arc::new(EntityStore::new());
        let result = start_pipeline(store, Duration::ZERO);
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn test_shutdown_report_matches_store() {
        let store = Arc::new(EntityStore::new());
        let handle = PipelineBuilder::new(Arc::clone(&store))
            .config(fast_config())
            .start()
            .unwrap();

        assert!(wait_until(Duration::from_secs(5), || store.counts().total() >= 10));
        let report = handle.shutdown().unwrap();

        assert_eq!(report.inserted as usize, store.counts().total());
        assert!(report.inserted <= report.generated);
        assert!(report.generated <= report.inserted + 1);

        let settled = store.counts();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(store.counts(), settled);
    }

    #[test]
    fn test_states_after_cancel() {
        let store = Arc::new(EntityStore::new());
        let handle = PipelineBuilder::new(store).config(fast_config()).start().unwrap();

        for task in TaskKind::ALL {
            assert_ne!(handle.task_state(task), TaskState::Stopped);
        }

        assert!(handle.cancel());
        assert!(!handle.cancel());
        assert!(wait_until(Duration::from_secs(5), || handle.is_finished()));
        handle.join().unwrap();
    }

    #[test]
    fn test_drop_cancels_and_joins() {
        let store = Arc::new(EntityStore::new());
        let handle = PipelineBuilder::new(Arc::clone(&store))
            .config(fast_config())
            .start()
            .unwrap();
        let token = handle.cancel_token();

        assert!(wait_until(Duration::from_secs(5), || store.counts().total() > 0));
        drop(handle);

        assert!(token.is_cancelled());
        let settled = store.counts();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(store.counts(), settled);
    }

    #[test]
    fn test_monitor_events_forwarded() {
        let store = Arc::new(EntityStore::new());
        let (tx, rx) = unbounded();
        let handle = PipelineBuilder::new(Arc::clone(&store))
            .config(fast_config())
            .monitor_events(tx)
            .start()
            .unwrap();

        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(event.delta > 0);
        assert!(event.total >= event.delta);

        let report = handle.shutdown().unwrap();
        assert!(report.monitor_ticks > 0);
    }

    #[test]
    fn test_generator_failure_stops_siblings() {
        let store = Arc::new(EntityStore::new());
        let mut config = fast_config();
        config.board_size = 0;

        let handle = PipelineBuilder::new(Arc::clone(&store))
            .config(config)
            .launch()
            .unwrap();

        assert!(wait_until(Duration::from_secs(5), || handle.is_cancelled()));
        let result = handle.join();
        assert!(matches!(
            result,
            Err(PipelineError::Model(ModelError::InvalidArgument(_)))
        ));
        assert_eq!(store.count(EntityKind::Board), 0);
    }

    #[test]
    fn test_inserter_panic_reaches_join() {
        let sink = Arc::new(PanickingSink {
            saves: AtomicUsize::new(0),
            panic_at: 3,
        });
        let store = Arc::new(EntityStore::with_sink(sink));
        let handle = PipelineBuilder::new(Arc::clone(&store))
            .config(fast_config())
            .start()
            .unwrap();

        assert!(wait_until(Duration::from_secs(5), || handle.is_cancelled()));
        assert!(wait_until(Duration::from_secs(5), || handle.is_finished()));
        for task in TaskKind::ALL {
            assert_eq!(handle.task_state(task), TaskState::Stopped);
        }

        let result = handle.join();
        assert!(matches!(
            result,
            Err(PipelineError::TaskPanicked { task: TaskKind::Inserter })
        ));
        assert_eq!(store.counts().total(), 3);

        // The store lock survives the panic.
        assert_eq!(store.get_all(EntityKind::Player).len(), store.count(EntityKind::Player));
    }
}
