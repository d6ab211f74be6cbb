//! Interval-driven data pollers. Each poller is a single spawned task that
//! exclusively owns one slice of view state; reads go through a watch
//! channel and manual refetches are serialized through a command channel,
//! so "last write wins" is an explicit policy rather than a scheduling
//! accident. A generation counter prevents a slow in-flight poll from
//! clobbering the result of a later manual refetch.

use crate::api::TransportError;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, warn};

type FetchFuture<T> = Pin<Box<dyn Future<Output = Result<T, TransportError>> + Send>>;
type FetchFn<T> = Box<dyn Fn() -> FetchFuture<T> + Send + Sync>;

/// Snapshot of one poller's state. Failure never blanks previously held
/// data; stale-but-present is preferred over empty.
#[derive(Debug, Clone)]
pub struct PollerState<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub is_online: bool,
    pub last_error: Option<String>,
}

impl<T> Default for PollerState<T> {
    fn default() -> Self {
        Self { data: None, is_loading: true, is_online: false, last_error: None }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PollerConfig {
    /// Time between automatic polls.
    pub refresh_interval: Duration,
    /// When false, neither the initial fetch nor the interval runs; only
    /// explicit `refetch` calls hit the backend.
    pub enabled: bool,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self { refresh_interval: Duration::from_millis(crate::config::REQUEST_POLL_MILLIS), enabled: true }
    }
}

impl PollerConfig {
    pub fn every(refresh_interval: Duration) -> Self {
        Self { refresh_interval, enabled: true }
    }

    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }
}

enum Command {
    Refetch(oneshot::Sender<()>),
}

/// Handle to a spawned poller. Cheap to clone; the owning task exits once
/// every handle has been dropped.
pub struct Poller<T> {
    state: watch::Receiver<PollerState<T>>,
    commands: mpsc::Sender<Command>,
    generation: Arc<AtomicU64>,
}

impl<T> Clone for Poller<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            commands: self.commands.clone(),
            generation: self.generation.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Poller<T> {
    /// Spawns the owning task. With `enabled`, the first fetch happens
    /// immediately and then on every interval tick.
    pub fn spawn<F, Fut>(config: PollerConfig, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, TransportError>> + Send + 'static,
    {
        let (state_tx, state_rx) = watch::channel(PollerState::default());
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let generation = Arc::new(AtomicU64::new(0));
        let fetch: FetchFn<T> = Box::new(move || Box::pin(fetch()));

        tokio::spawn(run(config, fetch, state_tx, cmd_rx, generation.clone()));

        Self { state: state_rx, commands: cmd_tx, generation }
    }

    pub fn state(&self) -> PollerState<T> {
        self.state.borrow().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.state.borrow().data.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn is_online(&self) -> bool {
        self.state.borrow().is_online
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.borrow().last_error.clone()
    }

    /// Watch-channel receiver for callers that want to await changes.
    pub fn subscribe(&self) -> watch::Receiver<PollerState<T>> {
        self.state.clone()
    }

    /// Runs one fetch cycle immediately, independent of the interval
    /// timer, and waits for it to complete. Bumping the generation first
    /// guarantees that any poll already in flight cannot overwrite the
    /// fresher result.
    pub async fn refetch(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.commands.send(Command::Refetch(ack_tx)).await.is_ok() {
            let _ = ack_rx.await;
        }
    }
}

async fn run<T: Clone>(
    config: PollerConfig,
    fetch: FetchFn<T>,
    state: watch::Sender<PollerState<T>>,
    mut commands: mpsc::Receiver<Command>,
    generation: Arc<AtomicU64>,
) {
    let mut ticker = config.enabled.then(|| {
        let mut ticker = interval(config.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    });

    loop {
        tokio::select! {
            // a pending manual refetch takes priority over a due tick
            biased;
            command = commands.recv() => match command {
                Some(Command::Refetch(ack)) => {
                    run_cycle(&fetch, &state, &generation).await;
                    let _ = ack.send(());
                }
                // every handle dropped; stop polling
                None => break,
            },
            _ = tick(&mut ticker) => {
                run_cycle(&fetch, &state, &generation).await;
            }
        }
    }
}

async fn tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn run_cycle<T: Clone>(
    fetch: &FetchFn<T>,
    state: &watch::Sender<PollerState<T>>,
    generation: &AtomicU64,
) {
    let started = generation.load(Ordering::SeqCst);
    let result = fetch().await;
    if generation.load(Ordering::SeqCst) != started {
        // a refetch was requested while this poll was in flight; its
        // result supersedes ours
        debug!("discarding superseded poll result");
        return;
    }

    match result {
        Ok(data) => state.send_modify(|s| {
            s.data = Some(data);
            s.last_error = None;
            s.is_online = true;
            s.is_loading = false;
        }),
        Err(e) => {
            warn!("poll failed: {e}");
            state.send_modify(|s| {
                s.last_error = Some(e.to_string());
                s.is_online = false;
                s.is_loading = false;
            });
        }
    }
}
