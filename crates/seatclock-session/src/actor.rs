//! Session actor: the one task that owns the clock.
//!
//! Commands arrive over an mpsc channel and ticks over the tick source;
//! a single `select!` loop takes whichever is ready, applies it to the
//! state machine, then writes, broadcasts and re-syncs the timer and
//! wake lock before looking at the next one.

use seatclock_core::{ClockConfig, ClockStateMachine, GameState, Outcome};
use seatclock_store::{Codec, JsonCodec, KeyValueStore};
use seatclock_tick::TickSource;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace, warn};

use crate::handle::{ClockCommand, Intent};
use crate::{ClockEvent, ClockHandle, ClockReply, SessionConfig, SessionError, WakeLock};

/// Entry point for starting a clock session.
pub struct ClockSession;

impl ClockSession {
    /// Loads the clock from `store` and spawns its actor.
    ///
    /// The configuration comes from the store, or from `fallback` (which
    /// is then written back) when nothing usable is stored. A stored game
    /// is resumed as it was saved, provided it is well-formed and matches
    /// the configuration; otherwise a fresh game is started.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// [`SessionError::MissingConfig`] when neither a stored nor a
    /// fallback configuration exists, [`SessionError::Config`] when the
    /// configuration is invalid, [`SessionError::Store`] when the store
    /// can't be read. A stored configuration that can't be decoded or
    /// validated is only an error when there is no fallback.
    pub fn open<S, T, W>(
        mut store: S,
        ticker: T,
        wake_lock: W,
        session_config: SessionConfig,
        fallback: Option<ClockConfig>,
    ) -> Result<ClockHandle, SessionError>
    where
        S: KeyValueStore,
        T: TickSource,
        W: WakeLock,
    {
        let codec = JsonCodec;

        let key = &session_config.config_key;
        let stored = match store.get(key)? {
            Some(bytes) => match read_config(&codec, &bytes) {
                Ok(config) => Some(config),
                Err(e) if fallback.is_some() => {
                    warn!(%key, error = %e, "stored clock config is unusable, using fallback");
                    None
                }
                Err(e) => return Err(e),
            },
            None => None,
        };
        let config = match stored {
            Some(config) => config,
            None => {
                let config = fallback
                    .ok_or_else(|| SessionError::MissingConfig(key.clone()))?
                    .validated()?;
                store.set(key, &codec.encode(&config)?)?;
                debug!(%key, "stored fallback clock config");
                config
            }
        };

        let machine = match load_state(&store, &codec, &session_config.state_key, &config) {
            Some(state) => {
                info!(
                    seats = state.players.len(),
                    running = state.running,
                    "resuming stored game"
                );
                ClockStateMachine::restore(config, session_config.policy, state)
            }
            None => ClockStateMachine::new(config, session_config.policy),
        };

        let (tx, rx) = mpsc::channel(session_config.channel_size.max(1));
        let mut actor = ClockActor {
            machine,
            store,
            codec,
            ticker,
            wake_lock,
            wake_held: false,
            subscribers: Vec::new(),
            session_config,
            receiver: rx,
        };
        actor.persist_state();
        actor.sync_running();

        tokio::spawn(actor.run());

        Ok(ClockHandle::new(tx))
    }
}

fn read_config(codec: &JsonCodec, bytes: &[u8]) -> Result<ClockConfig, SessionError> {
    Ok(codec.decode::<ClockConfig>(bytes)?.validated()?)
}

/// Reads the stored game, or `None` when it is missing or unusable.
fn load_state<S: KeyValueStore>(
    store: &S,
    codec: &JsonCodec,
    key: &str,
    config: &ClockConfig,
) -> Option<GameState> {
    let bytes = match store.get(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return None,
        Err(e) => {
            warn!(%key, error = %e, "could not read stored game, starting fresh");
            return None;
        }
    };
    let state: GameState = match codec.decode(&bytes) {
        Ok(state) => state,
        Err(e) => {
            warn!(%key, error = %e, "stored game is unreadable, starting fresh");
            return None;
        }
    };
    if let Err(violation) = state.check_invariants() {
        warn!(%key, %violation, "stored game is inconsistent, starting fresh");
        return None;
    }
    if state.players.len() != config.seat_count {
        warn!(
            %key,
            stored = state.players.len(),
            configured = config.seat_count,
            "stored game has a different seat count, starting fresh"
        );
        return None;
    }
    Some(state)
}

struct ClockActor<S, T, W> {
    machine: ClockStateMachine,
    store: S,
    codec: JsonCodec,
    ticker: T,
    wake_lock: W,
    wake_held: bool,
    subscribers: Vec<mpsc::UnboundedSender<ClockEvent>>,
    session_config: SessionConfig,
    receiver: mpsc::Receiver<ClockCommand>,
}

impl<S, T, W> ClockActor<S, T, W>
where
    S: KeyValueStore,
    T: TickSource,
    W: WakeLock,
{
    async fn run(mut self) {
        info!(
            seats = self.machine.config().seat_count,
            "clock session started"
        );

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else {
                        debug!("every clock handle dropped");
                        break;
                    };
                    if !self.handle_command(cmd) {
                        break;
                    }
                }
                info = self.ticker.next_tick() => {
                    if info.ticks_skipped > 0 {
                        warn!(tick = info.tick, skipped = info.ticks_skipped, "clock lost ticks");
                    }
                    let outcome = self.machine.tick();
                    trace!(tick = info.tick, changed = outcome.changed, "tick applied");
                    self.after(outcome);
                }
            }
        }

        self.ticker.stop();
        self.release_wake_lock();
        info!("clock session stopped");
    }

    /// Returns `false` when the session should stop.
    fn handle_command(&mut self, cmd: ClockCommand) -> bool {
        match cmd {
            ClockCommand::Apply { intent, reply } => {
                let reply_value = self.apply(intent);
                let _ = reply.send(reply_value);
            }
            ClockCommand::GetState { reply } => {
                let _ = reply.send(self.machine.state().clone());
            }
            ClockCommand::GetConfig { reply } => {
                let _ = reply.send(*self.machine.config());
            }
            ClockCommand::GetRenameDraft { reply } => {
                let _ = reply.send(self.machine.rename_draft());
            }
            ClockCommand::Reconfigure { config, reply } => {
                let result = self.reconfigure(config);
                let _ = reply.send(result);
            }
            ClockCommand::Subscribe { reply } => {
                self.subscribe(reply);
            }
            ClockCommand::Exit { reply } => {
                self.ticker.stop();
                self.release_wake_lock();
                let result = self
                    .store
                    .delete(&self.session_config.state_key)
                    .map_err(SessionError::from);
                info!(ok = result.is_ok(), "clock session exiting");
                let _ = reply.send(result);
                return false;
            }
            ClockCommand::Shutdown => {
                info!("clock session shutting down");
                return false;
            }
        }
        true
    }

    fn apply(&mut self, intent: Intent) -> ClockReply {
        debug!(?intent, "applying intent");
        let machine = &mut self.machine;
        let outcome = match intent {
            Intent::ToggleRunning => machine.toggle_running(),
            Intent::PressSeat(seat) => machine.press_seat(seat),
            Intent::AdvanceTurn(seat) => machine.advance_turn(seat),
            Intent::ResumeFromPause(seat) => machine.resume_from_pause(seat),
            Intent::AddTime { id, delta } => machine.add_time(id, delta),
            Intent::ToggleElimination(id) => machine.toggle_elimination(id),
            Intent::Reorder { from, to } => machine.reorder(from, to),
            Intent::RenameAll(draft) => machine.rename_all(&draft),
            Intent::NewGame => machine.new_game_with_policy(),
            Intent::Undo => machine.undo(),
        };
        self.after(outcome);
        self.reply(outcome)
    }

    fn reconfigure(&mut self, config: ClockConfig) -> Result<ClockReply, SessionError> {
        let config = config.validated()?;
        let bytes = self.codec.encode(&config)?;
        self.store.set(&self.session_config.config_key, &bytes)?;
        info!(
            seats = config.seat_count,
            seconds = config.seconds_per_seat,
            increment = config.increment_seconds,
            "clock reconfigured"
        );
        self.machine = ClockStateMachine::new(config, self.session_config.policy);
        let outcome = Outcome::changed();
        self.after(outcome);
        Ok(self.reply(outcome))
    }

    fn subscribe(&mut self, reply: oneshot::Sender<mpsc::UnboundedReceiver<ClockEvent>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(ClockEvent::State(self.machine.state().clone()));
        if reply.send(rx).is_ok() {
            self.subscribers.push(tx);
            debug!(subscribers = self.subscribers.len(), "subscriber added");
        }
    }

    /// Persist, publish and re-sync after anything touched the machine.
    fn after(&mut self, outcome: Outcome) {
        if outcome.changed {
            self.persist_state();
            self.broadcast(ClockEvent::State(self.machine.state().clone()));
        }
        if let Some(notice) = outcome.notice {
            info!(?notice, "clock notice");
            self.broadcast(ClockEvent::Notice(notice));
        }
        self.sync_running();
    }

    fn reply(&self, outcome: Outcome) -> ClockReply {
        ClockReply {
            state: self.machine.state().clone(),
            changed: outcome.changed,
            notice: outcome.notice,
        }
    }

    /// Store failures are logged; the clock keeps running on what it has
    /// in memory.
    fn persist_state(&mut self) {
        let key = &self.session_config.state_key;
        let result = self
            .codec
            .encode(self.machine.state())
            .and_then(|bytes| self.store.set(key, &bytes));
        if let Err(e) = result {
            warn!(%key, error = %e, "failed to persist game state");
        }
    }

    /// Drops subscribers whose receiver is gone.
    fn broadcast(&mut self, event: ClockEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Keeps the timer and wake lock in lockstep with `running`.
    fn sync_running(&mut self) {
        if self.machine.is_running() {
            if !self.ticker.is_running() {
                self.ticker.start();
            }
            if !self.wake_held {
                self.wake_lock.acquire();
                self.wake_held = true;
                debug!("wake lock acquired");
            }
        } else {
            if self.ticker.is_running() {
                self.ticker.stop();
            }
            self.release_wake_lock();
        }
    }

    fn release_wake_lock(&mut self) {
        if self.wake_held {
            self.wake_lock.release();
            self.wake_held = false;
            debug!("wake lock released");
        }
    }
}
