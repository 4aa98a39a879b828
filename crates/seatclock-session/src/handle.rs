//! The caller side of a session: commands, replies and events.

use seatclock_core::{ClockConfig, GameState, Notice, PlayerId, RenameDraft};
use tokio::sync::{mpsc, oneshot};

use crate::SessionError;

/// Pushed to every subscriber as the session runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ClockEvent {
    /// The game state after a change (including ticks).
    State(GameState),
    /// Something the table should be told about.
    Notice(Notice),
}

/// Result of a clock operation sent through a [`ClockHandle`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClockReply {
    /// State after the operation, whether or not it changed anything.
    pub state: GameState,
    /// `false` when the operation was a guarded no-op.
    pub changed: bool,
    pub notice: Option<Notice>,
}

/// A clock operation, applied by the actor to its state machine.
#[derive(Debug, Clone)]
pub(crate) enum Intent {
    ToggleRunning,
    PressSeat(usize),
    AdvanceTurn(usize),
    ResumeFromPause(usize),
    AddTime { id: PlayerId, delta: i64 },
    ToggleElimination(PlayerId),
    Reorder { from: usize, to: usize },
    RenameAll(RenameDraft),
    NewGame,
    Undo,
}

/// Commands sent to the session actor through its channel.
pub(crate) enum ClockCommand {
    Apply {
        intent: Intent,
        reply: oneshot::Sender<ClockReply>,
    },
    GetState {
        reply: oneshot::Sender<GameState>,
    },
    GetConfig {
        reply: oneshot::Sender<ClockConfig>,
    },
    GetRenameDraft {
        reply: oneshot::Sender<RenameDraft>,
    },
    Reconfigure {
        config: ClockConfig,
        reply: oneshot::Sender<Result<ClockReply, SessionError>>,
    },
    Subscribe {
        reply: oneshot::Sender<mpsc::UnboundedReceiver<ClockEvent>>,
    },
    /// Forget the game (not the configuration) and stop.
    Exit {
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Shutdown,
}

/// Handle to a running clock session.
///
/// Cheap to clone; every clone talks to the same actor. Once the session
/// has stopped every call returns [`SessionError::Unavailable`].
#[derive(Debug, Clone)]
pub struct ClockHandle {
    sender: mpsc::Sender<ClockCommand>,
}

impl ClockHandle {
    pub(crate) fn new(sender: mpsc::Sender<ClockCommand>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> ClockCommand,
    ) -> Result<T, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(build(reply_tx))
            .await
            .map_err(|_| SessionError::Unavailable)?;
        reply_rx.await.map_err(|_| SessionError::Unavailable)
    }

    async fn apply(&self, intent: Intent) -> Result<ClockReply, SessionError> {
        self.request(|reply| ClockCommand::Apply { intent, reply })
            .await
    }

    /// Current game state.
    pub async fn state(&self) -> Result<GameState, SessionError> {
        self.request(|reply| ClockCommand::GetState { reply }).await
    }

    /// Configuration the current game was built from.
    pub async fn config(&self) -> Result<ClockConfig, SessionError> {
        self.request(|reply| ClockCommand::GetConfig { reply }).await
    }

    /// A draft holding every seat's current name, ready for editing and
    /// [`rename_all`](Self::rename_all).
    pub async fn rename_draft(&self) -> Result<RenameDraft, SessionError> {
        self.request(|reply| ClockCommand::GetRenameDraft { reply })
            .await
    }

    pub async fn toggle_running(&self) -> Result<ClockReply, SessionError> {
        self.apply(Intent::ToggleRunning).await
    }

    /// A tap on a seat: passes the turn while running, resumes while
    /// paused.
    pub async fn press_seat(&self, seat: usize) -> Result<ClockReply, SessionError> {
        self.apply(Intent::PressSeat(seat)).await
    }

    pub async fn advance_turn(&self, seat: usize) -> Result<ClockReply, SessionError> {
        self.apply(Intent::AdvanceTurn(seat)).await
    }

    pub async fn resume_from_pause(&self, seat: usize) -> Result<ClockReply, SessionError> {
        self.apply(Intent::ResumeFromPause(seat)).await
    }

    /// Adds `delta` seconds (negative to take time away).
    pub async fn add_time(&self, id: PlayerId, delta: i64) -> Result<ClockReply, SessionError> {
        self.apply(Intent::AddTime { id, delta }).await
    }

    pub async fn toggle_elimination(&self, id: PlayerId) -> Result<ClockReply, SessionError> {
        self.apply(Intent::ToggleElimination(id)).await
    }

    pub async fn reorder(&self, from: usize, to: usize) -> Result<ClockReply, SessionError> {
        self.apply(Intent::Reorder { from, to }).await
    }

    pub async fn rename_all(&self, draft: RenameDraft) -> Result<ClockReply, SessionError> {
        self.apply(Intent::RenameAll(draft)).await
    }

    /// Starts over with the same table, following the session policy on
    /// eliminated seats. Clears the undo history.
    pub async fn new_game(&self) -> Result<ClockReply, SessionError> {
        self.apply(Intent::NewGame).await
    }

    pub async fn undo(&self) -> Result<ClockReply, SessionError> {
        self.apply(Intent::Undo).await
    }

    /// Replaces the configuration and starts a fresh game from it. The
    /// new configuration is written to the store.
    pub async fn reconfigure(&self, config: ClockConfig) -> Result<ClockReply, SessionError> {
        self.request(|reply| ClockCommand::Reconfigure { config, reply })
            .await?
    }

    /// Subscribes to clock events. The current state is delivered first.
    pub async fn subscribe(&self) -> Result<mpsc::UnboundedReceiver<ClockEvent>, SessionError> {
        self.request(|reply| ClockCommand::Subscribe { reply }).await
    }

    /// Deletes the stored game (keeping the configuration) and stops the
    /// session.
    pub async fn exit(&self) -> Result<(), SessionError> {
        self.request(|reply| ClockCommand::Exit { reply }).await?
    }

    /// Stops the session. The stored game is kept for the next open.
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.sender
            .send(ClockCommand::Shutdown)
            .await
            .map_err(|_| SessionError::Unavailable)
    }
}
