//! Pointer gestures on board cards. Both the drag path and the per-card menu
//! end in `UiAction::MoveTask`, so column changes have one entry point.

use crate::action::UiAction;
use crate::error::AppError;
use crate::model::Progress;

/// A press must be held this long before it turns into a drag.
pub const HOLD_THRESHOLD_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Pressed {
        task_id: u64,
        since_ms: u64,
    },
    Armed {
        task_id: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Move { task_id: u64, to: Progress },
    OpenDetail { task_id: u64 },
}

impl Gesture {
    /// The state change this gesture asks for; opening the detail view is
    /// read-only and yields nothing.
    pub fn action(self) -> Option<UiAction> {
        match self {
            Self::Move { task_id, to } => Some(UiAction::MoveTask { id: task_id, to }),
            Self::OpenDetail { .. } => None,
        }
    }
}

/// Press/hold/release tracking for one pointer. Timestamps are supplied by the
/// caller in milliseconds.
#[derive(Debug, Default)]
pub struct DragTracker {
    state: DragState,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn press(&mut self, task_id: u64, now_ms: u64) {
        self.state = DragState::Pressed {
            task_id,
            since_ms: now_ms,
        };
    }

    /// Arms the drag once the hold threshold has passed. Returns whether drag
    /// mode is active.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if let DragState::Pressed { task_id, since_ms } = self.state
            && now_ms.saturating_sub(since_ms) >= HOLD_THRESHOLD_MS
        {
            self.state = DragState::Armed { task_id };
        }
        self.is_armed()
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, DragState::Armed { .. })
    }

    /// Columns showing a drop placeholder: all of them while armed.
    pub fn drop_targets(&self) -> Vec<Progress> {
        if self.is_armed() {
            Progress::ALL.to_vec()
        } else {
            Vec::new()
        }
    }

    /// Ends the gesture. `over` is the placeholder column under the pointer,
    /// if any. A release without an active press yields nothing.
    pub fn release(&mut self, over: Option<Progress>, now_ms: u64) -> Option<Gesture> {
        self.tick(now_ms);
        let gesture = match (self.state, over) {
            (DragState::Idle, _) => None,
            (DragState::Armed { task_id }, Some(to)) => Some(Gesture::Move { task_id, to }),
            (DragState::Armed { task_id }, None) | (DragState::Pressed { task_id, .. }, _) => {
                Some(Gesture::OpenDetail { task_id })
            }
        };
        self.state = DragState::Idle;
        gesture
    }

    /// Pointer left the card: the gesture is dropped without any action.
    pub fn leave(&mut self) {
        self.state = DragState::Idle;
    }
}

/// Columns listed in a card's move menu: every column except the current one.
pub fn menu_targets(current: Progress) -> Vec<Progress> {
    current.others()
}

pub fn menu_select(task_id: u64, current: Progress, choice: Progress) -> Result<UiAction, AppError> {
    if !menu_targets(current).contains(&choice) {
        return Err(AppError::invalid_input(format!(
            "task is already in {choice}"
        )));
    }
    Ok(UiAction::MoveTask { id: task_id, to: choice })
}
