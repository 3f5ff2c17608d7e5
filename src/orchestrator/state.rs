//! Action lifecycle

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of one user action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionState {
    Idle,
    Validating,
    Building,
    Signing,
    Submitting,
    Success,
    Failed,
}

impl ActionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ActionState::Success | ActionState::Failed)
    }

    /// Forward transitions; any non-terminal state may fail.
    /// `Submitting` loops back to `Building` when an action sends
    /// several transactions.
    pub fn can_transition_to(&self, next: ActionState) -> bool {
        use ActionState::*;

        match (self, next) {
            (s, Failed) => !s.is_terminal(),
            (Idle, Validating)
            | (Validating, Building)
            | (Validating, Success)
            | (Building, Signing)
            | (Signing, Submitting)
            | (Submitting, Building)
            | (Submitting, Success) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The states one action went through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionTrail {
    states: Vec<ActionState>,
}

impl ActionTrail {
    pub fn new() -> Self {
        Self {
            states: vec![ActionState::Idle],
        }
    }

    pub fn current(&self) -> ActionState {
        self.states
            .last()
            .copied()
            .unwrap_or(ActionState::Idle)
    }

    /// Move to `next`; illegal transitions are logged and ignored
    pub fn advance(&mut self, next: ActionState) {
        let current = self.current();
        if current.can_transition_to(next) {
            log::debug!("Action state {} -> {}", current, next);
            self.states.push(next);
        } else {
            log::warn!("Ignoring illegal action transition {} -> {}", current, next);
        }
    }

    pub fn states(&self) -> &[ActionState] {
        &self.states
    }
}

impl Default for ActionTrail {
    fn default() -> Self {
        Self::new()
    }
}
