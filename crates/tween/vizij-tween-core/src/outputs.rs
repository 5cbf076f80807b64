//! Output contracts from the tween engine.
//!
//! Outputs carry the values applied this tick (already written through the
//! host) and a separate list of semantic events. Adapters may mirror changes
//! elsewhere and transport events.

use serde::{Deserialize, Serialize};

use crate::binding::{TargetProperty, TweenTarget};
use crate::ids::{TargetId, TweenId};
use crate::value::Value;

/// One value applied by a tween this tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub tween: TweenId,
    pub target: TweenTarget,
    pub property: TargetProperty,
    pub value: Value,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticLevel {
    Debug,
    Warning,
    Error,
}

/// Discrete lifecycle signals emitted during stepping and bulk operations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CoreEvent {
    TweenStarted {
        tween: TweenId,
        tag: Option<String>,
    },
    TweenLooped {
        tween: TweenId,
        iteration: u32,
    },
    TweenCompleted {
        tween: TweenId,
    },
    TweenStopped {
        tween: TweenId,
    },
    TweenPaused {
        tween: TweenId,
    },
    TweenResumed {
        tween: TweenId,
    },
    TweenRestarted {
        tween: TweenId,
    },
    /// Tween was terminated because its target went away.
    TargetInvalidated {
        tween: TweenId,
        target: TargetId,
    },
    /// Tween stopped advancing because its target has not been rendered.
    TweenCulled {
        tween: TweenId,
    },
    Diagnostic {
        level: DiagnosticLevel,
        message: String,
    },
}

/// Outputs returned by TweenEngine::update().
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub events: Vec<CoreEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }
}
