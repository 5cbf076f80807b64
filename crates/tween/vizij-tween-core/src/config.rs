//! Core configuration for vizij-tween-core.

use serde::{Deserialize, Serialize};

use crate::easing::EaseType;

/// Engine sizing, request defaults and diagnostic toggles.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial capacity hint for the tween slot list.
    pub initial_capacity: usize,

    /// Maximum events surfaced per tick; the rest are dropped with a warning.
    pub max_events_per_tick: usize,

    /// Defaults used by `TweenEngine::new_request`.
    pub default_duration: f32,
    pub default_ease: EaseType,
    pub default_punch_amplitude: f32,
    pub default_cull_delay: f32,

    /// Surface debug-level diagnostics as `CoreEvent::Diagnostic`.
    pub debug_messages: bool,
    /// Surface warnings and errors as `CoreEvent::Diagnostic`.
    pub error_messages: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
            max_events_per_tick: 1024,
            default_duration: 1.0,
            default_ease: EaseType::Linear,
            default_punch_amplitude: 1.0,
            default_cull_delay: 3.0,
            debug_messages: false,
            error_messages: true,
        }
    }
}
