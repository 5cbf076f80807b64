//! Lifecycle callbacks.
//!
//! A [`Callback`] is either a bound closure that receives the engine itself, or
//! a `(receiver, function name)` pair resolved by the host through
//! [`CallbackInvoker`]. Missing receivers or functions are reported as
//! [`CallbackError`] and downgraded to diagnostics by the engine.

use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::engine::TweenEngine;
use crate::ids::{TargetId, TweenId};
use crate::value::Value;

/// Lifecycle point a callback is attached to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hook {
    Start,
    Update,
    Loop,
    Complete,
}

/// Payload handed to every callback.
#[derive(Clone, Debug, PartialEq)]
pub struct CallbackArgs {
    pub tween: TweenId,
    pub tag: Option<String>,
    pub hook: Hook,
    /// Value applied this step (update), or last applied value.
    pub value: Option<Value>,
    pub progress: f32,
    pub iteration: u32,
}

pub type CallbackFn = dyn Fn(&mut TweenEngine, &CallbackArgs) + Send + Sync;

#[derive(Clone)]
pub enum Callback {
    /// Runs immediately with mutable access to the engine.
    Closure(Arc<CallbackFn>),
    /// Resolved by the host; queued until a host is available.
    Named { receiver: TargetId, function: String },
}

impl Callback {
    pub fn closure<F>(f: F) -> Self
    where
        F: Fn(&mut TweenEngine, &CallbackArgs) + Send + Sync + 'static,
    {
        Callback::Closure(Arc::new(f))
    }

    pub fn named(receiver: TargetId, function: impl Into<String>) -> Self {
        Callback::Named {
            receiver,
            function: function.into(),
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Closure(_) => f.write_str("Closure(..)"),
            Callback::Named { receiver, function } => f
                .debug_struct("Named")
                .field("receiver", receiver)
                .field("function", function)
                .finish(),
        }
    }
}

/// Callbacks per lifecycle point.
#[derive(Clone, Debug, Default)]
pub struct Hooks {
    pub start: Vec<Callback>,
    pub update: Vec<Callback>,
    pub looped: Vec<Callback>,
    pub complete: Vec<Callback>,
}

impl Hooks {
    pub fn on(mut self, hook: Hook, callback: Callback) -> Self {
        self.push(hook, callback);
        self
    }

    pub fn push(&mut self, hook: Hook, callback: Callback) {
        match hook {
            Hook::Start => self.start.push(callback),
            Hook::Update => self.update.push(callback),
            Hook::Loop => self.looped.push(callback),
            Hook::Complete => self.complete.push(callback),
        }
    }

    pub fn for_hook(&self, hook: Hook) -> &[Callback] {
        match hook {
            Hook::Start => &self.start,
            Hook::Update => &self.update,
            Hook::Loop => &self.looped,
            Hook::Complete => &self.complete,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_empty()
            && self.update.is_empty()
            && self.looped.is_empty()
            && self.complete.is_empty()
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CallbackError {
    #[error("Callback receiver {receiver:?} no longer exists")]
    ReceiverMissing { receiver: TargetId },

    #[error("Callback function '{function}' not found on {receiver:?}")]
    FunctionMissing { receiver: TargetId, function: String },
}

/// Dynamic dispatch of named callbacks.
pub trait CallbackInvoker {
    fn invoke(
        &mut self,
        receiver: TargetId,
        function: &str,
        args: &CallbackArgs,
    ) -> Result<(), CallbackError>;
}

impl CallbackInvoker for crate::binding::NullHost {
    fn invoke(
        &mut self,
        receiver: TargetId,
        _function: &str,
        _args: &CallbackArgs,
    ) -> Result<(), CallbackError> {
        Err(CallbackError::ReceiverMissing { receiver })
    }
}

type Handler<C> = Arc<dyn Fn(&mut C, &CallbackArgs) + Send + Sync>;

/// Host-side table of named handlers, keyed by receiver then function name.
/// `C` is whatever context the host hands to its handlers.
pub struct CallbackTable<C> {
    receivers: HashMap<TargetId, HashMap<String, Handler<C>>>,
}

impl<C> Default for CallbackTable<C> {
    fn default() -> Self {
        Self {
            receivers: HashMap::new(),
        }
    }
}

impl<C> fmt::Debug for CallbackTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackTable")
            .field("receivers", &self.receivers.len())
            .finish()
    }
}

impl<C> CallbackTable<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, receiver: TargetId, function: impl Into<String>, handler: F)
    where
        F: Fn(&mut C, &CallbackArgs) + Send + Sync + 'static,
    {
        self.receivers
            .entry(receiver)
            .or_default()
            .insert(function.into(), Arc::new(handler));
    }

    /// Drop every handler of a receiver (e.g. when it is despawned).
    pub fn remove_receiver(&mut self, receiver: TargetId) -> bool {
        self.receivers.remove(&receiver).is_some()
    }

    pub fn contains(&self, receiver: TargetId, function: &str) -> bool {
        self.receivers
            .get(&receiver)
            .is_some_and(|fns| fns.contains_key(function))
    }

    pub fn invoke(
        &self,
        ctx: &mut C,
        receiver: TargetId,
        function: &str,
        args: &CallbackArgs,
    ) -> Result<(), CallbackError> {
        let fns = self
            .receivers
            .get(&receiver)
            .ok_or(CallbackError::ReceiverMissing { receiver })?;
        let handler = fns
            .get(function)
            .ok_or_else(|| CallbackError::FunctionMissing {
                receiver,
                function: function.to_string(),
            })?;
        handler(ctx, args);
        Ok(())
    }
}
