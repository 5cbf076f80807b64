//! TweenEngine: the tween registry and per-tick driver.
//!
//! Methods:
//! - create / initialize / spawn, get, request_mut, remove
//! - update (advance every live tween once, in slot order)
//! - find_by_target / find_by_target_name / find_by_tag / all / select
//! - stop / pause / resume / restart and their `_all` bulk variants
//!
//! Target names are not cached: `Selector::TargetName` asks the directory
//! passed to the query for each candidate's current display name.
//!
//! Slots are append-only; a removed tween leaves `None` behind so ids held by
//! callers never alias a newer tween. Bulk operations snapshot the matching ids
//! before mutating, and callbacks only run once the tween that fired them is
//! back in its slot, so callbacks may freely create, stop or remove tweens.

use serde::{Deserialize, Serialize};

use crate::binding::{TargetDirectory, TweenHost};
use crate::callback::{Callback, CallbackArgs};
use crate::config::Config;
use crate::error::TweenError;
use crate::event::{StepSink, TweenEvent};
use crate::ids::{IdAllocator, TargetId, TweenId};
use crate::outputs::{CoreEvent, DiagnosticLevel, Outputs};
use crate::params::ParamReport;
use crate::request::TweenRequest;

/// Which tweens a bulk operation applies to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    All,
    Tween(TweenId),
    Target(TargetId),
    /// Display name of the bound target, as the directory reports it now.
    TargetName(String),
    Tag(String),
}

impl Selector {
    fn matches(&self, ev: &TweenEvent, directory: &dyn TargetDirectory) -> bool {
        match self {
            Selector::All => true,
            Selector::Tween(id) => ev.id() == *id,
            Selector::Target(target) => ev.target().id() == Some(*target),
            Selector::TargetName(name) => ev
                .target()
                .id()
                .and_then(|id| directory.display_name(id))
                .is_some_and(|n| n == *name),
            Selector::Tag(tag) => ev.tag() == Some(tag.as_str()),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    #[default]
    AllMatching,
    /// Only the lowest-index match.
    FirstMatch,
}

type PendingCall = (Callback, CallbackArgs);

#[derive(Debug)]
pub struct TweenEngine {
    cfg: Config,
    ids: IdAllocator,
    slots: Vec<Option<TweenEvent>>,

    // Events raised between ticks are surfaced by the next update().
    pending_events: Vec<CoreEvent>,
    // Named callbacks wait for a host.
    pending_named: Vec<(TargetId, String, CallbackArgs)>,

    outputs: Outputs,
}

impl Default for TweenEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn collect_calls(ev: &TweenEvent, fired: &[CallbackArgs]) -> Vec<PendingCall> {
    fired
        .iter()
        .flat_map(|args| {
            ev.request()
                .hooks
                .for_hook(args.hook)
                .iter()
                .map(move |cb| (cb.clone(), args.clone()))
        })
        .collect()
}

impl TweenEngine {
    pub fn new(cfg: Config) -> Self {
        Self {
            slots: Vec::with_capacity(cfg.initial_capacity),
            ids: IdAllocator::new(),
            pending_events: Vec::new(),
            pending_named: Vec::new(),
            outputs: Outputs::default(),
            cfg,
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Blank request carrying this engine's configured defaults.
    pub fn new_request(&self) -> TweenRequest {
        TweenRequest::with_config(&self.cfg)
    }

    fn diag(&mut self, level: DiagnosticLevel, message: String) {
        let surface = match level {
            DiagnosticLevel::Debug => {
                log::debug!("{message}");
                self.cfg.debug_messages
            }
            DiagnosticLevel::Warning => {
                log::warn!("{message}");
                self.cfg.error_messages
            }
            DiagnosticLevel::Error => {
                log::error!("{message}");
                self.cfg.error_messages
            }
        };
        if surface {
            self.pending_events
                .push(CoreEvent::Diagnostic { level, message });
        }
    }

    /// Register an Uninitialized tween and return its slot id.
    pub fn create(&mut self, request: TweenRequest) -> Result<TweenId, TweenError> {
        let id = self.ids.alloc_tween().ok_or(TweenError::RegistryFull)?;
        debug_assert_eq!(id.index(), self.slots.len());
        self.slots.push(Some(TweenEvent::new(id, request)));
        self.diag(DiagnosticLevel::Debug, format!("created {id}"));
        Ok(id)
    }

    /// Apply string overrides, validate and move the tween to Pending.
    pub fn initialize(&mut self, id: TweenId) -> Result<ParamReport, TweenError> {
        let report = self.event_mut(id)?.initialize()?;
        for err in &report.errors {
            self.diag(
                DiagnosticLevel::Warning,
                format!("{id}: {err}, keeping default"),
            );
        }
        self.diag(DiagnosticLevel::Debug, format!("initialized {id}"));
        Ok(report)
    }

    /// Factory entry point: create and (unless deferred) initialize.
    /// A request that fails validation creates no tween.
    pub fn spawn(&mut self, request: TweenRequest) -> Option<TweenId> {
        let initialize = request.initialize_on_spawn;
        let id = match self.create(request) {
            Ok(id) => id,
            Err(err) => {
                self.diag(DiagnosticLevel::Error, format!("no tween created: {err}"));
                return None;
            }
        };
        if !initialize {
            return Some(id);
        }
        match self.initialize(id) {
            Ok(_) => Some(id),
            Err(err) => {
                self.slots[id.index()] = None;
                self.diag(DiagnosticLevel::Error, format!("no tween created: {err}"));
                None
            }
        }
    }

    pub fn get(&self, id: TweenId) -> Option<&TweenEvent> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    fn event_mut(&mut self, id: TweenId) -> Result<&mut TweenEvent, TweenError> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(TweenError::TweenNotFound { id })
    }

    /// Mutable request of a tween that has not been initialized yet
    /// (or a retained finished one awaiting re-initialization).
    pub fn request_mut(&mut self, id: TweenId) -> Result<&mut TweenRequest, TweenError> {
        let ev = self.event_mut(id)?;
        if !matches!(
            ev.phase(),
            crate::event::Phase::Uninitialized | crate::event::Phase::Finished
        ) {
            return Err(TweenError::AlreadyInitialized { id });
        }
        Ok(ev.request_mut())
    }

    /// Tombstone a tween without notifications.
    pub fn remove(&mut self, id: TweenId) -> bool {
        match self.slots.get_mut(id.index()) {
            Some(slot) => slot.take().is_some(),
            None => false,
        }
    }

    /// Live tweens.
    pub fn len(&self) -> usize {
        self.live().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    fn live(&self) -> impl Iterator<Item = &TweenEvent> {
        self.slots.iter().flatten()
    }

    /// Advance every live tween by `dt` seconds and return this tick's outputs.
    pub fn update(&mut self, dt: f32, host: &mut dyn TweenHost) -> &Outputs {
        self.outputs.clear();
        self.flush_named(host);

        // Tweens created during this tick first advance on the next one.
        let count = self.slots.len();
        for idx in 0..count {
            let Some(mut ev) = self.slots[idx].take() else {
                continue;
            };
            let mut sink = StepSink::default();
            ev.advance(dt, host, &mut sink);
            let calls = collect_calls(&ev, &sink.fired);
            self.settle(idx, ev);
            self.outputs.changes.append(&mut sink.changes);
            self.absorb(sink);
            self.dispatch(calls);
            self.flush_named(host);
        }

        let cap = self.cfg.max_events_per_tick;
        let mut events = std::mem::take(&mut self.pending_events);
        if events.len() > cap {
            log::warn!(
                "dropping {} tween events over the per-tick cap of {cap}",
                events.len() - cap
            );
            events.truncate(cap);
        }
        self.outputs.events = events;
        &self.outputs
    }

    /// Put an event back in its slot unless it finished and is not retained.
    fn settle(&mut self, idx: usize, ev: TweenEvent) {
        if ev.is_finished() && !ev.request().retain_when_finished {
            log::debug!("released {}", ev.id());
        } else {
            self.slots[idx] = Some(ev);
        }
    }

    fn absorb(&mut self, sink: StepSink) {
        self.pending_events.extend(sink.events);
        for (level, message) in sink.diagnostics {
            self.diag(level, message);
        }
    }

    fn dispatch(&mut self, calls: Vec<PendingCall>) {
        for (callback, args) in calls {
            match callback {
                Callback::Closure(f) => f(self, &args),
                Callback::Named { receiver, function } => {
                    self.pending_named.push((receiver, function, args))
                }
            }
        }
    }

    fn flush_named(&mut self, host: &mut dyn TweenHost) {
        for (receiver, function, args) in std::mem::take(&mut self.pending_named) {
            if let Err(err) = host.invoke(receiver, &function, &args) {
                self.diag(
                    DiagnosticLevel::Warning,
                    format!("{} {:?} callback skipped: {err}", args.tween, args.hook),
                );
            }
        }
    }

    fn operate(
        &mut self,
        id: TweenId,
        op: fn(&mut TweenEvent, &mut StepSink) -> bool,
    ) -> Result<bool, TweenError> {
        let mut ev = self
            .slots
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(TweenError::TweenNotFound { id })?;
        let mut sink = StepSink::default();
        let changed = op(&mut ev, &mut sink);
        let calls = collect_calls(&ev, &sink.fired);
        self.settle(id.index(), ev);
        self.absorb(sink);
        self.dispatch(calls);
        Ok(changed)
    }

    // Lookup

    pub fn find_by_target(&self, target: TargetId) -> Vec<TweenId> {
        self.matching(|ev| ev.target().id() == Some(target))
    }

    /// Tweens whose target `directory` currently names `name`.
    pub fn find_by_target_name(
        &self,
        name: &str,
        directory: &dyn TargetDirectory,
    ) -> Vec<TweenId> {
        self.select(
            &Selector::TargetName(name.to_string()),
            MatchMode::AllMatching,
            directory,
        )
    }

    pub fn find_by_tag(&self, tag: &str) -> Vec<TweenId> {
        self.matching(|ev| ev.tag() == Some(tag))
    }

    fn matching(&self, pred: impl Fn(&TweenEvent) -> bool) -> Vec<TweenId> {
        self.live().filter(|ev| pred(ev)).map(TweenEvent::id).collect()
    }

    pub fn all(&self) -> Vec<TweenId> {
        self.live().map(TweenEvent::id).collect()
    }

    /// Snapshot of matching ids in slot order. `directory` resolves
    /// `Selector::TargetName`; other selectors ignore it.
    pub fn select(
        &self,
        selector: &Selector,
        mode: MatchMode,
        directory: &dyn TargetDirectory,
    ) -> Vec<TweenId> {
        let matching = self
            .live()
            .filter(|ev| selector.matches(ev, directory))
            .map(TweenEvent::id);
        match mode {
            MatchMode::AllMatching => matching.collect(),
            MatchMode::FirstMatch => matching.take(1).collect(),
        }
    }

    // Single-tween control. `Ok(false)` means the call changed nothing.

    /// Cancel; completion fires only if the tween had started.
    pub fn stop(&mut self, id: TweenId) -> Result<bool, TweenError> {
        self.operate(id, TweenEvent::stop)
    }

    pub fn pause(&mut self, id: TweenId) -> Result<bool, TweenError> {
        self.operate(id, TweenEvent::pause)
    }

    pub fn resume(&mut self, id: TweenId) -> Result<bool, TweenError> {
        self.operate(id, TweenEvent::resume)
    }

    /// Rewind to the start; the delay applies again, start does not refire.
    pub fn restart(&mut self, id: TweenId) -> Result<bool, TweenError> {
        self.operate(id, TweenEvent::restart)
    }

    // Bulk control. Each returns how many tweens it changed.

    fn sweep(
        &mut self,
        ids: Vec<TweenId>,
        op: fn(&mut TweenEngine, TweenId) -> Result<bool, TweenError>,
    ) -> usize {
        ids.into_iter()
            .filter(|id| matches!(op(self, *id), Ok(true)))
            .count()
    }

    /// Stops in reverse slot order over a snapshot of the matches.
    pub fn stop_all(
        &mut self,
        selector: &Selector,
        mode: MatchMode,
        directory: &dyn TargetDirectory,
    ) -> usize {
        let mut ids = self.select(selector, mode, directory);
        ids.reverse();
        self.sweep(ids, TweenEngine::stop)
    }

    pub fn pause_all(
        &mut self,
        selector: &Selector,
        mode: MatchMode,
        directory: &dyn TargetDirectory,
    ) -> usize {
        let ids = self.select(selector, mode, directory);
        self.sweep(ids, TweenEngine::pause)
    }

    pub fn resume_all(
        &mut self,
        selector: &Selector,
        mode: MatchMode,
        directory: &dyn TargetDirectory,
    ) -> usize {
        let ids = self.select(selector, mode, directory);
        self.sweep(ids, TweenEngine::resume)
    }

    pub fn restart_all(
        &mut self,
        selector: &Selector,
        mode: MatchMode,
        directory: &dyn TargetDirectory,
    ) -> usize {
        let ids = self.select(selector, mode, directory);
        self.sweep(ids, TweenEngine::restart)
    }
}

/// One execution scope (e.g. a game world). The engine is created on first use
/// and dropped on teardown.
#[derive(Debug, Default)]
pub struct TweenContext {
    cfg: Config,
    engine: Option<TweenEngine>,
}

impl TweenContext {
    pub fn new(cfg: Config) -> Self {
        Self { cfg, engine: None }
    }

    pub fn engine(&mut self) -> &mut TweenEngine {
        let cfg = &self.cfg;
        self.engine.get_or_insert_with(|| {
            log::debug!("creating tween registry");
            TweenEngine::new(cfg.clone())
        })
    }

    pub fn get(&self) -> Option<&TweenEngine> {
        self.engine.as_ref()
    }

    pub fn is_live(&self) -> bool {
        self.engine.is_some()
    }

    pub fn spawn(&mut self, request: TweenRequest) -> Option<TweenId> {
        self.engine().spawn(request)
    }

    /// Advance the registry if it exists.
    pub fn update(&mut self, dt: f32, host: &mut dyn TweenHost) -> Option<&Outputs> {
        self.engine.as_mut().map(|engine| engine.update(dt, host))
    }

    pub fn teardown(&mut self) -> Option<TweenEngine> {
        self.engine.take()
    }
}
