//! Reconciliation between the two representations.
//!
//! The [`SyncManager`] is the only component that talks to both
//! converters. It tracks a structural hash per side, declares a conflict
//! only when both sides have diverged since the last successful sync,
//! debounces rapid edits through cooperative timer slots, and notifies
//! subscribers synchronously with each freshly converted value. One
//! manager is constructed per editing session and owns all of its state.

pub mod hash;

mod debounce;

use crate::ast::Program;
use crate::compiler::{Compiler, CompilerConfig};
use crate::emitter::{Emitter, EmitterConfig};
use crate::error::SyncError;
use crate::graph::Graph;
use debounce::DebounceSlot;
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncDirection {
    CodeToBlueprint,
    BlueprintToCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictResolution {
    CodeWins,
    BlueprintWins,
    AskUser,
    /// Declared but deliberately unimplemented; selecting it fails the
    /// sync with a distinguishable error instead of guessing a side.
    Merge,
}

/// Both sides changed since the last successful synchronization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub direction: SyncDirection,
    pub code_hash: u64,
    pub blueprint_hash: u64,
    pub detected_at: SystemTime,
}

#[derive(Debug, Clone)]
pub struct SyncPreferences {
    pub debounce_delay: Duration,
    pub resolution: ConflictResolution,
    pub compiler: CompilerConfig,
    pub emitter: EmitterConfig,
}

impl Default for SyncPreferences {
    fn default() -> Self {
        Self {
            debounce_delay: Duration::from_millis(300),
            resolution: ConflictResolution::AskUser,
            compiler: CompilerConfig::default(),
            emitter: EmitterConfig::default(),
        }
    }
}

/// Partial update for [`SyncManager::update_preferences`]; `None` fields
/// keep their current value.
#[derive(Debug, Clone, Default)]
pub struct SyncPreferencesUpdate {
    pub debounce_delay: Option<Duration>,
    pub resolution: Option<ConflictResolution>,
    pub compiler: Option<CompilerConfig>,
    pub emitter: Option<EmitterConfig>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SideSnapshot {
    /// Hash recorded at the last successful sync involving this side.
    pub last_hash: Option<u64>,
    /// Latest hash observed through any entry point.
    pub seen_hash: Option<u64>,
    pub last_sync: Option<SystemTime>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSnapshot {
    pub busy: bool,
    pub code: SideSnapshot,
    pub blueprint: SideSnapshot,
    pub pending_code: bool,
    pub pending_blueprint: bool,
}

/// Handle returned by the subscription methods; pass it back to
/// [`SyncManager::unsubscribe`].
#[derive(Debug)]
pub struct Subscription {
    id: u64,
}

struct Subscriber<T> {
    id: u64,
    callback: Box<dyn Fn(&T)>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct SideState {
    last_hash: Option<u64>,
    seen_hash: Option<u64>,
    last_sync: Option<SystemTime>,
}

pub struct SyncManager {
    prefs: SyncPreferences,
    busy: bool,
    code: SideState,
    blueprint: SideState,
    pending_code: DebounceSlot<Program>,
    pending_blueprint: DebounceSlot<Graph>,
    code_subscribers: Vec<Subscriber<Program>>,
    blueprint_subscribers: Vec<Subscriber<Graph>>,
    conflict_subscribers: Vec<Subscriber<Conflict>>,
    next_subscription: u64,
    override_resolution: Option<(SyncDirection, ConflictResolution)>,
}

impl Default for SyncManager {
    fn default() -> Self {
        Self::new(SyncPreferences::default())
    }
}

impl SyncManager {
    pub fn new(prefs: SyncPreferences) -> Self {
        Self {
            prefs,
            busy: false,
            code: SideState::default(),
            blueprint: SideState::default(),
            pending_code: DebounceSlot::default(),
            pending_blueprint: DebounceSlot::default(),
            code_subscribers: Vec::new(),
            blueprint_subscribers: Vec::new(),
            conflict_subscribers: Vec::new(),
            next_subscription: 1,
            override_resolution: None,
        }
    }

    /// Regenerates the blueprint from a changed program.
    ///
    /// Fails fast while another sync is in flight; the busy flag is
    /// always released on every other path.
    pub fn sync_code_to_blueprint(&mut self, program: &Program) -> Result<Graph, SyncError> {
        if self.busy {
            return Err(SyncError::SyncInProgress);
        }
        self.busy = true;
        let result = self.run_code_sync(program);
        self.busy = false;
        result
    }

    /// Regenerates the program from a changed blueprint.
    pub fn sync_blueprint_to_code(&mut self, graph: &Graph) -> Result<Program, SyncError> {
        if self.busy {
            return Err(SyncError::SyncInProgress);
        }
        self.busy = true;
        let result = self.run_blueprint_sync(graph);
        self.busy = false;
        result
    }

    fn run_code_sync(&mut self, program: &Program) -> Result<Graph, SyncError> {
        let new_hash = hash::program_hash(program);
        self.code.seen_hash = Some(new_hash);

        if let Some(conflict) = self.detect_conflict(SyncDirection::CodeToBlueprint, new_hash) {
            match self.resolution_for(SyncDirection::CodeToBlueprint) {
                ConflictResolution::CodeWins => {
                    debug!("conflict resolved in favor of code; proceeding");
                }
                ConflictResolution::BlueprintWins => return Err(SyncError::BlueprintPrecedence),
                ConflictResolution::AskUser => {
                    notify(&self.conflict_subscribers, &conflict);
                    return Err(SyncError::UserDecisionRequired);
                }
                ConflictResolution::Merge => return Err(SyncError::MergeUnsupported),
            }
        }

        let graph = Emitter::new(self.prefs.emitter.clone()).emit(program);
        let graph_hash = hash::graph_hash(&graph);
        self.code.last_hash = Some(new_hash);
        self.code.last_sync = Some(SystemTime::now());
        self.blueprint.last_hash = Some(graph_hash);
        self.blueprint.seen_hash = Some(graph_hash);
        notify(&self.blueprint_subscribers, &graph);
        Ok(graph)
    }

    fn run_blueprint_sync(&mut self, graph: &Graph) -> Result<Program, SyncError> {
        let new_hash = hash::graph_hash(graph);
        self.blueprint.seen_hash = Some(new_hash);

        if let Some(conflict) = self.detect_conflict(SyncDirection::BlueprintToCode, new_hash) {
            match self.resolution_for(SyncDirection::BlueprintToCode) {
                ConflictResolution::BlueprintWins => {
                    debug!("conflict resolved in favor of blueprint; proceeding");
                }
                ConflictResolution::CodeWins => return Err(SyncError::CodePrecedence),
                ConflictResolution::AskUser => {
                    notify(&self.conflict_subscribers, &conflict);
                    return Err(SyncError::UserDecisionRequired);
                }
                ConflictResolution::Merge => return Err(SyncError::MergeUnsupported),
            }
        }

        let program = Compiler::new(self.prefs.compiler.clone()).compile(graph);
        let program_hash = hash::program_hash(&program);
        self.blueprint.last_hash = Some(new_hash);
        self.blueprint.last_sync = Some(SystemTime::now());
        self.code.last_hash = Some(program_hash);
        self.code.seen_hash = Some(program_hash);
        notify(&self.code_subscribers, &program);
        Ok(program)
    }

    /// A conflict exists only when both sides have a previous hash and
    /// both new hashes differ from their respective previous value. A
    /// change on one side alone is not a conflict.
    fn detect_conflict(&self, direction: SyncDirection, incoming_hash: u64) -> Option<Conflict> {
        let (own, other) = match direction {
            SyncDirection::CodeToBlueprint => (&self.code, &self.blueprint),
            SyncDirection::BlueprintToCode => (&self.blueprint, &self.code),
        };
        let own_previous = own.last_hash?;
        let other_previous = other.last_hash?;
        let other_seen = other.seen_hash.unwrap_or(other_previous);
        if incoming_hash == own_previous || other_seen == other_previous {
            return None;
        }
        let (code_hash, blueprint_hash) = match direction {
            SyncDirection::CodeToBlueprint => (incoming_hash, other_seen),
            SyncDirection::BlueprintToCode => (other_seen, incoming_hash),
        };
        Some(Conflict {
            direction,
            code_hash,
            blueprint_hash,
            detected_at: SystemTime::now(),
        })
    }

    /// Consumes a one-shot override from [`SyncManager::resolve_conflict`],
    /// falling back to the configured policy.
    fn resolution_for(&mut self, direction: SyncDirection) -> ConflictResolution {
        match self.override_resolution.take() {
            Some((overridden, resolution)) if overridden == direction => resolution,
            other => {
                self.override_resolution = other;
                self.prefs.resolution
            }
        }
    }

    /// Debounced entry point for code edits. The last call within the
    /// delay window wins; earlier pending values are replaced, not queued.
    pub fn handle_code_change(&mut self, program: Program) {
        self.code.seen_hash = Some(hash::program_hash(&program));
        self.pending_code.arm(program, self.prefs.debounce_delay);
    }

    /// Debounced entry point for blueprint edits.
    pub fn handle_blueprint_change(&mut self, graph: Graph) {
        self.blueprint.seen_hash = Some(hash::graph_hash(&graph));
        self.pending_blueprint.arm(graph, self.prefs.debounce_delay);
    }

    /// Fires any due debounce slots. Failures of the underlying sync are
    /// caught and logged, never propagated to the caller.
    pub fn poll(&mut self) {
        let now = Instant::now();
        if let Some(program) = self.pending_code.take_due(now) {
            if let Err(error) = self.sync_code_to_blueprint(&program) {
                warn!(%error, "debounced code sync failed");
            }
        }
        if let Some(graph) = self.pending_blueprint.take_due(now) {
            if let Err(error) = self.sync_blueprint_to_code(&graph) {
                warn!(%error, "debounced blueprint sync failed");
            }
        }
    }

    /// Fires pending slots immediately, regardless of their deadlines.
    pub fn flush(&mut self) {
        if let Some(program) = self.pending_code.take() {
            if let Err(error) = self.sync_code_to_blueprint(&program) {
                warn!(%error, "flushed code sync failed");
            }
        }
        if let Some(graph) = self.pending_blueprint.take() {
            if let Err(error) = self.sync_blueprint_to_code(&graph) {
                warn!(%error, "flushed blueprint sync failed");
            }
        }
    }

    /// Overrides the resolution policy for the next sync in the
    /// conflict's direction. Does not re-invoke the converters; callers
    /// are expected to resubmit the change.
    pub fn resolve_conflict(&mut self, conflict: &Conflict, resolution: ConflictResolution) {
        self.override_resolution = Some((conflict.direction, resolution));
    }

    pub fn on_code_change(&mut self, callback: impl Fn(&Program) + 'static) -> Subscription {
        let id = self.next_id();
        self.code_subscribers.push(Subscriber {
            id,
            callback: Box::new(callback),
        });
        Subscription { id }
    }

    pub fn on_blueprint_change(&mut self, callback: impl Fn(&Graph) + 'static) -> Subscription {
        let id = self.next_id();
        self.blueprint_subscribers.push(Subscriber {
            id,
            callback: Box::new(callback),
        });
        Subscription { id }
    }

    pub fn on_conflict(&mut self, callback: impl Fn(&Conflict) + 'static) -> Subscription {
        let id = self.next_id();
        self.conflict_subscribers.push(Subscriber {
            id,
            callback: Box::new(callback),
        });
        Subscription { id }
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let id = subscription.id;
        let before = self.code_subscribers.len()
            + self.blueprint_subscribers.len()
            + self.conflict_subscribers.len();
        self.code_subscribers.retain(|s| s.id != id);
        self.blueprint_subscribers.retain(|s| s.id != id);
        self.conflict_subscribers.retain(|s| s.id != id);
        before
            != self.code_subscribers.len()
                + self.blueprint_subscribers.len()
                + self.conflict_subscribers.len()
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_subscription;
        self.next_subscription += 1;
        id
    }

    /// Clears all hash/timestamp state and cancels pending timers.
    /// Subscriptions survive a reset.
    pub fn reset(&mut self) {
        self.code = SideState::default();
        self.blueprint = SideState::default();
        self.pending_code.cancel();
        self.pending_blueprint.cancel();
        self.override_resolution = None;
        self.busy = false;
    }

    pub fn state(&self) -> SyncSnapshot {
        SyncSnapshot {
            busy: self.busy,
            code: SideSnapshot {
                last_hash: self.code.last_hash,
                seen_hash: self.code.seen_hash,
                last_sync: self.code.last_sync,
            },
            blueprint: SideSnapshot {
                last_hash: self.blueprint.last_hash,
                seen_hash: self.blueprint.seen_hash,
                last_sync: self.blueprint.last_sync,
            },
            pending_code: self.pending_code.is_armed(),
            pending_blueprint: self.pending_blueprint.is_armed(),
        }
    }

    pub fn preferences(&self) -> &SyncPreferences {
        &self.prefs
    }

    pub fn update_preferences(&mut self, update: SyncPreferencesUpdate) {
        if let Some(delay) = update.debounce_delay {
            self.prefs.debounce_delay = delay;
        }
        if let Some(resolution) = update.resolution {
            self.prefs.resolution = resolution;
        }
        if let Some(compiler) = update.compiler {
            self.prefs.compiler = compiler;
        }
        if let Some(emitter) = update.emitter {
            self.prefs.emitter = emitter;
        }
    }
}

/// Delivers to every subscriber in registration order. A panicking
/// callback is isolated and logged; it cannot block later subscribers or
/// corrupt manager state.
fn notify<T>(subscribers: &[Subscriber<T>], value: &T) {
    for subscriber in subscribers {
        let outcome = catch_unwind(AssertUnwindSafe(|| (subscriber.callback)(value)));
        if outcome.is_err() {
            error!(subscription = subscriber.id, "subscriber callback panicked; continuing delivery");
        }
    }
}
