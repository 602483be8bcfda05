//! In-memory session state for the risk form.
//!
//! One session backs one interactive user. It owns the three state slots
//! the shell binds to (factor set, credential, last result) plus the
//! single-flight assessment slot behind the "Check My Risk" control.
//! Nothing here is persisted; closing the session discards everything.

use std::sync::{Mutex, RwLock};

use serde::Serialize;
use thiserror::Error;

use crate::assessment::run_assessment;
use crate::credential::ApiCredential;
use crate::models::{AssessmentResult, FactorSet};
use crate::validator::{CompletionClient, CompletionConfig, OpenAiCompatibleClient};

/// Errors surfaced by the session API.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The trigger fired while a previous assessment was still pending.
    #[error("an assessment is already in flight")]
    AssessmentInFlight,

    #[error("internal lock error")]
    LockPoisoned,
}

// ═══════════════════════════════════════════════════════════════════════
// Assessment slot
// ═══════════════════════════════════════════════════════════════════════

/// Snapshot of the assessment currently in flight, for the busy surface.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveAssessment {
    /// Start time, ISO 8601.
    pub started_at: String,
    /// Whether a credential was present, i.e. whether an AI call happens.
    pub ai_requested: bool,
}

/// Single-slot admission token: at most one assessment outstanding.
///
/// `try_begin` hands out an RAII guard and records the observable
/// snapshot; duplicate triggers get `None` until the guard drops, which
/// also clears the snapshot.
struct AssessmentSlot {
    slot: tokio::sync::Mutex<()>,
    active: Mutex<Option<ActiveAssessment>>,
}

impl AssessmentSlot {
    fn new() -> Self {
        Self {
            slot: tokio::sync::Mutex::new(()),
            active: Mutex::new(None),
        }
    }

    fn try_begin(&self, ai_requested: bool) -> Option<SlotGuard<'_>> {
        let held = self.slot.try_lock().ok()?;
        if let Ok(mut active) = self.active.lock() {
            *active = Some(ActiveAssessment {
                started_at: chrono::Utc::now().to_rfc3339(),
                ai_requested,
            });
        }
        Some(SlotGuard {
            _held: held,
            owner: self,
        })
    }

    fn is_busy(&self) -> bool {
        self.slot.try_lock().is_err()
    }

    fn snapshot(&self) -> Option<ActiveAssessment> {
        self.active.lock().ok()?.clone()
    }

    fn clear(&self) {
        if let Ok(mut active) = self.active.lock() {
            *active = None;
        }
    }
}

struct SlotGuard<'a> {
    _held: tokio::sync::MutexGuard<'a, ()>,
    owner: &'a AssessmentSlot,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.owner.clear();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════════════════

/// State surface the host shell drives.
///
/// Generic over the completion client so tests can script the AI leg;
/// production code uses [`AdherenceSession::new`], which talks to the
/// default OpenAI-compatible endpoint.
pub struct AdherenceSession<C> {
    factors: RwLock<FactorSet>,
    credential: RwLock<Option<ApiCredential>>,
    last_result: RwLock<Option<AssessmentResult>>,
    slot: AssessmentSlot,
    client: C,
}

impl AdherenceSession<OpenAiCompatibleClient> {
    /// Session against the default completion endpoint.
    pub fn new() -> Self {
        Self::with_client(OpenAiCompatibleClient::new(CompletionConfig::default()))
    }

    /// Session against a custom endpoint (self-hosted or proxied).
    pub fn with_config(config: CompletionConfig) -> Self {
        Self::with_client(OpenAiCompatibleClient::new(config))
    }
}

impl Default for AdherenceSession<OpenAiCompatibleClient> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CompletionClient> AdherenceSession<C> {
    pub fn with_client(client: C) -> Self {
        Self {
            factors: RwLock::new(FactorSet::default()),
            credential: RwLock::new(None),
            last_result: RwLock::new(None),
            slot: AssessmentSlot::new(),
            client,
        }
    }

    // ── Factor state ──

    /// Replace the factor set wholesale. Edits never mutate in place, so
    /// the shell can diff snapshots by equality.
    pub fn set_factors(&self, factors: FactorSet) -> Result<(), SessionError> {
        let mut guard = self.factors.write().map_err(|_| SessionError::LockPoisoned)?;
        *guard = factors;
        Ok(())
    }

    /// Current factor snapshot.
    pub fn factors(&self) -> Result<FactorSet, SessionError> {
        self.factors
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| SessionError::LockPoisoned)
    }

    // ── Credential ──

    /// Store the API key for this session. Empty or whitespace input
    /// clears it; absence is a normal state.
    pub fn set_credential(&self, key: &str) -> Result<(), SessionError> {
        let mut guard = self
            .credential
            .write()
            .map_err(|_| SessionError::LockPoisoned)?;
        *guard = ApiCredential::new(key);
        Ok(())
    }

    /// Drop the stored key. The zeroizing wrapper scrubs it on the way out.
    pub fn clear_credential(&self) -> Result<(), SessionError> {
        let mut guard = self
            .credential
            .write()
            .map_err(|_| SessionError::LockPoisoned)?;
        *guard = None;
        Ok(())
    }

    pub fn has_credential(&self) -> bool {
        self.credential
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    // ── Busy surface ──

    /// True while an assessment is pending. The shell disables the
    /// trigger control on this.
    pub fn is_busy(&self) -> bool {
        self.slot.is_busy()
    }

    /// Details of the in-flight assessment, if any.
    pub fn active_assessment(&self) -> Option<ActiveAssessment> {
        self.slot.snapshot()
    }

    // ── Results ──

    /// Most recent result. Each completed check replaces it wholesale.
    pub fn last_result(&self) -> Result<Option<AssessmentResult>, SessionError> {
        self.last_result
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| SessionError::LockPoisoned)
    }

    // ── Trigger ──

    /// Run one assessment against the current factor and credential state.
    ///
    /// Rejects duplicate triggers with [`SessionError::AssessmentInFlight`]
    /// while a previous run is pending. The result is returned and stored
    /// as [`last_result`](Self::last_result).
    pub async fn check_risk(&self) -> Result<AssessmentResult, SessionError> {
        // Snapshot state up front; no lock is held across the await.
        let factors = self.factors()?;
        let credential = self
            .credential
            .read()
            .map_err(|_| SessionError::LockPoisoned)?
            .clone();

        let _guard = self
            .slot
            .try_begin(credential.is_some())
            .ok_or(SessionError::AssessmentInFlight)?;

        tracing::info!(ai_requested = credential.is_some(), "running adherence assessment");

        let result = run_assessment(&self.client, &factors, credential.as_ref()).await;

        let mut last = self
            .last_result
            .write()
            .map_err(|_| SessionError::LockPoisoned)?;
        *last = Some(result.clone());
        Ok(result)
    }
}
