// Update routing.
//
// One dispatcher instance owns the whole pipeline. Every inbound update
// funnels through `dispatch`, which serializes per user, routes to the
// admin wizard or the hunt flow, and absorbs all failures so the caller
// (a spawned task per update) never has anything to propagate.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::db::Database;
use crate::error::{BotError, BotResult};
use crate::metrics;
use crate::nav::NavigationEngine;
use crate::session::{SessionManager, UserGates};
use crate::texts;
use crate::transport::{InboundUpdate, Messenger};
use crate::wizard::{CacheWizard, MIN_CODEWORD_CHARS};

pub struct Dispatcher {
    db: Arc<Database>,
    messenger: Arc<dyn Messenger>,
    config: Config,
    gates: UserGates,
    sessions: SessionManager,
    engine: NavigationEngine,
    wizard: CacheWizard,
}

impl Dispatcher {
    pub fn new(db: Arc<Database>, messenger: Arc<dyn Messenger>, config: Config) -> Self {
        Self {
            sessions: SessionManager::new(db.clone()),
            engine: NavigationEngine::new(
                db.clone(),
                messenger.clone(),
                config.arrival_radius_meters,
            ),
            wizard: CacheWizard::new(db.clone(), messenger.clone()),
            gates: UserGates::new(),
            db,
            messenger,
            config,
        }
    }

    /// Handle one inbound update end to end. All outcomes are settled
    /// here; nothing propagates to the spawned task.
    pub async fn dispatch(&self, update: InboundUpdate) {
        let started = Instant::now();
        metrics::UPDATES_IN_FLIGHT.inc();
        metrics::UPDATES_RECEIVED_TOTAL
            .with_label_values(&[kind_label(&update)])
            .inc();

        // Updates from the same user run strictly one at a time, in
        // arrival order. Different users proceed concurrently.
        let gate = self.gates.gate(update.user_id);
        let _guard = gate.lock().await;

        if let Err(err) = self.route(&update).await {
            match err {
                BotError::Storage(err) => {
                    error!(user_id = update.user_id, error = %err, "storage failure while handling update");
                    let _ = self
                        .messenger
                        .send_text(update.user_id, texts::TRANSIENT_ERROR)
                        .await;
                }
                BotError::Transport(err) => {
                    // The user is unreachable; there is no one to tell.
                    warn!(user_id = update.user_id, error = %err, "delivery failed, update abandoned");
                    metrics::DELIVERY_FAILURES_TOTAL
                        .with_label_values(&["send_text"])
                        .inc();
                }
            }
        }

        metrics::UPDATES_IN_FLIGHT.dec();
        metrics::UPDATE_HANDLE_DURATION_SECONDS.observe(started.elapsed().as_secs_f64());
    }

    async fn route(&self, update: &InboundUpdate) -> BotResult<()> {
        if self.config.is_admin(update.user_id) {
            if self.wizard.in_progress(update.user_id).await? {
                return self.route_admin(update).await;
            }
            if command_of(update) == Some("create") {
                return self.route_admin(update).await;
            }
            // Outside the wizard, admins hunt caches like anyone else.
        }
        self.route_user(update).await
    }

    // ── Admin flow ────────────────────────────────────────────────────

    async fn route_admin(&self, update: &InboundUpdate) -> BotResult<()> {
        let user_id = update.user_id;
        if let Some(command) = command_of(update) {
            return match command {
                "create" => self.wizard.begin(user_id).await,
                "start" => {
                    self.messenger.send_text(user_id, texts::ADMIN_WELCOME).await?;
                    Ok(())
                }
                "stop" => self.admin_stop(user_id).await,
                _ => {
                    self.messenger
                        .send_text(user_id, texts::ADMIN_UNKNOWN_COMMAND)
                        .await?;
                    Ok(())
                }
            };
        }
        self.wizard.handle_message(user_id, update).await
    }

    /// Admin /stop cancels the wizard when one is open, otherwise it
    /// behaves like the regular stop.
    async fn admin_stop(&self, user_id: i64) -> BotResult<()> {
        if self.wizard.cancel(user_id).await? {
            self.messenger.send_text(user_id, texts::WIZARD_CANCELLED).await?;
            return Ok(());
        }
        self.user_stop(user_id).await
    }

    // ── User flow ─────────────────────────────────────────────────────

    async fn route_user(&self, update: &InboundUpdate) -> BotResult<()> {
        let user_id = update.user_id;

        // Commands win over everything, /stop must work mid-hunt.
        if let Some(command) = command_of(update) {
            return match command {
                "start" => {
                    self.messenger.send_text(user_id, texts::WELCOME).await?;
                    Ok(())
                }
                "stop" => self.user_stop(user_id).await,
                _ => {
                    self.messenger
                        .send_text(user_id, texts::UNKNOWN_COMMAND)
                        .await?;
                    Ok(())
                }
            };
        }

        if let Some(session) = self.sessions.get_active_session(user_id).await? {
            return match update.location {
                Some(location) => {
                    self.engine.handle_location(&session, location).await?;
                    Ok(())
                }
                None => {
                    self.messenger
                        .send_text(user_id, texts::SHARE_LOCATION_REMINDER)
                        .await?;
                    Ok(())
                }
            };
        }

        // No session: a stray location is dropped without a reply, text
        // is treated as a codeword search.
        if update.location.is_some() {
            return Ok(());
        }
        self.search_cache(user_id, update.text.as_deref().unwrap_or(""))
            .await
    }

    async fn user_stop(&self, user_id: i64) -> BotResult<()> {
        let text = if self.sessions.stop_session(user_id).await? {
            info!(user_id, "hunt stopped");
            texts::HUNT_STOPPED
        } else {
            texts::NOTHING_TO_STOP
        };
        self.messenger.send_text(user_id, text).await?;
        Ok(())
    }

    async fn search_cache(&self, user_id: i64, raw: &str) -> BotResult<()> {
        if raw.is_empty() {
            self.messenger.send_text(user_id, texts::WELCOME).await?;
            return Ok(());
        }

        let codeword = raw.trim();
        if codeword.chars().count() < MIN_CODEWORD_CHARS {
            // Too-short input never reaches the store.
            metrics::CODEWORD_LOOKUPS_TOTAL
                .with_label_values(&["too_short"])
                .inc();
            self.messenger
                .send_text(user_id, texts::CODEWORD_TOO_SHORT)
                .await?;
            return Ok(());
        }

        let Some(cache) = self.db.get_cache_by_codeword(codeword).await? else {
            metrics::CODEWORD_LOOKUPS_TOTAL
                .with_label_values(&["not_found"])
                .inc();
            self.messenger.send_text(user_id, texts::CACHE_NOT_FOUND).await?;
            return Ok(());
        };
        metrics::CODEWORD_LOOKUPS_TOTAL
            .with_label_values(&["found"])
            .inc();

        self.sessions.start_session(user_id, cache.id).await?;
        info!(user_id, cache_id = cache.id, codeword = %cache.codeword, "hunt started");
        self.messenger
            .send_text(user_id, &texts::cache_found(&cache.codeword))
            .await?;
        Ok(())
    }
}

/// Extract a leading slash command: "/start foo" yields "start".
fn command_of(update: &InboundUpdate) -> Option<&str> {
    let text = update.text.as_deref()?.trim();
    let rest = text.strip_prefix('/')?;
    rest.split_whitespace().next()
}

fn kind_label(update: &InboundUpdate) -> &'static str {
    if update.location.is_some() {
        "location"
    } else if update.media.is_some() {
        "media"
    } else if update.text.as_deref().is_some_and(|t| !t.is_empty()) {
        "text"
    } else {
        "empty"
    }
}
