// Navigation engine.
//
// Consumes position samples for an active hunt and decides what, if
// anything, the user hears back: reject one-shot pins, detect arrival,
// otherwise render guidance and either send it, edit the previous
// message in place, or suppress it when nothing changed.

use std::sync::Arc;

use tracing::{info, warn};

use crate::db::{Database, NavSession};
use crate::error::BotResult;
use crate::geo::{self, Octant};
use crate::guidance;
use crate::metrics;
use crate::texts;
use crate::transport::{LocationUpdate, MediaKind, Messenger};

/// What the engine did with one position sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuidanceAction {
    /// One-shot pin rejected with broadcast instructions; no state change.
    RejectedStatic,
    /// Hunt finished; the session is closed and the reward went out.
    Arrived,
    /// Rendered text matched the previous message; nothing sent or stored.
    Suppressed,
    /// Fresh guidance message sent.
    Sent,
    /// Previous guidance message edited in place.
    Edited,
    /// The target cache no longer exists; the session was cleared.
    CacheGone,
}

pub struct NavigationEngine {
    db: Arc<Database>,
    messenger: Arc<dyn Messenger>,
    arrival_radius_meters: f64,
}

impl NavigationEngine {
    pub fn new(
        db: Arc<Database>,
        messenger: Arc<dyn Messenger>,
        arrival_radius_meters: f64,
    ) -> Self {
        Self {
            db,
            messenger,
            arrival_radius_meters,
        }
    }

    /// Handle one position sample for the user's active session.
    ///
    /// The caller holds the user's gate, so the session snapshot cannot
    /// change underneath us until we return.
    pub async fn handle_location(
        &self,
        session: &NavSession,
        location: LocationUpdate,
    ) -> BotResult<GuidanceAction> {
        let user_id = session.user_id;

        if !location.is_live {
            self.messenger
                .send_text(user_id, texts::STATIC_LOCATION_REJECTED)
                .await?;
            return Ok(GuidanceAction::RejectedStatic);
        }

        let cache = match self.db.get_cache(session.cache_id).await? {
            Some(cache) => cache,
            None => {
                self.db.clear_session(user_id).await?;
                self.messenger.send_text(user_id, texts::CACHE_GONE).await?;
                return Ok(GuidanceAction::CacheGone);
            }
        };

        let distance = geo::distance_meters(
            location.latitude,
            location.longitude,
            cache.latitude,
            cache.longitude,
        );

        if geo::is_arrived(distance, self.arrival_radius_meters) {
            // Close the session before any side effect so a replay of the
            // same sample can never hand out the reward twice.
            self.db.deactivate_session(user_id).await?;
            metrics::ARRIVALS_TOTAL.inc();
            info!(user_id, cache_id = cache.id, distance_m = distance, "arrived at cache");
            self.deliver_reward(user_id, &cache.codeword, &cache.media_ref, &cache.media_kind)
                .await;
            return Ok(GuidanceAction::Arrived);
        }

        let octant = Octant::from_points(
            location.latitude,
            location.longitude,
            cache.latitude,
            cache.longitude,
        );
        let text = guidance::render(distance, octant);

        if session.last_message_text.as_deref() == Some(text.as_str()) {
            // Unchanged guidance is dropped outright, progress included,
            // so replaying a sample leaves the store untouched.
            metrics::GUIDANCE_MESSAGES_TOTAL
                .with_label_values(&["suppressed"])
                .inc();
            return Ok(GuidanceAction::Suppressed);
        }

        let (message_id, action) = match session.last_message_id {
            None => {
                let id = self.messenger.send_text(user_id, &text).await?;
                (id, GuidanceAction::Sent)
            }
            Some(prior_id) => match self.messenger.edit_text(user_id, prior_id, &text).await {
                Ok(()) => (prior_id, GuidanceAction::Edited),
                Err(err) => {
                    // The previous message may be gone or too old to edit.
                    // Recovered locally: the user just gets a fresh message.
                    warn!(user_id, error = %err, "edit failed, sending fresh guidance");
                    metrics::EDIT_FALLBACKS_TOTAL.inc();
                    let id = self.messenger.send_text(user_id, &text).await?;
                    (id, GuidanceAction::Sent)
                }
            },
        };

        self.db
            .update_session_progress(
                user_id,
                location.latitude,
                location.longitude,
                Some(message_id),
                &text,
            )
            .await?;

        metrics::GUIDANCE_MESSAGES_TOTAL
            .with_label_values(&[match action {
                GuidanceAction::Edited => "edited",
                _ => "sent",
            }])
            .inc();
        Ok(action)
    }

    /// Arrival side effect: congratulations, then the stored media. Both
    /// are best-effort; the hunt is already closed and never reopens.
    async fn deliver_reward(&self, user_id: i64, codeword: &str, media_ref: &str, media_kind: &str) {
        if let Err(err) = self
            .messenger
            .send_text(user_id, &texts::arrival_congrats(codeword))
            .await
        {
            warn!(user_id, error = %err, "failed to send arrival congratulations");
            metrics::DELIVERY_FAILURES_TOTAL
                .with_label_values(&["send_text"])
                .inc();
        }

        let kind = MediaKind::from_str_name(media_kind).unwrap_or(MediaKind::Photo);
        let caption = kind.supports_caption().then_some(texts::ARRIVAL_CAPTION);
        if let Err(err) = self
            .messenger
            .send_media(user_id, media_ref, kind, caption)
            .await
        {
            warn!(user_id, error = %err, "failed to send cache media");
            metrics::DELIVERY_FAILURES_TOTAL
                .with_label_values(&["send_media"])
                .inc();
            if let Err(err) = self.messenger.send_text(user_id, texts::MEDIA_UNAVAILABLE).await {
                warn!(user_id, error = %err, "failed to send media apology");
            }
        }
    }
}
