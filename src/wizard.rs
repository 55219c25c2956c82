// Admin cache-creation wizard.
//
// Three fixed steps: pick a codeword, pin the location, attach the
// media. State lives in the wizard_sessions table so a half-finished
// wizard survives a restart.

use std::sync::Arc;

use tracing::info;

use crate::db::Database;
use crate::error::BotResult;
use crate::metrics;
use crate::texts;
use crate::transport::{InboundUpdate, Messenger};

pub const MIN_CODEWORD_CHARS: usize = 3;

/// Wizard steps, stored as strings only at the DB boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    AwaitingCodeword,
    AwaitingLocation,
    AwaitingMedia,
}

impl WizardStep {
    /// Parse a step string (from DB) into a WizardStep.
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s {
            "awaiting_codeword" => Some(Self::AwaitingCodeword),
            "awaiting_location" => Some(Self::AwaitingLocation),
            "awaiting_media" => Some(Self::AwaitingMedia),
            _ => None,
        }
    }

    /// Serialize to a DB-storable string.
    pub fn to_str_name(&self) -> &'static str {
        match self {
            Self::AwaitingCodeword => "awaiting_codeword",
            Self::AwaitingLocation => "awaiting_location",
            Self::AwaitingMedia => "awaiting_media",
        }
    }
}

pub struct CacheWizard {
    db: Arc<Database>,
    messenger: Arc<dyn Messenger>,
}

impl CacheWizard {
    pub fn new(db: Arc<Database>, messenger: Arc<dyn Messenger>) -> Self {
        Self { db, messenger }
    }

    /// Whether the admin has a wizard in progress.
    pub async fn in_progress(&self, user_id: i64) -> BotResult<bool> {
        Ok(self.db.get_wizard(user_id).await?.is_some())
    }

    /// Start (or restart) the wizard at the codeword step.
    pub async fn begin(&self, user_id: i64) -> BotResult<()> {
        self.db
            .upsert_wizard(
                user_id,
                WizardStep::AwaitingCodeword.to_str_name(),
                None,
                None,
                None,
            )
            .await?;
        self.messenger
            .send_text(user_id, texts::WIZARD_ASK_CODEWORD)
            .await?;
        Ok(())
    }

    /// Abandon a wizard in progress. Returns false when there was none.
    pub async fn cancel(&self, user_id: i64) -> BotResult<bool> {
        Ok(self.db.delete_wizard(user_id).await?)
    }

    /// Feed one admin message into the wizard.
    pub async fn handle_message(&self, user_id: i64, update: &InboundUpdate) -> BotResult<()> {
        let Some(wizard) = self.db.get_wizard(user_id).await? else {
            self.messenger
                .send_text(user_id, texts::ADMIN_USE_CREATE)
                .await?;
            return Ok(());
        };

        match WizardStep::from_str_name(&wizard.step) {
            Some(WizardStep::AwaitingCodeword) => self.take_codeword(user_id, update).await,
            Some(WizardStep::AwaitingLocation) => self.take_location(user_id, update).await,
            Some(WizardStep::AwaitingMedia) => self.take_media(user_id, update).await,
            None => {
                // Unknown step string in the row; restart cleanly.
                self.begin(user_id).await
            }
        }
    }

    async fn take_codeword(&self, user_id: i64, update: &InboundUpdate) -> BotResult<()> {
        let codeword = update.text.as_deref().unwrap_or("").trim();
        if codeword.chars().count() < MIN_CODEWORD_CHARS {
            self.messenger
                .send_text(user_id, texts::WIZARD_CODEWORD_TOO_SHORT)
                .await?;
            return Ok(());
        }

        if self.db.get_cache_by_codeword(codeword).await?.is_some() {
            self.messenger
                .send_text(user_id, texts::WIZARD_CODEWORD_TAKEN)
                .await?;
            return Ok(());
        }

        self.db
            .upsert_wizard(
                user_id,
                WizardStep::AwaitingLocation.to_str_name(),
                Some(codeword),
                None,
                None,
            )
            .await?;
        self.messenger
            .send_text(user_id, texts::WIZARD_ASK_LOCATION)
            .await?;
        Ok(())
    }

    async fn take_location(&self, user_id: i64, update: &InboundUpdate) -> BotResult<()> {
        let Some(location) = update.location else {
            self.messenger
                .send_text(user_id, texts::WIZARD_NEED_LOCATION)
                .await?;
            return Ok(());
        };

        let wizard = self.db.get_wizard(user_id).await?;
        let codeword = wizard.and_then(|w| w.codeword);

        // A one-shot pin is fine here; hiding a cache needs no broadcast.
        self.db
            .upsert_wizard(
                user_id,
                WizardStep::AwaitingMedia.to_str_name(),
                codeword.as_deref(),
                Some(location.latitude),
                Some(location.longitude),
            )
            .await?;
        self.messenger
            .send_text(user_id, texts::WIZARD_ASK_MEDIA)
            .await?;
        Ok(())
    }

    async fn take_media(&self, user_id: i64, update: &InboundUpdate) -> BotResult<()> {
        let Some(media) = update.media.as_ref() else {
            self.messenger
                .send_text(user_id, texts::WIZARD_NEED_MEDIA)
                .await?;
            return Ok(());
        };

        let wizard = self.db.get_wizard(user_id).await?;
        let (Some(codeword), Some(latitude), Some(longitude)) = wizard
            .map(|w| (w.codeword, w.latitude, w.longitude))
            .unwrap_or((None, None, None))
        else {
            // Incomplete row from an interrupted run; restart cleanly.
            return self.begin(user_id).await;
        };

        let cache = self
            .db
            .create_cache(
                &codeword,
                latitude,
                longitude,
                &media.file_ref,
                media.kind.to_str_name(),
                user_id,
            )
            .await?;
        self.db.delete_wizard(user_id).await?;

        info!(
            cache_id = cache.id,
            codeword = %cache.codeword,
            media_kind = %cache.media_kind,
            "cache created"
        );
        metrics::CACHES_CREATED_TOTAL
            .with_label_values(&[media.kind.to_str_name()])
            .inc();

        self.messenger
            .send_text(
                user_id,
                &texts::wizard_done(&cache.codeword, cache.latitude, cache.longitude),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_parsing() {
        assert_eq!(
            WizardStep::from_str_name("awaiting_codeword"),
            Some(WizardStep::AwaitingCodeword)
        );
        assert_eq!(
            WizardStep::from_str_name("awaiting_location"),
            Some(WizardStep::AwaitingLocation)
        );
        assert_eq!(
            WizardStep::from_str_name("awaiting_media"),
            Some(WizardStep::AwaitingMedia)
        );
        assert_eq!(WizardStep::from_str_name("waiting_photo"), None);
    }

    #[test]
    fn test_step_to_string() {
        assert_eq!(
            WizardStep::AwaitingCodeword.to_str_name(),
            "awaiting_codeword"
        );
        assert_eq!(
            WizardStep::AwaitingLocation.to_str_name(),
            "awaiting_location"
        );
        assert_eq!(WizardStep::AwaitingMedia.to_str_name(), "awaiting_media");
    }

    #[test]
    fn test_step_round_trip() {
        for step in [
            WizardStep::AwaitingCodeword,
            WizardStep::AwaitingLocation,
            WizardStep::AwaitingMedia,
        ] {
            assert_eq!(WizardStep::from_str_name(step.to_str_name()), Some(step));
        }
    }
}
