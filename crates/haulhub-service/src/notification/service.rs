//! Notification persistence and best-effort delivery.

use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use haulhub_core::error::AppError;
use haulhub_core::result::AppResult;
use haulhub_core::traits::RealtimeBroadcaster;
use haulhub_database::repositories::notification::NewNotification;
use haulhub_entity::notification::{Notification, NotificationAudience};

use crate::context::RequestContext;
use crate::store::NotificationStore;

/// Persists notifications and pushes them to connected clients.
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    broadcaster: Arc<dyn RealtimeBroadcaster>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(store: Arc<dyn NotificationStore>, broadcaster: Arc<dyn RealtimeBroadcaster>) -> Self {
        Self { store, broadcaster }
    }

    /// Persist a notification, then push it to its audience.
    ///
    /// The database write is the authoritative part: a failure there is
    /// the caller's error. The realtime push is fire-and-forget; a
    /// disconnected recipient reads the record from their inbox later.
    pub async fn dispatch(&self, draft: NewNotification) -> AppResult<Notification> {
        let notification = self.store.create(&draft).await?;

        match serde_json::to_value(&notification) {
            Ok(payload) => match notification.audience {
                NotificationAudience::User => {
                    if let Some(user_id) = notification.user_id {
                        self.broadcaster.emit_user_notification(user_id, payload).await;
                    }
                }
                NotificationAudience::Admin => {
                    self.broadcaster.emit_admin_notification(payload).await;
                }
            },
            Err(e) => {
                error!(error = %e, notification_id = %notification.id, "Failed to serialize notification for push");
            }
        }

        info!(
            notification_id = %notification.id,
            audience = ?notification.audience,
            "Notification dispatched"
        );
        Ok(notification)
    }

    /// Lists the caller's notifications, newest first.
    pub async fn list_for_user(&self, ctx: &RequestContext) -> AppResult<Vec<Notification>> {
        self.store.find_for_user(ctx.user_id).await
    }

    /// Lists the shared admin inbox.
    pub async fn list_for_admins(&self, ctx: &RequestContext) -> AppResult<Vec<Notification>> {
        self.require_admin(ctx)?;
        self.store.find_for_admins().await
    }

    /// Unread count for the caller's inbox.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<i64> {
        self.store.count_unread_for_user(ctx.user_id).await
    }

    /// Marks one notification as read, after an ownership check.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        notification_id: Uuid,
    ) -> AppResult<Notification> {
        let notification = self.authorize(ctx, notification_id).await?;
        self.store.mark_read(notification_id).await?;
        Ok(Notification {
            is_read: true,
            ..notification
        })
    }

    /// Marks the caller's entire inbox as read. Returns the count.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.store.mark_all_read_for_user(ctx.user_id).await
    }

    /// Marks the admin inbox as read. Returns the count.
    pub async fn mark_all_read_for_admins(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.require_admin(ctx)?;
        self.store.mark_all_read_for_admins().await
    }

    /// Deletes one notification, after an ownership check.
    pub async fn delete(&self, ctx: &RequestContext, notification_id: Uuid) -> AppResult<()> {
        self.authorize(ctx, notification_id).await?;
        self.store.delete(notification_id).await?;
        Ok(())
    }

    /// Purges the caller's inbox. Returns the count removed.
    pub async fn purge(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.store.purge_for_user(ctx.user_id).await
    }

    /// Purges the admin inbox. Returns the count removed.
    pub async fn purge_for_admins(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.require_admin(ctx)?;
        self.store.purge_for_admins().await
    }

    /// Loads a notification and checks the caller may act on it.
    async fn authorize(
        &self,
        ctx: &RequestContext,
        notification_id: Uuid,
    ) -> AppResult<Notification> {
        let notification = self
            .store
            .find_by_id(notification_id)
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))?;

        let allowed = match notification.audience {
            NotificationAudience::User => {
                notification.user_id == Some(ctx.user_id) || ctx.is_admin()
            }
            NotificationAudience::Admin => ctx.is_admin(),
        };
        if !allowed {
            return Err(AppError::authorization("Not authorized"));
        }
        Ok(notification)
    }

    fn require_admin(&self, ctx: &RequestContext) -> AppResult<()> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Admin role required"));
        }
        Ok(())
    }
}
