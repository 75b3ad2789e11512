// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entry point for the host's item event pipeline.
use tracing::{debug, trace};

use crate::config::Config;
use crate::error::ReceiverError;
use crate::item::{ItemKind, ItemNotification};
use crate::reconciler::{ReconcilePlan, reconcile};
use crate::resolver::PrincipalResolver;
use crate::traits::{Elevation, PrincipalDirectory};

/// Result of handling an item notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The item satisfies the policy, the host can go on.
    Applied,

    /// The host must abort the triggering write and show `message` to the user who made it.
    Cancelled { message: String },
}

impl Outcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled { .. })
    }
}

/// Reconciles the permissions of items in the tracked lists whenever they get added or updated.
///
/// The designated principal is resolved with the rights of the user who triggered the event, all
/// store access afterwards happens with elevated rights.
#[derive(Debug)]
pub struct ItemEventReceiver<H> {
    host: H,
    config: Config,
}

impl<H> ItemEventReceiver<H>
where
    H: Elevation + PrincipalDirectory,
{
    pub fn new(host: H, config: Config) -> Self {
        Self { host, config }
    }

    /// Handle an `Added` or `Updated` notification.
    ///
    /// Errors are never retried. They cancel the write with the error's own message.
    pub fn on_item_written(&self, notification: &ItemNotification) -> Outcome {
        let item = &notification.item;
        let Some(kind) = self.config.kind_of(&item.list) else {
            trace!(%item, "ignore item of untracked list");
            return Outcome::Applied;
        };

        match self.adjust_permissions(kind, notification) {
            Ok(plan) => {
                debug!(
                    %item,
                    event = ?notification.event,
                    changed = !plan.is_empty(),
                    "item permissions adjusted"
                );
                Outcome::Applied
            }
            Err(err) => {
                debug!(%item, event = ?notification.event, %err, "cancel item write");
                Outcome::Cancelled {
                    message: err.to_string(),
                }
            }
        }
    }

    fn adjust_permissions(
        &self,
        kind: ItemKind,
        notification: &ItemNotification,
    ) -> Result<ReconcilePlan, ReceiverError> {
        let principal = PrincipalResolver::for_kind(kind, &self.config)
            .resolve(&notification.fields, &self.host)?;

        self.host.run_elevated(&notification.item.site, |store| {
            reconcile(&*store, &notification.item, principal).map_err(ReceiverError::from)
        })
    }
}
