//! Blockout management service
//!
//! The bulk block/unblock operations. Every operation is venue- and
//! actor-scoped, deduplicates against current store state before writing
//! (calling it twice with the same input is safe), and reports exactly one
//! `BulkOutcome`. A failed dedup read aborts before anything is written.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    availability::{
        partition_toggle, plan_block_dates, plan_block_slots, plan_unblock_dates,
        plan_unblock_slots, DatePlan, SlotPlan,
    },
    error::{AppError, AppResult},
    models::{BlockType, Blockout, BulkOutcome, NewBlockout, SlotKey, Venue},
    repository::{BlockoutStore, VenueStore},
    services::availability::AvailabilityService,
};

#[derive(Clone)]
pub struct BlockoutsService {
    venues: Arc<dyn VenueStore>,
    blockouts: Arc<dyn BlockoutStore>,
    availability: AvailabilityService,
}

impl BlockoutsService {
    pub fn new(
        venues: Arc<dyn VenueStore>,
        blockouts: Arc<dyn BlockoutStore>,
        availability: AvailabilityService,
    ) -> Self {
        Self {
            venues,
            blockouts,
            availability,
        }
    }

    /// List blockouts for a venue the actor owns
    pub async fn list(
        &self,
        venue_id: Uuid,
        actor: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<Vec<Blockout>> {
        let actor = require_actor(actor)?;
        self.owned_venue(venue_id, actor).await?;
        self.blockouts.list(venue_id, from, to).await
    }

    /// Block whole days. Already-blocked dates are skipped, never duplicated.
    pub async fn block_dates(
        &self,
        venue_id: Uuid,
        actor: Option<Uuid>,
        dates: &[NaiveDate],
        reason: Option<String>,
        block_type: BlockType,
    ) -> AppResult<BulkOutcome> {
        let actor = require_actor(actor)?;
        require_dates(dates)?;
        self.owned_venue(venue_id, actor).await?;

        let plan = self
            .apply_block(venue_id, actor, dates, reason.as_deref(), block_type)
            .await?;
        if plan.to_apply.is_empty() {
            return Ok(BulkOutcome::new(
                plan.requested(),
                0,
                plan.skipped.len(),
                "All selected dates are already blocked",
            ));
        }

        tracing::info!(
            "Blocked {} date(s) for venue {}, {} already blocked: {:?}",
            plan.to_apply.len(),
            venue_id,
            plan.skipped.len(),
            plan.to_apply
        );
        let message = if plan.skipped.is_empty() {
            format!("{} date(s) blocked", plan.to_apply.len())
        } else {
            format!(
                "{} date(s) blocked, {} already blocked",
                plan.to_apply.len(),
                plan.skipped.len()
            )
        };
        Ok(BulkOutcome::new(
            plan.requested(),
            plan.to_apply.len(),
            plan.skipped.len(),
            message,
        ))
    }

    /// Unblock whole days by deleting the full-day records covering them.
    ///
    /// Deletion is by record id, so unblocking one date of a multi-day
    /// record releases the record's entire range.
    pub async fn unblock_dates(
        &self,
        venue_id: Uuid,
        actor: Option<Uuid>,
        dates: &[NaiveDate],
    ) -> AppResult<BulkOutcome> {
        let actor = require_actor(actor)?;
        require_dates(dates)?;
        self.owned_venue(venue_id, actor).await?;

        let plan = self.apply_unblock(venue_id, dates).await?;
        if plan.to_apply.is_empty() {
            return Ok(BulkOutcome::new(
                plan.requested(),
                0,
                plan.skipped.len(),
                "No selected dates were blocked",
            ));
        }

        tracing::info!(
            "Unblocked {} date(s) for venue {}: {:?}",
            plan.to_apply.len(),
            venue_id,
            plan.to_apply
        );
        let message = if plan.skipped.is_empty() {
            format!("{} date(s) unblocked", plan.to_apply.len())
        } else {
            format!(
                "{} date(s) unblocked, {} were not blocked",
                plan.to_apply.len(),
                plan.skipped.len()
            )
        };
        Ok(BulkOutcome::new(
            plan.requested(),
            plan.to_apply.len(),
            plan.skipped.len(),
            message,
        ))
    }

    /// Toggle whole days: currently-blocked dates are unblocked, everything
    /// else is blocked, classified by the availability grid over the dates.
    pub async fn toggle_dates(
        &self,
        venue_id: Uuid,
        actor: Option<Uuid>,
        dates: &[NaiveDate],
        reason: Option<String>,
        block_type: BlockType,
    ) -> AppResult<BulkOutcome> {
        let actor = require_actor(actor)?;
        require_dates(dates)?;
        self.owned_venue(venue_id, actor).await?;

        // min/max exist, the list is non-empty
        let from = dates.iter().min().copied();
        let to = dates.iter().max().copied();
        let days = self.availability.grid(venue_id, from, to).await?;
        let toggle = partition_toggle(dates, &days);

        let blocked = if toggle.to_block.is_empty() {
            DatePlan::default()
        } else {
            self.apply_block(venue_id, actor, &toggle.to_block, reason.as_deref(), block_type)
                .await?
        };
        let unblocked = if toggle.to_unblock.is_empty() {
            DatePlan::default()
        } else {
            self.apply_unblock(venue_id, &toggle.to_unblock).await?
        };

        let applied = blocked.to_apply.len() + unblocked.to_apply.len();
        let skipped = blocked.skipped.len() + unblocked.skipped.len();
        tracing::info!(
            "Toggled availability for venue {}: {} blocked, {} unblocked",
            venue_id,
            blocked.to_apply.len(),
            unblocked.to_apply.len()
        );
        Ok(BulkOutcome::new(
            dates.len(),
            applied,
            skipped,
            format!(
                "{} date(s) blocked, {} date(s) unblocked",
                blocked.to_apply.len(),
                unblocked.to_apply.len()
            ),
        ))
    }

    /// Block individual hour slots. Dedup is at hour granularity.
    pub async fn block_hour_slots(
        &self,
        venue_id: Uuid,
        actor: Option<Uuid>,
        slots: &[SlotKey],
        reason: Option<String>,
        block_type: BlockType,
    ) -> AppResult<BulkOutcome> {
        let actor = require_actor(actor)?;
        require_slots(slots)?;
        self.owned_venue(venue_id, actor).await?;

        let dates: Vec<NaiveDate> = slots
            .iter()
            .map(|s| s.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let existing = self.blockouts.hour_level_for_dates(venue_id, &dates).await?;
        let plan = plan_block_slots(slots, &existing);
        if plan.to_apply.is_empty() {
            return Ok(BulkOutcome::new(
                plan.requested(),
                0,
                plan.skipped.len(),
                "All selected hours are already blocked",
            ));
        }

        let rows: Vec<NewBlockout> = plan
            .to_apply
            .iter()
            .map(|&slot| {
                NewBlockout::hour_slot(
                    venue_id,
                    slot,
                    reason.clone(),
                    block_type,
                    actor,
                )
            })
            .collect();
        self.blockouts.insert_many(&rows).await?;

        tracing::info!(
            "Blocked {} hour slot(s) for venue {}, {} already blocked",
            plan.to_apply.len(),
            venue_id,
            plan.skipped.len()
        );
        Ok(BulkOutcome::new(
            plan.requested(),
            plan.to_apply.len(),
            plan.skipped.len(),
            outcome_message("hour slot(s) blocked", &plan),
        ))
    }

    /// Unblock individual hour slots on one date.
    ///
    /// An empty slot list is rejected; removing every blockout for a date is
    /// `clear_date`, a separately confirmed action.
    pub async fn unblock_hour_slots(
        &self,
        venue_id: Uuid,
        actor: Option<Uuid>,
        date: NaiveDate,
        slots: &[SlotKey],
    ) -> AppResult<BulkOutcome> {
        let actor = require_actor(actor)?;
        require_slots(slots)?;
        self.owned_venue(venue_id, actor).await?;

        let existing = self
            .blockouts
            .hour_level_for_dates(venue_id, &[date])
            .await?;
        let plan = plan_unblock_slots(date, slots, &existing);
        if plan.to_apply.is_empty() {
            return Ok(BulkOutcome::new(
                plan.requested(),
                0,
                plan.skipped.len(),
                "No selected hours were blocked",
            ));
        }

        let mut ids = BTreeSet::new();
        for &slot in &plan.to_apply {
            for record in existing
                .iter()
                .filter(|b| b.contains(slot.date) && b.blocked_hour() == Some(slot.hour))
            {
                ids.insert(record.id);
            }
        }
        let ids: Vec<Uuid> = ids.into_iter().collect();
        self.blockouts.delete_by_ids(venue_id, &ids).await?;

        tracing::info!(
            "Unblocked {} hour slot(s) for venue {} on {}",
            plan.to_apply.len(),
            venue_id,
            date
        );
        Ok(BulkOutcome::new(
            plan.requested(),
            plan.to_apply.len(),
            plan.skipped.len(),
            outcome_message("hour slot(s) unblocked", &plan),
        ))
    }

    /// Remove every blockout, day- and hour-level, covering one date
    pub async fn clear_date(
        &self,
        venue_id: Uuid,
        actor: Option<Uuid>,
        date: NaiveDate,
    ) -> AppResult<BulkOutcome> {
        let actor = require_actor(actor)?;
        self.owned_venue(venue_id, actor).await?;

        let removed = self.blockouts.delete_all_for_date(venue_id, date).await? as usize;
        tracing::info!("Cleared {} blockout(s) for venue {} on {}", removed, venue_id, date);
        let message = if removed == 0 {
            format!("No blockouts to remove for {}", date)
        } else {
            format!("Removed {} blockout(s) for {}", removed, date)
        };
        Ok(BulkOutcome::new(removed, removed, 0, message))
    }

    /// Fetch the venue and check the actor owns it
    async fn owned_venue(&self, venue_id: Uuid, actor: Uuid) -> AppResult<Venue> {
        let venue = self.venues.get(venue_id).await?;
        if venue.owner_id != actor {
            return Err(AppError::Authorization(format!(
                "Venue {} does not belong to the authenticated account",
                venue_id
            )));
        }
        Ok(venue)
    }

    /// Dedup-then-insert core shared by block and toggle.
    /// The dedup read failing aborts before any write.
    async fn apply_block(
        &self,
        venue_id: Uuid,
        actor: Uuid,
        dates: &[NaiveDate],
        reason: Option<&str>,
        block_type: BlockType,
    ) -> AppResult<DatePlan> {
        let existing = self.blockouts.full_day_for_dates(venue_id, dates).await?;
        let plan = plan_block_dates(dates, &existing);
        if !plan.to_apply.is_empty() {
            let rows: Vec<NewBlockout> = plan
                .to_apply
                .iter()
                .map(|&d| {
                    NewBlockout::full_day(
                        venue_id,
                        d,
                        reason.map(str::to_string),
                        block_type,
                        actor,
                    )
                })
                .collect();
            self.blockouts.insert_many(&rows).await?;
        }
        Ok(plan)
    }

    /// Dedup-then-delete core shared by unblock and toggle
    async fn apply_unblock(&self, venue_id: Uuid, dates: &[NaiveDate]) -> AppResult<DatePlan> {
        let existing = self.blockouts.full_day_for_dates(venue_id, dates).await?;
        let plan = plan_unblock_dates(dates, &existing);
        if !plan.to_apply.is_empty() {
            let mut ids = BTreeSet::new();
            for &date in &plan.to_apply {
                for record in existing.iter().filter(|b| b.contains(date)) {
                    ids.insert(record.id);
                }
            }
            let ids: Vec<Uuid> = ids.into_iter().collect();
            self.blockouts.delete_by_ids(venue_id, &ids).await?;
        }
        Ok(plan)
    }
}

fn require_actor(actor: Option<Uuid>) -> AppResult<Uuid> {
    actor.ok_or_else(|| {
        AppError::Authentication("Authentication required to manage blockouts".to_string())
    })
}

fn require_dates(dates: &[NaiveDate]) -> AppResult<()> {
    if dates.is_empty() {
        return Err(AppError::Validation("No dates provided".to_string()));
    }
    Ok(())
}

fn require_slots(slots: &[SlotKey]) -> AppResult<()> {
    if slots.is_empty() {
        return Err(AppError::Validation("No hour slots provided".to_string()));
    }
    Ok(())
}

fn outcome_message(noun: &str, plan: &SlotPlan) -> String {
    if plan.skipped.is_empty() {
        format!("{} {}", plan.to_apply.len(), noun)
    } else {
        format!(
            "{} {}, {} skipped",
            plan.to_apply.len(),
            noun,
            plan.skipped.len()
        )
    }
}
