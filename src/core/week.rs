use crate::core::context::LedgerContext;
use crate::db::km_history::KmHistoryRepo;
use crate::db::log::ttlog;
use crate::db::records::ControlRecordRepo;
use crate::db::services::ServiceEventRepo;
use crate::errors::{AppError, AppResult};
use rusqlite::TransactionBehavior;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CloseReport {
    pub week_id: i64,
    pub closed_now: usize,
    pub already_closed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    pub week_id: i64,
    pub records: usize,
    pub service_events: usize,
    pub readings: usize,
}

pub struct WeekLifecycle;

impl WeekLifecycle {
    /// Freeze every record of the week. Closing twice changes nothing.
    pub fn close(ctx: &mut LedgerContext, week_id: i64) -> AppResult<CloseReport> {
        let tx = ctx
            .pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let report = {
            let records = ControlRecordRepo::new(&tx);
            let total = records.list_for_week(week_id)?.len();
            if total == 0 {
                return Err(AppError::NotFound(format!(
                    "control records for week {}",
                    week_id
                )));
            }

            let closed_now = records.close_week(week_id, &LedgerContext::now())?;
            if closed_now > 0 {
                ttlog(
                    &tx,
                    "close",
                    &format!("week {}", week_id),
                    &format!("{} record(s) closed by {}", closed_now, ctx.operator),
                )?;
            }

            CloseReport {
                week_id,
                closed_now,
                already_closed: total - closed_now,
            }
        };

        tx.commit()?;
        Ok(report)
    }

    /// Remove the most recent week together with its readings and service
    /// events. Only the last week can go; earlier ones feed later carry-overs.
    pub fn delete(ctx: &mut LedgerContext, week_id: i64) -> AppResult<DeleteReport> {
        let tx = ctx
            .pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let report = {
            let records = ControlRecordRepo::new(&tx);
            match records.last_week_with_records()? {
                Some(last) if last == week_id => {}
                Some(last) => {
                    return Err(AppError::InvariantViolation(format!(
                        "week {} is not the last week with records (week {} is)",
                        week_id, last
                    )));
                }
                None => {
                    return Err(AppError::InvariantViolation(format!(
                        "week {} cannot be deleted: no week has control records",
                        week_id
                    )));
                }
            }

            let service_events = ServiceEventRepo::new(&tx).delete_week(week_id)?;
            let readings = KmHistoryRepo::new(&tx).delete_week(week_id)?;
            let deleted = records.delete_week(week_id)?;

            ttlog(
                &tx,
                "delete",
                &format!("week {}", week_id),
                &format!(
                    "{} record(s), {} service event(s), {} reading(s) removed by {}",
                    deleted, service_events, readings, ctx.operator
                ),
            )?;

            DeleteReport {
                week_id,
                records: deleted,
                service_events,
                readings,
            }
        };

        tx.commit()?;
        Ok(report)
    }
}
