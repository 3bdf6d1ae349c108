use chrono::NaiveDate;
use diesel::prelude::*;

use crate::error::TrainingError;
use crate::models::{
    MainTraining, MainTrainingWithSubTrainings, NewMainTraining, NewSubTraining, SubTraining,
    SubTrainingInput, SubTrainingUpdate, SubTrainingView,
};
use crate::orm::assignment::recompute_for_sub_training;
use crate::orm::db::last_insert_rowid;
use crate::schema::{employee_sub_trainings, main_trainings, sub_trainings};
use crate::validity::ValidityPeriod;

pub fn insert_main_training(
    conn: &mut SqliteConnection,
    training_name: String,
) -> Result<MainTraining, diesel::result::Error> {
    diesel::insert_into(main_trainings::table)
        .values(&NewMainTraining { name: training_name })
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    main_trainings::table
        .filter(main_trainings::id.eq(last_id))
        .select(MainTraining::as_select())
        .first(conn)
}

pub fn get_main_training_by_id(
    conn: &mut SqliteConnection,
    training_id: i32,
) -> Result<Option<MainTraining>, diesel::result::Error> {
    main_trainings::table
        .filter(main_trainings::id.eq(training_id))
        .select(MainTraining::as_select())
        .first(conn)
        .optional()
}

pub fn get_all_main_trainings(
    conn: &mut SqliteConnection,
) -> Result<Vec<MainTraining>, diesel::result::Error> {
    main_trainings::table
        .order(main_trainings::id.asc())
        .select(MainTraining::as_select())
        .load(conn)
}

/// Every main training with its sub-trainings nested.
pub fn get_main_trainings_with_sub_trainings(
    conn: &mut SqliteConnection,
) -> Result<Vec<MainTrainingWithSubTrainings>, TrainingError> {
    let mains = get_all_main_trainings(conn)?;
    let subs = SubTraining::belonging_to(&mains)
        .order(sub_trainings::id.asc())
        .select(SubTraining::as_select())
        .load(conn)?;

    subs.grouped_by(&mains)
        .into_iter()
        .zip(mains)
        .map(|(subs, main)| {
            let sub_trainings = subs
                .into_iter()
                .map(|sub| SubTrainingView::new(sub, &main))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(MainTrainingWithSubTrainings {
                id: main.id,
                name: main.name,
                sub_trainings,
            })
        })
        .collect()
}

pub fn update_main_training(
    conn: &mut SqliteConnection,
    training_id: i32,
    new_name: String,
) -> Result<Option<MainTraining>, diesel::result::Error> {
    let rows = diesel::update(main_trainings::table.filter(main_trainings::id.eq(training_id)))
        .set(main_trainings::name.eq(new_name))
        .execute(conn)?;
    if rows == 0 {
        return Ok(None);
    }
    get_main_training_by_id(conn, training_id)
}

/// Deletes a main training, its sub-trainings and their assignments.
pub fn delete_main_training(
    conn: &mut SqliteConnection,
    training_id: i32,
) -> Result<bool, diesel::result::Error> {
    conn.transaction(|conn| {
        let sub_ids = sub_trainings::table
            .filter(sub_trainings::main_training_id.eq(training_id))
            .select(sub_trainings::id)
            .load::<i32>(conn)?;
        delete_sub_trainings_with_assignments(conn, &sub_ids)?;

        let rows = diesel::delete(main_trainings::table.filter(main_trainings::id.eq(training_id)))
            .execute(conn)?;
        Ok(rows > 0)
    })
}

fn delete_sub_trainings_with_assignments(
    conn: &mut SqliteConnection,
    sub_ids: &[i32],
) -> Result<usize, diesel::result::Error> {
    if sub_ids.is_empty() {
        return Ok(0);
    }
    diesel::delete(
        employee_sub_trainings::table
            .filter(employee_sub_trainings::sub_training_id.eq_any(sub_ids)),
    )
    .execute(conn)?;
    diesel::delete(sub_trainings::table.filter(sub_trainings::id.eq_any(sub_ids))).execute(conn)
}

fn require_main_training(
    conn: &mut SqliteConnection,
    training_id: i32,
) -> Result<MainTraining, TrainingError> {
    get_main_training_by_id(conn, training_id)?.ok_or_else(|| {
        TrainingError::validation(format!("Main training with ID {} does not exist", training_id))
    })
}

/// Creates a sub-training under an existing main training.
pub fn insert_sub_training(
    conn: &mut SqliteConnection,
    input: SubTrainingInput,
) -> Result<SubTrainingView, TrainingError> {
    let period = ValidityPeriod::from_label(&input.validity_period)?;
    let main = require_main_training(conn, input.main_training_id)?;

    diesel::insert_into(sub_trainings::table)
        .values(&NewSubTraining {
            main_training_id: main.id,
            name: input.name,
            validity_days: period.days(),
        })
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    let sub = sub_trainings::table
        .filter(sub_trainings::id.eq(last_id))
        .select(SubTraining::as_select())
        .first(conn)?;
    SubTrainingView::new(sub, &main)
}

pub fn get_sub_training_by_id(
    conn: &mut SqliteConnection,
    sub_id: i32,
) -> Result<Option<SubTraining>, diesel::result::Error> {
    sub_trainings::table
        .filter(sub_trainings::id.eq(sub_id))
        .select(SubTraining::as_select())
        .first(conn)
        .optional()
}

pub fn get_sub_training_view(
    conn: &mut SqliteConnection,
    sub_id: i32,
) -> Result<Option<SubTrainingView>, TrainingError> {
    let row = sub_trainings::table
        .inner_join(main_trainings::table)
        .filter(sub_trainings::id.eq(sub_id))
        .select((SubTraining::as_select(), MainTraining::as_select()))
        .first::<(SubTraining, MainTraining)>(conn)
        .optional()?;
    row.map(|(sub, main)| SubTrainingView::new(sub, &main)).transpose()
}

/// Lists sub-trainings, optionally only those of one main training.
pub fn list_sub_training_views(
    conn: &mut SqliteConnection,
    main_training_id: Option<i32>,
) -> Result<Vec<SubTrainingView>, TrainingError> {
    let mut query = sub_trainings::table
        .inner_join(main_trainings::table)
        .select((SubTraining::as_select(), MainTraining::as_select()))
        .order(sub_trainings::id.asc())
        .into_boxed();
    if let Some(main_id) = main_training_id {
        query = query.filter(sub_trainings::main_training_id.eq(main_id));
    }

    query
        .load::<(SubTraining, MainTraining)>(conn)?
        .into_iter()
        .map(|(sub, main)| SubTrainingView::new(sub, &main))
        .collect()
}

/// Applies a partial update. When the validity period changes, every
/// assignment of the sub-training gets its expiration and warning
/// recomputed against `today`.
pub fn update_sub_training(
    conn: &mut SqliteConnection,
    sub_id: i32,
    update: SubTrainingUpdate,
    today: NaiveDate,
) -> Result<SubTrainingView, TrainingError> {
    conn.transaction(|conn| {
        let current = get_sub_training_by_id(conn, sub_id)?.ok_or_else(|| {
            TrainingError::not_found(format!("Sub-training with ID {} not found", sub_id))
        })?;

        let new_main_id = update.main_training_id.unwrap_or(current.main_training_id);
        let main = require_main_training(conn, new_main_id)?;
        let new_days = match update.validity_period.as_deref() {
            Some(label) => ValidityPeriod::from_label(label)?.days(),
            None => current.validity_days,
        };

        diesel::update(sub_trainings::table.filter(sub_trainings::id.eq(sub_id)))
            .set((
                sub_trainings::main_training_id.eq(new_main_id),
                sub_trainings::name.eq(update.name.unwrap_or(current.name)),
                sub_trainings::validity_days.eq(new_days),
            ))
            .execute(conn)?;

        if new_days != current.validity_days {
            let changed = recompute_for_sub_training(conn, sub_id, today)?;
            info!("Recomputed {} assignment(s) of sub-training {}", changed, sub_id);
        }

        let sub = sub_trainings::table
            .filter(sub_trainings::id.eq(sub_id))
            .select(SubTraining::as_select())
            .first(conn)?;
        SubTrainingView::new(sub, &main)
    })
}

/// Deletes a sub-training and its assignments.
pub fn delete_sub_training(
    conn: &mut SqliteConnection,
    sub_id: i32,
) -> Result<bool, diesel::result::Error> {
    conn.transaction(|conn| {
        let rows = delete_sub_trainings_with_assignments(conn, &[sub_id])?;
        Ok(rows > 0)
    })
}
