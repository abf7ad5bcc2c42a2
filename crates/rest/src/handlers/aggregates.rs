//! Bootcamp aggregates derived from courses and reviews.

use devcamper_persistence::{DocumentStore, Filter, FindOptions};
use tracing::debug;

use super::records::save_record;
use crate::error::RestResult;
use crate::models::{Bootcamp, Course, Entity, Review};
use crate::state::AppState;

/// Mean tuition rounded down to a multiple of ten; zero without courses.
pub fn average_cost(tuitions: &[f64]) -> i64 {
    if tuitions.is_empty() {
        return 0;
    }
    let mean = tuitions.iter().sum::<f64>() / tuitions.len() as f64;
    ((mean / 10.0).floor() * 10.0) as i64
}

/// Mean rating; `None` without reviews.
pub fn average_rating(ratings: &[i64]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    Some(ratings.iter().sum::<i64>() as f64 / ratings.len() as f64)
}

async fn live_children<T, S>(state: &AppState<S>, bootcamp_id: &str) -> RestResult<Vec<T>>
where
    T: Entity,
    S: DocumentStore,
{
    let filter = Filter::live().with("bootcamp", bootcamp_id);
    state
        .storage()
        .find(T::COLLECTION, &filter, &FindOptions::new())
        .await?
        .into_iter()
        .map(T::from_document)
        .collect()
}

/// Loads the bootcamp unless it is missing or deleted.
async fn live_bootcamp<S: DocumentStore>(
    state: &AppState<S>,
    bootcamp_id: &str,
) -> RestResult<Option<Bootcamp>> {
    match state
        .storage()
        .find_by_id(Bootcamp::COLLECTION, bootcamp_id)
        .await?
    {
        Some(stored) if !stored.is_deleted() => {
            Bootcamp::from_document(stored.into_content()).map(Some)
        }
        _ => Ok(None),
    }
}

/// Recomputes `averageCost` from the bootcamp's live courses.
pub async fn refresh_average_cost<S: DocumentStore>(
    state: &AppState<S>,
    bootcamp_id: &str,
) -> RestResult<()> {
    let Some(mut bootcamp) = live_bootcamp(state, bootcamp_id).await? else {
        return Ok(());
    };
    let courses: Vec<Course> = live_children(state, bootcamp_id).await?;
    let tuitions: Vec<f64> = courses.iter().map(|c| c.tuition).collect();
    bootcamp.average_cost = Some(average_cost(&tuitions));
    debug!(bootcamp_id, average_cost = ?bootcamp.average_cost, "Updated bootcamp average cost");
    save_record(state, &bootcamp).await?;
    Ok(())
}

/// Recomputes `averageRating` from the bootcamp's live reviews.
pub async fn refresh_average_rating<S: DocumentStore>(
    state: &AppState<S>,
    bootcamp_id: &str,
) -> RestResult<()> {
    let Some(mut bootcamp) = live_bootcamp(state, bootcamp_id).await? else {
        return Ok(());
    };
    let reviews: Vec<Review> = live_children(state, bootcamp_id).await?;
    let ratings: Vec<i64> = reviews.iter().map(|r| r.rating).collect();
    bootcamp.average_rating = average_rating(&ratings);
    debug!(bootcamp_id, average_rating = ?bootcamp.average_rating, "Updated bootcamp average rating");
    save_record(state, &bootcamp).await?;
    Ok(())
}
