//! Read side of the `contribution_credits` ledger. Rows are written only by
//! [`MergeJobRepo::apply`](crate::repositories::MergeJobRepo::apply).

use crate::models::contribution::{ContributionCredit, ContributorStat};
use crate::DbPool;

/// Column list for contribution_credits queries.
const COLUMNS: &str = "id, topic_id, revision_id, user_id, weight, created_at";

pub struct ContributionRepo;

impl ContributionRepo {
    /// Total weight per user on a topic, heaviest first (ties by user id).
    pub async fn list_contributors(
        pool: &DbPool,
        topic_id: &str,
    ) -> Result<Vec<ContributorStat>, sqlx::Error> {
        sqlx::query_as::<_, ContributorStat>(
            "SELECT user_id, SUM(weight) AS total_weight
             FROM contribution_credits
             WHERE topic_id = ?1
             GROUP BY user_id
             ORDER BY total_weight DESC, user_id ASC",
        )
        .bind(topic_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_by_revision(
        pool: &DbPool,
        revision_id: &str,
    ) -> Result<Vec<ContributionCredit>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contribution_credits
             WHERE revision_id = ?1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, ContributionCredit>(&query)
            .bind(revision_id)
            .fetch_all(pool)
            .await
    }
}
