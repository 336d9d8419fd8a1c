//! Forum orchestration: existence and status preconditions, role gates and
//! defaulting in front of the repositories.
//!
//! Every method takes the pool by `&self`; the repositories own the
//! transactions. Handlers translate HTTP to these calls and nothing else,
//! so integration tests can drive the whole workflow without a router.

use quire_core::doc_graph::{clamp_depth, traverse, DocGraph};
use quire_core::error::CoreError;
use quire_core::pagination::{Page, PageRequest};
use quire_core::roles::Caller;
use quire_core::topic::{BoardStatus, TopicStatus};
use quire_core::validation::{
    ensure_not_blank, ensure_unique_ids, validate_request, validate_slug,
};
use quire_core::vote::VoteValue;
use quire_db::models::board::{Board, CreateBoard};
use quire_db::models::contribution::ContributorStat;
use quire_db::models::doc_link::{CreateDocLink, DocLink};
use quire_db::models::merge_job::{
    AppliedMerge, ApplyMergeJob, CreateMergeJob, MergeJob, MergeJobDetail,
};
use quire_db::models::post::{CreatePost, Post};
use quire_db::models::solution::TopicSolution;
use quire_db::models::topic::{CreateTopic, Topic};
use quire_db::models::vote::VoteOutcome;
use quire_db::models::wiki_revision::{CreateWikiRevision, WikiRevision};
use quire_db::repositories::{
    BoardRepo, ContributionRepo, DocLinkRepo, MergeJobRepo, PoolLinkSource, PostRepo, PostVotes,
    SolutionRepo, TopicRepo, TopicVotes, VoteRepo, WikiRevisionRepo,
};
use quire_db::DbPool;

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct ForumService {
    pool: DbPool,
}

impl ForumService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn ensure_board(&self, id: &str) -> AppResult<Board> {
        BoardRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CoreError::not_found("board", id).into())
    }

    async fn ensure_topic(&self, id: &str) -> AppResult<Topic> {
        TopicRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CoreError::not_found("topic", id).into())
    }

    async fn ensure_post(&self, id: &str) -> AppResult<Post> {
        PostRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CoreError::not_found("post", id).into())
    }

    // -----------------------------------------------------------------------
    // Boards and topics
    // -----------------------------------------------------------------------

    pub async fn create_board(&self, caller: &Caller, input: &CreateBoard) -> AppResult<Board> {
        caller.require_admin_or_moderator()?;
        validate_request(input)?;
        validate_slug(&input.slug)?;
        ensure_not_blank("name", &input.name)?;

        let board = BoardRepo::create(&self.pool, &caller.user_id, input)
            .await
            .map_err(|err| match &err {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::Core(
                    CoreError::Conflict(format!("Board slug '{}' is already taken", input.slug)),
                ),
                _ => AppError::Database(err),
            })?;

        tracing::info!(
            board_id = %board.id,
            slug = %board.slug,
            user_id = %caller.user_id,
            "Board created"
        );
        Ok(board)
    }

    pub async fn get_board(&self, id: &str) -> AppResult<Board> {
        self.ensure_board(id).await
    }

    /// Topics can only be opened on an active board.
    pub async fn create_topic(&self, caller: &Caller, input: &CreateTopic) -> AppResult<Topic> {
        validate_request(input)?;
        ensure_not_blank("title", &input.title)?;

        let board = self.ensure_board(&input.board_id).await?;
        if board.status != BoardStatus::Active.as_str() {
            return Err(CoreError::Forbidden(format!("Board {} is disabled", board.id)).into());
        }

        let topic = TopicRepo::create(&self.pool, &caller.user_id, input).await?;
        tracing::info!(
            topic_id = %topic.id,
            board_id = %topic.board_id,
            user_id = %caller.user_id,
            wiki = topic.is_wiki_enabled,
            "Topic created"
        );
        Ok(topic)
    }

    pub async fn get_topic(&self, id: &str) -> AppResult<Topic> {
        self.ensure_topic(id).await
    }

    /// Newest first.
    pub async fn list_topics(&self, board_id: &str, page: PageRequest) -> AppResult<Page<Topic>> {
        self.ensure_board(board_id).await?;
        let (topics, total) = TopicRepo::list_by_board(&self.pool, board_id, page).await?;
        tracing::debug!(count = topics.len(), total, board_id = %board_id, "Listed topics");
        Ok(Page::new(topics, total, page))
    }

    pub async fn set_topic_status(
        &self,
        caller: &Caller,
        topic_id: &str,
        status: TopicStatus,
    ) -> AppResult<Topic> {
        caller.require_admin_or_moderator()?;
        let topic = TopicRepo::set_status(&self.pool, topic_id, status)
            .await?
            .ok_or_else(|| CoreError::not_found("topic", topic_id))?;
        tracing::info!(
            topic_id = %topic_id,
            status = %status,
            user_id = %caller.user_id,
            "Topic status changed"
        );
        Ok(topic)
    }

    // -----------------------------------------------------------------------
    // Posts
    // -----------------------------------------------------------------------

    /// Replies are refused once a topic is closed.
    pub async fn create_post(
        &self,
        caller: &Caller,
        topic_id: &str,
        input: &CreatePost,
    ) -> AppResult<Post> {
        validate_request(input)?;
        ensure_not_blank("original_text", &input.original_text)?;

        let topic = self.ensure_topic(topic_id).await?;
        if topic.is_closed() {
            return Err(CoreError::Forbidden(format!("Topic {topic_id} is closed")).into());
        }

        let post = PostRepo::create(&self.pool, topic_id, &caller.user_id, input).await?;
        tracing::info!(
            post_id = %post.id,
            topic_id = %topic_id,
            user_id = %caller.user_id,
            "Post created"
        );
        Ok(post)
    }

    /// Oldest first, archived posts included.
    pub async fn list_posts(&self, topic_id: &str, page: PageRequest) -> AppResult<Page<Post>> {
        self.ensure_topic(topic_id).await?;
        let (posts, total) = PostRepo::list_by_topic(&self.pool, topic_id, page).await?;
        tracing::debug!(count = posts.len(), total, topic_id = %topic_id, "Listed posts");
        Ok(Page::new(posts, total, page))
    }

    // -----------------------------------------------------------------------
    // Wiki
    // -----------------------------------------------------------------------

    /// The revision the topic currently points at, if any.
    pub async fn get_current_wiki(&self, topic_id: &str) -> AppResult<Option<WikiRevision>> {
        let topic = self.ensure_topic(topic_id).await?;
        match topic.current_wiki_revision_id.as_deref() {
            Some(revision_id) => Ok(WikiRevisionRepo::find_by_id(&self.pool, revision_id).await?),
            None => Ok(None),
        }
    }

    pub async fn create_wiki_revision(
        &self,
        caller: &Caller,
        topic_id: &str,
        input: &CreateWikiRevision,
    ) -> AppResult<WikiRevision> {
        validate_request(input)?;
        ensure_not_blank("document", &input.document)?;

        let topic = self.ensure_topic(topic_id).await?;
        if !topic.is_wiki_enabled {
            return Err(
                CoreError::Forbidden(format!("Wiki is not enabled on topic {topic_id}")).into(),
            );
        }

        let revision =
            WikiRevisionRepo::create_and_make_current(&self.pool, topic_id, &caller.user_id, input)
                .await?;
        Ok(revision)
    }

    /// Newest first.
    pub async fn list_wiki_revisions(&self, topic_id: &str) -> AppResult<Vec<WikiRevision>> {
        self.ensure_topic(topic_id).await?;
        let revisions = WikiRevisionRepo::list_by_topic(&self.pool, topic_id).await?;
        tracing::debug!(count = revisions.len(), topic_id = %topic_id, "Listed wiki revisions");
        Ok(revisions)
    }

    /// A revision of another topic is reported as not found.
    pub async fn get_wiki_revision(
        &self,
        topic_id: &str,
        revision_id: &str,
    ) -> AppResult<WikiRevision> {
        WikiRevisionRepo::find_by_id(&self.pool, revision_id)
            .await?
            .filter(|revision| revision.topic_id == topic_id)
            .ok_or_else(|| CoreError::not_found("wiki_revision", revision_id).into())
    }

    // -----------------------------------------------------------------------
    // Merge jobs
    // -----------------------------------------------------------------------

    /// Every named post must exist in the topic.
    pub async fn create_merge_job(
        &self,
        caller: &Caller,
        topic_id: &str,
        input: &CreateMergeJob,
    ) -> AppResult<MergeJobDetail> {
        validate_request(input)?;
        ensure_unique_ids("post_ids", &input.post_ids)?;
        self.ensure_topic(topic_id).await?;

        let posts = PostRepo::find_in_topic(&self.pool, topic_id, &input.post_ids).await?;
        if posts.len() != input.post_ids.len() {
            let missing = input
                .post_ids
                .iter()
                .find(|id| !posts.iter().any(|post| &post.id == *id))
                .cloned()
                .unwrap_or_default();
            return Err(CoreError::not_found("post", missing).into());
        }

        let detail = MergeJobRepo::create(&self.pool, topic_id, &caller.user_id, input).await?;
        tracing::info!(
            merge_job_id = %detail.job.id,
            topic_id = %topic_id,
            posts = detail.post_refs.len(),
            user_id = %caller.user_id,
            "Merge job created"
        );
        Ok(detail)
    }

    pub async fn get_merge_job(&self, topic_id: &str, job_id: &str) -> AppResult<MergeJobDetail> {
        let job = MergeJobRepo::find_by_id(&self.pool, job_id)
            .await?
            .filter(|job| job.topic_id == topic_id)
            .ok_or_else(|| CoreError::not_found("merge_job", job_id))?;
        let post_refs = MergeJobRepo::list_post_refs(&self.pool, job_id).await?;
        Ok(MergeJobDetail { job, post_refs })
    }

    pub async fn review_merge_job(
        &self,
        caller: &Caller,
        topic_id: &str,
        job_id: &str,
    ) -> AppResult<MergeJob> {
        caller.require_admin_or_moderator()?;
        Ok(MergeJobRepo::mark_reviewed(&self.pool, topic_id, job_id, &caller.user_id).await?)
    }

    /// Apply a job as `caller`, who is recorded as reviewer and editor.
    ///
    /// Retrying an applied job returns its recorded revision unchanged.
    pub async fn apply_merge_job(
        &self,
        caller: &Caller,
        topic_id: &str,
        job_id: &str,
        input: &ApplyMergeJob,
    ) -> AppResult<AppliedMerge> {
        caller.require_admin_or_moderator()?;
        validate_request(input)?;
        ensure_not_blank("document", &input.document)?;

        Ok(MergeJobRepo::apply(&self.pool, topic_id, job_id, &caller.user_id, input).await?)
    }

    /// Total credited weight per user, heaviest first.
    pub async fn list_contributors(&self, topic_id: &str) -> AppResult<Vec<ContributorStat>> {
        self.ensure_topic(topic_id).await?;
        Ok(ContributionRepo::list_contributors(&self.pool, topic_id).await?)
    }

    // -----------------------------------------------------------------------
    // Solutions and votes
    // -----------------------------------------------------------------------

    /// The accepted post must be a reply in the same topic.
    pub async fn set_topic_solution(
        &self,
        caller: &Caller,
        topic_id: &str,
        post_id: &str,
    ) -> AppResult<TopicSolution> {
        self.ensure_topic(topic_id).await?;
        let post = self.ensure_post(post_id).await?;
        if post.topic_id != topic_id {
            return Err(CoreError::Validation(format!(
                "post {post_id} does not belong to topic {topic_id}"
            ))
            .into());
        }

        let solution = SolutionRepo::upsert(&self.pool, topic_id, post_id, &caller.user_id).await?;
        tracing::info!(
            topic_id = %topic_id,
            post_id = %post_id,
            user_id = %caller.user_id,
            "Topic solution set"
        );
        Ok(solution)
    }

    pub async fn vote_topic(
        &self,
        caller: &Caller,
        topic_id: &str,
        value: i64,
    ) -> AppResult<VoteOutcome> {
        let value = VoteValue::try_from(value)?;
        self.ensure_topic(topic_id).await?;
        let outcome =
            VoteRepo::upsert::<TopicVotes>(&self.pool, topic_id, &caller.user_id, value).await?;
        tracing::info!(
            topic_id = %topic_id,
            user_id = %caller.user_id,
            delta = outcome.delta,
            "Topic vote recorded"
        );
        Ok(outcome)
    }

    pub async fn vote_post(
        &self,
        caller: &Caller,
        post_id: &str,
        value: i64,
    ) -> AppResult<VoteOutcome> {
        let value = VoteValue::try_from(value)?;
        self.ensure_post(post_id).await?;
        let outcome =
            VoteRepo::upsert::<PostVotes>(&self.pool, post_id, &caller.user_id, value).await?;
        tracing::info!(
            post_id = %post_id,
            user_id = %caller.user_id,
            delta = outcome.delta,
            "Post vote recorded"
        );
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Document graph
    // -----------------------------------------------------------------------

    /// Link two existing topics; the type defaults to `related`.
    pub async fn add_doc_link(&self, input: &CreateDocLink) -> AppResult<DocLink> {
        self.ensure_topic(&input.source_topic_id).await?;
        self.ensure_topic(&input.target_topic_id).await?;

        let link_type = input.link_type.unwrap_or_default();
        let link = DocLinkRepo::create(
            &self.pool,
            &input.source_topic_id,
            &input.target_topic_id,
            link_type,
        )
        .await?;
        tracing::info!(
            link_id = %link.id,
            source_topic_id = %link.source_topic_id,
            target_topic_id = %link.target_topic_id,
            "Doc link created"
        );
        Ok(link)
    }

    pub async fn get_doc_graph(
        &self,
        root_topic_id: &str,
        depth: Option<i32>,
    ) -> AppResult<DocGraph<DocLink>> {
        self.ensure_topic(root_topic_id).await?;
        let depth = clamp_depth(depth);
        let graph = traverse(&PoolLinkSource::new(&self.pool), root_topic_id, depth).await?;
        tracing::debug!(
            root_topic_id = %root_topic_id,
            depth,
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "Doc graph expanded"
        );
        Ok(graph)
    }
}
