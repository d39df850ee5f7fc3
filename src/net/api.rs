//! Typed endpoint helpers, one section per backend domain.
//!
//! All of these are thin: build a path, run it through the pipeline,
//! unwrap the envelope into a domain type. Anything interesting (token
//! attachment, recovery, toasts) already happened in `pipeline`.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde_json::{Value, json};

use crate::net::classify::ApiError;
use crate::net::http::Method;
use crate::net::pipeline::ApiClient;
use crate::net::types::{
    AuthResponse, BanRequest, Comment, CreateComment, CreatePost, CreateReport, CurrentUser,
    LoginRequest, Notification, Page, Post, ReactRequest, ReactionSummary, RegisterRequest,
    UpdatePost, UpdateProfile, UserProfile,
};

impl ApiClient {
    // =============================================================
    // Auth
    // =============================================================

    /// Log in and install the returned access token. The current-user
    /// snapshot refresh is kicked off in the background.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let resp: AuthResponse = self.post("/auth/login", request).await?;
        self.install_token(&resp.token);
        Ok(resp)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let resp: AuthResponse = self.post("/auth/register", request).await?;
        self.install_token(&resp.token);
        Ok(resp)
    }

    /// Best-effort server logout; local token and snapshot are cleared
    /// regardless of the call's outcome.
    pub async fn logout(&self) {
        self.fire_and_forget(Method::Post, "/auth/logout").await;
        self.token().clear();
        self.session().clear_user();
    }

    /// Authenticated "who am I" probe. The only success path that
    /// replaces the session snapshot.
    pub async fn fetch_current_user(&self) -> Result<CurrentUser, ApiError> {
        let user: CurrentUser = self.get("/auth/me").await?;
        self.session().set_user(user.clone());
        Ok(user)
    }

    /// Store the token and refresh the snapshot asynchronously
    /// (fire-and-forget from the caller's perspective).
    pub fn install_token(&self, token: &str) {
        self.token().set(token);
        let client = self.clone();
        self.spawn(Box::pin(async move {
            let _ = client.fetch_current_user().await;
        }));
    }

    // =============================================================
    // Posts
    // =============================================================

    pub async fn posts(&self, page: u32, size: u32) -> Result<Page<Post>, ApiError> {
        self.get(&format!("/posts?page={page}&size={size}")).await
    }

    pub async fn post_by_id(&self, id: u64) -> Result<Post, ApiError> {
        self.get(&format!("/posts/{id}")).await
    }

    pub async fn user_posts(&self, user_id: u64, page: u32, size: u32) -> Result<Page<Post>, ApiError> {
        self.get(&format!("/posts/user/{user_id}?page={page}&size={size}"))
            .await
    }

    pub async fn create_post(&self, post: &CreatePost) -> Result<Post, ApiError> {
        self.post("/posts", post).await
    }

    pub async fn update_post(&self, id: u64, update: &UpdatePost) -> Result<Post, ApiError> {
        self.put(&format!("/posts/{id}"), update).await
    }

    pub async fn delete_post(&self, id: u64) -> Result<(), ApiError> {
        let _: Value = self.delete(&format!("/posts/{id}")).await?;
        Ok(())
    }

    // =============================================================
    // Comments
    // =============================================================

    pub async fn post_comments(
        &self,
        post_id: u64,
        page: u32,
        size: u32,
    ) -> Result<Page<Comment>, ApiError> {
        self.get(&format!("/comments/post/{post_id}?page={page}&size={size}"))
            .await
    }

    pub async fn create_comment(&self, comment: &CreateComment) -> Result<Comment, ApiError> {
        self.post("/comments", comment).await
    }

    pub async fn update_comment(&self, id: u64, content: &str) -> Result<Comment, ApiError> {
        self.put(&format!("/comments/{id}"), &json!({ "content": content }))
            .await
    }

    pub async fn delete_comment(&self, id: u64) -> Result<(), ApiError> {
        let _: Value = self.delete(&format!("/comments/{id}")).await?;
        Ok(())
    }

    // =============================================================
    // Reactions
    // =============================================================

    pub async fn post_reactions(&self, post_id: u64) -> Result<ReactionSummary, ApiError> {
        self.get(&format!("/reacts/posts/{post_id}")).await
    }

    pub async fn react_to_post(
        &self,
        post_id: u64,
        request: &ReactRequest,
    ) -> Result<ReactionSummary, ApiError> {
        self.post(&format!("/reacts/posts/{post_id}"), request).await
    }

    pub async fn remove_post_reaction(&self, post_id: u64) -> Result<ReactionSummary, ApiError> {
        self.delete(&format!("/reacts/posts/{post_id}")).await
    }

    pub async fn comment_reactions(&self, comment_id: u64) -> Result<ReactionSummary, ApiError> {
        self.get(&format!("/reacts/comments/{comment_id}")).await
    }

    pub async fn react_to_comment(
        &self,
        comment_id: u64,
        request: &ReactRequest,
    ) -> Result<ReactionSummary, ApiError> {
        self.post(&format!("/reacts/comments/{comment_id}"), request)
            .await
    }

    pub async fn remove_comment_reaction(
        &self,
        comment_id: u64,
    ) -> Result<ReactionSummary, ApiError> {
        self.delete(&format!("/reacts/comments/{comment_id}")).await
    }

    // =============================================================
    // Users & follows
    // =============================================================

    pub async fn user_profile(&self, user_id: u64) -> Result<UserProfile, ApiError> {
        self.get(&format!("/users/{user_id}")).await
    }

    /// Avatars are optional; a missing one is `Ok(None)`, not an error.
    pub async fn user_avatar(&self, user_id: u64) -> Result<Option<String>, ApiError> {
        self.get_optional(&format!("/users/{user_id}/avatar")).await
    }

    pub async fn update_profile(&self, update: &UpdateProfile) -> Result<CurrentUser, ApiError> {
        let user: CurrentUser = self.put("/users/current", update).await?;
        self.session().set_user(user.clone());
        Ok(user)
    }

    pub async fn follow_user(&self, user_id: u64) -> Result<(), ApiError> {
        let _: Value = self.post(&format!("/users/{user_id}/follow"), &json!({})).await?;
        Ok(())
    }

    pub async fn unfollow_user(&self, user_id: u64) -> Result<(), ApiError> {
        let _: Value = self.delete(&format!("/users/{user_id}/follow")).await?;
        Ok(())
    }

    // =============================================================
    // Reports
    // =============================================================

    pub async fn create_report(&self, report: &CreateReport) -> Result<(), ApiError> {
        let _: Value = self.post("/reports", report).await?;
        Ok(())
    }

    pub async fn resolve_report(&self, report_id: u64) -> Result<(), ApiError> {
        let _: Value = self
            .put(&format!("/reports/{report_id}/resolve"), &json!({}))
            .await?;
        Ok(())
    }

    // =============================================================
    // Notifications
    // =============================================================

    /// Fetch a page of notifications and mirror it into the feed store.
    pub async fn notifications(&self, page: u32, size: u32) -> Result<Page<Notification>, ApiError> {
        let result: Page<Notification> = self
            .get(&format!("/notifications?page={page}&size={size}"))
            .await?;
        self.feed().set_all(result.content.clone());
        Ok(result)
    }

    pub async fn unread_notifications(&self) -> Result<Page<Notification>, ApiError> {
        self.get("/notifications/unread").await
    }

    pub async fn mark_notification_read(&self, id: u64) -> Result<(), ApiError> {
        let _: Value = self
            .put(&format!("/notifications/{id}/read"), &json!({}))
            .await?;
        self.feed().mark_read(id);
        Ok(())
    }

    pub async fn mark_all_notifications_read(&self) -> Result<(), ApiError> {
        let _: Value = self.put("/notifications/read-all", &json!({})).await?;
        self.feed().mark_all_read();
        Ok(())
    }

    pub async fn delete_notification(&self, id: u64) -> Result<(), ApiError> {
        let _: Value = self.delete(&format!("/notifications/{id}")).await?;
        self.feed().remove(id);
        Ok(())
    }

    // =============================================================
    // Admin moderation
    // =============================================================

    pub async fn ban_user(&self, user_id: u64, request: &BanRequest) -> Result<(), ApiError> {
        let _: Value = self.post(&format!("/admin/users/{user_id}/ban"), request).await?;
        Ok(())
    }

    pub async fn unban_user(&self, user_id: u64) -> Result<(), ApiError> {
        let _: Value = self
            .post(&format!("/admin/users/{user_id}/unban"), &json!({}))
            .await?;
        Ok(())
    }

    pub async fn hide_post(&self, post_id: u64) -> Result<(), ApiError> {
        let _: Value = self
            .put(&format!("/admin/posts/{post_id}/hide"), &json!({}))
            .await?;
        Ok(())
    }

    pub async fn unhide_post(&self, post_id: u64) -> Result<(), ApiError> {
        let _: Value = self
            .put(&format!("/admin/posts/{post_id}/unhide"), &json!({}))
            .await?;
        Ok(())
    }

    pub async fn hide_comment(&self, comment_id: u64) -> Result<(), ApiError> {
        let _: Value = self
            .put(&format!("/admin/comments/{comment_id}/hide"), &json!({}))
            .await?;
        Ok(())
    }

    pub async fn unhide_comment(&self, comment_id: u64) -> Result<(), ApiError> {
        let _: Value = self
            .put(&format!("/admin/comments/{comment_id}/unhide"), &json!({}))
            .await?;
        Ok(())
    }

    pub async fn admin_delete_post(&self, post_id: u64) -> Result<(), ApiError> {
        let _: Value = self.delete(&format!("/admin/posts/{post_id}")).await?;
        Ok(())
    }
}
