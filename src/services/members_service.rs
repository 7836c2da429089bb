//! Member and likes queries for one browsing session

use parking_lot::Mutex;
use shared::{endpoint_path, ApiClient, Member, PaginatedResult, Result, User};
use tracing::{debug, info};

use crate::cache::{MemberCache, MemberPage};
use crate::cache_key::CacheKey;
use crate::filters::{build_params, FilterSet};
use crate::models::{LikesParams, MemberDetail, UserParams};
use crate::services::AccountService;

const USERS_ENDPOINT: &str = "users";
const LIKES_ENDPOINT: &str = "likes";

/// Member queries backed by a page cache.
///
/// One instance per session: the cache, the roster and the user snapshot all
/// live as long as the service does.
pub struct MembersService {
    client: ApiClient,
    cache: MemberCache,
    /// Members fetched one by one, kept in sync by `update_member`
    roster: Mutex<Vec<Member>>,
    user: Option<User>,
    user_params: Mutex<UserParams>,
}

impl MembersService {
    pub fn new(client: ApiClient, user: Option<User>, cache_capacity: usize) -> Self {
        let user_params = UserParams::for_session(user.as_ref());
        Self {
            client,
            cache: MemberCache::new(cache_capacity),
            roster: Mutex::new(Vec::new()),
            user,
            user_params: Mutex::new(user_params),
        }
    }

    /// Seeds the filter defaults from whoever is signed in right now.
    pub fn for_account(client: ApiClient, account: &AccountService, cache_capacity: usize) -> Self {
        Self::new(client, account.current_user(), cache_capacity)
    }

    pub fn get_user_params(&self) -> UserParams {
        self.user_params.lock().clone()
    }

    pub fn set_user_params(&self, params: UserParams) {
        *self.user_params.lock() = params;
    }

    /// Rebuilds the defaults from the user captured at construction.
    pub fn reset_user_params(&self) -> UserParams {
        let params = UserParams::for_session(self.user.as_ref());
        *self.user_params.lock() = params.clone();
        params
    }

    pub async fn get_members(&self, params: &UserParams) -> Result<MemberPage> {
        self.list_members(&params.to_filter_set()).await
    }

    /// Cached member listing; identical filters share one request.
    pub async fn list_members(&self, filters: &FilterSet) -> Result<MemberPage> {
        let key = CacheKey::from_filters(filters);
        let params = build_params(filters);
        let client = self.client.clone();

        self.cache
            .get_or_fetch(key, move || async move {
                client
                    .get_paginated::<Vec<Member>>(USERS_ENDPOINT, params.pairs())
                    .await
            })
            .await
    }

    /// Looks through cached pages first, then asks the API directly.
    /// A directly fetched member is not added to the cache.
    pub async fn get_member(&self, username: &str) -> Result<Member> {
        if let Some(member) = self.cache.find_member(username) {
            debug!("Member {} served from cached pages", username);
            return Ok(member);
        }

        let member: Member = self
            .client
            .get(&endpoint_path(&[USERS_ENDPOINT, username])?)
            .await?;
        self.remember(member.clone());
        Ok(member)
    }

    pub async fn get_member_detail(&self, username: &str) -> Result<MemberDetail> {
        let member = self.get_member(username).await?;
        Ok(MemberDetail::new(member))
    }

    pub async fn update_member(&self, member: &Member) -> Result<()> {
        self.client.put(USERS_ENDPOINT, member).await?;

        {
            let mut roster = self.roster.lock();
            match roster.iter_mut().find(|m| m.username == member.username) {
                Some(existing) => *existing = member.clone(),
                None => debug!("Updated member {} is not in the roster", member.username),
            }
        }

        self.cache.invalidate_all();
        info!("✏️ Member {} updated", member.username);
        Ok(())
    }

    pub async fn set_main_photo(&self, photo_id: i64) -> Result<()> {
        self.client
            .put(
                &format!("{}/set-main-photo/{}", USERS_ENDPOINT, photo_id),
                &serde_json::json!({}),
            )
            .await?;
        self.cache.invalidate_all();
        Ok(())
    }

    pub async fn delete_photo(&self, photo_id: i64) -> Result<()> {
        self.client
            .delete(&format!("{}/delete-photo/{}", USERS_ENDPOINT, photo_id))
            .await?;
        self.cache.invalidate_all();
        Ok(())
    }

    pub async fn add_like(&self, username: &str) -> Result<()> {
        self.client
            .post_empty(&endpoint_path(&[LIKES_ENDPOINT, username])?)
            .await
    }

    /// Likes are never cached.
    pub async fn get_likes(&self, params: &LikesParams) -> Result<PaginatedResult<Vec<Member>>> {
        let params = build_params(&params.to_filter_set());
        self.client
            .get_paginated(LIKES_ENDPOINT, params.pairs())
            .await
    }

    pub fn cache(&self) -> &MemberCache {
        &self.cache
    }

    pub fn roster(&self) -> Vec<Member> {
        self.roster.lock().clone()
    }

    fn remember(&self, member: Member) {
        let mut roster = self.roster.lock();
        match roster.iter_mut().find(|m| m.username == member.username) {
            Some(existing) => *existing = member,
            None => roster.push(member),
        }
    }
}
