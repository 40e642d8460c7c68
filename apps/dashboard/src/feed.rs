//! Paginated profile feed with keyboard navigation between cards.

use profile_board_common::{FeedPage, ProfileCard};
use tracing::warn;

use crate::gateway::{fetch, ApiRequest, Gateway, GatewayError};

pub const DEFAULT_PAGE_SIZE: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Idle,
    Busy,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    Start,
    End,
    Previous,
    Next,
}

#[derive(Debug, Clone)]
pub struct Feed {
    cards: Vec<ProfileCard>,
    total: Option<usize>,
    page_size: usize,
    status: FeedStatus,
    focus: Option<usize>,
}

impl Default for Feed {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Feed {
    pub fn new(page_size: usize) -> Self {
        Self {
            cards: Vec::new(),
            total: None,
            page_size,
            status: FeedStatus::Idle,
            focus: None,
        }
    }

    pub fn cards(&self) -> &[ProfileCard] {
        &self.cards
    }

    pub fn status(&self) -> FeedStatus {
        self.status
    }

    pub fn focused(&self) -> Option<usize> {
        self.focus
    }

    /// True until a page has shown every profile.
    pub fn has_more(&self) -> bool {
        self.total.map_or(true, |total| self.cards.len() < total)
    }

    /// A loaded feed with no profiles at all.
    pub fn is_empty(&self) -> bool {
        self.total == Some(0)
    }

    /// Fetches the next page and focuses its first card. Returns how many
    /// cards were added.
    pub async fn load_more(&mut self, gateway: &dyn Gateway) -> Result<usize, GatewayError> {
        if self.status == FeedStatus::Busy || !self.has_more() {
            return Ok(0);
        }
        self.status = FeedStatus::Busy;

        let offset = self.cards.len();
        let request = ApiRequest::get(format!("/users?offset={offset}&limit={}", self.page_size));
        let page = match fetch::<FeedPage>(gateway, &request).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Feed page at offset {} failed: {}", offset, e);
                self.status = FeedStatus::Error;
                return Err(e);
            }
        };

        let added = page.users.len();
        self.cards.extend(page.users);
        if added > 0 {
            self.total = Some(usize::try_from(page.total).unwrap_or(0));
            self.focus = Some(offset);
        } else {
            // Profiles were removed since the count was taken.
            self.total = Some(self.cards.len());
        }
        self.status = FeedStatus::Idle;
        Ok(added)
    }

    /// Moves focus between cards, wrapping at both ends.
    pub fn navigate(&mut self, action: CardAction) -> Option<usize> {
        let len = self.cards.len();
        if len == 0 {
            return None;
        }
        let current = self.focus.unwrap_or(0).min(len - 1);
        let next = match action {
            CardAction::Start => 0,
            CardAction::End => len - 1,
            CardAction::Previous => (current + len - 1) % len,
            CardAction::Next => (current + 1) % len,
        };
        self.focus = Some(next);
        self.focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Method;
    use crate::testing::RecordingGateway;
    use serde_json::{json, Value};

    fn cards(ids: std::ops::Range<i64>) -> Value {
        Value::Array(
            ids.map(|id| {
                json!({
                    "id": id,
                    "first_name": format!("User{id}"),
                    "last_name": null,
                    "summary": null,
                    "desired_title": null,
                    "area_of_work": null,
                    "image": null
                })
            })
            .collect(),
        )
    }

    #[tokio::test]
    async fn test_pages_until_total_reached() {
        let gateway = RecordingGateway::new();
        gateway.respond(
            Method::Get,
            "/users?offset=0&limit=2",
            json!({"users": cards(1..3), "total": 3}),
        );
        gateway.respond(
            Method::Get,
            "/users?offset=2&limit=2",
            json!({"users": cards(3..4), "total": 3}),
        );
        let mut feed = Feed::new(2);
        assert!(feed.has_more());

        assert_eq!(feed.load_more(&gateway).await.unwrap(), 2);
        assert_eq!(feed.focused(), Some(0));
        assert!(feed.has_more());

        assert_eq!(feed.load_more(&gateway).await.unwrap(), 1);
        assert_eq!(feed.focused(), Some(2));
        assert!(!feed.has_more());

        assert_eq!(feed.load_more(&gateway).await.unwrap(), 0);
        assert_eq!(gateway.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_short_page_ends_paging() {
        let gateway = RecordingGateway::new();
        gateway.respond(
            Method::Get,
            "/users?offset=0&limit=2",
            json!({"users": cards(1..3), "total": 5}),
        );
        gateway.respond(
            Method::Get,
            "/users?offset=2&limit=2",
            json!({"users": [], "total": 5}),
        );
        let mut feed = Feed::new(2);
        feed.load_more(&gateway).await.unwrap();
        assert!(feed.has_more());

        assert_eq!(feed.load_more(&gateway).await.unwrap(), 0);
        assert!(!feed.has_more());
        assert_eq!(feed.load_more(&gateway).await.unwrap(), 0);
        assert_eq!(gateway.calls().len(), 2);
        assert_eq!(feed.focused(), Some(0));
    }

    #[tokio::test]
    async fn test_empty_feed() {
        let gateway = RecordingGateway::new();
        gateway.respond(
            Method::Get,
            "/users?offset=0&limit=14",
            json!({"users": [], "total": 0}),
        );
        let mut feed = Feed::default();
        feed.load_more(&gateway).await.unwrap();
        assert!(feed.is_empty());
        assert_eq!(feed.navigate(CardAction::Next), None);
    }

    #[tokio::test]
    async fn test_failed_page_sets_error() {
        let gateway = RecordingGateway::new();
        gateway.fail(Method::Get, "/users?offset=0&limit=14", 500, "down");
        let mut feed = Feed::default();
        assert!(feed.load_more(&gateway).await.is_err());
        assert_eq!(feed.status(), FeedStatus::Error);
        assert!(feed.cards().is_empty());
    }

    #[tokio::test]
    async fn test_navigation_wraps() {
        let gateway = RecordingGateway::new();
        gateway.respond(
            Method::Get,
            "/users?offset=0&limit=14",
            json!({"users": cards(1..4), "total": 3}),
        );
        let mut feed = Feed::default();
        feed.load_more(&gateway).await.unwrap();

        assert_eq!(feed.navigate(CardAction::Previous), Some(2));
        assert_eq!(feed.navigate(CardAction::Next), Some(0));
        assert_eq!(feed.navigate(CardAction::End), Some(2));
        assert_eq!(feed.navigate(CardAction::Next), Some(0));
        assert_eq!(feed.navigate(CardAction::Start), Some(0));
    }
}
