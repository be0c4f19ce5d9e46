//! Frontend Models
//!
//! Data structures matching the feedback service's JSON payloads.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Role determines what a user may do on boards and feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Moderator,
    /// Unknown roles fall back to the least privileged one
    #[default]
    #[serde(other)]
    Contributor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Moderator => "moderator",
            Role::Contributor => "contributor",
        }
    }

    /// Admins and moderators manage boards and any feedback item
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::Admin | Role::Moderator)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// A user reference: the service sends either a bare id or a nested user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Id(u32),
    User(User),
}

impl UserRef {
    pub fn id(&self) -> u32 {
        match self {
            UserRef::Id(id) => *id,
            UserRef::User(user) => user.id,
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            UserRef::Id(_) => None,
            UserRef::User(user) => Some(&user.username),
        }
    }
}

/// Feedback workflow status, in board column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    UnderReview,
    Completed,
    Rejected,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Open,
        Status::InProgress,
        Status::UnderReview,
        Status::Completed,
        Status::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in_progress",
            Status::UnderReview => "under_review",
            Status::Completed => "completed",
            Status::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Status::ALL.into_iter().find(|status| status.as_str() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::InProgress => "In Progress",
            Status::UnderReview => "Under Review",
            Status::Completed => "Completed",
            Status::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Priority::ALL.into_iter().find(|priority| priority.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: u32,
    pub name: String,
}

/// Tags arrive as names, primary keys or nested objects depending on the endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagRef {
    Name(String),
    Id(u32),
    Tag(Tag),
}

impl TagRef {
    pub fn label(&self) -> String {
        match self {
            TagRef::Name(name) => name.clone(),
            TagRef::Id(id) => format!("#{}", id),
            TagRef::Tag(tag) => tag.name.clone(),
        }
    }
}

/// Feedback item (feature request, bug report or suggestion)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: u32,
    /// Owning board (every item belongs to exactly one)
    pub board: u32,
    #[serde(default)]
    pub board_name: Option<String>,
    pub author: UserRef,
    #[serde(default)]
    pub author_name: Option<String>,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    /// Ids of users who upvoted
    #[serde(default)]
    pub upvotes: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upvote_count: Option<u32>,
    #[serde(default)]
    pub tags: Vec<TagRef>,
    #[serde(default)]
    pub comment_count: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Feedback {
    pub fn author_id(&self) -> u32 {
        self.author.id()
    }

    pub fn author_display(&self) -> String {
        self.author_name
            .clone()
            .or_else(|| self.author.username().map(str::to_string))
            .unwrap_or_else(|| format!("user #{}", self.author.id()))
    }

    pub fn vote_count(&self) -> u32 {
        self.upvote_count.unwrap_or(self.upvotes.len() as u32)
    }

    pub fn has_voted(&self, user_id: u32) -> bool {
        self.upvotes.contains(&user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub members: Vec<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_count: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Board {
    pub fn is_member(&self, user_id: u32) -> bool {
        self.members.iter().any(|member| member.id() == user_id)
    }

    pub fn member_total(&self) -> u32 {
        self.member_count.unwrap_or(self.members.len() as u32)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u32,
    #[serde(default)]
    pub feedback: Option<u32>,
    #[serde(default)]
    pub author: Option<UserRef>,
    #[serde(default)]
    pub author_name: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn author_display(&self) -> String {
        self.author_name
            .clone()
            .or_else(|| self.author.as_ref().and_then(|a| a.username().map(str::to_string)))
            .unwrap_or_else(|| "Anonymous".to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteAction {
    Added,
    Removed,
}

/// Response of the vote toggle endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteResult {
    #[serde(default)]
    pub success: bool,
    pub action: VoteAction,
    /// Upvote total after the toggle
    pub upvotes: u32,
}

/// Server-side status counts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackCounts {
    pub total: u32,
    pub active: u32,
    pub completed: u32,
    pub in_progress: u32,
    pub under_review: u32,
}

/// Submissions per day over the last 30 days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub day: NaiveDate,
    pub count: u32,
}

/// Login / register response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthTokens {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// List endpoints answer with a bare array or a paginated page
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Plain(Vec<T>),
    Page { results: Vec<T> },
}

impl<T> ListPayload<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListPayload::Plain(items) => items,
            ListPayload::Page { results } => results,
        }
    }
}

// ========================
// Request Payloads
// ========================

#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFeedback {
    pub title: String,
    pub content: String,
    pub board: u32,
    pub priority: Priority,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedbackPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl FeedbackPatch {
    pub fn status(status: Status) -> Self {
        Self { status: Some(status), ..Default::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBoard {
    pub name: String,
    pub description: String,
    pub is_public: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct NewComment<'a> {
    pub feedback: u32,
    pub content: &'a str,
}

/// Sort order understood by the list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ordering {
    #[default]
    Newest,
    Oldest,
    MostVoted,
    LeastVoted,
    TitleAsc,
    TitleDesc,
    Status,
}

impl Ordering {
    pub const ALL: [Ordering; 7] = [
        Ordering::Newest,
        Ordering::Oldest,
        Ordering::MostVoted,
        Ordering::LeastVoted,
        Ordering::TitleAsc,
        Ordering::TitleDesc,
        Ordering::Status,
    ];

    pub fn as_param(&self) -> &'static str {
        match self {
            Ordering::Newest => "-created_at",
            Ordering::Oldest => "created_at",
            Ordering::MostVoted => "-upvote_count",
            Ordering::LeastVoted => "upvote_count",
            Ordering::TitleAsc => "title",
            Ordering::TitleDesc => "-title",
            Ordering::Status => "status",
        }
    }

    pub fn from_param(s: &str) -> Self {
        Ordering::ALL
            .into_iter()
            .find(|ordering| ordering.as_param() == s)
            .unwrap_or_default()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Ordering::Newest => "Newest First",
            Ordering::Oldest => "Oldest First",
            Ordering::MostVoted => "Most Voted",
            Ordering::LeastVoted => "Least Voted",
            Ordering::TitleAsc => "Title A-Z",
            Ordering::TitleDesc => "Title Z-A",
            Ordering::Status => "By Status",
        }
    }
}

/// Query filters for the feedback list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackFilters {
    pub status: Option<Status>,
    pub search: String,
    pub ordering: Ordering,
    pub board: Option<u32>,
}

impl FeedbackFilters {
    /// Query parameters; empty filters are left out
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        let search = self.search.trim();
        if !search.is_empty() {
            query.push(("search", search.to_string()));
        }
        query.push(("ordering", self.ordering.as_param().to_string()));
        if let Some(board) = self.board {
            query.push(("board", board.to_string()));
        }
        query
    }
}
