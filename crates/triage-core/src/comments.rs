//! Comment-thread analysis for the follow-up workflow.
//!
//! Finds a user's own comments on a ticket, their latest one, and whether
//! anyone else has replied since. Timestamps are compared as raw strings,
//! which is only valid for fixed-width ISO-8601 values.

use serde::Serialize;

use crate::document::flatten;
use crate::domain::Comment;

/// Read-only view over a ticket's comments.
#[derive(Debug, Clone, Copy)]
pub struct CommentThread<'a> {
    comments: &'a [Comment],
}

/// Formatted comment groups handed to the follow-up workflow.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct FollowupContext {
    pub has_followup: bool,
    pub user_comments: String,
    pub new_comments: String,
}

impl<'a> CommentThread<'a> {
    pub fn new(comments: &'a [Comment]) -> Self {
        Self { comments }
    }

    /// Comments authored by `account_id`, in thread order.
    pub fn comments_by(&self, account_id: &str) -> Vec<&'a Comment> {
        if account_id.is_empty() {
            return Vec::new();
        }
        self.comments.iter().filter(|c| c.is_by(account_id)).collect()
    }

    /// The user's comment with the greatest `created` timestamp.
    pub fn latest_by(&self, account_id: &str) -> Option<&'a Comment> {
        self.comments_by(account_id)
            .into_iter()
            .reduce(|best, c| if c.created > best.created { c } else { best })
    }

    /// Comments created strictly after `timestamp`, optionally excluding one author.
    pub fn comments_after(
        &self,
        timestamp: &str,
        exclude_account_id: Option<&str>,
    ) -> Vec<&'a Comment> {
        if timestamp.is_empty() {
            return Vec::new();
        }
        self.comments
            .iter()
            .filter(|c| c.created.as_str() > timestamp)
            .filter(|c| match exclude_account_id {
                Some(excluded) if !excluded.is_empty() => !c.is_by(excluded),
                _ => true,
            })
            .collect()
    }

    /// Replies from other authors after the user's latest comment.
    pub fn replies_since_latest(&self, account_id: &str) -> Vec<&'a Comment> {
        match self.latest_by(account_id) {
            Some(latest) => self.comments_after(&latest.created, Some(account_id)),
            None => Vec::new(),
        }
    }

    /// Whether someone else commented after the user's latest comment.
    pub fn has_followup_from_others(&self, account_id: &str) -> bool {
        !self.replies_since_latest(account_id).is_empty()
    }

    /// Own comments and new replies, formatted for the follow-up workflow.
    pub fn followup_context(&self, account_id: &str) -> FollowupContext {
        let own = self.comments_by(account_id);
        let replies = self.replies_since_latest(account_id);

        let user_comments = own
            .iter()
            .map(|c| format!("[{}]: {}", display_timestamp(&c.created), flatten(&c.body).trim()))
            .collect::<Vec<_>>()
            .join("\n");

        let new_comments = replies
            .iter()
            .map(|c| {
                format!(
                    "[Comment by {} at {}]: {}",
                    c.author_name(),
                    display_timestamp(&c.created),
                    flatten(&c.body).trim()
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        FollowupContext {
            has_followup: !replies.is_empty(),
            user_comments,
            new_comments,
        }
    }
}

/// Format every non-empty comment as `[Comment i by author]: text` for classification.
pub fn format_for_analysis(comments: &[Comment]) -> String {
    comments
        .iter()
        .enumerate()
        .filter_map(|(i, c)| {
            let text = flatten(&c.body);
            let text = text.trim();
            if text.is_empty() {
                None
            } else {
                Some(format!("[Comment {} by {}]: {}", i + 1, c.author_name(), text))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `2024-01-02T10:00:00.000+0000` → `2024-01-02 10:00:00`.
fn display_timestamp(created: &str) -> String {
    created.chars().take(19).collect::<String>().replace('T', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CommentAuthor;
    use serde_json::json;

    fn comment(account: &str, name: &str, created: &str, body: &str) -> Comment {
        Comment {
            author: CommentAuthor {
                account_id: account.to_string(),
                display_name: Some(name.to_string()),
            },
            body: json!(body),
            created: created.to_string(),
        }
    }

    fn thread() -> Vec<Comment> {
        vec![
            comment("me", "Me", "2024-03-01T09:00:00.000+0000", "first pass"),
            comment("bo", "Bo", "2024-03-01T10:00:00.000+0000", "question"),
            comment("me", "Me", "2024-03-02T09:00:00.000+0000", "answered"),
            comment("bo", "Bo", "2024-03-03T09:00:00.000+0000", "thanks, one more"),
            comment("me", "Me", "2024-03-01T12:00:00.000+0000", "late import"),
        ]
    }

    #[test]
    fn test_comments_by_keeps_thread_order() {
        let comments = thread();
        let own = CommentThread::new(&comments).comments_by("me");
        let bodies: Vec<_> = own.iter().map(|c| c.body.as_str().unwrap_or("")).collect();
        assert_eq!(bodies, vec!["first pass", "answered", "late import"]);
    }

    #[test]
    fn test_latest_by_uses_created_not_position() {
        let comments = thread();
        let latest = CommentThread::new(&comments).latest_by("me").expect("latest");
        assert_eq!(latest.created, "2024-03-02T09:00:00.000+0000");
    }

    #[test]
    fn test_comments_after_with_exclusion() {
        let comments = thread();
        let t = CommentThread::new(&comments);
        assert_eq!(t.comments_after("2024-03-01T11:00:00.000+0000", None).len(), 3);
        let others = t.comments_after("2024-03-01T11:00:00.000+0000", Some("me"));
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].author.account_id, "bo");
    }

    #[test]
    fn test_followup_detected() {
        let comments = thread();
        assert!(CommentThread::new(&comments).has_followup_from_others("me"));
    }

    #[test]
    fn test_no_followup_when_user_is_last() {
        let mut comments = thread();
        comments.push(comment("me", "Me", "2024-03-04T09:00:00.000+0000", "done"));
        assert!(!CommentThread::new(&comments).has_followup_from_others("me"));
    }

    #[test]
    fn test_reply_at_same_timestamp_is_not_followup() {
        let comments = vec![
            comment("me", "Me", "2024-03-02T09:00:00.000+0000", "answered"),
            comment("bo", "Bo", "2024-03-02T09:00:00.000+0000", "simultaneous"),
        ];
        let t = CommentThread::new(&comments);
        assert!(t.replies_since_latest("me").is_empty());
        assert!(!t.has_followup_from_others("me"));
        assert!(!t.followup_context("me").has_followup);
    }

    #[test]
    fn test_no_followup_without_user_comments() {
        let comments = thread();
        let t = CommentThread::new(&comments);
        assert!(!t.has_followup_from_others("nobody"));
        assert!(t.latest_by("nobody").is_none());
    }

    #[test]
    fn test_empty_inputs() {
        let t = CommentThread::new(&[]);
        assert!(t.comments_by("me").is_empty());
        assert!(!t.has_followup_from_others("me"));

        let comments = thread();
        let t = CommentThread::new(&comments);
        assert!(t.comments_by("").is_empty());
        assert!(t.comments_after("", None).is_empty());
    }

    #[test]
    fn test_followup_context_formatting() {
        let comments = thread();
        let ctx = CommentThread::new(&comments).followup_context("me");
        assert!(ctx.has_followup);
        assert_eq!(
            ctx.user_comments,
            "[2024-03-01 09:00:00]: first pass\n[2024-03-02 09:00:00]: answered\n[2024-03-01 12:00:00]: late import"
        );
        assert_eq!(ctx.new_comments, "[Comment by Bo at 2024-03-03 09:00:00]: thanks, one more");
    }

    #[test]
    fn test_format_for_analysis_skips_empty_bodies() {
        let mut comments = thread();
        comments.truncate(2);
        comments.insert(1, comment("x", "X", "2024-03-01T09:30:00.000+0000", "   "));
        assert_eq!(
            format_for_analysis(&comments),
            "[Comment 1 by Me]: first pass\n[Comment 3 by Bo]: question"
        );
    }
}
