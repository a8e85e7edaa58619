use serde::Deserialize;

/// The slice of a webhook delivery this bot actually reads. GitHub sends
/// much larger objects; everything else is dropped during deserialization.
#[derive(Debug, Deserialize)]
pub struct GitHubPayload {
    pub action: Option<String>,
    pub repository: Option<Repository>,
    pub issue: Option<Issue>,
    pub pull_request: Option<PullRequest>,
    pub changes: Option<Changes>,
}

#[derive(Debug, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: GitHubUser,
}

#[derive(Debug, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct Issue {
    pub number: u64,
}

#[derive(Debug, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub merged: bool,
    pub head: Branch,
}

#[derive(Debug, Deserialize)]
pub struct Branch {
    pub r#ref: String,
}

/// Previous values carried by `edited` events, only for the fields that
/// actually changed.
#[derive(Debug, Deserialize)]
pub struct Changes {
    pub title: Option<ChangesFrom>,
}

#[derive(Debug, Deserialize)]
pub struct ChangesFrom {
    pub from: String,
}

/// A delivery reduced to the event categories the bot reacts to.
#[derive(Debug)]
pub enum GitHubEvent {
    IssueOpened {
        issue: Issue,
    },
    PullRequestOpened {
        pull_request: PullRequest,
    },
    PullRequestEdited {
        pull_request: PullRequest,
        previous_title: Option<String>,
    },
    PullRequestMerged {
        pull_request: PullRequest,
    },
    Unsupported,
}

impl GitHubPayload {
    /// Owner login and repository name, when the delivery concerns a
    /// repository at all.
    pub fn repository_slug(&self) -> Option<(String, String)> {
        self.repository
            .as_ref()
            .map(|repository| (repository.owner.login.clone(), repository.name.clone()))
    }

    /// Computes the event category once, from the action and the objects
    /// present in the payload, so handlers never probe for keys themselves.
    ///
    /// A closed pull request is only interesting when it was merged, and
    /// that arm is matched before the generic opened/edited ones. Issue and
    /// pull request deliveries never carry each other's object, so the
    /// order of the remaining arms is not observable.
    pub fn into_event(self) -> GitHubEvent {
        match (self.action.as_deref(), self.issue, self.pull_request) {
            (Some("opened"), Some(issue), _) => GitHubEvent::IssueOpened { issue },
            (Some("closed"), _, Some(pull_request)) if pull_request.merged => {
                GitHubEvent::PullRequestMerged { pull_request }
            }
            (Some("opened"), _, Some(pull_request)) => {
                GitHubEvent::PullRequestOpened { pull_request }
            }
            (Some("edited"), _, Some(pull_request)) => GitHubEvent::PullRequestEdited {
                pull_request,
                previous_title: self
                    .changes
                    .and_then(|changes| changes.title)
                    .map(|title| title.from),
            },
            _ => GitHubEvent::Unsupported,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload(value: serde_json::Value) -> GitHubPayload {
        serde_json::from_value(value).unwrap()
    }

    fn repository() -> serde_json::Value {
        json!({ "name": "widgets", "owner": { "login": "acme" } })
    }

    #[test]
    fn opened_issue_is_classified() {
        let payload = payload(json!({
            "action": "opened",
            "repository": repository(),
            "issue": { "number": 12 },
        }));

        assert_eq!(
            payload.repository_slug(),
            Some(("acme".to_string(), "widgets".to_string()))
        );
        assert!(matches!(
            payload.into_event(),
            GitHubEvent::IssueOpened { issue } if issue.number == 12
        ));
    }

    #[test]
    fn merged_close_beats_the_generic_arms() {
        let payload = payload(json!({
            "action": "closed",
            "repository": repository(),
            "pull_request": {
                "number": 4,
                "title": "add feature",
                "merged": true,
                "head": { "ref": "feature" },
            },
        }));

        assert!(matches!(
            payload.into_event(),
            GitHubEvent::PullRequestMerged { pull_request } if pull_request.head.r#ref == "feature"
        ));
    }

    #[test]
    fn unmerged_close_is_ignored() {
        let payload = payload(json!({
            "action": "closed",
            "repository": repository(),
            "pull_request": {
                "number": 4,
                "title": "add feature",
                "merged": false,
                "head": { "ref": "feature" },
            },
        }));

        assert!(matches!(payload.into_event(), GitHubEvent::Unsupported));
    }

    #[test]
    fn opened_pull_request_is_classified() {
        let payload = payload(json!({
            "action": "opened",
            "repository": repository(),
            "pull_request": {
                "number": 9,
                "title": "WIP: add feature",
                "head": { "ref": "feature" },
            },
        }));

        assert!(matches!(
            payload.into_event(),
            GitHubEvent::PullRequestOpened { pull_request } if pull_request.title == "WIP: add feature"
        ));
    }

    #[test]
    fn opened_delivery_with_an_issue_is_an_issue_event() {
        // Real deliveries never carry both objects; if one did, the issue
        // arm wins.
        let payload = payload(json!({
            "action": "opened",
            "repository": repository(),
            "issue": { "number": 1 },
            "pull_request": {
                "number": 2,
                "title": "add feature",
                "head": { "ref": "feature" },
            },
        }));

        assert!(matches!(
            payload.into_event(),
            GitHubEvent::IssueOpened { issue } if issue.number == 1
        ));
    }

    #[test]
    fn edited_pull_request_carries_the_previous_title() {
        let payload = payload(json!({
            "action": "edited",
            "repository": repository(),
            "pull_request": {
                "number": 9,
                "title": "add feature",
                "head": { "ref": "feature" },
            },
            "changes": { "title": { "from": "WIP: add feature" } },
        }));

        assert!(matches!(
            payload.into_event(),
            GitHubEvent::PullRequestEdited { previous_title: Some(previous), .. }
                if previous == "WIP: add feature"
        ));
    }

    #[test]
    fn edited_body_has_no_previous_title() {
        let payload = payload(json!({
            "action": "edited",
            "repository": repository(),
            "pull_request": {
                "number": 9,
                "title": "add feature",
                "head": { "ref": "feature" },
            },
            "changes": { "body": { "from": "old description" } },
        }));

        assert!(matches!(
            payload.into_event(),
            GitHubEvent::PullRequestEdited { previous_title: None, .. }
        ));
    }

    #[test]
    fn unknown_actions_are_ignored() {
        let payload = payload(json!({
            "action": "labeled",
            "repository": repository(),
            "issue": { "number": 12 },
        }));

        assert!(matches!(payload.into_event(), GitHubEvent::Unsupported));
    }

    #[test]
    fn push_style_payloads_have_no_event() {
        // push deliveries have a repository but no action at all
        let payload = payload(json!({
            "ref": "refs/heads/main",
            "repository": repository(),
        }));

        assert!(payload.repository_slug().is_some());
        assert!(matches!(payload.into_event(), GitHubEvent::Unsupported));
    }

    #[test]
    fn ping_payloads_have_no_repository() {
        let payload = payload(json!({ "zen": "Keep it logically awesome.", "hook_id": 1 }));
        assert!(payload.repository_slug().is_none());
    }
}
