use todo_model::{Session, TaskQuery};

/// Top bar: auth actions when logged out, filters and sort when logged in.
pub fn render_navbar(session: &Session, query: &TaskQuery) -> String {
    if !session.is_authenticated {
        return "Todo | [login] Log In | [signup] Sign Up".to_string();
    }

    let email = session.email.as_deref().unwrap_or("signed in");
    let priority = query.priority.map_or("All", |p| p.label());
    let status = query.status.map_or("All", |s| s.label());
    let sort = query.sort.map_or("None", |k| k.label());
    format!(
        "Todo | {email} | [new] Create | Priority: {priority} | Completion: {status} | \
         Sort: {sort} ({}) | [logout] Log Out",
        query.order
    )
}

#[cfg(test)]
mod tests {
    use todo_model::{SortKey, SortOrder, TaskPriority};

    use super::*;

    #[test]
    fn logged_out_offers_login_and_signup() {
        let bar = render_navbar(&Session::anonymous(), &TaskQuery::new());
        assert!(bar.contains("Log In"));
        assert!(bar.contains("Sign Up"));
        assert!(!bar.contains("Create"));
    }

    #[test]
    fn logged_in_shows_selection() {
        let session = Session::authenticated(Some("ada@example.test".into()));
        let query = TaskQuery::new()
            .with_priority(Some(TaskPriority::High))
            .with_sort(Some(SortKey::Deadline))
            .with_order(SortOrder::Asc);

        let bar = render_navbar(&session, &query);
        assert!(bar.contains("ada@example.test"));
        assert!(bar.contains("Priority: High"));
        assert!(bar.contains("Completion: All"));
        assert!(bar.contains("Sort: Deadline (asc)"));
        assert!(bar.contains("Log Out"));
    }
}
