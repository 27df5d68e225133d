//! Session/trace context
//!
//! Correlation metadata attached to tracing spans. The id buckets all
//! same-day traffic for one role together, which is intentional: traces
//! for a given agent on a given UTC day share one session.

use chrono::Utc;

#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
    pub tags: Vec<String>,
}

impl SessionContext {
    /// Derive a context from the role name and the current UTC date.
    pub fn new(role: &str) -> Self {
        let date = Utc::now().date_naive();
        Self {
            session_id: format!("{}-{}", role, date),
            tags: vec![role.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_shape() {
        let session = SessionContext::new("orchestrator");
        assert!(session.session_id.starts_with("orchestrator-"));
        // Suffix is a YYYY-MM-DD date
        let date_part = session.session_id.trim_start_matches("orchestrator-");
        assert!(chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_same_day_same_role_collides_by_design() {
        let a = SessionContext::new("gitlab-agent");
        let b = SessionContext::new("gitlab-agent");
        assert_eq!(a.session_id, b.session_id);
    }

    #[test]
    fn test_tags_contain_role() {
        let session = SessionContext::new("documents-agent");
        assert_eq!(session.tags, vec!["documents-agent".to_string()]);
    }
}
