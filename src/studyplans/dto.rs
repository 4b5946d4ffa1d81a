use serde::{Deserialize, Serialize};
use time::Date;

use super::repo::{StudyPlan, StudySession};

#[derive(Debug, Deserialize)]
pub struct StudyPlanRequest {
    pub title: String,
    pub description: String,
    #[serde(rename = "startDate")]
    pub start_date: Option<Date>,
    #[serde(rename = "endDate")]
    pub end_date: Option<Date>,
    #[serde(rename = "focusDuration")]
    pub focus_duration: Option<i32>,
    #[serde(rename = "breakDuration")]
    pub break_duration: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecordSessionRequest {
    pub duration: i32,
    #[serde(rename = "sessionType")]
    pub session_type: String,
}

/// Plan with its sessions, as returned by GET /studyplans/:id.
#[derive(Debug, Serialize)]
pub struct StudyPlanDetails {
    #[serde(flatten)]
    pub plan: StudyPlan,
    pub sessions: Vec<StudySession>,
}

#[derive(Debug, Serialize)]
pub struct RecordedSessionResponse {
    pub message: String,
    pub session: StudySession,
    #[serde(rename = "sessionsCompleted")]
    pub sessions_completed: i32,
    #[serde(rename = "totalFocusTime")]
    pub total_focus_time: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_request_parses_iso_dates() {
        let req: StudyPlanRequest = serde_json::from_str(
            r#"{
                "title": "Rust in a month",
                "description": "Daily drills",
                "startDate": "2026-09-01",
                "endDate": "2026-09-30"
            }"#,
        )
        .unwrap();
        assert_eq!(req.title, "Rust in a month");
        assert!(req.start_date.is_some());
        assert!(req.end_date.is_some());
        assert!(req.focus_duration.is_none());
    }

    #[test]
    fn session_request_parses_session_type() {
        let req: RecordSessionRequest =
            serde_json::from_str(r#"{"duration":1500,"sessionType":"focus"}"#).unwrap();
        assert_eq!(req.duration, 1500);
        assert_eq!(req.session_type, "focus");
    }
}
