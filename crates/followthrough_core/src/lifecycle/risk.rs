//! Advisory risk scoring.
//!
//! Scores are recomputed on every read and are only used for sorting and
//! highlighting. Nothing here writes to storage.

use super::due::days_from_today;
use crate::model::followup::{Followup, FollowupStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const MAX_SCORE: u32 = 100;
const HIGH_THRESHOLD: u8 = 60;
const MEDIUM_THRESHOLD: u8 = 25;
const MAX_REASONS: usize = 3;

/// Overdue bands, highest first. Only the first matching band applies.
const OVERDUE_BANDS: &[(i64, u32)] = &[(14, 65), (7, 45), (3, 25), (1, 10)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// 0..=100.
    pub score: u8,
    pub level: RiskLevel,
    pub reasons: Vec<String>,
    pub suggestion: String,
}

pub fn risk(followup: &Followup, today: NaiveDate) -> RiskAssessment {
    if followup.status == FollowupStatus::Done {
        return RiskAssessment {
            score: 0,
            level: RiskLevel::Low,
            reasons: Vec::new(),
            suggestion: suggestion(RiskLevel::Low, followup.status, 0).to_string(),
        };
    }

    let overdue = days_from_today(&followup.due_at, today)
        .map(|diff| (-diff).max(0))
        .unwrap_or(0);

    let raw = overdue_points(overdue) + status_points(followup.status);
    let score = u8::try_from(raw.min(MAX_SCORE)).unwrap_or(u8::MAX);
    let level = level_for(score);

    let mut reasons = Vec::new();
    if overdue > 0 {
        reasons.push(format!("Overdue {overdue} day(s)"));
    }
    reasons.push(format!("Status: {}", followup.status));
    reasons.truncate(MAX_REASONS);

    RiskAssessment {
        score,
        level,
        reasons,
        suggestion: suggestion(level, followup.status, overdue).to_string(),
    }
}

fn overdue_points(overdue: i64) -> u32 {
    OVERDUE_BANDS
        .iter()
        .find(|(min_days, _)| overdue >= *min_days)
        .map_or(0, |(_, points)| *points)
}

fn status_points(status: FollowupStatus) -> u32 {
    match status {
        FollowupStatus::Open => 5,
        FollowupStatus::Sent => 15,
        FollowupStatus::Waiting => 25,
        FollowupStatus::Followup => 35,
        FollowupStatus::Done => 0,
    }
}

fn level_for(score: u8) -> RiskLevel {
    if score >= HIGH_THRESHOLD {
        RiskLevel::High
    } else if score >= MEDIUM_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn suggestion(level: RiskLevel, status: FollowupStatus, overdue: i64) -> &'static str {
    match (level, status) {
        (RiskLevel::High, FollowupStatus::Waiting) => {
            "Follow up today: short check-in + 2 options."
        }
        (RiskLevel::High, FollowupStatus::Sent) => "Ping today: ask one clear question.",
        (RiskLevel::High, _) => "Act today: move it forward with a clear next step.",
        (RiskLevel::Medium, _) if overdue > 0 => "Schedule a reminder and send a short nudge.",
        (RiskLevel::Medium, _) => "Keep an eye on it; confirm next step.",
        (RiskLevel::Low, _) => "No action needed.",
    }
}
