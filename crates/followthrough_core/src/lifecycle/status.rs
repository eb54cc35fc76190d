//! Status ordering.
//!
//! The lifecycle is a linear progression:
//! open → sent → waiting → followup → done

use crate::model::followup::FollowupStatus;

/// Canonical forward ordering of follow-up statuses.
pub const STATUS_ORDER: &[FollowupStatus] = &[
    FollowupStatus::Open,
    FollowupStatus::Sent,
    FollowupStatus::Waiting,
    FollowupStatus::Followup,
    FollowupStatus::Done,
];

/// Returns the next status in `STATUS_ORDER`, clamped at `Done`.
pub fn next_status(current: FollowupStatus) -> FollowupStatus {
    let last = STATUS_ORDER.len() - 1;
    let index = STATUS_ORDER
        .iter()
        .position(|&status| status == current)
        .unwrap_or(0);
    STATUS_ORDER[(index + 1).min(last)]
}

/// `Done` is terminal for forward progression.
pub fn is_terminal(status: FollowupStatus) -> bool {
    status == FollowupStatus::Done
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_linear() {
        assert_eq!(next_status(FollowupStatus::Open), FollowupStatus::Sent);
        assert_eq!(next_status(FollowupStatus::Sent), FollowupStatus::Waiting);
        assert_eq!(next_status(FollowupStatus::Waiting), FollowupStatus::Followup);
        assert_eq!(next_status(FollowupStatus::Followup), FollowupStatus::Done);
    }

    #[test]
    fn done_is_clamped() {
        assert_eq!(next_status(FollowupStatus::Done), FollowupStatus::Done);
        assert!(is_terminal(FollowupStatus::Done));
        assert!(!is_terminal(FollowupStatus::Followup));
    }

    #[test]
    fn five_steps_always_reach_done() {
        for &start in STATUS_ORDER {
            let mut status = start;
            for _ in 0..5 {
                status = next_status(status);
            }
            assert_eq!(status, FollowupStatus::Done, "start={start}");
        }
    }
}
