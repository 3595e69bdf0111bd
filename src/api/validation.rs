use std::str::FromStr;

use super::ApiError;
use crate::constants::limits::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::game::BattleAction;
use crate::models::{Severity, VulnStatus};

pub fn validate_id(id: i32, resource: &str) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {} ID: {}. ID must be a positive integer",
            resource, id
        )));
    }
    Ok(id)
}

pub fn validate_rating(rating: i32) -> Result<i32, ApiError> {
    if !(1..=5).contains(&rating) {
        return Err(ApiError::validation(format!(
            "Invalid rating: {}. Rating must be between 1 and 5",
            rating
        )));
    }
    Ok(rating)
}

/// Normalizes (page, page_size) query input: page defaults to 1,
/// page_size is clamped into 1..=MAX.
pub fn validate_paging(page: Option<u64>, page_size: Option<u64>) -> Result<(u64, u64), ApiError> {
    let page = page.unwrap_or(1);
    if page == 0 {
        return Err(ApiError::validation("Page numbers start at 1"));
    }

    let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ApiError::validation(format!(
            "Invalid page size: {}. Must be between 1 and {}",
            page_size, MAX_PAGE_SIZE
        )));
    }

    Ok((page, page_size))
}

pub fn parse_battle_action(action: &str) -> Result<BattleAction, ApiError> {
    BattleAction::from_str(action).map_err(|_| {
        ApiError::validation(format!(
            "Invalid action: '{}'. Must be one of: attack, defend, skill",
            action
        ))
    })
}

pub fn parse_severity(severity: &str) -> Result<Severity, ApiError> {
    Severity::from_str(severity).map_err(|_| {
        ApiError::validation(format!(
            "Invalid severity: '{}'. Must be one of: low, medium, high, critical",
            severity
        ))
    })
}

pub fn parse_status(status: &str) -> Result<VulnStatus, ApiError> {
    VulnStatus::from_str(status).map_err(|_| {
        ApiError::validation(format!(
            "Invalid status: '{}'. Must be one of: open, in_progress, resolved, closed",
            status
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id(1, "quest").is_ok());
        assert!(validate_id(12345, "quest").is_ok());
        assert!(validate_id(0, "quest").is_err());
        assert!(validate_id(-1, "quest").is_err());
    }

    #[test]
    fn test_validate_rating() {
        for rating in 1..=5 {
            assert!(validate_rating(rating).is_ok());
        }
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn test_validate_paging() {
        assert_eq!(validate_paging(None, None).unwrap(), (1, DEFAULT_PAGE_SIZE));
        assert_eq!(validate_paging(Some(3), Some(50)).unwrap(), (3, 50));
        assert!(validate_paging(Some(0), None).is_err());
        assert!(validate_paging(None, Some(0)).is_err());
        assert!(validate_paging(None, Some(MAX_PAGE_SIZE + 1)).is_err());
    }

    #[test]
    fn test_parse_battle_action() {
        assert!(parse_battle_action("attack").is_ok());
        assert!(parse_battle_action("defend").is_ok());
        assert!(parse_battle_action("skill").is_ok());
        assert!(parse_battle_action("run").is_err());
    }

    #[test]
    fn test_parse_severity_and_status() {
        assert!(parse_severity("critical").is_ok());
        assert!(parse_severity("apocalyptic").is_err());
        assert!(parse_status("in_progress").is_ok());
        assert!(parse_status("wontfix").is_err());
    }
}
