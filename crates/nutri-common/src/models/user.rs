use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Accepted values for `gender`
pub const GENDERS: &[&str] = &["M", "F", "O"];

/// User profile (safe for client responses -- no password_hash)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub target_weight: Option<f64>,
    pub current_weight: Option<f64>,
    pub height: Option<i32>,
    pub weekly_physical_activity: Option<i32>,
    pub gender: Option<String>,
    pub dietary_restriction: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Partial profile update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub target_weight: Option<f64>,
    pub current_weight: Option<f64>,
    pub height: Option<i32>,
    pub weekly_physical_activity: Option<i32>,
    pub gender: Option<String>,
    pub dietary_restriction: Option<String>,
    pub birthday: Option<NaiveDate>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_update_missing_fields_default_to_none() {
        let update: ProfileUpdate =
            serde_json::from_str(r#"{"height": 180, "gender": "M"}"#).unwrap();
        assert_eq!(update.height, Some(180));
        assert_eq!(update.gender.as_deref(), Some("M"));
        assert!(update.target_weight.is_none());
        assert!(update.birthday.is_none());
        assert!(!update.is_empty());
    }

    #[test]
    fn test_profile_update_parses_birthday() {
        let update: ProfileUpdate = serde_json::from_str(r#"{"birthday": "2000-01-01"}"#).unwrap();
        assert_eq!(
            update.birthday,
            Some(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
        );
    }

    #[test]
    fn test_empty_profile_update() {
        let update: ProfileUpdate = serde_json::from_str("{}").unwrap();
        assert!(update.is_empty());
    }
}
