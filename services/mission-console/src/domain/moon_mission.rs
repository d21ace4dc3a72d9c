use chrono::{Datelike, NaiveDate};

/// 月探査ミッションエンティティ（読み取り専用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoonMission {
    pub id: i32,
    pub spacecraft: String,
    pub launch_date: NaiveDate,
    pub carrier_rocket: Option<String>,
    pub operator: Option<String>,
    pub mission_type: Option<String>,
    pub outcome: Option<String>,
}

impl MoonMission {
    /// 打ち上げ年
    pub fn launch_year(&self) -> i32 {
        self.launch_date.year()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_year() {
        let mission = MoonMission {
            id: 1,
            spacecraft: "Apollo 11".to_string(),
            launch_date: NaiveDate::from_ymd_opt(1969, 7, 16).unwrap(),
            carrier_rocket: Some("Saturn V".to_string()),
            operator: Some("NASA".to_string()),
            mission_type: Some("Crewed landing".to_string()),
            outcome: Some("Successful".to_string()),
        };

        assert_eq!(mission.launch_year(), 1969);
    }
}
