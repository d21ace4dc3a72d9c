use crate::commands::CommandResult;
use crate::domain::MoonMission;
use crate::repository::MoonMissionRepository;

/// ミッション一覧
pub async fn list_missions(repo: &dyn MoonMissionRepository) -> CommandResult<Vec<MoonMission>> {
    let missions = repo.find_all().await?;
    tracing::debug!(count = missions.len(), "missions listed");
    Ok(missions)
}

/// ID 指定でミッションを取得
pub async fn get_mission(
    repo: &dyn MoonMissionRepository,
    mission_id: i32,
) -> CommandResult<Option<MoonMission>> {
    Ok(repo.find_by_id(mission_id).await?)
}

/// 年別ミッション数
pub async fn count_missions_by_year(
    repo: &dyn MoonMissionRepository,
    year: i32,
) -> CommandResult<i64> {
    Ok(repo.count_by_year(year).await?)
}

/// 宇宙船名の一覧
pub async fn list_spacecraft(repo: &dyn MoonMissionRepository) -> CommandResult<Vec<String>> {
    Ok(repo.list_spacecraft().await?)
}

/// 年別件数の表示文言
pub fn count_message(year: i32, count: i64) -> String {
    match count {
        0 => format!("No missions found for year: {}", year),
        1 => format!("Found 1 mission for year: {}", year),
        n => format!("Found {} missions for year: {}", n, year),
    }
}

/// ミッション詳細の表示文言（未設定の項目は "-"）
pub fn mission_details(mission: &MoonMission) -> String {
    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    format!(
        "---Mission Details---\n\
         Mission id: {}\n\
         Spacecraft: {}\n\
         Launch date: {}\n\
         Carrier rocket: {}\n\
         Operator: {}\n\
         Mission type: {}\n\
         Outcome: {}",
        mission.id,
        mission.spacecraft,
        mission.launch_date,
        optional(&mission.carrier_rocket),
        optional(&mission.operator),
        optional(&mission.mission_type),
        optional(&mission.outcome),
    )
}
