use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Workstation {
    pub id: i64,
    pub name: String,
    pub location_id: i64,
    pub track: bool, // ⇔ workstations.track (usage recorded / counted)
}
