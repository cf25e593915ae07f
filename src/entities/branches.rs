use chrono::{DateTime, Utc, Weekday};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "branches")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Comma separated weekday codes, e.g. `MON,WED,FRI`
    pub delivery_days: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn delivery_weekdays(&self) -> Vec<Weekday> {
        parse_delivery_days(&self.delivery_days)
    }

    pub fn delivers_on(&self, day: Weekday) -> bool {
        self.delivery_weekdays().contains(&day)
    }
}

/// Unknown codes are skipped.
pub fn parse_delivery_days(raw: &str) -> Vec<Weekday> {
    raw.split(',')
        .filter_map(|code| match code.trim().to_ascii_uppercase().as_str() {
            "MON" => Some(Weekday::Mon),
            "TUE" => Some(Weekday::Tue),
            "WED" => Some(Weekday::Wed),
            "THU" => Some(Weekday::Thu),
            "FRI" => Some(Weekday::Fri),
            "SAT" => Some(Weekday::Sat),
            "SUN" => Some(Weekday::Sun),
            _ => None,
        })
        .collect()
}

pub fn format_delivery_days(days: &[Weekday]) -> String {
    days.iter()
        .map(|d| d.to_string().to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delivery_days() {
        let days = parse_delivery_days("MON, wed,FRI,xyz");
        assert_eq!(days, vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]);
        assert!(parse_delivery_days("").is_empty());
    }

    #[test]
    fn test_format_delivery_days() {
        assert_eq!(
            format_delivery_days(&[Weekday::Tue, Weekday::Sat]),
            "TUE,SAT"
        );
    }
}
