use crate::domain::entities::status::{Commodity, SampleStatus, UserRole};

// 2.5 m x 2.5 m plot.
pub const UBINAN_PLOT_AREA_M2: f64 = 6.25;

pub trait BrowseRecord {
    fn cell(&self, column: &str) -> String;
}

#[derive(Debug, Clone, PartialEq)]
pub struct UbinanRecord {
    pub id: i64,
    pub year: i32,
    pub subround: u8,
    pub kab: String,
    pub kec: String,
    pub commodity: Commodity,
    pub enumerator: String,
    pub plot_weight_kg: f64,
    pub status: SampleStatus,
}

impl UbinanRecord {
    pub fn productivity_ku_ha(&self) -> f64 {
        self.plot_weight_kg * (10_000.0 / UBINAN_PLOT_AREA_M2) / 100.0
    }
}

impl BrowseRecord for UbinanRecord {
    fn cell(&self, column: &str) -> String {
        match column {
            "id" => self.id.to_string(),
            "year" => self.year.to_string(),
            "subround" => self.subround.to_string(),
            "kab" => self.kab.clone(),
            "kec" => self.kec.clone(),
            "commodity" => self.commodity.label().to_string(),
            "enumerator" => self.enumerator.clone(),
            "plot_weight_kg" => format!("{:.2}", self.plot_weight_kg),
            "productivity" => format!("{:.2}", self.productivity_ku_ha()),
            "status" => self.status.label().to_string(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkgbSample {
    pub id: i64,
    pub year: i32,
    pub kab: String,
    pub kec: String,
    pub desa: String,
    pub segment_code: String,
    pub enumerator: String,
    pub status: SampleStatus,
}

impl BrowseRecord for SkgbSample {
    fn cell(&self, column: &str) -> String {
        match column {
            "id" => self.id.to_string(),
            "year" => self.year.to_string(),
            "kab" => self.kab.clone(),
            "kec" => self.kec.clone(),
            "desa" => self.desa.clone(),
            "segment_code" => self.segment_code.clone(),
            "enumerator" => self.enumerator.clone(),
            "status" => self.status.label().to_string(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub role: UserRole,
    pub kab: String,
}

impl BrowseRecord for UserAccount {
    fn cell(&self, column: &str) -> String {
        match column {
            "id" => self.id.to_string(),
            "username" => self.username.clone(),
            "full_name" => self.full_name.clone(),
            "role" => self.role.label().to_string(),
            "kab" => self.kab.clone(),
            _ => String::new(),
        }
    }
}
