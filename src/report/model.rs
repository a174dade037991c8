use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Semester pelajaran.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, ToSchema)]
pub enum Semester {
    /// Semester pertama (first half of the academic year)
    #[default]
    Ganjil,
    /// Semester kedua
    Genap,
}

impl Semester {
    pub fn label(&self) -> &'static str {
        match self {
            Semester::Ganjil => "Ganjil",
            Semester::Genap => "Genap",
        }
    }
}

/// Capaian perkembangan, ordered from lowest to highest.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, ToSchema,
)]
pub enum DevelopmentLevel {
    /// Belum Berkembang
    BB,
    /// Mulai Berkembang
    MB,
    /// Berkembang Sesuai Harapan
    #[default]
    BSH,
    /// Berkembang Sangat Baik
    BSB,
}

impl DevelopmentLevel {
    pub const ALL: [DevelopmentLevel; 4] = [
        DevelopmentLevel::BB,
        DevelopmentLevel::MB,
        DevelopmentLevel::BSH,
        DevelopmentLevel::BSB,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            DevelopmentLevel::BB => "BB",
            DevelopmentLevel::MB => "MB",
            DevelopmentLevel::BSH => "BSH",
            DevelopmentLevel::BSB => "BSB",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DevelopmentLevel::BB => "Belum Berkembang",
            DevelopmentLevel::MB => "Mulai Berkembang",
            DevelopmentLevel::BSH => "Berkembang Sesuai Harapan",
            DevelopmentLevel::BSB => "Berkembang Sangat Baik",
        }
    }
}

/// Predikat karakter.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, ToSchema,
)]
pub enum CharacterScore {
    #[serde(rename = "Sangat Baik")]
    SangatBaik,
    #[default]
    #[serde(rename = "Baik")]
    Baik,
    #[serde(rename = "Perlu Bimbingan")]
    PerluBimbingan,
}

impl CharacterScore {
    pub const ALL: [CharacterScore; 3] = [
        CharacterScore::SangatBaik,
        CharacterScore::Baik,
        CharacterScore::PerluBimbingan,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CharacterScore::SangatBaik => "Sangat Baik",
            CharacterScore::Baik => "Baik",
            CharacterScore::PerluBimbingan => "Perlu Bimbingan",
        }
    }
}

/// Nilai kegiatan harian. `B` is the middle rank and the default for new rows.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, ToSchema,
)]
pub enum Grade {
    A,
    #[default]
    B,
    C,
}

impl Grade {
    pub const ALL: [Grade; 3] = [Grade::A, Grade::B, Grade::C];

    pub fn letter(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentInfo {
    pub name: String,
    /// NIS / NISN
    pub nis: String,
    /// Tempat, tanggal lahir (free text)
    pub dob: String,
    pub parent_name: String,
    pub address: String,
    pub academic_year: String,
    pub semester: Semester,
    /// Kelompok / usia
    pub group: String,
    /// Embedded photo as a `data:` URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthData {
    /// Berat badan (kg)
    pub weight: String,
    /// Tinggi badan (cm)
    pub height: String,
    /// Lingkar kepala (cm)
    pub head_circumference: String,
    pub eyes: String,
    pub ears: String,
    pub teeth: String,
}

/// One row of the CPPA table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct DevelopmentItem {
    pub id: String,
    /// Lingkup perkembangan
    pub scope: String,
    pub description: String,
    pub level: DevelopmentLevel,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct DailyActivity {
    pub id: String,
    pub activity: String,
    pub indicator: String,
    pub grade: Grade,
    pub note: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct CharacterItem {
    pub id: String,
    pub aspect: String,
    pub score: CharacterScore,
}

/// Day counts. Each count is independent of the others.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, ToSchema)]
#[serde(default)]
pub struct Attendance {
    pub present: i32,
    pub sick: i32,
    pub permission: i32,
    /// Tanpa keterangan
    pub alpha: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Extracurricular {
    pub id: String,
    pub name: String,
    pub grade: String,
    pub note: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SignatureBlock {
    pub principal_name: String,
    pub teacher_name: String,
    /// ISO date (`YYYY-MM-DD`) as typed; rendered in Indonesian when parseable
    pub date: String,
    pub place: String,
}

/// The report being edited. Exactly one lives per session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportRecord {
    pub student: StudentInfo,
    pub health: HealthData,
    #[serde(rename = "cppa")]
    pub development_items: Vec<DevelopmentItem>,
    pub daily_activities: Vec<DailyActivity>,
    #[serde(rename = "character")]
    pub character_items: Vec<CharacterItem>,
    pub attendance: Attendance,
    #[serde(rename = "extras")]
    pub extracurriculars: Vec<Extracurricular>,
    pub narrative: String,
    pub teacher_note: String,
    #[serde(flatten)]
    pub signature: SignatureBlock,
}

/// List items addressed by their locally-unique identifier.
pub trait Keyed {
    fn id(&self) -> &str;
}

macro_rules! impl_keyed {
    ($($ty:ty),* $(,)?) => {
        $(impl Keyed for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })*
    };
}

impl_keyed!(DevelopmentItem, DailyActivity, CharacterItem, Extracurricular);

// ============================================================================
// Partial changes
// ============================================================================

#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatch {
    pub name: Option<String>,
    pub nis: Option<String>,
    pub dob: Option<String>,
    pub parent_name: Option<String>,
    pub address: Option<String>,
    pub academic_year: Option<String>,
    pub semester: Option<Semester>,
    pub group: Option<String>,
    /// Absent keeps the photo, `null` removes it.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub photo_url: Option<Option<String>>,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthPatch {
    pub weight: Option<String>,
    pub height: Option<String>,
    pub head_circumference: Option<String>,
    pub eyes: Option<String>,
    pub ears: Option<String>,
    pub teeth: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Copy, Default, ToSchema)]
pub struct AttendancePatch {
    pub present: Option<i32>,
    pub sick: Option<i32>,
    pub permission: Option<i32>,
    pub alpha: Option<i32>,
}

#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignaturePatch {
    pub principal_name: Option<String>,
    pub teacher_name: Option<String>,
    pub date: Option<String>,
    pub place: Option<String>,
}

/// Free-text sections D and H.
#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TextsPatch {
    pub narrative: Option<String>,
    pub teacher_note: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
pub struct DevelopmentItemPatch {
    pub scope: Option<String>,
    pub description: Option<String>,
    pub level: Option<DevelopmentLevel>,
}

#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
pub struct DailyActivityPatch {
    pub activity: Option<String>,
    pub indicator: Option<String>,
    pub grade: Option<Grade>,
    pub note: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
pub struct CharacterItemPatch {
    pub aspect: Option<String>,
    pub score: Option<CharacterScore>,
}

#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
pub struct ExtracurricularPatch {
    pub name: Option<String>,
    pub grade: Option<String>,
    pub note: Option<String>,
}
