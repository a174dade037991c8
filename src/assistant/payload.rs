//! Prompt construction and response parsing for the narrative assistant.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::AssistantError;
use crate::report::model::{CharacterScore, DevelopmentLevel, Grade, ReportRecord, Semester};

pub const NARRATIVE_FALLBACK: &str = "Gagal menghasilkan narasi.";
pub const TEACHER_NOTE_FALLBACK: &str = "Gagal menghasilkan catatan.";

pub const SYSTEM_INSTRUCTION: &str = "\
Anda adalah konsultan pendidikan anak usia dini (PAUD/TK) yang ahli.
Tugas anda adalah membuat narasi laporan perkembangan anak (Rapor) untuk TK Islam.
Gunakan bahasa Indonesia yang formal, sopan, mengapresiasi, dan mudah dipahami orang tua.
Buatlah narasi yang RINGKAS, PADAT, dan JELAS.
Fokus pada kekuatan anak, namun tetap memberikan saran stimulasi yang konstruktif.
Hindari kata-kata negatif. Gunakan pendekatan \"Sandwich\" (Pujian - Saran - Pujian).
Karena ini TK Islam, selipkan nilai-nilai keislaman jika relevan pada bagian karakter atau agama.";

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DevelopmentScore {
    pub scope: String,
    pub level: DevelopmentLevel,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CharacterEntry {
    pub aspect: String,
    pub score: CharacterScore,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DailyHighlight {
    pub activity: String,
    pub grade: Grade,
}

/// The part of the record the model gets to see.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromptPayload {
    pub student_name: String,
    pub semester: Semester,
    pub development_scores: Vec<DevelopmentScore>,
    pub character_scores: Vec<CharacterEntry>,
    pub daily_highlights: Vec<DailyHighlight>,
}

impl From<&ReportRecord> for PromptPayload {
    fn from(record: &ReportRecord) -> Self {
        Self {
            student_name: record.student.name.clone(),
            semester: record.student.semester,
            development_scores: record
                .development_items
                .iter()
                .map(|i| DevelopmentScore {
                    scope: i.scope.clone(),
                    level: i.level,
                })
                .collect(),
            character_scores: record
                .character_items
                .iter()
                .map(|c| CharacterEntry {
                    aspect: c.aspect.clone(),
                    score: c.score,
                })
                .collect(),
            daily_highlights: record
                .daily_activities
                .iter()
                .map(|d| DailyHighlight {
                    activity: d.activity.clone(),
                    grade: d.grade,
                })
                .collect(),
        }
    }
}

impl PromptPayload {
    /// The user prompt: the pretty-printed payload plus output instructions.
    pub fn prompt(&self) -> String {
        let payload = serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string());
        format!(
            "Buatkan narasi rapor untuk murid berikut:\n{payload}\n\n\
             Output yang diminta adalah JSON dengan format:\n\
             1. \"narrative\": Deskripsi perkembangan yang RINGKAS dan PADAT (maksimal 1 paragraf atau sekitar 5-8 kalimat saja). \
             Rangkum capaian terbaik dan area yang perlu stimulasi menjadi satu kesatuan yang mengalir. Jangan bertele-tele.\n\
             2. \"teacherNote\": Catatan Wali Kelas (singkat, 1-2 kalimat motivasi)."
        )
    }
}

/// JSON schema the model's answer must follow.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "narrative": { "type": "STRING" },
            "teacherNote": { "type": "STRING" }
        },
        "required": ["narrative", "teacherNote"]
    })
}

/// The two texts written back into the record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeTexts {
    pub narrative: String,
    pub teacher_note: String,
}

fn field_or(answer: &Value, key: &str, fallback: &str) -> String {
    answer
        .get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

impl NarrativeTexts {
    /// Read the model's answer. Each missing, empty or non-string field gets
    /// its own fallback text; an empty answer counts as `{}`. Text that is not
    /// JSON at all is a service failure.
    pub fn from_model_text(text: &str) -> Result<Self, AssistantError> {
        let text = if text.trim().is_empty() { "{}" } else { text };
        let answer: Value = serde_json::from_str(text)
            .map_err(|e| AssistantError::Service(format!("unreadable model answer: {e}")))?;

        Ok(Self {
            narrative: field_or(&answer, "narrative", NARRATIVE_FALLBACK),
            teacher_note: field_or(&answer, "teacherNote", TEACHER_NOTE_FALLBACK),
        })
    }
}
