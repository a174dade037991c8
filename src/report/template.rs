//! The record every session starts from.

use chrono::Local;

use super::model::*;

fn development(id: &str, scope: &str, description: &str, level: DevelopmentLevel) -> DevelopmentItem {
    DevelopmentItem {
        id: id.to_string(),
        scope: scope.to_string(),
        description: description.to_string(),
        level,
    }
}

fn character(id: &str, aspect: &str, score: CharacterScore) -> CharacterItem {
    CharacterItem {
        id: id.to_string(),
        aspect: aspect.to_string(),
        score,
    }
}

fn daily(id: &str, activity: &str, indicator: &str, grade: Grade, note: &str) -> DailyActivity {
    DailyActivity {
        id: id.to_string(),
        activity: activity.to_string(),
        indicator: indicator.to_string(),
        grade,
        note: note.to_string(),
    }
}

/// Today's date as `YYYY-MM-DD`.
pub fn today_iso() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Build the fixed starting record.
pub fn initial_record() -> ReportRecord {
    use CharacterScore::{Baik, SangatBaik};
    use DevelopmentLevel::{BSB, BSH, MB};

    ReportRecord {
        student: StudentInfo {
            name: "Muhammad Fatih Al-Farisi".to_string(),
            nis: "2024001".to_string(),
            dob: "Jatisela, 12 Mei 2019".to_string(),
            parent_name: "..............................".to_string(),
            address: "Jl. Merpati No. 10, Jatisela".to_string(),
            academic_year: "2024/2025".to_string(),
            semester: Semester::Ganjil,
            group: "B (Usia 5-6 Tahun)".to_string(),
            photo_url: None,
        },
        health: HealthData {
            weight: "18".to_string(),
            height: "110".to_string(),
            head_circumference: "50".to_string(),
            eyes: "Normal".to_string(),
            ears: "Normal".to_string(),
            teeth: "Bersih/Sehat".to_string(),
        },
        development_items: vec![
            development("1", "Nilai Agama & Budi Pekerti", "Mengenal Allah, berdoa, perilaku jujur & sopan", BSH),
            development("2", "Fisik Motorik", "Motorik kasar (berlari, melompat) & halus (menulis, menggambar)", BSH),
            development("3", "Kognitif", "Pemecahan masalah, berpikir logis, mengenal angka & pola", MB),
            development("4", "Bahasa", "Memahami bahasa reseptif & ekspresif, keaksaraan awal", BSH),
            development("5", "Sosial Emosional", "Kesadaran diri, tanggung jawab, perilaku prososial", BSB),
            development("6", "Seni", "Mengekspresikan diri melalui karya seni & musik", MB),
        ],
        daily_activities: vec![
            daily("d1", "Sholat Dhuha Berjamaah", "Mampu mengikuti gerakan sholat", Grade::A, "Sangat khusyuk"),
            daily("d2", "Proyek Menanam Biji Kacang", "Mengamati pertumbuhan tanaman", Grade::B, "Antusias menyiram"),
        ],
        character_items: vec![
            character("c1", "Sikap Spiritual (Ketaatan Beribadah)", Baik),
            character("c2", "Sikap Sosial (Kepedulian Teman)", SangatBaik),
            character("c3", "Kepemimpinan Kecil", Baik),
            character("c4", "Tanggung Jawab", Baik),
            character("c5", "Kemandirian", SangatBaik),
            character("c6", "Kerjasama", Baik),
        ],
        attendance: Attendance {
            present: 85,
            sick: 2,
            permission: 1,
            alpha: 0,
        },
        extracurriculars: vec![Extracurricular {
            id: "e1".to_string(),
            name: "Tahfidz Qur'an".to_string(),
            grade: "A".to_string(),
            note: "Hafal An-Nas sampai Al-Fil".to_string(),
        }],
        narrative: String::new(),
        teacher_note: String::new(),
        signature: SignatureBlock {
            principal_name: "Murti Asani, S.Pd".to_string(),
            teacher_name: "Sri Anita Dewi Sinta, A.Md".to_string(),
            date: today_iso(),
            place: "Jatisela".to_string(),
        },
    }
}
