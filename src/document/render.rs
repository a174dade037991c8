//! Maps the report record to Typst source.
//!
//! One render function serves both the on-screen preview and the exported
//! file. [`RenderMode`] is consulted at every leaf: in `Edit` empty fields
//! show their placeholder and editing aids (row ids, option lists, the
//! "Tambah Baris" row) are drawn; in `Capture` only the static text remains.

use std::fs;

use super::capture::CaptureOptions;
use super::common::{
    document_title, format_indonesian_date, format_indonesian_date_from, get_static_dir, typst_str,
};
use super::DocumentError;
use crate::config::SchoolProfile;
use crate::report::model::{CharacterScore, DevelopmentLevel, Grade, ReportRecord};
use crate::transfer::decode_data_url;
use crate::transfer::file::extension_for_mime;

const TEMPLATE_FILE: &str = "rapor.typ";
const PHOTO_STEM: &str = "foto";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Interactive view, with placeholders and editing aids
    Edit,
    /// Static view used while capturing
    Capture,
}

impl RenderMode {
    pub fn from_capturing(capturing: bool) -> Self {
        if capturing {
            RenderMode::Capture
        } else {
            RenderMode::Edit
        }
    }
}

/// A file the Typst source refers to by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub source: String,
    pub assets: Vec<Asset>,
}

/// Leaf renderer; every value that can be edited goes through here.
struct Leaf {
    mode: RenderMode,
}

impl Leaf {
    fn is_edit(&self) -> bool {
        self.mode == RenderMode::Edit
    }

    /// Free text as a content block.
    fn text(&self, value: &str, placeholder: &str) -> String {
        if self.is_edit() && value.trim().is_empty() {
            format!("[#kosong({})]", typst_str(placeholder))
        } else {
            format!("[#{}]", typst_str(value))
        }
    }

    /// A value picked from a fixed list.
    fn choice(&self, value: &str, options: &[&str]) -> String {
        match self.mode {
            RenderMode::Capture => format!("[#strong({})]", typst_str(value)),
            RenderMode::Edit => {
                let options: Vec<String> = options.iter().map(|o| typst_str(o)).collect();
                format!("[#pilihan({}, ({}))]", typst_str(value), options.join(", "))
            }
        }
    }
}

/// Renders [`ReportRecord`]s with the layout helpers from `static/rapor.typ`.
pub struct ReportRenderer {
    template: String,
    school: SchoolProfile,
    options: CaptureOptions,
}

impl ReportRenderer {
    /// Create a renderer using the bundled layout helpers.
    pub fn new(school: SchoolProfile, options: CaptureOptions) -> Result<Self, DocumentError> {
        let template_path = get_static_dir().join(TEMPLATE_FILE);
        let template = fs::read_to_string(&template_path).map_err(DocumentError::TemplateIo)?;
        Ok(Self::with_template(template, school, options))
    }

    pub fn with_template(template: String, school: SchoolProfile, options: CaptureOptions) -> Self {
        Self {
            template,
            school,
            options,
        }
    }

    pub fn options(&self) -> &CaptureOptions {
        &self.options
    }

    pub fn render(&self, record: &ReportRecord, mode: RenderMode) -> RenderedDocument {
        let leaf = Leaf { mode };
        let mut assets = Vec::new();
        let mut out = String::new();

        out.push_str(&self.page_setup(record));
        out.push_str(&self.template);
        out.push('\n');
        out.push_str(&format!(
            "#kop({}, {})\n",
            typst_str(&self.school.name),
            typst_str(&self.school.address)
        ));
        out.push_str(&self.title(record, &leaf));
        out.push_str(&self.identity(record, &leaf, &mut assets));
        out.push_str(&self.health(record, &leaf));
        out.push_str(&self.development(record, &leaf));
        out.push_str(&self.daily(record, &leaf));
        if self.options.page_breaks {
            out.push_str("#pagebreak(weak: true)\n");
        }
        out.push_str(&self.narrative(record, &leaf));
        out.push_str(&self.character_attendance_extras(record, &leaf));
        out.push_str(&self.closing(record, &leaf));

        RenderedDocument {
            source: out,
            assets,
        }
    }

    fn page_setup(&self, record: &ReportRecord) -> String {
        let o = &self.options;
        format!(
            "#set document(title: {})\n#set page(paper: {}, flipped: {}, margin: (top: {}mm, right: {}mm, bottom: {}mm, left: {}mm))\n",
            typst_str(&document_title(record)),
            typst_str(&o.paper),
            o.landscape,
            o.margins.top,
            o.margins.right,
            o.margins.bottom,
            o.margins.left,
        )
    }

    /// Wrap a region that should not be split across pages.
    fn keep(&self, body: &str) -> String {
        if self.options.page_breaks {
            format!("#block(breakable: false)[\n{body}\n]\n")
        } else {
            format!("#block[\n{body}\n]\n")
        }
    }

    fn title(&self, record: &ReportRecord, leaf: &Leaf) -> String {
        let year = leaf.text(&record.student.academic_year, "....");
        self.keep(&format!(
            "#align(center)[\n  #text(size: 13pt, weight: \"bold\")[#underline[LAPORAN HASIL BELAJAR]] \\\n  #text(weight: \"bold\")[TAHUN PELAJARAN #upper({year})]\n]\n#v(4mm)"
        ))
    }

    fn identity(&self, record: &ReportRecord, leaf: &Leaf, assets: &mut Vec<Asset>) -> String {
        let s = &record.student;
        let rows = [
            ("Nama Peserta Didik", format!("strong(upper({}))", leaf.text(&s.name, "..."))),
            ("NIS / NISN", format!("strong(upper({}))", leaf.text(&s.nis, "..."))),
            ("Kelompok / Usia", format!("strong({})", leaf.text(&s.group, "..."))),
            ("Semester", leaf.choice(s.semester.label(), &["Ganjil", "Genap"])),
            ("Alamat", format!("strong({})", leaf.text(&s.address, "..."))),
        ];
        let cells: Vec<String> = rows
            .iter()
            .map(|(label, value)| format!("    [{label}], [:], {value},"))
            .collect();

        let photo = match s.photo_url.as_deref().and_then(decode_data_url) {
            Some(image) => {
                let name = format!("{}.{}", PHOTO_STEM, extension_for_mime(&image.mime));
                let call = format!(
                    "image({}, width: 100%, height: 100%, fit: \"cover\")",
                    typst_str(&name)
                );
                assets.push(Asset {
                    name,
                    bytes: image.bytes,
                });
                call
            }
            None => "align(center + horizon)[#text(size: 7pt, fill: luma(120))[FOTO \\ 3x4]]"
                .to_string(),
        };

        self.keep(&format!(
            "#grid(\n  columns: (1fr, 30mm),\n  column-gutter: 6mm,\n  table(\n    columns: (38mm, 4mm, 1fr),\n    stroke: none,\n    inset: (x: 2pt, y: 4pt),\n{}\n  ),\n  kotak-foto({photo}),\n)\n#v(4mm)",
            cells.join("\n")
        ))
    }

    fn health(&self, record: &ReportRecord, leaf: &Leaf) -> String {
        let h = &record.health;
        let cells = [
            format!("[#strong({}) kg]", leaf.text(&h.weight, "-")),
            format!("[#strong({}) cm]", leaf.text(&h.height, "-")),
            format!("[#strong({}) cm]", leaf.text(&h.head_circumference, "-")),
            leaf.text(&h.eyes, "-"),
            leaf.text(&h.ears, "-"),
            leaf.text(&h.teeth, "-"),
        ];
        format!(
            "#bagian(\"A. Data Pertumbuhan & Kesehatan\")[\n#table(\n  columns: (1fr,) * 6,\n  align: center + horizon,\n  table.header([*Berat Badan*], [*Tinggi Badan*], [*Lingkar Kepala*], [*Penglihatan*], [*Pendengaran*], [*Gigi*]),\n  {},\n)\n]\n",
            cells.join(", ")
        )
    }

    fn development(&self, record: &ReportRecord, leaf: &Leaf) -> String {
        let levels: Vec<&str> = DevelopmentLevel::ALL.iter().map(|l| l.code()).collect();
        let rows: Vec<String> = record
            .development_items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                format!(
                    "  [{}], strong({}), emph({}), {},",
                    idx + 1,
                    leaf.text(&item.scope, "Lingkup..."),
                    leaf.text(&item.description, "Deskripsi..."),
                    leaf.choice(item.level.code(), &levels),
                )
            })
            .collect();
        let legend: Vec<String> = DevelopmentLevel::ALL
            .iter()
            .map(|l| format!("{} ({})", l.code(), l.description()))
            .collect();

        format!(
            "#bagian(\"B. Capaian Perkembangan Anak (CPPA)\")[\n#table(\n  columns: (10mm, 42mm, 1fr, 24mm),\n  align: (center + horizon, left + horizon, left + horizon, center + horizon),\n  table.header([*No*], [*Lingkup Perkembangan*], [*Deskripsi Singkat*], [*Nilai*]),\n{}\n)\n#align(right)[#text(size: 7pt, style: \"italic\", fill: luma(100))[\\* Keterangan: {}]]\n]\n",
            rows.join("\n"),
            legend.join(", ")
        )
    }

    fn daily(&self, record: &ReportRecord, leaf: &Leaf) -> String {
        let grades: Vec<&str> = Grade::ALL.iter().map(|g| g.letter()).collect();
        let edit = leaf.is_edit();

        let (columns, header) = if edit {
            (
                "(1fr, 1fr, 14mm, 1fr, 18mm)",
                "[*Kegiatan / Proyek*], [*Indikator Capaian*], [*Nilai*], [*Catatan*], [*ID*]",
            )
        } else {
            (
                "(1fr, 1fr, 14mm, 1fr)",
                "[*Kegiatan / Proyek*], [*Indikator Capaian*], [*Nilai*], [*Catatan*]",
            )
        };

        let mut rows: Vec<String> = record
            .daily_activities
            .iter()
            .map(|item| {
                let mut row = format!(
                    "  {}, {}, {}, {},",
                    leaf.text(&item.activity, "Kegiatan..."),
                    leaf.text(&item.indicator, "Indikator..."),
                    leaf.choice(item.grade.letter(), &grades),
                    leaf.text(&item.note, "Catatan..."),
                );
                if edit {
                    row.push_str(&format!(" [#raw({})],", typst_str(&item.id)));
                }
                row
            })
            .collect();
        if edit {
            rows.push("  table.cell(colspan: 5)[#kosong(\"+ Tambah Baris\")],".to_string());
        }

        format!(
            "#bagian(\"C. Penilaian Proyek & Harian\")[\n#table(\n  columns: {columns},\n  align: (left + top, left + top, center + top, left + top, center + top),\n  table.header({header}),\n{}\n)\n]\n",
            rows.join("\n")
        )
    }

    fn narrative(&self, record: &ReportRecord, leaf: &Leaf) -> String {
        let body = leaf.text(
            &record.narrative,
            "Narasi perkembangan akan muncul di sini (gunakan tombol AI)...",
        );
        self.keep(&format!(
            "#bagian(\"D. Deskripsi Perkembangan\")[\n#rect(width: 100%, inset: 4mm, stroke: 0.8pt)[#par(justify: true)[#{body}]]\n]"
        ))
    }

    fn character_attendance_extras(&self, record: &ReportRecord, leaf: &Leaf) -> String {
        let scores: Vec<&str> = CharacterScore::ALL.iter().map(|s| s.label()).collect();
        let character_rows: Vec<String> = record
            .character_items
            .iter()
            .map(|c| {
                format!(
                    "      {}, {},",
                    leaf.text(&c.aspect, "Aspek..."),
                    leaf.choice(c.score.label(), &scores)
                )
            })
            .collect();

        let a = &record.attendance;
        let days = |n: i32| format!("[#strong({}) hari]", typst_str(&n.to_string()));

        let extra_rows: Vec<String> = record
            .extracurriculars
            .iter()
            .map(|e| {
                format!(
                    "        {}, strong({}),",
                    leaf.text(&e.name, "Kegiatan..."),
                    leaf.text(&e.grade, "-")
                )
            })
            .collect();

        self.keep(&format!(
            "#grid(\n  columns: (1fr, 1fr),\n  column-gutter: 8mm,\n  bagian(\"E. Perkembangan Karakter\")[\n    #table(\n      columns: (1fr, 28mm),\n      align: (left + horizon, center + horizon),\n      table.header([*Aspek Karakter*], [*Predikat*]),\n{}\n    )\n  ],\n  [\n    #bagian(\"F. Ketidakhadiran\")[\n      #table(\n        columns: (1fr, 1fr),\n        align: (left, center),\n        [Sakit], {},\n        [Izin], {},\n        [Tanpa Keterangan], {},\n      )\n    ]\n    #bagian(\"G. Ekstrakurikuler\")[\n      #table(\n        columns: (1fr, 16mm),\n        align: (left + horizon, center + horizon),\n        table.header([*Kegiatan*], [*Nilai*]),\n{}\n      )\n    ]\n  ],\n)",
            character_rows.join("\n"),
            days(a.sick),
            days(a.permission),
            days(a.alpha),
            extra_rows.join("\n"),
        ))
    }

    fn closing(&self, record: &ReportRecord, leaf: &Leaf) -> String {
        let sig = &record.signature;
        let date = if sig.date.trim().is_empty() {
            format_indonesian_date()
        } else {
            format_indonesian_date_from(&sig.date)
        };
        let note = leaf.text(&record.teacher_note, "Catatan...");
        let parent = format!("[(#{})]", typst_str(&record.student.parent_name));

        self.keep(&format!(
            "#bagian(\"H. Catatan Wali Kelas\")[\n#rect(width: 100%, inset: 4mm, stroke: 0.8pt)[#emph({note})]\n]\n#v(8mm)\n#align(right)[#box(width: 70mm)[#align(left)[Diberikan di : #{} \\\nTanggal : #{}]]]\n#v(6mm)\n#grid(\n  columns: (1fr, 1fr, 1fr),\n  column-gutter: 4mm,\n  ttd([Mengetahui, \\ Orang Tua / Wali], {parent}),\n  ttd([Mengetahui, \\ Kepala Sekolah], {}),\n  ttd([Wali Kelas], {}),\n)",
            leaf.text(&sig.place, "..."),
            typst_str(&date),
            leaf.text(&sig.principal_name, "Nama Kepala Sekolah"),
            leaf.text(&sig.teacher_name, "Nama Wali Kelas"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::model::{DailyActivityPatch, SignaturePatch};
    use crate::report::template::initial_record;

    fn renderer() -> ReportRenderer {
        ReportRenderer::with_template(
            "// layout\n".to_string(),
            SchoolProfile::default(),
            CaptureOptions::default(),
        )
    }

    #[test]
    fn test_new_loads_bundled_template() {
        let result = ReportRenderer::new(SchoolProfile::default(), CaptureOptions::default());
        assert!(result.is_ok());
    }

    #[test]
    fn test_page_setup_uses_capture_options() {
        let doc = renderer().render(&initial_record(), RenderMode::Capture);
        assert!(doc.source.contains("paper: \"a4\""));
        assert!(doc.source.contains("flipped: false"));
        assert!(doc
            .source
            .contains("margin: (top: 20mm, right: 15mm, bottom: 21mm, left: 23mm)"));
        assert!(doc.source.contains("#pagebreak(weak: true)"));
    }

    #[test]
    fn test_capture_mode_has_no_edit_chrome() {
        let record = initial_record().with_texts(Default::default());
        let doc = renderer().render(&record, RenderMode::Capture);
        assert!(!doc.source.contains("Tambah Baris"));
        assert!(!doc.source.contains("#kosong("));
        assert!(!doc.source.contains("#pilihan("));
        assert!(!doc.source.contains("[*ID*]"));
    }

    #[test]
    fn test_edit_mode_shows_placeholders_and_row_ids() {
        let record = initial_record();
        let doc = renderer().render(&record, RenderMode::Edit);
        assert!(doc.source.contains("Tambah Baris"));
        assert!(doc.source.contains("#raw(\"d1\")"));
        assert!(doc.source.contains("gunakan tombol AI"));
        assert!(doc.source.contains("#pilihan(\"BSH\", (\"BB\", \"MB\", \"BSH\", \"BSB\"))"));
    }

    #[test]
    fn test_values_are_escaped() {
        let record = initial_record().update_daily_activity(
            "d1",
            DailyActivityPatch {
                note: Some("Kata \"hebat\"\nbaris dua".to_string()),
                ..Default::default()
            },
        );
        let doc = renderer().render(&record, RenderMode::Capture);
        assert!(doc.source.contains(r#"Kata \"hebat\"\nbaris dua"#));
    }

    #[test]
    fn test_signature_date_in_indonesian() {
        let record = initial_record().with_signature(SignaturePatch {
            date: Some("2025-06-20".to_string()),
            ..Default::default()
        });
        let doc = renderer().render(&record, RenderMode::Capture);
        assert!(doc.source.contains("\"20 Juni 2025\""));
    }

    #[test]
    fn test_photo_becomes_asset() {
        let record = initial_record().with_photo("data:image/png;base64,iVBORw0KGgo=".to_string());
        let doc = renderer().render(&record, RenderMode::Capture);
        assert_eq!(doc.assets.len(), 1);
        assert_eq!(doc.assets[0].name, "foto.png");
        assert!(doc.source.contains("image(\"foto.png\""));
    }

    #[test]
    fn test_undecodable_photo_falls_back_to_placeholder() {
        let record = initial_record().with_photo("not a data url".to_string());
        let doc = renderer().render(&record, RenderMode::Capture);
        assert!(doc.assets.is_empty());
        assert!(doc.source.contains("FOTO"));
    }

    #[test]
    fn test_document_title_in_metadata() {
        let doc = renderer().render(&initial_record(), RenderMode::Capture);
        assert!(doc
            .source
            .contains("#set document(title: \"Rapor_Muhammad_Fatih_Al-Farisi_Ganjil\")"));
    }
}
