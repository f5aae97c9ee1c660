//! Batch generation with per-student failure isolation, and ZIP packaging.
//!
//! Students are processed sequentially, sides sequentially within a student.
//! One student's broken assets never abort the batch: the error is caught at
//! the student boundary and reported alongside everyone else's successes.

use std::io::{Cursor, Write};

use tracing::warn;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::model::{
    BatchOutcome, GenerationFailure, GenerationResult, Orientation, SchoolInfo, Side,
    StudentRecord,
};
use crate::service::{CardError, CardService};
use crate::util;

/// Archive/entry stem for a student: sequence number, then roll number, then
/// the internal id.
pub fn entry_stem(student: &StudentRecord) -> String {
    student
        .sequence_no
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .or(student
            .roll_no
            .as_deref()
            .filter(|s| !s.trim().is_empty()))
        .unwrap_or(&student.id)
        .trim()
        .to_string()
}

/// `{stem}_{SanitizedName}/` folder within the archive.
pub fn entry_folder(student: &StudentRecord) -> String {
    format!("{}_{}", entry_stem(student), util::sanitize_name(&student.name))
}

/// Generate both requested sides for every student.
pub async fn generate_batch(
    service: &CardService,
    students: &[StudentRecord],
    school: &SchoolInfo,
    orientation: Orientation,
    include_back: bool,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for student in students {
        match generate_sides(service, student, school, orientation, include_back).await {
            Ok(result) => outcome.successes.push(result),
            Err(e) => {
                warn!(student = %student.id, error = %e, "student failed, continuing batch");
                outcome.failures.push(GenerationFailure {
                    student_id: student.id.clone(),
                    student_name: student.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    outcome
}

async fn generate_sides(
    service: &CardService,
    student: &StudentRecord,
    school: &SchoolInfo,
    orientation: Orientation,
    include_back: bool,
) -> Result<GenerationResult, CardError> {
    let front = service
        .generate_card(student, school, orientation, Side::Front)
        .await?;
    let back = if include_back {
        Some(
            service
                .generate_card(student, school, orientation, Side::Back)
                .await?,
        )
    } else {
        None
    };
    Ok(GenerationResult {
        student_id: student.id.clone(),
        sequence_id: entry_stem(student),
        front,
        back,
    })
}

/// Batch result packaged as a ZIP: one folder per student holding the
/// rendered side(s).
pub struct BatchArchive {
    pub zip: Vec<u8>,
    pub failures: Vec<GenerationFailure>,
}

pub async fn generate_batch_archive(
    service: &CardService,
    students: &[StudentRecord],
    school: &SchoolInfo,
    orientation: Orientation,
    include_back: bool,
) -> Result<BatchArchive, CardError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    let mut failures = Vec::new();
    for student in students {
        match generate_sides(service, student, school, orientation, include_back).await {
            Ok(result) => append_student(&mut writer, student, &result)?,
            Err(e) => {
                warn!(student = %student.id, error = %e, "student failed, continuing batch");
                failures.push(GenerationFailure {
                    student_id: student.id.clone(),
                    student_name: student.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    let zip = writer.finish()?.into_inner();
    Ok(BatchArchive { zip, failures })
}

fn append_student(
    writer: &mut ZipWriter<Cursor<Vec<u8>>>,
    student: &StudentRecord,
    result: &GenerationResult,
) -> Result<(), CardError> {
    let folder = entry_folder(student);
    let stem = &result.sequence_id;
    let options = SimpleFileOptions::default();

    writer.start_file(format!("{folder}/{stem}_front.png"), options)?;
    writer.write_all(&result.front)?;
    if let Some(back) = &result.back {
        writer.start_file(format!("{folder}/{stem}_back.png"), options)?;
        writer.write_all(back)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::render::encode_png;
    use zip::ZipArchive;

    fn student(id: &str, name: &str, seq: Option<&str>, roll: Option<&str>) -> StudentRecord {
        StudentRecord {
            id: id.into(),
            name: name.into(),
            sequence_no: seq.map(Into::into),
            roll_no: roll.map(Into::into),
            ..StudentRecord::default()
        }
    }

    #[test]
    fn stem_prefers_sequence_then_roll_then_id() {
        assert_eq!(
            entry_stem(&student("st-1", "A", Some("GW-9"), Some("12"))),
            "GW-9"
        );
        assert_eq!(entry_stem(&student("st-1", "A", None, Some("12"))), "12");
        assert_eq!(entry_stem(&student("st-1", "A", Some("  "), None)), "st-1");
    }

    #[test]
    fn folder_combines_stem_and_sanitized_name() {
        let s = student("st-1", "D'Souza, Maria", Some("GW-9"), None);
        assert_eq!(entry_folder(&s), "GW-9_D_Souza_Maria");
    }

    #[test]
    fn archive_layout_groups_per_student() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        let first = student("st-1", "Aisha Rahman", Some("GW-1"), None);
        let second = student("st-2", "Rohan Mehta", None, Some("22"));
        append_student(
            &mut writer,
            &first,
            &GenerationResult {
                student_id: "st-1".into(),
                sequence_id: entry_stem(&first),
                front: vec![1, 2, 3],
                back: Some(vec![4, 5]),
            },
        )
        .unwrap();
        append_student(
            &mut writer,
            &second,
            &GenerationResult {
                student_id: "st-2".into(),
                sequence_id: entry_stem(&second),
                front: vec![9],
                back: None,
            },
        )
        .unwrap();

        let bytes = writer.finish().unwrap().into_inner();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "GW-1_Aisha_Rahman/GW-1_front.png",
                "GW-1_Aisha_Rahman/GW-1_back.png",
                "22_Rohan_Mehta/22_front.png",
            ]
        );

        let mut front = archive.by_name("GW-1_Aisha_Rahman/GW-1_front.png").unwrap();
        let mut contents = Vec::new();
        std::io::copy(&mut front, &mut contents).unwrap();
        assert_eq!(contents, vec![1, 2, 3]);
    }

    /// Minimal white template so the full pipeline can run. Fonts are absent
    /// on purpose: text layers degrade, they never fail a card.
    fn write_template(dir: &std::path::Path, name: &str) {
        let canvas = image::ImageBuffer::from_pixel(64, 40, image::Rgba([255u8, 255, 255, 255]));
        std::fs::write(dir.join(name), encode_png(&canvas).unwrap()).unwrap();
    }

    fn service_with_templates(
        dir: &std::path::Path,
        templates: &[&str],
    ) -> crate::service::CardService {
        let template_dir = dir.join("templates");
        std::fs::create_dir_all(&template_dir).unwrap();
        for name in templates {
            write_template(&template_dir, name);
        }
        let config = EngineConfig::new(template_dir, dir.join("out"), dir.join("fonts"));
        crate::service::CardService::new(config, reqwest::Client::new()).unwrap()
    }

    #[tokio::test]
    async fn bad_photos_and_blank_dates_degrade_not_fail() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with_templates(dir.path(), &["landscape-front.png"]);

        let clean = student("st-1", "Aisha Rahman", Some("GW-1"), None);
        let mut broken_photo = student("st-2", "Rohan Mehta", Some("GW-2"), None);
        broken_photo.photo = Some(dir.path().join("no-such-photo.png").display().to_string());
        let mut blank_dob = student("st-3", "Maria D'Souza", Some("GW-3"), None);
        blank_dob.date_of_birth = "  ".into();

        let outcome = generate_batch(
            &service,
            &[clean, broken_photo, blank_dob],
            &SchoolInfo::default(),
            Orientation::Landscape,
            false,
        )
        .await;

        assert_eq!(outcome.successes.len(), 3);
        assert!(outcome.failures.is_empty());
        for result in &outcome.successes {
            assert!(!result.front.is_empty());
            assert!(result.back.is_none());
        }
    }

    #[tokio::test]
    async fn missing_back_template_fails_students_without_aborting_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        // Front exists, back does not: every student trips the fatal
        // template error, each caught at the student boundary.
        let service = service_with_templates(dir.path(), &["landscape-front.png"]);

        let students = [
            student("st-1", "Aisha Rahman", Some("GW-1"), None),
            student("st-2", "Rohan Mehta", Some("GW-2"), None),
        ];
        let outcome = generate_batch(
            &service,
            &students,
            &SchoolInfo::default(),
            Orientation::Landscape,
            true,
        )
        .await;

        assert!(outcome.successes.is_empty());
        assert_eq!(outcome.failures.len(), 2);
        for failure in &outcome.failures {
            assert!(failure.error.contains("landscape-back.png"));
        }
    }

    #[tokio::test]
    async fn archive_batch_reports_failures_alongside_the_zip() {
        let dir = tempfile::tempdir().unwrap();
        let service =
            service_with_templates(dir.path(), &["portrait-front.png", "portrait-back.png"]);

        let outcome = generate_batch_archive(
            &service,
            &[student("st-1", "Aisha Rahman", Some("GW-1"), None)],
            &SchoolInfo::default(),
            Orientation::Portrait,
            true,
        )
        .await
        .unwrap();

        assert!(outcome.failures.is_empty());
        let mut archive = ZipArchive::new(Cursor::new(outcome.zip)).unwrap();
        assert_eq!(archive.len(), 2);
        assert!(archive.by_name("GW-1_Aisha_Rahman/GW-1_front.png").is_ok());
        assert!(archive.by_name("GW-1_Aisha_Rahman/GW-1_back.png").is_ok());
    }
}
