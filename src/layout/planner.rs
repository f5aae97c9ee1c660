//! Composition planning.
//!
//! `plan` turns a student/school pair and a template variant into an ordered
//! layer list. It is pure: no I/O, no shared state. Asset references travel
//! through as strings; the renderer resolves them. The pass folds over the
//! slot table in order, threading a [`FieldHeights`] accumulator so a
//! dependent field can read the measured bottom edge of anything planned
//! before it.

use crate::model::{Orientation, SchoolInfo, Side, StudentRecord};
use crate::text;

use super::catalog::layout_for;
use super::{
    FieldHeights, FieldSource, FieldSpec, ImageKind, ImageLayer, Layer, LayoutError, SlotSpec,
    TextFlow, TextLayer,
};

/// Rendered in place of blank or unusable input. Never an error.
pub const PLACEHOLDER: &str = "N/A";

pub fn plan(
    student: &StudentRecord,
    school: &SchoolInfo,
    orientation: Orientation,
    side: Side,
) -> Result<Vec<Layer>, LayoutError> {
    let layout = layout_for(orientation, side);
    let mut layers: Vec<Layer> = Vec::with_capacity(layout.slots.len());
    let mut heights = FieldHeights::default();

    // The student name drives two adjustments on the front: extra wrapped
    // lines push the pairs below it down, and short/long single-line names
    // shift fields horizontally per the table's rules.
    let (name_extra, shift) = name_adjustments(layout.field("name_value"), student, layout);

    for slot in layout.slots {
        match slot {
            SlotSpec::Logo(slot) => {
                if let Some(reference) = school.logo.as_deref() {
                    layers.push(Layer::Image(ImageLayer {
                        kind: ImageKind::Logo,
                        source: reference.to_string(),
                        left: slot.x,
                        top: slot.y,
                        width: slot.width,
                        height: slot.height,
                    }));
                } else {
                    tracing::debug!("no school logo configured, slot left empty");
                }
            }
            SlotSpec::Photo(slot) => {
                if let Some(reference) = student.photo.as_deref() {
                    layers.push(Layer::Image(ImageLayer {
                        kind: ImageKind::Photo,
                        source: reference.to_string(),
                        left: slot.x,
                        top: slot.y,
                        width: slot.width,
                        height: slot.height,
                    }));
                } else {
                    tracing::debug!(student = %student.id, "no photo reference, slot left empty");
                }
            }
            SlotSpec::Field(field) => {
                let dx = match shift {
                    Some((dx, fields)) if fields.contains(&field.name) => dx,
                    _ => 0,
                };
                let dy = if field.shift_with_name { name_extra } else { 0 };
                let layer = plan_field(field, student, school, &mut heights, dx, dy)?;
                layers.push(Layer::Text(layer));
            }
        }
    }

    Ok(layers)
}

/// Extra height of a multi-line name, plus the matching shift rule, if any.
fn name_adjustments(
    name_field: Option<&'static FieldSpec>,
    student: &StudentRecord,
    layout: &super::TemplateLayout,
) -> (i32, Option<(i32, &'static [&'static str])>) {
    let Some(field) = name_field else {
        return (0, None);
    };
    let name = non_blank(&student.name);
    let lines = text::wrap(
        &name,
        char_budget(field, field.font_size),
        field.subsequent_max_chars,
    );
    let extra = (lines.len().max(1) as i32 - 1) * field.line_height as i32;

    if lines.len() != 1 {
        return (extra, None);
    }
    let len = name.chars().count();
    let rule = layout
        .shift_rules
        .iter()
        .find(|rule| rule.min_len <= len && len <= rule.max_len)
        .map(|rule| (rule.dx, rule.fields));
    (extra, rule)
}

/// Per-line character budget: explicit when the table says so, otherwise
/// derived from the field's pixel width at the given size.
fn char_budget(field: &FieldSpec, font_size: u32) -> usize {
    if field.max_chars_per_line > 0 {
        field.max_chars_per_line
    } else {
        text::chars_for_width(field.max_width, font_size)
    }
}

fn plan_field(
    field: &'static FieldSpec,
    student: &StudentRecord,
    school: &SchoolInfo,
    heights: &mut FieldHeights,
    dx: i32,
    dy: i32,
) -> Result<TextLayer, LayoutError> {
    let content = resolve(field.source, student, school);
    let budget = char_budget(field, field.font_size);

    let mut font_size = field.font_size;
    let mut lift = 0;
    let lines = if let Some(auto) = field.auto_size {
        // Try to keep a single line; only then allow the full line budget.
        let mut fit = text::fit(
            &content,
            field.font_size,
            budget,
            auto.min_font_size,
            1,
        );
        let mut lines = text::wrap(&content, fit.char_limit, field.subsequent_max_chars);
        if lines.len() > 1 && auto.max_lines > 1 {
            fit = text::fit(
                &content,
                field.font_size,
                budget,
                auto.min_font_size,
                auto.max_lines,
            );
            lines = text::wrap(&content, fit.char_limit, field.subsequent_max_chars);
        }
        font_size = fit.font_size;
        if lines.len() > 1 {
            lift = auto.two_line_lift;
        }
        lines
    } else if field.multi_line {
        text::wrap(&content, budget, field.subsequent_max_chars)
    } else {
        vec![content]
    };
    let lines = if lines.is_empty() {
        vec![PLACEHOLDER.to_string()]
    } else {
        lines
    };

    let base_y = match field.depends_on {
        Some(dep) => {
            let extent = heights
                .get(dep.field)
                .ok_or(LayoutError::MissingHeight(field.name))?;
            extent.bottom + dep.gap
        }
        None => field.y,
    };
    let top = base_y + dy - lift;

    let layer = TextLayer {
        lines,
        left: field.x + dx,
        top,
        font_size,
        weight: field.weight,
        color: field.color,
        line_height: field.line_height,
        flow: match field.continuation_x {
            Some(continuation_left) => TextFlow::TwoColumn { continuation_left },
            None if field.multi_line => TextFlow::MultiLine,
            None => TextFlow::SingleLine,
        },
    };
    heights.record(field.name, top, layer.height());
    Ok(layer)
}

fn resolve(source: FieldSource, student: &StudentRecord, school: &SchoolInfo) -> String {
    match source {
        FieldSource::Label(text) => text.to_string(),
        FieldSource::StudentName => non_blank(&student.name),
        FieldSource::SequenceNo => student
            .sequence_no
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(student
                .roll_no
                .as_deref()
                .filter(|s| !s.trim().is_empty()))
            .unwrap_or(&student.id)
            .trim()
            .to_string(),
        FieldSource::ClassSection => {
            let class = student.class_name.trim();
            let section = student.section.trim();
            match (class.is_empty(), section.is_empty()) {
                (true, _) => PLACEHOLDER.to_string(),
                (false, true) => class.to_string(),
                (false, false) => format!("{class} - {section}"),
            }
        }
        FieldSource::DateOfBirth => non_blank(&student.date_of_birth),
        FieldSource::BloodGroup => non_blank(&student.blood_group),
        FieldSource::StudentAddress => non_blank(&student.address),
        FieldSource::StudentPhone => non_blank(&student.phone),
        FieldSource::SchoolName => non_blank(&school.name),
        FieldSource::SchoolAddress => non_blank(&school.address),
        FieldSource::SchoolPhone => non_blank(&school.phone),
        FieldSource::SchoolEmail => non_blank(&school.email),
    }
}

fn non_blank(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Orientation, Side};

    fn school() -> SchoolInfo {
        SchoolInfo {
            name: "Greenwood International Public School".into(),
            address: "14 Lakeview Road, Riverton 560001".into(),
            logo: Some("assets/logo.png".into()),
            phone: "+91 80 4455 6677".into(),
            email: "office@greenwood.example".into(),
        }
    }

    fn student(name: &str) -> StudentRecord {
        StudentRecord {
            id: "st-0042".into(),
            name: name.into(),
            sequence_no: Some("GW-2031".into()),
            roll_no: Some("17".into()),
            class_name: "7".into(),
            section: "B".into(),
            date_of_birth: "02 Jan 2013".into(),
            blood_group: "B+".into(),
            address: "221 Baker Street, Riverton, Near City Park, 560004".into(),
            phone: "+91 98450 11223".into(),
            photo: Some("photos/st-0042.jpg".into()),
        }
    }

    fn text_layers(layers: &[Layer]) -> Vec<&TextLayer> {
        layers
            .iter()
            .filter_map(|layer| match layer {
                Layer::Text(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    fn layer_named<'a>(
        layers: &'a [Layer],
        orientation: Orientation,
        side: Side,
        name: &str,
    ) -> &'a TextLayer {
        // Text layers come out in table order, so index by field position.
        let layout = layout_for(orientation, side);
        let index = layout
            .fields()
            .position(|field| field.name == name)
            .unwrap();
        text_layers(layers)[index]
    }

    #[test]
    fn plan_is_deterministic() {
        let a = plan(&student("Aisha Rahman"), &school(), Orientation::Landscape, Side::Front)
            .unwrap();
        let b = plan(&student("Aisha Rahman"), &school(), Orientation::Landscape, Side::Front)
            .unwrap();
        assert_eq!(format!("{a:?}"), format!("{b:?}"));
    }

    #[test]
    fn front_plan_keeps_catalog_paint_order() {
        let layers =
            plan(&student("Aisha Rahman"), &school(), Orientation::Landscape, Side::Front)
                .unwrap();
        assert!(matches!(
            layers[0],
            Layer::Image(ImageLayer {
                kind: ImageKind::Logo,
                ..
            })
        ));
        // Photo is planned after the school header, before the pairs.
        let photo_at = layers
            .iter()
            .position(|layer| {
                matches!(
                    layer,
                    Layer::Image(ImageLayer {
                        kind: ImageKind::Photo,
                        ..
                    })
                )
            })
            .unwrap();
        assert_eq!(photo_at, 3);
    }

    #[test]
    fn dependent_field_sits_below_its_dependency() {
        let layers = plan(&student("Aisha Rahman"), &school(), Orientation::Landscape, Side::Back)
            .unwrap();
        let layout = layout_for(Orientation::Landscape, Side::Back);

        let address = layer_named(&layers, Orientation::Landscape, Side::Back, "student_address");
        let phone = layer_named(&layers, Orientation::Landscape, Side::Back, "student_phone");
        let gap = layout.field("student_phone").unwrap().depends_on.unwrap().gap;
        assert_eq!(phone.top, address.top + address.height() + gap);
        assert!(phone.top >= layout.field("student_address").unwrap().y);
    }

    #[test]
    fn return_block_chains_all_the_way_down() {
        let layers =
            plan(&student("Aisha Rahman"), &school(), Orientation::Portrait, Side::Back).unwrap();
        let layout = layout_for(Orientation::Portrait, Side::Back);
        let chain = [
            "return_school_name",
            "return_school_address",
            "return_school_phone",
            "return_school_email",
        ];
        for pair in chain.windows(2) {
            let above = layer_named(&layers, Orientation::Portrait, Side::Back, pair[0]);
            let below = layer_named(&layers, Orientation::Portrait, Side::Back, pair[1]);
            let gap = layout.field(pair[1]).unwrap().depends_on.unwrap().gap;
            assert_eq!(below.top, above.top + above.height() + gap, "{}", pair[1]);
        }
    }

    #[test]
    fn multi_line_name_pushes_pairs_down() {
        let short = plan(&student("Aisha Rahman"), &school(), Orientation::Landscape, Side::Front)
            .unwrap();
        let long = plan(
            &student("Aleksandrina Konstantinova-Whitfield"),
            &school(),
            Orientation::Landscape,
            Side::Front,
        )
        .unwrap();
        let layout = layout_for(Orientation::Landscape, Side::Front);
        let line_height = layout.field("name_value").unwrap().line_height as i32;

        let name_lines = layer_named(&long, Orientation::Landscape, Side::Front, "name_value")
            .lines
            .len() as i32;
        assert!(name_lines > 1);

        let short_dob = layer_named(&short, Orientation::Landscape, Side::Front, "dob_value");
        let long_dob = layer_named(&long, Orientation::Landscape, Side::Front, "dob_value");
        assert_eq!(long_dob.top - short_dob.top, (name_lines - 1) * line_height);

        // The name pair itself stays anchored.
        let short_name = layer_named(&short, Orientation::Landscape, Side::Front, "name_value");
        let long_name = layer_named(&long, Orientation::Landscape, Side::Front, "name_value");
        assert_eq!(short_name.top, long_name.top);
    }

    #[test]
    fn short_single_line_name_shifts_the_landscape_block_right() {
        let layers = plan(&student("Aisha Rahman"), &school(), Orientation::Landscape, Side::Front)
            .unwrap();
        let layout = layout_for(Orientation::Landscape, Side::Front);
        let spec_x = layout.field("name_value").unwrap().x;
        let name = layer_named(&layers, Orientation::Landscape, Side::Front, "name_value");
        assert_eq!(name.lines.len(), 1);
        assert_eq!(name.left, spec_x + 24);
        let dob = layer_named(&layers, Orientation::Landscape, Side::Front, "dob_value");
        assert_eq!(dob.left, layout.field("dob_value").unwrap().x + 24);
    }

    #[test]
    fn nominal_name_is_not_shifted() {
        // 17 chars: single line, outside the 0..=16 band.
        let layers = plan(
            &student("Jonathan Appleby Q"),
            &school(),
            Orientation::Landscape,
            Side::Front,
        )
        .unwrap();
        let layout = layout_for(Orientation::Landscape, Side::Front);
        let name = layer_named(&layers, Orientation::Landscape, Side::Front, "name_value");
        assert_eq!(name.lines.len(), 1);
        assert_eq!(name.left, layout.field("name_value").unwrap().x);
    }

    #[test]
    fn portrait_long_name_band_pulls_left() {
        // 15 chars: single line on portrait (budget 22), inside 13..=18.
        let layers = plan(
            &student("Priya Sundaresh"),
            &school(),
            Orientation::Portrait,
            Side::Front,
        )
        .unwrap();
        let layout = layout_for(Orientation::Portrait, Side::Front);
        let name = layer_named(&layers, Orientation::Portrait, Side::Front, "name_value");
        assert_eq!(name.lines.len(), 1);
        assert_eq!(name.left, layout.field("name_value").unwrap().x - 8);
        // Pairs below only move vertically with the name, never horizontally.
        let dob = layer_named(&layers, Orientation::Portrait, Side::Front, "dob_value");
        assert_eq!(dob.left, layout.field("dob_value").unwrap().x);
    }

    #[test]
    fn blood_group_stays_anchored_regardless_of_name() {
        let layout = layout_for(Orientation::Landscape, Side::Front);
        let spec = layout.field("blood_group").unwrap();
        for name in ["Om", "Aleksandrina Konstantinova-Whitfield"] {
            let layers =
                plan(&student(name), &school(), Orientation::Landscape, Side::Front).unwrap();
            let blood = layer_named(&layers, Orientation::Landscape, Side::Front, "blood_group");
            assert_eq!((blood.left, blood.top), (spec.x, spec.y));
        }
    }

    #[test]
    fn back_address_wraps_into_two_columns() {
        let layers = plan(&student("Aisha Rahman"), &school(), Orientation::Landscape, Side::Back)
            .unwrap();
        let layout = layout_for(Orientation::Landscape, Side::Back);
        let spec = layout.field("student_address").unwrap();
        let address = layer_named(&layers, Orientation::Landscape, Side::Back, "student_address");
        assert!(address.lines.len() > 1);
        assert_eq!(
            address.flow,
            TextFlow::TwoColumn {
                continuation_left: spec.continuation_x.unwrap()
            }
        );
        assert!(address.lines[0].chars().count() <= spec.max_chars_per_line);
        for line in &address.lines[1..] {
            assert!(line.chars().count() <= spec.subsequent_max_chars.unwrap());
        }
    }

    #[test]
    fn medium_school_name_shrinks_onto_a_single_line() {
        let mut compact = school();
        compact.name = "Sunrise Valley Public School".into();
        let layers =
            plan(&student("Aisha Rahman"), &compact, Orientation::Portrait, Side::Front).unwrap();
        let layout = layout_for(Orientation::Portrait, Side::Front);
        let spec = layout.field("school_name").unwrap();
        let school_name = layer_named(&layers, Orientation::Portrait, Side::Front, "school_name");

        assert_eq!(school_name.lines.len(), 1);
        assert!(school_name.font_size < spec.font_size);
        assert!(school_name.font_size >= spec.auto_size.unwrap().min_font_size);
        assert_eq!(school_name.top, spec.y);
    }

    #[test]
    fn long_school_name_falls_back_to_two_lifted_lines() {
        let layers = plan(&student("Aisha Rahman"), &school(), Orientation::Portrait, Side::Front)
            .unwrap();
        let layout = layout_for(Orientation::Portrait, Side::Front);
        let spec = layout.field("school_name").unwrap();
        let auto = spec.auto_size.unwrap();
        let school_name = layer_named(&layers, Orientation::Portrait, Side::Front, "school_name");

        // One line is unreachable even at the floor, so the second attempt
        // keeps the nominal size and takes the second line instead.
        assert_eq!(school_name.lines.len(), 2);
        assert_eq!(school_name.font_size, spec.font_size);
        assert_eq!(school_name.top, spec.y - auto.two_line_lift);
    }

    #[test]
    fn short_school_name_keeps_nominal_size_and_anchor() {
        let mut compact = school();
        compact.name = "Hillside School".into();
        let layers =
            plan(&student("Aisha Rahman"), &compact, Orientation::Landscape, Side::Front).unwrap();
        let layout = layout_for(Orientation::Landscape, Side::Front);
        let spec = layout.field("school_name").unwrap();
        let school_name = layer_named(&layers, Orientation::Landscape, Side::Front, "school_name");
        assert_eq!(school_name.lines.len(), 1);
        assert_eq!(school_name.font_size, spec.font_size);
        assert_eq!(school_name.top, spec.y);
    }

    #[test]
    fn school_address_hangs_off_the_measured_school_name() {
        let layers =
            plan(&student("Aisha Rahman"), &school(), Orientation::Landscape, Side::Front).unwrap();
        let layout = layout_for(Orientation::Landscape, Side::Front);
        let gap = layout
            .field("school_address")
            .unwrap()
            .depends_on
            .unwrap()
            .gap;
        let name = layer_named(&layers, Orientation::Landscape, Side::Front, "school_name");
        let address = layer_named(&layers, Orientation::Landscape, Side::Front, "school_address");
        assert_eq!(address.top, name.top + name.height() + gap);
    }

    #[test]
    fn derived_budget_field_wraps_within_its_column() {
        let mut wide = school();
        wide.address =
            "Plot 44, Industrial Estate Road, Northern Extension, Riverton District 560099"
                .into();
        let layers =
            plan(&student("Aisha Rahman"), &wide, Orientation::Portrait, Side::Back).unwrap();
        let layout = layout_for(Orientation::Portrait, Side::Back);
        let spec = layout.field("return_school_address").unwrap();
        let budget = crate::text::chars_for_width(spec.max_width, spec.font_size);
        let address =
            layer_named(&layers, Orientation::Portrait, Side::Back, "return_school_address");
        assert!(address.lines.len() > 1);
        for line in &address.lines {
            assert!(line.chars().count() <= budget);
        }
    }

    #[test]
    fn blank_dob_renders_placeholder_not_error() {
        let mut record = student("Aisha Rahman");
        record.date_of_birth = "   ".into();
        let layers = plan(&record, &school(), Orientation::Landscape, Side::Front).unwrap();
        let dob = layer_named(&layers, Orientation::Landscape, Side::Front, "dob_value");
        assert_eq!(dob.lines, vec![PLACEHOLDER.to_string()]);
    }

    #[test]
    fn sequence_display_falls_back_to_roll_then_id() {
        let mut record = student("Aisha Rahman");
        record.sequence_no = None;
        let layers = plan(&record, &school(), Orientation::Landscape, Side::Front).unwrap();
        let seq = layer_named(&layers, Orientation::Landscape, Side::Front, "seq_value");
        assert_eq!(seq.lines, vec!["17".to_string()]);

        record.roll_no = None;
        let layers = plan(&record, &school(), Orientation::Landscape, Side::Front).unwrap();
        let seq = layer_named(&layers, Orientation::Landscape, Side::Front, "seq_value");
        assert_eq!(seq.lines, vec!["st-0042".to_string()]);
    }

    #[test]
    fn missing_photo_reference_just_skips_the_slot() {
        let mut record = student("Aisha Rahman");
        record.photo = None;
        let layers = plan(&record, &school(), Orientation::Landscape, Side::Front).unwrap();
        assert!(!layers.iter().any(|layer| matches!(
            layer,
            Layer::Image(ImageLayer {
                kind: ImageKind::Photo,
                ..
            })
        )));
    }
}
