//! The four template position tables.
//!
//! Coordinates, budgets and colors are calibrated against the shipped
//! template art (1012x638 landscape, 638x1012 portrait). Slot order is paint
//! order. The short/long-name shift offsets rebalance the detail block when a
//! name leaves more or less whitespace than the nominal case.

use crate::model::{Orientation, Side};

use super::{
    AutoSize, Dependency, FieldSource, FieldSpec, FontWeight, ImageSlot, ShiftRule, SlotSpec,
    TemplateLayout,
};

const BASE: FieldSpec = FieldSpec::base();

const NAVY: &str = "#1A237E";
const SLATE: &str = "#37474F";
const LABEL_GREY: &str = "#455A64";
const INK: &str = "#102027";
const BLOOD_RED: &str = "#B71C1C";

static LANDSCAPE_FRONT_SLOTS: [SlotSpec; 13] = [
    SlotSpec::Logo(ImageSlot {
        x: 36,
        y: 28,
        width: 76,
        height: 76,
    }),
    SlotSpec::Field(FieldSpec {
        name: "school_name",
        source: FieldSource::SchoolName,
        x: 132,
        y: 44,
        font_size: 34,
        weight: FontWeight::Bold,
        color: NAVY,
        max_chars_per_line: 30,
        line_height: 40,
        multi_line: true,
        auto_size: Some(AutoSize {
            min_font_size: 24,
            max_lines: 2,
            two_line_lift: 16,
        }),
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "school_address",
        source: FieldSource::SchoolAddress,
        x: 132,
        font_size: 18,
        color: SLATE,
        max_chars_per_line: 52,
        line_height: 24,
        multi_line: true,
        depends_on: Some(Dependency {
            field: "school_name",
            gap: 8,
        }),
        ..BASE
    }),
    SlotSpec::Photo(ImageSlot {
        x: 48,
        y: 180,
        width: 220,
        height: 270,
    }),
    SlotSpec::Field(FieldSpec {
        name: "name_label",
        source: FieldSource::Label("Name"),
        x: 320,
        y: 200,
        weight: FontWeight::Medium,
        color: LABEL_GREY,
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "name_value",
        source: FieldSource::StudentName,
        x: 478,
        y: 200,
        font_size: 22,
        weight: FontWeight::Bold,
        max_chars_per_line: 24,
        line_height: 30,
        multi_line: true,
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "seq_label",
        source: FieldSource::Label("Seq. No"),
        x: 320,
        y: 252,
        weight: FontWeight::Medium,
        color: LABEL_GREY,
        shift_with_name: true,
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "seq_value",
        source: FieldSource::SequenceNo,
        x: 478,
        y: 252,
        font_size: 22,
        weight: FontWeight::Bold,
        shift_with_name: true,
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "class_label",
        source: FieldSource::Label("Class"),
        x: 320,
        y: 304,
        weight: FontWeight::Medium,
        color: LABEL_GREY,
        shift_with_name: true,
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "class_value",
        source: FieldSource::ClassSection,
        x: 478,
        y: 304,
        font_size: 22,
        weight: FontWeight::Bold,
        shift_with_name: true,
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "dob_label",
        source: FieldSource::Label("Date of Birth"),
        x: 320,
        y: 356,
        weight: FontWeight::Medium,
        color: LABEL_GREY,
        shift_with_name: true,
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "dob_value",
        source: FieldSource::DateOfBirth,
        x: 478,
        y: 356,
        font_size: 22,
        weight: FontWeight::Bold,
        shift_with_name: true,
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "blood_group",
        source: FieldSource::BloodGroup,
        x: 896,
        y: 44,
        font_size: 26,
        weight: FontWeight::Bold,
        color: BLOOD_RED,
        ..BASE
    }),
];

static LANDSCAPE_FRONT_RULES: [ShiftRule; 1] = [
    // Short single-line names leave the detail column hugging the photo;
    // nudge the whole block right.
    ShiftRule {
        min_len: 0,
        max_len: 16,
        dx: 24,
        fields: &[
            "name_label",
            "name_value",
            "seq_label",
            "seq_value",
            "class_label",
            "class_value",
            "dob_label",
            "dob_value",
        ],
    },
];

static LANDSCAPE_BACK_SLOTS: [SlotSpec; 6] = [
    SlotSpec::Field(FieldSpec {
        name: "student_address",
        source: FieldSource::StudentAddress,
        x: 318,
        y: 96,
        color: "#263238",
        max_chars_per_line: 30,
        subsequent_max_chars: Some(46),
        line_height: 28,
        multi_line: true,
        // First line runs on from the printed "Address" caption; the rest
        // restart at the caption's left edge.
        continuation_x: Some(132),
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "student_phone",
        source: FieldSource::StudentPhone,
        x: 318,
        color: "#263238",
        depends_on: Some(Dependency {
            field: "student_address",
            gap: 14,
        }),
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "return_school_name",
        source: FieldSource::SchoolName,
        x: 132,
        font_size: 22,
        weight: FontWeight::Bold,
        color: NAVY,
        line_height: 28,
        multi_line: true,
        depends_on: Some(Dependency {
            field: "student_phone",
            gap: 52,
        }),
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "return_school_address",
        source: FieldSource::SchoolAddress,
        x: 132,
        font_size: 18,
        color: SLATE,
        // Budget derived from the printable column width.
        max_chars_per_line: 0,
        max_width: 562,
        line_height: 24,
        multi_line: true,
        depends_on: Some(Dependency {
            field: "return_school_name",
            gap: 6,
        }),
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "return_school_phone",
        source: FieldSource::SchoolPhone,
        x: 132,
        font_size: 18,
        color: SLATE,
        depends_on: Some(Dependency {
            field: "return_school_address",
            gap: 6,
        }),
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "return_school_email",
        source: FieldSource::SchoolEmail,
        x: 132,
        font_size: 18,
        color: SLATE,
        depends_on: Some(Dependency {
            field: "return_school_phone",
            gap: 6,
        }),
        ..BASE
    }),
];

static PORTRAIT_FRONT_SLOTS: [SlotSpec; 13] = [
    SlotSpec::Logo(ImageSlot {
        x: 28,
        y: 28,
        width: 64,
        height: 64,
    }),
    SlotSpec::Field(FieldSpec {
        name: "school_name",
        source: FieldSource::SchoolName,
        x: 104,
        y: 36,
        font_size: 28,
        weight: FontWeight::Bold,
        color: NAVY,
        max_chars_per_line: 24,
        line_height: 34,
        multi_line: true,
        auto_size: Some(AutoSize {
            min_font_size: 20,
            max_lines: 2,
            two_line_lift: 14,
        }),
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "school_address",
        source: FieldSource::SchoolAddress,
        x: 104,
        font_size: 16,
        color: SLATE,
        max_chars_per_line: 38,
        line_height: 22,
        multi_line: true,
        depends_on: Some(Dependency {
            field: "school_name",
            gap: 6,
        }),
        ..BASE
    }),
    SlotSpec::Photo(ImageSlot {
        x: 209,
        y: 240,
        width: 220,
        height: 270,
    }),
    SlotSpec::Field(FieldSpec {
        name: "name_label",
        source: FieldSource::Label("Name"),
        x: 64,
        y: 560,
        font_size: 18,
        weight: FontWeight::Medium,
        color: LABEL_GREY,
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "name_value",
        source: FieldSource::StudentName,
        x: 230,
        y: 560,
        weight: FontWeight::Bold,
        max_chars_per_line: 22,
        line_height: 28,
        multi_line: true,
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "seq_label",
        source: FieldSource::Label("Seq. No"),
        x: 64,
        y: 612,
        font_size: 18,
        weight: FontWeight::Medium,
        color: LABEL_GREY,
        shift_with_name: true,
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "seq_value",
        source: FieldSource::SequenceNo,
        x: 230,
        y: 612,
        weight: FontWeight::Bold,
        shift_with_name: true,
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "class_label",
        source: FieldSource::Label("Class"),
        x: 64,
        y: 664,
        font_size: 18,
        weight: FontWeight::Medium,
        color: LABEL_GREY,
        shift_with_name: true,
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "class_value",
        source: FieldSource::ClassSection,
        x: 230,
        y: 664,
        weight: FontWeight::Bold,
        shift_with_name: true,
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "dob_label",
        source: FieldSource::Label("Date of Birth"),
        x: 64,
        y: 716,
        font_size: 18,
        weight: FontWeight::Medium,
        color: LABEL_GREY,
        shift_with_name: true,
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "dob_value",
        source: FieldSource::DateOfBirth,
        x: 230,
        y: 716,
        weight: FontWeight::Bold,
        shift_with_name: true,
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "blood_group",
        source: FieldSource::BloodGroup,
        x: 520,
        y: 44,
        font_size: 24,
        weight: FontWeight::Bold,
        color: BLOOD_RED,
        ..BASE
    }),
];

static PORTRAIT_FRONT_RULES: [ShiftRule; 2] = [
    // The portrait value column is narrow: very short names move the pair
    // right, borderline-long single-line names pull it back left.
    ShiftRule {
        min_len: 0,
        max_len: 12,
        dx: 16,
        fields: &["name_label", "name_value"],
    },
    ShiftRule {
        min_len: 13,
        max_len: 18,
        dx: -8,
        fields: &["name_label", "name_value"],
    },
];

static PORTRAIT_BACK_SLOTS: [SlotSpec; 6] = [
    SlotSpec::Field(FieldSpec {
        name: "student_address",
        source: FieldSource::StudentAddress,
        x: 214,
        y: 110,
        font_size: 18,
        color: "#263238",
        max_chars_per_line: 24,
        subsequent_max_chars: Some(34),
        line_height: 26,
        multi_line: true,
        continuation_x: Some(84),
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "student_phone",
        source: FieldSource::StudentPhone,
        x: 214,
        font_size: 18,
        color: "#263238",
        depends_on: Some(Dependency {
            field: "student_address",
            gap: 12,
        }),
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "return_school_name",
        source: FieldSource::SchoolName,
        x: 84,
        weight: FontWeight::Bold,
        color: NAVY,
        max_chars_per_line: 30,
        multi_line: true,
        depends_on: Some(Dependency {
            field: "student_phone",
            gap: 48,
        }),
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "return_school_address",
        source: FieldSource::SchoolAddress,
        x: 84,
        font_size: 16,
        color: SLATE,
        // Budget derived from the printable column width.
        max_chars_per_line: 0,
        max_width: 384,
        line_height: 22,
        multi_line: true,
        depends_on: Some(Dependency {
            field: "return_school_name",
            gap: 6,
        }),
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "return_school_phone",
        source: FieldSource::SchoolPhone,
        x: 84,
        font_size: 16,
        color: SLATE,
        depends_on: Some(Dependency {
            field: "return_school_address",
            gap: 6,
        }),
        ..BASE
    }),
    SlotSpec::Field(FieldSpec {
        name: "return_school_email",
        source: FieldSource::SchoolEmail,
        x: 84,
        font_size: 16,
        color: SLATE,
        depends_on: Some(Dependency {
            field: "return_school_phone",
            gap: 6,
        }),
        ..BASE
    }),
];

static LANDSCAPE_FRONT: TemplateLayout = TemplateLayout {
    width: 1012,
    height: 638,
    slots: &LANDSCAPE_FRONT_SLOTS,
    shift_rules: &LANDSCAPE_FRONT_RULES,
};

static LANDSCAPE_BACK: TemplateLayout = TemplateLayout {
    width: 1012,
    height: 638,
    slots: &LANDSCAPE_BACK_SLOTS,
    shift_rules: &[],
};

static PORTRAIT_FRONT: TemplateLayout = TemplateLayout {
    width: 638,
    height: 1012,
    slots: &PORTRAIT_FRONT_SLOTS,
    shift_rules: &PORTRAIT_FRONT_RULES,
};

static PORTRAIT_BACK: TemplateLayout = TemplateLayout {
    width: 638,
    height: 1012,
    slots: &PORTRAIT_BACK_SLOTS,
    shift_rules: &[],
};

/// Pure lookup over the four fixed tables.
pub fn layout_for(orientation: Orientation, side: Side) -> &'static TemplateLayout {
    match (orientation, side) {
        (Orientation::Landscape, Side::Front) => &LANDSCAPE_FRONT,
        (Orientation::Landscape, Side::Back) => &LANDSCAPE_BACK,
        (Orientation::Portrait, Side::Front) => &PORTRAIT_FRONT,
        (Orientation::Portrait, Side::Back) => &PORTRAIT_BACK,
    }
}

/// Reject a bad table at construction time rather than mid-request.
pub fn validate_catalog() -> Result<(), super::LayoutError> {
    for orientation in [Orientation::Landscape, Orientation::Portrait] {
        for side in [Side::Front, Side::Back] {
            super::validate(layout_for(orientation, side))?;
        }
    }
    Ok(())
}
