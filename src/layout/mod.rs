//! Declarative layout model.
//!
//! Each template variant is described by one static [`TemplateLayout`]: an
//! ordered slot table (image slots and text fields, in paint order) plus the
//! content-length shift rules. Text fields may chain vertically: a field with
//! a [`Dependency`] sits below the named field's measured bottom edge instead
//! of at its own static anchor. Chains only ever point backwards in table
//! order, which [`validate`] enforces; that rules out cycles outright.

pub mod catalog;
pub mod planner;

use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("duplicate field name: {0}")]
    DuplicateField(&'static str),
    #[error("field {field} depends on unknown or later field {depends_on}")]
    BadDependency {
        field: &'static str,
        depends_on: &'static str,
    },
    #[error("shift rule references unknown field {0}")]
    BadShiftTarget(&'static str),
    #[error("field {field} auto-size floor {min} exceeds start size {start}")]
    BadAutoSizeFloor {
        field: &'static str,
        min: u32,
        start: u32,
    },
    #[error("multi-line field {0} has neither a char budget nor a max width")]
    NoBudget(&'static str),
    #[error("field {0} planned before its dependency")]
    MissingHeight(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Regular,
    Medium,
    Bold,
}

/// Which attribute of the request feeds a field's text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldSource {
    /// Fixed on-card caption, e.g. `"Name"`.
    Label(&'static str),
    StudentName,
    SequenceNo,
    ClassSection,
    DateOfBirth,
    BloodGroup,
    StudentAddress,
    StudentPhone,
    SchoolName,
    SchoolAddress,
    SchoolPhone,
    SchoolEmail,
}

/// Iterative shrink parameters for fields that must fit a line bound.
#[derive(Clone, Copy, Debug)]
pub struct AutoSize {
    pub min_font_size: u32,
    pub max_lines: usize,
    /// Raise the anchor by this much when the text ends up on two lines,
    /// so the extra line grows upward into free space.
    pub two_line_lift: i32,
}

/// Vertical chaining: effective Y = dependee bottom + gap.
#[derive(Clone, Copy, Debug)]
pub struct Dependency {
    pub field: &'static str,
    pub gap: i32,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub source: FieldSource,
    pub x: i32,
    pub y: i32,
    pub font_size: u32,
    pub weight: FontWeight,
    pub color: &'static str,
    /// Explicit per-line character budget. Zero means "derive from
    /// `max_width` and the font size" via the width estimator.
    pub max_chars_per_line: usize,
    /// Budget for lines after the first, when it differs.
    pub subsequent_max_chars: Option<usize>,
    /// Pixel width of the field's column; only consulted when
    /// `max_chars_per_line` is zero.
    pub max_width: u32,
    pub line_height: u32,
    pub multi_line: bool,
    /// Back-side two-column wrap: continuation lines restart at this X.
    pub continuation_x: Option<i32>,
    pub auto_size: Option<AutoSize>,
    pub depends_on: Option<Dependency>,
    /// Front-side pairs below the student name move down together when the
    /// name wraps past one line.
    pub shift_with_name: bool,
}

impl FieldSpec {
    /// Catalog entries are written as `FieldSpec { name, source, .. }` over
    /// this all-defaults template.
    pub const fn base() -> Self {
        FieldSpec {
            name: "",
            source: FieldSource::Label(""),
            x: 0,
            y: 0,
            font_size: 20,
            weight: FontWeight::Regular,
            color: "#102027",
            max_chars_per_line: 40,
            subsequent_max_chars: None,
            max_width: 0,
            line_height: 26,
            multi_line: false,
            continuation_x: None,
            auto_size: None,
            depends_on: None,
            shift_with_name: false,
        }
    }
}

/// Fixed rectangle for the photo or logo.
#[derive(Clone, Copy, Debug)]
pub struct ImageSlot {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// One entry of a template's slot table. The table order is the paint order:
/// later slots draw over earlier ones.
#[derive(Clone, Copy, Debug)]
pub enum SlotSpec {
    Logo(ImageSlot),
    Photo(ImageSlot),
    Field(FieldSpec),
}

/// Horizontal rebalance applied when the student name sits on a single line
/// and its length falls inside the band. Thresholds and offsets are pixel
/// calibration against the template art; change them only with new art.
#[derive(Clone, Copy, Debug)]
pub struct ShiftRule {
    pub min_len: usize,
    pub max_len: usize,
    pub dx: i32,
    pub fields: &'static [&'static str],
}

#[derive(Clone, Copy, Debug)]
pub struct TemplateLayout {
    pub width: u32,
    pub height: u32,
    pub slots: &'static [SlotSpec],
    pub shift_rules: &'static [ShiftRule],
}

impl TemplateLayout {
    pub fn fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.slots.iter().filter_map(|slot| match slot {
            SlotSpec::Field(field) => Some(field),
            _ => None,
        })
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().find(|field| field.name == name)
    }
}

/// Validate one table: unique names, strictly backward dependencies (which
/// rules out cycles), resolvable shift targets, sane auto-size floors.
pub fn validate(layout: &TemplateLayout) -> Result<(), LayoutError> {
    let mut seen: Vec<&'static str> = Vec::new();

    for field in layout.fields() {
        if seen.contains(&field.name) {
            return Err(LayoutError::DuplicateField(field.name));
        }
        if let Some(dep) = field.depends_on {
            if !seen.contains(&dep.field) {
                return Err(LayoutError::BadDependency {
                    field: field.name,
                    depends_on: dep.field,
                });
            }
        }
        if let Some(auto) = field.auto_size {
            if auto.min_font_size > field.font_size {
                return Err(LayoutError::BadAutoSizeFloor {
                    field: field.name,
                    min: auto.min_font_size,
                    start: field.font_size,
                });
            }
        }
        if field.multi_line && field.max_chars_per_line == 0 && field.max_width == 0 {
            return Err(LayoutError::NoBudget(field.name));
        }
        seen.push(field.name);
    }

    for rule in layout.shift_rules {
        for target in rule.fields {
            if !seen.contains(target) {
                return Err(LayoutError::BadShiftTarget(target));
            }
        }
    }

    Ok(())
}

/// Measured vertical extent of one planned field.
#[derive(Clone, Copy, Debug)]
pub struct FieldExtent {
    pub y: i32,
    pub height: i32,
    pub bottom: i32,
}

/// Accumulator threaded through one planning pass. Created empty per call,
/// discarded afterwards; never shared across requests.
#[derive(Debug, Default)]
pub struct FieldHeights {
    entries: HashMap<&'static str, FieldExtent>,
}

impl FieldHeights {
    pub fn record(&mut self, name: &'static str, y: i32, height: i32) {
        self.entries.insert(
            name,
            FieldExtent {
                y,
                height,
                bottom: y + height,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<FieldExtent> {
        self.entries.get(name).copied()
    }
}

/// A planned overlay, in paint order.
#[derive(Clone, Debug)]
pub enum Layer {
    Image(ImageLayer),
    Text(TextLayer),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    /// Cover-cropped to the slot.
    Photo,
    /// Fitted inside the slot, aspect preserved.
    Logo,
}

#[derive(Clone, Debug)]
pub struct ImageLayer {
    pub kind: ImageKind,
    /// Path, URL or data URI; resolved at render time.
    pub source: String,
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

/// How a text layer's lines flow horizontally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextFlow {
    SingleLine,
    MultiLine,
    /// First line starts at the layer anchor (after an on-template caption),
    /// continuation lines restart further left.
    TwoColumn { continuation_left: i32 },
}

#[derive(Clone, Debug)]
pub struct TextLayer {
    pub lines: Vec<String>,
    pub left: i32,
    pub top: i32,
    pub font_size: u32,
    pub weight: FontWeight,
    pub color: &'static str,
    pub line_height: u32,
    pub flow: TextFlow,
}

impl TextLayer {
    pub fn height(&self) -> i32 {
        self.lines.len() as i32 * self.line_height as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leak_slots(slots: Vec<SlotSpec>) -> &'static [SlotSpec] {
        Box::leak(slots.into_boxed_slice())
    }

    fn named(name: &'static str) -> FieldSpec {
        FieldSpec {
            name,
            source: FieldSource::SchoolName,
            ..FieldSpec::base()
        }
    }

    fn layout_of(slots: &'static [SlotSpec], rules: &'static [ShiftRule]) -> TemplateLayout {
        TemplateLayout {
            width: 100,
            height: 100,
            slots,
            shift_rules: rules,
        }
    }

    #[test]
    fn forward_dependency_is_rejected() {
        let slots = leak_slots(vec![
            SlotSpec::Field(FieldSpec {
                depends_on: Some(Dependency { field: "b", gap: 4 }),
                ..named("a")
            }),
            SlotSpec::Field(named("b")),
        ]);
        assert!(matches!(
            validate(&layout_of(slots, &[])),
            Err(LayoutError::BadDependency { field: "a", .. })
        ));
    }

    #[test]
    fn self_dependency_is_rejected() {
        let slots = leak_slots(vec![SlotSpec::Field(FieldSpec {
            depends_on: Some(Dependency { field: "a", gap: 4 }),
            ..named("a")
        })]);
        assert!(validate(&layout_of(slots, &[])).is_err());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let slots = leak_slots(vec![SlotSpec::Field(named("a")), SlotSpec::Field(named("a"))]);
        assert!(matches!(
            validate(&layout_of(slots, &[])),
            Err(LayoutError::DuplicateField("a"))
        ));
    }

    #[test]
    fn shift_rule_must_name_real_fields() {
        let slots = leak_slots(vec![SlotSpec::Field(named("a"))]);
        static RULES: [ShiftRule; 1] = [ShiftRule {
            min_len: 0,
            max_len: 10,
            dx: 8,
            fields: &["ghost"],
        }];
        assert!(matches!(
            validate(&layout_of(slots, &RULES)),
            Err(LayoutError::BadShiftTarget("ghost"))
        ));
    }

    #[test]
    fn auto_size_floor_above_start_is_rejected() {
        let slots = leak_slots(vec![SlotSpec::Field(FieldSpec {
            font_size: 20,
            auto_size: Some(AutoSize {
                min_font_size: 26,
                max_lines: 2,
                two_line_lift: 0,
            }),
            ..named("a")
        })]);
        assert!(matches!(
            validate(&layout_of(slots, &[])),
            Err(LayoutError::BadAutoSizeFloor { field: "a", .. })
        ));
    }

    #[test]
    fn heights_accumulate_bottom_edges() {
        let mut heights = FieldHeights::default();
        heights.record("school_name", 40, 80);
        let extent = heights.get("school_name").unwrap();
        assert_eq!(extent.bottom, 120);
        assert!(heights.get("missing").is_none());
    }
}
