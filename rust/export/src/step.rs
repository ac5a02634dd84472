// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ISO 10303-21 (STEP physical file) writer
//!
//! Entities are numbered in the order they are added. An attribute can only
//! hold an [`EntityId`] returned by an earlier `add`, so the data section
//! never contains forward references.

use std::fmt::{self, Write};

/// Instance name `#n` of a written entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum StepValue {
    /// Entity reference
    Ref(EntityId),
    /// String value, escaped on output
    String(String),
    Integer(i64),
    Real(f64),
    /// Enumeration literal without the dots
    Enum(&'static str),
    Bool(bool),
    List(Vec<StepValue>),
    /// Typed value such as `IFCLABEL('x')`
    Typed(&'static str, Box<StepValue>),
    /// `$`
    Null,
    /// `*`
    Derived,
}

impl StepValue {
    pub fn string(s: impl Into<String>) -> Self {
        StepValue::String(s.into())
    }

    pub fn reals(values: &[f64]) -> Self {
        StepValue::List(values.iter().copied().map(StepValue::Real).collect())
    }

    pub fn refs(ids: &[EntityId]) -> Self {
        StepValue::List(ids.iter().copied().map(StepValue::Ref).collect())
    }

    pub fn typed(type_name: &'static str, value: StepValue) -> Self {
        StepValue::Typed(type_name, Box::new(value))
    }

    fn write_to(&self, out: &mut String) {
        match self {
            StepValue::Ref(id) => {
                let _ = write!(out, "{}", id);
            }
            StepValue::String(s) => encode_string(s, out),
            StepValue::Integer(i) => {
                let _ = write!(out, "{}", i);
            }
            StepValue::Real(v) => format_real(*v, out),
            StepValue::Enum(e) => {
                out.push('.');
                out.push_str(e);
                out.push('.');
            }
            StepValue::Bool(b) => out.push_str(if *b { ".T." } else { ".F." }),
            StepValue::List(items) => {
                out.push('(');
                write_list(items, out);
                out.push(')');
            }
            StepValue::Typed(type_name, inner) => {
                out.push_str(type_name);
                out.push('(');
                inner.write_to(out);
                out.push(')');
            }
            StepValue::Null => out.push('$'),
            StepValue::Derived => out.push('*'),
        }
    }
}

fn write_list(items: &[StepValue], out: &mut String) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        item.write_to(out);
    }
}

/// Reals always carry a decimal point; values within 1e-12 of zero are
/// written as `0.` so rounding noise does not leak into the file.
fn format_real(value: f64, out: &mut String) {
    let value = if value.abs() < 1e-12 { 0.0 } else { value };
    let start = out.len();
    let _ = write!(out, "{}", value);
    if !out[start..].contains('.') {
        out.push('.');
    }
}

/// Quote a string, doubling `'` and `\` and encoding non-ASCII as `\X2\`/`\X4\`.
fn encode_string(s: &str, out: &mut String) {
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            ' '..='~' => out.push(c),
            c if (c as u32) <= 0xFFFF => {
                let _ = write!(out, "\\X2\\{:04X}\\X0\\", c as u32);
            }
            c => {
                let _ = write!(out, "\\X4\\{:08X}\\X0\\", c as u32);
            }
        }
    }
    out.push('\'');
}

/// HEADER section fields
#[derive(Debug, Clone, PartialEq)]
pub struct StepHeader {
    pub description: String,
    pub file_name: String,
    pub timestamp: String,
    pub author: String,
    pub organization: String,
    pub preprocessor: String,
    pub originating_system: String,
    pub schema: String,
}

/// Builder for the DATA section
#[derive(Debug)]
pub struct StepWriter {
    data: String,
    next_id: u32,
}

impl StepWriter {
    pub fn new() -> Self {
        Self {
            data: String::new(),
            next_id: 1,
        }
    }

    /// Append `#n=TYPE(attrs);` and return `#n`.
    pub fn add(&mut self, type_name: &str, attrs: &[StepValue]) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;

        let _ = write!(self.data, "{}={}(", id, type_name);
        write_list(attrs, &mut self.data);
        self.data.push_str(");\n");
        id
    }

    /// Number of entities written so far
    pub fn len(&self) -> usize {
        self.next_id.saturating_sub(1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wrap the data section with header and footer.
    pub fn finish(self, header: &StepHeader) -> String {
        let mut out = String::with_capacity(self.data.len() + 512);
        out.push_str("ISO-10303-21;\nHEADER;\n");

        let file_description = [
            StepValue::List(vec![StepValue::string(header.description.as_str())]),
            StepValue::string("2;1"),
        ];
        out.push_str("FILE_DESCRIPTION(");
        write_list(&file_description, &mut out);
        out.push_str(");\n");

        let file_name = [
            StepValue::string(header.file_name.as_str()),
            StepValue::string(header.timestamp.as_str()),
            StepValue::List(vec![StepValue::string(header.author.as_str())]),
            StepValue::List(vec![StepValue::string(header.organization.as_str())]),
            StepValue::string(header.preprocessor.as_str()),
            StepValue::string(header.originating_system.as_str()),
            StepValue::string(""),
        ];
        out.push_str("FILE_NAME(");
        write_list(&file_name, &mut out);
        out.push_str(");\n");

        out.push_str("FILE_SCHEMA(");
        StepValue::List(vec![StepValue::string(header.schema.as_str())]).write_to(&mut out);
        out.push_str(");\nENDSEC;\nDATA;\n");

        out.push_str(&self.data);
        out.push_str("ENDSEC;\nEND-ISO-10303-21;\n");
        out
    }
}

impl Default for StepWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(value: StepValue) -> String {
        let mut out = String::new();
        value.write_to(&mut out);
        out
    }

    #[test]
    fn test_reals_have_decimal_point() {
        assert_eq!(render(StepValue::Real(1.0)), "1.");
        assert_eq!(render(StepValue::Real(-0.25)), "-0.25");
        assert_eq!(render(StepValue::Real(1e-17)), "0.");
        assert_eq!(render(StepValue::Real(-0.0)), "0.");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(render(StepValue::string("it's")), "'it''s'");
        assert_eq!(render(StepValue::string("a\\b")), "'a\\\\b'");
        assert_eq!(render(StepValue::string("Añ")), "'A\\X2\\00F1\\X0\\'");
    }

    #[test]
    fn test_nested_values() {
        let value = StepValue::List(vec![
            StepValue::Ref(EntityId(3)),
            StepValue::Enum("AREA"),
            StepValue::typed("IFCLABEL", StepValue::string("x")),
            StepValue::Null,
            StepValue::Derived,
            StepValue::Bool(true),
        ]);
        assert_eq!(render(value), "(#3,.AREA.,IFCLABEL('x'),$,*,.T.)");
    }

    #[test]
    fn test_ids_increase_in_order() {
        let mut writer = StepWriter::new();
        let a = writer.add("IFCCARTESIANPOINT", &[StepValue::reals(&[0.0, 0.0, 0.0])]);
        let b = writer.add("IFCDIRECTION", &[StepValue::reals(&[0.0, 0.0, 1.0])]);
        assert_eq!(a, EntityId(1));
        assert_eq!(b, EntityId(2));
        assert_eq!(writer.len(), 2);

        let header = StepHeader {
            description: "ViewDefinition [DesignTransferView]".to_string(),
            file_name: "test.ifc".to_string(),
            timestamp: "2024-01-01T00:00:00".to_string(),
            author: String::new(),
            organization: String::new(),
            preprocessor: "test".to_string(),
            originating_system: "test".to_string(),
            schema: "IFC4".to_string(),
        };
        let text = writer.finish(&header);
        assert!(text.starts_with("ISO-10303-21;\nHEADER;\n"));
        assert!(text.contains("#1=IFCCARTESIANPOINT((0.,0.,0.));\n#2=IFCDIRECTION((0.,0.,1.));\n"));
        assert!(text.contains("FILE_SCHEMA(('IFC4'));"));
        assert!(text.ends_with("ENDSEC;\nEND-ISO-10303-21;\n"));
    }
}
