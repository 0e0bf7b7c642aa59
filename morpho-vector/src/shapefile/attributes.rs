/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/
use std::collections::HashMap;
use std::fmt;

/// The header block of a dBASE (.dbf) attribute table.
#[derive(Debug, Default, Clone)]
pub struct AttributeHeader {
    pub version: u8,
    pub year: u32,
    pub month: u8,
    pub day: u8,
    pub num_records: u32,
    pub num_fields: u32, // not actually stored in the file
    pub bytes_in_header: u16,
    pub bytes_in_record: u16,
    pub language_driver_id: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDataType {
    Int,
    Real,
    Text,
    Date,
    Bool,
}

impl FieldDataType {
    pub fn to_char(&self) -> char {
        match self {
            FieldDataType::Int => 'N',
            FieldDataType::Real => 'F',
            FieldDataType::Text => 'C',
            FieldDataType::Date => 'D',
            FieldDataType::Bool => 'L',
        }
    }
}

/// A single field descriptor in the attribute table.
#[derive(Debug, Default, Clone)]
pub struct AttributeField {
    pub name: String,
    pub field_type: char,
    pub field_length: u8,
    pub decimal_count: u8,
}

impl AttributeField {
    pub fn new<'a>(
        name: &'a str,
        field_type: FieldDataType,
        field_length: u8,
        decimal_count: u8,
    ) -> AttributeField {
        AttributeField {
            name: name.to_string(),
            field_type: field_type.to_char(),
            field_length: field_length,
            decimal_count: decimal_count,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DateData {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl fmt::Display for DateData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{:02}{:02}", self.year, self.month, self.day)
    }
}

/// A single attribute value. Missing values are carried as `Null` and are
/// never silently coerced to zero.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum FieldData {
    #[default]
    Null,
    Int(i32),
    Real(f64),
    Text(String),
    Date(DateData),
    Bool(bool),
}

impl FieldData {
    /// Numeric view of the value; `None` for nulls and non-numeric types.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldData::Int(v) => Some(*v as f64),
            FieldData::Real(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldData::Null => write!(f, "null"),
            FieldData::Int(v) => write!(f, "{}", v),
            FieldData::Real(v) => write!(f, "{}", v),
            FieldData::Text(v) => write!(f, "{}", v),
            FieldData::Date(v) => write!(f, "{}", v),
            FieldData::Bool(v) => write!(f, "{}", v),
        }
    }
}

/// An in-memory dBASE attribute table.
#[derive(Debug, Default, Clone)]
pub struct ShapefileAttributes {
    pub header: AttributeHeader,
    pub fields: Vec<AttributeField>,
    data: Vec<Vec<FieldData>>,
    pub is_deleted: Vec<bool>,
    field_map: HashMap<String, usize>,
}

impl ShapefileAttributes {
    pub fn add_field(&mut self, field: &AttributeField) {
        self.field_map
            .insert(field.name.clone(), self.fields.len());
        self.fields.push(field.clone());
        self.header.num_fields = self.fields.len() as u32;
        for record in &mut self.data {
            record.push(FieldData::Null);
        }
    }

    pub fn add_fields(&mut self, fields: &[AttributeField]) {
        for field in fields {
            self.add_field(field);
        }
    }

    pub fn add_record(&mut self, record: Vec<FieldData>, deleted: bool) {
        self.data.push(record);
        self.is_deleted.push(deleted);
        self.header.num_records = self.data.len() as u32;
    }

    pub fn get_record(&self, index: usize) -> Vec<FieldData> {
        if index >= self.data.len() {
            panic!("Attribute record index out of bounds");
        }
        self.data[index].clone()
    }

    pub fn get_field_num(&self, name: &str) -> Option<usize> {
        self.field_map.get(name).copied()
    }

    /// Returns the value of a named field for a record, or `Null` if the
    /// field does not exist.
    pub fn get_value(&self, index: usize, field_name: &str) -> FieldData {
        match self.get_field_num(field_name) {
            Some(f) => self.data[index][f].clone(),
            None => FieldData::Null,
        }
    }

    pub fn set_value(&mut self, index: usize, field_name: &str, value: FieldData) {
        if let Some(f) = self.get_field_num(field_name) {
            self.data[index][f] = value;
        }
    }

    /// Rebuilds the name-to-index map, needed after fields are cloned in
    /// from another table.
    pub fn rebuild_field_map(&mut self) {
        self.field_map.clear();
        for (i, field) in self.fields.iter().enumerate() {
            self.field_map.insert(field.name.clone(), i);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_add_field_backfills_null() {
        let mut attrs = ShapefileAttributes::default();
        attrs.add_field(&AttributeField::new("FID", FieldDataType::Int, 7, 0));
        attrs.add_record(vec![FieldData::Int(1)], false);
        attrs.add_field(&AttributeField::new("Area", FieldDataType::Real, 12, 4));
        assert_eq!(attrs.get_value(0, "Area"), FieldData::Null);
        assert_eq!(attrs.get_value(0, "FID"), FieldData::Int(1));
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(FieldData::Int(3).as_f64(), Some(3.0));
        assert_eq!(FieldData::Real(2.5).as_f64(), Some(2.5));
        assert_eq!(FieldData::Null.as_f64(), None);
        assert_eq!(FieldData::Text("x".to_string()).as_f64(), None);
    }

    #[test]
    fn test_get_value_of_missing_field_is_null() {
        let mut attrs = ShapefileAttributes::default();
        attrs.add_field(&AttributeField::new("FID", FieldDataType::Int, 7, 0));
        attrs.add_record(vec![FieldData::Int(1)], false);
        assert_eq!(attrs.get_value(0, "nope"), FieldData::Null);
    }
}
