use crate::{GenericSqlWriter, Result, SqlWriter, invalid_argument};
use std::ops::{BitOr, BitOrAssign};

/// Bit set of column attributes, the bit layout matches the one used by the schema definitions.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnAttributes(u8);

impl ColumnAttributes {
    pub const NONE: Self = Self(0b0000_0000);
    pub const PRIMARY_KEY: Self = Self(0b0000_0001);
    pub const NOT_NULL: Self = Self(0b0000_0010);
    pub const UNIQUE: Self = Self(0b0000_0100);
    pub const BINARY: Self = Self(0b0000_1000);
    pub const UNSIGNED: Self = Self(0b0001_0000);
    pub const ZERO_FILL: Self = Self(0b0010_0000);
    pub const AUTO_INCREMENT: Self = Self(0b0100_0000);
    pub const GENERATED: Self = Self(0b1000_0000);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }
    pub const fn bits(self) -> u8 {
        self.0
    }
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
    pub const fn is_primary_key(self) -> bool {
        self.contains(Self::PRIMARY_KEY)
    }
    pub const fn is_not_null(self) -> bool {
        self.contains(Self::NOT_NULL)
    }
    pub const fn is_unique(self) -> bool {
        self.contains(Self::UNIQUE)
    }
    pub const fn is_binary(self) -> bool {
        self.contains(Self::BINARY)
    }
    pub const fn is_unsigned(self) -> bool {
        self.contains(Self::UNSIGNED)
    }
    pub const fn is_zero_fill(self) -> bool {
        self.contains(Self::ZERO_FILL)
    }
    pub const fn is_auto_increment(self) -> bool {
        self.contains(Self::AUTO_INCREMENT)
    }
    pub const fn is_generated(self) -> bool {
        self.contains(Self::GENERATED)
    }
}

impl BitOr for ColumnAttributes {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ColumnAttributes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Storage class of a column, drives the type written by `CREATE TABLE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// Fixed width character column.
    Char(u32),
    TinyInt,
    SmallInt,
    MediumInt,
    Int,
    BigInt,
    LongBlob,
    /// Variable width character column.
    Varchar(u32),
}

impl ColumnType {
    pub fn width(&self) -> Option<u32> {
        match self {
            ColumnType::Char(width) | ColumnType::Varchar(width) => Some(*width),
            _ => None,
        }
    }
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ColumnType::TinyInt
                | ColumnType::SmallInt
                | ColumnType::MediumInt
                | ColumnType::Int
                | ColumnType::BigInt
        )
    }
}

/// Declarative description of one table column.
///
/// Columns are immutable once the owning [`crate::Table`] is built, the table fills in its own name so
/// that the column can be rendered qualified (`` `table`.`column` ``).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    pub(crate) table: String,
    column_type: ColumnType,
    attributes: ColumnAttributes,
}

impl Column {
    pub fn new(
        name: impl Into<String>,
        column_type: ColumnType,
        attributes: ColumnAttributes,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            invalid_argument!("Column name must not be empty");
        }
        match column_type {
            ColumnType::Char(width) if width == 0 || width > 255 => {
                invalid_argument!("CHAR column `{}` must have a width in 1..=255", name)
            }
            ColumnType::Varchar(width) if width == 0 || width > 65_535 => {
                invalid_argument!("VARCHAR column `{}` must have a width in 1..=65535", name)
            }
            _ => {}
        }
        Ok(Self {
            name,
            table: String::new(),
            column_type,
            attributes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    /// Name of the owning table, empty until the column is placed in a table.
    pub fn table(&self) -> &str {
        &self.table
    }
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }
    pub fn attributes(&self) -> ColumnAttributes {
        self.attributes
    }
    pub fn width(&self) -> Option<u32> {
        self.column_type.width()
    }

    /// `` `name` ``
    pub fn sql_name(&self) -> String {
        let mut out = String::new();
        GenericSqlWriter::new().write_identifier_quoted(&mut out, &self.name);
        out
    }
    /// `` `table`.`name` ``, or just the quoted name for a column without table.
    pub fn qualified_name(&self) -> String {
        let mut out = String::new();
        GenericSqlWriter::new().write_column(&mut out, self, true);
        out
    }
    pub fn name_as(&self, alias: &str) -> String {
        with_alias(self.sql_name(), alias)
    }
    pub fn qualified_name_as(&self, alias: &str) -> String {
        with_alias(self.qualified_name(), alias)
    }
}

fn with_alias(mut name: String, alias: &str) -> String {
    if !alias.is_empty() {
        name.push_str(" AS ");
        name.push_str(alias);
    }
    name
}
