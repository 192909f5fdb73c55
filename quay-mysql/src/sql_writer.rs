use quay_core::SqlWriter;

#[derive(Default, Clone, Copy)]
pub struct MySQLSqlWriter {}

impl SqlWriter for MySQLSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    /// `CAST('<json>' AS JSON)`
    fn write_value_json(&self, out: &mut String, value: &quay_core::JsonValue) {
        out.push_str("CAST(");
        self.write_value_string(out, &value.to_string());
        out.push_str(" AS JSON)");
    }
}
