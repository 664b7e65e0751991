use crate::Value;
use std::fmt::Write;
use time::{Date, PrimitiveDateTime, Time};

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($this:ident, $out:ident, $value:expr) => {{
        if $value.is_infinite() {
            $this.write_value_infinity($out, $value.is_sign_negative());
        } else if $value.is_nan() {
            $this.write_value_nan($out);
        } else {
            let mut buffer = ryu::Buffer::new();
            $out.push_str(buffer.format($value));
        }
    }};
}

/// Renders statements with their parameters inlined, for logs and diagnostics only.
///
/// The output is never sent to a connection: placeholders are replaced by literals so that a
/// human can read the statement that ran.
pub trait SqlWriter {
    /// Write `sentence` replacing each `?` placeholder, outside quoted sections, by the literal of
    /// the next parameter. Placeholders without a parameter are kept as they are.
    fn write_sql(&self, out: &mut String, sentence: &str, params: &[Value]) {
        let mut params = params.iter();
        let mut quote = None;
        let mut escaped = false;
        for c in sentence.chars() {
            match quote {
                Some(_) if escaped => escaped = false,
                Some(_) if c == '\\' => escaped = true,
                Some(q) if c == q => quote = None,
                Some(_) => {}
                None if matches!(c, '\'' | '"' | '`') => quote = Some(c),
                None if c == '?' => {
                    if let Some(value) = params.next() {
                        self.write_value(out, value);
                        continue;
                    }
                }
                None => {}
            }
            out.push(c);
        }
        if params.next().is_some() {
            log::debug!("More parameters than placeholders in: {}", out);
        }
    }

    /// Render a concrete value (including proper quoting / escaping).
    fn write_value(&self, out: &mut String, value: &Value) {
        match value {
            Value::Null => self.write_value_none(out),
            Value::Boolean(v) => self.write_value_bool(out, *v),
            Value::Int8(v) => write_integer!(out, *v),
            Value::Int16(v) => write_integer!(out, *v),
            Value::Int32(v) => write_integer!(out, *v),
            Value::Int64(v) => write_integer!(out, *v),
            Value::UInt8(v) => write_integer!(out, *v),
            Value::UInt16(v) => write_integer!(out, *v),
            Value::UInt32(v) => write_integer!(out, *v),
            Value::UInt64(v) => write_integer!(out, *v),
            Value::Float32(v) => write_float!(self, out, *v),
            Value::Float64(v) => write_float!(self, out, *v),
            Value::Decimal(v) => drop(write!(out, "{}", v)),
            Value::Varchar(v) => self.write_value_string(out, v),
            Value::Blob(v) => self.write_value_blob(out, v),
            Value::Date(v) => self.write_value_date(out, v),
            Value::Time(v) => self.write_value_time(out, v),
            Value::Timestamp(v) => self.write_value_timestamp(out, v),
            Value::Uuid(v) => drop(write!(out, "'{}'", v)),
            Value::List(values) => self.write_value_list(out, values),
        };
    }

    /// Render NULL literal.
    fn write_value_none(&self, out: &mut String) {
        out.push_str("NULL");
    }

    /// Render boolean literal.
    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push_str(["false", "true"][value as usize]);
    }

    fn write_value_infinity(&self, out: &mut String, negative: bool) {
        out.push_str(if negative { "'-Infinity'" } else { "'Infinity'" });
    }

    fn write_value_nan(&self, out: &mut String) {
        out.push_str("'NaN'");
    }

    /// Render and escape a string literal using single quotes.
    fn write_value_string(&self, out: &mut String, value: &str) {
        out.push('\'');
        let mut pos = 0;
        for (i, c) in value.char_indices() {
            if c == '\'' {
                out.push_str(&value[pos..i]);
                out.push_str("''");
                pos = i + 1;
            } else if c == '\n' {
                out.push_str(&value[pos..i]);
                out.push_str("\\n");
                pos = i + 1;
            }
        }
        out.push_str(&value[pos..]);
        out.push('\'');
    }

    /// Render a blob literal using hex escapes.
    fn write_value_blob(&self, out: &mut String, value: &[u8]) {
        out.push_str("x'");
        out.push_str(&hex::encode_upper(value));
        out.push('\'');
    }

    fn write_value_date(&self, out: &mut String, value: &Date) {
        let _ = write!(
            out,
            "'{:04}-{:02}-{:02}'",
            value.year(),
            value.month() as u8,
            value.day()
        );
    }

    fn write_value_time(&self, out: &mut String, value: &Time) {
        let _ = write!(
            out,
            "'{:02}:{:02}:{:02}",
            value.hour(),
            value.minute(),
            value.second()
        );
        let nanos = value.nanosecond();
        if nanos != 0 {
            let _ = write!(out, ".{:09}", nanos);
            while out.ends_with('0') {
                out.pop();
            }
        }
        out.push('\'');
    }

    fn write_value_timestamp(&self, out: &mut String, value: &PrimitiveDateTime) {
        self.write_value_date(out, &value.date());
        out.pop();
        out.push(' ');
        let len = out.len();
        self.write_value_time(out, &value.time());
        out.remove(len);
    }

    fn write_value_list(&self, out: &mut String, values: &[Value]) {
        out.push('(');
        for (i, v) in values.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_value(out, v);
        }
        out.push(')');
    }
}

/// Writer shared by every connection: ANSI quoting.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;

impl SqlWriter for GenericSqlWriter {}

/// `sentence` with its parameters inlined, see [`SqlWriter::write_sql`].
pub fn format_sql(sentence: &str, params: &[Value]) -> String {
    let mut out = String::with_capacity(sentence.len() + params.len() * 8);
    GenericSqlWriter.write_sql(&mut out, sentence, params);
    out
}
