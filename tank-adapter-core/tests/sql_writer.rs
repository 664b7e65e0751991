#[cfg(test)]
mod tests {
    use indoc::indoc;
    use tank_adapter_core::{GenericSqlWriter, SqlWriter, Value, format_sql, params};
    use time::macros::{date, datetime, time};
    use uuid::Uuid;

    #[test]
    fn sql_values() {
        macro_rules! test_value {
            ($value:expr, $expected:literal) => {{
                let mut out = String::new();
                GenericSqlWriter.write_value(&mut out, &Value::from($value));
                assert_eq!(out, $expected);
            }};
        }
        test_value!(None::<i32>, "NULL");
        test_value!(true, "true");
        test_value!(-12_i8, "-12");
        test_value!(u64::MAX, "18446744073709551615");
        test_value!(1.5_f64, "1.5");
        test_value!(f32::INFINITY, "'Infinity'");
        test_value!(f64::NEG_INFINITY, "'-Infinity'");
        test_value!(f64::NAN, "'NaN'");
        test_value!("it's", "'it''s'");
        test_value!("two\nlines", "'two\\nlines'");
        test_value!(vec![0xDE_u8, 0xAD], "x'DEAD'");
        test_value!(date!(2024-02-29), "'2024-02-29'");
        test_value!(time!(8:05:03), "'08:05:03'");
        test_value!(time!(8:05:03.25), "'08:05:03.25'");
        test_value!(datetime!(1999-12-31 23:59:59), "'1999-12-31 23:59:59'");
        test_value!(Uuid::nil(), "'00000000-0000-0000-0000-000000000000'");
        test_value!(vec![Value::from(1), Value::from("a")], "(1, 'a')");
    }

    #[test]
    fn sql_placeholders() {
        assert_eq!(
            format_sql(
                "SELECT * FROM user WHERE id = ? AND name = ?",
                &params![1, "O'Hara"]
            ),
            "SELECT * FROM user WHERE id = 1 AND name = 'O''Hara'"
        );
        assert_eq!(
            format_sql("SELECT '?' AS q, ? AS v", &params![true]),
            "SELECT '?' AS q, true AS v"
        );
        assert_eq!(
            format_sql("SELECT 'it\\'s ?', ?", &params![2]),
            "SELECT 'it\\'s ?', 2"
        );
        assert_eq!(format_sql("SELECT ?, ?", &params![1]), "SELECT 1, ?");
        assert_eq!(format_sql("SELECT 1", &params![1, 2]), "SELECT 1");
    }

    #[test]
    fn sql_multiline() {
        let sql = indoc! {"
            UPDATE user
            SET name = ?
            WHERE id IN ?
        "};
        assert_eq!(
            format_sql(sql, &params!["Eve", vec![Value::from(1), Value::from(2)]]),
            "UPDATE user\nSET name = 'Eve'\nWHERE id IN (1, 2)\n"
        );
    }
}
