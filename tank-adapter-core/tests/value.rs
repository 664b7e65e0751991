#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tank_adapter_core::{AsValue, ParamType, Value, params, types_aligned};
    use uuid::Uuid;

    #[test]
    fn value_conversions() {
        assert_eq!(true.as_value(), Value::Boolean(true));
        assert_eq!(127_i8.as_value(), Value::Int8(127));
        assert_eq!(u32::MAX.as_value(), Value::UInt32(u32::MAX));
        assert_eq!("text".as_value(), Value::Varchar("text".into()));
        assert_eq!(None::<String>.as_value(), Value::Null);
        assert_eq!(Some(5_i64).as_value(), Value::Int64(5));
        assert_eq!(vec![1_u8, 2].as_value(), Value::Blob(vec![1, 2].into_boxed_slice()));
        assert!(Value::default().is_null());
        assert!(Value::Float64(0.1).is_numeric());
        assert!(!Value::Varchar("1".into()).is_numeric());
        assert_eq!(Value::UInt64(u64::MAX).as_i64(), None);
        assert_eq!(Value::Int16(-3).as_i64(), Some(-3));
        assert_eq!(Value::Varchar("v".into()).as_str(), Some("v"));
        assert_eq!(params![], Vec::<Value>::new());
    }

    #[test]
    fn value_serialize() {
        let values = params![
            None::<bool>,
            false,
            -1_i32,
            2.5_f64,
            Decimal::from_str("12.50").unwrap(),
            "x",
            vec![0xAB_u8],
            Uuid::nil(),
            vec![Value::from(1), Value::from("b")],
        ];
        assert_eq!(
            serde_json::to_string(&values).unwrap(),
            r#"[null,false,-1,2.5,"12.50","x","ab","00000000-0000-0000-0000-000000000000",[1,"b"]]"#
        );
    }

    #[test]
    fn value_param_types() {
        assert_eq!(ParamType::infer(&Value::Null), ParamType::Null);
        assert_eq!(ParamType::infer(&7_u16.into()), ParamType::Integer);
        assert_eq!(ParamType::infer(&"s".into()), ParamType::String);
        assert_eq!(ParamType::infer(&1.5_f32.into()), ParamType::String);
        assert_eq!(ParamType::infer(&vec![9_u8].into()), ParamType::LargeObject);
        assert_eq!(
            ParamType::infer(&vec![Value::from(1), Value::from(2)].into()),
            ParamType::IntegerArray
        );
        assert_eq!(
            ParamType::infer(&vec![Value::from("a")].into()),
            ParamType::StringArray
        );
        assert!(ParamType::StringArray.is_array());
        assert_eq!(ParamType::LargeObject.to_string(), "large_object");
        assert_eq!(
            serde_json::to_string(&[ParamType::Integer, ParamType::Ascii]).unwrap(),
            r#"["integer","ascii"]"#
        );

        let params = params![1, "a"];
        assert!(types_aligned(&params, &[]));
        assert!(types_aligned(&params, &[ParamType::Integer, ParamType::String]));
        assert!(!types_aligned(&params, &[ParamType::Integer]));
    }
}
