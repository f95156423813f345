#[cfg(test)]
mod tests {
    use quickread_core::{AsValue, Value};
    use rust_decimal::{Decimal, prelude::FromPrimitive};
    use std::str::FromStr;
    use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};
    use uuid::Uuid;

    #[test]
    fn value_null() {
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Float32(Some(1.0)), Value::Null);
        assert!(Value::Int32(None).is_null());
        assert!(!Value::Int32(Some(0)).is_null());
        assert_eq!(Value::Varchar(Some("x".into())).as_null(), Value::Varchar(None));
        assert!(Value::Decimal(Some(Decimal::ONE), 10, 2).same_type(&Value::Decimal(None, 10, 2)));
        assert!(!Value::Decimal(None, 10, 2).same_type(&Value::Decimal(None, 10, 3)));
        assert!(!Value::Int32(None).same_type(&Value::Int64(None)));
    }

    #[test]
    fn value_bool() {
        let val: Value = true.into();
        assert_eq!(val, Value::Boolean(Some(true)));
        assert_ne!(val, Value::Boolean(Some(false)));
        assert_ne!(val, Value::Boolean(None));
        assert_ne!(val, Value::Varchar(Some("true".into())));
        assert_eq!(bool::try_from_value(val).unwrap(), true);
        assert_eq!(bool::try_from_value((1 as i8).into()).unwrap(), true);
        assert_eq!(bool::try_from_value((0 as i64).into()).unwrap(), false);
        assert_eq!(bool::try_from_value((2 as u32).into()).unwrap(), true);
        assert_eq!(bool::try_from_value("t".into()).unwrap(), true);
        assert_eq!(bool::try_from_value(" FALSE ".into()).unwrap(), false);
        assert!(bool::try_from_value((0.5 as f32).into()).is_err());
        assert!(bool::try_from_value("yes".into()).is_err());
    }

    #[test]
    fn value_integers() {
        let val: Value = (127 as i8).into();
        assert_eq!(val, Value::Int8(Some(127)));
        assert_ne!(val, Value::Int16(Some(127)));
        assert_eq!(i8::try_from_value(val).unwrap(), 127);
        assert_eq!(i8::try_from_value((99 as u8).into()).unwrap(), 99);
        assert!(i8::try_from_value((128 as i16).into()).is_err());
        assert!(i8::try_from_value((0.1 as f64).into()).is_err());

        assert_eq!(i32::try_from_value((-5 as i64).into()).unwrap(), -5);
        assert_eq!(u16::try_from_value((65535 as u64).into()).unwrap(), 65535);
        assert!(u16::try_from_value((-1 as i32).into()).is_err());
        assert!(u64::try_from_value((u64::MAX as u128 + 1).into()).is_err());
        assert_eq!(i64::try_from_value(true.into()).unwrap(), 1);

        assert_eq!(i32::try_from_value("  -42 ".into()).unwrap(), -42);
        assert!(i32::try_from_value("42abc".into()).is_err());
        assert!(i32::try_from_value("".into()).is_err());
        assert!(u8::try_from_value("256".into()).is_err());
        assert!(i64::try_from_value(Value::Int64(None)).is_err());
    }

    #[test]
    fn value_floats() {
        let val: Value = (1.5 as f64).into();
        assert_eq!(val, Value::Float64(Some(1.5)));
        assert_eq!(f32::try_from_value(val).unwrap(), 1.5);
        assert_eq!(f64::try_from_value((7 as i32).into()).unwrap(), 7.0);
        assert_eq!(f64::try_from_value((3 as u128).into()).unwrap(), 3.0);
        assert_eq!(
            f64::try_from_value(Decimal::from_f64(2.25).unwrap().into()).unwrap(),
            2.25
        );
        assert_eq!(f64::try_from_value("1e3".into()).unwrap(), 1000.0);
        assert!(f64::try_from_value("one".into()).is_err());
        assert!(f32::try_from_value(Value::Boolean(Some(true))).is_err());
    }

    #[test]
    fn value_decimal() {
        let var = Decimal::from_str("12.340").unwrap();
        let val: Value = var.into();
        assert_eq!(val, Value::Decimal(Some(var), 0, 0));
        // Precision and scale do not take part in equality
        assert_eq!(val, Value::Decimal(Some(var), 10, 3));
        assert_eq!(Decimal::try_from_value(val).unwrap(), var);
        assert_eq!(
            Decimal::try_from_value((15 as i64).into()).unwrap(),
            Decimal::from(15)
        );
        assert_eq!(
            Decimal::try_from_value((0.5 as f64).into()).unwrap(),
            Decimal::from_str("0.5").unwrap()
        );
        assert_eq!(
            Decimal::try_from_value("1.5e2".into()).unwrap(),
            Decimal::from(150)
        );
        assert!(Decimal::try_from_value("abc".into()).is_err());
        assert!(Decimal::try_from_value(Value::Uuid(Some(Uuid::nil()))).is_err());
    }

    #[test]
    fn value_string() {
        let val: Value = "hello".into();
        assert_eq!(val, Value::Varchar(Some("hello".into())));
        let val: Value = String::from("world").into();
        assert_eq!(String::try_from_value(val).unwrap(), "world");
        assert!(String::try_from_value((1 as i32).into()).is_err());
        assert!(String::try_from_value(Value::Varchar(None)).is_err());
    }

    #[test]
    fn value_blob() {
        let val: Value = vec![1u8, 2, 3].into();
        assert_eq!(val, Value::Blob(Some(vec![1, 2, 3].into_boxed_slice())));
        assert_eq!(Vec::<u8>::try_from_value(val.clone()).unwrap(), vec![1, 2, 3]);
        assert_eq!(
            Box::<[u8]>::try_from_value(val).unwrap(),
            vec![1, 2, 3].into_boxed_slice()
        );
        assert!(Vec::<u8>::try_from_value("123".into()).is_err());
    }

    #[test]
    fn value_temporal() {
        let date = Date::from_calendar_date(2025, Month::January, 31).unwrap();
        let time = Time::from_hms_milli(23, 59, 1, 500).unwrap();
        let timestamp = PrimitiveDateTime::new(date, time);

        assert_eq!(Date::try_from_value("2025-01-31".into()).unwrap(), date);
        assert_eq!(Date::try_from_value(timestamp.into()).unwrap(), date);
        assert!(Date::try_from_value("31/01/2025".into()).is_err());

        assert_eq!(Time::try_from_value("23:59:01.5".into()).unwrap(), time);
        assert_eq!(
            Time::try_from_value("07:05".into()).unwrap(),
            Time::from_hms(7, 5, 0).unwrap()
        );
        assert_eq!(Time::try_from_value(timestamp.into()).unwrap(), time);

        assert_eq!(
            PrimitiveDateTime::try_from_value("2025-01-31 23:59:01.5".into()).unwrap(),
            timestamp
        );
        assert_eq!(
            PrimitiveDateTime::try_from_value("2025-01-31T23:59:01.5".into()).unwrap(),
            timestamp
        );
        assert_eq!(
            PrimitiveDateTime::try_from_value(date.into()).unwrap(),
            date.midnight()
        );

        let offset = UtcOffset::from_hms(2, 0, 0).unwrap();
        let with_timezone = timestamp.assume_offset(offset);
        assert_eq!(
            OffsetDateTime::try_from_value("2025-01-31T23:59:01.5+02:00".into()).unwrap(),
            with_timezone
        );
        assert_eq!(
            OffsetDateTime::try_from_value(timestamp.into()).unwrap(),
            timestamp.assume_utc()
        );
        assert_eq!(
            PrimitiveDateTime::try_from_value(with_timezone.into()).unwrap(),
            timestamp
        );
        assert!(OffsetDateTime::try_from_value("2025-01-31".into()).is_err());
    }

    #[test]
    fn value_uuid() {
        let text = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        let uuid = Uuid::parse_str(text).unwrap();
        assert_eq!(Uuid::try_from_value(text.into()).unwrap(), uuid);
        assert_eq!(
            Uuid::try_from_value(uuid.as_bytes().to_vec().into()).unwrap(),
            uuid
        );
        assert!(Uuid::try_from_value("not-a-uuid".into()).is_err());
        assert!(Uuid::try_from_value(vec![1u8, 2].into()).is_err());
    }

    #[test]
    fn value_option() {
        assert_eq!(Option::<i32>::as_empty_value(), Value::Int32(None));
        assert_eq!(Some(5i32).as_value(), Value::Int32(Some(5)));
        assert_eq!(None::<String>.as_value(), Value::Varchar(None));
        assert_eq!(Option::<i32>::try_from_value(Value::Null).unwrap(), None);
        assert_eq!(Option::<i32>::try_from_value(Value::Varchar(None)).unwrap(), None);
        assert_eq!(
            Option::<i32>::try_from_value((8 as u8).into()).unwrap(),
            Some(8)
        );
        assert!(Option::<i32>::try_from_value("x".into()).is_err());
        assert_eq!(
            Box::<i64>::try_from_value((3 as i8).into()).unwrap(),
            Box::new(3)
        );
    }
}
