use crate::rdbc::value::Value;
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use mysql_async::Value as MyValue;

pub fn from_mysql_value(v: &MyValue) -> Value {
    match v {
        MyValue::NULL => Value::Null,
        MyValue::Int(i) => Value::I64(*i),
        MyValue::UInt(u) => Value::U64(*u),
        MyValue::Float(f) => Value::F64(*f as f64),
        MyValue::Double(d) => Value::F64(*d),
        MyValue::Bytes(b) => Value::Bytes(b.clone()),
        MyValue::Date(y, m, d, h, min, s, micro) => {
            let date = NaiveDate::from_ymd_opt(*y as i32, *m as u32, *d as u32);
            match date {
                Some(date) if *h == 0 && *min == 0 && *s == 0 && *micro == 0 => Value::Date(date),
                Some(date) => date
                    .and_hms_micro_opt(*h as u32, *min as u32, *s as u32, *micro)
                    .map(Value::DateTime)
                    .unwrap_or(Value::Null),
                None => Value::Null,
            }
        }
        MyValue::Time(is_neg, days, h, min, s, micro) => {
            let total_h = *days * 24 + (*h as u32);
            match NaiveTime::from_hms_micro_opt(total_h, *min as u32, *s as u32, *micro) {
                Some(t) if !*is_neg => Value::Time(t),
                Some(t) => Value::Str(format!("-{}", t)),
                None => Value::Null,
            }
        }
    }
}

pub fn to_mysql_value(v: &Value) -> MyValue {
    match v {
        Value::Null => MyValue::NULL,
        Value::Bool(b) => MyValue::Int(if *b { 1 } else { 0 }),
        Value::I64(i) => MyValue::Int(*i),
        Value::U64(u) => MyValue::UInt(*u),
        Value::F64(f) => MyValue::Double(*f),
        Value::Str(s) => MyValue::Bytes(s.clone().into_bytes()),
        Value::Bytes(b) => MyValue::Bytes(b.clone()),
        Value::Date(d) => MyValue::Date(d.year() as u16, d.month() as u8, d.day() as u8, 0, 0, 0, 0),
        Value::Time(t) => MyValue::Time(
            false,
            0,
            t.hour() as u8,
            t.minute() as u8,
            t.second() as u8,
            t.nanosecond() / 1000,
        ),
        Value::DateTime(dt) => MyValue::Date(
            dt.date().year() as u16,
            dt.date().month() as u8,
            dt.date().day() as u8,
            dt.time().hour() as u8,
            dt.time().minute() as u8,
            dt.time().second() as u8,
            dt.and_utc().timestamp_subsec_micros(),
        ),
        // DECIMAL goes over the wire as text
        Value::Decimal(d) => MyValue::Bytes(d.to_string().into_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_integers() {
        assert_eq!(from_mysql_value(&to_mysql_value(&Value::I64(-7))), Value::I64(-7));
        assert_eq!(from_mysql_value(&to_mysql_value(&Value::U64(7))), Value::U64(7));
    }

    #[test]
    fn test_date_without_time_component() {
        let d = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        assert_eq!(from_mysql_value(&to_mysql_value(&Value::Date(d))), Value::Date(d));
    }

    #[test]
    fn test_zero_date_maps_to_null() {
        // MySQL's zero date has no chrono representation
        assert_eq!(from_mysql_value(&MyValue::Date(0, 0, 0, 0, 0, 0, 0)), Value::Null);
    }
}
