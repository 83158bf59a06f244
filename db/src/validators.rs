use chrono::NaiveDateTime;
use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

pub fn create_validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut validation_error = ValidationError::new(code);
    validation_error.message = Some(Cow::from(message));
    validation_error
}

pub fn append_validation_error(
    validation_errors: Result<(), ValidationErrors>,
    field: &'static str,
    validation_error: Result<(), ValidationError>,
) -> Result<(), ValidationErrors> {
    if let Err(validation_error) = validation_error {
        let mut validation_errors = match validation_errors {
            Ok(_) => ValidationErrors::new(),
            Err(validation_errors) => validation_errors,
        };
        validation_errors.add(field, validation_error);
        Err(validation_errors)
    } else {
        validation_errors
    }
}

pub fn start_date_valid(start_date: NaiveDateTime, end_date: NaiveDateTime) -> Result<(), ValidationError> {
    if start_date > end_date {
        let mut validation_error =
            create_validation_error("start_date_must_be_before_end_date", "Start date must be before end date");
        validation_error.add_param(Cow::from("start_date"), &start_date);
        validation_error.add_param(Cow::from("end_date"), &end_date);
        return Err(validation_error);
    }
    Ok(())
}

pub fn validate_greater_than_or_equal<T: Ord + serde::Serialize>(
    a: T,
    b: T,
    code: &'static str,
    msg: &'static str,
) -> Result<(), ValidationError> {
    if a < b {
        let mut validation_error = create_validation_error(code, msg);
        validation_error.add_param(Cow::from(code), &a);
        return Err(validation_error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 5, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn start_date_must_precede_end_date() {
        assert!(start_date_valid(date(1), date(2)).is_ok());
        assert!(start_date_valid(date(2), date(2)).is_ok());
        assert!(start_date_valid(date(3), date(2)).is_err());
    }

    #[test]
    fn append_collects_errors_across_fields() {
        let result = append_validation_error(Ok(()), "quantity", Ok(()));
        assert!(result.is_ok());

        let result = append_validation_error(
            Ok(()),
            "quantity",
            Err(create_validation_error("too_small", "Quantity must be positive")),
        );
        let result = append_validation_error(
            result,
            "currency",
            Err(create_validation_error("mixed_currencies", "Currencies must match")),
        );
        let errors = result.unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn greater_than_or_equal() {
        assert!(validate_greater_than_or_equal(5, 5, "min", "too small").is_ok());
        assert!(validate_greater_than_or_equal(4, 5, "min", "too small").is_err());
    }
}
