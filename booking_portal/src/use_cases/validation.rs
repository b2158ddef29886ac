use chrono::NaiveDate;

use crate::domain::{
    BookingDraft, BookingMode, BookingRequest, BookingTarget, FormField, SafariMode,
    ValidationError,
};

// Dates arrive from `<input type="date">`-style fields.
const DATE_FORMAT: &str = "%Y-%m-%d";

const VIEWING_FIELDS: [FormField; 5] = [
    FormField::Name,
    FormField::Email,
    FormField::Phone,
    FormField::Date,
    FormField::Time,
];

const SAFARI_FIELDS: [FormField; 5] = [
    FormField::Name,
    FormField::Email,
    FormField::Phone,
    FormField::Date,
    FormField::GroupSize,
];

pub fn validate_viewing(
    draft: &BookingDraft,
    target: &BookingTarget,
    today: NaiveDate,
) -> Result<BookingRequest, ValidationError> {
    require_filled(draft, &VIEWING_FIELDS)?;
    let date = future_date(&draft.date, "Date", today)?;

    Ok(BookingRequest {
        mode: BookingMode::Viewing,
        target: target.clone(),
        name: draft.name.trim().to_string(),
        email: draft.email.trim().to_string(),
        phone: draft.phone.trim().to_string(),
        date,
        time: Some(draft.time.trim().to_string()),
        group_size: None,
        notes: Some(draft.notes.clone()).filter(|notes| !notes.trim().is_empty()),
    })
}

pub fn validate_safari(
    draft: &BookingDraft,
    target: &BookingTarget,
    mode: SafariMode,
    today: NaiveDate,
) -> Result<BookingRequest, ValidationError> {
    require_filled(draft, &SAFARI_FIELDS)?;
    let date = future_date(&draft.date, "Start date", today)?;
    let group_size = group_size(&draft.group_size)?;

    Ok(BookingRequest {
        mode: mode.booking_mode(),
        target: target.clone(),
        name: draft.name.trim().to_string(),
        email: draft.email.trim().to_string(),
        phone: draft.phone.trim().to_string(),
        date,
        time: None,
        group_size: Some(group_size),
        notes: None,
    })
}

fn require_filled(draft: &BookingDraft, fields: &[FormField]) -> Result<(), ValidationError> {
    if fields
        .iter()
        .any(|field| draft.get(*field).trim().is_empty())
    {
        return Err(ValidationError::MissingFields);
    }
    Ok(())
}

// Calendar comparison: only dates strictly after `today` are bookable.
pub fn future_date(
    raw: &str,
    label: &'static str,
    today: NaiveDate,
) -> Result<NaiveDate, ValidationError> {
    let date = NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate { label })?;
    if date <= today {
        return Err(ValidationError::DateNotInFuture { label });
    }
    Ok(date)
}

// Coerces the raw field to a whole number of travellers, at least one.
pub fn group_size(raw: &str) -> Result<u32, ValidationError> {
    let raw = raw.trim();
    let count = match raw.parse::<i64>() {
        Ok(count) => count,
        Err(_) => {
            let value = raw
                .parse::<f64>()
                .map_err(|_| ValidationError::GroupSizeNotWhole)?;
            if !value.is_finite() || value.fract() != 0.0 {
                return Err(ValidationError::GroupSizeNotWhole);
            }
            if value < 1.0 {
                return Err(ValidationError::GroupSizeTooSmall);
            }
            if value > u32::MAX as f64 {
                return Err(ValidationError::GroupSizeTooLarge);
            }
            value as i64
        }
    };

    if count < 1 {
        return Err(ValidationError::GroupSizeTooSmall);
    }
    u32::try_from(count).map_err(|_| ValidationError::GroupSizeTooLarge)
}
