use chrono::NaiveDate;
use serde::Serialize;

// Which kind of request a booking dialog collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingMode {
    Viewing,
    SafariBook,
    SafariCustom,
}

// Safari dialogs either reserve a listed safari or ask for a bespoke route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SafariMode {
    Book,
    Custom,
}

impl SafariMode {
    pub fn booking_mode(self) -> BookingMode {
        match self {
            SafariMode::Book => BookingMode::SafariBook,
            SafariMode::Custom => BookingMode::SafariCustom,
        }
    }
}

// Listing a request refers to; general requests carry neither field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingTarget {
    pub id: Option<u32>,
    pub title: Option<String>,
}

impl BookingTarget {
    pub fn general() -> Self {
        Self::default()
    }

    pub fn listing(id: u32, title: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            title: Some(title.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Phone,
    Date,
    Time,
    GroupSize,
    Notes,
}

impl FormField {
    // Accepts both the wire names and the camelCase names used by the form.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Some(FormField::Name),
            "email" => Some(FormField::Email),
            "phone" => Some(FormField::Phone),
            "date" | "startdate" | "start_date" => Some(FormField::Date),
            "time" => Some(FormField::Time),
            "groupsize" | "group_size" => Some(FormField::GroupSize),
            "notes" => Some(FormField::Notes),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Phone => "phone",
            FormField::Date => "date",
            FormField::Time => "time",
            FormField::GroupSize => "group_size",
            FormField::Notes => "notes",
        }
    }
}

// Raw form values exactly as the user typed them.
// Safari dialogs store their start date in `date`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub group_size: String,
    pub notes: String,
}

impl BookingDraft {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
            FormField::Date => &self.date,
            FormField::Time => &self.time,
            FormField::GroupSize => &self.group_size,
            FormField::Notes => &self.notes,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        *self.slot(field) = value.into();
    }

    // Writes `value` only when the field is still blank and `value` has content.
    // Returns whether the field changed.
    pub fn fill_blank(&mut self, field: FormField, value: &str) -> bool {
        let value = value.trim();
        let slot = self.slot(field);
        if !slot.trim().is_empty() || value.is_empty() {
            return false;
        }
        *slot = value.to_string();
        true
    }

    fn slot(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Phone => &mut self.phone,
            FormField::Date => &mut self.date,
            FormField::Time => &mut self.time,
            FormField::GroupSize => &mut self.group_size,
            FormField::Notes => &mut self.notes,
        }
    }
}

// A draft that passed validation, with typed fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub mode: BookingMode,
    pub target: BookingTarget,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub group_size: Option<u32>,
    pub notes: Option<String>,
}

// The serialization within this layer is a dependency leak, but the payloads
// are the contract of the booking functions and belong with the request types.

// Body posted to the `request-viewing` function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewingPayload {
    pub property_id: Option<u32>,
    pub property_title: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: NaiveDate,
    pub time: String,
    pub notes: String,
}

impl From<&BookingRequest> for ViewingPayload {
    fn from(request: &BookingRequest) -> Self {
        Self {
            property_id: request.target.id,
            property_title: request.target.title.clone(),
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            date: request.date,
            time: request.time.clone().unwrap_or_default(),
            notes: request.notes.clone().unwrap_or_default(),
        }
    }
}

// Body posted to the `request-itinerary` function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItineraryPayload {
    pub safari_id: Option<u32>,
    pub safari_title: Option<String>,
    pub mode: SafariMode,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub start_date: NaiveDate,
    pub group_size: u32,
}
