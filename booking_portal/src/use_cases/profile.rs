use tracing::info;
use uuid::Uuid;

use crate::domain::{Preference, ProfileError, ProfileRecord, ProfileStore, SessionProvider};

pub const PROFILE_SAVED_MESSAGE: &str = "Profile saved";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    FirstName,
    LastName,
    Phone,
    Location,
    Preference,
    About,
}

impl ProfileField {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "first_name" | "firstName" => Some(ProfileField::FirstName),
            "last_name" | "lastName" => Some(ProfileField::LastName),
            "phone" => Some(ProfileField::Phone),
            "location" => Some(ProfileField::Location),
            "preference" => Some(ProfileField::Preference),
            "about" => Some(ProfileField::About),
            _ => None,
        }
    }
}

// Editable copy of the profile row; blanks are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub location: String,
    pub preference: Preference,
    pub about: String,
}

impl ProfileForm {
    pub fn from_record(record: &ProfileRecord) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            first_name: text(&record.first_name),
            last_name: text(&record.last_name),
            phone: text(&record.phone),
            location: text(&record.location),
            preference: record
                .preference
                .as_deref()
                .and_then(Preference::parse)
                .unwrap_or_default(),
            about: text(&record.about),
        }
    }

    pub fn to_record(&self, user_id: Uuid) -> ProfileRecord {
        ProfileRecord {
            user_id: Some(user_id),
            first_name: Some(self.first_name.clone()),
            last_name: Some(self.last_name.clone()),
            phone: Some(self.phone.clone()),
            location: Some(self.location.clone()),
            preference: Some(self.preference.as_str().to_string()),
            about: Some(self.about.clone()),
        }
    }

    // False when the value is not acceptable for the field (unknown preference).
    pub fn set(&mut self, field: ProfileField, value: &str) -> bool {
        let slot = match field {
            ProfileField::FirstName => &mut self.first_name,
            ProfileField::LastName => &mut self.last_name,
            ProfileField::Phone => &mut self.phone,
            ProfileField::Location => &mut self.location,
            ProfileField::About => &mut self.about,
            ProfileField::Preference => {
                return match Preference::parse(value) {
                    Some(preference) => {
                        self.preference = preference;
                        true
                    }
                    None => false,
                };
            }
        };
        *slot = value.to_string();
        true
    }

    // Avatar initials: first letters of the names, "U" when unnamed.
    pub fn initials(&self) -> String {
        let first = self.first_name.trim().chars().next().unwrap_or('U');
        let last = self.last_name.trim().chars().next();
        first.to_string() + &last.map(String::from).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub user_id: Uuid,
    pub email: String,
    pub form: ProfileForm,
    // Whether a row already exists; new users start in edit mode.
    pub exists: bool,
}

// Profile page workflow with injected dependencies.
pub struct ProfileEditor<S, P> {
    pub sessions: S,
    pub profiles: P,
}

impl<S, P> ProfileEditor<S, P>
where
    S: SessionProvider,
    P: ProfileStore,
{
    pub async fn load(&self) -> Result<ProfileView, ProfileError> {
        let session = self
            .sessions
            .current_session()
            .await?
            .ok_or(ProfileError::AuthRequired)?;
        let record = self
            .profiles
            .fetch_profile(&session.user.id, &session.access_token)
            .await?;

        Ok(ProfileView {
            user_id: session.user.id,
            email: session.user.email.clone().unwrap_or_default(),
            exists: record.is_some(),
            form: record
                .as_ref()
                .map(ProfileForm::from_record)
                .unwrap_or_default(),
        })
    }

    #[tracing::instrument(name = "save_profile", skip_all)]
    pub async fn save(&self, form: &ProfileForm) -> Result<&'static str, ProfileError> {
        let session = self
            .sessions
            .current_session()
            .await?
            .ok_or(ProfileError::AuthRequired)?;

        self.profiles
            .upsert_profile(&session.access_token, &form.to_record(session.user.id))
            .await?;

        info!(user_id = %session.user.id, "profile saved");
        Ok(PROFILE_SAVED_MESSAGE)
    }
}
